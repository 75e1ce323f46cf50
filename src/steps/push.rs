//! `buildah manifest push` step.

use crate::buildah::{Invocation, ToolRunner, run_checked};
use crate::error::StepError;
use crate::settings::Settings;

/// Build the manifest-push invocation
pub fn invocation(settings: &Settings) -> Result<Invocation, StepError> {
    let manifest = settings
        .manifest_name()
        .ok_or(StepError::MissingManifestName)?;

    let mut args = vec![
        "manifest".to_string(),
        "push".to_string(),
        "--all".to_string(),
        "--log-level".to_string(),
        settings.log_level.clone(),
        manifest.to_string(),
        settings.destination(),
    ];
    args.extend(settings.flags.iter().cloned());
    args.extend(settings.push_args.iter().cloned());

    Ok(Invocation::new(&settings.buildah_path, args))
}

/// Push the manifest list with all architectures
pub async fn run<R: ToolRunner>(settings: &Settings, runner: &R) -> Result<(), StepError> {
    let invocation = invocation(settings)?;
    let destination = settings.destination();

    run_checked(runner, &invocation)
        .await
        .map_err(|reason| StepError::PushFailed {
            destination: destination.clone(),
            reason,
        })?;

    log::info!("pushed successfully to {}", destination);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buildah::test::RecordingRunner;

    fn settings() -> Settings {
        Settings {
            registry: "registry.example.com:5000".to_string(),
            repository: "platform/gateway".to_string(),
            tag: "edge".to_string(),
            manifest_name: Some("gateway".to_string()),
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn test_push_arguments() {
        let runner = RecordingRunner::new();
        let settings = Settings {
            flags: vec!["--storage-driver=vfs".to_string()],
            push_args: vec!["--format=v2s2".to_string()],
            ..settings()
        };

        run(&settings, &runner).await.unwrap();

        assert_eq!(
            runner.calls()[0].args,
            vec![
                "manifest",
                "push",
                "--all",
                "--log-level",
                "info",
                "gateway",
                "docker://registry.example.com:5000/platform/gateway:edge",
                "--storage-driver=vfs",
                "--format=v2s2",
            ]
        );
    }

    #[test]
    fn test_destination_uses_transport() {
        for transport in ["docker", "oci-archive", "containers-storage"] {
            let settings = Settings {
                transport: transport.to_string(),
                ..settings()
            };

            let invocation = invocation(&settings).unwrap();

            assert_eq!(
                invocation.args[6],
                format!("{transport}://registry.example.com:5000/platform/gateway:edge")
            );
        }
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_push_failure() {
        let runner = RecordingRunner::failing_on("manifest");

        let err = run(&settings(), &runner).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "pushing image to docker://registry.example.com:5000/platform/gateway:edge failed: exit status 1"
        );
    }
}
