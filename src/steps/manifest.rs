//! `buildah manifest create` step.

use crate::buildah::{Invocation, ToolRunner, run_checked};
use crate::error::StepError;
use crate::settings::Settings;

/// Build the manifest-create invocation
pub fn invocation(settings: &Settings) -> Result<Invocation, StepError> {
    let manifest = settings
        .manifest_name()
        .ok_or(StepError::MissingManifestName)?;

    let mut args = vec![
        "manifest".to_string(),
        "create".to_string(),
        manifest.to_string(),
        "--log-level".to_string(),
        settings.log_level.clone(),
    ];
    args.extend(settings.flags.iter().cloned());
    args.extend(settings.manifest_args.iter().cloned());

    Ok(Invocation::new(&settings.buildah_path, args))
}

/// Create the empty manifest list the builds are added to
pub async fn run<R: ToolRunner>(settings: &Settings, runner: &R) -> Result<(), StepError> {
    let invocation = invocation(settings)?;
    let manifest = settings.manifest_name().unwrap_or_default();

    run_checked(runner, &invocation)
        .await
        .map_err(|reason| StepError::ManifestFailed {
            manifest: manifest.to_string(),
            reason,
        })?;

    log::info!("created manifest {}", manifest);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buildah::test::RecordingRunner;

    #[tokio::test]
    async fn test_commit_sha_used_verbatim() {
        let runner = RecordingRunner::new();
        let settings = Settings {
            commit_sha: Some("9fceb02d0ae598e95dc970b74767f19372d61af8".to_string()),
            ..Settings::default()
        };

        run(&settings, &runner).await.unwrap();

        let calls = runner.calls();
        assert_eq!(
            calls[0].args,
            vec![
                "manifest",
                "create",
                "9fceb02d0ae598e95dc970b74767f19372d61af8",
                "--log-level",
                "info"
            ]
        );
    }

    #[test]
    fn test_configured_name_and_extra_args() {
        let settings = Settings {
            manifest_name: Some("app-multiarch".to_string()),
            commit_sha: Some("9fceb02".to_string()),
            log_level: "debug".to_string(),
            flags: vec!["--storage-driver=vfs".to_string()],
            manifest_args: vec!["--amend".to_string()],
            ..Settings::default()
        };

        let invocation = invocation(&settings).unwrap();

        assert_eq!(
            invocation.args,
            vec![
                "manifest",
                "create",
                "app-multiarch",
                "--log-level",
                "debug",
                "--storage-driver=vfs",
                "--amend"
            ]
        );
        assert!(invocation.stdin.is_none());
    }

    #[tokio::test]
    async fn test_missing_manifest_name() {
        let runner = RecordingRunner::new();

        let err = run(&Settings::default(), &runner).await.unwrap_err();

        assert!(matches!(err, StepError::MissingManifestName));
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_manifest_failure() {
        let runner = RecordingRunner::failing_on("manifest");
        let settings = Settings {
            manifest_name: Some("app".to_string()),
            ..Settings::default()
        };

        let err = run(&settings, &runner).await.unwrap_err();

        assert_eq!(err.to_string(), "creating manifest app failed: exit status 1");
    }
}
