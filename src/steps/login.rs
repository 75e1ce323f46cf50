//! `buildah login` step.

use crate::buildah::{Invocation, ToolRunner, run_checked};
use crate::error::StepError;
use crate::settings::Settings;

/// Build the login invocation.
///
/// The password is attached as stdin so it never shows up in the process list.
pub fn invocation(settings: &Settings) -> Result<Invocation, StepError> {
    if settings.username.is_empty() || settings.password.is_empty() {
        return Err(StepError::MissingCredentials);
    }
    if settings.registry.is_empty() {
        return Err(StepError::MissingRegistry);
    }

    let mut args = vec![
        "login".to_string(),
        "--username".to_string(),
        settings.username.clone(),
        "--password-stdin".to_string(),
    ];
    args.extend(settings.flags.iter().cloned());
    args.extend(settings.login_args.iter().cloned());
    args.push(settings.registry.clone());

    Ok(Invocation::new(&settings.buildah_path, args)
        .with_stdin(settings.password.expose().as_bytes()))
}

/// Log in to the configured registry
pub async fn run<R: ToolRunner>(settings: &Settings, runner: &R) -> Result<(), StepError> {
    let invocation = invocation(settings)?;

    run_checked(runner, &invocation)
        .await
        .map_err(|reason| StepError::LoginFailed {
            registry: settings.registry.clone(),
            reason,
        })?;

    log::info!("login success at registry {}", settings.registry);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buildah::test::RecordingRunner;
    use crate::settings::Secret;

    fn settings() -> Settings {
        Settings {
            username: "ci-bot".to_string(),
            password: Secret::new("s3cr3t"),
            registry: "quay.io".to_string(),
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn test_password_streamed_on_stdin() {
        let runner = RecordingRunner::new();

        run(&settings(), &runner).await.unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].args,
            vec!["login", "--username", "ci-bot", "--password-stdin", "quay.io"]
        );
        assert_eq!(calls[0].stdin.as_deref(), Some("s3cr3t".as_bytes()));
        assert!(!calls[0].args.iter().any(|arg| arg.contains("s3cr3t")));
    }

    #[tokio::test]
    async fn test_missing_username_or_password() {
        for (username, password) in [("", "s3cr3t"), ("ci-bot", ""), ("", "")] {
            let runner = RecordingRunner::new();
            let settings = Settings {
                username: username.to_string(),
                password: Secret::new(password),
                ..settings()
            };

            let err = run(&settings, &runner).await.unwrap_err();

            assert!(matches!(err, StepError::MissingCredentials));
            assert_eq!(runner.call_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_missing_registry() {
        let runner = RecordingRunner::new();
        let settings = Settings {
            registry: String::new(),
            ..settings()
        };

        let err = run(&settings, &runner).await.unwrap_err();

        assert!(matches!(err, StepError::MissingRegistry));
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn test_extra_args_before_registry() {
        let settings = Settings {
            flags: vec!["--storage-driver=vfs".to_string()],
            login_args: vec!["--tls-verify=false".to_string()],
            ..settings()
        };

        let invocation = invocation(&settings).unwrap();

        assert_eq!(
            invocation.args[4..],
            ["--storage-driver=vfs", "--tls-verify=false", "quay.io"]
        );
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_login_failure() {
        let runner = RecordingRunner::failing_on("login");

        let err = run(&settings(), &runner).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "login failed at registry quay.io: exit status 1"
        );
    }
}
