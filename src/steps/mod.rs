//! Pipeline steps and the dispatcher that runs them.
//!
//! Steps run strictly in the configured order and the first failure stops the
//! pipeline. Nothing is rolled back or retried.

pub mod build;
pub mod login;
pub mod manifest;
pub mod push;

use crate::buildah::{ToolRunner, native_arch};
use crate::error::StepError;
use crate::settings::Settings;
use std::fmt;

/// A recognized step name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `buildah login`
    Login,
    /// `buildah manifest create`
    Manifest,
    /// `buildah build` per architecture
    Build,
    /// `buildah manifest push --all`
    Push,
}

impl Step {
    /// Look up a step by its configured name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "login" => Some(Step::Login),
            "manifest" => Some(Step::Manifest),
            "build" => Some(Step::Build),
            "push" => Some(Step::Push),
            _ => None,
        }
    }

    /// Configured name of the step
    pub fn name(&self) -> &'static str {
        match self {
            Step::Login => "login",
            Step::Manifest => "manifest",
            Step::Build => "build",
            Step::Push => "push",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs the configured steps against a [`ToolRunner`]
#[derive(Debug)]
pub struct Pipeline<'a, R> {
    settings: &'a Settings,
    runner: &'a R,
    host_arch: String,
}

impl<'a, R: ToolRunner> Pipeline<'a, R> {
    /// Create a pipeline for the host's native architecture
    pub fn new(settings: &'a Settings, runner: &'a R) -> Self {
        Self {
            settings,
            runner,
            host_arch: native_arch().to_string(),
        }
    }

    /// Override the host architecture used to decide on emulation
    pub fn with_host_arch(mut self, host_arch: impl Into<String>) -> Self {
        self.host_arch = host_arch.into();
        self
    }

    /// Recognized steps in execution order; unknown names are skipped
    pub fn steps(&self) -> Vec<Step> {
        self.settings
            .steps
            .iter()
            .filter_map(|name| {
                let step = Step::from_name(name);
                if step.is_none() {
                    log::debug!("ignoring unknown step '{}'", name);
                }
                step
            })
            .collect()
    }

    /// Run a single step
    pub async fn run_step(&self, step: Step) -> Result<(), StepError> {
        match step {
            Step::Login => login::run(self.settings, self.runner).await,
            Step::Manifest => manifest::run(self.settings, self.runner).await,
            Step::Build => build::run(self.settings, self.runner, &self.host_arch).await,
            Step::Push => push::run(self.settings, self.runner).await,
        }
    }

    /// Run every step, stopping at the first failure
    pub async fn run(&self) -> Result<(), StepError> {
        for step in self.steps() {
            log::info!("running step {}", step);
            self.run_step(step).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buildah::test::RecordingRunner;
    use crate::settings::Secret;

    fn settings(steps: &[&str]) -> Settings {
        Settings {
            username: "ci-bot".to_string(),
            password: Secret::new("s3cr3t"),
            registry: "quay.io".to_string(),
            repository: "acme/app".to_string(),
            architectures: vec!["amd64".to_string(), "arm64".to_string()],
            commit_sha: Some("0d1e2f3".to_string()),
            steps: steps.iter().map(|s| s.to_string()).collect(),
            ..Settings::default()
        }
    }

    #[test]
    fn test_step_names() {
        for step in [Step::Login, Step::Manifest, Step::Build, Step::Push] {
            assert_eq!(Step::from_name(step.name()), Some(step));
        }
        assert_eq!(Step::from_name("Login"), None);
        assert_eq!(Step::from_name("deploy"), None);
    }

    #[tokio::test]
    async fn test_default_order() {
        let runner = RecordingRunner::new();
        let settings = settings(&["login", "manifest", "build", "push"]);

        Pipeline::new(&settings, &runner)
            .with_host_arch("amd64")
            .run()
            .await
            .unwrap();

        assert_eq!(
            runner.subcommands(),
            vec!["login", "manifest create", "build", "build", "manifest push"]
        );
    }

    #[tokio::test]
    async fn test_follows_configured_order() {
        let runner = RecordingRunner::new();
        let settings = settings(&["push", "login"]);

        Pipeline::new(&settings, &runner).run().await.unwrap();

        assert_eq!(runner.subcommands(), vec!["manifest push", "login"]);
    }

    #[tokio::test]
    async fn test_unknown_steps_ignored() {
        let runner = RecordingRunner::new();
        let settings = settings(&["lint", "login", "deploy"]);

        let pipeline = Pipeline::new(&settings, &runner);
        assert_eq!(pipeline.steps(), vec![Step::Login]);

        pipeline.run().await.unwrap();
        assert_eq!(runner.subcommands(), vec!["login"]);
    }

    #[tokio::test]
    async fn test_blank_step_name_skipped() {
        let runner = RecordingRunner::new();
        let settings = settings(&["login", "", "push"]);

        let pipeline = Pipeline::new(&settings, &runner);
        assert_eq!(pipeline.steps(), vec![Step::Login, Step::Push]);

        pipeline.run().await.unwrap();
        assert_eq!(runner.subcommands(), vec!["login", "manifest push"]);
    }

    #[tokio::test]
    async fn test_failure_stops_later_steps() {
        let runner = RecordingRunner::failing_on("login");
        let settings = settings(&["login", "manifest", "build", "push"]);

        let err = Pipeline::new(&settings, &runner).run().await.unwrap_err();

        assert!(matches!(err, StepError::LoginFailed { .. }));
        assert_eq!(runner.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_build_skips_push() {
        let runner = RecordingRunner::failing_on("build");
        let settings = settings(&["manifest", "build", "push"]);

        let err = Pipeline::new(&settings, &runner)
            .with_host_arch("amd64")
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, StepError::BuildFailed { ref arch, .. } if arch == "amd64"));
        assert_eq!(runner.subcommands(), vec!["manifest create", "build"]);
    }

    #[tokio::test]
    async fn test_precondition_failure_invokes_nothing() {
        let runner = RecordingRunner::new();
        let settings = Settings {
            password: Secret::default(),
            ..settings(&["login", "manifest", "build", "push"])
        };

        let err = Pipeline::new(&settings, &runner).run().await.unwrap_err();

        assert!(matches!(err, StepError::MissingCredentials));
        assert_eq!(runner.call_count(), 0);
    }
}
