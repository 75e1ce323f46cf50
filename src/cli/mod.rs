//! Command line interface for buildah_plugin.
//!
//! Loads settings, prepares the containers configuration directory and runs
//! the configured steps with either a real or a dry-run buildah runner.

mod args;
mod output;

pub use args::Args;
pub use output::OutputManager;

use crate::buildah::{self, DryRunRunner, ProcessRunner, ToolRunner};
use crate::error::Result;
use crate::settings::Settings;
use crate::steps::{Pipeline, Step};
use crate::workspace;

/// Main CLI entry point, returns the process exit code
pub async fn run() -> i32 {
    let args = Args::parse_args();
    init_logging(&args);

    let output = OutputManager::new();
    let _ = output.section("buildah plugin");

    match execute(args).await {
        Ok(()) => {
            log::info!("finished buildah plugin");
            let _ = output.success("All steps completed");
            0
        }
        Err(e) => {
            log::error!("failed to execute plugin: {}", e);

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                let _ = output.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    let _ = output.indent(&suggestion);
                }
            }
            output.error("buildah plugin failed");
            1
        }
    }
}

/// Initialize `env_logger`.
///
/// The loglevel setting picks the default filter; `RUST_LOG` still wins.
pub fn init_logging(args: &Args) {
    let _ = env_logger::Builder::new()
        .filter_level(args.log_filter())
        .parse_default_env()
        .try_init();
}

/// Load settings from `args` and run every configured step
pub async fn execute(args: Args) -> Result<()> {
    log::info!("starting buildah plugin");

    let dry_run = args.dry_run;
    let settings = Settings::try_from(args)?;
    log::debug!("loaded settings: {:?}", settings);

    let home = workspace::home_dir()?;

    if dry_run {
        log::info!("dry run: buildah commands are printed, not executed");
        if settings.registries_config.is_some() {
            log::info!(
                "dry run: would write {}",
                workspace::containers_dir(&home)
                    .join(workspace::REGISTRIES_CONF)
                    .display()
            );
        }
        return run_pipeline(&settings, &DryRunRunner::new()).await;
    }

    workspace::prepare(
        &home,
        settings.registries_config.as_ref().map(|c| c.expose()),
    )?;
    if settings.steps.iter().any(|name| Step::from_name(name).is_some()) {
        let buildah_path = buildah::locate(&settings.buildah_path)?;
        log::debug!("using buildah at {}", buildah_path.display());
    } else {
        log::info!("no known steps configured, nothing to run");
    }

    run_pipeline(&settings, &ProcessRunner::new()).await
}

async fn run_pipeline<R: ToolRunner>(settings: &Settings, runner: &R) -> Result<()> {
    Pipeline::new(settings, runner).run().await?;
    Ok(())
}
