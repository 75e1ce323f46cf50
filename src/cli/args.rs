//! Command line argument parsing.
//!
//! Every setting is read from its `PLUGIN_*` environment variable, which is
//! how CI systems hand plugin settings to a step. The matching `--flag` makes
//! the same setting available when running the tool by hand.

use clap::Parser;

/// Build and push multi-architecture images with buildah
#[derive(Parser, Debug, Default)]
#[command(
    name = "buildah_plugin",
    version,
    about = "Build and push multi-architecture images with buildah",
    long_about = "Build and push multi-architecture images with buildah.

Runs the configured steps in order:
  login     buildah login (password on stdin)
  manifest  buildah manifest create
  build     buildah build, once per architecture
  push      buildah manifest push --all

Settings are normally provided as PLUGIN_* environment variables.
List settings accept `a,b,c` or a JSON array of strings."
)]
pub struct Args {
    /// Registry username
    #[arg(long, env = "PLUGIN_USERNAME")]
    pub username: Option<String>,

    /// Registry password (streamed to buildah on stdin)
    #[arg(long, env = "PLUGIN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Registry host
    #[arg(long, env = "PLUGIN_REGISTRY")]
    pub registry: Option<String>,

    /// Repository path inside the registry
    #[arg(long, env = "PLUGIN_REPOSITORY")]
    pub repository: Option<String>,

    /// Image tag [default: latest]
    #[arg(long, env = "PLUGIN_TAG")]
    pub tag: Option<String>,

    /// Build context relative to the workspace [default: Dockerfile]
    #[arg(long, env = "PLUGIN_CONTEXT")]
    pub context: Option<String>,

    /// Manifest list name [default: $CI_COMMIT_SHA]
    #[arg(long = "manifestname", env = "PLUGIN_MANIFESTNAME")]
    pub manifest_name: Option<String>,

    /// Target architectures [default: amd64]
    #[arg(long, env = "PLUGIN_ARCHITECTURES")]
    pub architectures: Option<String>,

    /// Transport for the pushed manifest [default: docker]
    #[arg(long, env = "PLUGIN_TRANSPORT")]
    pub transport: Option<String>,

    /// Flags appended to every buildah invocation
    #[arg(long, env = "PLUGIN_FLAGS", allow_hyphen_values = true)]
    pub flags: Option<String>,

    /// Extra arguments for buildah login
    #[arg(long = "loginargs", env = "PLUGIN_LOGINARGS", allow_hyphen_values = true)]
    pub login_args: Option<String>,

    /// Extra arguments for buildah manifest create
    #[arg(long = "manifestargs", env = "PLUGIN_MANIFESTARGS", allow_hyphen_values = true)]
    pub manifest_args: Option<String>,

    /// Extra arguments for buildah build
    #[arg(long = "buildargs", env = "PLUGIN_BUILDARGS", allow_hyphen_values = true)]
    pub build_args: Option<String>,

    /// Extra arguments for buildah manifest push
    #[arg(long = "pushargs", env = "PLUGIN_PUSHARGS", allow_hyphen_values = true)]
    pub push_args: Option<String>,

    /// Steps to run, in order [default: login,manifest,build,push]
    #[arg(long, env = "PLUGIN_STEPS")]
    pub steps: Option<String>,

    /// Log level for buildah and this tool [default: info]
    #[arg(long = "loglevel", env = "PLUGIN_LOGLEVEL")]
    pub log_level: Option<String>,

    /// Content written to ~/.config/containers/registries.conf
    #[arg(long = "registriesconfig", env = "PLUGIN_REGISTRIESCONFIG", hide_env_values = true)]
    pub registries_config: Option<String>,

    /// CI workspace root
    #[arg(long, env = "CI_WORKSPACE")]
    pub workspace: Option<String>,

    /// CI commit identifier
    #[arg(long = "commit-sha", env = "CI_COMMIT_SHA")]
    pub commit_sha: Option<String>,

    /// Path to the buildah executable [default: /usr/bin/buildah]
    #[arg(long, env = "PLUGIN_BUILDAH")]
    pub buildah: Option<String>,

    /// Print buildah commands instead of running them
    ///
    /// `PLUGIN_DRY_RUN` is off when unset, empty, `false`, `no`, `off` or `0`;
    /// any other value turns it on.
    #[arg(
        long,
        env = "PLUGIN_DRY_RUN",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub dry_run: bool,
}

impl Args {
    /// Parse command line arguments and environment
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log filter requested through the loglevel setting
    pub fn log_filter(&self) -> log::LevelFilter {
        self.log_level
            .as_deref()
            .and_then(|level| level.trim().parse().ok())
            .unwrap_or(log::LevelFilter::Info)
    }
}
