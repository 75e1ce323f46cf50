//! Error types for buildah_plugin operations.
//!
//! Every failure is fatal: errors carry enough context to be reported in a
//! single log line, plus recovery suggestions for the common misconfigurations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for buildah_plugin operations
pub type Result<T> = std::result::Result<T, PluginError>;

/// Main error type for all buildah_plugin operations
#[derive(Error, Debug)]
pub enum PluginError {
    /// Configuration loading errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Workspace initialization errors
    #[error("Workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    /// Pipeline step errors
    #[error("{0}")]
    Step(#[from] StepError),

    /// External tool could not be located
    #[error("buildah executable not found at '{path}': {reason}")]
    ToolNotFound {
        /// Configured tool path
        path: PathBuf,
        /// Reason reported by the lookup
        reason: String,
    },
}

/// Errors raised while turning environment variables into settings
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A list-valued variable could not be parsed
    #[error("malformed list in {variable}: {reason}")]
    MalformedList {
        /// Environment variable name
        variable: &'static str,
        /// Reason for the error
        reason: String,
    },
}

/// Errors raised while preparing ~/.config/containers
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Home directory could not be determined
    #[error("could not determine the home directory")]
    HomeNotFound,

    /// Directory creation failed
    #[error("failed to create {path}: {source}")]
    CreateDir {
        /// Directory path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Writing registries.conf failed
    #[error("failed to write {path}: {source}")]
    WriteConfig {
        /// File path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the login, manifest, build and push steps
#[derive(Error, Debug)]
pub enum StepError {
    /// Username or password missing before login
    #[error("username and password are required")]
    MissingCredentials,

    /// Registry missing before login
    #[error("registry is required")]
    MissingRegistry,

    /// Neither a manifest name nor a commit identifier is available
    #[error("manifest name is required (set PLUGIN_MANIFESTNAME or CI_COMMIT_SHA)")]
    MissingManifestName,

    /// `buildah login` failed
    #[error("login failed at registry {registry}: {reason}")]
    LoginFailed {
        /// Registry host
        registry: String,
        /// Reason for the error
        reason: String,
    },

    /// `buildah manifest create` failed
    #[error("creating manifest {manifest} failed: {reason}")]
    ManifestFailed {
        /// Manifest list name
        manifest: String,
        /// Reason for the error
        reason: String,
    },

    /// `buildah build` failed for one architecture
    #[error("building arch {arch} failed: {reason}")]
    BuildFailed {
        /// Target architecture
        arch: String,
        /// Reason for the error
        reason: String,
    },

    /// `buildah manifest push` failed
    #[error("pushing image to {destination} failed: {reason}")]
    PushFailed {
        /// Push destination reference
        destination: String,
        /// Reason for the error
        reason: String,
    },
}

impl PluginError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            PluginError::Config(ConfigError::MalformedList { variable, .. }) => vec![
                format!("Use a comma-separated list in {variable}: amd64,arm64"),
                format!("Or a JSON array of strings in {variable}: [\"amd64\",\"arm64\"]"),
            ],
            PluginError::Step(StepError::MissingCredentials) => vec![
                "Set the username and password settings (PLUGIN_USERNAME, PLUGIN_PASSWORD)"
                    .to_string(),
                "Remove 'login' from steps if the registry allows anonymous pushes".to_string(),
            ],
            PluginError::Step(StepError::MissingRegistry) => {
                vec!["Set the registry setting (PLUGIN_REGISTRY), e.g. quay.io".to_string()]
            }
            PluginError::Step(StepError::MissingManifestName) => vec![
                "Set the manifestname setting (PLUGIN_MANIFESTNAME)".to_string(),
            ],
            PluginError::Step(StepError::BuildFailed { arch, .. }) => vec![
                format!("Check that qemu-user-static is installed when building {arch} images"),
                "Pass extra build flags through the buildargs setting".to_string(),
            ],
            PluginError::ToolNotFound { .. } => vec![
                "Run the step in an image that ships buildah (e.g. quay.io/buildah/stable)"
                    .to_string(),
                "Point PLUGIN_BUILDAH at the buildah executable".to_string(),
            ],
            PluginError::Workspace(WorkspaceError::HomeNotFound) => {
                vec!["Set the HOME environment variable".to_string()]
            }
            _ => vec!["Check the buildah output above for specific details".to_string()],
        }
    }
}
