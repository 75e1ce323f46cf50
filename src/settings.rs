//! Plugin settings loaded once at startup.
//!
//! Settings come from `PLUGIN_*` environment variables (or the matching
//! command line flags, see [`Args`]) and are read-only for the rest of the run.

use crate::cli::Args;
use crate::error::ConfigError;
use std::fmt;
use std::path::PathBuf;

/// Default buildah executable location
pub const DEFAULT_BUILDAH_PATH: &str = "/usr/bin/buildah";

/// Steps executed when `PLUGIN_STEPS` is unset
pub const DEFAULT_STEPS: [&str; 4] = ["login", "manifest", "build", "push"];

/// String value that never shows up in `Debug` output
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wrap a secret value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the underlying value
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Check if the secret is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("\"\"")
        } else {
            f.write_str("\"***\"")
        }
    }
}

/// Flat settings record driving every step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Registry username
    pub username: String,
    /// Registry password, streamed to buildah on stdin
    pub password: Secret,
    /// Registry host, e.g. `quay.io`
    pub registry: String,
    /// Repository path inside the registry
    pub repository: String,
    /// Image tag
    pub tag: String,
    /// Build context relative to the CI workspace
    pub context: String,
    /// Explicit manifest list name
    pub manifest_name: Option<String>,
    /// Target architectures, never empty
    pub architectures: Vec<String>,
    /// Transport used for the final push
    pub transport: String,
    /// Extra flags appended to every buildah invocation
    pub flags: Vec<String>,
    /// Extra arguments for `buildah login`
    pub login_args: Vec<String>,
    /// Extra arguments for `buildah manifest create`
    pub manifest_args: Vec<String>,
    /// Extra arguments for `buildah build`
    pub build_args: Vec<String>,
    /// Extra arguments for `buildah manifest push`
    pub push_args: Vec<String>,
    /// Step names in execution order
    pub steps: Vec<String>,
    /// Log level passed to buildah
    pub log_level: String,
    /// Raw registries.conf content
    pub registries_config: Option<Secret>,
    /// CI workspace root (`CI_WORKSPACE`)
    pub workspace: Option<String>,
    /// CI commit identifier (`CI_COMMIT_SHA`)
    pub commit_sha: Option<String>,
    /// Path to the buildah executable
    pub buildah_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: Secret::default(),
            registry: String::new(),
            repository: String::new(),
            tag: "latest".to_string(),
            context: "Dockerfile".to_string(),
            manifest_name: None,
            architectures: vec!["amd64".to_string()],
            transport: "docker".to_string(),
            flags: Vec::new(),
            login_args: Vec::new(),
            manifest_args: Vec::new(),
            build_args: Vec::new(),
            push_args: Vec::new(),
            steps: DEFAULT_STEPS.iter().map(|s| s.to_string()).collect(),
            log_level: "info".to_string(),
            registries_config: None,
            workspace: None,
            commit_sha: None,
            buildah_path: PathBuf::from(DEFAULT_BUILDAH_PATH),
        }
    }
}

impl Settings {
    /// Manifest list name, falling back to the CI commit identifier
    pub fn manifest_name(&self) -> Option<&str> {
        self.manifest_name
            .as_deref()
            .or(self.commit_sha.as_deref())
            .filter(|name| !name.is_empty())
    }

    /// Image reference `<registry>/<repository>:<tag>`
    pub fn image_tag(&self) -> String {
        format!("{}/{}:{}", self.registry, self.repository, self.tag)
    }

    /// Push destination `<transport>://<registry>/<repository>:<tag>`
    pub fn destination(&self) -> String {
        format!("{}://{}", self.transport, self.image_tag())
    }

    /// Build context path `<workspace>/<context>`
    pub fn context_path(&self) -> String {
        match self.workspace.as_deref() {
            Some(workspace) => format!("{}/{}", workspace, self.context),
            None => self.context.clone(),
        }
    }
}

impl TryFrom<Args> for Settings {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let defaults = Settings::default();

        Ok(Self {
            username: present(args.username).unwrap_or_default(),
            password: Secret::new(present(args.password).unwrap_or_default()),
            registry: present(args.registry).unwrap_or_default(),
            repository: present(args.repository).unwrap_or_default(),
            tag: present(args.tag).unwrap_or(defaults.tag),
            context: present(args.context).unwrap_or(defaults.context),
            manifest_name: present(args.manifest_name),
            architectures: parse_list("PLUGIN_ARCHITECTURES", args.architectures)?
                .unwrap_or(defaults.architectures),
            transport: present(args.transport).unwrap_or(defaults.transport),
            flags: parse_list("PLUGIN_FLAGS", args.flags)?.unwrap_or_default(),
            login_args: parse_list("PLUGIN_LOGINARGS", args.login_args)?.unwrap_or_default(),
            manifest_args: parse_list("PLUGIN_MANIFESTARGS", args.manifest_args)?
                .unwrap_or_default(),
            build_args: parse_list("PLUGIN_BUILDARGS", args.build_args)?.unwrap_or_default(),
            push_args: parse_list("PLUGIN_PUSHARGS", args.push_args)?.unwrap_or_default(),
            steps: parse_list("PLUGIN_STEPS", args.steps)?.unwrap_or(defaults.steps),
            log_level: present(args.log_level).unwrap_or(defaults.log_level),
            registries_config: present(args.registries_config).map(Secret::new),
            workspace: present(args.workspace),
            commit_sha: present(args.commit_sha),
            buildah_path: present(args.buildah)
                .map(PathBuf::from)
                .unwrap_or(defaults.buildah_path),
        })
    }
}

/// Treat blank values the same as unset variables
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a list-valued variable.
///
/// Accepts a JSON array of strings (`["amd64","arm64"]`) or a comma-separated
/// string (`amd64,arm64`). Blank items are dropped. Returns `None` when the
/// variable is unset, blank or holds no items; only an invalid JSON array is
/// an error.
pub fn parse_list(
    variable: &'static str,
    raw: Option<String>,
) -> Result<Option<Vec<String>>, ConfigError> {
    let Some(raw) = present(raw) else {
        return Ok(None);
    };
    let trimmed = raw.trim();

    let items: Vec<String> = if trimmed.starts_with('[') {
        serde_json::from_str::<Vec<String>>(trimmed).map_err(|e| ConfigError::MalformedList {
            variable,
            reason: e.to_string(),
        })?
    } else {
        trimmed.split(',').map(str::to_string).collect()
    };

    // Stray separators (`login,,push`, a trailing comma) leave blank items behind
    let list: Vec<String> = items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();

    if list.is_empty() {
        Ok(None)
    } else {
        Ok(Some(list))
    }
}
