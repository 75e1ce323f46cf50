//! # buildah_plugin
//!
//! CI pipeline step that builds multi-architecture container images with
//! buildah and pushes them as a single manifest list.
//!
//! The plugin is glue: every piece of image work is delegated to buildah.
//! It reads `PLUGIN_*` settings once, then runs the configured steps in order:
//!
//! - **login**: `buildah login`, password on stdin
//! - **manifest**: `buildah manifest create`
//! - **build**: `buildah build` per architecture, emulated when foreign
//! - **push**: `buildah manifest push --all`
//!
//! ## Usage
//!
//! ```bash
//! PLUGIN_REGISTRY=quay.io PLUGIN_REPOSITORY=acme/app \
//! PLUGIN_USERNAME=bot PLUGIN_PASSWORD=... \
//! PLUGIN_ARCHITECTURES=amd64,arm64 buildah_plugin
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod buildah;
pub mod cli;
pub mod error;
pub mod settings;
pub mod steps;
pub mod workspace;

pub use buildah::{DryRunRunner, Invocation, ProcessRunner, ToolRunner, ToolStatus};
pub use cli::Args;
pub use error::{ConfigError, PluginError, Result, StepError, WorkspaceError};
pub use settings::{Secret, Settings};
pub use steps::{Pipeline, Step};
