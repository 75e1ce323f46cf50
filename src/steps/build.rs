//! `buildah build` step, one invocation per architecture.

use crate::buildah::{Invocation, ToolRunner, needs_emulation, run_checked};
use crate::error::StepError;
use crate::settings::Settings;
use std::time::Instant;

/// Flag appended for architectures the host cannot build natively
pub const EMULATION_FLAG: &str = "-f";

/// Build the invocation for a single architecture
pub fn invocation(
    settings: &Settings,
    arch: &str,
    host_arch: &str,
) -> Result<Invocation, StepError> {
    let manifest = settings
        .manifest_name()
        .ok_or(StepError::MissingManifestName)?;

    let mut args = vec![
        "build".to_string(),
        "--manifest".to_string(),
        manifest.to_string(),
        "--arch".to_string(),
        arch.to_string(),
        "--tag".to_string(),
        settings.image_tag(),
        "--log-level".to_string(),
        settings.log_level.clone(),
    ];
    args.extend(settings.flags.iter().cloned());
    args.extend(settings.build_args.iter().cloned());
    if needs_emulation(host_arch, arch) {
        args.push(EMULATION_FLAG.to_string());
    }
    args.push(settings.context_path());

    Ok(Invocation::new(&settings.buildah_path, args))
}

/// Build every configured architecture into the manifest list.
///
/// Architectures are built one after another in list order. The first
/// failure stops the loop; images already added to the manifest stay there.
pub async fn run<R: ToolRunner>(
    settings: &Settings,
    runner: &R,
    host_arch: &str,
) -> Result<(), StepError> {
    let tag = settings.image_tag();

    for arch in &settings.architectures {
        log::info!("building for architecture {}", arch);
        let start = Instant::now();

        let invocation = invocation(settings, arch, host_arch)?;
        if needs_emulation(host_arch, arch) {
            log::info!("QEMU for {} (host is {})", arch, host_arch);
        }
        log::info!("building with {}", invocation);

        run_checked(runner, &invocation)
            .await
            .map_err(|reason| StepError::BuildFailed {
                arch: arch.clone(),
                reason,
            })?;

        log::info!(
            "build successful for architecture {} in {:.2} minutes",
            arch,
            start.elapsed().as_secs_f64() / 60.0
        );
    }

    log::info!("build finished for tag {}", tag);
    Ok(())
}
