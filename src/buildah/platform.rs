//! Host architecture detection for cross-architecture builds.
//!
//! buildah names architectures the Go/OCI way (`amd64`, `arm64`, ...), so the
//! Rust target architecture is translated before comparing.

/// Native architecture of the host in OCI naming.
///
/// Uses runtime detection via `std::env::consts::ARCH`.
pub fn native_arch() -> &'static str {
    oci_arch(std::env::consts::ARCH)
}

/// Translate a Rust target architecture name to its OCI equivalent
fn oci_arch(rust_arch: &'static str) -> &'static str {
    match rust_arch {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "arm" => "arm",
        "powerpc64" if cfg!(target_endian = "little") => "ppc64le",
        "powerpc64" => "ppc64",
        "s390x" => "s390x",
        "riscv64" => "riscv64",
        "loongarch64" => "loong64",
        "mips64" if cfg!(target_endian = "little") => "mips64le",
        "mips" if cfg!(target_endian = "little") => "mipsle",
        other => other,
    }
}

/// Checks if building `arch` on `host_arch` requires emulation.
///
/// A target counts as native when it is a substring of the host name, so
/// `arm` is native on an `arm64` host.
pub fn needs_emulation(host_arch: &str, arch: &str) -> bool {
    !host_arch.contains(arch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oci_arch_names() {
        assert_eq!(oci_arch("x86_64"), "amd64");
        assert_eq!(oci_arch("aarch64"), "arm64");
        assert_eq!(oci_arch("x86"), "386");
        assert_eq!(oci_arch("s390x"), "s390x");
    }

    #[test]
    fn test_native_arch_matches_target() {
        #[cfg(target_arch = "x86_64")]
        assert_eq!(native_arch(), "amd64");

        #[cfg(target_arch = "aarch64")]
        assert_eq!(native_arch(), "arm64");

        assert!(!native_arch().is_empty());
    }

    #[test]
    fn test_needs_emulation() {
        assert!(!needs_emulation("amd64", "amd64"));
        assert!(needs_emulation("amd64", "arm64"));
        assert!(!needs_emulation("arm64", "arm"));
        assert!(needs_emulation("arm64", "arm/v7"));
    }
}
