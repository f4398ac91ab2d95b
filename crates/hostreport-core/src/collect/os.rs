//! OS identity and memory size from raw host facts.

/// `(os_name, os_version)` for a platform (`std::env::consts::OS` spelling).
///
/// `name`/`version` are the distribution or product identity reported by the
/// host, `kernel` the kernel release; any of them may be missing.
pub fn os_identity(
    platform: &str,
    name: Option<String>,
    version: Option<String>,
    kernel: Option<String>,
) -> (String, String) {
    let unknown = || "unknown".to_string();
    match platform {
        "windows" => ("Windows".to_string(), version.or(kernel).unwrap_or_else(unknown)),
        "macos" => ("macOS".to_string(), version.unwrap_or_else(unknown)),
        "linux" => match name {
            Some(distro) => (distro, version.or(kernel).unwrap_or_else(unknown)),
            None => ("Linux".to_string(), kernel.unwrap_or_else(unknown)),
        },
        other => (other.to_string(), kernel.unwrap_or_else(unknown)),
    }
}

/// Files holding the distribution identity, in lookup order.
const OS_RELEASE_PATHS: [&str; 2] = ["/etc/os-release", "/usr/lib/os-release"];

/// Pretty distribution name and version from the host's os-release file.
///
/// Both are `None` when no os-release file is readable.
pub fn read_os_release() -> (Option<String>, Option<String>) {
    OS_RELEASE_PATHS
        .iter()
        .find_map(|path| std::fs::read_to_string(path).ok())
        .map(|text| parse_os_release(&text))
        .unwrap_or_default()
}

/// `(PRETTY_NAME, "VERSION_ID (VERSION_CODENAME)")` from os-release text.
///
/// `Debian GNU/Linux 12 (bookworm)` and `12 (bookworm)` for Debian 12. The
/// codename is omitted when absent; a missing `PRETTY_NAME` falls back to `NAME`.
pub fn parse_os_release(text: &str) -> (Option<String>, Option<String>) {
    let field = |key: &str| {
        text.lines()
            .filter_map(|line| line.trim().split_once('='))
            .find(|(k, _)| k.trim() == key)
            .map(|(_, v)| v.trim().trim_matches(|c: char| c == '"' || c == '\'').to_string())
            .filter(|v| !v.is_empty())
    };

    let name = field("PRETTY_NAME").or_else(|| field("NAME"));
    let version = field("VERSION_ID").map(|id| match field("VERSION_CODENAME") {
        Some(codename) => format!("{} ({})", id, codename),
        None => id,
    });
    (name, version)
}

/// Whole gigabytes (10^9 bytes), rounded down.
pub fn memory_gb(total_bytes: u64) -> f64 {
    (total_bytes / 1_000_000_000) as f64
}
