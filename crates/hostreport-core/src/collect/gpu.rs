//! GPU inventory probes, one per host platform.
//!
//! Probes return raw names only; the collector substitutes the
//! `"Not detected"` sentinel when a probe finds nothing or fails.

use std::process::Command;

use crate::error::CollectionError;

const AMD_VENDOR: &str = "Advanced Micro Devices, Inc.";
const AMD_VENDOR_FULL: &str = "Advanced Micro Devices, Inc. [AMD/ATI]";

/// Lists GPU names on the current host.
pub trait GpuProbe {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn probe(&self) -> Result<Vec<String>, CollectionError>;
}

/// Linux: `lspci`, VGA controllers only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LspciProbe;

/// Windows: `wmic path win32_videocontroller get name`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WmicProbe;

/// Platforms without a probe.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGpuProbe;

impl GpuProbe for LspciProbe {
    fn name(&self) -> &'static str {
        "lspci"
    }

    fn probe(&self) -> Result<Vec<String>, CollectionError> {
        run("lspci", &[]).map(|out| parse_lspci(&out))
    }
}

impl GpuProbe for WmicProbe {
    fn name(&self) -> &'static str {
        "wmic"
    }

    fn probe(&self) -> Result<Vec<String>, CollectionError> {
        run("wmic", &["path", "win32_videocontroller", "get", "name"]).map(|out| parse_wmic(&out))
    }
}

impl GpuProbe for NoGpuProbe {
    fn name(&self) -> &'static str {
        "none"
    }

    fn probe(&self) -> Result<Vec<String>, CollectionError> {
        Ok(Vec::new())
    }
}

/// Probe matching the platform this binary was built for.
pub fn for_current_platform() -> Box<dyn GpuProbe + Send + Sync> {
    if cfg!(target_os = "linux") {
        Box::new(LspciProbe)
    } else if cfg!(target_os = "windows") {
        Box::new(WmicProbe)
    } else {
        Box::new(NoGpuProbe)
    }
}

fn run(program: &str, args: &[&str]) -> Result<String, CollectionError> {
    let command = std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| CollectionError::Command {
            command: command.clone(),
            detail: e.to_string(),
        })?;
    if !output.status.success() {
        return Err(CollectionError::Command {
            command,
            detail: format!("exited with {}", output.status),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Extract GPU names from `lspci` output.
///
/// `01:00.0 VGA compatible controller: NVIDIA Corporation GP104 [GeForce GTX 1080]`
/// yields `NVIDIA Corporation GP104 [GeForce GTX 1080]`; the long AMD vendor
/// prefix is shortened to `AMD`.
pub fn parse_lspci(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| line.contains("VGA compatible controller"))
        .filter_map(|line| line.splitn(3, ':').last())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            if name.contains(AMD_VENDOR) {
                name.replace(AMD_VENDOR_FULL, "AMD")
            } else {
                name.to_string()
            }
        })
        .collect()
}

/// Extract GPU names from `wmic ... get name` output (first line is the `Name` header).
pub fn parse_wmic(output: &str) -> Vec<String> {
    output
        .trim()
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
