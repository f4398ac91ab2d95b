//! Host snapshot collection.
//!
//! The delivery controller only consumes a finished [`Payload`]; this module
//! is one way of producing it, backed by `sysinfo` and a per-platform
//! [`GpuProbe`].

pub mod gpu;
pub mod os;

use std::time::{SystemTime, UNIX_EPOCH};

use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

use crate::error::CollectionError;
use crate::payload::{gpus_or_sentinel, Payload, NOT_DETECTED};

pub use gpu::GpuProbe;

/// Produces a fully populated payload, or fails before anything is sent.
pub trait PayloadSource {
    fn collect(&self) -> Result<Payload, CollectionError>;
}

impl<F> PayloadSource for F
where
    F: Fn() -> Result<Payload, CollectionError>,
{
    fn collect(&self) -> Result<Payload, CollectionError> {
        self()
    }
}

/// Collects facts about the machine this process runs on.
pub struct HostCollector {
    gpu: Box<dyn GpuProbe + Send + Sync>,
}

impl HostCollector {
    /// Collector using the GPU probe for the current platform.
    pub fn new() -> Self {
        Self::with_gpu_probe(gpu::for_current_platform())
    }

    pub fn with_gpu_probe(gpu: Box<dyn GpuProbe + Send + Sync>) -> Self {
        Self { gpu }
    }

    fn gpus(&self) -> Vec<String> {
        match self.gpu.probe() {
            Ok(found) => {
                tracing::debug!(probe = self.gpu.name(), count = found.len(), "GPU probe finished");
                gpus_or_sentinel(found)
            }
            Err(e) => {
                tracing::warn!(probe = self.gpu.name(), "GPU detection failed: {}", e);
                vec![NOT_DETECTED.to_string()]
            }
        }
    }
}

impl Default for HostCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadSource for HostCollector {
    fn collect(&self) -> Result<Payload, CollectionError> {
        tracing::info!("gathering system information");
        let sys = System::new_with_specifics(
            RefreshKind::nothing()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );

        let total_memory = sys.total_memory();
        if total_memory == 0 {
            return Err(CollectionError::Memory);
        }

        let cpu = sys
            .cpus()
            .first()
            .map(|c| c.brand().trim().to_string())
            .filter(|brand| !brand.is_empty())
            .unwrap_or_else(|| NOT_DETECTED.to_string());

        // Linux reports the distribution's pretty identity when os-release has one.
        let (pretty_name, pretty_version) = if cfg!(target_os = "linux") {
            os::read_os_release()
        } else {
            (None, None)
        };
        let (os_name, os_version) = os::os_identity(
            std::env::consts::OS,
            pretty_name.or_else(System::name),
            pretty_version.or_else(System::os_version),
            System::kernel_version(),
        );

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| CollectionError::Clock)?
            .as_secs();

        Ok(Payload {
            timestamp: i64::try_from(timestamp).unwrap_or(i64::MAX),
            arch: std::env::consts::ARCH.to_string(),
            os_name,
            os_version,
            cpu,
            memory_gb: os::memory_gb(total_memory),
            gpus: self.gpus(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<Vec<String>, ()>);

    impl GpuProbe for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn probe(&self) -> Result<Vec<String>, CollectionError> {
            self.0.clone().map_err(|()| CollectionError::Command {
                command: "fixed".to_string(),
                detail: "unavailable".to_string(),
            })
        }
    }

    #[test]
    fn empty_probe_yields_sentinel() {
        let c = HostCollector::with_gpu_probe(Box::new(Fixed(Ok(Vec::new()))));
        assert_eq!(c.gpus(), vec!["Not detected".to_string()]);
    }

    #[test]
    fn failing_probe_yields_sentinel() {
        let c = HostCollector::with_gpu_probe(Box::new(Fixed(Err(()))));
        assert_eq!(c.gpus(), vec!["Not detected".to_string()]);
    }

    #[test]
    fn probe_results_pass_through() {
        let names = vec!["AMD Navi 44".to_string(), "Intel UHD 770".to_string()];
        let c = HostCollector::with_gpu_probe(Box::new(Fixed(Ok(names.clone()))));
        assert_eq!(c.gpus(), names);
    }

    #[test]
    fn collects_current_host() {
        let c = HostCollector::with_gpu_probe(Box::new(Fixed(Ok(Vec::new()))));
        let p = c.collect().unwrap();
        assert_eq!(p.arch, std::env::consts::ARCH);
        assert!(!p.os_name.is_empty());
        assert!(!p.cpu.is_empty());
        assert!(p.timestamp > 1_600_000_000);
        assert_eq!(p.memory_gb, p.memory_gb.floor());
        assert_eq!(p.gpus, vec!["Not detected".to_string()]);
    }

    #[test]
    fn closures_are_payload_sources() {
        let source = || -> Result<Payload, CollectionError> { Err(CollectionError::Memory) };
        assert!(matches!(source.collect(), Err(CollectionError::Memory)));
    }
}
