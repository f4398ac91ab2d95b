//! The host snapshot delivered to the collector.

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Placeholder for a fact that could not be detected (also the empty-GPU sentinel).
pub const NOT_DETECTED: &str = "Not detected";

/// One immutable snapshot of host telemetry.
///
/// Serialized as the JSON body of `POST {host}/report`. The controller only
/// ever borrows it, so a payload is never mutated after capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// Capture time in seconds since the UNIX epoch.
    pub timestamp: i64,
    /// CPU architecture (e.g. `x86_64`, `aarch64`).
    pub arch: String,
    /// Operating system name (e.g. `Windows`, `Ubuntu`, `macOS`).
    pub os_name: String,
    /// Operating system version.
    pub os_version: String,
    /// CPU brand and model.
    pub cpu: String,
    /// Total RAM in whole gigabytes (10^9 bytes, rounded down).
    pub memory_gb: f64,
    /// GPU names; `["Not detected"]` when nothing was found.
    pub gpus: Vec<String>,
}

impl Payload {
    /// Capture time as a local date for log lines, e.g. `Monday, 19. October 2026 09:15AM`.
    pub fn captured_at(&self) -> String {
        match Local.timestamp_opt(self.timestamp, 0).single() {
            Some(t) => t.format("%A, %d. %B %Y %I:%M%p").to_string(),
            None => format!("@{}", self.timestamp),
        }
    }
}

/// Normalizes a detected GPU list: an empty list becomes `["Not detected"]`.
pub fn gpus_or_sentinel(gpus: Vec<String>) -> Vec<String> {
    if gpus.is_empty() {
        vec![NOT_DETECTED.to_string()]
    } else {
        gpus
    }
}

#[cfg(test)]
pub(crate) fn sample() -> Payload {
    Payload {
        timestamp: 1_700_000_000,
        arch: "x86_64".to_string(),
        os_name: "Debian GNU/Linux".to_string(),
        os_version: "12".to_string(),
        cpu: "AMD Ryzen 7 5800X 8-Core Processor".to_string(),
        memory_gb: 33.0,
        gpus: vec!["AMD Navi 44 [Radeon RX 9060 XT] (rev c0)".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_wire_field_names() {
        let v = serde_json::to_value(sample()).unwrap();
        let obj = v.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["arch", "cpu", "gpus", "memory_gb", "os_name", "os_version", "timestamp"]
        );
        assert!(obj["timestamp"].is_i64());
        assert!(obj["memory_gb"].is_number());
        assert!(obj["gpus"].is_array());
    }

    #[test]
    fn empty_gpu_list_becomes_sentinel() {
        assert_eq!(gpus_or_sentinel(Vec::new()), vec!["Not detected".to_string()]);
        let found = vec!["NVIDIA GeForce GTX 1080".to_string()];
        assert_eq!(gpus_or_sentinel(found.clone()), found);
    }

    #[test]
    fn captured_at_is_human_readable() {
        let s = sample().captured_at();
        assert!(s.contains("2023"), "{s}");
    }
}
