//! The scan/bruteforce capability
//!
//! The interpreter never scans anything itself. It asks a `ScanBackend` and
//! turns the report into game events. Which backend runs is decided once, at
//! startup, from the `[backend]` config section.

pub mod http;
pub mod mock;
pub mod simulated;

pub use http::HttpBackend;
pub use mock::MockBackend;
pub use simulated::SimulatedBackend;

use crate::config::{BackendConfig, BackendKind};
use crate::data::Catalog;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// What a scan turned up
///
/// Also decodes the Python tool server's shape: `open_ports`, `os_info`,
/// services keyed by port, vulnerability objects, and no experience field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireScanReport")]
pub struct ScanReport {
    pub ports: Vec<u16>,
    pub services: Vec<String>, // Parallel to `ports`
    pub vulnerabilities: Vec<String>,
    pub os: String,
    pub detection_delta: u32,
    pub experience_delta: u32,
}

/// How a password attack went
///
/// The tool server reports `detection_level` and leaves out the rewards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BruteforceReport {
    pub success: bool,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(alias = "detection_level")]
    pub detection_delta: u32,
    #[serde(default, alias = "money_gained")]
    pub money_delta: u64,
    #[serde(default, alias = "experience_gained")]
    pub experience_delta: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireServices {
    Listed(Vec<String>),
    ByPort(BTreeMap<String, String>),
}

impl Default for WireServices {
    fn default() -> Self {
        WireServices::Listed(Vec::new())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireVulnerability {
    Tag(String),
    Detailed { name: String },
}

#[derive(Deserialize)]
struct WireScanReport {
    #[serde(alias = "open_ports")]
    ports: Vec<u16>,
    #[serde(default)]
    services: WireServices,
    #[serde(default)]
    vulnerabilities: Vec<WireVulnerability>,
    #[serde(alias = "os_info")]
    os: String,
    #[serde(alias = "detection_level")]
    detection_delta: u32,
    #[serde(default, alias = "experience_gained")]
    experience_delta: u32,
}

impl From<WireScanReport> for ScanReport {
    fn from(wire: WireScanReport) -> Self {
        let services = match wire.services {
            WireServices::Listed(services) => services,
            WireServices::ByPort(by_port) => wire
                .ports
                .iter()
                .map(|port| {
                    by_port
                        .get(&port.to_string())
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string())
                })
                .collect(),
        };
        let vulnerabilities = wire
            .vulnerabilities
            .into_iter()
            .map(|v| match v {
                WireVulnerability::Tag(tag) => tag,
                WireVulnerability::Detailed { name } => name,
            })
            .collect();

        Self {
            ports: wire.ports,
            services,
            vulnerabilities,
            os: wire.os,
            detection_delta: wire.detection_delta,
            experience_delta: wire.experience_delta,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed backend response: {0}")]
    Decode(String),

    #[error("unknown host {0}")]
    UnknownHost(String),
}

/// Capability that scans and bruteforces a target string
#[async_trait]
pub trait ScanBackend: Send + Sync {
    /// Short name for logs and the status line
    fn name(&self) -> &'static str;

    async fn scan(&self, target: &str) -> Result<ScanReport, BackendError>;

    async fn bruteforce(&self, target: &str) -> Result<BruteforceReport, BackendError>;
}

/// Build the backend the config asks for
pub fn build_backend(
    config: &BackendConfig,
    catalog: Arc<Catalog>,
) -> anyhow::Result<Arc<dyn ScanBackend>> {
    let backend: Arc<dyn ScanBackend> = match config.kind {
        BackendKind::Mock => Arc::new(MockBackend::new()),
        BackendKind::Simulated => Arc::new(SimulatedBackend::new(
            catalog,
            config.min_delay_ms,
            config.max_delay_ms,
        )),
        BackendKind::Http => Arc::new(HttpBackend::new(&config.url, config.timeout_secs)?),
    };
    tracing::info!(backend = backend.name(), "Scan backend ready");
    Ok(backend)
}
