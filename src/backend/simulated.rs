//! Local simulation: randomized results with a fake network delay

use super::{BackendError, BruteforceReport, ScanBackend, ScanReport};
use crate::data::{Catalog, Target};
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

const PASSWORD_CHARS: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*";

/// Ports that sometimes show up on top of a target's known ones
const NOISE_PORTS: &[(u16, &str)] = &[
    (8080, "http-proxy"),
    (3389, "rdp"),
    (5432, "postgresql"),
    (27017, "mongodb"),
];

/// Randomized backend driven by the target catalog
pub struct SimulatedBackend {
    catalog: Arc<Catalog>,
    min_delay_ms: u64,
    max_delay_ms: u64,
}

impl SimulatedBackend {
    pub fn new(catalog: Arc<Catalog>, min_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            catalog,
            min_delay_ms: min_delay_ms.min(max_delay_ms),
            max_delay_ms: max_delay_ms.max(min_delay_ms),
        }
    }

    fn lookup(&self, target: &str) -> Result<&Target, BackendError> {
        self.catalog
            .find_target(target)
            .ok_or_else(|| BackendError::UnknownHost(target.to_string()))
    }

    fn delay(&self) -> Duration {
        let ms = rand::thread_rng().gen_range(self.min_delay_ms..=self.max_delay_ms);
        Duration::from_millis(ms)
    }

    fn roll_scan(target: &Target) -> ScanReport {
        let mut rng = rand::thread_rng();

        let mut ports = Vec::new();
        let mut services = Vec::new();
        for (i, port) in target.ports.iter().enumerate() {
            if rng.gen::<f32>() < 0.85 {
                ports.push(*port);
                if let Some(service) = target.services.get(i) {
                    services.push(service.clone());
                }
            }
        }
        if rng.gen::<f32>() < 0.3 {
            let (port, service) = NOISE_PORTS[rng.gen_range(0..NOISE_PORTS.len())];
            ports.push(port);
            services.push(service.to_string());
        }

        let vulnerabilities = target
            .vulnerabilities
            .iter()
            .filter(|_| rng.gen::<f32>() < 0.9)
            .cloned()
            .collect();

        ScanReport {
            ports,
            services,
            vulnerabilities,
            os: target.os.clone(),
            detection_delta: 8 + rng.gen_range(0..=4) + target.difficulty as u32,
            experience_delta: 40 + 10 * target.difficulty as u32,
        }
    }

    fn roll_bruteforce(target: &Target) -> BruteforceReport {
        let mut rng = rand::thread_rng();

        // Harder targets resist longer
        let chance = (0.8 - 0.15 * (target.difficulty as f32 - 1.0)).clamp(0.1, 0.9);
        let success = rng.gen::<f32>() < chance;

        let password = success.then(|| {
            (0..12)
                .map(|_| PASSWORD_CHARS[rng.gen_range(0..PASSWORD_CHARS.len())] as char)
                .collect::<String>()
        });

        BruteforceReport {
            success,
            password,
            detection_delta: 20 + 5 * target.difficulty as u32,
            money_delta: if success { 150 * target.difficulty as u64 } else { 0 },
            experience_delta: if success { 100 } else { 25 },
        }
    }
}

#[async_trait]
impl ScanBackend for SimulatedBackend {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn scan(&self, target: &str) -> Result<ScanReport, BackendError> {
        let report = Self::roll_scan(self.lookup(target)?);
        tokio::time::sleep(self.delay()).await;
        Ok(report)
    }

    async fn bruteforce(&self, target: &str) -> Result<BruteforceReport, BackendError> {
        let report = Self::roll_bruteforce(self.lookup(target)?);
        tokio::time::sleep(self.delay()).await;
        Ok(report)
    }
}
