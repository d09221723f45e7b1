//! Deterministic backend: answers immediately with a fixed payload

use super::{BackendError, BruteforceReport, ScanBackend, ScanReport};
use async_trait::async_trait;

/// Fixed-payload backend for tests and offline play
#[derive(Debug, Clone)]
pub struct MockBackend {
    scan: ScanReport,
    bruteforce: BruteforceReport,
    failing: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            scan: ScanReport {
                ports: vec![22, 80, 443],
                services: vec!["SSH".to_string(), "HTTP".to_string(), "HTTPS".to_string()],
                vulnerabilities: vec!["CVE-2021-1234".to_string()],
                os: "Linux 5.4.0".to_string(),
                detection_delta: 10,
                experience_delta: 25,
            },
            bruteforce: BruteforceReport {
                success: true,
                password: Some("hunter2".to_string()),
                detection_delta: 20,
                money_delta: 100,
                experience_delta: 50,
            },
            failing: false,
        }
    }

    pub fn with_scan(mut self, report: ScanReport) -> Self {
        self.scan = report;
        self
    }

    /// Make every bruteforce succeed or fail
    pub fn with_bruteforce_success(mut self, success: bool) -> Self {
        self.bruteforce.success = success;
        if success {
            self.bruteforce.password.get_or_insert_with(|| "hunter2".to_string());
        } else {
            self.bruteforce.password = None;
            self.bruteforce.money_delta = 0;
        }
        self
    }

    /// Make every call fail as if the backend were down
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    fn check(&self) -> Result<(), BackendError> {
        if self.failing {
            return Err(BackendError::Unreachable("mock backend offline".to_string()));
        }
        Ok(())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScanBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn scan(&self, _target: &str) -> Result<ScanReport, BackendError> {
        self.check()?;
        Ok(self.scan.clone())
    }

    async fn bruteforce(&self, _target: &str) -> Result<BruteforceReport, BackendError> {
        self.check()?;
        Ok(self.bruteforce.clone())
    }
}
