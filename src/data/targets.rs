//! Targets the player can attack

use serde::{Deserialize, Serialize};

/// Payout for breaching a target the first time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub xp: u32,
    pub money: u64,
}

/// A simulated attack surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: String,              // Short handle typed at the prompt
    pub name: String,
    pub ip: String,              // Unique key
    pub difficulty: u8,          // 1-5
    pub os: String,
    pub description: String,
    pub ports: Vec<u16>,
    pub services: Vec<String>,
    pub vulnerabilities: Vec<String>,
    pub reward: Reward,
}

impl Target {
    /// Does `query` name this target by id, ip or full name?
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        self.ip == query
            || self.id.eq_ignore_ascii_case(query)
            || self.name.eq_ignore_ascii_case(query)
    }

    pub fn label(&self) -> String {
        format!("{} ({})", self.ip, self.name)
    }

    pub fn difficulty_stars(&self) -> String {
        "*".repeat(self.difficulty as usize)
    }
}

/// Build the target catalog
pub fn create_target_catalog() -> Vec<Target> {
    vec![
        Target {
            id: "testserver".to_string(),
            name: "Local Test Server".to_string(),
            ip: "192.168.1.100".to_string(),
            difficulty: 1,
            os: "Ubuntu 20.04 LTS".to_string(),
            description: "A forgotten staging box on the office LAN".to_string(),
            ports: vec![22, 80, 443],
            services: vec!["ssh".to_string(), "http".to_string(), "https".to_string()],
            vulnerabilities: vec!["weak_password".to_string(), "open_ports".to_string()],
            reward: Reward { xp: 100, money: 500 },
        },
        Target {
            id: "cloud".to_string(),
            name: "Cloud Storage".to_string(),
            ip: "172.16.0.25".to_string(),
            difficulty: 2,
            os: "CentOS 8".to_string(),
            description: "File shares exported straight to the internet".to_string(),
            ports: vec![21, 2049],
            services: vec!["ftp".to_string(), "nfs".to_string()],
            vulnerabilities: vec!["misconfiguration".to_string(), "default_credentials".to_string()],
            reward: Reward { xp: 200, money: 1000 },
        },
        Target {
            id: "corpdb".to_string(),
            name: "Corporate Database".to_string(),
            ip: "10.0.0.50".to_string(),
            difficulty: 3,
            os: "Windows Server 2019".to_string(),
            description: "Customer records behind an unpatched SQL front end".to_string(),
            ports: vec![1433, 3306],
            services: vec!["mssql".to_string(), "mysql".to_string()],
            vulnerabilities: vec!["sql_injection".to_string(), "outdated_software".to_string()],
            reward: Reward { xp: 400, money: 2000 },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_by_id_ip_and_name() {
        let catalog = create_target_catalog();
        let db = catalog.iter().find(|t| t.id == "corpdb").unwrap();
        assert!(db.matches("10.0.0.50"));
        assert!(db.matches("CorpDB"));
        assert!(db.matches("corporate database"));
        assert!(!db.matches("10.0.0.5"));
    }
}
