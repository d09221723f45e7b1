//! Command handlers
//!
//! A `CommandRegistry` is built for a single invocation from a snapshot of
//! the game state. Handlers read the snapshot, may call the scan backend,
//! and return a `CommandResult` whose effects describe every state change.

use super::command::{Command, CommandError, COMMAND_TABLE};
use super::odds::{
    Dice, Intrusion, Odds, ToolEdge, BRUTEFORCE_RETRY_BASE, BRUTEFORCE_RETRY_STEALTH_SHIFT,
    DATABASE_DECRYPT, FIREWALL_BYPASS,
};
use super::result::CommandResult;
use super::state::{GameEvent, GameState, Rules};
use super::transcript::{Progress, TranscriptEntry};
use crate::backend::{BackendError, ScanBackend};
use crate::data::{find_file, Catalog, Program, Target, HOME_FILES};
use tracing::{debug, warn};

/// Handlers bound to one state snapshot
pub struct CommandRegistry<'a> {
    state: &'a GameState,
    rules: &'a Rules,
    catalog: &'a Catalog,
    backend: &'a dyn ScanBackend,
    dice: &'a dyn Dice,
    progress: &'a Progress,
}

impl<'a> CommandRegistry<'a> {
    pub fn new(
        state: &'a GameState,
        rules: &'a Rules,
        catalog: &'a Catalog,
        backend: &'a dyn ScanBackend,
        dice: &'a dyn Dice,
        progress: &'a Progress,
    ) -> Self {
        Self { state, rules, catalog, backend, dice, progress }
    }

    /// Run a parsed command against the snapshot
    pub async fn run(&self, command: &Command) -> Result<CommandResult, CommandError> {
        match command {
            Command::Help => Ok(self.help()),
            Command::Clear => Ok(CommandResult::cleared()),
            Command::Status => Ok(self.status()),
            Command::Targets => Ok(self.targets()),
            Command::Programs => Ok(self.programs()),
            Command::Scan { target } => self.scan(target).await,
            Command::Bruteforce { target } => self.bruteforce(target).await,
            Command::Bypass { target } => self.intrude(&FIREWALL_BYPASS, target),
            Command::Decrypt { target } => self.intrude(&DATABASE_DECRYPT, target),
            Command::Connect { target } => self.connect(target),
            Command::Stealth(enabled) => Ok(self.stealth(*enabled)),
            Command::Buy { program } => self.buy(program),
            Command::Upgrade { program } => self.upgrade(program),
            Command::Ls => Ok(self.ls()),
            Command::Cat { file } => self.cat(file),
        }
    }

    fn help(&self) -> CommandResult {
        let mut lines = vec!["Available commands:".to_string()];
        for spec in COMMAND_TABLE {
            let aliases = &spec.keywords[1..];
            if aliases.is_empty() {
                lines.push(format!("  {:<22} {}", spec.usage, spec.summary));
            } else {
                lines.push(format!(
                    "  {:<22} {} (also: {})",
                    spec.usage,
                    spec.summary,
                    aliases.join(", ")
                ));
            }
        }
        CommandResult::ok(lines.join("\n"))
    }

    fn status(&self) -> CommandResult {
        let state = self.state;
        let connection = match &state.current_target {
            Some(ip) => match self.catalog.find_target(ip) {
                Some(target) => format!("Connected to: {}", target.label()),
                None => format!("Connected to: {}", ip),
            },
            None => "Not connected to any target".to_string(),
        };
        let programs = state
            .inventory
            .iter()
            .map(|(name, installed)| format!("{} (tier {})", name, installed.tier))
            .collect::<Vec<_>>()
            .join(", ");

        let mut lines = vec![
            "System Status:".to_string(),
            format!("  Level: {}", state.level),
            format!(
                "  Experience: {}/{} ({}%)",
                state.experience,
                state.experience_threshold(self.rules),
                state.level_progress(self.rules)
            ),
            format!("  Money: ${}", state.money),
            format!("  Detection Level: {}%", state.detection_level),
            format!(
                "  Stealth Mode: {}",
                if state.stealth_mode { "Enabled" } else { "Disabled" }
            ),
            format!("  {}", connection),
            format!("  Programs: {}", programs),
        ];
        if !state.discovered_vulnerabilities.is_empty() {
            lines.push(format!(
                "  Discovered: {}",
                state.discovered_vulnerabilities.join(", ")
            ));
        }
        CommandResult::ok(lines.join("\n"))
    }

    fn targets(&self) -> CommandResult {
        if self.catalog.targets.is_empty() {
            return CommandResult::failure("No targets available.");
        }
        let mut lines = vec!["Available targets:".to_string()];
        for target in &self.catalog.targets {
            let breached = if self.state.compromised.contains(&target.ip) {
                " [COMPROMISED]"
            } else {
                ""
            };
            lines.push(format!(
                "  {:<15} {:<10} {} {}{}",
                target.ip,
                target.id,
                target.difficulty_stars(),
                target.name,
                breached
            ));
            lines.push(format!("      {}", target.description));
        }
        CommandResult::ok(lines.join("\n"))
    }

    fn programs(&self) -> CommandResult {
        if self.catalog.programs.is_empty() {
            return CommandResult::failure("No programs available.");
        }
        let mut lines = vec!["Program store:".to_string()];
        for program in &self.catalog.programs {
            let status = match self.state.inventory.get(&program.name) {
                Some(installed) => format!(
                    "[OWNED tier {}, upgrade ${}]",
                    installed.tier, installed.upgrade_cost
                ),
                None if program.is_locked_for(self.state.level) => {
                    format!("[LOCKED until level {}]", program.level)
                }
                None => format!("${}", program.price),
            };
            lines.push(format!(
                "  {} {:<13} {:<28} {}",
                program.program_type.icon(),
                program.name,
                status,
                program.description
            ));
            lines.push(format!(
                "      {}% success, provides: {}",
                program.success_rate,
                program.commands.join(", ")
            ));
        }
        CommandResult::ok(lines.join("\n"))
    }

    async fn scan(&self, query: &str) -> Result<CommandResult, CommandError> {
        let target = self.resolve_target(query)?;
        self.progress
            .emit(TranscriptEntry::info(format!("Scanning {}...", target.label())));

        let report = match self.backend.scan(&target.ip).await {
            Ok(report) => report,
            Err(err) => return Ok(self.capability_failed("Scan", target, err)),
        };
        debug!(ip = %target.ip, ports = report.ports.len(), "Scan report received");

        let mut lines = vec![
            format!("Scan of {} complete.", target.label()),
            format!("  OS: {}", report.os),
        ];
        if report.ports.is_empty() {
            lines.push("  No open ports found.".to_string());
        } else {
            lines.push("  Open ports:".to_string());
            for (i, port) in report.ports.iter().enumerate() {
                let service = report.services.get(i).map(|s| s.as_str()).unwrap_or("unknown");
                lines.push(format!("    {}/tcp  open  {}", port, service));
            }
        }
        if report.vulnerabilities.is_empty() {
            lines.push("  No vulnerabilities found.".to_string());
        } else {
            lines.push(format!("  Vulnerabilities: {}", report.vulnerabilities.join(", ")));
        }

        let (detection, experience) = match ToolEdge::best(self.state, self.catalog, "scan") {
            Some(edge) => {
                if edge.quiet_percent() > 0 {
                    lines.push(format!(
                        "  {} tier {}: -{}% detection, +{}% XP",
                        edge.program.name,
                        edge.tier,
                        edge.quiet_percent(),
                        edge.experience_percent()
                    ));
                }
                (
                    edge.soften_detection(report.detection_delta),
                    edge.boost_experience(report.experience_delta),
                )
            }
            None => (report.detection_delta, report.experience_delta),
        };
        lines.push(self.detection_line(detection));
        if experience > 0 {
            lines.push(format!("  +{} XP", experience));
        }

        let mut result = CommandResult::ok(lines.join("\n"))
            .with_effect(GameEvent::RaiseDetection(detection))
            .with_effect(GameEvent::GainExperience(experience));
        if !report.vulnerabilities.is_empty() {
            result = result.with_effect(GameEvent::Discover(report.vulnerabilities));
        }
        Ok(result)
    }

    async fn bruteforce(&self, query: &str) -> Result<CommandResult, CommandError> {
        let target = self.resolve_target(query)?;
        self.require_connection(target)?;

        self.progress.emit(TranscriptEntry::info(format!(
            "Attempting to bruteforce {}...",
            target.label()
        )));

        let report = match self.backend.bruteforce(&target.ip).await {
            Ok(report) => report,
            Err(err) => return Ok(self.capability_failed("Bruteforce", target, err)),
        };

        let mut notes = Vec::new();
        let cracked = report.success || self.second_pass(target, &mut notes);

        if !cracked {
            let mut lines = vec![format!(
                "Bruteforce of {} failed. No valid credentials found.",
                target.label()
            )];
            lines.extend(notes);
            lines.push(self.detection_line(report.detection_delta));
            return Ok(CommandResult::failure(lines.join("\n"))
                .with_effect(GameEvent::RaiseDetection(report.detection_delta)));
        }

        let mut lines = vec![format!("Password cracked for {}!", target.label())];
        if let Some(password) = &report.password {
            lines.push(format!("  Password: {}", password));
        }
        lines.extend(notes);
        lines.push(self.detection_line(report.detection_delta));

        let mut money = report.money_delta;
        let mut experience = report.experience_delta;
        let mut effects = vec![GameEvent::RaiseDetection(report.detection_delta)];
        if !self.state.compromised.contains(&target.ip) {
            money = money.saturating_add(target.reward.money);
            experience = experience.saturating_add(target.reward.xp);
            effects.push(GameEvent::Compromise(target.ip.clone()));
            lines.push(format!("  {} compromised for the first time!", target.name));
        }
        lines.push(format!("  +${}  +{} XP", money, experience));
        effects.push(GameEvent::GainMoney(money));
        effects.push(GameEvent::GainExperience(experience));

        Ok(CommandResult::ok(lines.join("\n")).with_effects(effects))
    }

    /// An owned cracker retries a failed attack
    fn second_pass(&self, target: &Target, notes: &mut Vec<String>) -> bool {
        let Some(edge) = ToolEdge::best(self.state, self.catalog, "bruteforce") else {
            return false;
        };
        let odds = Odds::new(BRUTEFORCE_RETRY_BASE)
            .level(self.state.level)
            .stealth(self.state.stealth_mode, BRUTEFORCE_RETRY_STEALTH_SHIFT)
            .tool(Some(edge));
        let cracked = odds.succeeds(self.dice);
        debug!(ip = %target.ip, tool = %edge.program.name, chance = odds.percent(), cracked, "Bruteforce second pass");

        notes.push(if cracked {
            format!("  {} cracked it on a second pass ({}% chance).", edge.program.name, odds.percent())
        } else {
            format!("  {} second pass failed ({}% chance).", edge.program.name, odds.percent())
        });
        cracked
    }

    fn intrude(&self, intrusion: &Intrusion, query: &str) -> Result<CommandResult, CommandError> {
        let target = self.resolve_target(query)?;
        let edge = ToolEdge::best(self.state, self.catalog, intrusion.verb).ok_or_else(|| {
            let sellers = self
                .catalog
                .programs
                .iter()
                .filter(|p| p.provides(intrusion.verb))
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            CommandError::Precondition(format!(
                "No program to {} with. Buy one of: {}.",
                intrusion.verb, sellers
            ))
        })?;
        self.require_connection(target)?;

        let odds = intrusion.odds(self.state, Some(edge));
        self.progress.emit(TranscriptEntry::info(format!(
            "{} {} with {} ({}% chance)...",
            intrusion.progress,
            target.label(),
            edge.program.name,
            odds.percent()
        )));

        let success = odds.succeeds(self.dice);
        debug!(ip = %target.ip, verb = intrusion.verb, chance = odds.percent(), success, "Intrusion resolved");

        let mut effects = vec![GameEvent::RaiseDetection(intrusion.detection)];
        let (text, reward) = if success {
            effects.push(GameEvent::GainMoney(intrusion.success_money));
            effects.push(GameEvent::GainExperience(intrusion.success_xp));
            (
                intrusion.success_text,
                format!("  +${}  +{} XP", intrusion.success_money, intrusion.success_xp),
            )
        } else {
            effects.push(GameEvent::GainExperience(intrusion.failure_xp));
            (intrusion.failure_text, format!("  +{} XP", intrusion.failure_xp))
        };
        let message = [
            text.to_string(),
            self.detection_line(intrusion.detection),
            reward,
        ]
        .join("\n");

        let result = if success {
            CommandResult::ok(message)
        } else {
            CommandResult::failure(message)
        };
        Ok(result.with_effects(effects))
    }

    fn connect(&self, query: &str) -> Result<CommandResult, CommandError> {
        let target = self.resolve_target(query)?;
        self.progress.emit(TranscriptEntry::info(format!(
            "Connecting to {}...",
            target.label()
        )));

        let message = [
            format!("Connected to {}.", target.label()),
            format!("  OS: {}", target.os),
            format!("  {}", target.description),
        ]
        .join("\n");
        Ok(CommandResult::ok(message)
            .with_effect(GameEvent::Connect(target.ip.clone()))
            .with_effect(GameEvent::RaiseDetection(self.rules.connect_detection)))
    }

    fn stealth(&self, enabled: bool) -> CommandResult {
        let message = if enabled {
            "Stealth mode enabled. Detection gains are halved."
        } else {
            "Stealth mode disabled."
        };
        CommandResult::ok(message).with_effect(GameEvent::SetStealth(enabled))
    }

    fn buy(&self, name: &str) -> Result<CommandResult, CommandError> {
        let program = self.resolve_program(name)?;
        if self.state.owns(&program.name) {
            return Err(CommandError::Precondition(format!(
                "{} is already owned.",
                program.name
            )));
        }
        if program.is_locked_for(self.state.level) {
            return Err(CommandError::Precondition(format!(
                "Level too low to buy {}. Requires level {}.",
                program.name, program.level
            )));
        }
        if self.state.money < program.price {
            return Err(CommandError::Precondition(format!(
                "Not enough money to buy {}. Need ${}.",
                program.name, program.price
            )));
        }

        Ok(CommandResult::ok(format!("Purchased {} for ${}.", program.name, program.price))
            .with_effect(GameEvent::SpendMoney(program.price))
            .with_effect(GameEvent::Install {
                program: program.name.clone(),
                upgrade_cost: program.upgrade_cost,
            }))
    }

    fn upgrade(&self, name: &str) -> Result<CommandResult, CommandError> {
        let program = self.resolve_program(name)?;
        let installed = self.state.inventory.get(&program.name).ok_or_else(|| {
            CommandError::Precondition(format!(
                "You don't own {}. Buy it first.",
                program.name
            ))
        })?;
        let cost = installed.upgrade_cost;
        if self.state.money < cost {
            return Err(CommandError::Precondition(format!(
                "Not enough money to upgrade {}. Need ${}.",
                program.name, cost
            )));
        }

        let next_cost = self.rules.next_upgrade_cost(cost);
        Ok(CommandResult::ok(format!(
            "Upgraded {} to tier {} for ${}. Next upgrade costs ${}.",
            program.name,
            installed.tier + 1,
            cost,
            next_cost
        ))
        .with_effect(GameEvent::SpendMoney(cost))
        .with_effect(GameEvent::Upgrade {
            program: program.name.clone(),
            next_cost,
        }))
    }

    fn ls(&self) -> CommandResult {
        let mut lines = vec!["Available files:".to_string()];
        lines.extend(HOME_FILES.iter().map(|f| format!("  {}", f.name)));
        CommandResult::ok(lines.join("\n"))
    }

    fn cat(&self, name: &str) -> Result<CommandResult, CommandError> {
        let file = find_file(name).ok_or_else(|| CommandError::NotFound {
            kind: "File",
            name: name.to_string(),
        })?;
        Ok(CommandResult::ok(file.body))
    }

    fn require_connection(&self, target: &Target) -> Result<(), CommandError> {
        if self.rules.bruteforce_requires_connection
            && self.state.current_target.as_deref() != Some(target.ip.as_str())
        {
            return Err(CommandError::Precondition(format!(
                "Not connected to {}. Run 'connect {}' first.",
                target.ip, target.id
            )));
        }
        Ok(())
    }

    fn resolve_target(&self, query: &str) -> Result<&'a Target, CommandError> {
        self.catalog
            .find_target(query)
            .ok_or_else(|| CommandError::NotFound {
                kind: "Target",
                name: query.to_string(),
            })
    }

    fn resolve_program(&self, name: &str) -> Result<&'a Program, CommandError> {
        self.catalog
            .find_program(name)
            .ok_or_else(|| CommandError::NotFound {
                kind: "Program",
                name: name.to_string(),
            })
    }

    fn detection_line(&self, raw: u32) -> String {
        format!(
            "  Detection level increased by {}%",
            self.state.effective_detection(raw)
        )
    }

    // The attempt was noticed even though it produced nothing
    fn capability_failed(&self, action: &str, target: &Target, err: BackendError) -> CommandResult {
        warn!(ip = %target.ip, error = %err, "{} capability failed", action);
        let penalty = self.rules.failed_attempt_detection;
        let message = [
            format!("{} of {} failed: {}", action, target.label(), err),
            self.detection_line(penalty),
        ]
        .join("\n");
        CommandResult::failure(message).with_effect(GameEvent::RaiseDetection(penalty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use crate::game::odds::FixedDice;
    use crate::game::state::InstalledProgram;

    struct Fixture {
        state: GameState,
        rules: Rules,
        catalog: Catalog,
        backend: MockBackend,
        dice: FixedDice,
        progress: Progress,
    }

    impl Fixture {
        fn new() -> Self {
            let rules = Rules::default();
            let catalog = Catalog::standard();
            Self {
                state: GameState::new(&rules, &catalog),
                rules,
                catalog,
                backend: MockBackend::new(),
                dice: FixedDice(0.0),
                progress: Progress::default(),
            }
        }

        fn install(&mut self, program: &str, tier: u32) {
            self.state
                .inventory
                .insert(program.to_string(), InstalledProgram { tier, upgrade_cost: 1000 });
        }

        async fn run(&self, command: Command) -> Result<CommandResult, CommandError> {
            CommandRegistry::new(
                &self.state,
                &self.rules,
                &self.catalog,
                &self.backend,
                &self.dice,
                &self.progress,
            )
            .run(&command)
            .await
        }
    }

    #[tokio::test]
    async fn scan_reports_and_raises_detection() {
        let fixture = Fixture::new();
        let result = fixture
            .run(Command::Scan { target: "testserver".to_string() })
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.message.contains("22/tcp"));
        assert_eq!(result.detection_raised(), 10);
        assert_eq!(result.experience_gained(), 25);
        assert!(result
            .effects
            .contains(&GameEvent::Discover(vec!["CVE-2021-1234".to_string()])));
    }

    #[tokio::test]
    async fn scan_emits_progress_before_finishing() {
        let fixture = Fixture::new();
        fixture
            .run(Command::Scan { target: "10.0.0.50".to_string() })
            .await
            .unwrap();
        let lines = fixture.progress.into_lines();
        assert_eq!(lines[0].text, "Scanning 10.0.0.50 (Corporate Database)...");
    }

    #[tokio::test]
    async fn unknown_target_is_not_found() {
        let fixture = Fixture::new();
        let err = fixture
            .run(Command::Scan { target: "nowhere".to_string() })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Target nowhere not found.");
    }

    #[tokio::test]
    async fn bruteforce_needs_a_connection() {
        let fixture = Fixture::new();
        let err = fixture
            .run(Command::Bruteforce { target: "testserver".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Precondition(_)));
    }

    #[tokio::test]
    async fn first_breach_pays_the_target_reward() {
        let mut fixture = Fixture::new();
        fixture.state.current_target = Some("192.168.1.100".to_string());
        let result = fixture
            .run(Command::Bruteforce { target: "testserver".to_string() })
            .await
            .unwrap();
        // Mock pays $100 and 50 XP, the target adds $500 and 100 XP
        assert_eq!(result.money_delta(), 600);
        assert_eq!(result.experience_gained(), 150);
        assert!(result.effects.contains(&GameEvent::Compromise("192.168.1.100".to_string())));

        fixture.state.compromised.insert("192.168.1.100".to_string());
        let again = fixture
            .run(Command::Bruteforce { target: "testserver".to_string() })
            .await
            .unwrap();
        assert_eq!(again.money_delta(), 100);
    }

    #[tokio::test]
    async fn failed_bruteforce_only_raises_detection() {
        let mut fixture = Fixture::new();
        fixture.backend = MockBackend::new().with_bruteforce_success(false);
        fixture.state.current_target = Some("192.168.1.100".to_string());
        let result = fixture
            .run(Command::Bruteforce { target: "testserver".to_string() })
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.effects, vec![GameEvent::RaiseDetection(20)]);
    }

    #[tokio::test]
    async fn capability_error_costs_the_penalty() {
        let mut fixture = Fixture::new();
        fixture.backend = MockBackend::new().failing();
        let result = fixture
            .run(Command::Scan { target: "cloud".to_string() })
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.effects, vec![GameEvent::RaiseDetection(5)]);
    }

    #[tokio::test]
    async fn buy_checks_ownership_level_then_money() {
        let mut fixture = Fixture::new();
        let owned = fixture.run(Command::Buy { program: "nmap".to_string() }).await.unwrap_err();
        assert!(owned.to_string().contains("already owned"));

        let locked = fixture.run(Command::Buy { program: "hydra".to_string() }).await.unwrap_err();
        assert!(locked.to_string().contains("Level too low"));

        fixture.state.level = 2;
        fixture.state.money = 999;
        let poor = fixture.run(Command::Buy { program: "hydra".to_string() }).await.unwrap_err();
        assert!(poor.to_string().contains("Not enough money"));

        fixture.state.money = 1000;
        let bought = fixture.run(Command::Buy { program: "HYDRA".to_string() }).await.unwrap();
        assert_eq!(bought.money_delta(), -1000);
    }

    #[tokio::test]
    async fn upgrade_charges_current_cost() {
        let fixture = Fixture::new();
        let result = fixture
            .run(Command::Upgrade { program: "nmap".to_string() })
            .await
            .unwrap();
        assert_eq!(result.money_delta(), -250);
        assert!(result.effects.contains(&GameEvent::Upgrade {
            program: "nmap".to_string(),
            next_cost: 375,
        }));
    }

    #[tokio::test]
    async fn cat_reads_fake_files() {
        let fixture = Fixture::new();
        let result = fixture.run(Command::Cat { file: "readme.txt".to_string() }).await.unwrap();
        assert!(result.success);
        let err = fixture
            .run(Command::Cat { file: "passwd".to_string() })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "File passwd not found.");
    }

    #[tokio::test]
    async fn upgraded_scanner_is_quieter_and_learns_more() {
        let mut fixture = Fixture::new();
        let scan = Command::Scan { target: "testserver".to_string() };

        let stock = fixture.run(scan.clone()).await.unwrap();
        assert_eq!(stock.detection_raised(), 10);
        assert_eq!(stock.experience_gained(), 25);

        fixture.install("nmap", 3);
        let tuned = fixture.run(scan).await.unwrap();
        assert_eq!(tuned.detection_raised(), 8);
        assert_eq!(tuned.experience_gained(), 30);
        assert!(tuned.message.contains("nmap tier 3"));
    }

    #[tokio::test]
    async fn owned_cracker_retries_a_failed_attack() {
        let mut fixture = Fixture::new();
        fixture.backend = MockBackend::new().with_bruteforce_success(false);
        fixture.state.current_target = Some("192.168.1.100".to_string());
        let attack = Command::Bruteforce { target: "testserver".to_string() };

        // No cracker owned, the capability's answer stands
        let bare = fixture.run(attack.clone()).await.unwrap();
        assert!(!bare.success);

        fixture.install("hydra", 1);
        let retried = fixture.run(attack.clone()).await.unwrap();
        assert!(retried.success);
        assert!(retried.message.contains("hydra cracked it on a second pass"));
        assert!(retried.effects.contains(&GameEvent::Compromise("192.168.1.100".to_string())));

        fixture.dice = FixedDice(0.99);
        let unlucky = fixture.run(attack).await.unwrap();
        assert!(!unlucky.success);
        assert_eq!(unlucky.effects, vec![GameEvent::RaiseDetection(20)]);
        assert!(unlucky.message.contains("hydra second pass failed"));
    }

    #[tokio::test]
    async fn bypass_needs_a_firewall_program() {
        let mut fixture = Fixture::new();
        fixture.state.current_target = Some("10.0.0.50".to_string());
        let err = fixture
            .run(Command::Bypass { target: "corpdb".to_string() })
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "No program to bypass with. Buy one of: ghostwall, metasploit."
        );
    }

    #[tokio::test]
    async fn bypass_pays_on_success_and_teaches_on_failure() {
        let mut fixture = Fixture::new();
        fixture.install("ghostwall", 1);
        fixture.state.current_target = Some("10.0.0.50".to_string());
        let bypass = Command::Bypass { target: "corpdb".to_string() };

        let won = fixture.run(bypass.clone()).await.unwrap();
        assert!(won.success);
        assert_eq!(won.money_delta(), 750);
        assert_eq!(won.experience_gained(), 150);
        assert_eq!(won.detection_raised(), 20);

        fixture.dice = FixedDice(0.99);
        let lost = fixture.run(bypass).await.unwrap();
        assert!(!lost.success);
        assert_eq!(lost.money_delta(), 0);
        assert_eq!(lost.experience_gained(), 30);
        assert_eq!(lost.detection_raised(), 20);
    }

    #[tokio::test]
    async fn decrypt_requires_a_connection() {
        let mut fixture = Fixture::new();
        fixture.install("cryptbreaker", 1);
        let err = fixture
            .run(Command::Decrypt { target: "corpdb".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Precondition(_)));

        fixture.state.current_target = Some("10.0.0.50".to_string());
        let result = fixture
            .run(Command::Decrypt { target: "corpdb".to_string() })
            .await
            .unwrap();
        assert_eq!(result.money_delta(), 1000);
        let lines = fixture.progress.into_lines();
        assert!(lines[0].text.starts_with("Decrypting database on 10.0.0.50 (Corporate Database) with cryptbreaker"));
    }

    #[tokio::test]
    async fn help_lists_every_command() {
        let fixture = Fixture::new();
        let result = fixture.run(Command::Help).await.unwrap();
        for spec in COMMAND_TABLE {
            assert!(result.message.contains(spec.usage));
        }
    }
}
