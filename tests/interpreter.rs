use std::sync::Arc;
use terminal_hacker::backend::{MockBackend, ScanBackend, SimulatedBackend};
use terminal_hacker::data::{Catalog, Category};
use terminal_hacker::game::{Dispatcher, FixedDice, GameState, Rules, Session};

fn session_with(backend: Arc<dyn ScanBackend>, rules: Rules) -> (Session, Dispatcher) {
    let catalog = Arc::new(Catalog::standard());
    let state = GameState::new(&rules, &catalog);
    let session = Session::new(state, rules.clone(), 500);
    let dispatcher = Dispatcher::new(catalog, rules, backend).with_prompt("root@k4l1:~#");
    (session, dispatcher)
}

fn mock_session() -> (Session, Dispatcher) {
    session_with(Arc::new(MockBackend::new()), Rules::default())
}

/// Mock capability with every core-side roll forced to `roll`
fn rigged_session(roll: f32) -> (Session, Dispatcher) {
    let (session, dispatcher) = mock_session();
    (session, dispatcher.with_dice(Arc::new(FixedDice(roll))))
}

fn last_text(session: &Session) -> &str {
    &session.transcript.entries().last().expect("transcript has entries").text
}

#[tokio::test]
async fn unknown_command_leaves_state_alone() {
    let (mut session, dispatcher) = mock_session();
    let before = session.state.clone();

    let result = session.submit(&dispatcher, "foobar").await.unwrap().unwrap();

    assert!(!result.success);
    assert_eq!(session.state, before);
    assert!(last_text(&session).contains("Command not recognized: foobar"));
    assert_eq!(session.transcript.entries().last().unwrap().category, Category::Error);
}

#[tokio::test]
async fn keyword_is_case_insensitive() {
    let (mut session, dispatcher) = mock_session();
    let result = session.submit(&dispatcher, "STATUS").await.unwrap().unwrap();
    assert!(result.success);
    assert!(result.message.contains("Level: 1"));
}

#[tokio::test]
async fn stealth_halves_the_next_scan() {
    let (mut loud, dispatcher) = mock_session();
    loud.submit(&dispatcher, "scan cloud").await.unwrap();

    let (mut quiet, dispatcher) = mock_session();
    quiet.submit(&dispatcher, "stealth on").await.unwrap();
    quiet.submit(&dispatcher, "scan cloud").await.unwrap();

    assert_eq!(loud.state.detection_level, 10);
    assert_eq!(quiet.state.detection_level, 5);
}

#[tokio::test]
async fn stealth_rejects_other_arguments() {
    let (mut session, dispatcher) = mock_session();
    let result = session.submit(&dispatcher, "stealth maybe").await.unwrap().unwrap();
    assert!(!result.success);
    assert!(!session.state.stealth_mode);
    assert_eq!(last_text(&session), "Usage: stealth <on|off>");
}

#[tokio::test]
async fn full_breach_flow_pays_out() {
    let (mut session, dispatcher) = mock_session();

    session.submit(&dispatcher, "connect 192.168.1.100").await.unwrap();
    assert_eq!(session.state.current_target.as_deref(), Some("192.168.1.100"));
    assert_eq!(session.state.detection_level, 2);

    session.submit(&dispatcher, "scan testserver").await.unwrap();
    let result = session.submit(&dispatcher, "bruteforce testserver").await.unwrap().unwrap();

    assert!(result.success);
    // $1000 start + $100 from the crack + $500 first-breach reward
    assert_eq!(session.state.money, 1600);
    // 25 (scan) + 50 (crack) + 100 (reward)
    assert_eq!(session.state.experience, 175);
    assert_eq!(session.state.detection_level, 32);
    assert!(session.state.compromised.contains("192.168.1.100"));
}

#[tokio::test]
async fn bruteforce_without_connect_is_refused() {
    let (mut session, dispatcher) = mock_session();
    let result = session.submit(&dispatcher, "bruteforce cloud").await.unwrap().unwrap();
    assert!(!result.success);
    assert_eq!(session.state.detection_level, 0);
    assert_eq!(session.state.money, 1000);
}

#[tokio::test]
async fn bruteforce_without_connect_allowed_when_configured() {
    let rules = Rules {
        bruteforce_requires_connection: false,
        ..Rules::default()
    };
    let (mut session, dispatcher) = session_with(Arc::new(MockBackend::new()), rules);
    let result = session.submit(&dispatcher, "bruteforce cloud").await.unwrap().unwrap();
    assert!(result.success);
}

#[tokio::test]
async fn buy_rejections_do_not_spend() {
    let (mut session, dispatcher) = mock_session();

    let locked = session.submit(&dispatcher, "buy hydra").await.unwrap().unwrap();
    assert!(!locked.success);
    assert!(locked.message.contains("Level too low"));

    let missing = session.submit(&dispatcher, "buy laser").await.unwrap().unwrap();
    assert!(!missing.success);
    assert!(missing.message.contains("not found"));

    let owned = session.submit(&dispatcher, "buy nmap").await.unwrap().unwrap();
    assert!(owned.message.contains("already owned"));

    session.state.level = 2;
    session.state.money = 10;
    let poor = session.submit(&dispatcher, "buy hydra").await.unwrap().unwrap();
    assert!(poor.message.contains("Not enough money"));

    assert_eq!(session.state.money, 10);
    assert!(!session.state.owns("hydra"));
}

#[tokio::test]
async fn buy_rejections_name_the_threshold() {
    let (mut session, dispatcher) = mock_session();

    let locked = session.submit(&dispatcher, "buy metasploit").await.unwrap().unwrap();
    assert!(!locked.success);
    assert_eq!(locked.message, "Level too low to buy metasploit. Requires level 5.");

    session.state.level = 2;
    session.state.money = 100;
    let poor = session.submit(&dispatcher, "buy hydra").await.unwrap().unwrap();
    assert!(!poor.success);
    assert_eq!(poor.message, "Not enough money to buy hydra. Need $1000.");

    assert_eq!(session.state.money, 100);
    assert!(!session.state.owns("hydra"));
    assert!(!session.state.owns("metasploit"));
}

#[tokio::test]
async fn bought_firewall_tool_unlocks_bypass() {
    let (mut session, dispatcher) = rigged_session(0.0);
    session.state.level = 4;
    session.state.money = 10000;

    let refused = session.submit(&dispatcher, "bypass corpdb").await.unwrap().unwrap();
    assert!(!refused.success);
    assert!(refused.message.starts_with("No program to bypass with"));

    session.submit(&dispatcher, "buy ghostwall").await.unwrap();
    session.submit(&dispatcher, "connect corpdb").await.unwrap();
    let result = session.submit(&dispatcher, "bypass corpdb").await.unwrap().unwrap();

    assert!(result.success);
    assert!(result.message.contains("Firewall successfully bypassed"));
    // $10000 - $3000 for ghostwall + $750 for the bypass
    assert_eq!(session.state.money, 7750);
    // 2 for connecting, 20 for the bypass
    assert_eq!(session.state.detection_level, 22);
}

#[tokio::test]
async fn failed_decrypt_still_raises_detection() {
    let (mut session, dispatcher) = rigged_session(0.99);
    session.state.level = 4;
    session.state.money = 4000;
    session.submit(&dispatcher, "buy cryptbreaker").await.unwrap();
    session.submit(&dispatcher, "connect corpdb").await.unwrap();

    let result = session.submit(&dispatcher, "decrypt corpdb").await.unwrap().unwrap();

    assert!(!result.success);
    assert_eq!(session.state.money, 0);
    assert_eq!(session.state.experience, 40);
    assert_eq!(session.state.detection_level, 27);
}

#[tokio::test]
async fn upgraded_scanner_changes_scan_outcome() {
    let (mut session, dispatcher) = mock_session();
    session.state.money = 5000;
    session.submit(&dispatcher, "upgrade nmap").await.unwrap();
    session.submit(&dispatcher, "upgrade nmap").await.unwrap();
    assert_eq!(session.state.inventory["nmap"].tier, 3);

    session.submit(&dispatcher, "scan cloud").await.unwrap();
    assert_eq!(session.state.detection_level, 8);
    assert_eq!(session.state.experience, 30);
}

#[tokio::test]
async fn buying_installs_and_charges() {
    let (mut session, dispatcher) = mock_session();
    session.state.level = 2;

    let result = session.submit(&dispatcher, "buy hydra").await.unwrap().unwrap();

    assert!(result.success);
    assert_eq!(session.state.money, 0);
    assert!(session.state.owns("hydra"));
}

#[tokio::test]
async fn upgrades_get_pricier() {
    let (mut session, dispatcher) = mock_session();

    session.submit(&dispatcher, "upgrade nmap").await.unwrap();
    let nmap = &session.state.inventory["nmap"];
    assert_eq!(nmap.tier, 2);
    assert_eq!(nmap.upgrade_cost, 375);
    assert_eq!(session.state.money, 750);

    session.submit(&dispatcher, "upgrade nmap").await.unwrap();
    assert_eq!(session.state.inventory["nmap"].upgrade_cost, 562);
    assert_eq!(session.state.money, 375);
}

#[tokio::test]
async fn backend_outage_costs_a_little_detection() {
    let (mut session, dispatcher) =
        session_with(Arc::new(MockBackend::new().failing()), Rules::default());
    let result = session.submit(&dispatcher, "scan corpdb").await.unwrap().unwrap();

    assert!(!result.success);
    assert_eq!(session.state.detection_level, 5);
    assert_eq!(session.state.experience, 0);
}

#[tokio::test]
async fn detection_never_passes_the_ceiling() {
    let (mut session, dispatcher) = mock_session();
    session.submit(&dispatcher, "connect cloud").await.unwrap();
    for _ in 0..8 {
        session.submit(&dispatcher, "bruteforce cloud").await.unwrap();
    }
    assert_eq!(session.state.detection_level, 100);
    assert!(session
        .transcript
        .entries()
        .iter()
        .any(|e| e.category == Category::Warning && e.text.contains("TRACE COMPLETE")));
}

#[tokio::test]
async fn reconnect_resets_detection() {
    let (mut session, dispatcher) = mock_session();
    session.submit(&dispatcher, "scan cloud").await.unwrap();
    session.submit(&dispatcher, "scan cloud").await.unwrap();
    assert_eq!(session.state.detection_level, 20);

    session.submit(&dispatcher, "connect corpdb").await.unwrap();
    assert_eq!(session.state.detection_level, 2);
    assert!(session.state.discovered_vulnerabilities.is_empty());
}

#[tokio::test]
async fn enough_experience_levels_up() {
    let (mut session, dispatcher) = mock_session();
    session.state.experience = 990;
    session.submit(&dispatcher, "scan cloud").await.unwrap();

    assert_eq!(session.state.level, 2);
    assert_eq!(session.state.experience, 15);
    assert!(session
        .transcript
        .entries()
        .iter()
        .any(|e| e.text == "Level up! You are now level 2."));
}

#[tokio::test]
async fn files_can_be_listed_and_read() {
    let (mut session, dispatcher) = mock_session();
    let ls = session.submit(&dispatcher, "ls").await.unwrap().unwrap();
    assert!(ls.message.contains("readme.txt"));

    let cat = session.submit(&dispatcher, "cat README.TXT").await.unwrap().unwrap();
    assert!(cat.success);
}

#[tokio::test]
async fn transcript_echoes_each_command() {
    let (mut session, dispatcher) = mock_session();
    session.submit(&dispatcher, "targets").await.unwrap();
    let echo = session
        .transcript
        .entries()
        .iter()
        .find(|e| e.category == Category::System)
        .unwrap();
    assert_eq!(echo.text, "root@k4l1:~# targets");
}

#[tokio::test]
async fn simulated_backend_plays_a_full_round() {
    let catalog = Arc::new(Catalog::standard());
    let backend = Arc::new(SimulatedBackend::new(catalog, 0, 0));
    let (mut session, dispatcher) = session_with(backend, Rules::default());

    session.submit(&dispatcher, "connect testserver").await.unwrap();
    let scan = session.submit(&dispatcher, "scan testserver").await.unwrap().unwrap();
    assert!(scan.success);
    assert!(session.state.experience > 0);
    assert!(session.state.detection_level > 2);

    session.submit(&dispatcher, "bruteforce testserver").await.unwrap();
    assert!(session.state.detection_level <= 100);
}
