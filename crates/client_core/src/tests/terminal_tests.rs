use super::*;
use std::sync::Mutex;

#[derive(Default)]
struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    fn routes(&self) -> Vec<String> {
        self.routes.lock().expect("routes lock").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes
            .lock()
            .expect("routes lock")
            .push(route.to_string());
    }
}

fn session() -> (TerminalSession, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::default());
    (TerminalSession::new(navigator.clone()), navigator)
}

#[tokio::test(start_paused = true)]
async fn help_yields_system_command_list() {
    let (mut terminal, _) = session();

    let response = terminal.execute("help").await.expect("response");

    assert_eq!(response.kind, MessageKind::System);
    assert!(response.content.contains("Available commands:"));
    assert!(response.content.contains("contact  - Initialize a project"));
    let kinds: Vec<_> = terminal.history().iter().map(|m| m.kind).collect();
    assert_eq!(kinds, [MessageKind::User, MessageKind::System]);
    assert!(!terminal.is_processing());
}

#[tokio::test(start_paused = true)]
async fn lookup_is_case_insensitive_but_transcript_keeps_casing() {
    let (mut terminal, _) = session();

    let upper = terminal.execute("  HELP ").await.expect("response");
    let lower = terminal.execute("help").await.expect("response");

    assert_eq!(upper.kind, lower.kind);
    assert_eq!(upper.content, lower.content);
    assert_eq!(terminal.history()[0].content, "HELP");
    assert_eq!(terminal.history()[0].kind, MessageKind::User);
}

#[tokio::test(start_paused = true)]
async fn unknown_command_reports_original_input() {
    let (mut terminal, _) = session();

    let response = terminal.execute("Nonsense").await.expect("response");

    assert_eq!(response.kind, MessageKind::Error);
    assert_eq!(
        response.content,
        "Command not found: 'Nonsense'. Type 'help' for a list of commands."
    );
    assert_eq!(
        terminal
            .history()
            .iter()
            .filter(|m| m.kind == MessageKind::Error)
            .count(),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn service_commands_succeed() {
    let (mut terminal, _) = session();
    for (input, marker) in [
        ("ios", "[iOS Development Module Loaded]"),
        ("web", "[Web Platform Module Loaded]"),
        ("design", "[Design System Module Loaded]"),
    ] {
        let response = terminal.execute(input).await.expect("response");
        assert_eq!(response.kind, MessageKind::Success);
        assert!(response.content.starts_with(marker));
    }
}

#[tokio::test(start_paused = true)]
async fn invalid_lengths_are_silently_dropped() {
    let (mut terminal, _) = session();
    let too_long = "x".repeat(MAX_INPUT_CHARS + 1);

    for input in ["", "   ", "\t\n", too_long.as_str()] {
        assert!(terminal.execute(input).await.is_none());
        assert!(terminal.history().is_empty());
        assert!(!terminal.is_processing());
    }

    let exactly_max = "y".repeat(MAX_INPUT_CHARS);
    assert!(terminal.execute(&exactly_max).await.is_some());
}

#[tokio::test]
async fn clear_empties_history_synchronously() {
    let navigator = Arc::new(RecordingNavigator::default());
    let mut terminal =
        TerminalSession::with_banner(navigator).with_latency(LatencyRange::none());
    terminal.execute("help").await;
    terminal.execute("web").await;
    assert_eq!(terminal.history().len(), 5);

    assert!(terminal.begin("CLEAR").is_none());
    assert!(terminal.history().is_empty());
    assert!(!terminal.is_processing());
}

#[test]
fn banner_opens_the_session() {
    let terminal = TerminalSession::with_banner(Arc::new(|_: &str| {}));
    let [banner] = terminal.history() else {
        panic!("expected exactly the banner");
    };
    assert_eq!(banner.kind, MessageKind::System);
    assert!(banner.content.starts_with("BudGo.Net Terminal"));
}

#[tokio::test(start_paused = true)]
async fn processing_flag_spans_the_latency_window() {
    let (mut terminal, _) = session();

    let pending = terminal.begin("web").expect("accepted");
    assert!(terminal.is_processing());
    assert!(pending.latency() >= Duration::from_millis(300));
    assert!(pending.latency() <= Duration::from_millis(800));

    assert!(terminal.begin("help").is_none(), "second submission ignored");
    assert_eq!(terminal.history().len(), 1);

    terminal.complete(pending);
    assert!(!terminal.is_processing());
    assert_eq!(terminal.history().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn execute_waits_out_the_artificial_latency() {
    let (mut terminal, _) = session();
    let started = tokio::time::Instant::now();

    terminal.execute("design").await.expect("response");

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(300));
    assert!(elapsed <= Duration::from_millis(801));
}

#[tokio::test(start_paused = true)]
async fn contact_navigates_after_one_second_without_blocking() {
    let (mut terminal, navigator) = session();

    let response = terminal.execute("contact").await.expect("response");
    assert_eq!(response.kind, MessageKind::System);
    assert!(response.content.contains("[REDIRECTING]"));
    assert!(navigator.routes().is_empty());

    // the interpreter keeps accepting input while the redirect is pending
    terminal.execute("help").await.expect("response");

    tokio::time::sleep(NAVIGATION_DELAY).await;
    assert_eq!(navigator.routes(), ["/contact"]);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_session_cancels_pending_navigation() {
    let (mut terminal, navigator) = session();
    terminal.execute("contact").await.expect("response");
    drop(terminal);

    tokio::time::sleep(NAVIGATION_DELAY * 2).await;
    assert!(navigator.routes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn channel_navigator_delivers_routes() {
    let (navigator, mut routes) = ChannelNavigator::new();
    let mut terminal = TerminalSession::new(Arc::new(navigator));

    terminal.execute("contact").await.expect("response");

    assert_eq!(routes.recv().await.as_deref(), Some("/contact"));
}

#[test]
fn message_ids_follow_insertion_order_across_clears() {
    let mut terminal = TerminalSession::with_banner(Arc::new(|_: &str| {}));
    let first = terminal.history()[0].id;
    terminal.begin("clear");
    let pending = terminal.begin("ios").expect("accepted");
    let user_id = terminal.history()[0].id;
    assert!(user_id > first);
    drop(pending);
}
