//! Command interpreter and transcript for the simulated terminal.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tokio::{runtime::Handle, sync::mpsc};
use tracing::{debug, warn};

use crate::{
    commands::{self, Command, CLEAR},
    deferred::DeferredTask,
    random::weak_in_range,
};

pub const MAX_INPUT_CHARS: usize = 100;
pub const NAVIGATION_DELAY: Duration = Duration::from_secs(1);

const BANNER: &str = "BudGo.Net Terminal [Version 2.0.0]\n(c) 2024 BudGo LLC. All rights reserved.\n\nType \"help\" to see available commands.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MessageId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    User,
    System,
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub kind: MessageKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Wall-clock label in the viewer's local time.
    pub fn time_label(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string()
    }
}

/// Receives route changes requested by commands.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate(&self, route: &str) {
        self(route)
    }
}

/// Forwards routes to a channel; the receiving side decides how to switch views.
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: &str) {
        if self.tx.send(route.to_string()).is_err() {
            debug!(route, "navigation dropped; receiver gone");
        }
    }
}

/// Bounds of the artificial processing pause applied to every command but `clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyRange {
    pub min: Duration,
    pub max: Duration,
}

impl LatencyRange {
    pub const fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    pub fn sample(&self) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(weak_in_range(min, max))
    }
}

impl Default for LatencyRange {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(300),
            max: Duration::from_millis(800),
        }
    }
}

/// A command whose user message is already in the transcript and whose
/// response is still pending.
#[derive(Debug)]
#[must_use = "a pending command keeps the session busy until completed"]
pub struct PendingCommand {
    input: String,
    command: Option<Command>,
    latency: Duration,
}

impl PendingCommand {
    pub fn latency(&self) -> Duration {
        self.latency
    }
}

pub struct TerminalSession {
    history: Vec<Message>,
    is_processing: bool,
    next_id: u64,
    latency: LatencyRange,
    navigator: Arc<dyn Navigator>,
    navigations: Vec<DeferredTask>,
}

impl TerminalSession {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self {
            history: Vec::new(),
            is_processing: false,
            next_id: 0,
            latency: LatencyRange::default(),
            navigator,
            navigations: Vec::new(),
        }
    }

    /// A session that opens with the welcome banner.
    pub fn with_banner(navigator: Arc<dyn Navigator>) -> Self {
        let mut session = Self::new(navigator);
        session.push(MessageKind::System, BANNER.to_string());
        session
    }

    pub fn with_latency(mut self, latency: LatencyRange) -> Self {
        self.latency = latency;
        self
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    /// Runs one line of input to completion and returns the appended response.
    ///
    /// Returns `None` when the input was dropped or when it was `clear`.
    pub async fn execute(&mut self, raw_input: &str) -> Option<Message> {
        let pending = self.begin(raw_input)?;
        tokio::time::sleep(pending.latency).await;
        Some(self.complete(pending))
    }

    /// Validates input and records the user line.
    ///
    /// Empty or over-long input, and any input arriving while another command
    /// is in flight, is dropped without touching the transcript. `clear`
    /// empties the transcript immediately and yields nothing to complete.
    pub fn begin(&mut self, raw_input: &str) -> Option<PendingCommand> {
        if self.is_processing {
            debug!("terminal busy; input ignored");
            return None;
        }

        let input = raw_input.trim();
        let len = input.chars().count();
        if len == 0 || len > MAX_INPUT_CHARS {
            return None;
        }

        let name = input.to_lowercase();
        if name == CLEAR {
            debug!(cleared = self.history.len(), "terminal cleared");
            self.history.clear();
            return None;
        }

        self.push(MessageKind::User, input.to_string());
        self.is_processing = true;

        let command = Command::lookup(&name);
        debug!(command = %name, known = command.is_some(), "terminal command accepted");
        Some(PendingCommand {
            input: input.to_string(),
            command,
            latency: self.latency.sample(),
        })
    }

    /// Appends the response for `pending` and fires any navigation it implies.
    pub fn complete(&mut self, pending: PendingCommand) -> Message {
        let (kind, content) = match pending.command {
            Some(command) => (command.kind(), command.response().to_string()),
            None => (MessageKind::Error, commands::not_found(&pending.input)),
        };
        let message = self.push(kind, content).clone();
        self.is_processing = false;

        if let Some(route) = pending.command.and_then(Command::navigation) {
            self.schedule_navigation(route);
        }
        message
    }

    fn schedule_navigation(&mut self, route: &'static str) {
        let navigator = self.navigator.clone();
        match Handle::try_current() {
            Ok(runtime) => {
                self.navigations.retain(|task| !task.is_finished());
                self.navigations.push(DeferredTask::after(
                    &runtime,
                    NAVIGATION_DELAY,
                    async move { navigator.navigate(route) },
                ));
            }
            Err(_) => {
                warn!(route, "no async runtime for delayed navigation; navigating now");
                navigator.navigate(route);
            }
        }
    }

    fn push(&mut self, kind: MessageKind, content: String) -> &Message {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.history.push(Message {
            id,
            kind,
            content,
            timestamp: Utc::now(),
        });
        &self.history[self.history.len() - 1]
    }
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;
