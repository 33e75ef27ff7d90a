use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use client_core::{
    commands::CONTACT_ROUTE, ChannelNavigator, ContactGateway, ContactWizard, HttpContactGateway,
    Message, MessageKind, Selection, SubmissionState, TerminalSession, TextField, WizardStep,
};
use shared::domain::{Budget, ProjectType};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;
use tracing_subscriber::EnvFilter;

type Input = Lines<BufReader<Stdin>>;

#[derive(Parser, Debug)]
#[command(about = "BudGo.Net terminal and project wizard")]
struct Args {
    /// Base URL of the server exposing /api/contact.
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    server_url: String,
    /// Start with an empty transcript.
    #[arg(long)]
    no_banner: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let gateway = HttpContactGateway::new(&args.server_url);
    let (navigator, mut routes) = ChannelNavigator::new();
    let navigator = Arc::new(navigator);
    let mut terminal = if args.no_banner {
        TerminalSession::new(navigator)
    } else {
        TerminalSession::with_banner(navigator)
    };
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut printed = print_transcript(&terminal, 0);

    loop {
        tokio::select! {
            Some(route) = routes.recv() => {
                debug!(%route, "navigation requested");
                if route == CONTACT_ROUTE {
                    run_wizard(&mut input, &gateway).await?;
                    return Ok(());
                }
            }
            line = input.next_line() => {
                let Some(line) = line? else {
                    return Ok(());
                };
                terminal.execute(&line).await;
                printed = print_transcript(&terminal, printed);
            }
        }
    }
}

/// Prints transcript entries added since the last call; returns the new count.
fn print_transcript(terminal: &TerminalSession, printed: usize) -> usize {
    let history = terminal.history();
    let start = if history.len() < printed {
        println!("\x1b[2J\x1b[H");
        0
    } else {
        printed
    };
    for message in &history[start..] {
        print_message(message);
    }
    history.len()
}

fn print_message(message: &Message) {
    let prefix = match message.kind {
        MessageKind::User => "❯",
        MessageKind::System => "·",
        MessageKind::Success => "✔",
        MessageKind::Error => "✖",
    };
    println!("[{}] {prefix} {}", message.time_label(), message.content);
}

async fn prompt(input: &mut Input, label: &str) -> Result<Option<String>> {
    println!("{label}");
    Ok(input.next_line().await?.map(|line| line.trim().to_string()))
}

/// Applies a numbered answer on a selection step. Anything else leaves the
/// wizard as it was, so the same step is asked again.
async fn answer_selection(wizard: &mut ContactWizard, answer: &str) -> bool {
    let selection = match wizard.current_step() {
        WizardStep::Environment => choose(ProjectType::ALL, answer).map(Selection::ProjectType),
        WizardStep::Budget => choose(Budget::ALL, answer).map(Selection::Budget),
        WizardStep::Details | WizardStep::Review => None,
    };
    match selection {
        Some(selection) => wizard.select_and_advance(selection).await,
        None => {
            println!("  ! enter one of the listed numbers");
            false
        }
    }
}

fn choose<T: Copy>(options: &[T], answer: &str) -> Option<T> {
    let index: usize = answer.parse().ok()?;
    options.get(index.checked_sub(1)?).copied()
}

async fn run_wizard(input: &mut Input, gateway: &dyn ContactGateway) -> Result<()> {
    let mut wizard = ContactWizard::new();

    while !wizard.is_complete() {
        let step = wizard.current_step();
        println!(
            "\n[{}/{}] {}",
            step.index() + 1,
            WizardStep::ALL.len(),
            step.title()
        );
        for (field, message) in wizard.errors() {
            println!("  ! {field}: {message}");
        }

        match step {
            WizardStep::Environment => {
                for (i, option) in ProjectType::ALL.iter().enumerate() {
                    println!("  {}) {}", i + 1, option.label());
                }
                let Some(answer) = prompt(input, "? Select target environment for deployment:").await? else {
                    return Ok(());
                };
                answer_selection(&mut wizard, &answer).await;
            }
            WizardStep::Budget => {
                for (i, option) in Budget::ALL.iter().enumerate() {
                    println!("  {}) {}", i + 1, option.label());
                }
                let Some(answer) = prompt(input, "? Allocated resources (Budget):").await? else {
                    return Ok(());
                };
                answer_selection(&mut wizard, &answer).await;
            }
            WizardStep::Details => {
                for (field, label) in [
                    (TextField::Name, "? Name:"),
                    (TextField::Email, "? Email:"),
                    (TextField::Details, "? Project details:"),
                ] {
                    let Some(answer) = prompt(input, label).await? else {
                        return Ok(());
                    };
                    wizard.input(field, answer);
                }
                wizard.next();
            }
            WizardStep::Review => {
                let form = wizard.form();
                println!("  name:    {}", form.name.as_deref().unwrap_or_default());
                println!("  email:   {}", form.email.as_deref().unwrap_or_default());
                println!("  message:\n{}", form.compose_message());
                let Some(answer) = prompt(input, "? [s]ubmit or [r]econfigure:").await? else {
                    return Ok(());
                };
                match answer.to_lowercase().as_str() {
                    "s" | "submit" => {
                        println!("Transmitting...");
                        if let SubmissionState::Failed(message) = wizard.submit(gateway).await? {
                            println!("  ✖ {message}");
                        }
                    }
                    "r" | "reconfigure" => wizard.reconfigure(),
                    _ => {}
                }
            }
        }
    }

    if let SubmissionState::Succeeded(ticket) = wizard.submission() {
        println!("\nDeployment Successful");
        println!("➜ Ticket ID: #{ticket}");
        println!("➜ Status: PENDING_REVIEW");
    }
    Ok(())
}
