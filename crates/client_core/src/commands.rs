//! Static command table behind the terminal hero.

use crate::terminal::MessageKind;

pub const CLEAR: &str = "clear";
pub const CONTACT_ROUTE: &str = "/contact";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Ios,
    Web,
    Design,
    Contact,
}

impl Command {
    pub const ALL: &'static [Command] = &[
        Command::Help,
        Command::Ios,
        Command::Web,
        Command::Design,
        Command::Contact,
    ];

    /// Looks up an already lower-cased command name.
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|command| command.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Ios => "ios",
            Command::Web => "web",
            Command::Design => "design",
            Command::Contact => "contact",
        }
    }

    pub fn kind(self) -> MessageKind {
        match self {
            Command::Help | Command::Contact => MessageKind::System,
            Command::Ios | Command::Web | Command::Design => MessageKind::Success,
        }
    }

    pub fn response(self) -> &'static str {
        match self {
            Command::Help => {
                "Available commands:
  • ios      - Mobile App Development
  • web      - High-performance Web Platforms
  • design   - UI/UX & Brand Identity
  • contact  - Initialize a project
  • clear    - Clear terminal history"
            }
            Command::Ios => {
                "[iOS Development Module Loaded]
• Swift / SwiftUI Native Development
• App Store Optimization (ASO) included
• Offline-first architecture
> Type 'contact' to start your iOS project."
            }
            Command::Web => {
                "[Web Platform Module Loaded]
• Next.js / React Enterprise Scalability
• SEO & Performance Optimization (Core Web Vitals)
• Responsive Glassmorphism UI
> Type 'contact' to start your Web project."
            }
            Command::Design => {
                "[Design System Module Loaded]
• Figma High-Fidelity Prototyping
• User Journey Mapping
• Accessible (WCAG 2.1) Color Systems
> Type 'contact' to start your Design project."
            }
            Command::Contact => {
                "Initializing project sequence...
[REDIRECTING] Opening project configuration wizard..."
            }
        }
    }

    /// Route to open once the response is on screen.
    pub fn navigation(self) -> Option<&'static str> {
        match self {
            Command::Contact => Some(CONTACT_ROUTE),
            _ => None,
        }
    }
}

pub fn not_found(original_input: &str) -> String {
    format!("Command not found: '{original_input}'. Type 'help' for a list of commands.")
}
