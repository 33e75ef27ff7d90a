//! Client-side state machines for the BudGo.Net site: the terminal hero's
//! command interpreter and the multi-step contact wizard.

pub mod commands;
pub mod deferred;
pub mod gateway;
mod random;
pub mod terminal;
pub mod ticket;
pub mod validation;
pub mod wizard;

pub use gateway::{ContactGateway, GatewayError, HttpContactGateway};
pub use terminal::{
    ChannelNavigator, LatencyRange, Message, MessageKind, Navigator, PendingCommand,
    TerminalSession,
};
pub use ticket::TicketId;
pub use validation::{Field, FieldErrors};
pub use wizard::{
    AutoAdvance, ContactWizard, FormData, Selection, SubmissionState, TextField, WizardError,
    WizardStep,
};
