//! Four-step project intake flow: environment, budget, details, review.

use std::time::Duration;

use shared::{
    domain::{Budget, ProjectType},
    protocol::ContactRequest,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    gateway::{ContactGateway, GatewayError},
    ticket::TicketId,
    validation::{
        check_details, check_email, check_name, Field, FieldErrors, BUDGET_REQUIRED,
        PROJECT_TYPE_REQUIRED,
    },
};

pub const AUTO_ADVANCE_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    Environment,
    Budget,
    Details,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Environment,
        WizardStep::Budget,
        WizardStep::Details,
        WizardStep::Review,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Environment => "Select Environment",
            WizardStep::Budget => "Resource Allocation",
            WizardStep::Details => "Project Config",
            WizardStep::Review => "Pre-flight Check",
        }
    }

    fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pub project_type: Option<ProjectType>,
    pub budget: Option<Budget>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub details: Option<String>,
}

impl FormData {
    /// The single message body sent to the contact endpoint.
    pub fn compose_message(&self) -> String {
        format!(
            "Project Type: {}\nBudget: {}\n\nDetails:\n{}",
            self.project_type.map(ProjectType::as_str).unwrap_or_default(),
            self.budget.map(Budget::as_str).unwrap_or_default(),
            self.details.as_deref().unwrap_or_default(),
        )
    }

    fn text(&self, field: TextField) -> &str {
        let value = match field {
            TextField::Name => &self.name,
            TextField::Email => &self.email,
            TextField::Details => &self.details,
        };
        value.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    ProjectType(ProjectType),
    Budget(Budget),
}

impl Selection {
    fn step(self) -> WizardStep {
        match self {
            Selection::ProjectType(_) => WizardStep::Environment,
            Selection::Budget(_) => WizardStep::Budget,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    Email,
    Details,
}

impl TextField {
    pub fn field(self) -> Field {
        match self {
            TextField::Name => Field::Name,
            TextField::Email => Field::Email,
            TextField::Details => Field::Details,
        }
    }
}

/// Pending move off a selection step. Apply it once [`AUTO_ADVANCE_DELAY`]
/// has passed; it is ignored if the wizard has meanwhile left that step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "selection steps only advance once the token is applied"]
pub struct AutoAdvance {
    from: WizardStep,
}

impl AutoAdvance {
    pub fn delay(&self) -> Duration {
        AUTO_ADVANCE_DELAY
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    NotStarted,
    InFlight,
    Succeeded(TicketId),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("submission is only possible from the review step (currently {0:?})")]
    NotAtReview(WizardStep),
    #[error("a submission is already in flight")]
    InFlight,
    #[error("the project has already been submitted")]
    AlreadySubmitted,
    #[error("form is incomplete: {} field(s) invalid", .0.len())]
    Incomplete(FieldErrors),
}

#[derive(Debug, Clone)]
pub struct ContactWizard {
    step: WizardStep,
    form: FormData,
    errors: FieldErrors,
    submission: SubmissionState,
}

impl Default for ContactWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Environment,
            form: FormData::default(),
            errors: FieldErrors::new(),
            submission: SubmissionState::NotStarted,
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    /// Once submitted, the wizard is replaced by the confirmation view.
    pub fn is_complete(&self) -> bool {
        matches!(self.submission, SubmissionState::Succeeded(_))
    }

    /// Stores a choice from one of the closed sets and clears all errors.
    pub fn select(&mut self, selection: Selection) -> AutoAdvance {
        match selection {
            Selection::ProjectType(value) => self.form.project_type = Some(value),
            Selection::Budget(value) => self.form.budget = Some(value),
        }
        self.errors.clear();
        AutoAdvance {
            from: selection.step(),
        }
    }

    /// Returns whether the step changed.
    pub fn apply_auto_advance(&mut self, advance: AutoAdvance) -> bool {
        if self.step != advance.from || self.is_complete() {
            debug!(from = ?advance.from, at = ?self.step, "stale auto-advance ignored");
            return false;
        }
        self.advance()
    }

    /// [`select`](Self::select), wait out the auto-advance delay, then move on.
    pub async fn select_and_advance(&mut self, selection: Selection) -> bool {
        let advance = self.select(selection);
        tokio::time::sleep(advance.delay()).await;
        self.apply_auto_advance(advance)
    }

    /// Stores free text and clears only that field's error.
    pub fn input(&mut self, field: TextField, value: impl Into<String>) {
        let value = Some(value.into());
        match field {
            TextField::Name => self.form.name = value,
            TextField::Email => self.form.email = value,
            TextField::Details => self.form.details = value,
        }
        self.errors.remove(&field.field());
    }

    /// Checks the fields owned by `step`. On failure the error map is
    /// replaced with every violation found.
    pub fn validate_step(&mut self, step: WizardStep) -> bool {
        match step_errors(&self.form, step) {
            Ok(()) => true,
            Err(errors) => {
                debug!(?step, invalid = errors.len(), "step validation failed");
                self.errors = errors;
                false
            }
        }
    }

    /// Explicit "Next": validates the current step and advances on success.
    pub fn next(&mut self) -> bool {
        if self.step == WizardStep::Review || self.is_complete() {
            return false;
        }
        self.validate_step(self.step) && self.advance()
    }

    /// Jumps back to the first step, keeping everything entered so far.
    pub fn reconfigure(&mut self) {
        if self.is_complete() {
            return;
        }
        debug!(from = ?self.step, "wizard reconfigured");
        self.step = WizardStep::Environment;
    }

    /// Marks the submission in flight and builds the request to send.
    pub fn begin_submit(&mut self) -> Result<ContactRequest, WizardError> {
        match self.submission {
            SubmissionState::InFlight => return Err(WizardError::InFlight),
            SubmissionState::Succeeded(_) => return Err(WizardError::AlreadySubmitted),
            SubmissionState::NotStarted | SubmissionState::Failed(_) => {}
        }
        if self.step != WizardStep::Review {
            return Err(WizardError::NotAtReview(self.step));
        }

        let mut invalid = FieldErrors::new();
        for step in [
            WizardStep::Environment,
            WizardStep::Budget,
            WizardStep::Details,
        ] {
            if let Err(errors) = step_errors(&self.form, step) {
                invalid.extend(errors);
            }
        }
        if !invalid.is_empty() {
            self.errors = invalid.clone();
            return Err(WizardError::Incomplete(invalid));
        }

        self.errors.clear();
        self.submission = SubmissionState::InFlight;
        Ok(ContactRequest {
            name: self.form.text(TextField::Name).to_string(),
            email: self.form.text(TextField::Email).to_string(),
            message: self.form.compose_message(),
        })
    }

    /// Records the outcome of the request built by [`begin_submit`](Self::begin_submit).
    pub fn finish_submit(&mut self, outcome: Result<(), GatewayError>) -> &SubmissionState {
        if self.submission != SubmissionState::InFlight {
            warn!("submission outcome arrived with nothing in flight; ignored");
            return &self.submission;
        }

        self.submission = match outcome {
            Ok(()) => {
                let ticket = TicketId::generate();
                info!(%ticket, "project submitted");
                SubmissionState::Succeeded(ticket)
            }
            Err(error) => {
                let message = error.user_message();
                warn!(%error, "project submission failed");
                self.errors.insert(Field::Submit, message.clone());
                SubmissionState::Failed(message)
            }
        };
        &self.submission
    }

    pub async fn submit(
        &mut self,
        gateway: &dyn ContactGateway,
    ) -> Result<&SubmissionState, WizardError> {
        let request = self.begin_submit()?;
        let outcome = gateway.send(&request).await;
        Ok(self.finish_submit(outcome))
    }

    fn advance(&mut self) -> bool {
        let Some(next) = self.step.next() else {
            return false;
        };
        debug!(from = ?self.step, to = ?next, "wizard advanced");
        self.step = next;
        true
    }
}

fn step_errors(form: &FormData, step: WizardStep) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    match step {
        WizardStep::Environment => {
            if form.project_type.is_none() {
                errors.insert(Field::ProjectType, PROJECT_TYPE_REQUIRED.to_string());
            }
        }
        WizardStep::Budget => {
            if form.budget.is_none() {
                errors.insert(Field::Budget, BUDGET_REQUIRED.to_string());
            }
        }
        WizardStep::Details => {
            let checks = [
                (TextField::Name, check_name as fn(&str) -> Result<(), &'static str>),
                (TextField::Email, check_email),
                (TextField::Details, check_details),
            ];
            for (field, check) in checks {
                if let Err(message) = check(form.text(field)) {
                    errors.insert(field.field(), message.to_string());
                }
            }
        }
        WizardStep::Review => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
#[path = "tests/wizard_tests.rs"]
mod tests;
