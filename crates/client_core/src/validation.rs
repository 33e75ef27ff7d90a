//! Field rules for the contact wizard.

use std::{collections::BTreeMap, fmt, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

pub const NAME_MIN_CHARS: usize = 2;
pub const DETAILS_MIN_CHARS: usize = 10;

// Dot placement rules (no leading dot, no "..") are checked separately since
// the regex engine has no look-around.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
        .expect("static email pattern compiles")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    ProjectType,
    Budget,
    Name,
    Email,
    Details,
    /// Not an input; carries the last submission failure.
    Submit,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::ProjectType => "projectType",
            Field::Budget => "budget",
            Field::Name => "name",
            Field::Email => "email",
            Field::Details => "details",
            Field::Submit => "submit",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type FieldErrors = BTreeMap<Field, String>;

pub const PROJECT_TYPE_REQUIRED: &str = "Please select a project type";
pub const BUDGET_REQUIRED: &str = "Please select a budget range";
pub const NAME_TOO_SHORT: &str = "Name must be at least 2 characters";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const DETAILS_TOO_SHORT: &str = "Please provide some project details";

pub fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL_PATTERN.is_match(email)
}

pub fn check_name(name: &str) -> Result<(), &'static str> {
    if name.chars().count() < NAME_MIN_CHARS {
        return Err(NAME_TOO_SHORT);
    }
    Ok(())
}

pub fn check_email(email: &str) -> Result<(), &'static str> {
    if !is_valid_email(email) {
        return Err(EMAIL_INVALID);
    }
    Ok(())
}

pub fn check_details(details: &str) -> Result<(), &'static str> {
    if details.chars().count() < DETAILS_MIN_CHARS {
        return Err(DETAILS_TOO_SHORT);
    }
    Ok(())
}
