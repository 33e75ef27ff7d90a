use std::fmt;

use tracing::warn;

use crate::random::{secure_u32, weak_u64};

const TICKET_SPACE: u32 = 100_000;

/// Five-digit display identifier handed out after a successful submission.
/// Generated locally; the server never sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TicketId(u32);

impl TicketId {
    pub fn generate() -> Self {
        let raw = secure_u32().unwrap_or_else(|| {
            warn!("secure random source unavailable; ticket id uses fallback generator");
            weak_u64() as u32
        });
        Self(raw % TICKET_SPACE)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:05}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_renders_five_digits() {
        assert_eq!(TicketId(42).to_string(), "00042");
        assert_eq!(TicketId(99_999).to_string(), "99999");
        for _ in 0..500 {
            let rendered = TicketId::generate().to_string();
            assert_eq!(rendered.len(), 5);
            assert!(rendered.bytes().all(|b| b.is_ascii_digit()));
        }
    }
}
