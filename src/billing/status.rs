//! Document status state machines
//!
//! Leaving `draft` is the single trigger for number assignment; returning
//! to `draft` is not a supported transition for either document type and
//! is rejected rather than silently clearing the assigned number.

use serde::{Deserialize, Serialize};

/// Invoice lifecycle
///
/// `draft → sent → paid`; `sent → overdue` (triggered externally by a
/// status patch when the due date passes); any non-terminal state may be
/// cancelled. `paid` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn is_draft(self) -> bool {
        self == Self::Draft
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled)
    }

    /// Whether `self → to` is a permitted transition
    pub fn can_transition(self, to: Self) -> bool {
        if self == to {
            // Re-saving with an unchanged status is always fine
            return true;
        }
        match (self, to) {
            (Self::Draft, Self::Sent) => true,
            (Self::Sent, Self::Paid) => true,
            (Self::Sent, Self::Overdue) => true,
            (Self::Overdue, Self::Paid) => true,
            // Any non-terminal state can be cancelled
            (from, Self::Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

/// Quote lifecycle
///
/// `draft → sent → {accepted, rejected}`. `accepted` and `rejected` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Accepted,
    Rejected,
}

impl QuoteStatus {
    pub fn is_draft(self) -> bool {
        self == Self::Draft
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }

    /// Whether `self → to` is a permitted transition
    pub fn can_transition(self, to: Self) -> bool {
        if self == to {
            return true;
        }
        matches!(
            (self, to),
            (Self::Draft, Self::Sent)
                | (Self::Sent, Self::Accepted)
                | (Self::Sent, Self::Rejected)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_transitions() {
        use InvoiceStatus::*;
        assert!(Draft.can_transition(Sent));
        assert!(Sent.can_transition(Paid));
        assert!(Sent.can_transition(Overdue));
        assert!(Overdue.can_transition(Paid));
        assert!(Draft.can_transition(Cancelled));
        assert!(Sent.can_transition(Cancelled));
        assert!(Overdue.can_transition(Cancelled));

        // Terminal states cannot move
        assert!(!Paid.can_transition(Cancelled));
        assert!(!Cancelled.can_transition(Sent));

        // No skipping, no going back to draft
        assert!(!Draft.can_transition(Paid));
        assert!(!Sent.can_transition(Draft));
        assert!(!Cancelled.can_transition(Draft));
    }

    #[test]
    fn test_quote_transitions() {
        use QuoteStatus::*;
        assert!(Draft.can_transition(Sent));
        assert!(Sent.can_transition(Accepted));
        assert!(Sent.can_transition(Rejected));

        assert!(!Draft.can_transition(Accepted));
        assert!(!Accepted.can_transition(Rejected));
        assert!(!Sent.can_transition(Draft));
        assert!(!Rejected.can_transition(Draft));
    }

    #[test]
    fn test_unchanged_status_is_allowed() {
        assert!(InvoiceStatus::Sent.can_transition(InvoiceStatus::Sent));
        assert!(QuoteStatus::Draft.can_transition(QuoteStatus::Draft));
    }

    #[test]
    fn test_status_serde_lowercase() {
        let s: InvoiceStatus = serde_json::from_str("\"overdue\"").unwrap();
        assert_eq!(s, InvoiceStatus::Overdue);
        assert_eq!(serde_json::to_string(&QuoteStatus::Accepted).unwrap(), "\"accepted\"");
    }
}
