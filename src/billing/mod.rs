//! Billing domain - document numbering, totals and finalization
//!
//! This module owns the two pieces that must stay correct under concurrent
//! saves:
//!
//! - [`sequence`] - per (document-type, year) atomic sequence allocation and
//!   number formatting (`FAC-2026-0001`, `DEV-2026-0001`)
//! - [`totals`] - derived-total computation from line items (2dp,
//!   half-away-from-zero)
//! - [`status`] - invoice/quote status state machines
//! - [`finalize`] - the orchestration run on every create/update: recompute
//!   totals, then assign a permanent number the first time a document
//!   leaves draft

pub mod finalize;
pub mod sequence;
pub mod status;
pub mod totals;

pub use finalize::{FinalizeOutcome, finalize_document};
pub use sequence::{DocumentKind, format_document_number, next_document_number};
pub use status::{InvoiceStatus, QuoteStatus};
pub use totals::{DEFAULT_TAX_RATE, DocumentTotals, LineItem, compute_totals, validate_line_items};
