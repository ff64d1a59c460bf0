//! Database models
//!
//! Row structs and request payloads for every persisted resource.

pub mod client;
pub mod invoice;
pub mod quote;
pub mod user;

pub use client::{Client, ClientCreate, ClientKind, ClientUpdate};
pub use invoice::{Invoice, InvoiceCreate, InvoiceUpdate};
pub use quote::{Quote, QuoteCreate, QuoteUpdate};
pub use user::{User, UserCreate, UserRole, UserUpdate};
