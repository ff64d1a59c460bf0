//! Comptoir - back-office billing server
//!
//! HTTP API for a small company's billing back office: client records,
//! invoices and quotes with sequential yearly document numbers, and user
//! accounts with role-based access.
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT authentication, role gates
//! ├── api/           # HTTP routes and handlers
//! ├── billing/       # document numbering, totals, status machines
//! ├── db/            # SQLite pool, models, repositories
//! └── utils/         # errors, logging, validation, ids
//! ```

pub mod api;
pub mod auth;
pub mod billing;
pub mod core;
pub mod db;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - supports tracing format specifiers
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
   ______                      __        _
  / ____/___  ____ ___  ____  / /_____  (_)____
 / /   / __ \/ __ `__ \/ __ \/ __/ __ \/ / ___/
/ /___/ /_/ / / / / / / /_/ / /_/ /_/ / / /
\____/\____/_/ /_/ /_/ .___/\__/\____/_/_/
                    /_/
    "#
    );
}
