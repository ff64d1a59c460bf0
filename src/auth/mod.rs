//! Authentication and authorization
//!
//! - [`JwtService`] - JWT token service (HS256)
//! - [`CurrentUser`] - authenticated user context
//! - [`require_auth`] - bearer-token middleware
//! - [`require_role`] - role gate middleware

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_role};
