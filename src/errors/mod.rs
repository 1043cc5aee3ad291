//! Error types shared by the service and GraphQL layers.
//!
//! - [`CoreError`]: the error every service returns, tagged with a
//!   [`CoreErrorKind`] that maps onto a GraphQL error code.
//! - [`AuthError`]: credential and token failures, converted into
//!   `CoreError` before leaving the auth code.

pub mod auth;
mod core_error;

pub use auth::AuthError;
pub use core_error::{CoreError, CoreErrorKind};

/// Result type alias for service operations
pub type CoreResult<T> = Result<T, CoreError>;
