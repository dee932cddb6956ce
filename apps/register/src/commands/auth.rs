//! # Auth Commands
//!
//! Login and session identity.

use tracing::info;

use crate::error::ApiError;
use crate::state::RegisterState;

/// Authenticates a user and attaches them to the register session.
///
/// Failures surface the directory's uniform message - the register never
/// reveals whether the username or the password was wrong.
pub fn login(state: &mut RegisterState, username: &str, password: &str) -> Result<String, ApiError> {
    let user = state.directory.authenticate(username, password)?.clone();

    info!(username = %user.username, role = user.role.as_str(), "Login");

    let message = format!("Logged in: {} ({})", user.username, user.role.as_str());
    state.current_user = Some(user);
    Ok(message)
}

/// Shows who is logged in.
pub fn whoami(state: &RegisterState) -> Result<String, ApiError> {
    let user = state.user()?;
    Ok(format!("{} ({})", user.username, user.role.as_str()))
}

// =============================================================================
// Unit Tests
// =============================================================================
