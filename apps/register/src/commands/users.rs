//! # User Management Commands
//!
//! Admin-only: list, add, delete, change password. Every mutation saves the
//! directory immediately - losing a password change to a crash locks
//! somebody out.

use std::fmt::Write as _;

use tracing::{info, warn};

use kirana_core::{require_admin, Role};
use kirana_store::Store;

use crate::error::ApiError;
use crate::state::RegisterState;

/// Lists users and their roles, sorted by username.
pub fn list(state: &RegisterState) -> Result<String, ApiError> {
    require_admin(state.user()?)?;

    let mut users: Vec<_> = state.directory.users().collect();
    users.sort_by(|a, b| a.username.cmp(&b.username));

    let mut out = String::from("Users:\n");
    for user in users {
        let _ = writeln!(out, "{:<20} {}", user.username, user.role.as_str());
    }
    Ok(out.trim_end().to_string())
}

/// Adds a user (role is `admin` or `cashier`) and saves the directory.
pub async fn add(
    state: &mut RegisterState,
    store: &Store,
    username: &str,
    password: &str,
    role_raw: &str,
) -> Result<String, ApiError> {
    require_admin(state.user()?)?;

    let role = Role::parse(role_raw.trim())
        .ok_or_else(|| ApiError::validation("role must be 'admin' or 'cashier'"))?;

    state.directory.add_user(username, password, role)?;
    info!(username = %username.trim(), role = role.as_str(), "User added");

    Ok(save_directory(
        state,
        store,
        format!("User added: {} ({})", username.trim(), role.as_str()),
    )
    .await)
}

/// Deletes a user (not the logged-in one) and saves the directory.
pub async fn delete(
    state: &mut RegisterState,
    store: &Store,
    username: &str,
) -> Result<String, ApiError> {
    let requested_by = {
        let user = state.user()?;
        require_admin(user)?;
        user.username.clone()
    };

    state.directory.delete_user(username.trim(), &requested_by)?;
    info!(username = %username.trim(), "User deleted");

    Ok(save_directory(state, store, format!("User deleted: {}", username.trim())).await)
}

/// Changes a user's password and saves the directory.
pub async fn passwd(
    state: &mut RegisterState,
    store: &Store,
    username: &str,
    new_password: &str,
) -> Result<String, ApiError> {
    require_admin(state.user()?)?;

    state.directory.change_password(username.trim(), new_password)?;
    info!(username = %username.trim(), "Password changed");

    Ok(save_directory(state, store, format!("Password changed for {}", username.trim())).await)
}

/// Saves the directory, appending a warning to the message on failure.
///
/// The in-memory change stands either way: save failures are reported,
/// never rolled back.
async fn save_directory(state: &RegisterState, store: &Store, message: String) -> String {
    match store.directory().save(&state.directory).await {
        Ok(()) => message,
        Err(err) => {
            warn!(error = %err, "Failed to save users");
            format!("{} (warning: users were not saved: {})", message, err)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::auth;
    use crate::error::ErrorCode;
    use kirana_store::DbConfig;

    async fn admin_register() -> (RegisterState, Store) {
        let store = Store::new(DbConfig::in_memory()).await.unwrap();
        let (mut state, _) = RegisterState::load(&store).await.unwrap();
        auth::login(&mut state, "admin", "admin123").unwrap();
        (state, store)
    }

    #[tokio::test]
    async fn test_add_user_persists_immediately() {
        let (mut state, store) = admin_register().await;

        let msg = add(&mut state, &store, "ravi", "counter1", "cashier")
            .await
            .unwrap();
        assert_eq!(msg, "User added: ravi (cashier)");

        let persisted = store.directory().load().await.unwrap().unwrap();
        assert!(persisted.authenticate("ravi", "counter1").is_ok());
    }

    #[tokio::test]
    async fn test_user_management_is_admin_gated() {
        let (mut state, store) = admin_register().await;
        add(&mut state, &store, "ravi", "counter1", "cashier")
            .await
            .unwrap();
        auth::login(&mut state, "ravi", "counter1").unwrap();

        assert_eq!(list(&state).unwrap_err().code, ErrorCode::AuthError);
        let err = add(&mut state, &store, "meena", "pw", "cashier")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthError);
        let err = delete(&mut state, &store, "admin").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthError);
        assert_eq!(state.directory.len(), 2);
    }

    #[tokio::test]
    async fn test_cannot_delete_self() {
        let (mut state, store) = admin_register().await;

        let err = delete(&mut state, &store, "admin").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert!(state.directory.get("admin").is_some());
    }

    #[tokio::test]
    async fn test_delete_and_passwd() {
        let (mut state, store) = admin_register().await;
        add(&mut state, &store, "ravi", "counter1", "cashier")
            .await
            .unwrap();

        passwd(&mut state, &store, "ravi", "newpass").await.unwrap();
        assert!(state.directory.authenticate("ravi", "newpass").is_ok());

        delete(&mut state, &store, "ravi").await.unwrap();
        assert!(state.directory.get("ravi").is_none());

        let err = delete(&mut state, &store, "ravi").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_add_user_validation() {
        let (mut state, store) = admin_register().await;

        let err = add(&mut state, &store, "meena", "pw", "owner").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add(&mut state, &store, "admin", "pw", "admin").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        let err = add(&mut state, &store, "", "pw", "cashier").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_list_users() {
        let (mut state, store) = admin_register().await;
        add(&mut state, &store, "ravi", "counter1", "cashier")
            .await
            .unwrap();

        let listing = list(&state).unwrap();
        assert!(listing.contains("admin"));
        assert!(listing.contains("ravi"));
        assert!(listing.contains("cashier"));
    }
}
