//! # Directory Repository
//!
//! Load/save for the user directory aggregate.
//!
//! Only the argon2 hash string ever touches the database - plaintext
//! passwords exist solely inside the core `Credential` constructor.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use kirana_core::{Credential, Directory, Role, User};

/// Repository for the user-directory aggregate.
#[derive(Debug, Clone)]
pub struct DirectoryRepository {
    pool: SqlitePool,
}

/// Row shape for the `users` table.
#[derive(sqlx::FromRow)]
struct UserRow {
    username: String,
    password_hash: String,
    role: String,
}

impl DirectoryRepository {
    /// Creates a new DirectoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DirectoryRepository { pool }
    }

    /// Loads the persisted user directory.
    ///
    /// ## Returns
    /// * `Ok(Some(Directory))` - a directory was previously saved
    /// * `Ok(None)` - no prior data; the register bootstraps the default admin
    pub async fn load(&self) -> StoreResult<Option<Directory>> {
        let rows: Vec<UserRow> =
            sqlx::query_as("SELECT username, password_hash, role FROM users ORDER BY username")
                .fetch_all(&self.pool)
                .await?;

        if rows.is_empty() {
            debug!("No persisted users");
            return Ok(None);
        }

        debug!(users = rows.len(), "Loaded user directory");

        let users = rows
            .into_iter()
            .map(|row| {
                let role = Role::parse(&row.role).ok_or_else(|| {
                    StoreError::Corrupt(format!(
                        "unknown role '{}' for user '{}'",
                        row.role, row.username
                    ))
                })?;
                Ok(User {
                    username: row.username,
                    credential: Credential::from_hash(row.password_hash),
                    role,
                })
            })
            .collect::<StoreResult<Vec<User>>>()?;

        Ok(Some(Directory::from_users(users)))
    }

    /// Saves the directory, replacing any previously stored one.
    pub async fn save(&self, directory: &Directory) -> StoreResult<()> {
        debug!(users = directory.len(), "Saving user directory");

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM users").execute(&mut *tx).await?;

        for user in directory.users() {
            sqlx::query("INSERT INTO users (username, password_hash, role) VALUES (?1, ?2, ?3)")
                .bind(&user.username)
                .bind(user.credential.as_str())
                .bind(user.role.as_str())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{DbConfig, Store};
    use kirana_core::{Directory, Role};

    #[tokio::test]
    async fn test_round_trip_keeps_credentials_working() {
        let store = Store::new(DbConfig::in_memory()).await.unwrap();
        let repo = store.directory();

        let mut directory = Directory::new();
        directory.bootstrap_if_empty().unwrap();
        directory.add_user("ravi", "counter1", Role::Cashier).unwrap();

        repo.save(&directory).await.unwrap();
        let loaded = repo.load().await.unwrap().expect("directory was saved");

        assert_eq!(loaded.len(), 2);
        assert!(loaded.authenticate("admin", "admin123").is_ok());
        assert!(loaded.authenticate("ravi", "counter1").is_ok());
        assert!(loaded.authenticate("ravi", "wrong").is_err());
        assert_eq!(loaded.get("ravi").unwrap().role, Role::Cashier);

        // A loaded non-empty directory must not re-bootstrap
        let mut loaded = loaded;
        assert_eq!(loaded.bootstrap_if_empty().unwrap(), None);
    }

    #[tokio::test]
    async fn test_load_without_data_is_none() {
        let store = Store::new(DbConfig::in_memory()).await.unwrap();
        assert!(store.directory().load().await.unwrap().is_none());
    }
}
