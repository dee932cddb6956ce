//! # Authentication Directory
//!
//! Users, roles and credentials for the register.
//!
//! ## Login Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Authentication Directory                           │
//! │                                                                         │
//! │  Register start                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  bootstrap_if_empty() ── empty store? ──► seed admin / admin123         │
//! │       │                                   (shown once, change it!)      │
//! │       ▼                                                                 │
//! │  authenticate(username, password)                                       │
//! │       │                                                                 │
//! │       ├── unknown user ──────┐                                          │
//! │       │                      ├──► AuthError::InvalidCredentials         │
//! │       ├── wrong password ────┘    (one message for both cases)          │
//! │       │                                                                 │
//! │       └── ok ──► &User { role: Admin | Cashier }                        │
//! │                                                                         │
//! │  Admin-only: catalog stock editing, user management.                    │
//! │  Everything else: any authenticated user.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Credentials are stored as salted argon2 hashes and verified through
//! argon2's constant-time comparison; the raw secret exists only while the
//! call that receives it runs.

use std::collections::HashMap;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};
use crate::validation::{validate_password, validate_username};

/// Username the directory seeds when no users exist yet.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Password of the seeded admin account. Must be changed after first login.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

// =============================================================================
// Role
// =============================================================================

/// What a user is allowed to do at the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access: billing plus stock editing and user management.
    Admin,
    /// Billing only.
    Cashier,
}

impl Role {
    /// Stable text form used in storage and listings.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Cashier => "cashier",
        }
    }

    /// Parses the stored text form.
    pub fn parse(raw: &str) -> Option<Role> {
        match raw {
            "admin" => Some(Role::Admin),
            "cashier" => Some(Role::Cashier),
            _ => None,
        }
    }

    /// Checks for the admin role.
    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

// =============================================================================
// Credential
// =============================================================================

/// A stored credential: the argon2 PHC hash of a password.
///
/// Value object - the plaintext is hashed on the way in and can only be
/// checked, never read back.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    hash: String,
}

/// Don't expose the hash in debug output.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Credential {
    /// Hashes a plaintext password with a fresh random salt.
    pub fn new(plain: &str) -> AuthResult<Self> {
        validate_password(plain)?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| AuthError::Credential(e.to_string()))?;

        Ok(Credential {
            hash: hash.to_string(),
        })
    }

    /// Wraps an existing PHC hash string (load path).
    pub fn from_hash(hash: String) -> Self {
        Credential { hash }
    }

    /// The PHC hash string, for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Verifies a plaintext password against this hash.
    ///
    /// A malformed stored hash verifies as false rather than erroring -
    /// the caller only ever learns "matched or not".
    pub fn verify(&self, plain: &str) -> bool {
        PasswordHash::new(&self.hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(plain.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

// =============================================================================
// User
// =============================================================================

/// A register user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique username, the directory key.
    pub username: String,

    /// Salted credential hash.
    pub credential: Credential,

    /// Admin or cashier.
    pub role: Role,
}

impl User {
    /// Checks whether this user holds the admin role.
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Fails with `AuthError::AdminRequired` unless the user is an admin.
///
/// The register calls this in front of the two gated actions: catalog
/// stock editing and user management.
pub fn require_admin(user: &User) -> AuthResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AuthError::AdminRequired)
    }
}

// =============================================================================
// Directory
// =============================================================================

/// The username → user directory.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    users: HashMap<String, User>,
}

impl Directory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Directory::default()
    }

    /// Rebuilds a directory from persisted users.
    pub fn from_users(users: Vec<User>) -> Self {
        Directory {
            users: users
                .into_iter()
                .map(|user| (user.username.clone(), user))
                .collect(),
        }
    }

    /// Checks whether the directory holds no users.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Number of users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Looks up a user by username.
    pub fn get(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    /// All users (iteration order unspecified; listings sort by name).
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    /// Seeds the default admin account when the directory is empty.
    ///
    /// Runs once per persisted-store lifetime: a loaded non-empty directory
    /// skips it. Returns the seeded credential pair so the register can show
    /// it to the operator, or `None` when nothing was seeded.
    pub fn bootstrap_if_empty(
        &mut self,
    ) -> AuthResult<Option<(&'static str, &'static str)>> {
        if !self.users.is_empty() {
            return Ok(None);
        }

        let admin = User {
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            credential: Credential::new(DEFAULT_ADMIN_PASSWORD)?,
            role: Role::Admin,
        };
        self.users.insert(admin.username.clone(), admin);

        Ok(Some((DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)))
    }

    /// Authenticates a username/password pair.
    ///
    /// Unknown usernames and wrong passwords both return
    /// `AuthError::InvalidCredentials`; nothing is mutated on failure.
    pub fn authenticate(&self, username: &str, password: &str) -> AuthResult<&User> {
        let user = self
            .users
            .get(username.trim())
            .ok_or(AuthError::InvalidCredentials)?;

        if user.credential.verify(password) {
            Ok(user)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    /// Adds a new user.
    ///
    /// ## Errors
    /// - empty username/password via `ValidationError`
    /// - `AuthError::DuplicateUser` when the username is taken
    pub fn add_user(&mut self, username: &str, password: &str, role: Role) -> AuthResult<()> {
        let username = validate_username(username)?;
        validate_password(password)?;

        if self.users.contains_key(&username) {
            return Err(AuthError::DuplicateUser(username));
        }

        let user = User {
            username: username.clone(),
            credential: Credential::new(password)?,
            role,
        };
        self.users.insert(username, user);
        Ok(())
    }

    /// Deletes a user on behalf of `requested_by`.
    ///
    /// ## Errors
    /// - `AuthError::CannotDeleteSelf` when a user tries to delete the
    ///   account they are logged in with (checked first)
    /// - `AuthError::UnknownUser` when the username does not exist
    pub fn delete_user(&mut self, username: &str, requested_by: &str) -> AuthResult<()> {
        if username == requested_by {
            return Err(AuthError::CannotDeleteSelf);
        }

        self.users
            .remove(username)
            .map(|_| ())
            .ok_or_else(|| AuthError::UnknownUser(username.to_string()))
    }

    /// Replaces a user's password with a freshly salted hash.
    pub fn change_password(&mut self, username: &str, new_password: &str) -> AuthResult<()> {
        validate_password(new_password)?;

        let credential = Credential::new(new_password)?;
        let user = self
            .users
            .get_mut(username)
            .ok_or_else(|| AuthError::UnknownUser(username.to_string()))?;

        user.credential = credential;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_seeds_default_admin_once() {
        let mut directory = Directory::new();

        let seeded = directory.bootstrap_if_empty().unwrap();
        assert_eq!(seeded, Some(("admin", "admin123")));
        assert_eq!(directory.len(), 1);

        // Second call is a no-op: only a genuinely empty directory seeds
        assert_eq!(directory.bootstrap_if_empty().unwrap(), None);
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_authenticate_default_admin() {
        let mut directory = Directory::new();
        directory.bootstrap_if_empty().unwrap();

        let user = directory.authenticate("admin", "admin123").unwrap();
        assert_eq!(user.username, "admin");
        assert!(user.is_admin());
    }

    #[test]
    fn test_authenticate_failures_are_uniform_and_pure() {
        let mut directory = Directory::new();
        directory.bootstrap_if_empty().unwrap();
        let before = directory.len();

        let unknown = directory.authenticate("nobody", "admin123").unwrap_err();
        let wrong = directory.authenticate("admin", "hunter2").unwrap_err();

        // Same variant either way; nothing mutated
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert_eq!(directory.len(), before);
        assert!(directory.authenticate("admin", "admin123").is_ok());
    }

    #[test]
    fn test_add_user() {
        let mut directory = Directory::new();
        directory.bootstrap_if_empty().unwrap();

        directory.add_user("ravi", "counter1", Role::Cashier).unwrap();
        let ravi = directory.get("ravi").unwrap();
        assert!(!ravi.is_admin());
        assert!(directory.authenticate("ravi", "counter1").is_ok());

        assert!(matches!(
            directory.add_user("ravi", "again", Role::Cashier),
            Err(AuthError::DuplicateUser(_))
        ));
        assert!(matches!(
            directory.add_user("", "pw", Role::Cashier),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            directory.add_user("meena", "", Role::Cashier),
            Err(AuthError::Validation(_))
        ));
    }

    #[test]
    fn test_delete_user_rules() {
        let mut directory = Directory::new();
        directory.bootstrap_if_empty().unwrap();
        directory.add_user("ravi", "counter1", Role::Cashier).unwrap();

        assert!(matches!(
            directory.delete_user("admin", "admin"),
            Err(AuthError::CannotDeleteSelf)
        ));
        assert!(matches!(
            directory.delete_user("ghost", "admin"),
            Err(AuthError::UnknownUser(_))
        ));

        directory.delete_user("ravi", "admin").unwrap();
        assert!(directory.get("ravi").is_none());
    }

    #[test]
    fn test_change_password() {
        let mut directory = Directory::new();
        directory.bootstrap_if_empty().unwrap();

        directory.change_password("admin", "s3cure-now").unwrap();
        assert!(directory.authenticate("admin", "admin123").is_err());
        assert!(directory.authenticate("admin", "s3cure-now").is_ok());

        assert!(matches!(
            directory.change_password("ghost", "pw"),
            Err(AuthError::UnknownUser(_))
        ));
        assert!(matches!(
            directory.change_password("admin", ""),
            Err(AuthError::Validation(_))
        ));
    }

    #[test]
    fn test_credential_is_salted_and_redacted() {
        let a = Credential::new("same-password").unwrap();
        let b = Credential::new("same-password").unwrap();

        // Fresh salt every time, but both verify
        assert_ne!(a.as_str(), b.as_str());
        assert!(a.verify("same-password"));
        assert!(b.verify("same-password"));
        assert!(!a.verify("other-password"));

        // Debug output never leaks the hash
        assert_eq!(format!("{:?}", a), "Credential { hash: \"[REDACTED]\" }");
    }

    #[test]
    fn test_require_admin() {
        let mut directory = Directory::new();
        directory.bootstrap_if_empty().unwrap();
        directory.add_user("ravi", "counter1", Role::Cashier).unwrap();

        assert!(require_admin(directory.get("admin").unwrap()).is_ok());
        assert!(matches!(
            require_admin(directory.get("ravi").unwrap()),
            Err(AuthError::AdminRequired)
        ));
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("cashier"), Some(Role::Cashier));
        assert_eq!(Role::parse("owner"), None);
        assert_eq!(Role::Admin.as_str(), "admin");
    }
}
