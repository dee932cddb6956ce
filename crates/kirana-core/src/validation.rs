//! # Validation Module
//!
//! Register-input validation and parsing for Kirana POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Register command (string input)                               │
//! │  ├── THIS MODULE: parse_* turns typed text into domain values           │
//! │  └── Immediate cashier feedback                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Domain operations (kirana-core)                               │
//! │  ├── Business rule validation (stock, bill size, roles)                 │
//! │  └── Typed CoreError/AuthError                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK constraints                                       │
//! │  └── PRIMARY KEY constraints                                            │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kirana_core::validation::{parse_price, parse_quantity};
//!
//! // "50.99" typed at the register becomes integer paise
//! assert_eq!(parse_price("50.99").unwrap().paise(), 5_099);
//!
//! // Quantities must be positive integers
//! assert!(parse_quantity("3").is_ok());
//! assert!(parse_quantity("0").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Percent;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an item name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 100 characters
pub fn validate_item_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "item name".to_string(),
        });
    }

    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "item name".to_string(),
            max: 100,
        });
    }

    Ok(name.to_string())
}

/// Validates a username and returns it trimmed.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
pub fn validate_username(username: &str) -> ValidationResult<String> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 50,
        });
    }

    Ok(username.to_string())
}

/// Validates a password.
///
/// ## Rules
/// - Must not be empty (no further policy: short passwords are the shop
///   owner's problem, empty ones are a data bug)
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Parsers
// =============================================================================

/// Parses a quantity typed at the register.
///
/// ## Rules
/// - Must be an integer
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Bill: Add Item                                                         │
/// │                                                                         │
/// │  Cashier types quantity: "5"                                            │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  parse_quantity("5") ← THIS FUNCTION                                    │
/// │       │                                                                 │
/// │       ├── not an integer? → Error: "quantity is not a valid number"     │
/// │       │                                                                 │
/// │       ├── qty <= 0?       → Error: "quantity must be positive"          │
/// │       │                                                                 │
/// │       ├── qty > 999?      → Error: "quantity must be between 1 and 999" │
/// │       │                                                                 │
/// │       └── OK → proceed with add_line                                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn parse_quantity(raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();

    let qty: i64 = raw.parse().map_err(|_| ValidationError::NotANumber {
        field: "quantity".to_string(),
        value: raw.to_string(),
    })?;

    validate_quantity(qty)?;
    Ok(qty)
}

/// Validates an already-parsed quantity value.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Parses a stock count typed at the register.
///
/// ## Rules
/// - Must be an integer
/// - Zero is allowed (sold out), negative is not
pub fn parse_stock(raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();

    let stock: i64 = raw.parse().map_err(|_| ValidationError::NotANumber {
        field: "stock".to_string(),
        value: raw.to_string(),
    })?;

    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(stock)
}

/// Parses a rupee amount typed at the register into Money.
///
/// Accepts at most two decimal places and builds the value digit-wise -
/// the text never round-trips through a float.
///
/// ## Example
/// ```rust
/// use kirana_core::validation::parse_price;
///
/// assert_eq!(parse_price("50").unwrap().paise(), 5_000);
/// assert_eq!(parse_price("50.5").unwrap().paise(), 5_050);
/// assert_eq!(parse_price("50.99").unwrap().paise(), 5_099);
/// assert!(parse_price("abc").is_err());
/// assert!(parse_price("-5").is_err());
/// ```
pub fn parse_price(raw: &str) -> ValidationResult<Money> {
    let paise = parse_decimal_hundredths("price", raw)?;

    if paise < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(Money::from_paise(paise))
}

/// Parses a percentage typed at the register (discount or GST).
///
/// ## Rules
/// - At most two decimal places (basis-point resolution)
/// - Must be between 0 and 100
///
/// ## Example
/// ```rust
/// use kirana_core::validation::parse_percent;
///
/// assert_eq!(parse_percent("discount", "10").unwrap().bps(), 1_000);
/// assert_eq!(parse_percent("tax", "8.25").unwrap().bps(), 825);
/// assert!(parse_percent("discount", "101").is_err());
/// assert!(parse_percent("discount", "ten").is_err());
/// ```
pub fn parse_percent(field: &str, raw: &str) -> ValidationResult<Percent> {
    let bps = parse_decimal_hundredths(field, raw)?;

    if !(0..=10_000).contains(&bps) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(Percent::from_bps(bps as u32))
}

/// Parses `major[.minor]` decimal text into hundredths, without floats.
///
/// Shared by price (rupees → paise) and percentage (percent → bps) parsing,
/// which both want exactly two decimal digits of resolution.
fn parse_decimal_hundredths(field: &str, raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let not_a_number = || ValidationError::NotANumber {
        field: field.to_string(),
        value: raw.to_string(),
    };

    let (major_str, minor_str) = match raw.split_once('.') {
        Some((major, minor)) => (major, minor),
        None => (raw, ""),
    };

    let (negative, major_str) = match major_str.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, major_str),
    };

    if major_str.is_empty() || !major_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_a_number());
    }
    if minor_str.len() > 2 || !minor_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_a_number());
    }

    let major: i64 = major_str.parse().map_err(|_| not_a_number())?;
    let minor: i64 = if minor_str.is_empty() {
        0
    } else {
        // "5" means ".50", not ".05"
        format!("{:0<2}", minor_str).parse().map_err(|_| not_a_number())?
    };

    let value = major
        .checked_mul(100)
        .and_then(|v| v.checked_add(minor))
        .ok_or_else(not_a_number)?;

    Ok(if negative { -value } else { value })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_name() {
        assert_eq!(validate_item_name("  Apple  ").unwrap(), "Apple");
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name("   ").is_err());
        assert!(validate_item_name(&"A".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username("admin").unwrap(), "admin");
        assert!(validate_username(" ").is_err());
        assert!(validate_username(&"u".repeat(60)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("admin123").is_ok());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("1").unwrap(), 1);
        assert_eq!(parse_quantity(" 999 ").unwrap(), 999);

        assert!(matches!(
            parse_quantity("abc"),
            Err(ValidationError::NotANumber { .. })
        ));
        assert!(matches!(
            parse_quantity("0"),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            parse_quantity("-3"),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            parse_quantity("1000"),
            Err(ValidationError::OutOfRange { .. })
        ));
        // Fractions are not integers
        assert!(parse_quantity("2.5").is_err());
    }

    #[test]
    fn test_parse_stock() {
        assert_eq!(parse_stock("0").unwrap(), 0);
        assert_eq!(parse_stock("25").unwrap(), 25);
        assert!(parse_stock("-1").is_err());
        assert!(parse_stock("many").is_err());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("50").unwrap().paise(), 5_000);
        assert_eq!(parse_price("50.5").unwrap().paise(), 5_050);
        assert_eq!(parse_price("50.05").unwrap().paise(), 5_005);
        assert_eq!(parse_price("0").unwrap().paise(), 0);

        assert!(parse_price("").is_err());
        assert!(parse_price("₹50").is_err());
        assert!(parse_price("50.005").is_err());
        assert!(parse_price("-5").is_err());
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("discount", "0").unwrap().bps(), 0);
        assert_eq!(parse_percent("discount", "10").unwrap().bps(), 1_000);
        assert_eq!(parse_percent("tax", "8.25").unwrap().bps(), 825);
        assert_eq!(parse_percent("tax", "100").unwrap().bps(), 10_000);

        assert!(parse_percent("discount", "100.01").is_err());
        assert!(parse_percent("discount", "-1").is_err());
        assert!(parse_percent("discount", "ten").is_err());
    }
}
