//! # Kirana Register Library
//!
//! Core library for the Kirana POS terminal register.
//! This is the main entry point that wires the store, state and commands.
//!
//! ## Module Organization
//! ```text
//! kirana_register/
//! ├── lib.rs          ◄─── You are here (startup, login loop, dispatch)
//! ├── state.rs        ◄─── RegisterState (owned aggregates + session)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── auth.rs     ◄─── Login / whoami
//! │   ├── bill.rs     ◄─── Add/scan/remove/checkout/new
//! │   ├── catalog.rs  ◄─── Stock listing/search/editing, save/load
//! │   ├── users.rs    ◄─── User management (admin)
//! │   └── ledger.rs   ◄─── Bill history, total sales, save/load
//! └── error.rs        ◄─── ApiError for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: INFO, can be overridden with RUST_LOG                    │
//! │                                                                         │
//! │  2. Determine Database Path ──────────────────────────────────────────► │
//! │     • ./kirana.db in the working directory                              │
//! │     • KIRANA_DB_PATH environment variable overrides                     │
//! │                                                                         │
//! │  3. Connect to Store ─────────────────────────────────────────────────► │
//! │     • SQLite with WAL mode, run pending migrations                      │
//! │                                                                         │
//! │  4. Load State ───────────────────────────────────────────────────────► │
//! │     • catalog / users / bills (defaults when missing or unreadable)     │
//! │     • bootstrap default admin on an empty user directory                │
//! │                                                                         │
//! │  5. Login Loop, then Command Loop ────────────────────────────────────► │
//! │     • no command is reachable without a successful login                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::io::{self, BufRead, Write as _};
use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use kirana_store::{DbConfig, Store};

pub use error::{ApiError, ErrorCode};
pub use state::RegisterState;

/// Result of dispatching one command line.
#[derive(Debug)]
pub enum Outcome {
    /// Text to print.
    Message(String),
    /// Exit the register.
    Quit,
}

/// Runs the register: connect, load, login, command loop.
pub async fn run() -> Result<(), ApiError> {
    init_tracing();

    info!("Starting Kirana POS register");

    let db_path = database_path();
    info!(path = %db_path.display(), "Database path determined");

    let store = Store::new(DbConfig::new(db_path)).await?;
    let (mut state, notice) = RegisterState::load(&store).await?;

    if let Some((username, password)) = notice {
        println!("No users found. A default admin account was created:");
        println!("  username: {}", username);
        println!("  password: {}", password);
        println!("Please change it after login: passwd {} <new password>", username);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    // Login loop: nothing else is reachable until this succeeds
    loop {
        let Some(username) = prompt(&mut lines, "username: ") else {
            return Ok(());
        };
        if username.trim() == "exit" {
            return Ok(());
        }
        let Some(password) = prompt(&mut lines, "password: ") else {
            return Ok(());
        };

        match commands::auth::login(&mut state, username.trim(), &password) {
            Ok(message) => {
                println!("{}", message);
                break;
            }
            Err(err) => println!("! {}", err.message),
        }
    }

    println!("Type 'help' for commands.");

    // Command loop
    loop {
        let Some(line) = prompt(&mut lines, "kirana> ") else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match dispatch(&mut state, &store, line).await {
            Ok(Outcome::Message(message)) => println!("{}", message),
            Ok(Outcome::Quit) => break,
            Err(err) => println!("! {}", err.message),
        }
    }

    store.close().await;
    Ok(())
}

/// Parses one command line and runs the matching command.
///
/// Errors are recoverable by design: the caller prints the message and
/// keeps going.
pub async fn dispatch(
    state: &mut RegisterState,
    store: &Store,
    line: &str,
) -> Result<Outcome, ApiError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&command, args)) = tokens.split_first() else {
        return Ok(Outcome::Message(String::new()));
    };

    let message = match command {
        "help" => help_text(),
        "exit" | "quit" => return Ok(Outcome::Quit),

        // Billing
        "add" => {
            if args.len() < 2 {
                return Err(usage("add <item name> <qty>"));
            }
            let (qty, name) = (args[args.len() - 1], args[..args.len() - 1].join(" "));
            commands::bill::add(state, &name, qty)?
        }
        "scan" => {
            if args.len() != 1 {
                return Err(usage("scan <barcode>"));
            }
            commands::bill::scan(state, args[0])?
        }
        "remove" => {
            if args.len() != 1 {
                return Err(usage("remove <line number>"));
            }
            commands::bill::remove(state, args[0])?
        }
        "bill" => commands::bill::show(state)?,
        "new" => commands::bill::new_bill(state)?,
        "checkout" => {
            let discount = args.first().copied().unwrap_or("0");
            let tax = args.get(1).copied().unwrap_or("0");
            let customer = (args.len() > 2).then(|| args[2..].join(" "));
            commands::bill::checkout(state, store, discount, tax, customer.as_deref()).await?
        }

        // Catalog
        "stock" => commands::catalog::stock_list(state)?,
        "find" => {
            if args.is_empty() {
                return Err(usage("find <item name>"));
            }
            commands::catalog::find_item(state, &args.join(" "))?
        }
        "edit" => {
            if args.len() < 3 || args.len() > 5 {
                return Err(usage("edit <item> <stock> <price> [barcode] [overwrite]"));
            }
            let mut rest = &args[3..];
            let overwrite = rest.last() == Some(&"overwrite");
            if overwrite {
                rest = &rest[..rest.len() - 1];
            }
            let barcode = rest.first().copied();
            commands::catalog::edit_stock(state, args[0], args[1], args[2], barcode, overwrite)?
        }

        // Users
        "users" => commands::users::list(state)?,
        "useradd" => {
            if args.len() != 3 {
                return Err(usage("useradd <username> <password> <admin|cashier>"));
            }
            commands::users::add(state, store, args[0], args[1], args[2]).await?
        }
        "userdel" => {
            if args.len() != 1 {
                return Err(usage("userdel <username>"));
            }
            commands::users::delete(state, store, args[0]).await?
        }
        "passwd" => {
            if args.len() != 2 {
                return Err(usage("passwd <username> <new password>"));
            }
            commands::users::passwd(state, store, args[0], args[1]).await?
        }

        // Ledger & persistence
        "bills" => commands::ledger::view_bills(state)?,
        "sales" => commands::ledger::total_sales(state)?,
        "save" => {
            let stock = commands::catalog::save_stock(state, store).await?;
            let bills = commands::ledger::save_bills(state, store).await?;
            format!("{}\n{}", stock, bills)
        }
        "load" => {
            let stock = commands::catalog::reload_stock(state, store).await?;
            let bills = commands::ledger::reload_bills(state, store).await?;
            format!("{}\n{}", stock, bills)
        }

        "whoami" => commands::auth::whoami(state)?,

        _ => {
            return Err(ApiError::validation(format!(
                "Unknown command '{}', type 'help'",
                command
            )))
        }
    };

    Ok(Outcome::Message(message))
}

/// Prints a prompt and reads one line; `None` on EOF or read error.
fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    text: &str,
) -> Option<String> {
    print!("{}", text);
    let _ = io::stdout().flush();
    match lines.next() {
        Some(Ok(line)) => Some(line),
        _ => None,
    }
}

fn usage(text: &str) -> ApiError {
    ApiError::validation(format!("usage: {}", text))
}

fn help_text() -> String {
    "\
Billing:
  add <item name> <qty>      add an item to the bill
  scan <barcode>             add one unit by barcode
  remove <line number>       remove a bill line (restores stock)
  bill                       show the current bill
  checkout [disc%] [gst%] [customer]   finalize and print the receipt
  new                        abandon the bill and start the next one
Catalog:
  stock                      list all items
  find <item name>           show one item
  edit <item> <stock> <price> [barcode] [overwrite]   (admin)
Users (admin):
  users | useradd <user> <pass> <admin|cashier> | userdel <user> | passwd <user> <pass>
Ledger:
  bills                      show all recorded receipts
  sales                      show the running sales total
Persistence:
  save | load                flush / reload stock and bills
Other:
  whoami | help | exit"
        .to_string()
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - show debug messages
/// - `RUST_LOG=kirana_store=trace` - per-crate override
/// - Default: INFO level, sqlx quieted down
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Determines the database file path.
///
/// Defaults to `./kirana.db` in the working directory; set `KIRANA_DB_PATH`
/// to use a custom location.
fn database_path() -> PathBuf {
    match std::env::var("KIRANA_DB_PATH") {
        Ok(path) => PathBuf::from(path),
        Err(_) => PathBuf::from("kirana.db"),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    async fn logged_in_register() -> (RegisterState, Store) {
        let store = Store::new(DbConfig::in_memory()).await.unwrap();
        let (mut state, notice) = RegisterState::load(&store).await.unwrap();
        assert_eq!(notice, Some(("admin", "admin123")));
        commands::auth::login(&mut state, "admin", "admin123").unwrap();
        (state, store)
    }

    async fn run_line(state: &mut RegisterState, store: &Store, line: &str) -> String {
        match dispatch(state, store, line).await.unwrap() {
            Outcome::Message(message) => message,
            Outcome::Quit => panic!("unexpected quit"),
        }
    }

    #[tokio::test]
    async fn test_scenario_add_then_remove_line() {
        let (mut state, store) = logged_in_register().await;

        run_line(&mut state, &store, "add Apple 5").await;
        run_line(&mut state, &store, "remove 1").await;

        // Back to the starter defaults: 20 Apples, empty bill
        assert_eq!(state.catalog.find_by_name("Apple").unwrap().stock, 20);
        assert_eq!(state.session.subtotal().paise(), 0);
    }

    #[tokio::test]
    async fn test_scenario_checkout_updates_ledger() {
        let (mut state, store) = logged_in_register().await;

        run_line(&mut state, &store, "add Apple 3").await;
        run_line(&mut state, &store, "add Milk 2").await;
        let printout = run_line(&mut state, &store, "checkout").await;

        assert!(printout.contains("Total: ₹210.00"));
        assert_eq!(
            run_line(&mut state, &store, "sales").await,
            "Total Sales: ₹210.00"
        );
    }

    #[tokio::test]
    async fn test_dispatch_rejects_unknown_and_malformed_commands() {
        let (mut state, store) = logged_in_register().await;

        let err = dispatch(&mut state, &store, "teleport home").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = dispatch(&mut state, &store, "add").await.unwrap_err();
        assert!(err.message.starts_with("usage:"));

        let err = dispatch(&mut state, &store, "useradd onlyname").await.unwrap_err();
        assert!(err.message.starts_with("usage:"));
    }

    #[tokio::test]
    async fn test_dispatch_multiword_item_names() {
        let (mut state, store) = logged_in_register().await;

        run_line(&mut state, &store, "edit Parle-G 12 10").await;
        let msg = run_line(&mut state, &store, "add Parle-G 2").await;
        assert!(msg.contains("Parle-G x 2"));

        let found = run_line(&mut state, &store, "find Parle-G").await;
        assert!(found.contains("Stock: 10")); // 12 on the shelf minus the 2 on the bill
    }

    #[tokio::test]
    async fn test_quit_outcome() {
        let (mut state, store) = logged_in_register().await;
        assert!(matches!(
            dispatch(&mut state, &store, "exit").await.unwrap(),
            Outcome::Quit
        ));
    }
}
