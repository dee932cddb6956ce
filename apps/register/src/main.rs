//! Binary entry point for the Kirana POS register.
//!
//! All real logic lives in the library so tests can drive it; this file
//! only starts the runtime and reports a fatal startup error.

#[tokio::main]
async fn main() {
    if let Err(err) = kirana_register::run().await {
        eprintln!("fatal: {}", err.message);
        std::process::exit(1);
    }
}
