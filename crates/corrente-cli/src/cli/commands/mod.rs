//! CLI command handlers.

pub mod admin;
pub mod auth;
pub mod config;
pub mod donations;
pub mod output;
pub mod prompt;
pub mod register;

use anyhow::{Result, bail};
use corrente_core::config::Config;
use corrente_core::session::{self, FileCredentialStore, SessionStore};

type Session = SessionStore<FileCredentialStore>;

/// Context attached to failed list fetches.
const LIST_RETRY: &str = "Could not load the list. Try again in a moment";

/// Restores the stored session without a network round trip.
fn signed_in(config: &Config) -> Result<Session> {
    let mut session = session::open(config)?;
    if !session.hydrate()? {
        bail!("Not signed in. Run `corrente login` first.");
    }
    Ok(session)
}

/// Like [`signed_in`], but also requires the admin role.
fn admin_session(config: &Config) -> Result<Session> {
    let session = signed_in(config)?;
    if !session.is_admin() {
        bail!("This command requires an admin account.");
    }
    Ok(session)
}

/// Prints the server's confirmation message, or `fallback` when it sent none.
fn print_message(message: Option<String>, fallback: &str) {
    println!("✓ {}", message.as_deref().unwrap_or(fallback));
}
