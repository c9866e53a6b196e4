//! Authentication state: current user, bearer token, and where they persist.

mod credentials;
mod store;

use anyhow::Result;

pub use credentials::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, StoredSession, mask_token,
};
pub use store::{AuthState, BootstrapPhase, SessionStore};

use crate::api::ApiClient;
use crate::config::Config;

/// Opens the on-disk session configured for this home directory.
///
/// # Errors
/// Returns an error if the API base URL is invalid.
pub fn open(config: &Config) -> Result<SessionStore<FileCredentialStore>> {
    let client = ApiClient::from_config(config)?;
    Ok(SessionStore::new(client, FileCredentialStore::default())
        .logout_on_failed_revalidation(config.session.logout_on_failed_revalidation))
}
