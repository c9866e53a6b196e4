use anyhow::Result;
use corrente_types::{AuthPayload, User};

use super::credentials::{CredentialStore, StoredSession};
use crate::api::ApiClient;
use crate::services::auth::{self, RegistrationRequest};

/// Who is using the client right now.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Anonymous {
        loading: bool,
        error: Option<String>,
    },
    Authenticated {
        token: String,
        user: User,
    },
}

impl Default for AuthState {
    fn default() -> Self {
        AuthState::Anonymous {
            loading: false,
            error: None,
        }
    }
}

/// Startup session restoration progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapPhase {
    /// Reading the credential store.
    Hydrating,
    /// Nothing stored; no network call was made.
    Anonymous,
    /// Restored from storage, not yet checked against the server.
    Optimistic,
    /// Profile fetch succeeded; the stored user was refreshed.
    Confirmed,
    /// Profile fetch failed; the stored session is kept.
    Unconfirmed { error: String },
    /// Profile fetch failed and the session was cleared.
    Reverted { error: String },
}

/// Holds the current user and token; owns the API client's bearer token.
///
/// Login and registration persist `{token, user}` through the injected
/// [`CredentialStore`]; logout clears it. A failed operation while anonymous
/// lands in `Anonymous { error }`. While authenticated the session is kept
/// and the error is returned to the caller.
#[derive(Debug)]
pub struct SessionStore<S> {
    client: ApiClient,
    credentials: S,
    state: AuthState,
    phase: BootstrapPhase,
    logout_on_failed_revalidation: bool,
}

impl<S: CredentialStore> SessionStore<S> {
    pub fn new(client: ApiClient, credentials: S) -> Self {
        Self {
            client,
            credentials,
            state: AuthState::default(),
            phase: BootstrapPhase::Hydrating,
            logout_on_failed_revalidation: false,
        }
    }

    /// Clear stored credentials when the startup profile check fails.
    #[must_use]
    pub fn logout_on_failed_revalidation(mut self, enabled: bool) -> Self {
        self.logout_on_failed_revalidation = enabled;
        self
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn phase(&self) -> &BootstrapPhase {
        &self.phase
    }

    /// Client carrying the current bearer token, if any.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn credentials(&self) -> &S {
        &self.credentials
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            AuthState::Authenticated { user, .. } => Some(user),
            AuthState::Anonymous { .. } => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match &self.state {
            AuthState::Authenticated { token, .. } => Some(token),
            AuthState::Anonymous { .. } => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated { .. })
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }

    /// Last error recorded while anonymous.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            AuthState::Anonymous { error, .. } => error.as_deref(),
            AuthState::Authenticated { .. } => None,
        }
    }

    /// Restores a stored session without touching the network.
    ///
    /// Returns whether a session was found.
    ///
    /// # Errors
    /// Returns an error if the credential store cannot be read.
    pub fn hydrate(&mut self) -> Result<bool> {
        self.phase = BootstrapPhase::Hydrating;
        match self.credentials.load()? {
            Some(stored) => {
                tracing::debug!(user = %stored.user.id, "restored stored session");
                self.authenticate(stored.token, stored.user);
                self.phase = BootstrapPhase::Optimistic;
                Ok(true)
            }
            None => {
                self.phase = BootstrapPhase::Anonymous;
                Ok(false)
            }
        }
    }

    /// Hydrates from storage, then revalidates the session with a profile fetch.
    ///
    /// A failed revalidation is not an error: it ends in
    /// [`BootstrapPhase::Unconfirmed`] or, when configured,
    /// [`BootstrapPhase::Reverted`].
    ///
    /// # Errors
    /// Returns an error if the credential store cannot be read or written.
    pub async fn bootstrap(&mut self) -> Result<&BootstrapPhase> {
        if !self.hydrate()? {
            return Ok(&self.phase);
        }

        match auth::profile(&self.client).await {
            Ok(user) => {
                self.replace_user(user)?;
                self.phase = BootstrapPhase::Confirmed;
            }
            Err(err) if self.logout_on_failed_revalidation => {
                tracing::warn!(error = %err, "session revalidation failed; signing out");
                self.clear_session()?;
                self.phase = BootstrapPhase::Reverted {
                    error: err.to_string(),
                };
            }
            Err(err) => {
                tracing::warn!(error = %err, "session revalidation failed; keeping stored session");
                self.phase = BootstrapPhase::Unconfirmed {
                    error: err.to_string(),
                };
            }
        }
        Ok(&self.phase)
    }

    /// Signs in and persists the session.
    ///
    /// # Errors
    /// Returns the API error (also recorded in the anonymous state), or an
    /// error if the session cannot be persisted.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&User> {
        self.begin();
        let result = auth::login(&self.client, email, password).await;
        self.finish_auth(result)
    }

    /// Creates the account and signs in.
    ///
    /// # Errors
    /// Returns the API error (also recorded in the anonymous state), or an
    /// error if the session cannot be persisted.
    pub async fn register(&mut self, request: &RegistrationRequest) -> Result<&User> {
        self.begin();
        let result = auth::register(&self.client, request).await;
        self.finish_auth(result)
    }

    /// Drops the session locally and in storage.
    ///
    /// # Errors
    /// Returns an error if stored credentials cannot be removed.
    pub fn logout(&mut self) -> Result<()> {
        self.clear_session()?;
        tracing::info!("signed out");
        Ok(())
    }

    /// Re-fetches the profile and persists it.
    ///
    /// # Errors
    /// Returns an error when signed out, when the request fails, or when the
    /// session cannot be persisted.
    pub async fn refresh_profile(&mut self) -> Result<&User> {
        self.require_session()?;
        let user = auth::profile(&self.client).await?;
        self.replace_user(user)?;
        self.user()
            .ok_or_else(|| anyhow::anyhow!("Not signed in"))
    }

    /// Confirms the email code, then refreshes the profile's verification flags.
    ///
    /// # Errors
    /// Returns an error when signed out or when the server rejects the code.
    pub async fn verify_email(&mut self, code: &str) -> Result<Option<String>> {
        self.require_session()?;
        let message = auth::verify_email(&self.client, code).await?;
        self.refresh_after_verification().await;
        Ok(message)
    }

    /// Confirms the SMS code, then refreshes the profile's verification flags.
    ///
    /// # Errors
    /// Returns an error when signed out or when the server rejects the code.
    pub async fn verify_phone(&mut self, code: &str) -> Result<Option<String>> {
        self.require_session()?;
        let message = auth::verify_phone(&self.client, code).await?;
        self.refresh_after_verification().await;
        Ok(message)
    }

    /// # Errors
    /// Returns an error when signed out or when the request fails.
    pub async fn resend_email_verification(&self) -> Result<Option<String>> {
        self.require_session()?;
        Ok(auth::resend_email_verification(&self.client).await?)
    }

    /// # Errors
    /// Returns an error when signed out or when the request fails.
    pub async fn resend_phone_verification(&self) -> Result<Option<String>> {
        self.require_session()?;
        Ok(auth::resend_phone_verification(&self.client).await?)
    }

    fn begin(&mut self) {
        if let AuthState::Anonymous { loading, error } = &mut self.state {
            *loading = true;
            *error = None;
        }
    }

    fn finish_auth(
        &mut self,
        result: Result<AuthPayload, crate::api::ApiError>,
    ) -> Result<&User> {
        match result {
            Ok(payload) => {
                self.credentials.save(&StoredSession {
                    token: payload.access_token.clone(),
                    user: payload.user.clone(),
                })?;
                tracing::info!(user = %payload.user.id, "signed in");
                self.authenticate(payload.access_token, payload.user);
                self.user()
                    .ok_or_else(|| anyhow::anyhow!("Not signed in"))
            }
            Err(err) => {
                if let AuthState::Anonymous { loading, error } = &mut self.state {
                    *loading = false;
                    *error = Some(err.to_string());
                }
                Err(err.into())
            }
        }
    }

    fn authenticate(&mut self, token: String, user: User) {
        self.client.set_token(Some(token.clone()));
        self.state = AuthState::Authenticated { token, user };
    }

    fn replace_user(&mut self, fresh: User) -> Result<()> {
        if let AuthState::Authenticated { token, user } = &mut self.state {
            self.credentials.save(&StoredSession {
                token: token.clone(),
                user: fresh.clone(),
            })?;
            *user = fresh;
        }
        Ok(())
    }

    fn clear_session(&mut self) -> Result<()> {
        self.credentials.clear()?;
        self.client.set_token(None);
        self.state = AuthState::default();
        Ok(())
    }

    fn require_session(&self) -> Result<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            anyhow::bail!("Not signed in. Run `corrente login` first.")
        }
    }

    async fn refresh_after_verification(&mut self) {
        if let Err(err) = self.refresh_profile().await {
            tracing::debug!(error = %err, "profile refresh after verification failed");
        }
    }
}
