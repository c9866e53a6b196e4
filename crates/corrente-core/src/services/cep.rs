//! Postal code (CEP) → address lookup.
//!
//! Best-effort enrichment for the registration wizard. The lookup service
//! answers `{ "erro": true }` for unknown codes, which maps to `Ok(None)`.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::Config;
use crate::registration::digits_only;

/// Address fields resolved from a CEP.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CepAddress {
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct CepClient {
    base_url: String,
    http: reqwest::Client,
}

impl CepClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.resolve_cep_lookup_url()?))
    }

    /// Looks up the address for `cep`.
    ///
    /// Returns `Ok(None)` when the CEP does not have 8 digits or is unknown.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response is malformed.
    pub async fn lookup(&self, cep: &str) -> Result<Option<CepAddress>> {
        let digits = digits_only(cep);
        if digits.len() != 8 {
            return Ok(None);
        }

        let url = format!("{}/{digits}/json/", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to send CEP lookup request")?;

        if !response.status().is_success() {
            anyhow::bail!("CEP lookup failed (HTTP {})", response.status());
        }

        let body: ViaCepResponse = response
            .json()
            .await
            .context("Failed to parse CEP lookup response")?;

        if body.erro.is_some_and(|v| v != serde_json::Value::Bool(false)) {
            return Ok(None);
        }

        Ok(Some(CepAddress {
            street: body.logradouro,
            neighborhood: body.bairro,
            city: body.localidade,
            state: body.uf,
        }))
    }
}
