//! Credit-ledger boundary.
//!
//! Billing storage is an external collaborator; this crate only needs
//! "debit N credits for user U" after a job completes. Credits are charged
//! on success only, never upfront and never on failure.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Credit operation errors.
#[derive(Debug, Error)]
pub enum CreditError {
    #[error("Credit service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Credit service rejected debit: {0}")]
    Rejected(String),
}

/// External credit ledger.
#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// Debit `amount` credits from `owner_id`'s balance.
    async fn debit(&self, owner_id: &str, amount: u32) -> Result<(), CreditError>;
}

#[derive(Debug, Serialize)]
struct DebitRequest<'a> {
    owner_id: &'a str,
    amount: u32,
}

/// HTTP-backed ledger talking to the external billing service.
pub struct RemoteCreditLedger {
    base_url: String,
    client: Client,
}

impl RemoteCreditLedger {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    /// Create from environment. Returns `None` when `CREDITS_SERVICE_URL`
    /// is unset.
    pub fn from_env() -> Option<Self> {
        std::env::var("CREDITS_SERVICE_URL").ok().map(Self::new)
    }
}

#[async_trait]
impl CreditLedger for RemoteCreditLedger {
    async fn debit(&self, owner_id: &str, amount: u32) -> Result<(), CreditError> {
        let url = format!("{}/debit", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .json(&DebitRequest { owner_id, amount })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CreditError::Rejected(format!("{}: {}", status, body)));
        }

        info!(owner_id = %owner_id, amount = amount, "Debited credits");
        Ok(())
    }
}

/// No-op ledger for environments without a billing service configured.
pub struct NoopCreditLedger;

#[async_trait]
impl CreditLedger for NoopCreditLedger {
    async fn debit(&self, owner_id: &str, amount: u32) -> Result<(), CreditError> {
        info!(
            owner_id = %owner_id,
            amount = amount,
            "Credit debit skipped (no ledger configured)"
        );
        Ok(())
    }
}
