//! Newsletter capture: normalization, shape validation and classification
//! of the upstream mailing-list outcome.
//!
//! Exactly three outcomes cross the HTTP boundary: user-correctable
//! validation failures, duplicate subscriptions (treated as success), and an
//! opaque failure bucket for everything else — upstream detail never leaks.

use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use thiserror::Error;

/// What the upstream provider said about a subscribe attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderOutcome {
    Subscribed,
    AlreadySubscribed,
    /// The provider rejected the address even though it passed our shape
    /// check (e.g. an undeliverable domain).
    InvalidAddress,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("mailing list request failed: {0}")]
    Http(String),
    #[error("mailing list upstream error (status {status}): {detail}")]
    Upstream { status: u16, detail: String },
}

/// Seam to the upstream mailing-list provider.
#[async_trait]
pub trait MailingListProvider: Send + Sync {
    async fn subscribe(&self, email: &str) -> Result<ProviderOutcome, ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    Created,
    /// The address was already on the list. Idempotent success.
    Duplicate,
}

#[derive(Debug, Error)]
pub enum SubscribeError {
    #[error("invalid email address")]
    InvalidAddress,
    #[error("newsletter provider is not configured")]
    NotConfigured,
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

pub struct NewsletterService {
    provider: Option<Arc<dyn MailingListProvider>>,
}

impl NewsletterService {
    pub fn new(provider: Option<Arc<dyn MailingListProvider>>) -> Self {
        Self { provider }
    }

    pub async fn subscribe(&self, raw_email: &str) -> Result<Subscription, SubscribeError> {
        let email = raw_email.trim().to_lowercase();
        if !is_valid_email(&email) {
            counter!("brezza_newsletter_subscribe_total", "outcome" => "invalid").increment(1);
            return Err(SubscribeError::InvalidAddress);
        }

        let Some(provider) = &self.provider else {
            counter!("brezza_newsletter_subscribe_total", "outcome" => "unconfigured")
                .increment(1);
            return Err(SubscribeError::NotConfigured);
        };

        match provider.subscribe(&email).await {
            Ok(ProviderOutcome::Subscribed) => {
                counter!("brezza_newsletter_subscribe_total", "outcome" => "subscribed")
                    .increment(1);
                Ok(Subscription::Created)
            }
            Ok(ProviderOutcome::AlreadySubscribed) => {
                counter!("brezza_newsletter_subscribe_total", "outcome" => "duplicate")
                    .increment(1);
                Ok(Subscription::Duplicate)
            }
            Ok(ProviderOutcome::InvalidAddress) => {
                counter!("brezza_newsletter_subscribe_total", "outcome" => "invalid").increment(1);
                Err(SubscribeError::InvalidAddress)
            }
            Err(err) => {
                counter!("brezza_newsletter_subscribe_total", "outcome" => "error").increment(1);
                Err(SubscribeError::Provider(err))
            }
        }
    }
}

/// `local@domain.tld` shape check: a non-empty local part, a single `@`, a
/// dotted domain, and no whitespace anywhere.
fn is_valid_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}
