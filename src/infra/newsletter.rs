//! Mailing-list provider client.
//!
//! Subscriptions go to the provider's members endpoint with basic auth.
//! Upstream 400s carry a JSON body whose `title`/`detail` pair
//! distinguishes "already on the list" (success for our purposes) from a
//! rejected address; everything else is an opaque upstream failure.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    application::newsletter::{MailingListProvider, ProviderError, ProviderOutcome},
    config::NewsletterSettings,
    infra::error::InfraError,
};

pub struct MailchimpClient {
    client: Client,
    members_endpoint: Url,
    api_key: String,
}

impl MailchimpClient {
    pub fn new(settings: &NewsletterSettings) -> Result<Self, InfraError> {
        let endpoint = format!(
            "https://{prefix}.api.mailchimp.com/3.0/lists/{audience}/members",
            prefix = settings.server_prefix,
            audience = settings.audience_id,
        );
        let members_endpoint = Url::parse(&endpoint).map_err(|err| {
            InfraError::configuration(format!("invalid mailing list endpoint `{endpoint}`: {err}"))
        })?;

        let client = Client::builder()
            .user_agent(concat!("brezza/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| {
                InfraError::configuration(format!("failed to build mailing list client: {err}"))
            })?;

        Ok(Self {
            client,
            members_endpoint,
            api_key: settings.api_key.clone(),
        })
    }
}

#[derive(Serialize)]
struct MemberPayload<'a> {
    email_address: &'a str,
    status: &'static str,
    tags: [&'static str; 2],
}

#[derive(Debug, Default, Deserialize)]
struct UpstreamErrorBody {
    #[serde(default)]
    title: String,
    #[serde(default)]
    detail: String,
}

#[async_trait]
impl MailingListProvider for MailchimpClient {
    async fn subscribe(&self, email: &str) -> Result<ProviderOutcome, ProviderError> {
        let response = self
            .client
            .post(self.members_endpoint.clone())
            .basic_auth("anystring", Some(&self.api_key))
            .json(&MemberPayload {
                email_address: email,
                status: "subscribed",
                tags: ["blog-subscriber", "website"],
            })
            .send()
            .await
            .map_err(|err| ProviderError::Http(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(ProviderOutcome::Subscribed);
        }

        let body: UpstreamErrorBody = response.json().await.unwrap_or_default();
        classify_failure(status, &body)
    }
}

fn classify_failure(
    status: StatusCode,
    body: &UpstreamErrorBody,
) -> Result<ProviderOutcome, ProviderError> {
    if status == StatusCode::BAD_REQUEST {
        if body.title == "Member Exists" || body.detail.contains("already a list member") {
            return Ok(ProviderOutcome::AlreadySubscribed);
        }
        if body.title == "Invalid Resource" || body.detail.contains("invalid email") {
            return Ok(ProviderOutcome::InvalidAddress);
        }
    }

    Err(ProviderError::Upstream {
        status: status.as_u16(),
        detail: if body.detail.is_empty() {
            body.title.clone()
        } else {
            body.detail.clone()
        },
    })
}
