//! Headless content store client.
//!
//! Articles live in a hosted content store queried over HTTP with GROQ
//! strings; responses come wrapped in a `{result}` envelope where `null`
//! means "no such document". The store is the source of truth for document
//! shape validation — this client only decodes, it never repairs.

pub mod image;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::{
    config::ContentStoreSettings,
    domain::posts::{PostDocument, PostSummary},
};

const POST_BY_SLUG_QUERY: &str = r#"*[_type == "post" && slug.current == $slug][0]{
  title,
  "slug": slug.current,
  description,
  "author": author->{name, "avatar": image.asset->url},
  "thumbnail": {"asset": thumbnail.asset->{_id, url}, "alt": thumbnail.alt},
  "tags": coalesce(tags, []),
  publishedAt,
  "sections": coalesce(sections[]{
    title,
    "content": coalesce(content[]{..., asset->}, [])
  }, [])
}"#;

const LIST_POSTS_QUERY: &str = r#"*[_type == "post" && defined(publishedAt)] | order(publishedAt desc){
  title,
  "slug": slug.current,
  description,
  "author": author->{name, "avatar": image.asset->url},
  "thumbnail": {"asset": thumbnail.asset->{_id, url}, "alt": thumbnail.alt},
  "tags": coalesce(tags, []),
  publishedAt
}"#;

#[derive(Debug, Error)]
pub enum ContentStoreError {
    #[error("invalid content store configuration: {message}")]
    Configuration { message: String },
    #[error("content store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("content store returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode content store payload: {message}")]
    Payload { message: String },
}

/// Query contract against the content source: a slug resolves to at most one
/// document; no slug means the listing.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn find_post(&self, slug: &str) -> Result<Option<PostDocument>, ContentStoreError>;
    async fn list_posts(&self) -> Result<Vec<PostSummary>, ContentStoreError>;
}

#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: Option<T>,
}

pub struct SanityContentStore {
    client: Client,
    query_endpoint: Url,
    token: Option<String>,
}

impl SanityContentStore {
    pub fn new(settings: &ContentStoreSettings) -> Result<Self, ContentStoreError> {
        let host = if settings.use_cdn {
            "apicdn.sanity.io"
        } else {
            "api.sanity.io"
        };
        let endpoint = format!(
            "https://{project}.{host}/v{version}/data/query/{dataset}",
            project = settings.project_id,
            version = settings.api_version,
            dataset = settings.dataset,
        );
        let query_endpoint =
            Url::parse(&endpoint).map_err(|err| ContentStoreError::Configuration {
                message: format!("invalid query endpoint `{endpoint}`: {err}"),
            })?;

        let client = Client::builder()
            .user_agent(concat!("brezza/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            query_endpoint,
            token: settings.token.clone(),
        })
    }

    async fn query<T: DeserializeOwned>(
        &self,
        groq: &str,
        params: &[(&str, String)],
    ) -> Result<Option<T>, ContentStoreError> {
        let mut url = self.query_endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", groq);
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
        }

        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(ContentStoreError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let envelope: QueryResponse<T> =
            serde_json::from_slice(&bytes).map_err(|err| ContentStoreError::Payload {
                message: err.to_string(),
            })?;
        Ok(envelope.result)
    }
}

#[async_trait]
impl ContentStore for SanityContentStore {
    async fn find_post(&self, slug: &str) -> Result<Option<PostDocument>, ContentStoreError> {
        // Query parameter values travel JSON-encoded.
        let encoded =
            serde_json::to_string(slug).map_err(|err| ContentStoreError::Configuration {
                message: format!("slug `{slug}` is not encodable: {err}"),
            })?;
        self.query(POST_BY_SLUG_QUERY, &[("$slug", encoded)]).await
    }

    async fn list_posts(&self) -> Result<Vec<PostSummary>, ContentStoreError> {
        Ok(self
            .query(LIST_POSTS_QUERY, &[])
            .await?
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_result_means_not_found() {
        let envelope: QueryResponse<PostDocument> =
            serde_json::from_str(r#"{"result": null, "ms": 3}"#).expect("decode");
        assert!(envelope.result.is_none());
    }

    #[test]
    fn store_payload_decodes_into_a_document() {
        let payload = serde_json::json!({
            "result": {
                "title": "Hello",
                "slug": "hello",
                "tags": [],
                "sections": [{
                    "title": "Intro",
                    "content": [{
                        "_type": "block",
                        "style": "normal",
                        "children": [{"_type": "span", "text": "hi", "marks": []}],
                        "markDefs": []
                    }]
                }]
            }
        });

        let envelope: QueryResponse<PostDocument> =
            serde_json::from_value(payload).expect("decode");
        let document = envelope.result.expect("document");
        assert_eq!(document.sections.len(), 1);
        assert_eq!(document.sections[0].content.len(), 1);
    }

    #[test]
    fn cdn_toggle_selects_the_cdn_host() {
        let settings = ContentStoreSettings {
            project_id: "abc123".to_string(),
            dataset: "production".to_string(),
            api_version: "2025-08-28".to_string(),
            use_cdn: true,
            token: None,
        };
        let store = SanityContentStore::new(&settings).expect("store");
        assert_eq!(
            store.query_endpoint.as_str(),
            "https://abc123.apicdn.sanity.io/v2025-08-28/data/query/production"
        );
    }
}
