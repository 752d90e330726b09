use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const DEFAULT_PROVIDER_URL: &str = "https://thesimpsonsquoteapi.glitch.me/quotes";
const USER_AGENT_STR: &str = "1.0";

/// A quote as handed out by the provider. Not persisted until a user saves it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Quote {
    pub quote: String,
    pub character: String,
    pub image: String,
    pub character_direction: String,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("quote provider timed out")]
    Timeout(#[source] reqwest::Error),
    #[error("quote provider request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("quote provider answered with status {0}")]
    Status(u16),
    #[error("quote provider sent an unreadable body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ProviderError {
    fn classify(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(err)
        } else if err.is_decode() {
            ProviderError::Decode(err)
        } else {
            ProviderError::Request(err)
        }
    }
}

#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_random_quotes(&self, count: usize) -> Result<Vec<Quote>, ProviderError>;
}

pub struct ProviderClient {
    client: reqwest::Client,
    url: Url,
}

impl ProviderClient {
    pub fn new(url: Url, timeout: Duration) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STR));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl QuoteSource for ProviderClient {
    async fn fetch_random_quotes(&self, count: usize) -> Result<Vec<Quote>, ProviderError> {
        let resp = self
            .client
            .get(self.url.clone())
            .query(&[("count", count)])
            .send()
            .await
            .map_err(ProviderError::classify)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let quotes: Vec<Quote> = resp.json().await.map_err(ProviderError::classify)?;
        if quotes.len() != count {
            log::debug!("provider returned {} quotes, {} requested", quotes.len(), count);
        }
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::HeaderMap as AxumHeaders, routing::get, Json, Router};
    use std::collections::HashMap;

    async fn spawn_provider(app: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{}/quotes", addr)).unwrap()
    }

    async fn echo_quotes(
        Query(params): Query<HashMap<String, String>>,
        headers: AxumHeaders,
    ) -> Json<serde_json::Value> {
        let count: usize = params["count"].parse().unwrap();
        let agent = headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let quotes: Vec<_> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "quote": format!("quote {i}"),
                    "character": agent,
                    "image": format!("http://img/{i}.png"),
                    "characterDirection": "Right",
                })
            })
            .collect();
        Json(serde_json::Value::Array(quotes))
    }

    #[test]
    fn quote_decodes_provider_record() {
        let raw = r#"{
            "quote": "Nothing you say can upset us. We're the MTV generation.",
            "character": "Bart Simpson",
            "image": "https://cdn/bart.png",
            "characterDirection": "Right",
            "extra": 1
        }"#;
        let quote: Quote = serde_json::from_str(raw).unwrap();
        assert_eq!(quote.character, "Bart Simpson");
        assert_eq!(quote.character_direction, "Right");
        assert_eq!(quote.image, "https://cdn/bart.png");
    }

    #[tokio::test]
    async fn fetch_sends_count_and_user_agent() {
        let url = spawn_provider(Router::new().route("/quotes", get(echo_quotes))).await;
        let client = ProviderClient::new(url, Duration::from_secs(5)).unwrap();

        let quotes = client.fetch_random_quotes(10).await.unwrap();
        assert_eq!(quotes.len(), 10);
        assert_eq!(quotes[3].quote, "quote 3");
        assert_eq!(quotes[3].character, USER_AGENT_STR);
        assert_eq!(quotes[3].character_direction, "Right");
    }

    #[tokio::test]
    async fn fetch_accepts_short_result() {
        let app = Router::new().route(
            "/quotes",
            get(|| async {
                Json(serde_json::json!([{
                    "quote": "Eat my shorts",
                    "character": "Bart Simpson",
                    "image": "http://img/bart.png",
                    "characterDirection": "Right"
                }]))
            }),
        );
        let url = spawn_provider(app).await;
        let client = ProviderClient::new(url, Duration::from_secs(5)).unwrap();

        let quotes = client.fetch_random_quotes(10).await.unwrap();
        assert_eq!(quotes.len(), 1);
    }

    #[tokio::test]
    async fn fetch_reports_non_success_status() {
        let app = Router::new().route(
            "/quotes",
            get(|| async { (axum::http::StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let url = spawn_provider(app).await;
        let client = ProviderClient::new(url, Duration::from_secs(5)).unwrap();

        let err = client.fetch_random_quotes(10).await.unwrap_err();
        assert!(matches!(err, ProviderError::Status(503)));
    }

    #[tokio::test]
    async fn fetch_reports_undecodable_body() {
        let app = Router::new().route("/quotes", get(|| async { "not json" }));
        let url = spawn_provider(app).await;
        let client = ProviderClient::new(url, Duration::from_secs(5)).unwrap();

        let err = client.fetch_random_quotes(10).await.unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)));
    }

    #[tokio::test]
    async fn fetch_reports_timeout() {
        let app = Router::new().route(
            "/quotes",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(serde_json::json!([]))
            }),
        );
        let url = spawn_provider(app).await;
        let client = ProviderClient::new(url, Duration::from_millis(100)).unwrap();

        let err = client.fetch_random_quotes(10).await.unwrap_err();
        assert!(matches!(err, ProviderError::Timeout(_)));
    }

    #[tokio::test]
    async fn fetch_reports_unreachable_provider() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let url = Url::parse(&format!("http://{}/quotes", addr)).unwrap();
        let client = ProviderClient::new(url, Duration::from_secs(5)).unwrap();

        let err = client.fetch_random_quotes(10).await.unwrap_err();
        assert!(matches!(err, ProviderError::Request(_)));
    }
}
