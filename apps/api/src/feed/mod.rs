//! Feed boundary — fetches the raw bullet strings from the configured upstream.
//!
//! One GET per render with a `t=<unix millis>` cache-buster. No retries: a non-success
//! status or transport failure is terminal for the request. Any body that does not
//! carry a non-empty `bullets` string array becomes the placeholder line.

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::layout::BulletList;

/// Source of bullet lines. Carried in `AppState` as `Arc<dyn BulletSource>`.
#[async_trait]
pub trait BulletSource: Send + Sync {
    async fn fetch(&self) -> Result<BulletList, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP source
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct HttpBulletSource {
    client: Client,
    url: String,
}

impl HttpBulletSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl BulletSource for HttpBulletSource {
    async fn fetch(&self) -> Result<BulletList, AppError> {
        let url = cache_busted_url(&self.url, chrono::Utc::now().timestamp_millis());
        debug!(%url, "Fetching bullet feed");

        let response = self
            .client
            .get(&url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamFetch {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(e.to_string()))?;

        Ok(parse_feed_body(&body))
    }
}

/// Appends `t=<millis>`, joining with `&` when the URL already has a query.
pub fn cache_busted_url(src: &str, millis: i64) -> String {
    let sep = if src.contains('?') { '&' } else { '?' };
    format!("{src}{sep}t={millis}")
}

/// Extracts `bullets` from a feed body. Malformed or empty feeds yield the placeholder.
///
/// Non-string array entries are skipped.
pub fn parse_feed_body(body: &[u8]) -> BulletList {
    let value: Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "Feed body is not JSON; using placeholder");
            return BulletList::placeholder();
        }
    };

    let Some(items) = value.get("bullets").and_then(Value::as_array) else {
        warn!("Feed has no `bullets` array; using placeholder");
        return BulletList::placeholder();
    };

    let lines: Vec<String> = items
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();
    if lines.len() < items.len() {
        warn!(
            skipped = items.len() - lines.len(),
            "Skipped non-string bullet entries"
        );
    }
    BulletList::from_lines(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    use crate::layout::bullets::PLACEHOLDER_LINE;

    /// Serves `router` on an ephemeral port and returns its base URL.
    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_cache_busted_url_separator() {
        assert_eq!(cache_busted_url("https://x/feed", 42), "https://x/feed?t=42");
        assert_eq!(
            cache_busted_url("https://x/feed?key=1", 42),
            "https://x/feed?key=1&t=42"
        );
    }

    #[test]
    fn test_parse_feed_body_reads_bullets_in_order() {
        let body = json!({ "bullets": ["one", "**two**"] }).to_string();
        let list = parse_feed_body(body.as_bytes());
        assert_eq!(list.lines(), &["one".to_string(), "**two**".to_string()]);
    }

    #[test]
    fn test_parse_feed_body_empty_array_is_placeholder() {
        let list = parse_feed_body(br#"{ "bullets": [] }"#);
        assert!(list.is_placeholder());
        assert_eq!(list.lines(), &[PLACEHOLDER_LINE.to_string()]);
    }

    #[test]
    fn test_parse_feed_body_wrong_shapes_are_placeholder() {
        let bodies: [&[u8]; 7] = [
            br#"{}"#,
            br#"{ "bullets": "nope" }"#,
            br#"{ "bullets": null }"#,
            br#"["a", "b"]"#,
            br#"not json"#,
            br#""#,
            br#"{ "bullets": [1, 2, {}] }"#,
        ];
        for body in bodies {
            assert!(
                parse_feed_body(body).is_placeholder(),
                "expected placeholder for {:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_parse_feed_body_skips_non_strings() {
        let list = parse_feed_body(br#"{ "bullets": ["a", 3, "b", null] }"#);
        assert_eq!(list.lines(), &["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_http_source_fetches_with_cache_buster() {
        let router = Router::new().route(
            "/feed",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                let t = q.get("t").cloned().unwrap_or_default();
                Json(json!({ "bullets": [format!("t={t}"), q.get("k").cloned().unwrap_or_default()] }))
            }),
        );
        let base = spawn_upstream(router).await;
        let source = HttpBulletSource::new(Client::new(), format!("{base}/feed?k=v"));

        let list = source.fetch().await.unwrap();
        assert_eq!(list.len(), 2);
        let stamp = list.lines()[0].trim_start_matches("t=");
        assert!(stamp.parse::<i64>().is_ok(), "missing timestamp: {stamp}");
        assert_eq!(list.lines()[1], "v");
    }

    #[tokio::test]
    async fn test_http_source_non_success_is_error() {
        let router = Router::new().route(
            "/feed",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let base = spawn_upstream(router).await;
        let source = HttpBulletSource::new(Client::new(), format!("{base}/feed"));

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamFetch { status: 503 }));
    }

    #[tokio::test]
    async fn test_http_source_unreachable_is_error() {
        // Bind then drop to get a port nobody is listening on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = HttpBulletSource::new(Client::new(), format!("http://{addr}/feed"));
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamUnavailable(_)));
    }
}
