//! Axum route handler for the status card image.

use std::time::Instant;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::layout::{plan_layout, BulletList, FontSelection};
use crate::render::{build_render_tree, RenderError};
use crate::state::AppState;

/// GET /api/latest.png
///
/// Feed fetch → font-size search → composition → rasterization. Nothing is cached;
/// every request runs the whole pipeline and the response is marked `no-store`.
pub async fn handle_latest_png(State(state): State<AppState>) -> Result<Response, AppError> {
    let bullets = state.source.fetch().await?;
    let line_count = bullets.len();
    let placeholder = bullets.is_placeholder();

    // Layout + rasterization are CPU-bound; keep them off the async executor.
    let started = Instant::now();
    let render_state = state.clone();
    let (selection, png) =
        tokio::task::spawn_blocking(move || render_card(&bullets, &render_state))
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("spawn_blocking failed in card render: {e}"))
            })??;

    info!(
        lines = line_count,
        placeholder,
        font_size = selection.font_size,
        fitted = selection.fitted,
        grammar = state.grammar.name(),
        bytes = png.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Rendered status card"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, state.compositor.content_type()),
            (header::CACHE_CONTROL, "no-store"),
        ],
        Bytes::from(png),
    )
        .into_response())
}

/// Synchronous render pipeline for one bullet list.
pub fn render_card(
    bullets: &BulletList,
    state: &AppState,
) -> Result<(FontSelection, Vec<u8>), RenderError> {
    let (selection, plan) = plan_layout(bullets, &state.layout, state.grammar.as_ref());
    let tree = build_render_tree(&plan, &state.theme, state.emphasis);
    let png = state.compositor.render(&tree)?;
    Ok((selection, png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::{body::Body, http::Request, routing::get, Json, Router};
    use resvg::usvg::fontdb;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::feed::{parse_feed_body, BulletSource, HttpBulletSource};
    use crate::layout::bullets::PLACEHOLDER_LINE;
    use crate::layout::default_layout_config;
    use crate::markup::GrammarKind;
    use crate::render::tree::{NodeKind, RenderNode};
    use crate::render::{Compositor, EmphasisPolicy, SvgCompositor, Theme};
    use crate::routes::build_router;

    /// Records every tree it is asked to render and returns fixed bytes.
    #[derive(Default)]
    struct RecordingCompositor {
        trees: Mutex<Vec<RenderNode>>,
    }

    impl Compositor for RecordingCompositor {
        fn render(&self, tree: &RenderNode) -> Result<Vec<u8>, RenderError> {
            self.trees.lock().unwrap().push(tree.clone());
            Ok(b"fake-png".to_vec())
        }
    }

    struct StaticSource(Vec<&'static str>);

    #[async_trait]
    impl BulletSource for StaticSource {
        async fn fetch(&self) -> Result<BulletList, AppError> {
            Ok(BulletList::from_lines(self.0.iter().copied()))
        }
    }

    fn make_state(source: Arc<dyn BulletSource>, compositor: Arc<dyn Compositor>) -> AppState {
        AppState {
            source,
            grammar: GrammarKind::Markdown.build(),
            compositor,
            layout: default_layout_config(),
            theme: Theme::default(),
            emphasis: EmphasisPolicy::Weight,
        }
    }

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/feed")
    }

    async fn get_card(state: AppState) -> Response {
        build_router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/latest.png")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_upstream_503_returns_feed_error_without_rendering() {
        let url = spawn_upstream(Router::new().route(
            "/feed",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "busy") }),
        ))
        .await;
        let compositor = Arc::new(RecordingCompositor::default());
        let state = make_state(
            Arc::new(HttpBulletSource::new(reqwest::Client::new(), url)),
            compositor.clone(),
        );

        let response = get_card(state).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_bytes(response).await, "Feed error");
        assert!(compositor.trees.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_feed_renders_only_placeholder() {
        let url = spawn_upstream(Router::new().route(
            "/feed",
            get(|| async { Json(json!({ "bullets": [] })) }),
        ))
        .await;
        let compositor = Arc::new(RecordingCompositor::default());
        let state = make_state(
            Arc::new(HttpBulletSource::new(reqwest::Client::new(), url)),
            compositor.clone(),
        );

        let response = get_card(state).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
        assert_eq!(body_bytes(response).await, "fake-png");

        let trees = compositor.trees.lock().unwrap();
        assert_eq!(trees.len(), 1);
        let rows: Vec<_> = trees[0].rows().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text_content(), PLACEHOLDER_LINE);
    }

    #[tokio::test]
    async fn test_each_request_renders_fresh() {
        let compositor = Arc::new(RecordingCompositor::default());
        let state = make_state(
            Arc::new(StaticSource(vec!["a **b** c", "*d*"])),
            compositor.clone(),
        );

        for _ in 0..2 {
            let response = get_card(state.clone()).await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        let trees = compositor.trees.lock().unwrap();
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0], trees[1]);
        let texts: Vec<String> = trees[0].rows().map(RenderNode::text_content).collect();
        assert_eq!(texts, vec!["a b c".to_string(), "d".to_string()]);
    }

    #[tokio::test]
    async fn test_state_emphasis_policy_reaches_render_tree() {
        let compositor = Arc::new(RecordingCompositor::default());
        let mut state = make_state(
            Arc::new(StaticSource(vec!["**hot** news"])),
            compositor.clone(),
        );
        state.emphasis = EmphasisPolicy::Highlight;

        let response = get_card(state).await;
        assert_eq!(response.status(), StatusCode::OK);

        let trees = compositor.trees.lock().unwrap();
        let row = trees[0].rows().next().unwrap();
        let hot = row
            .children
            .iter()
            .flat_map(|c| c.children.iter())
            .find(|n| n.kind == NodeKind::Run { text: "hot".to_string() })
            .unwrap();
        assert_eq!(
            hot.style.background.as_deref(),
            Some(Theme::default().highlight.as_str())
        );
        assert_eq!(hot.style.font_weight, Some(400));
    }

    #[test]
    fn test_render_card_with_svg_compositor_emits_png() {
        let state = make_state(
            Arc::new(StaticSource(vec![])),
            Arc::new(SvgCompositor::with_fontdb(0.55, fontdb::Database::new())),
        );
        let bullets = BulletList::from_lines(["Short line"]);
        let (selection, png) = render_card(&bullets, &state).unwrap();
        assert_eq!(selection.font_size, 48);
        assert!(png.starts_with(b"\x89PNG"));
    }

    #[test]
    fn test_render_card_accepts_control_characters_from_feed() {
        let state = make_state(
            Arc::new(StaticSource(vec![])),
            Arc::new(SvgCompositor::with_fontdb(0.55, fontdb::Database::new())),
        );
        let bullets = parse_feed_body(br#"{"bullets":["deploy \u0007 done","ok"]}"#);
        assert_eq!(bullets.len(), 2);
        let (_, png) = render_card(&bullets, &state).unwrap();
        assert!(png.starts_with(b"\x89PNG"));
    }
}
