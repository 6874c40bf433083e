//! Provider tests against a local HTTP server.

use axum::{Json, Router, extract::Query, http::StatusCode, response::Html, routing::get};
use bluebox_context::{ContextConfig, WebContext, WebContextProvider};
use bluebox_error::{BlueboxErrorKind, ContextErrorKind};
use bluebox_interface::ContextProvider;
use serde_json::json;
use std::collections::HashMap;

async fn serve(router: Router) -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://{addr}"))
}

fn router() -> Router {
    Router::new()
        .route(
            "/html/",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let q = params.get("q").cloned().unwrap_or_default();
                Html(format!(
                    r#"<div class="result__body"><a class="result__a">About {q}</a><a class="result__snippet">Snippet</a></div>"#
                ))
            }),
        )
        .route(
            "/page",
            get(|| async { Html("<html><script>x()</script><p>Hello page</p></html>") }),
        )
        .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
        .route(
            "/large",
            get(|| async { Html(format!("<p>{}</p>", "a".repeat(64 * 1024))) }),
        )
        .route(
            "/news",
            get(|| async {
                Json(json!({"World": [{"title": "Headline", "source": "Wire", "link": "l"}]}))
            }),
        )
}

fn local_config(base: &str) -> ContextConfig {
    ContextConfig::default()
        .with_endpoints(format!("{base}/html/"), format!("{base}/news"))
        .with_private_hosts(true)
}

async fn provider() -> anyhow::Result<(WebContextProvider, String)> {
    let base = serve(router()).await?;
    Ok((WebContextProvider::new(local_config(&base))?, base))
}

#[tokio::test]
async fn plain_query_searches() -> anyhow::Result<()> {
    let (provider, _) = provider().await?;
    let context = provider.lookup("rust traits").await?;
    let WebContext::Search { content, query } = context else {
        panic!("expected search");
    };
    assert_eq!(query, "rust traits");
    assert!(content.contains("About rust traits"));
    Ok(())
}

#[tokio::test]
async fn url_query_scrapes() -> anyhow::Result<()> {
    let (provider, base) = provider().await?;
    let url = format!("{base}/page");
    let context = provider.lookup(&url).await?;
    assert_eq!(
        context,
        WebContext::Scrape {
            content: "Hello page".to_string(),
            url
        }
    );
    Ok(())
}

#[tokio::test]
async fn failed_page_is_a_fetch_error() -> anyhow::Result<()> {
    let (provider, base) = provider().await?;
    let err = provider.lookup(&format!("{base}/missing")).await.unwrap_err();
    assert!(matches!(
        err.kind(),
        BlueboxErrorKind::Context(e) if matches!(e.kind(), ContextErrorKind::Fetch(_))
    ));
    Ok(())
}

#[tokio::test]
async fn blank_query_is_rejected() -> anyhow::Result<()> {
    let (provider, _) = provider().await?;
    let err = provider.lookup("   ").await.unwrap_err();
    assert!(matches!(
        err.kind(),
        BlueboxErrorKind::Context(e) if e.kind() == &ContextErrorKind::MissingQuery
    ));
    Ok(())
}

#[tokio::test]
async fn news_context_renders_headlines() -> anyhow::Result<()> {
    let (provider, _) = provider().await?;
    assert_eq!(
        provider.news_context().await?,
        "Latest headlines:\n- Headline (Wire)"
    );
    Ok(())
}

#[tokio::test]
async fn loopback_scrape_is_refused_by_default() -> anyhow::Result<()> {
    let base = serve(router()).await?;
    let config = ContextConfig::default()
        .with_endpoints(format!("{base}/html/"), format!("{base}/news"));
    let provider = WebContextProvider::new(config)?;

    let err = provider.lookup(&format!("{base}/page")).await.unwrap_err();
    assert!(matches!(
        err.kind(),
        BlueboxErrorKind::Context(e) if matches!(e.kind(), ContextErrorKind::BlockedHost(_))
    ));

    // Configured endpoints are trusted even when local.
    assert!(provider.lookup("rust traits").await.is_ok());
    Ok(())
}

#[tokio::test]
async fn oversized_body_is_truncated() -> anyhow::Result<()> {
    let base = serve(router()).await?;
    let provider = WebContextProvider::new(local_config(&base).with_max_body_bytes(1024))?;

    let context = provider.lookup(&format!("{base}/large")).await?;
    let length = context.content().len();
    assert!(length > 0 && length <= 1024, "kept {length} chars");
    Ok(())
}
