//! Exercises the streaming client against a local mock endpoint.

use axum::{Router, http::StatusCode, response::IntoResponse, routing::post};
use bluebox_core::{ConversationMessage, GenerateRequest};
use bluebox_error::{BlueboxErrorKind, ModelsErrorKind};
use bluebox_interface::Streaming;
use bluebox_models::GroqDriver;
use futures_util::StreamExt;

async fn serve(router: Router) -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://{addr}/v1/chat/completions"))
}

fn request() -> anyhow::Result<GenerateRequest> {
    Ok(GenerateRequest::builder()
        .model("llama-3.1-8b-instant")
        .messages(vec![ConversationMessage::user("hello")])
        .build()?)
}

async fn sse_ok() -> impl IntoResponse {
    let body = concat!(
        "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"},\"finish_reason\":null}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hello\"},\"finish_reason\":null}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\" there\"},\"finish_reason\":null}]}\n\n",
        "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
        "data: [DONE]\n\n",
    );
    ([("content-type", "text/event-stream")], body)
}

#[tokio::test]
async fn streams_fragments_in_order() -> anyhow::Result<()> {
    let url = serve(Router::new().route("/v1/chat/completions", post(sse_ok))).await?;
    let driver = GroqDriver::with_api_key("test-key".to_string(), Some(url))?;

    let mut stream = driver.generate_stream(&request()?).await?;
    let mut text = String::new();
    let mut finals = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        text.push_str(&chunk.content);
        if chunk.is_final {
            finals += 1;
        }
    }
    assert_eq!(text, "Hello there");
    assert!(finals >= 1);
    Ok(())
}

#[tokio::test]
async fn non_success_status_fails_before_streaming() -> anyhow::Result<()> {
    let handler = || async {
        (
            StatusCode::BAD_REQUEST,
            r#"{"error":{"message":"model not found","type":"invalid_request_error"}}"#,
        )
    };
    let url = serve(Router::new().route("/v1/chat/completions", post(handler))).await?;
    let driver = GroqDriver::with_api_key("test-key".to_string(), Some(url))?;

    let Err(err) = driver.generate_stream(&request()?).await else {
        panic!("expected an error");
    };
    match err.kind() {
        BlueboxErrorKind::Models(models) => assert_eq!(
            models.kind,
            ModelsErrorKind::Api {
                status: 400,
                message: "model not found".to_string()
            }
        ),
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn rate_limit_status_is_distinguished() -> anyhow::Result<()> {
    let handler = || async { StatusCode::TOO_MANY_REQUESTS };
    let url = serve(Router::new().route("/v1/chat/completions", post(handler))).await?;
    let driver = GroqDriver::with_api_key("test-key".to_string(), Some(url))?;

    let Err(err) = driver.generate_stream(&request()?).await else {
        panic!("expected an error");
    };
    assert!(matches!(
        err.kind(),
        BlueboxErrorKind::Models(models) if models.kind == ModelsErrorKind::RateLimit
    ));
    Ok(())
}
