mod common;

use anyhow::Result;
use pantrypal::auth::{AuthContext, MemoryCredentialStore};
use pantrypal::error::{REQUEST_FAILED, UNKNOWN_ERROR};
use pantrypal::{ClientError, Gateway, RequestOptions};
use serde_json::{json, Value};

#[tokio::test]
async fn attaches_bearer_from_context() -> Result<()> {
    let backend = common::spawn_backend().await?;
    let gateway = Gateway::new(&backend.base_url)?;
    let auth = AuthContext::load(MemoryCredentialStore::with_token("ctx-token"))?;

    let body: Value = gateway.request(&auth, "/echo", RequestOptions::get()).await?;
    assert_eq!(body, json!({ "ok": true }));

    let seen = backend.last();
    assert_eq!(seen.authorization.as_deref(), Some("Bearer ctx-token"));
    assert_eq!(seen.content_type.as_deref(), Some("application/json"));
    Ok(())
}

#[tokio::test]
async fn omits_bearer_without_credential() -> Result<()> {
    let backend = common::spawn_backend().await?;
    let gateway = Gateway::new(&backend.base_url)?;

    let _: Value = gateway
        .request(&AuthContext::anonymous(), "/echo", RequestOptions::get())
        .await?;

    assert_eq!(backend.last().authorization, None);
    Ok(())
}

#[tokio::test]
async fn explicit_credential_and_caller_headers_win() -> Result<()> {
    let backend = common::spawn_backend().await?;
    let gateway = Gateway::new(&backend.base_url)?;
    let auth = AuthContext::load(MemoryCredentialStore::with_token("ctx-token"))?;

    let options = RequestOptions::post()
        .token("explicit-token")
        .header("X-Trace", "abc")
        .json(&json!({ "hello": "world" }))?;
    let echoed: Value = gateway.request(&auth, "/echo", options).await?;

    assert_eq!(echoed, json!({ "hello": "world" }));
    let seen = backend.last();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.authorization.as_deref(), Some("Bearer explicit-token"));
    assert_eq!(seen.trace.as_deref(), Some("abc"));
    // The context credential is left as it was
    assert_eq!(auth.token(), Some("ctx-token"));
    Ok(())
}

#[tokio::test]
async fn not_found_rejects_with_message() -> Result<()> {
    let backend = common::spawn_backend().await?;
    let gateway = Gateway::new(&backend.base_url)?;

    let result: Result<Value, ClientError> = gateway
        .request(&AuthContext::anonymous(), "/no-such-route", RequestOptions::get())
        .await;

    match result {
        Err(ClientError::RequestFailed { status, message }) => {
            assert_eq!(status, 404);
            assert!(!message.is_empty());
        }
        other => panic!("expected request failure, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn server_detail_is_preserved() -> Result<()> {
    let backend = common::spawn_backend().await?;
    let gateway = Gateway::new(&backend.base_url)?;

    // Protected route without a token
    let err = gateway
        .request::<Value>(&AuthContext::anonymous(), "/groceries", RequestOptions::get())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(401));
    assert_eq!(err.to_string(), "Invalid or expired token");
    Ok(())
}

#[tokio::test]
async fn non_json_error_body_uses_generic_message() -> Result<()> {
    let backend = common::spawn_backend().await?;
    let gateway = Gateway::new(&backend.base_url)?;

    let err = gateway
        .request::<Value>(&AuthContext::anonymous(), "/html-error", RequestOptions::get())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(502));
    assert_eq!(err.to_string(), REQUEST_FAILED);
    Ok(())
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() -> Result<()> {
    let backend = common::spawn_backend().await?;
    let gateway = Gateway::new(&backend.base_url)?;

    let err = gateway
        .request::<Value>(&AuthContext::anonymous(), "/not-json", RequestOptions::get())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Decode(ref m) if !m.is_empty()), "got {:?}", err);
    Ok(())
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() -> Result<()> {
    let port = portpicker::pick_unused_port().expect("no free port");
    let gateway = Gateway::new(&format!("http://127.0.0.1:{}", port))?;

    let err = gateway
        .request::<Value>(&AuthContext::anonymous(), "/echo", RequestOptions::get())
        .await
        .unwrap_err();

    match err {
        ClientError::Transport(message) => {
            assert!(!message.is_empty());
            assert_ne!(message, UNKNOWN_ERROR);
        }
        other => panic!("expected transport error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn concurrent_calls_are_independent() -> Result<()> {
    let backend = common::spawn_backend().await?;
    let gateway = Gateway::new(&backend.base_url)?;
    let auth = AuthContext::anonymous();

    let (a, b) = tokio::join!(
        gateway.request::<Value>(&auth, "/echo", RequestOptions::get()),
        gateway.request::<Value>(&auth, "/not-json", RequestOptions::get()),
    );

    assert!(a.is_ok());
    assert!(b.is_err());
    assert_eq!(backend.seen().len(), 2);
    Ok(())
}
