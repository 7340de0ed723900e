use super::*;
use anyhow::Result;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct RelayStubState {
    status: StatusCode,
    received: Arc<Mutex<Vec<EmailSendRequest>>>,
}

async fn handle_send(
    State(state): State<RelayStubState>,
    Json(payload): Json<EmailSendRequest>,
) -> (StatusCode, &'static str) {
    state.received.lock().await.push(payload);
    if state.status.is_success() {
        (state.status, "OK")
    } else {
        (state.status, "The service ID is invalid")
    }
}

async fn spawn_relay_stub(status: StatusCode) -> Result<(Url, RelayStubState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = RelayStubState {
        status,
        received: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/api/v1.0/email/send", post(handle_send))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let endpoint = Url::parse(&format!("http://{addr}/api/v1.0/email/send"))?;
    Ok((endpoint, state))
}

fn credentials() -> RelayCredentials {
    RelayCredentials {
        service_id: "service_portfolio".into(),
        template_id: "template_contact".into(),
        public_key: "pk_test".into(),
    }
}

fn message() -> ContactMessage {
    ContactMessage {
        sender_name: "Ada".into(),
        sender_email: "ada@example.com".into(),
        message_body: "Are you available for a project?".into(),
        recipient_address: "owner@portfolio.test".into(),
    }
}

#[tokio::test]
async fn posts_template_params_to_endpoint() {
    let (endpoint, stub) = spawn_relay_stub(StatusCode::OK).await.expect("spawn stub");
    let relay = EmailJsRelay::new(endpoint, credentials());

    relay.send(&message()).await.expect("send");

    let received = stub.received.lock().await;
    assert_eq!(received.len(), 1);
    assert_eq!(received[0], EmailSendRequest::new(&credentials(), &message()));
}

#[tokio::test]
async fn non_success_status_is_rejection_with_body() {
    let (endpoint, _stub) = spawn_relay_stub(StatusCode::BAD_REQUEST)
        .await
        .expect("spawn stub");
    let relay = EmailJsRelay::new(
        endpoint,
        RelayCredentials {
            service_id: String::new(),
            ..credentials()
        },
    );

    let err = relay.send(&message()).await.expect_err("should fail");

    match err {
        DispatchError::Rejected { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "The service ID is invalid");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let endpoint = Url::parse(&format!("http://{addr}/api/v1.0/email/send")).expect("url");
    let relay = EmailJsRelay::new(endpoint, credentials());

    let err = relay.send(&message()).await.expect_err("should fail");
    assert!(matches!(err, DispatchError::Transport(_)));
}
