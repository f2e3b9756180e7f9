//! Loopback HTTP stub server for tests.
//!
//! Serves canned responses in order, one per request, and records each
//! request as `"<METHOD> <URI>\n<body>"`.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use reqwest::Client;
use tokio::sync::oneshot;

#[derive(Clone, Default)]
struct StubState {
    responses: Arc<Mutex<VecDeque<(u16, Vec<u8>)>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

pub struct StubServer {
    addr: SocketAddr,
    state: StubState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl StubServer {
    /// Start a server on `127.0.0.1:0` that answers with `responses` in order.
    pub async fn start(responses: Vec<(u16, Vec<u8>)>) -> Self {
        let state = StubState {
            responses: Arc::new(Mutex::new(responses.into())),
            requests: Arc::default(),
        };

        let app = Router::new()
            .fallback(respond)
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn respond(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> (StatusCode, Vec<u8>) {
    state
        .requests
        .lock()
        .unwrap()
        .push(format!("{} {}\n{}", method, uri, String::from_utf8_lossy(&body)));

    let (status, body) = state
        .responses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or((500, b"no canned response left".to_vec()));
    (StatusCode::from_u16(status).unwrap(), body)
}

/// HTTP client that ignores proxy settings from the environment.
pub fn client() -> Client {
    Client::builder().no_proxy().build().unwrap()
}
