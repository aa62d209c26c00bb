//! In-process transport double for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;

use crate::transport::{ApiRequest, ApiResponse, Method, Transport, TransportError};

type Reply = Result<ApiResponse, TransportError>;

enum Scripted {
    Ready(Reply),
    Gated(oneshot::Receiver<Reply>),
}

struct Expectation {
    method: Method,
    path: String,
    reply: Scripted,
}

/// Replies to requests from a FIFO script keyed by method and path, and
/// records every request it sees. Unscripted requests fail at the transport
/// level.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Expectation>>,
    seen: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, method: Method, path: &str, response: ApiResponse) {
        self.push(method, path, Scripted::Ready(Ok(response)));
    }

    pub fn reply_json(&self, method: Method, path: &str, status: u16, body: serde_json::Value) {
        self.reply(method, path, ApiResponse::json_body(status, &body));
    }

    pub fn fail(&self, method: Method, path: &str, error: TransportError) {
        self.push(method, path, Scripted::Ready(Err(error)));
    }

    /// Script a reply that is held back until the returned sender fires.
    pub fn gate(&self, method: Method, path: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, Scripted::Gated(rx));
        tx
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub async fn wait_for_requests(&self, n: usize) {
        for _ in 0..500 {
            if self.request_count() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("expected {n} requests, saw {}", self.request_count());
    }

    fn push(&self, method: Method, path: &str, reply: Scripted) {
        self.script.lock().unwrap().push_back(Expectation {
            method,
            path: path.to_string(),
            reply,
        });
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let scripted = {
            let mut script = self.script.lock().unwrap();
            let position = script
                .iter()
                .position(|e| e.method == request.method && e.path == request.path);
            position.and_then(|i| script.remove(i))
        };
        self.seen.lock().unwrap().push(request.clone());

        match scripted.map(|e| e.reply) {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(TransportError::new("gate dropped"))),
            None => Err(TransportError::new(format!(
                "unscripted request {} {}",
                request.method, request.path
            ))),
        }
    }
}
