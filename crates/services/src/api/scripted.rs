use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::api::transport::{ApiRequest, ApiResponse, Transport};
use crate::error::TransportError;

/// One canned answer for a scripted route.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Json { status: u16, body: Value },
    Text { status: u16, body: String },
    /// The exchange fails before any response arrives.
    Unavailable,
    /// The exchange never completes.
    Pending,
}

impl ScriptedReply {
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self::Json { status: 200, body }
    }

    #[must_use]
    pub fn status(status: u16) -> Self {
        Self::Text {
            status,
            body: String::new(),
        }
    }
}

#[derive(Default)]
struct Script {
    routes: HashMap<(Method, String), VecDeque<ScriptedReply>>,
    log: Vec<ApiRequest>,
}

/// In-memory stand-in for the quiz service.
///
/// Replies are queued per `(method, path)`; the last reply of a route keeps
/// answering once the queue is drained. Unscripted routes answer 404.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `reply` for `method path`, e.g. `(Method::GET, "/quiz/checkResult")`.
    #[must_use]
    pub fn on(self, method: Method, path: &str, reply: ScriptedReply) -> Self {
        self.push(method, path, reply);
        self
    }

    pub fn push(&self, method: Method, path: &str, reply: ScriptedReply) {
        let mut script = self.lock();
        script
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().log.clone()
    }

    /// Requests received for one path.
    #[must_use]
    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.lock()
            .log
            .iter()
            .filter(|request| request.path() == path)
            .cloned()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        // A panicking test thread may poison the lock; the script data is still usable.
        self.script
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn next_reply(&self, request: &ApiRequest) -> Option<ScriptedReply> {
        let mut script = self.lock();
        script.log.push(request.clone());
        let queue = script
            .routes
            .get_mut(&(request.method.clone(), request.path()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        match self.next_reply(&request) {
            None => Ok(ApiResponse {
                status: 404,
                body: String::new(),
            }),
            Some(ScriptedReply::Json { status, body }) => Ok(ApiResponse {
                status,
                body: body.to_string(),
            }),
            Some(ScriptedReply::Text { status, body }) => Ok(ApiResponse { status, body }),
            Some(ScriptedReply::Unavailable) => Err(TransportError::Unavailable(format!(
                "{} {}",
                request.method,
                request.path()
            ))),
            Some(ScriptedReply::Pending) => std::future::pending().await,
        }
    }
}
