//! In-memory transport whose responses are released by the test.
//!
//! Each call to [`ScriptedTransport::script`] queues one pending response
//! for a url and hands back the [`Responder`] that settles it. Requests for
//! urls with nothing queued fail with a 404.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use fetch_client::{CancellationToken, ClientError, Transport};
use futures::channel::oneshot;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

type Outcome = Result<Value, String>;

#[derive(Default)]
pub struct ScriptedTransport {
    pending: RefCell<HashMap<String, VecDeque<oneshot::Receiver<Outcome>>>>,
    requests: RefCell<Vec<String>>,
    cancellations: Cell<usize>,
}

/// Settles one scripted request.
pub struct Responder(oneshot::Sender<Outcome>);

impl Responder {
    pub fn succeed(self, body: Value) {
        // The request may already have been cancelled and dropped.
        let _ = self.0.send(Ok(body));
    }

    pub fn fail(self, message: &str) {
        let _ = self.0.send(Err(message.to_string()));
    }
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, url: &str) -> Responder {
        let (tx, rx) = oneshot::channel();
        self.pending
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(rx);
        Responder(tx)
    }

    /// Urls requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    /// Number of requests abandoned because their token was cancelled
    /// while they were still pending.
    pub fn cancellations(&self) -> usize {
        self.cancellations.get()
    }
}

impl Transport for ScriptedTransport {
    async fn get_json<V: DeserializeOwned>(
        &self,
        url: &str,
        cancel: CancellationToken,
    ) -> Result<V, ClientError> {
        self.requests.borrow_mut().push(url.to_string());

        let receiver = self
            .pending
            .borrow_mut()
            .get_mut(url)
            .and_then(VecDeque::pop_front);
        let Some(receiver) = receiver else {
            return Err(ClientError::APIError(
                StatusCode::NOT_FOUND,
                format!("nothing scripted for {url}"),
            ));
        };

        match cancel.run_until_cancelled(receiver).await {
            None => {
                self.cancellations.set(self.cancellations.get() + 1);
                Err(ClientError::Cancelled)
            }
            Some(Ok(Ok(body))) => Ok(serde_json::from_value(body)?),
            Some(Ok(Err(message))) => Err(ClientError::Transport(message)),
            Some(Err(oneshot::Canceled)) => {
                Err(ClientError::Transport("responder dropped".into()))
            }
        }
    }
}
