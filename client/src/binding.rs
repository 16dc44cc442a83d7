//! The fetch cycle and a framework-independent binding that drives it.
//!
//! A binding moves between two phases:
//!
//! - `Idle --observe(url)--> Fetching`: deactivate the previous cycle,
//!   dispatch [`FetchAction::Started`], issue the GET.
//! - `Fetching --success/failure--> Idle`: dispatch the outcome, but only
//!   if the cycle's [`ActivityToken`] is still active.
//! - `Fetching --observe(other url)--> Fetching`: the old cycle is
//!   deactivated before the new one starts, so its result is dropped.
//! - `* --teardown--> Idle`: deactivate without touching observable state.

use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;

use crate::{ActivityToken, FetchAction, FetchState, Phase, Transport};

/// Receiver of fetch transitions, e.g. a UI reducer.
pub trait FetchSink<V> {
    fn dispatch(&self, action: FetchAction<V>);
}

impl<V, F: Fn(FetchAction<V>)> FetchSink<V> for F {
    fn dispatch(&self, action: FetchAction<V>) {
        self(action)
    }
}

/// Await the GET for `url` and report its outcome to `sink`.
///
/// The caller dispatches [`FetchAction::Started`] before spawning this, so
/// that loading is visible without waiting for the executor. Nothing is
/// dispatched once `token` has been deactivated.
pub async fn run_cycle<V, T, S>(
    transport: &T,
    url: &str,
    token: ActivityToken,
    sink: S,
) where
    V: DeserializeOwned,
    T: Transport + ?Sized,
    S: FetchSink<V>,
{
    tracing::debug!(url, "fetch started");
    let result = transport.get_json::<V>(url, token.cancellation()).await;

    if !token.is_active() {
        tracing::debug!(url, "discarding result of inactive fetch");
        return;
    }

    match result {
        Ok(data) => {
            tracing::debug!(url, "fetch succeeded");
            sink.dispatch(FetchAction::Succeeded(data));
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "fetch failed");
            sink.dispatch(FetchAction::Failed(e.to_string()));
        }
    }
}

struct Shared<V> {
    state: FetchState<V>,
    phase: Phase,
}

impl<V: Default> Shared<V> {
    fn apply(&mut self, action: FetchAction<V>) {
        self.phase = match action {
            FetchAction::Started => Phase::Fetching,
            FetchAction::Succeeded(_) | FetchAction::Failed(_) => Phase::Idle,
        };
        self.state.apply(action);
    }
}

/// A fetch cycle returned by [`FetchBinding::observe`]; the owner decides
/// where it runs (`spawn_local`, or awaited directly).
pub type FetchCycle = LocalBoxFuture<'static, ()>;

/// Url-triggered fetch state owned by a single consumer.
///
/// Dropping the binding tears it down.
pub struct FetchBinding<T, V> {
    transport: Rc<T>,
    shared: Rc<RefCell<Shared<V>>>,
    trigger: Option<String>,
    token: Option<ActivityToken>,
}

impl<T, V> FetchBinding<T, V>
where
    T: Transport + 'static,
    V: DeserializeOwned + Default + 'static,
{
    pub fn new(transport: Rc<T>) -> Self {
        Self {
            transport,
            shared: Rc::new(RefCell::new(Shared {
                state: FetchState::default(),
                phase: Phase::Idle,
            })),
            trigger: None,
            token: None,
        }
    }

    /// Observe `url`. Returns the new cycle when the trigger changed, and
    /// `None` when `url` equals the current trigger.
    pub fn observe(&mut self, url: &str) -> Option<FetchCycle> {
        if self.trigger.as_deref() == Some(url) {
            return None;
        }
        self.deactivate();

        let token = ActivityToken::new();
        self.trigger = Some(url.to_string());
        self.token = Some(token.clone());

        self.shared.borrow_mut().apply(FetchAction::Started);
        let shared = self.shared.clone();
        let sink =
            move |action: FetchAction<V>| shared.borrow_mut().apply(action);

        let transport = self.transport.clone();
        let url = url.to_string();
        Some(
            async move {
                run_cycle(transport.as_ref(), &url, token, sink).await;
            }
            .boxed_local(),
        )
    }
}

impl<T, V> FetchBinding<T, V> {
    /// Stop observing. Any in-flight cycle is cancelled and its result will
    /// not be applied; the current state is left as it is.
    pub fn teardown(&mut self) {
        self.deactivate();
        self.trigger = None;
        self.shared.borrow_mut().phase = Phase::Idle;
    }

    pub fn trigger(&self) -> Option<&str> {
        self.trigger.as_deref()
    }

    pub fn phase(&self) -> Phase {
        self.shared.borrow().phase
    }

    fn deactivate(&mut self) {
        if let Some(token) = self.token.take()
            && token.deactivate()
        {
            tracing::debug!(url = ?self.trigger, "cleaned up fetch");
        }
    }
}

impl<T, V: Clone> FetchBinding<T, V> {
    pub fn state(&self) -> FetchState<V> {
        self.shared.borrow().state.clone()
    }
}

impl<T, V> Drop for FetchBinding<T, V> {
    fn drop(&mut self) {
        self.deactivate();
    }
}
