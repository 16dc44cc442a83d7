/// Observable state of a url fetch.
///
/// `data` starts out as `V::default()`, which for the usual collection
/// payloads (`Vec<_>`) is the empty collection.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchState<V> {
    pub data: V,
    pub error: Option<String>,
    pub is_loading: bool,
}

impl<V: Default> Default for FetchState<V> {
    fn default() -> Self {
        Self {
            data: V::default(),
            error: None,
            is_loading: false,
        }
    }
}

/// Transitions of a fetch cycle.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchAction<V> {
    /// A new trigger value was observed and its GET has been issued.
    Started,
    Succeeded(V),
    /// The GET failed; carries the failure message.
    Failed(String),
}

/// Whether a binding currently has a cycle in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Fetching,
}

impl<V: Default> FetchState<V> {
    pub fn apply(&mut self, action: FetchAction<V>) {
        match action {
            FetchAction::Started => {
                // Previous data stays visible until the new cycle settles.
                self.is_loading = true;
                self.error = None;
            }
            FetchAction::Succeeded(data) => {
                self.data = data;
                self.error = None;
                self.is_loading = false;
            }
            FetchAction::Failed(message) => {
                self.data = V::default();
                self.error = Some(message);
                self.is_loading = false;
            }
        }
    }
}

impl<V> FetchState<V> {
    pub fn phase(&self) -> Phase {
        if self.is_loading {
            Phase::Fetching
        } else {
            Phase::Idle
        }
    }
}
