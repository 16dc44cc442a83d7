use std::cell::Cell;
use std::rc::Rc;

use tokio_util::sync::CancellationToken;

/// Decides whether a fetch cycle may still mutate observable state.
///
/// Clones share the same flag: the owner keeps one copy and moves another
/// into the async continuation, which checks [`is_active`] before touching
/// state. Deactivating also fires the transport cancellation, once.
///
/// [`is_active`]: ActivityToken::is_active
#[derive(Clone, Debug)]
pub struct ActivityToken {
    active: Rc<Cell<bool>>,
    cancel: CancellationToken,
}

impl Default for ActivityToken {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityToken {
    pub fn new() -> Self {
        Self {
            active: Rc::new(Cell::new(true)),
            cancel: CancellationToken::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Returns `true` only for the call that actually deactivated the token.
    pub fn deactivate(&self) -> bool {
        if !self.active.replace(false) {
            return false;
        }
        self.cancel.cancel();
        true
    }

    /// Cancellation handle to pass to the transport.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }
}
