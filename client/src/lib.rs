//! Url fetch state with cancellation tied to the consumer's lifecycle.
//!
//! [`FetchBinding`] and the UI hooks built on [`run_cycle`] issue one GET
//! per trigger value and guarantee that a cycle which has been superseded
//! or torn down never mutates [`FetchState`].

mod binding;
mod error;
mod state;
mod token;
mod transport;

pub use binding::{FetchBinding, FetchCycle, FetchSink, run_cycle};
pub use error::ClientError;
pub use state::{FetchAction, FetchState, Phase};
pub use token::ActivityToken;
pub use transport::{HttpTransport, Transport, ok_body};

pub use tokio_util::sync::CancellationToken;
