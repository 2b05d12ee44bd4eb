//! Rendezvous transport - a synchronous call primitive over channels.
//!
//! Every request carries a single-use reply sender; the caller sends and
//! then awaits that reply, so it stays blocked until the service explicitly
//! answers. The service consumes exactly one pending call at a time from
//! the shared stream, which serializes arbitrarily many concurrent callers.

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::protocol::{Reply, Request, SessionId};

/// One rendezvous call: a request paired with its reply channel.
#[derive(Debug)]
pub struct Call {
    pub caller: SessionId,
    pub request: Request,
    pub reply: oneshot::Sender<Reply>,
}

/// Failure of the call round trip itself, as opposed to a `Nack` reply.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CallError {
    /// The service loop went away before replying.
    #[error("service stopped before replying")]
    ServiceStopped,
}

/// Client end of the call stream.
#[derive(Clone, Debug)]
pub struct ServiceHandle {
    calls: mpsc::Sender<Call>,
}

impl ServiceHandle {
    /// Issue one request and block until the service explicitly replies.
    ///
    /// The reply may arrive long after the request is consumed: a Signup
    /// parks until a partner shows up, a Play parks until the partner
    /// moves. There is no timeout.
    pub async fn call(&self, caller: SessionId, request: Request) -> Result<Reply, CallError> {
        let (tx, rx) = oneshot::channel();
        self.calls
            .send(Call {
                caller,
                request,
                reply: tx,
            })
            .await
            .map_err(|_| CallError::ServiceStopped)?;
        rx.await.map_err(|_| CallError::ServiceStopped)
    }
}

/// Build the call stream. `depth` bounds the inbound buffer; one slot per
/// addressable session is plenty, since each keeps at most one call in
/// flight.
pub fn channel(depth: usize) -> (ServiceHandle, mpsc::Receiver<Call>) {
    let (tx, rx) = mpsc::channel(depth);
    (ServiceHandle { calls: tx }, rx)
}
