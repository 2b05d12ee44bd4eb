//! Service loop - drains the call stream one request at a time and routes
//! replies through parked single-use senders.
//!
//! The loop is the only owner of the referee state; there is no internal
//! locking because there is no internal parallelism. A dispatched request
//! runs to completion (including replies to sessions other than the
//! caller) before the next call is accepted.

use rustc_hash::FxHashMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::gate::RoundGate;
use crate::protocol::{Reply, SessionId};
use crate::referee::{Effect, Referee};
use crate::transport::Call;

/// Well-known directory name the service registers under at startup.
pub const SERVICE_NAME: &str = "referee";

pub struct Service {
    referee: Referee,
    /// Reply senders of callers that have not been answered yet, keyed by
    /// session. At most one per session, by the callers' sequential
    /// protocol.
    parked: FxHashMap<SessionId, oneshot::Sender<Reply>>,
    gate: Box<dyn RoundGate + Send>,
}

impl Service {
    pub fn new(max_sessions: u32, gate: Box<dyn RoundGate + Send>) -> Self {
        Self {
            referee: Referee::new(max_sessions),
            parked: FxHashMap::default(),
            gate,
        }
    }

    /// Drain the call stream until every handle is dropped.
    pub async fn run(mut self, mut calls: mpsc::Receiver<Call>) {
        info!(
            sessions = self.referee.session_capacity(),
            matches = self.referee.match_capacity(),
            "referee up"
        );
        while let Some(call) = calls.recv().await {
            self.handle(call);
        }
        info!("call stream closed, referee stopping");
    }

    /// Process one call to completion.
    fn handle(&mut self, call: Call) {
        debug!(session = %call.caller, request = ?call.request, "received");

        let displaced = self.parked.insert(call.caller, call.reply);
        assert!(
            displaced.is_none(),
            "session {} issued a second call with one in flight",
            call.caller
        );

        for effect in self.referee.dispatch(call.caller, call.request) {
            match effect {
                Effect::Round(outcome) => {
                    info!("{outcome}");
                    self.gate.wait();
                }
                Effect::Reply { to, reply } => {
                    let sender = self
                        .parked
                        .remove(&to)
                        .expect("reply routed to a session with no parked call");
                    // A closed receiver means the caller is gone; the
                    // reply has nowhere to go and that is fine.
                    let _ = sender.send(reply);
                }
            }
        }
    }
}
