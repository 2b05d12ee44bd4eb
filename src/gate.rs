//! Round gate - optional operator pause between a resolved round and the
//! replies that release its players.

use crossterm::event::{self, Event, KeyEventKind};

/// Pause hook invoked once per resolved round, after the result record is
/// emitted and before either player is unblocked.
pub trait RoundGate {
    /// May block. The service loop (and with it every session) stalls
    /// until this returns.
    fn wait(&mut self);
}

/// No pause; rounds stream continuously.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoGate;

impl RoundGate for NoGate {
    fn wait(&mut self) {}
}

/// Hold each resolved round until the operator presses a key.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyGate;

impl RoundGate for KeyGate {
    fn wait(&mut self) {
        loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => break,
                Ok(_) => continue,
                // Without a terminal the gate degrades to a no-op.
                Err(_) => break,
            }
        }
    }
}
