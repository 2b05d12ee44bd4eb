//! Match resolution engine - the signup / play / quit protocol state machine.
//!
//! The referee owns the session registry, the match arena, and the waiting
//! queue, and never performs I/O: each dispatched request returns the
//! replies to deliver (to the caller and possibly to a different parked
//! session) plus any resolved round record. The service loop routes them.

use arrayvec::ArrayVec;

use crate::arena::MatchArena;
use crate::protocol::{Move, Reply, Request, RoundOutcome, SessionId};
use crate::queue::{LinkQueue, SlotIndex, NIL};
use crate::session::SessionTable;

/// Something the service must do after a dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Deliver a reply to a (possibly different) blocked session.
    Reply { to: SessionId, reply: Reply },
    /// Present a resolved round.
    Round(RoundOutcome),
}

/// A single request yields at most one round record and two replies.
pub type Effects = ArrayVec<Effect, 3>;

/// The matchmaking-and-refereeing core.
pub struct Referee {
    sessions: SessionTable,
    matches: MatchArena,
    waiting: LinkQueue,
}

impl Referee {
    /// A referee for up to `max_sessions` concurrent sessions. Every active
    /// match consumes two of them, which fixes the arena capacity.
    pub fn new(max_sessions: u32) -> Self {
        Self::with_capacities(max_sessions, max_sessions / 2)
    }

    /// Capacity override, used by tests that force arena exhaustion.
    pub fn with_capacities(max_sessions: u32, max_matches: u32) -> Self {
        Self {
            sessions: SessionTable::new(max_sessions),
            matches: MatchArena::new(max_matches),
            waiting: LinkQueue::new(),
        }
    }

    /// Run one request to completion.
    pub fn dispatch(&mut self, caller: SessionId, request: Request) -> Effects {
        match request {
            Request::Signup => self.handle_signup(caller),
            Request::Play(mv) => self.handle_play(caller, mv),
            Request::Quit => self.handle_quit(caller),
        }
    }

    fn handle_signup(&mut self, caller: SessionId) -> Effects {
        let mut effects = Effects::new();

        // The slot may be held by this identity (duplicate signup) or by a
        // colliding one; either way it cannot be claimed right now.
        if self.sessions.occupant(caller).is_some() {
            effects.push(Effect::Reply {
                to: caller,
                reply: Reply::Nack,
            });
            return effects;
        }

        // Pull the oldest waiting opponent, or start waiting ourselves.
        // A waiting caller gets no reply yet; it stays blocked until paired.
        let Some(opponent) = self.waiting.pop_front(self.sessions.slots_mut()) else {
            let index = self.sessions.register(caller);
            self.waiting.push_back(self.sessions.slots_mut(), index);
            return effects;
        };

        let Some(mat) = self.matches.alloc() else {
            // No match record left: turn both players away. The opponent
            // loses its registration and must sign up again.
            let opponent_id = self.identity(opponent);
            self.sessions.release(opponent);
            effects.push(Effect::Reply {
                to: opponent_id,
                reply: Reply::Nack,
            });
            effects.push(Effect::Reply {
                to: caller,
                reply: Reply::Nack,
            });
            return effects;
        };

        let index = self.sessions.register(caller);
        let record = self.matches.get_mut(mat);
        record.player_a = opponent;
        record.player_b = index;
        self.sessions.get_mut(opponent).match_ref = mat;
        self.sessions.get_mut(index).match_ref = mat;

        // The opponent has been parked in its Signup since it enqueued;
        // wake it first, then the new arrival.
        let opponent_id = self.identity(opponent);
        effects.push(Effect::Reply {
            to: opponent_id,
            reply: Reply::Ack,
        });
        effects.push(Effect::Reply {
            to: caller,
            reply: Reply::Ack,
        });
        effects
    }

    fn handle_play(&mut self, caller: SessionId, mv: Move) -> Effects {
        let mut effects = Effects::new();

        let Some(index) = self.sessions.lookup(caller) else {
            effects.push(Effect::Reply {
                to: caller,
                reply: Reply::Nack,
            });
            return effects;
        };
        let mat = self.sessions.get(index).match_ref;
        if mat == NIL {
            // Registered but never paired; there is nothing to referee.
            effects.push(Effect::Reply {
                to: caller,
                reply: Reply::Nack,
            });
            return effects;
        }

        let slot = self.sessions.get_mut(index);
        assert!(
            slot.pending.is_none(),
            "session {caller} submitted a second move within one round"
        );
        slot.pending = Some(mv);

        let record = self.matches.get(mat);
        let (a, b) = (record.player_a, record.player_b);
        let (Some(move_a), Some(move_b)) = (self.sessions.get(a).pending, self.sessions.get(b).pending)
        else {
            // Partner hasn't moved; leave the caller parked until it does.
            return effects;
        };

        let id_a = self.identity(a);
        let id_b = self.identity(b);
        effects.push(Effect::Round(RoundOutcome::decide(id_a, move_a, id_b, move_b)));

        // Round complete; the match stays up for the next one.
        self.sessions.get_mut(a).pending = None;
        self.sessions.get_mut(b).pending = None;
        effects.push(Effect::Reply {
            to: id_a,
            reply: Reply::Ack,
        });
        effects.push(Effect::Reply {
            to: id_b,
            reply: Reply::Ack,
        });
        effects
    }

    fn handle_quit(&mut self, caller: SessionId) -> Effects {
        let mut effects = Effects::new();

        let Some(index) = self.sessions.lookup(caller) else {
            // Unknown sessions get an Ack anyway; quitting twice is harmless.
            effects.push(Effect::Reply {
                to: caller,
                reply: Reply::Ack,
            });
            return effects;
        };

        let mat = self.sessions.get(index).match_ref;
        if mat == NIL {
            // Still in the waiting queue.
            self.waiting.remove(self.sessions.slots_mut(), index);
            self.sessions.release(index);
        } else {
            let record = self.matches.get(mat);
            let partner = if record.player_a == index {
                record.player_b
            } else {
                record.player_a
            };
            // A partner with a move down is parked in Play and would wait
            // forever; turn it away now. One that hasn't moved yet finds
            // out on its next Play.
            if self.sessions.get(partner).pending.is_some() {
                let partner_id = self.identity(partner);
                effects.push(Effect::Reply {
                    to: partner_id,
                    reply: Reply::Nack,
                });
            }
            self.sessions.release(index);
            self.sessions.release(partner);
            self.matches.release(mat);
        }

        effects.push(Effect::Reply {
            to: caller,
            reply: Reply::Ack,
        });
        effects
    }

    #[inline]
    fn identity(&self, index: SlotIndex) -> SessionId {
        self.sessions
            .get(index)
            .identity()
            .expect("occupied slot without an identity")
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    #[inline]
    pub fn session_capacity(&self) -> u32 {
        self.sessions.capacity()
    }

    #[inline]
    pub fn match_capacity(&self) -> u32 {
        self.matches.capacity()
    }

    #[inline]
    pub fn waiting_len(&self) -> u32 {
        self.waiting.len()
    }

    #[inline]
    pub fn active_matches(&self) -> u32 {
        self.matches.active()
    }

    #[inline]
    pub fn free_matches(&self) -> u32 {
        self.matches.free_count()
    }

    #[inline]
    pub fn is_registered(&self, id: SessionId) -> bool {
        self.sessions.lookup(id).is_some()
    }

    /// Current partner of `id`, if it is in an active match.
    pub fn partner_of(&self, id: SessionId) -> Option<SessionId> {
        let index = self.sessions.lookup(id)?;
        let mat = self.sessions.get(index).match_ref;
        if mat == NIL {
            return None;
        }
        let record = self.matches.get(mat);
        let partner = if record.player_a == index {
            record.player_b
        } else {
            record.player_a
        };
        self.sessions.get(partner).identity()
    }
}
