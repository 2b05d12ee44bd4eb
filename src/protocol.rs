//! Request, reply, and round-record types shared by the referee and its
//! clients.

use std::fmt;

/// External identifier of a client session (a small, process-scoped integer).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u32);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A move in a single round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Move {
    Rock = 0,
    Paper = 1,
    Scissors = 2,
}

impl Move {
    /// Cyclic dominance: Rock beats Scissors, Paper beats Rock,
    /// Scissors beats Paper.
    #[inline]
    pub const fn beats(self, other: Move) -> bool {
        matches!(
            (self, other),
            (Move::Rock, Move::Scissors)
                | (Move::Paper, Move::Rock)
                | (Move::Scissors, Move::Paper)
        )
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Move::Rock => "Rock",
            Move::Paper => "Paper",
            Move::Scissors => "Scissors",
        })
    }
}

// ============================================================================
// Requests and Replies
// ============================================================================

/// Requests a session can issue. Each session keeps at most one in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    /// Register and wait to be paired with an opponent.
    Signup,
    /// Submit this round's move.
    Play(Move),
    /// Leave the service, tearing down any active match.
    Quit,
}

/// Service reply. `Nack` means the request was rejected or the partner
/// is gone; the documented caller reaction is to stop gracefully.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reply {
    Ack,
    Nack,
}

// ============================================================================
// Round Records
// ============================================================================

/// Result record for one resolved round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundOutcome {
    pub player_a: SessionId,
    pub move_a: Move,
    pub player_b: SessionId,
    pub move_b: Move,
    /// `None` on a draw.
    pub winner: Option<SessionId>,
}

impl RoundOutcome {
    /// Score a completed round.
    pub fn decide(player_a: SessionId, move_a: Move, player_b: SessionId, move_b: Move) -> Self {
        let winner = if move_a == move_b {
            None
        } else if move_a.beats(move_b) {
            Some(player_a)
        } else {
            Some(player_b)
        };
        Self {
            player_a,
            move_a,
            player_b,
            move_b,
            winner,
        }
    }
}

impl fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.winner {
            None => write!(
                f,
                "sessions {} and {} both played {}, a draw",
                self.player_a, self.player_b, self.move_a
            ),
            Some(winner) => write!(
                f,
                "session {} played {}, session {} played {}, session {} wins",
                self.player_a, self.move_a, self.player_b, self.move_b, winner
            ),
        }
    }
}
