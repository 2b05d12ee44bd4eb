//! # Roshambo
//!
//! A fixed-capacity matchmaking and refereeing service for two-player
//! rock-paper-scissors.
//!
//! ## Design Principles
//!
//! - **Single-Writer**: one task owns every session and match record (no locks)
//! - **O(1) Operations**: signup, play, and quit each touch a fixed number of slots
//! - **Arena Allocation**: no heap allocation after startup; matches and
//!   queue links recycle a fixed index space
//! - **Rendezvous Calls**: callers block on a single-use reply channel until
//!   the service explicitly answers, which may be on a later request
//!
//! ## Architecture
//!
//! ```text
//! [Player Tasks] --> [Call Stream] --> [Service Loop]
//!                                            |
//!                                      [Referee Engine]
//!                                   {Registry, Arena, Queue}
//! ```

pub mod arena;
pub mod directory;
pub mod gate;
pub mod player;
pub mod protocol;
pub mod queue;
pub mod referee;
pub mod service;
pub mod session;
pub mod transport;

// Re-exports for convenience
pub use arena::{MatchArena, MatchSlot};
pub use directory::Directory;
pub use gate::{KeyGate, NoGate, RoundGate};
pub use player::Player;
pub use protocol::{Move, Reply, Request, RoundOutcome, SessionId};
pub use queue::{LinkQueue, Linked, SlotIndex, NIL};
pub use referee::{Effect, Effects, Referee};
pub use service::{Service, SERVICE_NAME};
pub use session::{SessionSlot, SessionTable};
pub use transport::{Call, CallError, ServiceHandle};
