//! Session driver - signs up, plays a fixed number of rounds, quits.
//!
//! Moves come from a seeded PRNG, so a run is reproducible given its
//! seeds. A `Nack` anywhere means the service turned us away or the
//! partner is gone; either way the driver stops gracefully.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::protocol::{Move, Reply, Request, SessionId};
use crate::transport::{CallError, ServiceHandle};

/// One simulated player session.
#[derive(Clone, Copy, Debug)]
pub struct Player {
    pub id: SessionId,
    /// Rounds to play before quitting.
    pub rounds: u32,
    /// Seed for this player's move stream.
    pub seed: u64,
}

impl Player {
    pub async fn run(self, service: ServiceHandle) -> Result<(), CallError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);

        info!(session = %self.id, "found the referee, signing up");
        match service.call(self.id, Request::Signup).await? {
            Reply::Ack => {
                info!(session = %self.id, rounds = self.rounds, "paired, sending moves")
            }
            Reply::Nack => {
                info!(session = %self.id, "signup turned away, exiting");
                return Ok(());
            }
        }

        for _ in 0..self.rounds {
            let mv = random_move(&mut rng);
            if service.call(self.id, Request::Play(mv)).await? == Reply::Nack {
                info!(session = %self.id, "partner quit, exiting");
                return Ok(());
            }
        }

        service.call(self.id, Request::Quit).await?;
        info!(session = %self.id, "played all rounds, quit cleanly");
        Ok(())
    }
}

fn random_move(rng: &mut ChaCha8Rng) -> Move {
    match rng.gen_range(0..3) {
        0 => Move::Rock,
        1 => Move::Paper,
        _ => Move::Scissors,
    }
}
