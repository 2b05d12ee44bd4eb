use std::sync::Arc;

use clap::Parser;
use tokio::task::JoinSet;
use tracing::error;
use tracing_subscriber::EnvFilter;

use roshambo::directory::Directory;
use roshambo::gate::{KeyGate, NoGate, RoundGate};
use roshambo::player::Player;
use roshambo::protocol::SessionId;
use roshambo::service::{Service, SERVICE_NAME};
use roshambo::transport;

/// Matchmaking-and-refereeing service for rock-paper-scissors, with
/// simulated player sessions.
#[derive(Debug, Parser)]
#[command(name = "roshambo")]
struct Args {
    /// Concurrent player sessions to launch. With an odd count the last
    /// session waits for a partner forever.
    #[arg(long, default_value_t = 4)]
    players: u32,

    /// Rounds each player plays before quitting.
    #[arg(long, default_value_t = 3)]
    rounds: u32,

    /// Base seed for the players' move streams.
    #[arg(long, default_value_t = 0xC0FFEE)]
    seed: u64,

    /// Maximum concurrent sessions the service will address.
    #[arg(long, default_value_t = 64)]
    max_sessions: u32,

    /// Hold each resolved round until a key is pressed.
    #[arg(long)]
    pause: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let gate: Box<dyn RoundGate + Send> = if args.pause {
        Box::new(KeyGate)
    } else {
        Box::new(NoGate)
    };

    let (handle, calls) = transport::channel(args.max_sessions as usize);
    let directory = Arc::new(Directory::new());
    directory.register(SERVICE_NAME, handle);

    let server = tokio::spawn(Service::new(args.max_sessions, gate).run(calls));

    let mut players = JoinSet::new();
    for n in 1..=args.players {
        let directory = Arc::clone(&directory);
        let player = Player {
            id: SessionId(n),
            rounds: args.rounds,
            seed: args.seed.wrapping_add(u64::from(n)),
        };
        players.spawn(async move {
            let service = directory
                .lookup(SERVICE_NAME)
                .expect("referee not registered");
            player.run(service).await
        });
    }

    while let Some(joined) = players.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(err)) => error!("player failed: {err}"),
            Err(err) => error!("player task panicked: {err}"),
        }
    }

    // The directory holds the last handle; dropping it closes the call
    // stream and lets the service loop drain out.
    drop(directory);
    if let Err(err) = server.await {
        error!("service task failed: {err}");
    }
}
