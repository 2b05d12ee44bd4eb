//! Criterion benchmark: the full pair / play / quit cycle through the
//! referee, plus the play fast path on an already-standing match.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use roshambo::protocol::{Move, Request, SessionId};
use roshambo::referee::Referee;

fn bench_pair_play_quit(c: &mut Criterion) {
    c.bench_function("pair_play_quit", |b| {
        let mut referee = Referee::new(64);
        b.iter(|| {
            referee.dispatch(SessionId(1), Request::Signup);
            referee.dispatch(SessionId(2), Request::Signup);
            referee.dispatch(SessionId(1), Request::Play(Move::Rock));
            black_box(referee.dispatch(SessionId(2), Request::Play(Move::Scissors)));
            // Tears the match down and unregisters both sessions.
            referee.dispatch(SessionId(1), Request::Quit);
        });
    });
}

fn bench_round_on_standing_match(c: &mut Criterion) {
    c.bench_function("round_on_standing_match", |b| {
        let mut referee = Referee::new(64);
        referee.dispatch(SessionId(1), Request::Signup);
        referee.dispatch(SessionId(2), Request::Signup);
        b.iter(|| {
            referee.dispatch(SessionId(1), Request::Play(Move::Paper));
            black_box(referee.dispatch(SessionId(2), Request::Play(Move::Rock)));
        });
    });
}

criterion_group!(benches, bench_pair_play_quit, bench_round_on_standing_match);
criterion_main!(benches);
