//! End-to-end protocol flow through the rendezvous transport.
//!
//! Each caller runs in its own task and blocks in `call` exactly as a real
//! session would; the assertions pin down who gets woken, and when.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

use roshambo::gate::NoGate;
use roshambo::protocol::{Move, Reply, Request, SessionId};
use roshambo::service::Service;
use roshambo::transport::{self, CallError, ServiceHandle};

fn start_service(max_sessions: u32) -> (ServiceHandle, JoinHandle<()>) {
    let (handle, calls) = transport::channel(max_sessions as usize);
    let server = tokio::spawn(Service::new(max_sessions, Box::new(NoGate)).run(calls));
    (handle, server)
}

fn call(
    service: &ServiceHandle,
    id: u32,
    request: Request,
) -> JoinHandle<Result<Reply, CallError>> {
    let service = service.clone();
    tokio::spawn(async move { service.call(SessionId(id), request).await })
}

#[tokio::test]
async fn pair_play_resolve_and_quit() {
    let (service, _server) = start_service(16);

    // Two signups pair with each other; both get Ack.
    let first = call(&service, 1, Request::Signup);
    let second = call(&service, 2, Request::Signup);
    assert_eq!(first.await.unwrap(), Ok(Reply::Ack));
    assert_eq!(second.await.unwrap(), Ok(Reply::Ack));

    // One full round: Rock beats Scissors, both unblock together.
    let first = call(&service, 1, Request::Play(Move::Rock));
    let second = call(&service, 2, Request::Play(Move::Scissors));
    assert_eq!(first.await.unwrap(), Ok(Reply::Ack));
    assert_eq!(second.await.unwrap(), Ok(Reply::Ack));

    assert_eq!(
        service.call(SessionId(1), Request::Quit).await,
        Ok(Reply::Ack)
    );
    // The partner discovers the quit on its next play.
    assert_eq!(
        service.call(SessionId(2), Request::Play(Move::Paper)).await,
        Ok(Reply::Nack)
    );
}

#[tokio::test]
async fn play_parks_until_the_partner_moves() {
    let (service, _server) = start_service(16);

    let first = call(&service, 1, Request::Signup);
    let second = call(&service, 2, Request::Signup);
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let parked = call(&service, 1, Request::Play(Move::Paper));
    sleep(Duration::from_millis(20)).await;
    assert!(!parked.is_finished());

    call(&service, 2, Request::Play(Move::Paper));
    assert_eq!(parked.await.unwrap(), Ok(Reply::Ack));
}

#[tokio::test]
async fn quit_unblocks_a_parked_partner() {
    let (service, _server) = start_service(16);

    let first = call(&service, 1, Request::Signup);
    let second = call(&service, 2, Request::Signup);
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let parked = call(&service, 1, Request::Play(Move::Rock));
    sleep(Duration::from_millis(20)).await;
    assert!(!parked.is_finished());

    assert_eq!(
        service.call(SessionId(2), Request::Quit).await,
        Ok(Reply::Ack)
    );
    assert_eq!(parked.await.unwrap(), Ok(Reply::Nack));
}

#[tokio::test]
async fn duplicate_signup_is_rejected() {
    let (service, _server) = start_service(16);

    let first = call(&service, 1, Request::Signup);
    let second = call(&service, 2, Request::Signup);
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    assert_eq!(
        service.call(SessionId(1), Request::Signup).await,
        Ok(Reply::Nack)
    );
}

#[tokio::test]
async fn signups_keep_pairing_in_arrival_order() {
    let (service, _server) = start_service(16);

    // Sessions arrive one at a time so the queue order is deterministic.
    let first = call(&service, 1, Request::Signup);
    sleep(Duration::from_millis(10)).await;
    let second = call(&service, 2, Request::Signup);
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let third = call(&service, 3, Request::Signup);
    sleep(Duration::from_millis(10)).await;
    let fourth = call(&service, 4, Request::Signup);
    third.await.unwrap().unwrap();
    fourth.await.unwrap().unwrap();

    // 1-2 and 3-4 are matches: a round between 1 and 2 resolves without
    // touching 3 or 4.
    let one = call(&service, 1, Request::Play(Move::Rock));
    let parked = call(&service, 3, Request::Play(Move::Rock));
    let two = call(&service, 2, Request::Play(Move::Paper));
    assert_eq!(one.await.unwrap(), Ok(Reply::Ack));
    assert_eq!(two.await.unwrap(), Ok(Reply::Ack));
    assert!(!parked.is_finished());
}

#[tokio::test]
async fn aborted_service_fails_parked_callers() {
    let (service, server) = start_service(16);

    let parked = call(&service, 1, Request::Signup);
    sleep(Duration::from_millis(20)).await;
    assert!(!parked.is_finished());

    server.abort();
    assert_eq!(parked.await.unwrap(), Err(CallError::ServiceStopped));
}
