//! Login, lockout and IP backoff scenarios.

mod helpers;

use std::time::Duration;

use helpers::{PASSWORD, TestAuth, ip};
use warden_core::ErrorKind;
use warden_core::error::{AppError, INVALID_CREDENTIALS_MESSAGE};

#[tokio::test(start_paused = true)]
async fn test_login_success_returns_user_and_tokens() {
    let auth = TestAuth::new();
    let user = auth.create_user("alice", PASSWORD);

    let outcome = auth.service.login("alice", PASSWORD, ip("10.0.0.1")).await.unwrap();

    assert_eq!(outcome.user.id, user.id);
    let claims = auth
        .service
        .verify_access_token(&outcome.tokens.access_token)
        .await
        .unwrap();
    assert_eq!(claims.sub, user.id);

    let json = serde_json::to_value(&outcome).unwrap();
    assert!(json["user"].get("password_hash").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_failures_are_indistinguishable() {
    let auth = TestAuth::new();
    auth.create_user("alice", PASSWORD);
    auth.create_user("mallory", PASSWORD);

    let unknown = auth.service.login("nobody", PASSWORD, ip("10.0.0.2")).await.unwrap_err();
    let wrong = auth.service.login("alice", "Wr0ng!pass", ip("10.0.0.2")).await.unwrap_err();

    for _ in 0..10 {
        let _ = auth.service.login("mallory", "Wr0ng!pass", ip("10.0.0.3")).await;
        auth.settle().await;
    }
    let locked = auth.service.login("mallory", PASSWORD, ip("10.0.0.4")).await.unwrap_err();

    assert_eq!(unknown, AppError::invalid_credentials());
    assert_eq!(wrong, unknown);
    assert_eq!(locked, unknown);
    assert_eq!(locked.kind, ErrorKind::InvalidCredentials);
    assert_eq!(locked.public_message(), INVALID_CREDENTIALS_MESSAGE);
}

#[tokio::test(start_paused = true)]
async fn test_bob_is_locked_after_ten_failures_even_with_correct_password() {
    let auth = TestAuth::new();
    auth.create_user("bob", PASSWORD);

    for attempt in 1..=10 {
        let err = auth
            .service
            .login("bob", "guess-wrong", ip("192.168.1.10"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredentials, "attempt {attempt}");
        auth.settle().await;
        tokio::time::advance(Duration::from_secs(60)).await;
    }

    assert!(auth.counter("lock:user:bob").await.is_some());
    assert_eq!(auth.counter("attempts:user:bob").await, None);
    assert_eq!(auth.ttl("lock:user:bob").await, Some(Duration::from_secs(1800)));

    let err = auth.service.login("bob", PASSWORD, ip("192.168.1.10")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredentials);
    auth.settle().await;

    tokio::time::advance(Duration::from_secs(29 * 60)).await;
    assert!(auth.service.login("bob", PASSWORD, ip("192.168.1.10")).await.is_err());
    auth.settle().await;

    tokio::time::advance(Duration::from_secs(60)).await;
    assert!(auth.service.login("bob", PASSWORD, ip("192.168.1.10")).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_user_window_decays_from_first_failure() {
    let auth = TestAuth::new();
    auth.create_user("erin", PASSWORD);

    for _ in 0..9 {
        let _ = auth.service.login("erin", "nope", ip("10.1.0.1")).await;
        auth.settle().await;
    }
    assert_eq!(auth.counter("attempts:user:erin").await.as_deref(), Some("9"));

    tokio::time::advance(Duration::from_secs(15 * 60)).await;
    let _ = auth.service.login("erin", "nope", ip("10.1.0.1")).await;
    auth.settle().await;

    assert_eq!(auth.counter("attempts:user:erin").await.as_deref(), Some("1"));
    assert!(auth.counter("lock:user:erin").await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_ip_backoff_grows_one_two_four_times_base() {
    let auth = TestAuth::new();
    let attacker = ip("203.0.113.7");

    for (round, expected) in [(1, 60u64), (2, 120), (3, 240)] {
        for n in 0..50 {
            let _ = auth.service.login(&format!("user{round}-{n}"), "x", attacker).await;
            auth.settle().await;
        }

        assert_eq!(
            auth.counter("blockcount:ip:203.0.113.7").await.as_deref(),
            Some(round.to_string().as_str())
        );
        assert_eq!(
            auth.ttl("block:ip:203.0.113.7").await,
            Some(Duration::from_secs(expected))
        );

        let err = auth.service.rate_limiter().check_ip("203.0.113.7").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::RateLimited);
        assert_eq!(err.retry_after, Some(expected));

        tokio::time::advance(Duration::from_secs(expected)).await;
        auth.service.rate_limiter().check_ip("203.0.113.7").await.unwrap();
    }
}

#[tokio::test(start_paused = true)]
async fn test_success_clears_user_and_ip_counters_and_block_level() {
    let auth = TestAuth::new();
    auth.create_user("carol", PASSWORD);
    let office = ip("198.51.100.20");

    for n in 0..50 {
        let _ = auth.service.login(&format!("typo{n}"), "x", office).await;
        auth.settle().await;
    }
    tokio::time::advance(Duration::from_secs(60)).await;
    for _ in 0..3 {
        let _ = auth.service.login("carol", "x", office).await;
        auth.settle().await;
    }
    assert_eq!(auth.counter("blockcount:ip:198.51.100.20").await.as_deref(), Some("1"));
    assert!(auth.counter("attempts:user:carol").await.is_some());
    assert!(auth.counter("attempts:ip:198.51.100.20").await.is_some());

    auth.service.login("carol", PASSWORD, office).await.unwrap();
    auth.settle().await;

    assert_eq!(auth.counter("attempts:user:carol").await, None);
    assert_eq!(auth.counter("attempts:ip:198.51.100.20").await, None);
    assert_eq!(auth.counter("blockcount:ip:198.51.100.20").await, None);
}

#[tokio::test(start_paused = true)]
async fn test_username_case_does_not_evade_lockout() {
    let auth = TestAuth::new();
    auth.create_user("Dana", PASSWORD);

    for variant in ["dana", "DANA", "Dana", "dAna", "danA", "DAna", "daNA", "DanA", "dANA", "DANa"] {
        let _ = auth.service.login(variant, "bad", ip("10.9.9.9")).await;
        auth.settle().await;
    }

    assert!(auth.counter("lock:user:dana").await.is_some());
    assert!(auth.service.login("Dana", PASSWORD, ip("10.9.9.9")).await.is_err());
}
