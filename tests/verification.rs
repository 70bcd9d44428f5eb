//! Endpoint verification against real HTTP members.

use std::time::Duration;

use etcd_draft::config::ClientConfig;
use etcd_draft::endpoints::{Candidate, EndpointVerifier, VerificationError, VerifyOptions};
use etcd_draft::error::{ConnectivityKind, ErrorKind};
use etcd_draft::{ClientError, EtcdClient, HttpProbe, VerificationStrategy};

mod common;
use common::MockReply;

fn probe(timeout_ms: u64) -> HttpProbe {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    HttpProbe::new(client, Duration::from_millis(timeout_ms))
}

fn verifier(strategy: VerificationStrategy, timeout_ms: u64) -> EndpointVerifier<HttpProbe> {
    EndpointVerifier::new(probe(timeout_ms), strategy).with_options(VerifyOptions {
        probe_timeout: Duration::from_millis(timeout_ms),
        deadline: None,
    })
}

fn test_config(endpoints: Vec<String>, strategy: VerificationStrategy) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.endpoints = endpoints;
    config.verification.strategy = strategy;
    config.verification.probe_timeout_ms = 1_000;
    config.transport.system_proxy = false;
    config
}

#[tokio::test]
async fn test_all_members_online() {
    let a = common::start_member(|_| MockReply::version()).await;
    let b = common::start_member(|_| MockReply::version()).await;
    let c = common::start_member(|_| MockReply::version()).await;
    let candidates = Candidate::parse_all([a.url(), b.url(), c.url()]).unwrap();

    let pool = verifier(VerificationStrategy::All, 1_000)
        .verify_and_build(&candidates)
        .await
        .unwrap();

    assert_eq!(pool.len(), 3);
    for (endpoint, candidate) in pool.iter().zip(&candidates) {
        assert!(endpoint.candidate().same_as(candidate));
        assert_eq!(endpoint.version().unwrap().server, "2.3.8");
    }
    for member in [&a, &b, &c] {
        let requests = member.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].path, "/version");
    }
}

#[tokio::test]
async fn test_refused_member_fails_all_but_not_any() {
    let a = common::start_member(|_| MockReply::version()).await;
    let dead = common::closed_address().await;
    let c = common::start_member(|_| MockReply::version()).await;
    let candidates = Candidate::parse_all([a.url(), dead, c.url()]).unwrap();

    let err = verifier(VerificationStrategy::All, 1_000)
        .verify_and_build(&candidates)
        .await
        .unwrap_err();
    let failure = err.aggregate().unwrap().failure_at(1).unwrap();
    assert_eq!(failure.kind(), ErrorKind::Connectivity);
    assert_eq!(failure.error.connectivity_kind(), Some(ConnectivityKind::Refused));
    assert!(matches!(err, VerificationError::PolicyUnmet(_)));

    let pool = verifier(VerificationStrategy::Any, 1_000)
        .verify_and_build(&candidates)
        .await
        .unwrap();
    assert_eq!(pool.len(), 2);
    assert!(pool.get(0).unwrap().candidate().same_as(&candidates[0]));
    assert!(pool.get(1).unwrap().candidate().same_as(&candidates[2]));

    let pool = verifier(VerificationStrategy::Quorum, 1_000)
        .verify_and_build(&candidates)
        .await
        .unwrap();
    assert_eq!(pool.len(), 2);
}

#[tokio::test]
async fn test_all_with_every_member_down_is_unreachable() {
    let first = common::closed_address().await;
    let second = common::closed_address().await;
    let third = common::closed_address().await;
    let candidates = Candidate::parse_all([first, second, third]).unwrap();

    let err = verifier(VerificationStrategy::All, 1_000)
        .verify_and_build(&candidates)
        .await
        .unwrap_err();

    assert!(err.is_unreachable());
    assert_eq!(err.failures().len(), 3);
    assert!(err.failures().iter().all(|f| f.kind() == ErrorKind::Connectivity));
}

#[tokio::test]
async fn test_failure_kinds_per_candidate() {
    let broken = common::start_member(|_| MockReply::json(500, "internal")).await;
    let silent = common::start_silent_member().await;
    let dead = common::closed_address().await;
    let candidates = Candidate::parse_all([broken.url(), silent.url(), dead]).unwrap();

    let err = verifier(VerificationStrategy::Any, 300)
        .verify_and_build(&candidates)
        .await
        .unwrap_err();

    assert!(err.is_unreachable());
    let agg = err.aggregate().unwrap();
    assert_eq!(agg.failures.len(), 3);

    let server_error = &agg.failure_at(0).unwrap().error;
    assert_eq!(server_error.kind(), ErrorKind::MalformedResponse);
    assert_eq!(server_error.status(), Some(500));

    assert_eq!(agg.failure_at(1).unwrap().kind(), ErrorKind::Timeout);
    assert_eq!(agg.failure_at(2).unwrap().kind(), ErrorKind::Connectivity);
}

#[tokio::test]
async fn test_any_2xx_is_online_even_with_foreign_body() {
    let odd = common::start_member(|_| MockReply::json(200, "OK")).await;
    let candidates = Candidate::parse_all([odd.url()]).unwrap();

    let pool = verifier(VerificationStrategy::All, 1_000)
        .verify_and_build(&candidates)
        .await
        .unwrap();

    assert_eq!(pool.len(), 1);
    assert!(pool.get(0).unwrap().version().is_none());
}

#[tokio::test]
async fn test_connect_builds_client_over_verified_pool() {
    let a = common::start_member(|_| MockReply::version()).await;
    let dead = common::closed_address().await;
    let config = test_config(vec![dead, a.url()], VerificationStrategy::Any);

    let client = EtcdClient::connect(config).await.unwrap();
    assert_eq!(client.pool().len(), 1);
    assert_eq!(client.pool().candidate_count(), 2);
    assert!(client.pool().is_partial());
}

#[tokio::test]
async fn test_connect_reports_verification_failure() {
    let dead = common::closed_address().await;
    let config = test_config(vec![dead], VerificationStrategy::All);

    match EtcdClient::connect(config).await {
        Err(ClientError::Verification(err)) => assert!(err.is_unreachable()),
        other => panic!("unexpected {:?}", other.map(|c| c.pool().len())),
    }
}

#[tokio::test]
async fn test_connect_rejects_invalid_config() {
    let config = test_config(vec!["ftp://nowhere".into()], VerificationStrategy::All);
    assert!(matches!(EtcdClient::connect(config).await, Err(ClientError::Config(_))));
}
