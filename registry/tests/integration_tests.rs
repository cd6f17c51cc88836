//! End-to-end lifecycle tests for the registry core over the in-memory
//! ledger: apply, challenge, commit/reveal, and status resolution.

use std::sync::{Arc, Mutex};
use tcr_application::{ApplicationMetadata, ApplyError, InvalidReason};
use tcr_events::{EventBus, RegistryEvent, STAGE_CHANGED};
use tcr_ledger::Ledger;
use tcr_nullables::{NullClock, NullLedger};
use tcr_params::ParamsError;
use tcr_registry::{Registry, RegistryConfig, RegistryError};
use tcr_types::{AccountAddress, DomainName, DomainStage, VoteChoice};
use tcr_voting::{Tally, VoteError};

const APPLY_LEN: u64 = 600;
const COMMIT_LEN: u64 = 600;
const REVEAL_LEN: u64 = 600;

struct Harness {
    clock: Arc<NullClock>,
    ledger: Arc<NullLedger>,
    registry: Registry,
    /// (domain, old, new) triples in publish order.
    events: Arc<Mutex<Vec<(String, DomainStage, DomainStage)>>>,
}

fn harness() -> Harness {
    let clock = Arc::new(NullClock::new(10_000));
    let ledger = Arc::new(NullLedger::with_clock(Arc::clone(&clock)));
    ledger.set_parameter(tcr_params::MIN_DEPOSIT, 1_000);
    ledger.set_parameter(tcr_params::APPLY_STAGE_LEN, APPLY_LEN as u128);
    ledger.set_parameter(tcr_params::COMMIT_STAGE_LEN, COMMIT_LEN as u128);
    ledger.set_parameter(tcr_params::REVEAL_STAGE_LEN, REVEAL_LEN as u128);
    ledger.set_balance("applicant", 100_000);
    ledger.set_balance("alice", 10_000);
    ledger.set_balance("bob", 10_000);

    let bus = Arc::new(EventBus::new());
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    bus.subscribe(
        STAGE_CHANGED,
        Box::new(move |event| {
            let RegistryEvent::StageChanged {
                domain,
                old_stage,
                new_stage,
            } = event;
            sink.lock()
                .unwrap()
                .push((domain.as_str().to_string(), *old_stage, *new_stage));
        }),
    );

    let registry = Registry::new(
        ledger.clone() as Arc<dyn Ledger>,
        bus,
        &RegistryConfig::default(),
    );

    Harness {
        clock,
        ledger,
        registry,
        events,
    }
}

fn domain() -> DomainName {
    DomainName::new("example.com")
}

fn alice() -> AccountAddress {
    AccountAddress::new("alice")
}

fn bob() -> AccountAddress {
    AccountAddress::new("bob")
}

fn metadata() -> ApplicationMetadata {
    ApplicationMetadata {
        site_name: Some("Example".into()),
        country: Some("United States".into()),
        first_name: Some("John".into()),
        last_name: Some("Doe".into()),
        email: Some("john@example.com".into()),
    }
}

/// Apply and drive the domain into its commit window.
async fn apply_and_challenge(h: &Harness) {
    h.registry.apply(&domain(), 1_500, &metadata()).await.unwrap();
    h.ledger.challenge(&domain(), "carol").unwrap();
    assert_eq!(
        h.registry.update_status(&domain()).await.unwrap(),
        DomainStage::InCommitVote
    );
}

// ── Application lifecycle ──────────────────────────────────────────────

#[tokio::test]
async fn unchallenged_application_whitelists_after_deadline() {
    let h = harness();

    let receipt = h.registry.apply(&domain(), 1_500, &metadata()).await.unwrap();
    assert_eq!(receipt.stake, 1_500);
    assert!(receipt.metadata_saved);
    assert_eq!(h.registry.cached_stage(&domain()), Some(DomainStage::Applied));

    // No challenge before the deadline.
    h.clock.advance(APPLY_LEN);
    let stage = h.registry.update_status(&domain()).await.unwrap();
    assert_eq!(stage, DomainStage::Whitelisted);

    let events = h.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            (
                "example.com".to_string(),
                DomainStage::Unlisted,
                DomainStage::Applied
            ),
            (
                "example.com".to_string(),
                DomainStage::Applied,
                DomainStage::Whitelisted
            ),
        ]
    );
}

#[tokio::test]
async fn update_status_is_idempotent_at_most_one_event() {
    let h = harness();
    h.registry.apply(&domain(), 1_500, &metadata()).await.unwrap();
    let count_after_apply = h.events.lock().unwrap().len();

    let first = h.registry.update_status(&domain()).await.unwrap();
    let second = h.registry.update_status(&domain()).await.unwrap();

    assert_eq!(first, second);
    // apply already published Applied; the two refreshes add nothing.
    assert_eq!(h.events.lock().unwrap().len(), count_after_apply);
}

#[tokio::test]
async fn apply_below_minimum_is_rejected_locally() {
    let h = harness();
    let err = h.registry.apply(&domain(), 999, &metadata()).await.unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Apply(ApplyError::Validation(InvalidReason::InsufficientStake))
    ));
    // Nothing reached the ledger.
    assert_eq!(h.ledger.balance_of("applicant"), 100_000);
    assert!(h.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn apply_with_invalid_domain_is_rejected_locally() {
    let h = harness();
    let err = h
        .registry
        .apply(&DomainName::new("not a domain"), 1_500, &metadata())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Apply(ApplyError::Validation(InvalidReason::InvalidDomain))
    ));
}

#[tokio::test]
async fn apply_with_invalid_email_is_rejected_locally() {
    let h = harness();
    let mut meta = metadata();
    meta.email = Some("not-an-email".into());
    let err = h.registry.apply(&domain(), 1_500, &meta).await.unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Apply(ApplyError::Validation(InvalidReason::InvalidEmail))
    ));
}

#[tokio::test]
async fn apply_fails_when_min_deposit_unavailable() {
    let h = harness();
    // A ledger that never served minDeposit and is now unreachable must not
    // let a zero-stake application through.
    h.ledger.set_offline(true);
    let err = h.registry.apply(&domain(), 1_500, &metadata()).await.unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Params(ParamsError::Unavailable { .. })
    ));
}

#[tokio::test]
async fn reapply_mid_lifecycle_is_stage_conflict() {
    let h = harness();
    h.registry.apply(&domain(), 1_500, &metadata()).await.unwrap();

    let err = h.registry.apply(&domain(), 2_000, &metadata()).await.unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Apply(ApplyError::StageConflict {
            stage: DomainStage::Applied,
            ..
        })
    ));
}

#[tokio::test]
async fn whitelisted_domain_cannot_reapply() {
    let h = harness();
    h.registry.apply(&domain(), 1_500, &metadata()).await.unwrap();
    h.clock.advance(APPLY_LEN);
    h.registry.update_status(&domain()).await.unwrap();

    let err = h.registry.apply(&domain(), 2_000, &metadata()).await.unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Apply(ApplyError::StageConflict {
            stage: DomainStage::Whitelisted,
            ..
        })
    ));
}

// ── Challenge and voting ───────────────────────────────────────────────

#[tokio::test]
async fn challenged_application_rejected_by_majority() {
    let h = harness();
    apply_and_challenge(&h).await;

    // Commit phase: hidden votes.
    h.registry
        .commit_vote(&domain(), &alice(), VoteChoice::Support, 500, b"alice-secret")
        .await
        .unwrap();
    h.registry
        .commit_vote(&domain(), &bob(), VoteChoice::Oppose, 700, b"bob-secret")
        .await
        .unwrap();

    // Reveal phase: both disclose correctly.
    h.clock.advance(COMMIT_LEN);
    assert_eq!(
        h.registry.update_status(&domain()).await.unwrap(),
        DomainStage::InRevealVote
    );
    h.registry
        .reveal_vote(&domain(), &alice(), VoteChoice::Support, 500, b"alice-secret")
        .await
        .unwrap();
    h.registry
        .reveal_vote(&domain(), &bob(), VoteChoice::Oppose, 700, b"bob-secret")
        .await
        .unwrap();

    assert_eq!(h.registry.tally(&domain()).await.unwrap(), Tally::new(500, 700));

    // Reveal window ends: oppose won.
    h.clock.advance(REVEAL_LEN);
    let stage = h.registry.update_status(&domain()).await.unwrap();
    assert_eq!(stage, DomainStage::Rejected);

    let events = h.events.lock().unwrap().clone();
    let transitions: Vec<(DomainStage, DomainStage)> =
        events.iter().map(|(_, old, new)| (*old, *new)).collect();
    assert_eq!(
        transitions,
        vec![
            (DomainStage::Unlisted, DomainStage::Applied),
            (DomainStage::Applied, DomainStage::InCommitVote),
            (DomainStage::InCommitVote, DomainStage::InRevealVote),
            (DomainStage::InRevealVote, DomainStage::Rejected),
        ]
    );
}

#[tokio::test]
async fn unrevealed_commit_contributes_nothing() {
    let h = harness();
    apply_and_challenge(&h).await;

    // Bob opposes with more weight than Alice supports, but never reveals.
    h.registry
        .commit_vote(&domain(), &alice(), VoteChoice::Support, 500, b"a")
        .await
        .unwrap();
    h.registry
        .commit_vote(&domain(), &bob(), VoteChoice::Oppose, 5_000, b"b")
        .await
        .unwrap();

    h.clock.advance(COMMIT_LEN);
    h.registry
        .reveal_vote(&domain(), &alice(), VoteChoice::Support, 500, b"a")
        .await
        .unwrap();

    h.clock.advance(REVEAL_LEN);
    let stage = h.registry.update_status(&domain()).await.unwrap();
    // Outcome determined only by revealed votes: 500 support vs 0 oppose.
    assert_eq!(stage, DomainStage::Whitelisted);
    assert_eq!(h.registry.tally(&domain()).await.unwrap(), Tally::new(500, 0));
}

#[tokio::test]
async fn tally_tie_rejects() {
    let h = harness();
    apply_and_challenge(&h).await;

    h.registry
        .commit_vote(&domain(), &alice(), VoteChoice::Support, 700, b"a")
        .await
        .unwrap();
    h.registry
        .commit_vote(&domain(), &bob(), VoteChoice::Oppose, 700, b"b")
        .await
        .unwrap();

    h.clock.advance(COMMIT_LEN);
    h.registry
        .reveal_vote(&domain(), &alice(), VoteChoice::Support, 700, b"a")
        .await
        .unwrap();
    h.registry
        .reveal_vote(&domain(), &bob(), VoteChoice::Oppose, 700, b"b")
        .await
        .unwrap();

    h.clock.advance(REVEAL_LEN);
    assert_eq!(
        h.registry.update_status(&domain()).await.unwrap(),
        DomainStage::Rejected
    );
}

#[tokio::test]
async fn mismatched_reveal_does_not_alter_tally() {
    let h = harness();
    apply_and_challenge(&h).await;

    h.registry
        .commit_vote(&domain(), &alice(), VoteChoice::Support, 500, b"right")
        .await
        .unwrap();
    h.clock.advance(COMMIT_LEN);

    let err = h
        .registry
        .reveal_vote(&domain(), &alice(), VoteChoice::Support, 500, b"wrong")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Vote(VoteError::CommitMismatch { .. })
    ));
    assert_eq!(h.registry.tally(&domain()).await.unwrap(), Tally::default());

    // The correct secret still reveals fine afterwards.
    h.registry
        .reveal_vote(&domain(), &alice(), VoteChoice::Support, 500, b"right")
        .await
        .unwrap();
    assert_eq!(h.registry.tally(&domain()).await.unwrap(), Tally::new(500, 0));
}

#[tokio::test]
async fn votes_outside_windows_are_phase_errors() {
    let h = harness();
    h.registry.apply(&domain(), 1_500, &metadata()).await.unwrap();

    // No challenge: no commit window.
    let err = h
        .registry
        .commit_vote(&domain(), &alice(), VoteChoice::Support, 500, b"a")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Vote(VoteError::Phase { .. })));

    h.ledger.challenge(&domain(), "carol").unwrap();
    h.clock.advance(COMMIT_LEN + REVEAL_LEN); // both windows over

    let err = h
        .registry
        .commit_vote(&domain(), &alice(), VoteChoice::Support, 500, b"a")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Vote(VoteError::Phase { .. })));

    let err = h
        .registry
        .reveal_vote(&domain(), &alice(), VoteChoice::Support, 500, b"a")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Vote(VoteError::Phase { .. })));
}

// ── Re-application ─────────────────────────────────────────────────────

#[tokio::test]
async fn rejected_domain_can_reapply() {
    let h = harness();
    apply_and_challenge(&h).await;

    h.registry
        .commit_vote(&domain(), &bob(), VoteChoice::Oppose, 700, b"b")
        .await
        .unwrap();
    h.clock.advance(COMMIT_LEN);
    h.registry
        .reveal_vote(&domain(), &bob(), VoteChoice::Oppose, 700, b"b")
        .await
        .unwrap();
    h.clock.advance(REVEAL_LEN);
    assert_eq!(
        h.registry.update_status(&domain()).await.unwrap(),
        DomainStage::Rejected
    );

    // Rejected -> Applied on re-application.
    let receipt = h.registry.apply(&domain(), 2_000, &metadata()).await.unwrap();
    assert_eq!(receipt.stake, 2_000);
    assert_eq!(h.registry.cached_stage(&domain()), Some(DomainStage::Applied));

    let events = h.events.lock().unwrap().clone();
    let last = events.last().unwrap();
    assert_eq!(last.1, DomainStage::Rejected);
    assert_eq!(last.2, DomainStage::Applied);
}

// ── Parameters ─────────────────────────────────────────────────────────

#[tokio::test]
async fn get_parameter_reads_through_cache() {
    let h = harness();
    assert_eq!(
        h.registry.get_parameter(tcr_params::MIN_DEPOSIT).await.unwrap(),
        1_000
    );

    // Fresh cache hides the ledger-side change; stale reads still work
    // when the ledger goes away.
    h.ledger.set_parameter(tcr_params::MIN_DEPOSIT, 9_999);
    h.ledger.set_offline(true);
    assert_eq!(
        h.registry.get_parameter(tcr_params::MIN_DEPOSIT).await.unwrap(),
        1_000
    );
}

// ── Concurrency ────────────────────────────────────────────────────────

#[tokio::test]
async fn distinct_domains_progress_independently() {
    let h = harness();
    let other = DomainName::new("other.org");

    h.registry.apply(&domain(), 1_500, &metadata()).await.unwrap();
    h.registry.apply(&other, 1_200, &metadata()).await.unwrap();

    // A long commit window keeps the challenged domain in voting while the
    // other domain's challenge period runs out.
    h.ledger
        .set_parameter(tcr_params::COMMIT_STAGE_LEN, (2 * APPLY_LEN) as u128);
    h.ledger.challenge(&domain(), "carol").unwrap();

    assert_eq!(
        h.registry.update_status(&domain()).await.unwrap(),
        DomainStage::InCommitVote
    );
    assert_eq!(
        h.registry.update_status(&other).await.unwrap(),
        DomainStage::Applied
    );

    // The unchallenged domain whitelists while the other is still voting.
    h.clock.advance(APPLY_LEN);
    assert_eq!(
        h.registry.update_status(&other).await.unwrap(),
        DomainStage::Whitelisted
    );
    assert_eq!(
        h.registry.update_status(&domain()).await.unwrap(),
        DomainStage::InCommitVote
    );
}
