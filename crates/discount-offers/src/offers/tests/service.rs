use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::common::*;
use crate::offers::domain::{AccountNumber, DiscountTier, Offer, OfferStatus};
use crate::offers::store::{InMemoryOfferStore, OfferStore, StoreError};
use crate::offers::validation::{evaluate, RejectionReason};
use crate::offers::{OfferService, OfferServiceError};

/// Lets a competing writer slip in between the snapshot read and the first insert.
struct RacingStore {
    inner: InMemoryOfferStore,
    competitor: Offer,
    raced: AtomicBool,
}

impl OfferStore for RacingStore {
    fn insert(&self, offer: Offer) -> Result<Offer, StoreError> {
        self.inner.insert(offer)
    }

    fn insert_if_unchanged(&self, offer: Offer, expected: usize) -> Result<Offer, StoreError> {
        if !self.raced.swap(true, Ordering::SeqCst) {
            self.inner.insert(self.competitor.clone())?;
        }
        self.inner.insert_if_unchanged(offer, expected)
    }

    fn query_by_account(&self, account: &AccountNumber) -> Result<Vec<Offer>, StoreError> {
        self.inner.query_by_account(account)
    }

    fn query_all(&self) -> Result<Vec<Offer>, StoreError> {
        self.inner.query_all()
    }
}

struct AlwaysStaleStore;

impl OfferStore for AlwaysStaleStore {
    fn insert(&self, offer: Offer) -> Result<Offer, StoreError> {
        Ok(offer)
    }

    fn insert_if_unchanged(&self, _offer: Offer, expected: usize) -> Result<Offer, StoreError> {
        Err(StoreError::StaleSnapshot {
            expected,
            found: expected + 1,
        })
    }

    fn query_by_account(&self, _account: &AccountNumber) -> Result<Vec<Offer>, StoreError> {
        Ok(Vec::new())
    }

    fn query_all(&self) -> Result<Vec<Offer>, StoreError> {
        Ok(Vec::new())
    }
}

#[test]
fn submit_records_inactive_sequence_in_order() {
    let (service, store) = build_service();

    for tier in ["50%", "25%", "10%"] {
        service
            .submit_on(inactive("AFRIQ1001", tier), today())
            .expect("tier accepted");
    }

    match service.submit_on(inactive("AFRIQ1001", "10%"), today()) {
        Err(OfferServiceError::Rejected(RejectionReason::SequenceExhausted)) => {}
        other => panic!("expected exhausted sequence, got {other:?}"),
    }

    let account = AccountNumber::parse("AFRIQ1001").expect("valid account");
    let stored = store.query_by_account(&account).expect("query succeeds");
    let tiers: Vec<_> = stored.iter().map(|offer| offer.discount_tier).collect();
    assert_eq!(tiers, DiscountTier::SEQUENCE.to_vec());
}

#[test]
fn rejected_submissions_are_never_persisted() {
    let (service, store) = build_service();

    let attempts = [
        inactive("AFRIQ1002", "25%"),
        blocked("AFRIQ1004", "25%"),
        inactive("BADACC123", "50%"),
    ];
    for attempt in attempts {
        assert!(matches!(
            service.submit_on(attempt, today()),
            Err(OfferServiceError::Rejected(_))
        ));
    }

    assert!(store.query_all().expect("query").is_empty());
}

#[test]
fn blocked_then_inactive_reports_status_conflict() {
    let (service, _) = build_service();
    service
        .submit_on(blocked("AFRIQ1005", "50%"), today())
        .expect("blocked offer accepted");

    match service.submit_on(inactive("AFRIQ1005", "50%"), today()) {
        Err(OfferServiceError::Rejected(RejectionReason::StatusConflict)) => {}
        other => panic!("expected status conflict, got {other:?}"),
    }
}

#[test]
fn stale_snapshot_is_re_evaluated_against_fresh_offers() {
    let competitor = evaluate(&inactive("AFRIQ2001", "50%"), &[], today()).expect("valid");

    let store = Arc::new(RacingStore {
        inner: InMemoryOfferStore::default(),
        competitor,
        raced: AtomicBool::new(false),
    });
    let service = OfferService::new(store.clone());

    match service.submit_on(inactive("AFRIQ2001", "50%"), today()) {
        Err(OfferServiceError::Rejected(RejectionReason::SequenceOutOfOrder { expected })) => {
            assert_eq!(expected, DiscountTier::TwentyFive);
        }
        other => panic!("expected re-evaluated rejection, got {other:?}"),
    }

    let stored = store.query_all().expect("query");
    assert_eq!(stored.len(), 1, "only the competing offer is stored");
    assert_eq!(stored[0].status, OfferStatus::InactiveOffer);
}

#[test]
fn persistent_contention_gives_up() {
    let service = OfferService::new(Arc::new(AlwaysStaleStore));

    match service.submit_on(inactive("AFRIQ2002", "50%"), today()) {
        Err(OfferServiceError::Contention { account }) => assert_eq!(account, "AFRIQ2002"),
        other => panic!("expected contention, got {other:?}"),
    }
}

#[test]
fn store_uniqueness_violation_becomes_user_rejection() {
    let service = OfferService::new(Arc::new(ConflictStore));

    match service.submit_on(blocked("AFRIQ2003", "50%"), today()) {
        Err(OfferServiceError::Rejected(RejectionReason::UniquenessViolation)) => {}
        other => panic!("expected uniqueness rejection, got {other:?}"),
    }
}

#[test]
fn store_outage_propagates() {
    let service = OfferService::new(Arc::new(UnavailableStore));

    match service.submit_on(blocked("AFRIQ2004", "50%"), today()) {
        Err(OfferServiceError::Store(StoreError::Unavailable(_))) => {}
        other => panic!("expected store outage, got {other:?}"),
    }
}

#[test]
fn account_listing_is_scoped_to_one_account() {
    let (service, _) = build_service();
    service
        .submit_on(inactive("AFRIQ3001", "50%"), today())
        .expect("accepted");
    service
        .submit_on(blocked("AFRIQ3002", "50%"), today())
        .expect("accepted");

    let account = AccountNumber::parse("AFRIQ3002").expect("valid account");
    let listing = service.account_listing(&account).expect("listing");
    assert_eq!(listing.data.len(), 1);
    assert_eq!(listing.data[0].status, "blocked_offer");
}
