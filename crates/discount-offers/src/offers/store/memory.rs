use std::sync::{Arc, Mutex, MutexGuard};

use super::super::domain::{AccountNumber, Offer};
use super::{OfferStore, StoreError};

/// Process-local store backed by a vector in acceptance order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryOfferStore {
    offers: Arc<Mutex<Vec<Offer>>>,
}

impl InMemoryOfferStore {
    fn lock(&self) -> Result<MutexGuard<'_, Vec<Offer>>, StoreError> {
        self.offers
            .lock()
            .map_err(|_| StoreError::Unavailable("offer store mutex poisoned".to_string()))
    }

    fn push_unique(offers: &mut Vec<Offer>, offer: Offer) -> Result<Offer, StoreError> {
        let duplicate = offers.iter().any(|existing| {
            existing.account_number == offer.account_number
                && existing.discount_tier == offer.discount_tier
                && existing.status == offer.status
        });
        if duplicate {
            return Err(StoreError::UniquenessViolation);
        }
        offers.push(offer.clone());
        Ok(offer)
    }
}

impl OfferStore for InMemoryOfferStore {
    fn insert(&self, offer: Offer) -> Result<Offer, StoreError> {
        let mut guard = self.lock()?;
        Self::push_unique(&mut guard, offer)
    }

    fn insert_if_unchanged(
        &self,
        offer: Offer,
        expected_prior: usize,
    ) -> Result<Offer, StoreError> {
        let mut guard = self.lock()?;
        let found = guard
            .iter()
            .filter(|existing| existing.account_number == offer.account_number)
            .count();
        if found != expected_prior {
            return Err(StoreError::StaleSnapshot {
                expected: expected_prior,
                found,
            });
        }
        Self::push_unique(&mut guard, offer)
    }

    fn query_by_account(&self, account: &AccountNumber) -> Result<Vec<Offer>, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .iter()
            .filter(|offer| &offer.account_number == account)
            .cloned()
            .collect())
    }

    fn query_all(&self) -> Result<Vec<Offer>, StoreError> {
        Ok(self.lock()?.clone())
    }
}
