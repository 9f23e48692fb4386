use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use super::domain::{AccountNumber, Offer, OfferSubmission};
use super::export::{self, ExportError, OfferListing};
use super::store::{OfferStore, StoreError};
use super::validation::{self, RejectionReason};

/// Snapshot reads attempted before a submission gives up under write contention.
const MAX_SNAPSHOT_ATTEMPTS: usize = 3;

/// Facade tying the validation engine to an offer store.
pub struct OfferService<S> {
    store: Arc<S>,
}

impl<S> OfferService<S>
where
    S: OfferStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validate and record a submission, judging `date_processed` against the local date.
    pub fn submit(&self, submission: OfferSubmission) -> Result<Offer, OfferServiceError> {
        self.submit_on(submission, Local::now().date_naive())
    }

    pub fn submit_on(
        &self,
        submission: OfferSubmission,
        today: NaiveDate,
    ) -> Result<Offer, OfferServiceError> {
        let account = AccountNumber::parse(&submission.account_number)
            .map_err(|reason| self.rejected(&submission, reason))?;

        for attempt in 1..=MAX_SNAPSHOT_ATTEMPTS {
            let prior = self.store.query_by_account(&account)?;
            let offer = validation::evaluate(&submission, &prior, today)
                .map_err(|reason| self.rejected(&submission, reason))?;

            match self.store.insert_if_unchanged(offer, prior.len()) {
                Ok(stored) => {
                    info!(
                        account = %stored.account_number,
                        discount = %stored.discount_tier,
                        status = %stored.status,
                        "discount offer recorded"
                    );
                    return Ok(stored);
                }
                Err(StoreError::StaleSnapshot { expected, found }) => {
                    warn!(
                        account = %account,
                        attempt,
                        expected,
                        found,
                        "account offers changed during submission; re-evaluating"
                    );
                }
                Err(StoreError::UniquenessViolation) => {
                    return Err(self.rejected(&submission, RejectionReason::UniquenessViolation));
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(OfferServiceError::Contention {
            account: account.to_string(),
        })
    }

    pub fn offers_for_account(
        &self,
        account: &AccountNumber,
    ) -> Result<Vec<Offer>, OfferServiceError> {
        Ok(self.store.query_by_account(account)?)
    }

    pub fn listing(&self) -> Result<OfferListing, OfferServiceError> {
        let offers = self.store.query_all()?;
        Ok(export::listing(&offers))
    }

    pub fn account_listing(
        &self,
        account: &AccountNumber,
    ) -> Result<OfferListing, OfferServiceError> {
        let offers = self.offers_for_account(account)?;
        Ok(export::listing(&offers))
    }

    pub fn export_xlsx(&self) -> Result<Vec<u8>, OfferServiceError> {
        let offers = self.store.query_all()?;
        Ok(export::render_xlsx(&export::project(&offers))?)
    }

    pub fn export_csv(&self) -> Result<Vec<u8>, OfferServiceError> {
        let offers = self.store.query_all()?;
        Ok(export::render_csv(&export::project(&offers))?)
    }

    fn rejected(&self, submission: &OfferSubmission, reason: RejectionReason) -> OfferServiceError {
        info!(
            account = %submission.account_number.trim(),
            code = reason.code(),
            field_level = reason.is_field_level(),
            "discount offer rejected"
        );
        OfferServiceError::Rejected(reason)
    }
}

/// Error raised by the offer service.
#[derive(Debug, thiserror::Error)]
pub enum OfferServiceError {
    #[error(transparent)]
    Rejected(#[from] RejectionReason),
    #[error("offers for account {account} kept changing; please resubmit")]
    Contention { account: String },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
