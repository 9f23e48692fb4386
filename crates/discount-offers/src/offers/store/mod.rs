mod memory;
mod sqlite;

pub use memory::InMemoryOfferStore;
pub use sqlite::SqliteOfferStore;

use super::domain::{AccountNumber, Offer};

/// Append-only storage for accepted offers.
///
/// Implementations enforce uniqueness of (account number, discount tier, status) on every
/// insert and return offers in the order they were accepted.
pub trait OfferStore: Send + Sync {
    fn insert(&self, offer: Offer) -> Result<Offer, StoreError>;

    /// Inserts only while the account still holds exactly `expected_prior` offers, making the
    /// read-evaluate-insert sequence atomic with respect to other writers.
    fn insert_if_unchanged(&self, offer: Offer, expected_prior: usize)
        -> Result<Offer, StoreError>;

    fn query_by_account(&self, account: &AccountNumber) -> Result<Vec<Offer>, StoreError>;

    fn query_all(&self) -> Result<Vec<Offer>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("offer already exists for this account, discount and status")]
    UniquenessViolation,
    #[error("account offers changed since they were read (expected {expected}, found {found})")]
    StaleSnapshot { expected: usize, found: usize },
    #[error("offer store unavailable: {0}")]
    Unavailable(String),
    #[error("stored offer could not be decoded: {0}")]
    Corrupt(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Self::UniquenessViolation
            }
            other => Self::Unavailable(other.to_string()),
        }
    }
}
