use std::sync::Arc;

use std::io::Cursor;

use axum::response::Response;
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use chrono::NaiveDate;
use serde_json::Value;

use crate::offers::domain::{AccountNumber, Offer, OfferSubmission};
use crate::offers::store::{InMemoryOfferStore, OfferStore, StoreError};
use crate::offers::{offer_router, OfferService};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date")
}

pub(super) fn submission(account: &str, tier: &str, status: &str) -> OfferSubmission {
    OfferSubmission {
        account_number: account.to_string(),
        discount_offer: tier.to_string(),
        status: status.to_string(),
        ticket_number: "4410023".to_string(),
        region: "Nairobi".to_string(),
        date_processed: "2025-06-12".to_string(),
    }
}

pub(super) fn inactive(account: &str, tier: &str) -> OfferSubmission {
    submission(account, tier, "inactive_offer")
}

pub(super) fn blocked(account: &str, tier: &str) -> OfferSubmission {
    submission(account, tier, "blocked_offer")
}

pub(super) fn build_service() -> (OfferService<InMemoryOfferStore>, Arc<InMemoryOfferStore>) {
    let store = Arc::new(InMemoryOfferStore::default());
    let service = OfferService::new(store.clone());
    (service, store)
}

pub(super) fn offer_router_with_service(
    service: OfferService<InMemoryOfferStore>,
) -> axum::Router {
    offer_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

/// Sheet names and every row of the first worksheet, with each cell read back as text.
pub(super) fn read_workbook(bytes: Vec<u8>) -> (Vec<String>, Vec<Vec<String>>) {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).expect("xlsx opens");
    let sheets = workbook.sheet_names().to_vec();
    let range = workbook
        .worksheet_range(&sheets[0])
        .expect("worksheet readable");
    let rows = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::String(text) => text.clone(),
                    other => panic!("expected a string cell, got {other:?}"),
                })
                .collect()
        })
        .collect();
    (sheets, rows)
}

/// Rejects every insert as a duplicate, as a racing writer would cause.
pub(super) struct ConflictStore;

impl OfferStore for ConflictStore {
    fn insert(&self, _offer: Offer) -> Result<Offer, StoreError> {
        Err(StoreError::UniquenessViolation)
    }

    fn insert_if_unchanged(&self, _offer: Offer, _expected: usize) -> Result<Offer, StoreError> {
        Err(StoreError::UniquenessViolation)
    }

    fn query_by_account(&self, _account: &AccountNumber) -> Result<Vec<Offer>, StoreError> {
        Ok(Vec::new())
    }

    fn query_all(&self) -> Result<Vec<Offer>, StoreError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableStore;

impl OfferStore for UnavailableStore {
    fn insert(&self, _offer: Offer) -> Result<Offer, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn insert_if_unchanged(&self, _offer: Offer, _expected: usize) -> Result<Offer, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn query_by_account(&self, _account: &AccountNumber) -> Result<Vec<Offer>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn query_all(&self) -> Result<Vec<Offer>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}
