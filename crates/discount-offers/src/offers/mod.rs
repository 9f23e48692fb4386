//! Discount offer intake: field and business-rule validation, append-only storage, and the
//! JSON/spreadsheet export surface.

pub mod domain;
pub mod export;
pub mod router;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    AccountNumber, DiscountTier, Offer, OfferStatus, OfferSubmission, Region, TicketNumber,
};
pub use export::{ExportError, OfferListing, OfferRow};
pub use router::offer_router;
pub use service::{OfferService, OfferServiceError};
pub use store::{InMemoryOfferStore, OfferStore, SqliteOfferStore, StoreError};
pub use validation::{evaluate, AccountFormatIssue, RejectionReason};
