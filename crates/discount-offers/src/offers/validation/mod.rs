mod fields;
mod reason;
mod rules;

pub use reason::{AccountFormatIssue, RejectionReason};

use chrono::NaiveDate;

use super::domain::{Offer, OfferSubmission};

/// Decides whether `candidate` may be recorded given the account's prior offers.
///
/// Field-level checks run first; the status, blocked-offer and sequence rules only see a
/// candidate whose fields already parsed. `prior` must hold the offers of the candidate's
/// account in the order they were accepted. Nothing is read from or written to a store.
pub fn evaluate(
    candidate: &OfferSubmission,
    prior: &[Offer],
    today: NaiveDate,
) -> Result<Offer, RejectionReason> {
    let checked = fields::check_fields(candidate, today)?;
    rules::apply_rules(&checked, prior)?;

    Ok(Offer {
        account_number: checked.account_number,
        discount_tier: checked.discount_tier,
        status: checked.status,
        ticket_number: checked.ticket_number,
        region: checked.region,
        date_processed: checked.date_processed,
    })
}
