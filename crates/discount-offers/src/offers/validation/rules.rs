use super::super::domain::{DiscountTier, Offer, OfferStatus};
use super::fields::CheckedFields;
use super::reason::RejectionReason;

pub(crate) fn apply_rules(
    candidate: &CheckedFields,
    prior: &[Offer],
) -> Result<(), RejectionReason> {
    check_status_consistency(candidate.status, prior)?;

    match candidate.status {
        OfferStatus::BlockedOffer => check_blocked_offer(candidate.discount_tier, prior),
        OfferStatus::InactiveOffer => check_inactive_sequence(candidate.discount_tier, prior),
    }
}

/// An account holds offers of a single status only.
fn check_status_consistency(status: OfferStatus, prior: &[Offer]) -> Result<(), RejectionReason> {
    if prior.iter().any(|offer| offer.status != status) {
        return Err(RejectionReason::StatusConflict);
    }
    Ok(())
}

fn check_blocked_offer(tier: DiscountTier, prior: &[Offer]) -> Result<(), RejectionReason> {
    if tier != DiscountTier::Fifty {
        return Err(RejectionReason::BlockedOfferTierInvalid);
    }

    let already_applied = prior.iter().any(|offer| {
        offer.status == OfferStatus::BlockedOffer && offer.discount_tier == DiscountTier::Fifty
    });
    if already_applied {
        return Err(RejectionReason::BlockedOfferAlreadyApplied);
    }

    Ok(())
}

fn check_inactive_sequence(tier: DiscountTier, prior: &[Offer]) -> Result<(), RejectionReason> {
    let applied = prior
        .iter()
        .filter(|offer| offer.status == OfferStatus::InactiveOffer)
        .count();

    let expected = DiscountTier::SEQUENCE
        .get(applied)
        .copied()
        .ok_or(RejectionReason::SequenceExhausted)?;

    if tier != expected {
        return Err(RejectionReason::SequenceOutOfOrder { expected });
    }

    Ok(())
}
