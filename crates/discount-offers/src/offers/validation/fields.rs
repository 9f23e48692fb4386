use chrono::NaiveDate;

use super::super::domain::{
    AccountNumber, DiscountTier, OfferStatus, OfferSubmission, Region, TicketNumber,
};
use super::reason::{AccountFormatIssue, RejectionReason};

impl AccountNumber {
    /// Accepts `AFRIQ` followed by one or more ASCII digits, ignoring surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, RejectionReason> {
        let value = raw.trim();
        let issue = if value.is_empty() {
            Some(AccountFormatIssue::Empty)
        } else if value.len() > Self::MAX_LEN {
            Some(AccountFormatIssue::TooLong)
        } else {
            match value.strip_prefix(Self::PREFIX) {
                None => Some(AccountFormatIssue::MissingPrefix),
                Some(digits) if !is_ascii_digits(digits) => Some(AccountFormatIssue::MissingDigits),
                Some(_) => None,
            }
        };

        match issue {
            Some(issue) => Err(RejectionReason::InvalidAccountFormat(issue)),
            None => Ok(Self(value.to_string())),
        }
    }
}

impl TicketNumber {
    pub fn parse(raw: &str) -> Result<Self, RejectionReason> {
        let value = raw.trim();
        if value.len() <= Self::MAX_LEN && is_ascii_digits(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(RejectionReason::InvalidTicketFormat)
        }
    }
}

fn is_ascii_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|byte| byte.is_ascii_digit())
}

fn parse_choice<T>(
    field: &'static str,
    raw: &str,
    lookup: impl Fn(&str) -> Option<T>,
) -> Result<T, RejectionReason> {
    let value = raw.trim();
    lookup(value).ok_or_else(|| RejectionReason::UnknownChoice {
        field,
        value: value.to_string(),
    })
}

pub(crate) fn parse_date_processed(
    raw: &str,
    today: NaiveDate,
) -> Result<NaiveDate, RejectionReason> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| RejectionReason::InvalidDate)?;
    if date > today {
        return Err(RejectionReason::FutureDateRejected);
    }
    Ok(date)
}

/// Typed view of a submission that passed every field-level check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CheckedFields {
    pub account_number: AccountNumber,
    pub discount_tier: DiscountTier,
    pub status: OfferStatus,
    pub ticket_number: TicketNumber,
    pub region: Region,
    pub date_processed: NaiveDate,
}

pub(crate) fn check_fields(
    candidate: &OfferSubmission,
    today: NaiveDate,
) -> Result<CheckedFields, RejectionReason> {
    let account_number = AccountNumber::parse(&candidate.account_number)?;
    let discount_tier = parse_choice(
        "discount_offer",
        &candidate.discount_offer,
        DiscountTier::from_label,
    )?;
    let status = parse_choice("status", &candidate.status, OfferStatus::from_code)?;
    let ticket_number = TicketNumber::parse(&candidate.ticket_number)?;
    let region = parse_choice("region", &candidate.region, Region::from_label)?;
    let date_processed = parse_date_processed(&candidate.date_processed, today)?;

    Ok(CheckedFields {
        account_number,
        discount_tier,
        status,
        ticket_number,
        region,
        date_processed,
    })
}
