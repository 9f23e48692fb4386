use serde::Serialize;

use super::super::domain::DiscountTier;

/// Why an account number failed the format check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountFormatIssue {
    Empty,
    MissingPrefix,
    MissingDigits,
    TooLong,
}

impl AccountFormatIssue {
    pub const fn summary(self) -> &'static str {
        match self {
            Self::Empty => "Account number is required.",
            Self::MissingPrefix => "Account number must start with 'AFRIQ'.",
            Self::MissingDigits => "Account number must be followed by integers after 'AFRIQ'.",
            Self::TooLong => "Account number must be at most 255 characters.",
        }
    }
}

/// User-correctable reasons a submission is turned away. None of them is ever retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectionReason {
    #[error("{}", .0.summary())]
    InvalidAccountFormat(AccountFormatIssue),
    #[error("Ticket number must contain only integers (at most 10 digits).")]
    InvalidTicketFormat,
    #[error("Date processed must be a valid date (YYYY-MM-DD).")]
    InvalidDate,
    #[error("Date processed cannot be in the future.")]
    FutureDateRejected,
    #[error("Select a valid choice for {field}: '{value}' is not one of the available choices.")]
    UnknownChoice { field: &'static str, value: String },
    #[error("This account number cannot be used for both Blocked Offer and Inactive Offer.")]
    StatusConflict,
    #[error("Blocked Offer is only eligible for a 50% discount.")]
    BlockedOfferTierInvalid,
    #[error("50% discount can only be applied once for a Blocked Offer.")]
    BlockedOfferAlreadyApplied,
    #[error("This account has already applied for all available discounts.")]
    SequenceExhausted,
    #[error(
        "Discounts must be applied in this order: 50%, 25%, 10%. You must apply for the {expected} discount first."
    )]
    SequenceOutOfOrder { expected: DiscountTier },
    #[error("An offer with this account number, discount and status already exists.")]
    UniquenessViolation,
}

impl RejectionReason {
    /// Stable machine-readable identifier for API clients.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidAccountFormat(_) => "invalid_account_format",
            Self::InvalidTicketFormat => "invalid_ticket_format",
            Self::InvalidDate => "invalid_date",
            Self::FutureDateRejected => "future_date_rejected",
            Self::UnknownChoice { .. } => "unknown_choice",
            Self::StatusConflict => "status_conflict",
            Self::BlockedOfferTierInvalid => "blocked_offer_tier_invalid",
            Self::BlockedOfferAlreadyApplied => "blocked_offer_already_applied",
            Self::SequenceExhausted => "sequence_exhausted",
            Self::SequenceOutOfOrder { .. } => "sequence_out_of_order",
            Self::UniquenessViolation => "uniqueness_violation",
        }
    }

    /// True for rejections raised by field checks, before any prior offer is consulted.
    pub const fn is_field_level(&self) -> bool {
        matches!(
            self,
            Self::InvalidAccountFormat(_)
                | Self::InvalidTicketFormat
                | Self::InvalidDate
                | Self::FutureDateRejected
                | Self::UnknownChoice { .. }
        )
    }
}
