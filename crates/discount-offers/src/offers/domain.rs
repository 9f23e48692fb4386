use std::fmt;

use chrono::NaiveDate;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// Customer account identifier, always `AFRIQ` followed by digits once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AccountNumber(pub(crate) String);

impl AccountNumber {
    pub const PREFIX: &'static str = "AFRIQ";
    pub const MAX_LEN: usize = 255;

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Support ticket reference attached to an offer (digits only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketNumber(pub(crate) String);

impl TicketNumber {
    pub const MAX_LEN: usize = 10;

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Discount percentage granted by an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscountTier {
    #[serde(rename = "50%")]
    Fifty,
    #[serde(rename = "25%")]
    TwentyFive,
    #[serde(rename = "10%")]
    Ten,
}

impl DiscountTier {
    /// Order in which inactive-offer tiers must be applied.
    pub const SEQUENCE: [Self; 3] = [Self::Fifty, Self::TwentyFive, Self::Ten];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Fifty => "50%",
            Self::TwentyFive => "25%",
            Self::Ten => "10%",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::SEQUENCE
            .into_iter()
            .find(|tier| tier.label() == value)
    }
}

impl fmt::Display for DiscountTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Offer category; each status carries its own eligibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    BlockedOffer,
    InactiveOffer,
}

impl OfferStatus {
    pub const fn ordered() -> [Self; 2] {
        [Self::BlockedOffer, Self::InactiveOffer]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::BlockedOffer => "blocked_offer",
            Self::InactiveOffer => "inactive_offer",
        }
    }

    pub fn from_code(value: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|status| status.code() == value)
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Nairobi,
    Garissa,
    Wajir,
    Embu,
}

impl Region {
    pub const fn ordered() -> [Self; 4] {
        [Self::Nairobi, Self::Garissa, Self::Wajir, Self::Embu]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Nairobi => "Nairobi",
            Self::Garissa => "Garissa",
            Self::Wajir => "Wajir",
            Self::Embu => "Embu",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|region| region.label() == value)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw candidate as supplied by the intake form; every field is still untrusted text.
///
/// Missing fields arrive as empty strings and numeric or boolean primitives are taken in
/// their textual form, so malformed bodies still reach validation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OfferSubmission {
    #[serde(deserialize_with = "deserialize_field_text")]
    pub account_number: String,
    #[serde(deserialize_with = "deserialize_field_text")]
    pub discount_offer: String,
    #[serde(deserialize_with = "deserialize_field_text")]
    pub status: String,
    #[serde(deserialize_with = "deserialize_field_text")]
    pub ticket_number: String,
    #[serde(deserialize_with = "deserialize_field_text")]
    pub region: String,
    #[serde(deserialize_with = "deserialize_field_text")]
    pub date_processed: String,
}

pub(crate) fn deserialize_field_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(FieldText)
}

struct FieldText;

impl<'de> Visitor<'de> for FieldText {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean or null")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<String, E> {
        Ok(value)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_unit<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }
}

/// Accepted discount application. Created once, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Offer {
    pub account_number: AccountNumber,
    pub discount_tier: DiscountTier,
    pub status: OfferStatus,
    pub ticket_number: TicketNumber,
    pub region: Region,
    pub date_processed: NaiveDate,
}

impl Offer {
    /// Human-readable confirmation shown to the submitter.
    pub fn confirmation(&self) -> String {
        format!(
            "Discount {} for {} applied successfully!",
            self.discount_tier, self.status
        )
    }
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {}",
            self.account_number, self.discount_tier, self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_tolerates_missing_and_numeric_fields() {
        let submission: OfferSubmission = serde_json::from_value(serde_json::json!({
            "discount_offer": "50%",
            "status": "inactive_offer",
            "ticket_number": 1234,
            "region": null,
        }))
        .expect("lenient submission");

        assert_eq!(submission.account_number, "");
        assert_eq!(submission.ticket_number, "1234");
        assert_eq!(submission.region, "");
        assert_eq!(submission.date_processed, "");
    }
}
