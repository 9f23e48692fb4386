use rust_xlsxwriter::{Workbook, XlsxError};
use serde::{Deserialize, Serialize};

use super::domain::Offer;

pub const SHEET_TITLE: &str = "Discount Offers";
pub const EXPORT_HEADERS: [&str; 6] = [
    "Account Number",
    "Discount Offer",
    "Status",
    "Ticket Number",
    "Region",
    "Date Processed",
];
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const XLSX_FILENAME: &str = "discount_offers.xlsx";
pub const CSV_FILENAME: &str = "discount_offers.csv";

/// One exported offer, columns in export order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferRow {
    pub account_number: String,
    pub discount_offer: String,
    pub status: String,
    pub ticket_number: String,
    pub region: String,
    pub date_processed: String,
}

impl OfferRow {
    pub fn cells(&self) -> [&str; 6] {
        [
            &self.account_number,
            &self.discount_offer,
            &self.status,
            &self.ticket_number,
            &self.region,
            &self.date_processed,
        ]
    }
}

impl From<&Offer> for OfferRow {
    fn from(offer: &Offer) -> Self {
        Self {
            account_number: offer.account_number.to_string(),
            discount_offer: offer.discount_tier.label().to_string(),
            status: offer.status.code().to_string(),
            ticket_number: offer.ticket_number.as_str().to_string(),
            region: offer.region.label().to_string(),
            date_processed: offer.date_processed.format("%Y-%m-%d").to_string(),
        }
    }
}

/// JSON listing document, rows under `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferListing {
    pub data: Vec<OfferRow>,
}

pub fn project(offers: &[Offer]) -> Vec<OfferRow> {
    offers.iter().map(OfferRow::from).collect()
}

pub fn listing(offers: &[Offer]) -> OfferListing {
    OfferListing {
        data: project(offers),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to build spreadsheet: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to finish csv buffer: {0}")]
    CsvBuffer(String),
}

pub fn render_xlsx(rows: &[OfferRow]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_TITLE)?;

    for (col, header) in (0u16..).zip(EXPORT_HEADERS) {
        sheet.write_string(0, col, header)?;
    }

    for (row_idx, row) in (1u32..).zip(rows) {
        for (col, cell) in (0u16..).zip(row.cells()) {
            sheet.write_string(row_idx, col, cell)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

pub fn render_csv(rows: &[OfferRow]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADERS)?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    writer
        .into_inner()
        .map_err(|err| ExportError::CsvBuffer(err.to_string()))
}
