use crate::infra::parse_date;
use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand, ValueEnum};
use discount_offers::config::{AppConfig, ConfiguredStore};
use discount_offers::error::AppError;
use discount_offers::offers::{
    export, AccountNumber, OfferListing, OfferService, OfferServiceError, OfferStore,
    OfferSubmission,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Subcommand, Debug)]
pub(crate) enum OffersCommand {
    /// Validate and record a discount offer for an account
    Submit(SubmitArgs),
    /// Print recorded offers, optionally for a single account
    List(ListArgs),
    /// Write every recorded offer to a spreadsheet, CSV or JSON file
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub(crate) struct SubmitArgs {
    /// Account number (AFRIQ followed by digits)
    #[arg(long)]
    pub(crate) account: String,
    /// Discount tier: 50%, 25% or 10%
    #[arg(long)]
    pub(crate) discount: String,
    /// Offer status: blocked_offer or inactive_offer
    #[arg(long)]
    pub(crate) status: String,
    /// Ticket number (digits, at most 10)
    #[arg(long)]
    pub(crate) ticket: String,
    /// Region: Nairobi, Garissa, Wajir or Embu
    #[arg(long)]
    pub(crate) region: String,
    /// Date the offer was processed (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) date_processed: String,
    /// Evaluate as of this date instead of today (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    /// Only list offers for this account
    #[arg(long)]
    pub(crate) account: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ExportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    fn default_filename(self) -> &'static str {
        match self {
            Self::Xlsx => export::XLSX_FILENAME,
            Self::Csv => export::CSV_FILENAME,
            Self::Json => "discount_offers.json",
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    #[arg(long, value_enum, default_value_t = ExportFormat::Xlsx)]
    pub(crate) format: ExportFormat,
    /// Destination file (defaults to discount_offers.<format> in the working directory)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_offers(command: OffersCommand) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    match config.storage.open()? {
        ConfiguredStore::Sqlite(store) => dispatch(OfferService::new(Arc::new(store)), command),
        ConfiguredStore::Memory(store) => dispatch(OfferService::new(Arc::new(store)), command),
    }
}

fn dispatch<S>(service: OfferService<S>, command: OffersCommand) -> Result<(), AppError>
where
    S: OfferStore + 'static,
{
    match command {
        OffersCommand::Submit(args) => submit(&service, args),
        OffersCommand::List(args) => list(&service, args),
        OffersCommand::Export(args) => write_export(&service, args),
    }
}

fn submit<S>(service: &OfferService<S>, args: SubmitArgs) -> Result<(), AppError>
where
    S: OfferStore + 'static,
{
    let SubmitArgs {
        account,
        discount,
        status,
        ticket,
        region,
        date_processed,
        today,
    } = args;

    let submission = OfferSubmission {
        account_number: account,
        discount_offer: discount,
        status,
        ticket_number: ticket,
        region,
        date_processed,
    };

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let offer = service.submit_on(submission, today)?;
    println!("{}", offer.confirmation());
    Ok(())
}

fn list<S>(service: &OfferService<S>, args: ListArgs) -> Result<(), AppError>
where
    S: OfferStore + 'static,
{
    let listing = match args.account {
        Some(raw) => {
            let account = AccountNumber::parse(&raw)
                .map_err(OfferServiceError::Rejected)?;
            service.account_listing(&account)?
        }
        None => service.listing()?,
    };

    render_listing(&listing);
    Ok(())
}

fn render_listing(listing: &OfferListing) {
    if listing.data.is_empty() {
        println!("No discount offers recorded");
        return;
    }

    println!("{}", export::EXPORT_HEADERS.join(" | "));
    for row in &listing.data {
        println!("{}", row.cells().join(" | "));
    }
}

fn write_export<S>(service: &OfferService<S>, args: ExportArgs) -> Result<(), AppError>
where
    S: OfferStore + 'static,
{
    let bytes = match args.format {
        ExportFormat::Xlsx => service.export_xlsx()?,
        ExportFormat::Csv => service.export_csv()?,
        ExportFormat::Json => {
            let listing = service.listing()?;
            serde_json::to_vec_pretty(&listing)
                .map_err(|err| AppError::Io(std::io::Error::other(err)))?
        }
    };

    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(args.format.default_filename()));
    std::fs::write(&path, &bytes)?;
    println!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use discount_offers::offers::InMemoryOfferStore;

    fn submit_args(account: &str, discount: &str) -> SubmitArgs {
        SubmitArgs {
            account: account.to_string(),
            discount: discount.to_string(),
            status: "inactive_offer".to_string(),
            ticket: "1200".to_string(),
            region: "Embu".to_string(),
            date_processed: "2025-04-01".to_string(),
            today: NaiveDate::from_ymd_opt(2025, 4, 2),
        }
    }

    #[test]
    fn submit_command_surfaces_rejections() {
        let service = OfferService::new(Arc::new(InMemoryOfferStore::default()));

        submit(&service, submit_args("AFRIQ55", "50%")).expect("first tier accepted");
        let err = submit(&service, submit_args("AFRIQ55", "10%")).expect_err("out of order");
        assert!(err.to_string().contains("sequence_out_of_order"));
    }

    #[test]
    fn export_command_writes_requested_format() {
        let service = OfferService::new(Arc::new(InMemoryOfferStore::default()));
        submit(&service, submit_args("AFRIQ56", "50%")).expect("accepted");

        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("offers.json");

        write_export(
            &service,
            ExportArgs {
                format: ExportFormat::Json,
                output: Some(output.clone()),
            },
        )
        .expect("export succeeds");

        let written: OfferListing =
            serde_json::from_slice(&std::fs::read(&output).expect("file written"))
                .expect("valid listing");
        assert_eq!(written.data.len(), 1);
        assert_eq!(written.data[0].account_number, "AFRIQ56");
    }
}
