use crate::commands::{run_offers, OffersCommand};
use crate::server;
use clap::{Args, Parser, Subcommand};
use discount_offers::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Discount Offers",
    about = "Record sequential discount offers and export them from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Submit, list or export discount offers against the configured store
    Offers {
        #[command(subcommand)]
        command: OffersCommand,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Offers { command } => run_offers(command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ExportFormat;

    #[test]
    fn parses_export_subcommand() {
        let cli = Cli::try_parse_from([
            "discount-offers",
            "offers",
            "export",
            "--format",
            "csv",
            "--output",
            "out.csv",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Offers {
                command: OffersCommand::Export(args),
            }) => {
                assert_eq!(args.format, ExportFormat::Csv);
                assert_eq!(args.output, Some("out.csv".into()));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["discount-offers"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
