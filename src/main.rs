use clap::{Parser, Subcommand};
use pse_notifier::{init_logger, prelude::*};

#[derive(Parser)]
#[command(name = "pse-notifier")]
#[command(about = "Fetch a PSE Edge stock quote and optionally email a summary")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and parse the stock data table for a symbol
    Quote {
        /// Ticker symbol (case-insensitive)
        symbol: String,
        /// Email the summary to this address
        #[arg(short, long)]
        notify: Option<String>,
        /// Print the parsed record as JSON instead of the text summary
        #[arg(long)]
        json: bool,
    },
    /// List companies matching a symbol or company name fragment
    Search {
        /// Symbol or company name fragment
        query: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logger()?;

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "pse-notifier failed");
        return Err(e);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let client = PseClient::new(&config)?;

    match cli.command {
        Commands::Quote {
            symbol,
            notify,
            json,
        } => {
            let pipeline = QuotePipeline::new(&client);
            let record = match notify {
                Some(recipient) => {
                    // Checked before any request goes out
                    let notifier = Notifier::new(SmtpMailer::new(config.require_smtp()?)?);
                    pipeline.run(&symbol, &recipient, &notifier).await?
                }
                None => pipeline.fetch_record(&symbol).await?,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("{}", format_subject(&record));
                print!("{}", format_body(&record));
            }
        }
        Commands::Search { query } => {
            let matches = SymbolResolver::new(&client).resolve(&query).await?;
            for company in matches {
                println!(
                    "{}\t{}\t{}\t{}",
                    company.company_id,
                    company.symbol,
                    company.company_name,
                    if company.is_etf { "ETF" } else { "-" }
                );
            }
        }
    }

    Ok(())
}
