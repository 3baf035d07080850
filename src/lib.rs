//! # pse-notifier - PSE Edge stock quote notifier
//!
//! Looks up a listed company on the Philippine Stock Exchange's PSE Edge
//! site, parses the "Last Traded Price" table of its stock data page into a
//! [`StockRecord`](models::StockRecord) and optionally mails a summary.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pse_notifier::prelude::*;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     let client = PseClient::new(&config)?;
//!     let record = QuotePipeline::new(&client).fetch_record("STI").await?;
//!     println!("{}", format_body(&record));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod services;
pub mod utils;

// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{AppConfig, SmtpConfig};
    pub use crate::error::{AppError, AppResult, FieldParseError};
    pub use crate::models::{CompanyMatch, StockRecord};
    pub use crate::parser::{parse_stock_page, parse_table, select_stock_table};
    pub use crate::pipeline::QuotePipeline;
    pub use crate::services::{
        format_body, format_subject, MailTransport, MarketSource, Notifier, PseClient,
        SmtpMailer, SymbolResolver,
    };
}

pub use utils::{init_logger, Logger, Timer};
