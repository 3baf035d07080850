use crate::{
    error::{AppError, AppResult},
    models::StockRecord,
    parser::parse_stock_page,
    services::{MailTransport, MarketSource, Notifier, SymbolResolver},
    utils::Timer,
};
use tracing::{info, instrument};

/// resolve → fetch → parse → notify, each stage only after the previous one succeeded.
pub struct QuotePipeline<'a, S: MarketSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: MarketSource + ?Sized> QuotePipeline<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Resolve `symbol` to a single company and parse its stock data table.
    #[instrument(skip(self))]
    pub async fn fetch_record(&self, symbol: &str) -> AppResult<StockRecord> {
        let timer = Timer::start("resolve");
        let company = SymbolResolver::new(self.source).resolve_unique(symbol).await?;
        timer.log_elapsed();
        info!(
            company_id = company.company_id,
            company = %company.company_name,
            "Resolved symbol"
        );

        let timer = Timer::start("fetch company page");
        let html = self.source.fetch_company_page(company.company_id).await?;
        timer.log_elapsed();

        let timer = Timer::start("parse stock table");
        let record = parse_stock_page(&html, &company.symbol)?.ok_or(AppError::TableNotFound {
            company_id: company.company_id,
        })?;
        timer.log_elapsed();

        info!(
            symbol = %record.symbol,
            last_traded_price = record.last_traded_price,
            change = %record.change_raw,
            "Parsed stock data"
        );
        Ok(record)
    }

    /// Full run; nothing is sent unless the record was parsed cleanly.
    pub async fn run<T: MailTransport>(
        &self,
        symbol: &str,
        recipient: &str,
        notifier: &Notifier<T>,
    ) -> AppResult<StockRecord> {
        let record = self.fetch_record(symbol).await?;
        notifier.notify(recipient, &record).await?;
        Ok(record)
    }
}
