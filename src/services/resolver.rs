use crate::{
    error::{AppError, AppResult},
    models::CompanyMatch,
    services::MarketSource,
    utils::Logger,
};

/// Turns a ticker or company-name fragment into exchange company ids.
pub struct SymbolResolver<'a, S: MarketSource + ?Sized> {
    source: &'a S,
    logger: Logger,
}

impl<'a, S: MarketSource + ?Sized> SymbolResolver<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            logger: Logger::new("RESOLVER"),
        }
    }

    /// All matches for `query`. The lookup endpoint is queried with the
    /// uppercased form; zero or several results are both valid here.
    pub async fn resolve(&self, query: &str) -> AppResult<Vec<CompanyMatch>> {
        let term = query.to_uppercase();
        self.logger.debug(&format!("Looking up '{}'", term));

        let matches = self.source.search_companies(&term).await?;
        self.logger
            .info(&format!("'{}' matched {} companies", term, matches.len()));
        Ok(matches)
    }

    /// Exactly one match, or `AmbiguousOrUnknownSymbol`.
    pub async fn resolve_unique(&self, query: &str) -> AppResult<CompanyMatch> {
        let mut matches = self.resolve(query).await?;
        if matches.len() != 1 {
            self.logger.warn(&format!(
                "'{}' is unknown or ambiguous: {:?}",
                query,
                matches.iter().map(|m| m.symbol.as_str()).collect::<Vec<_>>()
            ));
            return Err(AppError::AmbiguousOrUnknownSymbol {
                query: query.to_string(),
                matches: matches.len(),
            });
        }
        Ok(matches.remove(0))
    }
}
