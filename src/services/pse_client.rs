use crate::config::AppConfig;
use crate::error::AppResult;
use crate::models::CompanyMatch;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use tracing::{debug, instrument};

const SEARCH_PATH: &str = "/autoComplete/searchCompanyNameSymbol.ax";
const COMPANY_PAGE_PATH: &str = "/companyPage/stockData.do";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// The two exchange endpoints the notifier reads from.
#[async_trait]
pub trait MarketSource {
    /// Raw symbol/company-name search; `term` is sent as given.
    async fn search_companies(&self, term: &str) -> AppResult<Vec<CompanyMatch>>;

    /// HTML of a company's stock data page.
    async fn fetch_company_page(&self, company_id: u32) -> AppResult<String>;
}

/// PSE Edge HTTP client. One request per call, no retries.
pub struct PseClient {
    client: Client,
    base_url: String,
}

impl PseClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let mut builder = Client::builder().user_agent(
            config
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        );
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(PseClient {
            client: builder.build()?,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_request(&self, term: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, SEARCH_PATH))
            .header("Accept", "application/json, text/javascript, */*; q=0.01")
            .header("X-Requested-With", "XMLHttpRequest")
            .query(&[("term", term)])
    }

    fn company_page_request(&self, company_id: u32) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, COMPANY_PAGE_PATH))
            .header("Accept", "text/html,application/xhtml+xml")
            .query(&[("cmpy_id", company_id)])
    }
}

#[async_trait]
impl MarketSource for PseClient {
    #[instrument(skip(self))]
    async fn search_companies(&self, term: &str) -> AppResult<Vec<CompanyMatch>> {
        let response = self.search_request(term).send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!(bytes = body.len(), "Received symbol search response");

        // Decoded separately so a bad payload is not reported as a transport failure
        let matches: Vec<CompanyMatch> = serde_json::from_str(&body)?;
        Ok(matches)
    }

    #[instrument(skip(self))]
    async fn fetch_company_page(&self, company_id: u32) -> AppResult<String> {
        let response = self
            .company_page_request(company_id)
            .send()
            .await?
            .error_for_status()?;
        let html = response.text().await?;
        debug!(bytes = html.len(), "Received company page");
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client() -> PseClient {
        PseClient::new(&AppConfig::default()).unwrap()
    }

    #[test]
    fn test_client_creation_with_timeout() {
        let config = AppConfig {
            http_timeout: Some(Duration::from_secs(3)),
            ..AppConfig::default()
        };
        assert!(PseClient::new(&config).is_ok());
    }

    #[test]
    fn test_search_url() {
        let request = client().search_request("STI").build().unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://edge.pse.com.ph/autoComplete/searchCompanyNameSymbol.ax?term=STI"
        );
    }

    #[test]
    fn test_search_url_encodes_company_names() {
        let request = client().search_request("AYALA LAND").build().unwrap();
        assert_eq!(request.url().query(), Some("term=AYALA+LAND"));
    }

    #[test]
    fn test_company_page_url() {
        let request = client().company_page_request(222).build().unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://edge.pse.com.ph/companyPage/stockData.do?cmpy_id=222"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let config = AppConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            http_timeout: Some(Duration::from_secs(2)),
            ..AppConfig::default()
        };
        let client = PseClient::new(&config).unwrap();
        let result = client.search_companies("STI").await;
        assert!(matches!(result, Err(crate::error::AppError::Transport(_))));
    }
}
