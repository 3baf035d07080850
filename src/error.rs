use thiserror::Error;

/// A single table field that could not be decoded.
///
/// Parsing stops at the first one of these; fields after it in the table are
/// left at their defaults and the partially filled record is dropped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldParseError {
    #[error("invalid number for '{header}': '{value}' ({reason})")]
    InvalidNumber {
        header: String,
        value: String,
        reason: String,
    },
    #[error("malformed compound value for '{header}': '{value}' (expected {expected} space-separated parts)")]
    MalformedCompound {
        header: String,
        value: String,
        expected: usize,
    },
}

impl FieldParseError {
    pub fn header(&self) -> &str {
        match self {
            FieldParseError::InvalidNumber { header, .. } => header,
            FieldParseError::MalformedCompound { header, .. } => header,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode lookup response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("symbol '{query}' is unknown or ambiguous ({matches} matches)")]
    AmbiguousOrUnknownSymbol { query: String, matches: usize },
    #[error("no stock data table found for company {company_id}")]
    TableNotFound { company_id: u32 },
    #[error("failed to parse stock data: {0}")]
    FieldParse(#[from] FieldParseError),
    #[error("mail delivery failed: {0}")]
    Delivery(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type AppResult<T> = Result<T, AppError>;
