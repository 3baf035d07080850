use serde::{Deserialize, Deserializer, Serialize};

/// A candidate company returned by the PSE Edge symbol search.
///
/// The endpoint sends every field as a string, including the numeric id and
/// the ETF flag, so both go through custom deserializers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyMatch {
    #[serde(rename = "cmpyId", deserialize_with = "u32_from_str_or_number")]
    pub company_id: u32,
    #[serde(rename = "cmpyNm")]
    pub company_name: String,
    pub symbol: String,
    #[serde(rename = "etfYn", deserialize_with = "flag_from_str_or_number", default)]
    pub is_etf: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StrOrNumber {
    Str(String),
    Number(u64),
}

fn u32_from_str_or_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match StrOrNumber::deserialize(deserializer)? {
        StrOrNumber::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
        StrOrNumber::Number(n) => u32::try_from(n).map_err(serde::de::Error::custom),
    }
}

fn flag_from_str_or_number<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match StrOrNumber::deserialize(deserializer)? {
        StrOrNumber::Str(s) => s.trim().parse::<u64>().map_err(serde::de::Error::custom)?,
        StrOrNumber::Number(n) => n,
    };
    Ok(raw != 0)
}
