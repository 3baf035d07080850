use serde::{Deserialize, Serialize};

/// One snapshot of a listed company's trading data, as shown in the
/// "Last Traded Price" table of its PSE Edge stock data page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub symbol: String,
    pub last_traded_price: f64,
    /// Change cell exactly as displayed, e.g. `Up 0.05 (1.23%)`
    pub change_raw: String,
    pub change_up: bool,
    pub change_value: f64,
    pub change_percent: f64,
    pub value: String,
    pub volume: String,
    pub high_52_week: f64,
    pub open: f64,
    pub prev_close_price: f64,
    pub high: f64,
    pub low: f64,
    pub average: f64,
    pub low_52_week: f64,
    pub prev_close_date: String,
}

impl StockRecord {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    /// Signed change, negative when the change cell does not read "up".
    pub fn signed_change(&self) -> f64 {
        if self.change_up {
            self.change_value
        } else {
            -self.change_value
        }
    }
}
