use crate::error::FieldParseError;
use crate::models::StockRecord;
use crate::parser::text::{collapse_whitespace, element_text};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Marker text identifying the quote table on a company page.
pub const STOCK_TABLE_MARKER: &str = "Last Traded Price";

static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("Failed to parse table selector"));
static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Failed to parse row selector"));
static HEADER_CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("th").expect("Failed to parse header cell selector"));

/// Header labels understood by the parser. Anything else in the table is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableHeader {
    LastTradedPrice,
    Open,
    PrevCloseAndDate,
    Change,
    High,
    Value,
    Low,
    Volume,
    AveragePrice,
    High52Week,
    Low52Week,
}

impl TableHeader {
    pub const ALL: [TableHeader; 11] = [
        TableHeader::LastTradedPrice,
        TableHeader::Open,
        TableHeader::PrevCloseAndDate,
        TableHeader::Change,
        TableHeader::High,
        TableHeader::Value,
        TableHeader::Low,
        TableHeader::Volume,
        TableHeader::AveragePrice,
        TableHeader::High52Week,
        TableHeader::Low52Week,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableHeader::LastTradedPrice => "Last Traded Price",
            TableHeader::Open => "Open",
            TableHeader::PrevCloseAndDate => "Previous Close and Date",
            TableHeader::Change => "Change(% Change)",
            TableHeader::High => "High",
            TableHeader::Value => "Value",
            TableHeader::Low => "Low",
            TableHeader::Volume => "Volume",
            TableHeader::AveragePrice => "Average Price",
            TableHeader::High52Week => "52-Week High",
            TableHeader::Low52Week => "52-Week Low",
        }
    }

    /// Exact match only; `"Open "` or `"Opening"` are not `Open`.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|header| header.as_str() == label)
    }
}

/// First table in document order whose first row starts with a cell
/// containing [`STOCK_TABLE_MARKER`].
pub fn select_stock_table(document: &Html) -> Option<ElementRef<'_>> {
    document.select(&TABLE_SELECTOR).find(|table| is_stock_table(*table))
}

pub fn is_stock_table(table: ElementRef<'_>) -> bool {
    table
        .select(&ROW_SELECTOR)
        .next()
        .and_then(|row| row.children().find_map(ElementRef::wrap))
        .map(|cell| element_text(cell).contains(STOCK_TABLE_MARKER))
        .unwrap_or(false)
}

/// Parse a full company page.
///
/// `Ok(None)` means the page has no stock table, in which case the table
/// parser never runs.
pub fn parse_stock_page(html: &str, symbol: &str) -> Result<Option<StockRecord>, FieldParseError> {
    let document = Html::parse_document(html);
    match select_stock_table(&document) {
        Some(table) => parse_table(table, symbol).map(Some),
        None => Ok(None),
    }
}

/// Build a record from one table's `th` cells and the element right after each.
///
/// The first field that fails to decode aborts the pass and is returned as the
/// error; no further headers are attributed.
pub fn parse_table(table: ElementRef<'_>, symbol: &str) -> Result<StockRecord, FieldParseError> {
    let mut record = StockRecord::new(symbol);

    for header_cell in table.select(&HEADER_CELL_SELECTOR) {
        let label = collapse_whitespace(&element_text(header_cell));
        let Some(header) = TableHeader::from_label(&label) else {
            continue;
        };

        let value = header_cell
            .next_siblings()
            .find_map(ElementRef::wrap)
            .map(|cell| collapse_whitespace(&element_text(cell)))
            .unwrap_or_default();

        apply_field(&mut record, header, value)?;
    }

    Ok(record)
}

fn apply_field(
    record: &mut StockRecord,
    header: TableHeader,
    value: String,
) -> Result<(), FieldParseError> {
    match header {
        TableHeader::LastTradedPrice => record.last_traded_price = parse_number(header, &value)?,
        TableHeader::Open => record.open = parse_number(header, &value)?,
        TableHeader::High => record.high = parse_number(header, &value)?,
        TableHeader::Low => record.low = parse_number(header, &value)?,
        TableHeader::AveragePrice => record.average = parse_number(header, &value)?,
        TableHeader::High52Week => record.high_52_week = parse_number(header, &value)?,
        TableHeader::Low52Week => record.low_52_week = parse_number(header, &value)?,
        TableHeader::Value => record.value = value,
        TableHeader::Volume => record.volume = value,
        TableHeader::PrevCloseAndDate => {
            let (price, date) = value.split_once(' ').unwrap_or((value.as_str(), ""));
            record.prev_close_price = parse_number(header, price)?;
            record.prev_close_date = date.to_string();
        }
        TableHeader::Change => {
            let change = parse_change(&value)?;
            record.change_up = change.up;
            record.change_value = change.value;
            record.change_percent = change.percent;
            record.change_raw = value;
        }
    }
    Ok(())
}

/// Decoded `Change(% Change)` cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeParts {
    pub up: bool,
    pub value: f64,
    pub percent: f64,
}

/// Split `"<direction> <delta> (<percent>%)"` into its three parts.
pub fn parse_change(value: &str) -> Result<ChangeParts, FieldParseError> {
    let header = TableHeader::Change;
    let tokens: Vec<&str> = value.split(' ').collect();
    if tokens.len() < 3 {
        return Err(FieldParseError::MalformedCompound {
            header: header.as_str().to_string(),
            value: value.to_string(),
            expected: 3,
        });
    }

    let up = tokens[0].to_lowercase().contains("up");
    let delta = parse_number(header, tokens[1])?;
    let percent_text: String = tokens[2]
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '%'))
        .collect();
    let percent = parse_number(header, &percent_text)?;

    Ok(ChangeParts {
        up,
        value: delta,
        percent,
    })
}

fn parse_number(header: TableHeader, raw: &str) -> Result<f64, FieldParseError> {
    raw.parse::<f64>()
        .map_err(|e| FieldParseError::InvalidNumber {
            header: header.as_str().to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STOCK_TABLE: &str = r#"
        <table class="view">
            <tr><th>Last Traded Price</th><td>5.20</td><th>Open</th><td>5.10</td></tr>
            <tr><th>Previous Close and Date</th><td>152.50 March 1, 2021</td><th>High</th><td>5.30</td></tr>
            <tr><th>Change(% Change)</th><td>Up 0.05 (1.23%)</td><th>Low</th><td>5.05</td></tr>
            <tr><th>Value</th><td>1,234,567.00</td><th>Average Price</th><td>5.18</td></tr>
            <tr><th>Volume</th><td>238,000</td><th>52-Week High</th><td>6.40</td></tr>
            <tr><th>P/E Ratio</th><td>n/a</td><th>52-Week Low</th><td>3.95</td></tr>
        </table>"#;

    fn parse_fragment(html: &str, symbol: &str) -> Result<StockRecord, FieldParseError> {
        let document = Html::parse_document(html);
        let table = document
            .select(&TABLE_SELECTOR)
            .next()
            .expect("fixture has a table");
        parse_table(table, symbol)
    }

    fn single_row_table(header: &str, value: &str) -> String {
        format!("<table><tr><th>{header}</th><td>{value}</td></tr></table>")
    }

    #[test]
    fn test_parse_full_table() {
        let record = parse_fragment(STOCK_TABLE, "STI").unwrap();

        assert_eq!(record.symbol, "STI");
        assert_eq!(record.last_traded_price, 5.20);
        assert_eq!(record.open, 5.10);
        assert_eq!(record.prev_close_price, 152.50);
        assert_eq!(record.prev_close_date, "March 1, 2021");
        assert_eq!(record.high, 5.30);
        assert_eq!(record.change_raw, "Up 0.05 (1.23%)");
        assert!(record.change_up);
        assert_eq!(record.change_value, 0.05);
        assert_eq!(record.change_percent, 1.23);
        assert_eq!(record.low, 5.05);
        assert_eq!(record.value, "1,234,567.00");
        assert_eq!(record.average, 5.18);
        assert_eq!(record.volume, "238,000");
        assert_eq!(record.high_52_week, 6.40);
        assert_eq!(record.low_52_week, 3.95);
    }

    #[test]
    fn test_change_up() {
        let record = parse_fragment(&single_row_table("Change(% Change)", "Up 0.05 (1.23%)"), "X").unwrap();
        assert!(record.change_up);
        assert_eq!(record.change_value, 0.05);
        assert_eq!(record.change_percent, 1.23);
    }

    #[test]
    fn test_change_down() {
        let record = parse_fragment(&single_row_table("Change(% Change)", "Down 0.10 (0.50%)"), "X").unwrap();
        assert!(!record.change_up);
        assert_eq!(record.change_value, 0.10);
        assert_eq!(record.change_percent, 0.50);
        assert_eq!(record.change_raw, "Down 0.10 (0.50%)");
    }

    #[test]
    fn test_change_direction_is_case_insensitive() {
        let parts = parse_change("UP 1.00 (2.00%)").unwrap();
        assert!(parts.up);
        let parts = parse_change("Unchanged 0.00 (0.00%)").unwrap();
        assert!(!parts.up);
    }

    #[test]
    fn test_change_with_too_few_tokens() {
        let err = parse_change("Up 0.05").unwrap_err();
        assert!(matches!(err, FieldParseError::MalformedCompound { expected: 3, .. }));
        assert_eq!(err.header(), "Change(% Change)");
    }

    #[test]
    fn test_prev_close_and_date() {
        let record = parse_fragment(
            &single_row_table("Previous Close and Date", "152.50 March 1, 2021"),
            "X",
        )
        .unwrap();
        assert_eq!(record.prev_close_price, 152.50);
        assert_eq!(record.prev_close_date, "March 1, 2021");
    }

    #[test]
    fn test_prev_close_without_date() {
        let record = parse_fragment(&single_row_table("Previous Close and Date", "152.50"), "X").unwrap();
        assert_eq!(record.prev_close_price, 152.50);
        assert_eq!(record.prev_close_date, "");
    }

    #[test]
    fn test_whitespace_is_collapsed_in_cells() {
        let html = "<table><tr><th>Previous   Close\n and Date</th><td>152.50\n\t  March 1,  2021</td></tr></table>";
        let record = parse_fragment(html, "X").unwrap();
        assert_eq!(record.prev_close_price, 152.50);
        assert_eq!(record.prev_close_date, "March 1, 2021");
    }

    #[test]
    fn test_padded_header_does_not_match() {
        let html = "<table><tr><th> Open </th><td>not a number</td></tr></table>";
        let record = parse_fragment(html, "X").unwrap();
        assert_eq!(record.open, 0.0);
    }

    #[test]
    fn test_unknown_headers_are_ignored() {
        let html = "<table><tr><th>Market Capitalization</th><td>1.2B</td><th>Open</th><td>5.10</td></tr></table>";
        let record = parse_fragment(html, "X").unwrap();
        assert_eq!(record.open, 5.10);
    }

    #[test]
    fn test_first_error_halts_parsing() {
        let html = r#"<table>
            <tr><th>Open</th><td>5.10</td></tr>
            <tr><th>High</th><td>n/a</td></tr>
            <tr><th>Low</th><td>bad</td></tr>
            <tr><th>Volume</th><td>1,000</td></tr>
        </table>"#;
        let err = parse_fragment(html, "X").unwrap_err();
        assert_eq!(
            err,
            FieldParseError::InvalidNumber {
                header: "High".to_string(),
                value: "n/a".to_string(),
                reason: "invalid float literal".to_string(),
            }
        );
    }

    #[test]
    fn test_header_without_value_cell() {
        let record = parse_fragment("<table><tr><th>Volume</th></tr></table>", "X").unwrap();
        assert_eq!(record.volume, "");

        let err = parse_fragment("<table><tr><th>Open</th></tr></table>", "X").unwrap_err();
        assert_eq!(err.header(), "Open");
    }

    #[test]
    fn test_each_known_header_maps_to_its_label() {
        for header in TableHeader::ALL {
            assert_eq!(TableHeader::from_label(header.as_str()), Some(header));
        }
        assert_eq!(TableHeader::from_label("open"), None);
        assert_eq!(TableHeader::from_label("Last Traded Price "), None);
    }

    #[test]
    fn test_select_skips_tables_without_marker() {
        let html = r#"<html><body>
            <table id="info"><tr><th>Company Name</th><td>STI</td></tr>
                <tr><th>Last Traded Price</th><td>1.00</td></tr></table>
            <table id="quote"><tr><th>Last Traded Price</th><td>5.20</td></tr></table>
            <table id="other"><tr><th>Last Traded Price</th><td>9.99</td></tr></table>
        </body></html>"#;
        let document = Html::parse_document(html);
        let table = select_stock_table(&document).unwrap();
        assert_eq!(table.value().attr("id"), Some("quote"));
    }

    #[test]
    fn test_parse_stock_page_without_table() {
        let html = "<html><body><table><tr><td>Company Information</td></tr></table></body></html>";
        assert_eq!(parse_stock_page(html, "STI").unwrap(), None);
        assert_eq!(parse_stock_page("<html></html>", "STI").unwrap(), None);
    }

    #[test]
    fn test_parse_stock_page_with_table() {
        let html = format!("<html><body><table><tr><td>Header</td></tr></table>{STOCK_TABLE}</body></html>");
        let record = parse_stock_page(&html, "STI").unwrap().unwrap();
        assert_eq!(record.last_traded_price, 5.20);
        assert_eq!(record.low_52_week, 3.95);
    }
}
