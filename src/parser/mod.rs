//! Stock data table parsing for PSE Edge company pages.
//!
//! The page holds several tables; only the one whose first cell reads
//! "Last Traded Price" carries the quote. [`select_stock_table`] finds it and
//! [`parse_table`] turns its `th`/`td` pairs into a [`StockRecord`].
//!
//! [`StockRecord`]: crate::models::StockRecord

pub mod table;
pub mod text;

pub use table::*;
pub use text::*;
