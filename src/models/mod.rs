pub mod company;
pub mod stock_record;

pub use company::*;
pub use stock_record::*;
