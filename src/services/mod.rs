pub mod notifier;
pub mod pse_client;
pub mod resolver;

pub use notifier::*;
pub use pse_client::*;
pub use resolver::*;
