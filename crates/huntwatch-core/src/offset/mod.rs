mod chain;
mod table;

pub use chain::*;
pub use table::*;
