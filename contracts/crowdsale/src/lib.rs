#![no_std]

mod crowdsale_contract;
mod entities;
mod errors;
mod oracle;
mod pricing;

pub use crowdsale_contract::*;
pub use entities::*;
pub use errors::*;
pub use oracle::{OracleError, PriceOracle, PriceOracleClient};
pub use pricing::ESCROW_RATE_PERCENT;
