#![no_std]

mod entities;
mod errors;
mod rate_oracle_contract;

pub use entities::*;
pub use errors::*;
pub use rate_oracle_contract::*;

#[cfg(test)]
mod test;
