use soroban_sdk::{contractclient, contracterror, Env, Symbol};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum OracleError {
    Overflow = 6,
}

#[contractclient(name = "PriceOracleClient")]
pub trait PriceOracle {
    /// Amount of payment token worth `amount` of `code`; 0 when the rate
    /// is unset.
    fn convert(env: Env, code: Symbol, amount: i128) -> Result<i128, OracleError>;
}
