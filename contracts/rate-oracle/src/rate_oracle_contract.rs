use crate::entities::*;
use crate::errors::*;
use soroban_sdk::{contract, contractimpl, log, symbol_short, Address, Env, Symbol, I256};

/// Fixed-point scale of stored rates: a rate of `RATE_SCALE` converts 1:1.
pub const RATE_SCALE: i128 = 1_000_000_000_000_000_000;

/// Currency -> Pebbles conversion table.
///
/// Rates are written by the owner only. A rate of zero means "never set" and
/// can not be written, so `convert` returning zero always signals a missing
/// rate to callers.
#[contract]
pub struct RateOracle;

#[contractimpl]
impl RateOracle {
    pub fn initialize(env: &Env, owner: Address) -> Result<(), Error> {
        owner.require_auth();
        if env.storage().persistent().has(&DataKey::Owner) {
            return Err(Error::AlreadyInitialized);
        }
        env.storage().persistent().set(&DataKey::Owner, &owner);
        Ok(())
    }

    pub fn update_rate(env: Env, caller: Address, code: Symbol, rate: i128) -> Result<(), Error> {
        caller.require_auth();
        let owner: Address = env
            .storage()
            .persistent()
            .get(&DataKey::Owner)
            .ok_or(Error::NotInitialized)?;
        if caller != owner {
            return Err(Error::Unauthorized);
        }
        if rate <= 0 {
            return Err(Error::InvalidRate);
        }

        env.storage()
            .persistent()
            .set(&DataKey::Rate(code.clone()), &rate);

        env.events()
            .publish((symbol_short!("rate_upd"), code.clone()), rate);
        log!(&env, "Rate for {} set to {}", code, rate);
        Ok(())
    }

    pub fn rate(env: Env, code: Symbol) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::Rate(code))
            .unwrap_or(0)
    }

    /// Converts `amount` of currency `code` into Pebbles, truncating toward
    /// zero. Returns 0 when no rate was ever set for `code`.
    pub fn convert(env: Env, code: Symbol, amount: i128) -> Result<i128, Error> {
        if amount < 0 {
            return Err(Error::InvalidAmount);
        }
        let rate = Self::rate(env.clone(), code);
        scale(&env, amount, rate)
    }

    pub fn get_owner(env: Env) -> Result<Address, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Owner)
            .ok_or(Error::NotInitialized)
    }
}

// The product of two i128 values always fits in 256 bits; only the quotient
// has to fit back into i128.
fn scale(env: &Env, amount: i128, rate: i128) -> Result<i128, Error> {
    I256::from_i128(env, amount)
        .mul(&I256::from_i128(env, rate))
        .div(&I256::from_i128(env, RATE_SCALE))
        .to_i128()
        .ok_or(Error::Overflow)
}
