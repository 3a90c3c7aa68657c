use crate::entities::*;
use crate::errors::*;
use crate::oracle::{OracleError, PriceOracleClient};
use crate::pricing::*;
use soroban_sdk::{contract, contractimpl, log, symbol_short, token, Address, Env};

/// Sale of Read units for Pebbles with an optional ICO phase.
///
/// Buyers approve the contract on the payment token and call `purchase`;
/// the contract pulls only the cost of the units it can fill. During the
/// ICO 90% of each payment is escrowed per buyer and paid back by `refund`
/// if the soft cap is missed.
#[contract]
pub struct Crowdsale;

#[contractimpl]
impl Crowdsale {
    pub fn initialize(
        env: &Env,
        owner: Address,
        payment_token: Address,
        oracle: Address,
        offer: Offer,
        book: Book,
    ) -> Result<(), Error> {
        owner.require_auth();
        if env.storage().persistent().has(&DataKey::Owner) {
            return Err(Error::AlreadyInitialized);
        }
        validate_offer(&offer)?;

        let state = initial_state(&offer);
        env.storage().persistent().set(&DataKey::Owner, &owner);
        env.storage()
            .persistent()
            .set(&DataKey::PaymentToken, &payment_token);
        env.storage().persistent().set(&DataKey::Oracle, &oracle);
        env.storage().persistent().set(&DataKey::Offer, &offer);
        env.storage().persistent().set(&DataKey::Book, &book);
        env.storage().persistent().set(&DataKey::State, &state);

        env.events().publish(
            (symbol_short!("init"), owner),
            (offer.total_supply_cap, offer.ico_supply_cap, offer.soft_cap),
        );
        Ok(())
    }

    pub fn quote(env: Env) -> Result<i128, Error> {
        let offer = load_offer(&env)?;
        let state = load_state(&env)?;
        let phase = phase_at(env.ledger().timestamp(), &offer, &state);
        unit_price(&env, &offer, phase)
    }

    pub fn purchase(env: Env, buyer: Address) -> Result<PurchaseReceipt, Error> {
        buyer.require_auth();
        let offer = load_offer(&env)?;
        let mut state = load_state(&env)?;

        let phase = phase_at(env.ledger().timestamp(), &offer, &state);
        ensure_open(phase, &state)?;
        let price = unit_price(&env, &offer, phase)?;

        let token_client = token::Client::new(&env, &load_payment_token(&env)?);
        let this = env.current_contract_address();
        let allowance = token_client.allowance(&buyer, &this);
        let fill = plan_fill(phase, &offer, &state, allowance, price)?;

        match token_client.try_transfer_from(&this, &buyer, &this, &fill.cost) {
            Ok(Ok(())) => {}
            _ => {
                log!(&env, "Payment of {} from buyer rejected", fill.cost);
                return Err(Error::LedgerCallFailed);
            }
        }

        let mut holding = load_holding(&env, &buyer);
        holding.unit_balance = holding
            .unit_balance
            .checked_add(fill.units)
            .ok_or(Error::Overflow)?;
        state.units_sold_total = state
            .units_sold_total
            .checked_add(fill.units)
            .ok_or(Error::Overflow)?;

        if phase == Phase::Active {
            state.units_sold_during_ico = state
                .units_sold_during_ico
                .checked_add(fill.units)
                .ok_or(Error::Overflow)?;
            holding.escrowed = holding
                .escrowed
                .checked_add(fill.escrow)
                .ok_or(Error::Overflow)?;
            state.escrow_outstanding = state
                .escrow_outstanding
                .checked_add(fill.escrow)
                .ok_or(Error::Overflow)?;

            if state.units_sold_during_ico == offer.ico_supply_cap {
                state.closed_early = true;
                state.outcome = Outcome::Succeeded;
                env.events()
                    .publish((symbol_short!("hard_cap"),), state.units_sold_during_ico);
                log!(&env, "ICO hard cap of {} units reached", offer.ico_supply_cap);
            }
        }

        env.storage()
            .persistent()
            .set(&DataKey::Holding(buyer.clone()), &holding);
        env.storage().persistent().set(&DataKey::State, &state);

        env.events().publish(
            (symbol_short!("purchase"), buyer),
            (fill.units, fill.cost, fill.escrow),
        );
        Ok(PurchaseReceipt {
            units_purchased: fill.units,
            amount_charged: fill.cost,
        })
    }

    /// Decides the ICO outcome once its window has elapsed.
    pub fn finalize(env: Env, caller: Address) -> Result<Outcome, Error> {
        caller.require_auth();
        if caller != load_owner(&env)? {
            return Err(Error::Unauthorized);
        }
        let offer = load_offer(&env)?;
        let mut state = load_state(&env)?;
        if state.outcome != Outcome::Undetermined {
            return Err(Error::AlreadyFinalized);
        }
        if phase_at(env.ledger().timestamp(), &offer, &state) != Phase::Closed {
            return Err(Error::NotYetClosable);
        }

        state.outcome = settle_outcome(&offer, &state);
        env.storage().persistent().set(&DataKey::State, &state);

        env.events().publish(
            (symbol_short!("finalize"),),
            (state.outcome, state.units_sold_during_ico),
        );
        log!(
            &env,
            "ICO finalized with {} of {} soft cap units",
            state.units_sold_during_ico,
            offer.soft_cap
        );
        Ok(state.outcome)
    }

    /// Pays back the buyer's escrow after a failed ICO. Purchased units are
    /// forfeited.
    pub fn refund(env: Env, buyer: Address) -> Result<i128, Error> {
        buyer.require_auth();
        let mut state = load_state(&env)?;
        if state.outcome != Outcome::Failed {
            return Err(Error::RefundNotAvailable);
        }
        let mut holding = load_holding(&env, &buyer);
        if holding.escrowed <= 0 {
            return Err(Error::NothingToRefund);
        }

        let amount = holding.escrowed;
        holding.escrowed = 0;
        holding.unit_balance = 0;
        state.escrow_outstanding = state
            .escrow_outstanding
            .checked_sub(amount)
            .ok_or(Error::Overflow)?;
        env.storage()
            .persistent()
            .set(&DataKey::Holding(buyer.clone()), &holding);
        env.storage().persistent().set(&DataKey::State, &state);

        let token_client = token::Client::new(&env, &load_payment_token(&env)?);
        match token_client.try_transfer(&env.current_contract_address(), &buyer, &amount) {
            Ok(Ok(())) => {}
            _ => {
                log!(&env, "Refund of {} rejected by payment token", amount);
                return Err(Error::LedgerCallFailed);
            }
        }

        env.events()
            .publish((symbol_short!("refund"), buyer), amount);
        Ok(amount)
    }

    /// Sends the owner everything the contract holds except escrow that may
    /// still be refunded.
    pub fn withdraw_proceeds(env: Env, caller: Address, to: Address) -> Result<i128, Error> {
        caller.require_auth();
        if caller != load_owner(&env)? {
            return Err(Error::Unauthorized);
        }
        let state = load_state(&env)?;
        let locked = if state.outcome == Outcome::Succeeded {
            0
        } else {
            state.escrow_outstanding
        };

        let token_client = token::Client::new(&env, &load_payment_token(&env)?);
        let this = env.current_contract_address();
        let amount = token_client
            .balance(&this)
            .checked_sub(locked)
            .ok_or(Error::Overflow)?;
        if amount <= 0 {
            return Err(Error::NothingToWithdraw);
        }

        match token_client.try_transfer(&this, &to, &amount) {
            Ok(Ok(())) => {}
            _ => {
                log!(&env, "Withdrawal of {} rejected by payment token", amount);
                return Err(Error::LedgerCallFailed);
            }
        }

        env.events()
            .publish((symbol_short!("withdraw"), to), amount);
        Ok(amount)
    }

    pub fn status(env: Env) -> Result<SaleStatus, Error> {
        let offer = load_offer(&env)?;
        let state = load_state(&env)?;
        Ok(SaleStatus {
            phase: phase_at(env.ledger().timestamp(), &offer, &state),
            outcome: state.outcome,
            units_sold_total: state.units_sold_total,
            units_sold_during_ico: state.units_sold_during_ico,
        })
    }

    pub fn holding(env: Env, holder: Address) -> Holding {
        load_holding(&env, &holder)
    }

    pub fn balance_of(env: Env, holder: Address) -> u64 {
        load_holding(&env, &holder).unit_balance
    }

    pub fn escrow_of(env: Env, holder: Address) -> i128 {
        load_holding(&env, &holder).escrowed
    }

    pub fn get_offer(env: Env) -> Result<Offer, Error> {
        load_offer(&env)
    }

    pub fn get_book(env: Env) -> Result<Book, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Book)
            .ok_or(Error::NotInitialized)
    }

    pub fn get_owner(env: Env) -> Result<Address, Error> {
        load_owner(&env)
    }
}

fn unit_price(env: &Env, offer: &Offer, phase: Phase) -> Result<i128, Error> {
    let oracle: Address = env
        .storage()
        .persistent()
        .get(&DataKey::Oracle)
        .ok_or(Error::NotInitialized)?;
    let oracle_client = PriceOracleClient::new(env, &oracle);
    match oracle_client.try_convert(&offer.currency, &list_price(phase, offer)) {
        Ok(Ok(price)) if price > 0 => Ok(price),
        // zero means the oracle has no rate for this currency
        Ok(Ok(_)) => Err(Error::NoConversionRate),
        Err(Ok(OracleError::Overflow)) => Err(Error::Overflow),
        _ => Err(Error::NoConversionRate),
    }
}

fn load_owner(env: &Env) -> Result<Address, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Owner)
        .ok_or(Error::NotInitialized)
}

fn load_payment_token(env: &Env) -> Result<Address, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::PaymentToken)
        .ok_or(Error::NotInitialized)
}

fn load_offer(env: &Env) -> Result<Offer, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Offer)
        .ok_or(Error::NotInitialized)
}

fn load_state(env: &Env) -> Result<SaleState, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::State)
        .ok_or(Error::NotInitialized)
}

fn load_holding(env: &Env, holder: &Address) -> Holding {
    env.storage()
        .persistent()
        .get(&DataKey::Holding(holder.clone()))
        .unwrap_or_default()
}
