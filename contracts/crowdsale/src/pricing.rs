use crate::entities::*;
use crate::errors::*;

/// Share of every ICO payment that is held for refund, in percent. The rest
/// is kept by the sale even if the offer fails.
pub const ESCROW_RATE_PERCENT: i128 = 90;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Fill {
    pub units: u64,
    pub cost: i128,
    pub escrow: i128,
}

pub fn validate_offer(offer: &Offer) -> Result<(), Error> {
    if offer.regular_price <= 0 || offer.ico_price <= 0 {
        return Err(Error::InvalidPrice);
    }
    if offer.total_supply_cap == 0
        || offer.soft_cap > offer.ico_supply_cap
        || offer.ico_supply_cap > offer.total_supply_cap
    {
        return Err(Error::InvalidCaps);
    }
    if offer.ico_supply_cap > 0 && offer.ico_start > offer.ico_end {
        return Err(Error::InvalidWindow);
    }
    Ok(())
}

/// State a freshly initialized sale starts in. Without an ICO there is
/// nothing to decide, so the regular sale is open right away.
pub fn initial_state(offer: &Offer) -> SaleState {
    let outcome = if offer.ico_supply_cap == 0 {
        Outcome::Succeeded
    } else {
        Outcome::Undetermined
    };
    SaleState {
        units_sold_total: 0,
        units_sold_during_ico: 0,
        outcome,
        closed_early: false,
        escrow_outstanding: 0,
    }
}

/// Phase at ledger time `now`. Hard cap and a decided outcome close the
/// ICO regardless of the clock.
pub fn phase_at(now: u64, offer: &Offer, state: &SaleState) -> Phase {
    if offer.ico_supply_cap == 0 {
        return Phase::Closed;
    }
    if state.closed_early || state.outcome != Outcome::Undetermined {
        return Phase::Closed;
    }
    if now < offer.ico_start {
        Phase::NotStarted
    } else if now <= offer.ico_end {
        Phase::Active
    } else {
        Phase::Closed
    }
}

/// Sales run while the ICO is active, and after it only once it succeeded.
pub fn ensure_open(phase: Phase, state: &SaleState) -> Result<(), Error> {
    match phase {
        Phase::Active => Ok(()),
        Phase::Closed if state.outcome == Outcome::Succeeded => Ok(()),
        _ => Err(Error::SaleNotOpen),
    }
}

pub fn list_price(phase: Phase, offer: &Offer) -> i128 {
    if phase == Phase::Active {
        offer.ico_price
    } else {
        offer.regular_price
    }
}

pub fn remaining_cap(phase: Phase, offer: &Offer, state: &SaleState) -> u64 {
    let total_left = offer.total_supply_cap.saturating_sub(state.units_sold_total);
    if phase == Phase::Active {
        let ico_left = offer
            .ico_supply_cap
            .saturating_sub(state.units_sold_during_ico);
        ico_left.min(total_left)
    } else {
        total_left
    }
}

pub fn escrow_share(cost: i128) -> Result<i128, Error> {
    cost.checked_mul(ESCROW_RATE_PERCENT)
        .map(|scaled| scaled / 100)
        .ok_or(Error::Overflow)
}

/// Largest purchase `allowance` pays for at `unit_price` within the
/// remaining cap. The cost never exceeds the allowance.
pub fn plan_fill(
    phase: Phase,
    offer: &Offer,
    state: &SaleState,
    allowance: i128,
    unit_price: i128,
) -> Result<Fill, Error> {
    if unit_price <= 0 {
        return Err(Error::NoConversionRate);
    }
    let affordable = if allowance > 0 { allowance / unit_price } else { 0 };
    let remaining = remaining_cap(phase, offer, state);
    let units = if affordable < remaining as i128 {
        affordable as u64
    } else {
        remaining
    };
    if units == 0 {
        return Err(Error::NothingToBuy);
    }

    let cost = (units as i128)
        .checked_mul(unit_price)
        .ok_or(Error::Overflow)?;
    let escrow = if phase == Phase::Active {
        escrow_share(cost)?
    } else {
        0
    };
    Ok(Fill { units, cost, escrow })
}

pub fn settle_outcome(offer: &Offer, state: &SaleState) -> Outcome {
    if state.units_sold_during_ico >= offer.soft_cap {
        Outcome::Succeeded
    } else {
        Outcome::Failed
    }
}
