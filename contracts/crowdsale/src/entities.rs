use soroban_sdk::{contracttype, Address, String, Symbol};

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    NotStarted,
    Active,
    Closed,
}

/// Verdict of the ICO phase. Written once, never reverts.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Undetermined,
    Succeeded,
    Failed,
}

/// Sale terms fixed at initialization. Prices are in the quote currency
/// and go through the rate oracle before being charged.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Offer {
    pub regular_price: i128,
    pub ico_price: i128,
    pub currency: Symbol,
    pub total_supply_cap: u64,
    /// Zero disables the ICO phase.
    pub ico_supply_cap: u64,
    pub soft_cap: u64,
    pub ico_start: u64,
    pub ico_end: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Book {
    pub title: String,
    pub url: String,
    pub name: String,
    pub symbol: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleState {
    pub units_sold_total: u64,
    pub units_sold_during_ico: u64,
    pub outcome: Outcome,
    pub closed_early: bool,
    pub escrow_outstanding: i128,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Holding {
    pub unit_balance: u64,
    pub escrowed: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleStatus {
    pub phase: Phase,
    pub outcome: Outcome,
    pub units_sold_total: u64,
    pub units_sold_during_ico: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PurchaseReceipt {
    pub units_purchased: u64,
    pub amount_charged: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Owner,
    PaymentToken,
    Oracle,
    Offer,
    Book,
    State,
    Holding(Address),
}
