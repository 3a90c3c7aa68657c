use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum Error {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidPrice = 4,
    InvalidCaps = 5,
    InvalidWindow = 6,
    SaleNotOpen = 7,
    NoConversionRate = 8,
    NothingToBuy = 9,
    AlreadyFinalized = 10,
    NotYetClosable = 11,
    RefundNotAvailable = 12,
    NothingToRefund = 13,
    LedgerCallFailed = 14,
    NothingToWithdraw = 15,
    Overflow = 16,
}
