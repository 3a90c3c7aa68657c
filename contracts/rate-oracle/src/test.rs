use super::*;
use soroban_sdk::{symbol_short, testutils::Address as _, Address, Env};

const USD_RATE: i128 = 999_999_999_999_999_999;
const EUR_RATE: i128 = 834_500_000_000_000_000;

fn setup(env: &Env) -> (RateOracleClient<'_>, Address) {
    env.mock_all_auths();
    let owner = Address::generate(env);
    let contract_id = env.register(RateOracle, ());
    let client = RateOracleClient::new(env, &contract_id);
    client.initialize(&owner);
    (client, owner)
}

#[test]
fn records_owner() {
    let env = Env::default();
    let (client, owner) = setup(&env);

    assert_eq!(client.get_owner(), owner);
}

#[test]
fn initialize_only_once() {
    let env = Env::default();
    let (client, _) = setup(&env);

    let other = Address::generate(&env);
    assert_eq!(client.try_initialize(&other), Err(Ok(Error::AlreadyInitialized)));
}

#[test]
fn owner_updates_rate() {
    let env = Env::default();
    let (client, owner) = setup(&env);

    client.update_rate(&owner, &symbol_short!("USD"), &USD_RATE);
    client.update_rate(&owner, &symbol_short!("EUR"), &EUR_RATE);

    assert_eq!(client.rate(&symbol_short!("USD")), USD_RATE);
    assert_eq!(client.rate(&symbol_short!("EUR")), EUR_RATE);
}

#[test]
fn stranger_can_not_update_rate() {
    let env = Env::default();
    let (client, _) = setup(&env);
    let stranger = Address::generate(&env);

    assert_eq!(client.rate(&symbol_short!("USD")), 0);
    assert_eq!(
        client.try_update_rate(&stranger, &symbol_short!("USD"), &USD_RATE),
        Err(Ok(Error::Unauthorized))
    );
    assert_eq!(client.rate(&symbol_short!("USD")), 0);
}

#[test]
fn zero_rate_is_rejected_and_previous_rate_kept() {
    let env = Env::default();
    let (client, owner) = setup(&env);
    let code = symbol_short!("EUR");

    client.update_rate(&owner, &code, &EUR_RATE);
    assert_eq!(
        client.try_update_rate(&owner, &code, &0),
        Err(Ok(Error::InvalidRate))
    );
    assert_eq!(
        client.try_update_rate(&owner, &code, &-1),
        Err(Ok(Error::InvalidRate))
    );
    assert_eq!(client.rate(&code), EUR_RATE);
}

#[test]
fn rate_can_be_overwritten() {
    let env = Env::default();
    let (client, owner) = setup(&env);
    let code = symbol_short!("usd");

    client.update_rate(&owner, &code, &RATE_SCALE);
    client.update_rate(&owner, &code, &(2 * RATE_SCALE));

    assert_eq!(client.rate(&code), 2 * RATE_SCALE);
    assert_eq!(client.convert(&code, &7), 14);
}

#[test]
fn converts_with_fixed_point_rate() {
    let env = Env::default();
    let (client, owner) = setup(&env);

    client.update_rate(&owner, &symbol_short!("USD"), &USD_RATE);
    client.update_rate(&owner, &symbol_short!("EUR"), &EUR_RATE);

    // 4 USD at 0.999999999999999999
    assert_eq!(
        client.convert(&symbol_short!("USD"), &(4 * RATE_SCALE)),
        3_999_999_999_999_999_996
    );
    // 4.5 EUR at 0.8345
    assert_eq!(
        client.convert(&symbol_short!("EUR"), &4_500_000_000_000_000_000),
        3_755_250_000_000_000_000
    );
}

#[test]
fn converts_amounts_whose_product_exceeds_i128() {
    let env = Env::default();
    let (client, owner) = setup(&env);
    let code = symbol_short!("usd");

    // 4 USD at 50 PBL per USD, both with 18 decimals
    client.update_rate(&owner, &code, &(50 * RATE_SCALE));

    assert_eq!(client.convert(&code, &(4 * RATE_SCALE)), 200 * RATE_SCALE);
}

#[test]
fn conversion_truncates_toward_zero() {
    let env = Env::default();
    let (client, owner) = setup(&env);
    let code = symbol_short!("EUR");

    client.update_rate(&owner, &code, &EUR_RATE);

    // 3 * 0.8345 = 2.5035
    assert_eq!(client.convert(&code, &3), 2);
}

#[test]
fn unknown_currency_converts_to_zero() {
    let env = Env::default();
    let (client, _) = setup(&env);

    assert_eq!(client.convert(&symbol_short!("GBP"), &(10 * RATE_SCALE)), 0);
}

#[test]
fn convert_rejects_negative_amount_and_overflow() {
    let env = Env::default();
    let (client, owner) = setup(&env);
    let code = symbol_short!("usd");
    client.update_rate(&owner, &code, &(2 * RATE_SCALE));

    assert_eq!(client.try_convert(&code, &-1), Err(Ok(Error::InvalidAmount)));
    assert_eq!(client.try_convert(&code, &i128::MAX), Err(Ok(Error::Overflow)));
}

#[test]
fn update_before_initialize_fails() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(RateOracle, ());
    let client = RateOracleClient::new(&env, &contract_id);
    let caller = Address::generate(&env);

    assert_eq!(
        client.try_update_rate(&caller, &symbol_short!("usd"), &RATE_SCALE),
        Err(Ok(Error::NotInitialized))
    );
    assert_eq!(client.try_get_owner(), Err(Ok(Error::NotInitialized)));
}
