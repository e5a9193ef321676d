#![no_std]

//! Flash-swap borrower that closes a price gap between pools.
//!
//! It borrows one token from a pool, sells it along a path of other pools
//! back into the pool's other token, repays the minimum the pool will
//! accept and sends the rest to a beneficiary. The lending pool cannot be
//! called while its swap is in flight, so its reserves are reconstructed
//! from token balances.

use amm_library::{get_amounts_out, pair_for, sort_tokens, swap_along_path};
use amm_math::get_amount_in;
use amm_types::{AmmError, FlashSwapCallee, PairRegistryClient};
use soroban_sdk::xdr::FromXdr;
use soroban_sdk::{contract, contractimpl, contracttype, log, token, Address, Bytes, Env, Vec};

/// Callback payload, XDR-encoded into the swap's `data`
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArbitrageParams {
    /// Borrowed token first, repayment token last. Every hop must be a pool
    /// other than the lender.
    pub path: Vec<Address>,
    /// Receives the surplus in the repayment token
    pub beneficiary: Address,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Factory,
}

const INSTANCE_TTL_THRESHOLD: u32 = 17280;
const INSTANCE_TTL_EXTEND: u32 = 518400;

#[contract]
pub struct AmmFlashArbitrage;

#[contractimpl]
impl AmmFlashArbitrage {
    pub fn initialize(env: Env, factory: Address) -> Result<(), AmmError> {
        if env.storage().instance().has(&DataKey::Factory) {
            return Err(AmmError::AlreadyInitialized);
        }
        env.storage().instance().set(&DataKey::Factory, &factory);
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
        Ok(())
    }

    pub fn factory(env: Env) -> Result<Address, AmmError> {
        get_factory(&env)
    }
}

#[contractimpl]
impl FlashSwapCallee for AmmFlashArbitrage {
    fn amm_call(
        env: Env,
        pool: Address,
        amount_0_out: i128,
        amount_1_out: i128,
        data: Bytes,
    ) -> Result<(), AmmError> {
        pool.require_auth();
        let factory = get_factory(&env)?;
        let params = decode_params(&env, &data)?;
        let path = &params.path;
        if path.len() < 3 {
            return Err(AmmError::InvalidPath);
        }
        let borrowed_token = path.get_unchecked(0);
        let repay_token = path.get_unchecked(path.len() - 1);

        // Only pools the registry knows may draw on this contract
        let lender = PairRegistryClient::new(&env, &factory).get_pair(&borrowed_token, &repay_token);
        if lender != Some(pool.clone()) {
            return Err(AmmError::Forbidden);
        }

        let (token_0, _) = sort_tokens(&borrowed_token, &repay_token)?;
        let borrowed = match (borrowed_token == token_0, amount_0_out, amount_1_out) {
            (true, amount, 0) | (false, 0, amount) if amount > 0 => amount,
            _ => return Err(AmmError::InvalidCallbackData),
        };

        // Reserves as of the swap's start: nothing else has touched the
        // lender since it paid out `borrowed`
        let borrowed_client = token::Client::new(&env, &borrowed_token);
        let repay_client = token::Client::new(&env, &repay_token);
        let reserve_borrowed = borrowed_client.balance(&pool) + borrowed;
        let reserve_repay = repay_client.balance(&pool);
        let repay = get_amount_in(&env, borrowed, reserve_repay, reserve_borrowed)?;

        let this = env.current_contract_address();
        let amounts = get_amounts_out(&env, &factory, borrowed, path)?;
        let first_pool = pair_for(&env, &factory, &borrowed_token, &path.get_unchecked(1))?;
        borrowed_client.transfer(&this, &first_pool, &borrowed);
        swap_along_path(&env, &factory, &amounts, path, &this)?;

        let received = amounts.get_unchecked(amounts.len() - 1);
        if received < repay {
            return Err(AmmError::InsufficientOutputAmount);
        }
        repay_client.transfer(&this, &pool, &repay);

        let profit = received - repay;
        if profit > 0 {
            repay_client.transfer(&this, &params.beneficiary, &profit);
        }
        log!(&env, "arbitrage", pool, borrowed, repay, profit);
        Ok(())
    }
}

/// Fixed XDR prefix of every encoded [`ArbitrageParams`]: a present
/// `ScVal::Map` of two entries whose first key is the symbol `beneficiary`
const PARAMS_PREFIX: [u8; 32] = [
    0, 0, 0, 17, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 15, 0, 0, 0, 11, b'b', b'e', b'n', b'e', b'f',
    b'i', b'c', b'i', b'a', b'r', b'y', 0,
];

/// The host traps on bytes it cannot decode, so payloads that do not start
/// like an encoded `ArbitrageParams` are turned away first
fn decode_params(env: &Env, data: &Bytes) -> Result<ArbitrageParams, AmmError> {
    let len = PARAMS_PREFIX.len() as u32;
    if data.len() <= len {
        return Err(AmmError::InvalidCallbackData);
    }
    let mut prefix = [0u8; 32];
    data.slice(0..len).copy_into_slice(&mut prefix);
    if prefix != PARAMS_PREFIX {
        return Err(AmmError::InvalidCallbackData);
    }
    ArbitrageParams::from_xdr(env, data).map_err(|_| AmmError::InvalidCallbackData)
}

fn get_factory(env: &Env) -> Result<Address, AmmError> {
    env.storage()
        .instance()
        .get(&DataKey::Factory)
        .ok_or(AmmError::NotInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use amm_math::get_amount_out;
    use amm_testutils::AmmTest;
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::xdr::ToXdr;
    use soroban_sdk::{map, vec};

    const E18: i128 = 1_000_000_000_000_000_000;

    struct Setup<'a> {
        arbitrage: AmmFlashArbitrageClient<'a>,
        lender: Address,
        beneficiary: Address,
    }

    /// Lender A/B at 1:1, while A->C->B pays about 1.5 B per A
    fn setup(t: &AmmTest) -> Setup<'_> {
        let lender = t.provide(&t.token_a, &t.token_b, 10 * E18, 10 * E18);
        t.provide(&t.token_a, &t.token_c, 10 * E18, 20 * E18);
        t.provide(&t.token_c, &t.token_b, 10 * E18, 10 * E18);

        let id = t.env.register(AmmFlashArbitrage, ());
        let arbitrage = AmmFlashArbitrageClient::new(&t.env, &id);
        arbitrage.initialize(&t.registry);
        Setup {
            arbitrage,
            lender,
            beneficiary: Address::generate(&t.env),
        }
    }

    fn params(t: &AmmTest, path: Vec<Address>, beneficiary: &Address) -> Bytes {
        ArbitrageParams {
            path,
            beneficiary: beneficiary.clone(),
        }
        .to_xdr(&t.env)
    }

    /// (amount_0_out, amount_1_out) borrowing `amount` of `token_a`
    fn borrow_a(t: &AmmTest, amount: i128) -> (i128, i128) {
        if t.token_a < t.token_b {
            (amount, 0)
        } else {
            (0, amount)
        }
    }

    // === Initialization ===

    #[test]
    fn test_initialize() {
        let t = AmmTest::setup();
        let s = setup(&t);
        assert_eq!(s.arbitrage.factory(), t.registry);
        assert_eq!(
            s.arbitrage.try_initialize(&t.registry),
            Err(Ok(AmmError::AlreadyInitialized))
        );
    }

    // === Flash Swap ===

    #[test]
    fn test_arbitrage_pays_surplus_to_beneficiary() {
        let t = AmmTest::setup();
        let s = setup(&t);
        let path = vec![&t.env, t.token_a.clone(), t.token_c.clone(), t.token_b.clone()];
        let data = params(&t, path, &s.beneficiary);

        let (amount_0_out, amount_1_out) = borrow_a(&t, E18);
        t.pool_client(&s.lender)
            .swap(&amount_0_out, &amount_1_out, &s.arbitrage.address, &data);

        let env = &t.env;
        let via_c = get_amount_out(env, E18, 10 * E18, 20 * E18).unwrap();
        let received = get_amount_out(env, via_c, 10 * E18, 10 * E18).unwrap();
        let repay = get_amount_in(env, E18, 10 * E18, 10 * E18).unwrap();
        assert!(received > repay);
        assert_eq!(t.balance(&t.token_b, &s.beneficiary), received - repay);

        // Nothing left behind in the borrower
        assert_eq!(t.balance(&t.token_a, &s.arbitrage.address), 0);
        assert_eq!(t.balance(&t.token_b, &s.arbitrage.address), 0);

        assert_eq!(t.balance(&t.token_a, &s.lender), 9 * E18);
        assert_eq!(t.balance(&t.token_b, &s.lender), 10 * E18 + repay);
    }

    #[test]
    fn test_unprofitable_arbitrage_rolls_back() {
        let t = AmmTest::setup();
        let s = setup(&t);
        // B->C->A runs against the gap
        let path = vec![&t.env, t.token_b.clone(), t.token_c.clone(), t.token_a.clone()];
        let data = params(&t, path, &s.beneficiary);

        let (amount_0_out, amount_1_out) = if t.token_b < t.token_a {
            (E18, 0)
        } else {
            (0, E18)
        };
        let result = t.pool_client(&s.lender).try_swap(
            &amount_0_out,
            &amount_1_out,
            &s.arbitrage.address,
            &data,
        );
        assert_eq!(result, Err(Ok(AmmError::InsufficientOutputAmount)));

        let (reserve_0, reserve_1, _) = t.pool_client(&s.lender).get_reserves();
        assert_eq!((reserve_0, reserve_1), (10 * E18, 10 * E18));
        assert_eq!(t.balance(&t.token_b, &s.lender), 10 * E18);
    }

    #[test]
    fn test_undecodable_data() {
        let t = AmmTest::setup();
        let s = setup(&t);
        let (amount_0_out, amount_1_out) = borrow_a(&t, E18);

        let garbage = [
            Bytes::from_slice(&t.env, &[1, 2, 3]),
            Bytes::from_slice(&t.env, &[0xff; 16]),
            42u32.to_xdr(&t.env),
            t.token_a.clone().to_xdr(&t.env),
            map![&t.env, (1u32, 2u32), (3u32, 4u32)].to_xdr(&t.env),
        ];
        for data in garbage.iter() {
            let result = t.pool_client(&s.lender).try_swap(
                &amount_0_out,
                &amount_1_out,
                &s.arbitrage.address,
                data,
            );
            assert_eq!(result, Err(Ok(AmmError::InvalidCallbackData)));
        }

        // Every attempt rolled back
        let (reserve_0, reserve_1, _) = t.pool_client(&s.lender).get_reserves();
        assert_eq!((reserve_0, reserve_1), (10 * E18, 10 * E18));
        assert_eq!(t.balance(&t.token_a, &s.arbitrage.address), 0);
    }

    #[test]
    fn test_params_prefix_matches_encoding() {
        let t = AmmTest::setup();
        let path = vec![&t.env, t.token_a.clone(), t.token_c.clone(), t.token_b.clone()];
        let data = params(&t, path.clone(), &t.provider);

        let mut prefix = [0u8; 32];
        data.slice(0..32).copy_into_slice(&mut prefix);
        assert_eq!(prefix, PARAMS_PREFIX);

        let decoded = decode_params(&t.env, &data).unwrap();
        assert_eq!(decoded.path, path);
        assert_eq!(decoded.beneficiary, t.provider);
    }

    #[test]
    fn test_amounts_must_match_borrowed_token() {
        let t = AmmTest::setup();
        let s = setup(&t);
        let path = vec![&t.env, t.token_a.clone(), t.token_c.clone(), t.token_b.clone()];
        let data = params(&t, path, &s.beneficiary);

        // Borrow B while the path starts with A
        let (amount_1_out, amount_0_out) = borrow_a(&t, E18);
        let result = t.pool_client(&s.lender).try_swap(
            &amount_0_out,
            &amount_1_out,
            &s.arbitrage.address,
            &data,
        );
        assert_eq!(result, Err(Ok(AmmError::InvalidCallbackData)));
    }

    #[test]
    fn test_path_must_avoid_lender() {
        let t = AmmTest::setup();
        let s = setup(&t);
        let path = vec![&t.env, t.token_a.clone(), t.token_b.clone()];
        let data = params(&t, path, &s.beneficiary);

        let (amount_0_out, amount_1_out) = borrow_a(&t, E18);
        let result = t.pool_client(&s.lender).try_swap(
            &amount_0_out,
            &amount_1_out,
            &s.arbitrage.address,
            &data,
        );
        assert_eq!(result, Err(Ok(AmmError::InvalidPath)));
    }

    #[test]
    fn test_unregistered_caller_forbidden() {
        let t = AmmTest::setup();
        let s = setup(&t);
        let path = vec![&t.env, t.token_a.clone(), t.token_c.clone(), t.token_b.clone()];
        let data = params(&t, path, &s.beneficiary);

        let impostor = Address::generate(&t.env);
        let result = s.arbitrage.try_amm_call(&impostor, &E18, &0, &data);
        assert_eq!(result, Err(Ok(AmmError::Forbidden)));
    }

    #[test]
    fn test_uninitialized() {
        let t = AmmTest::setup();
        let id = t.env.register(AmmFlashArbitrage, ());
        let client = AmmFlashArbitrageClient::new(&t.env, &id);
        let result = client.try_amm_call(&Address::generate(&t.env), &E18, &0, &Bytes::new(&t.env));
        assert_eq!(result, Err(Ok(AmmError::NotInitialized)));
    }
}
