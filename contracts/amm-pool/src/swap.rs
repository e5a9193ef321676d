use crate::invariants;
use crate::storage::{get_config, get_state, set_state};
use amm_math::{accumulate_prices, constant_product_holds};
use amm_types::{
    within_reserve_bounds, AmmError, FlashSwapCalleeClient, PoolConfig, PoolState,
};
use soroban_sdk::{log, token, Address, Bytes, Env, Symbol};

/// Current token balances held by the pool
pub fn balances(env: &Env, config: &PoolConfig) -> (i128, i128) {
    let pool = env.current_contract_address();
    (
        token::Client::new(env, &config.token_0).balance(&pool),
        token::Client::new(env, &config.token_1).balance(&pool),
    )
}

/// Record new reserves and advance the price accumulators with the old ones.
///
/// The caller persists `state`.
pub fn update(
    env: &Env,
    state: &mut PoolState,
    balance_0: i128,
    balance_1: i128,
) -> Result<(), AmmError> {
    if !within_reserve_bounds(balance_0) || !within_reserve_bounds(balance_1) {
        return Err(AmmError::Overflow);
    }

    let now = env.ledger().timestamp();
    let elapsed = now.saturating_sub(state.block_timestamp_last);
    let (price_0, price_1) = accumulate_prices(
        env,
        state.price_0_cumulative_last,
        state.price_1_cumulative_last,
        state.reserve_0,
        state.reserve_1,
        elapsed,
    );
    state.price_0_cumulative_last = price_0;
    state.price_1_cumulative_last = price_1;
    state.reserve_0 = balance_0;
    state.reserve_1 = balance_1;
    state.block_timestamp_last = now;

    env.events()
        .publish((Symbol::new(env, "sync"),), (balance_0, balance_1));
    Ok(())
}

/// Send out the requested amounts, run the borrower's callback when `data`
/// is non-empty, then require the fee-adjusted invariant on what came back.
pub fn execute_swap(
    env: &Env,
    amount_0_out: i128,
    amount_1_out: i128,
    to: Address,
    data: Bytes,
) -> Result<(), AmmError> {
    if amount_0_out < 0 || amount_1_out < 0 {
        return Err(AmmError::NegativeAmount);
    }
    if amount_0_out == 0 && amount_1_out == 0 {
        return Err(AmmError::InsufficientOutputAmount);
    }

    let config = get_config(env)?;
    let mut state = get_state(env)?;
    if amount_0_out >= state.reserve_0 || amount_1_out >= state.reserve_1 {
        return Err(AmmError::InsufficientLiquidity);
    }
    if to == config.token_0 || to == config.token_1 {
        return Err(AmmError::InvalidTo);
    }

    // Optimistic transfer
    let pool = env.current_contract_address();
    if amount_0_out > 0 {
        token::Client::new(env, &config.token_0).transfer(&pool, &to, &amount_0_out);
    }
    if amount_1_out > 0 {
        token::Client::new(env, &config.token_1).transfer(&pool, &to, &amount_1_out);
    }
    if !data.is_empty() {
        log!(env, "flash swap callback", to);
        FlashSwapCalleeClient::new(env, &to).amm_call(&pool, &amount_0_out, &amount_1_out, &data);
    }

    let (balance_0, balance_1) = balances(env, &config);
    let amount_0_in = input_amount(balance_0, state.reserve_0, amount_0_out);
    let amount_1_in = input_amount(balance_1, state.reserve_1, amount_1_out);
    if amount_0_in == 0 && amount_1_in == 0 {
        return Err(AmmError::InsufficientInputAmount);
    }

    if !constant_product_holds(
        env,
        balance_0,
        balance_1,
        amount_0_in,
        amount_1_in,
        state.reserve_0,
        state.reserve_1,
    ) {
        return Err(AmmError::InvariantViolated);
    }

    let before = state.clone();
    update(env, &mut state, balance_0, balance_1)?;
    debug_assert!(invariants::k_non_decreasing(env, &before, &state));
    set_state(env, &state);

    env.events().publish(
        (Symbol::new(env, "swap"),),
        (to, amount_0_in, amount_1_in, amount_0_out, amount_1_out),
    );
    log!(env, "swap", amount_0_in, amount_1_in, amount_0_out, amount_1_out);
    Ok(())
}

/// Whatever the pool holds beyond `reserve - amount_out` counts as input
fn input_amount(balance: i128, reserve: i128, amount_out: i128) -> i128 {
    let expected = reserve - amount_out;
    if balance > expected {
        balance - expected
    } else {
        0
    }
}

/// Force reserves to match balances
pub fn sync(env: &Env) -> Result<(), AmmError> {
    let config = get_config(env)?;
    let mut state = get_state(env)?;
    let (balance_0, balance_1) = balances(env, &config);
    update(env, &mut state, balance_0, balance_1)?;
    set_state(env, &state);
    Ok(())
}

/// Force balances to match reserves by sending the excess to `to`
pub fn skim(env: &Env, to: Address) -> Result<(), AmmError> {
    let config = get_config(env)?;
    let state = get_state(env)?;
    let (balance_0, balance_1) = balances(env, &config);
    let pool = env.current_contract_address();

    let excess_0 = balance_0 - state.reserve_0;
    if excess_0 > 0 {
        token::Client::new(env, &config.token_0).transfer(&pool, &to, &excess_0);
    }
    let excess_1 = balance_1 - state.reserve_1;
    if excess_1 > 0 {
        token::Client::new(env, &config.token_1).transfer(&pool, &to, &excess_1);
    }
    Ok(())
}
