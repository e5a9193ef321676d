use crate::invariants;
use crate::share;
use crate::storage::{get_config, get_state, get_total_supply, set_state};
use crate::swap::{balances, update};
use amm_math::{k, mul_div, sqrt, to_i128};
use amm_types::{AmmError, PairRegistryClient, PoolConfig, PoolState, MINIMUM_LIQUIDITY};
use soroban_sdk::{log, token, Address, Env, Symbol, U256};

/// Mint shares for whatever was deposited since the last reserve update
pub fn mint(env: &Env, to: Address) -> Result<i128, AmmError> {
    let config = get_config(env)?;
    let mut state = get_state(env)?;
    let (balance_0, balance_1) = balances(env, &config);
    let amount_0 = balance_0 - state.reserve_0;
    let amount_1 = balance_1 - state.reserve_1;

    let fee_on = mint_fee(env, &config, &mut state)?;
    // Read after mint_fee, which may have grown the supply
    let total_supply = get_total_supply(env);

    let liquidity = if total_supply == 0 {
        let root = to_i128(&sqrt(env, &k(env, amount_0, amount_1)))?;
        let liquidity = root - MINIMUM_LIQUIDITY;
        if liquidity > 0 {
            share::lock_minimum(env);
        }
        liquidity
    } else {
        if state.reserve_0 == 0 || state.reserve_1 == 0 {
            return Err(AmmError::InsufficientLiquidityMinted);
        }
        let by_0 = mul_div(env, amount_0, total_supply, state.reserve_0)?;
        let by_1 = mul_div(env, amount_1, total_supply, state.reserve_1)?;
        by_0.min(by_1)
    };
    if liquidity <= 0 {
        return Err(AmmError::InsufficientLiquidityMinted);
    }
    share::mint(env, &to, liquidity);

    update(env, &mut state, balance_0, balance_1)?;
    if fee_on {
        state.k_last = k(env, state.reserve_0, state.reserve_1);
    }
    set_state(env, &state);
    debug_assert!(invariants::supply_covers_locked_minimum(get_total_supply(env)));

    env.events().publish(
        (Symbol::new(env, "mint"),),
        (to.clone(), amount_0, amount_1),
    );
    log!(env, "mint", to, liquidity);
    Ok(liquidity)
}

/// Burn the shares sitting on the pool's own balance and pay out the
/// proportional amounts to `to`
pub fn burn(env: &Env, to: Address) -> Result<(i128, i128), AmmError> {
    let config = get_config(env)?;
    let mut state = get_state(env)?;
    let pool = env.current_contract_address();
    let (balance_0, balance_1) = balances(env, &config);
    let liquidity = share::balance(env, &pool);

    let fee_on = mint_fee(env, &config, &mut state)?;
    let total_supply = get_total_supply(env);
    if liquidity <= 0 || total_supply == 0 {
        return Err(AmmError::InsufficientLiquidityBurned);
    }

    // Pro-rata over balances, so tokens donated since the last update go to
    // the redeemer
    let amount_0 = mul_div(env, liquidity, balance_0, total_supply)?;
    let amount_1 = mul_div(env, liquidity, balance_1, total_supply)?;
    if amount_0 <= 0 || amount_1 <= 0 {
        return Err(AmmError::InsufficientLiquidityBurned);
    }

    share::burn(env, &pool, liquidity)?;
    token::Client::new(env, &config.token_0).transfer(&pool, &to, &amount_0);
    token::Client::new(env, &config.token_1).transfer(&pool, &to, &amount_1);

    let (balance_0, balance_1) = balances(env, &config);
    update(env, &mut state, balance_0, balance_1)?;
    if fee_on {
        state.k_last = k(env, state.reserve_0, state.reserve_1);
    }
    set_state(env, &state);
    debug_assert!(invariants::supply_covers_locked_minimum(get_total_supply(env)));
    debug_assert!(invariants::reserves_in_bounds(&state));

    env.events().publish(
        (Symbol::new(env, "burn"),),
        (to.clone(), amount_0, amount_1),
    );
    log!(env, "burn", to, liquidity);
    Ok((amount_0, amount_1))
}

/// Mint the protocol's cut of fee growth to the registry's `fee_to`.
///
/// Growth of sqrt(k) since the last liquidity event is split 1/6 to the
/// protocol: S * (rk - rk_last) / (5 * rk + rk_last) new shares.
/// Returns whether the fee is on.
pub fn mint_fee(env: &Env, config: &PoolConfig, state: &mut PoolState) -> Result<bool, AmmError> {
    let fee_to = PairRegistryClient::new(env, &config.factory).fee_to();
    let zero = U256::from_u32(env, 0);

    let Some(fee_to) = fee_to else {
        if state.k_last != zero {
            state.k_last = zero;
        }
        return Ok(false);
    };

    if state.k_last != zero {
        let root_k = sqrt(env, &k(env, state.reserve_0, state.reserve_1));
        let root_k_last = sqrt(env, &state.k_last);
        if root_k > root_k_last {
            let total_supply = U256::from_u128(env, get_total_supply(env) as u128);
            let numerator = total_supply.mul(&root_k.sub(&root_k_last));
            let denominator = root_k.mul(&U256::from_u32(env, 5)).add(&root_k_last);
            let liquidity = to_i128(&numerator.div(&denominator))?;
            if liquidity > 0 {
                share::mint(env, &fee_to, liquidity);
                env.events().publish(
                    (Symbol::new(env, "protocol_fee"),),
                    (fee_to, liquidity),
                );
            }
        }
    }
    Ok(true)
}
