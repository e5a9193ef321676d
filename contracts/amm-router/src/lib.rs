#![no_std]

use amm_library::{
    ensure, get_amounts_in, get_amounts_out, hop_outputs, pair_for, pool_reserves, pool_swap,
    sort_tokens, swap_along_path,
};
use amm_types::{AmmError, RouterInterface};
use soroban_sdk::{contract, contractimpl, contracttype, token, Address, Env, Vec};

/// Router revision
pub const VERSION: u32 = 2;

#[contract]
pub struct AmmRouter;

/// Storage keys
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Factory,
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280;
const INSTANCE_TTL_EXTEND: u32 = 518400;

#[contractimpl]
impl AmmRouter {
    /// Initialize router with factory address
    pub fn initialize(env: Env, factory: Address) -> Result<(), AmmError> {
        if env.storage().instance().has(&DataKey::Factory) {
            return Err(AmmError::AlreadyInitialized);
        }
        env.storage().instance().set(&DataKey::Factory, &factory);
        extend_instance_ttl(&env);
        Ok(())
    }

    /// Exact-input swap for tokens that take a cut on transfer.
    ///
    /// Each hop is priced from what its pool actually received, and the
    /// minimum is checked against what `to` actually received.
    ///
    /// # Returns
    /// Amount of the last token credited to `to`
    pub fn swap_exact_in_fee_on_transfer(
        env: Env,
        amount_in: i128,
        amount_out_min: i128,
        path: Vec<Address>,
        to: Address,
        deadline: u64,
    ) -> Result<i128, AmmError> {
        to.require_auth();
        ensure(&env, deadline)?;
        if path.len() < 2 {
            return Err(AmmError::InvalidPath);
        }
        let factory = get_factory(&env)?;

        let first_pool = pair_for(&env, &factory, &path.get_unchecked(0), &path.get_unchecked(1))?;
        token::Client::new(&env, &path.get_unchecked(0)).transfer(&to, &first_pool, &amount_in);

        let token_out = token::Client::new(&env, &path.get_unchecked(path.len() - 1));
        let balance_before = token_out.balance(&to);

        for i in 0..path.len() - 1 {
            let input = path.get_unchecked(i);
            let output = path.get_unchecked(i + 1);
            let pool = pair_for(&env, &factory, &input, &output)?;

            let (token_0, _) = sort_tokens(&input, &output)?;
            let (reserve_0, reserve_1, _) = pool_reserves(&env, &pool);
            let (reserve_in, reserve_out) = if input == token_0 {
                (reserve_0, reserve_1)
            } else {
                (reserve_1, reserve_0)
            };
            let received = token::Client::new(&env, &input).balance(&pool) - reserve_in;
            let amount_out = amm_math::get_amount_out(&env, received, reserve_in, reserve_out)?;

            let (amount_0_out, amount_1_out) = hop_outputs(&input, &output, amount_out)?;
            let recipient = if i < path.len() - 2 {
                pair_for(&env, &factory, &output, &path.get_unchecked(i + 2))?
            } else {
                to.clone()
            };
            pool_swap(&env, &pool, amount_0_out, amount_1_out, &recipient);
        }

        let amount_out = token_out.balance(&to) - balance_before;
        if amount_out < amount_out_min {
            return Err(AmmError::InsufficientOutputAmount);
        }
        Ok(amount_out)
    }
}

#[contractimpl]
impl RouterInterface for AmmRouter {
    /// Get factory address
    fn factory(env: Env) -> Result<Address, AmmError> {
        get_factory(&env)
    }

    fn version(_env: Env) -> u32 {
        VERSION
    }

    fn add_liquidity(
        env: Env,
        token_a: Address,
        token_b: Address,
        amount_a_desired: i128,
        amount_b_desired: i128,
        amount_a_min: i128,
        amount_b_min: i128,
        to: Address,
        deadline: u64,
    ) -> Result<(i128, i128, i128), AmmError> {
        to.require_auth();
        ensure(&env, deadline)?;
        let factory = get_factory(&env)?;
        amm_library::add_liquidity(
            &env,
            &factory,
            &token_a,
            &token_b,
            amount_a_desired,
            amount_b_desired,
            amount_a_min,
            amount_b_min,
            &to,
        )
    }

    fn remove_liquidity(
        env: Env,
        token_a: Address,
        token_b: Address,
        liquidity: i128,
        amount_a_min: i128,
        amount_b_min: i128,
        to: Address,
        deadline: u64,
    ) -> Result<(i128, i128), AmmError> {
        to.require_auth();
        ensure(&env, deadline)?;
        let factory = get_factory(&env)?;
        amm_library::remove_liquidity(
            &env,
            &factory,
            &token_a,
            &token_b,
            liquidity,
            amount_a_min,
            amount_b_min,
            &to,
        )
    }

    fn remove_liquidity_with_permit(
        env: Env,
        token_a: Address,
        token_b: Address,
        liquidity: i128,
        amount_a_min: i128,
        amount_b_min: i128,
        to: Address,
        deadline: u64,
        approve_max: bool,
    ) -> Result<(i128, i128), AmmError> {
        to.require_auth();
        ensure(&env, deadline)?;
        let factory = get_factory(&env)?;
        amm_library::remove_liquidity_with_permit(
            &env,
            &factory,
            &token_a,
            &token_b,
            liquidity,
            amount_a_min,
            amount_b_min,
            &to,
            approve_max,
        )
    }

    /// Swap exact input amount for maximum output along `path`
    fn swap_exact_input_for_output(
        env: Env,
        amount_in: i128,
        amount_out_min: i128,
        path: Vec<Address>,
        to: Address,
        deadline: u64,
    ) -> Result<Vec<i128>, AmmError> {
        to.require_auth();
        ensure(&env, deadline)?;
        let factory = get_factory(&env)?;

        let amounts = get_amounts_out(&env, &factory, amount_in, &path)?;
        if amounts.get_unchecked(amounts.len() - 1) < amount_out_min {
            return Err(AmmError::InsufficientOutputAmount);
        }
        pay_first_pool(&env, &factory, &path, &to, amounts.get_unchecked(0))?;
        swap_along_path(&env, &factory, &amounts, &path, &to)?;
        Ok(amounts)
    }

    /// Swap minimum input for exact output along `path`
    fn swap_input_for_exact_output(
        env: Env,
        amount_out: i128,
        amount_in_max: i128,
        path: Vec<Address>,
        to: Address,
        deadline: u64,
    ) -> Result<Vec<i128>, AmmError> {
        to.require_auth();
        ensure(&env, deadline)?;
        let factory = get_factory(&env)?;

        let amounts = get_amounts_in(&env, &factory, amount_out, &path)?;
        if amounts.get_unchecked(0) > amount_in_max {
            return Err(AmmError::ExcessiveInputAmount);
        }
        pay_first_pool(&env, &factory, &path, &to, amounts.get_unchecked(0))?;
        swap_along_path(&env, &factory, &amounts, &path, &to)?;
        Ok(amounts)
    }

    fn quote(env: Env, amount_a: i128, reserve_a: i128, reserve_b: i128) -> Result<i128, AmmError> {
        amm_math::quote(&env, amount_a, reserve_a, reserve_b)
    }

    fn get_amount_out(
        env: Env,
        amount_in: i128,
        reserve_in: i128,
        reserve_out: i128,
    ) -> Result<i128, AmmError> {
        amm_math::get_amount_out(&env, amount_in, reserve_in, reserve_out)
    }

    fn get_amount_in(
        env: Env,
        amount_out: i128,
        reserve_in: i128,
        reserve_out: i128,
    ) -> Result<i128, AmmError> {
        amm_math::get_amount_in(&env, amount_out, reserve_in, reserve_out)
    }

    fn get_amounts_out(env: Env, amount_in: i128, path: Vec<Address>) -> Result<Vec<i128>, AmmError> {
        get_amounts_out(&env, &get_factory(&env)?, amount_in, &path)
    }

    fn get_amounts_in(env: Env, amount_out: i128, path: Vec<Address>) -> Result<Vec<i128>, AmmError> {
        get_amounts_in(&env, &get_factory(&env)?, amount_out, &path)
    }
}

fn get_factory(env: &Env) -> Result<Address, AmmError> {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Factory)
        .ok_or(AmmError::NotInitialized)
}

fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

/// Move the swap input from `from` into the first pool on `path`
fn pay_first_pool(
    env: &Env,
    factory: &Address,
    path: &Vec<Address>,
    from: &Address,
    amount: i128,
) -> Result<(), AmmError> {
    let token_in = path.get_unchecked(0);
    let pool = pair_for(env, factory, &token_in, &path.get_unchecked(1))?;
    token::Client::new(env, &token_in).transfer(from, &pool, &amount);
    Ok(())
}
