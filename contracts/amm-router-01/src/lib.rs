#![no_std]

//! First router revision.
//!
//! Deprecated in favour of `amm-router`, kept because the migrator replays
//! legacy liquidity through it. Pricing and routing come from `amm-library`,
//! so both revisions quote identical amounts.

use amm_library::{ensure, get_amounts_in, get_amounts_out, pair_for, swap_along_path};
use amm_types::{AmmError, RouterInterface};
use soroban_sdk::{contract, contractimpl, contracttype, token, Address, Env, Vec};

pub const VERSION: u32 = 1;

#[contract]
pub struct AmmRouter01;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Factory,
}

const INSTANCE_TTL_THRESHOLD: u32 = 17280;
const INSTANCE_TTL_EXTEND: u32 = 518400;

#[contractimpl]
impl AmmRouter01 {
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
}

#[contractimpl]
impl RouterInterface for AmmRouter01 {
    fn factory(env: Env) -> Result<Address, AmmError> {
        factory(&env)
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
        let factory = authorize(&env, &to, deadline)?;
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
        let factory = authorize(&env, &to, deadline)?;
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
        let factory = authorize(&env, &to, deadline)?;
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

    fn swap_exact_input_for_output(
        env: Env,
        amount_in: i128,
        amount_out_min: i128,
        path: Vec<Address>,
        to: Address,
        deadline: u64,
    ) -> Result<Vec<i128>, AmmError> {
        let factory = authorize(&env, &to, deadline)?;
        let amounts = get_amounts_out(&env, &factory, amount_in, &path)?;
        if amounts.get_unchecked(amounts.len() - 1) < amount_out_min {
            return Err(AmmError::InsufficientOutputAmount);
        }
        execute(&env, &factory, &amounts, &path, &to)?;
        Ok(amounts)
    }

    fn swap_input_for_exact_output(
        env: Env,
        amount_out: i128,
        amount_in_max: i128,
        path: Vec<Address>,
        to: Address,
        deadline: u64,
    ) -> Result<Vec<i128>, AmmError> {
        let factory = authorize(&env, &to, deadline)?;
        let amounts = get_amounts_in(&env, &factory, amount_out, &path)?;
        if amounts.get_unchecked(0) > amount_in_max {
            return Err(AmmError::ExcessiveInputAmount);
        }
        execute(&env, &factory, &amounts, &path, &to)?;
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
        get_amounts_out(&env, &factory(&env)?, amount_in, &path)
    }

    fn get_amounts_in(env: Env, amount_out: i128, path: Vec<Address>) -> Result<Vec<i128>, AmmError> {
        get_amounts_in(&env, &factory(&env)?, amount_out, &path)
    }
}

fn factory(env: &Env) -> Result<Address, AmmError> {
    env.storage()
        .instance()
        .get(&DataKey::Factory)
        .ok_or(AmmError::NotInitialized)
}

/// Payer auth and deadline, checked ahead of any state change
fn authorize(env: &Env, to: &Address, deadline: u64) -> Result<Address, AmmError> {
    to.require_auth();
    ensure(env, deadline)?;
    factory(env)
}

/// Pay `amounts[0]` from `to` into the first pool and run the path
fn execute(
    env: &Env,
    factory: &Address,
    amounts: &Vec<i128>,
    path: &Vec<Address>,
    to: &Address,
) -> Result<(), AmmError> {
    let token_in = path.get_unchecked(0);
    let pool = pair_for(env, factory, &token_in, &path.get_unchecked(1))?;
    token::Client::new(env, &token_in).transfer(to, &pool, &amounts.get_unchecked(0));
    swap_along_path(env, factory, amounts, path, to)
}
