#![no_std]

mod invariants;
mod liquidity;
mod share;
mod storage;
mod swap;

use amm_types::{AmmError, PoolConfig, PoolState};
use soroban_sdk::{contract, contractimpl, Address, Bytes, Env, String, U256};
use storage::{get_config, get_state, is_initialized, set_config, set_state};

pub const SHARE_DECIMALS: u32 = 7;

#[contract]
pub struct AmmPool;

#[contractimpl]
impl AmmPool {
    /// Bind the pool to its pair. Called once by the registry that deploys it.
    pub fn initialize(
        env: Env,
        factory: Address,
        token_0: Address,
        token_1: Address,
    ) -> Result<(), AmmError> {
        factory.require_auth();

        if is_initialized(&env) {
            return Err(AmmError::AlreadyInitialized);
        }
        if token_0 == token_1 {
            return Err(AmmError::IdenticalAssets);
        }
        // Validate token ordering
        if token_0 > token_1 {
            return Err(AmmError::Forbidden);
        }

        set_config(
            &env,
            &PoolConfig {
                factory,
                token_0,
                token_1,
            },
        );
        set_state(&env, &PoolState::new(&env));
        Ok(())
    }

    /// Mint shares to `to` for tokens transferred in since the last update
    ///
    /// # Returns
    /// Shares minted
    pub fn mint(env: Env, to: Address) -> Result<i128, AmmError> {
        liquidity::mint(&env, to)
    }

    /// Burn the shares transferred to the pool itself
    ///
    /// # Returns
    /// (amount_0, amount_1) - Token amounts paid to `to`
    pub fn burn(env: Env, to: Address) -> Result<(i128, i128), AmmError> {
        liquidity::burn(&env, to)
    }

    /// Pay out the requested amounts to `to`
    ///
    /// Inputs are whatever the pool holds beyond its reserves once the
    /// outputs are gone. With non-empty `data`, `to` is called back through
    /// `FlashSwapCallee::amm_call` before the inputs are measured.
    pub fn swap(
        env: Env,
        amount_0_out: i128,
        amount_1_out: i128,
        to: Address,
        data: Bytes,
    ) -> Result<(), AmmError> {
        swap::execute_swap(&env, amount_0_out, amount_1_out, to, data)
    }

    /// Send token balances above reserves to `to`
    pub fn skim(env: Env, to: Address) -> Result<(), AmmError> {
        swap::skim(&env, to)
    }

    /// Set reserves to the current token balances
    pub fn sync(env: Env) -> Result<(), AmmError> {
        swap::sync(&env)
    }

    // === View Functions ===

    /// (reserve_0, reserve_1, block_timestamp_last)
    pub fn get_reserves(env: Env) -> Result<(i128, i128, u64), AmmError> {
        let state = get_state(&env)?;
        Ok((state.reserve_0, state.reserve_1, state.block_timestamp_last))
    }

    pub fn get_state(env: Env) -> Result<PoolState, AmmError> {
        get_state(&env)
    }

    pub fn get_config(env: Env) -> Result<PoolConfig, AmmError> {
        get_config(&env)
    }

    pub fn token_0(env: Env) -> Result<Address, AmmError> {
        Ok(get_config(&env)?.token_0)
    }

    pub fn token_1(env: Env) -> Result<Address, AmmError> {
        Ok(get_config(&env)?.token_1)
    }

    pub fn factory(env: Env) -> Result<Address, AmmError> {
        Ok(get_config(&env)?.factory)
    }

    pub fn k_last(env: Env) -> Result<U256, AmmError> {
        Ok(get_state(&env)?.k_last)
    }

    pub fn price_0_cumulative_last(env: Env) -> Result<u128, AmmError> {
        Ok(get_state(&env)?.price_0_cumulative_last)
    }

    pub fn price_1_cumulative_last(env: Env) -> Result<u128, AmmError> {
        Ok(get_state(&env)?.price_1_cumulative_last)
    }

    // === Share Token ===

    pub fn balance(env: Env, id: Address) -> i128 {
        share::balance(&env, &id)
    }

    pub fn total_supply(env: Env) -> i128 {
        share::total_supply(&env)
    }

    pub fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        share::allowance(&env, &from, &spender)
    }

    pub fn approve(
        env: Env,
        from: Address,
        spender: Address,
        amount: i128,
        expiration_ledger: u32,
    ) -> Result<(), AmmError> {
        from.require_auth();
        share::approve(&env, &from, &spender, amount, expiration_ledger)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), AmmError> {
        from.require_auth();
        share::transfer(&env, &from, &to, amount)
    }

    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), AmmError> {
        spender.require_auth();
        if amount < 0 {
            return Err(AmmError::NegativeAmount);
        }
        share::spend_allowance(&env, &from, &spender, amount)?;
        share::transfer(&env, &from, &to, amount)
    }

    pub fn decimals(_env: Env) -> u32 {
        SHARE_DECIMALS
    }

    pub fn name(env: Env) -> String {
        String::from_str(&env, "AMM Pool Share")
    }

    pub fn symbol(env: Env) -> String {
        String::from_str(&env, "AMM-LP")
    }
}
