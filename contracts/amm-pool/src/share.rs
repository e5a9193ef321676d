//! Liquidity share accounting.
//!
//! The pool is its own share token. `MINIMUM_LIQUIDITY` shares minted at
//! genesis are added to the supply without being credited to anyone, so they
//! can never be burned.

use crate::storage::{
    get_allowance, get_balance, get_total_supply, set_allowance, set_balance, set_total_supply,
};
use amm_types::{AmmError, MINIMUM_LIQUIDITY};
use soroban_sdk::{Address, Env, Symbol};

pub fn mint(env: &Env, to: &Address, amount: i128) {
    set_balance(env, to, get_balance(env, to) + amount);
    set_total_supply(env, get_total_supply(env) + amount);
}

pub fn lock_minimum(env: &Env) {
    set_total_supply(env, get_total_supply(env) + MINIMUM_LIQUIDITY);
}

pub fn burn(env: &Env, from: &Address, amount: i128) -> Result<(), AmmError> {
    let balance = get_balance(env, from);
    if balance < amount {
        return Err(AmmError::InsufficientBalance);
    }
    set_balance(env, from, balance - amount);
    set_total_supply(env, get_total_supply(env) - amount);
    Ok(())
}

pub fn transfer(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), AmmError> {
    if amount < 0 {
        return Err(AmmError::NegativeAmount);
    }
    let from_balance = get_balance(env, from);
    if from_balance < amount {
        return Err(AmmError::InsufficientBalance);
    }
    set_balance(env, from, from_balance - amount);
    set_balance(env, to, get_balance(env, to) + amount);

    env.events().publish(
        (Symbol::new(env, "transfer"),),
        (from.clone(), to.clone(), amount),
    );
    Ok(())
}

pub fn approve(
    env: &Env,
    from: &Address,
    spender: &Address,
    amount: i128,
    expiration_ledger: u32,
) -> Result<(), AmmError> {
    if amount < 0 {
        return Err(AmmError::NegativeAmount);
    }
    // A live allowance must not already be expired
    if amount > 0 && expiration_ledger < env.ledger().sequence() {
        return Err(AmmError::InvalidExpiration);
    }
    set_allowance(env, from, spender, amount, expiration_ledger);

    env.events().publish(
        (Symbol::new(env, "approve"),),
        (from.clone(), spender.clone(), amount, expiration_ledger),
    );
    Ok(())
}

/// Consume `amount` of `spender`'s allowance over `from`; an i128::MAX
/// allowance is never decreased
pub fn spend_allowance(
    env: &Env,
    from: &Address,
    spender: &Address,
    amount: i128,
) -> Result<(), AmmError> {
    let allowance = get_allowance(env, from, spender);
    if allowance.amount < amount {
        return Err(AmmError::InsufficientAllowance);
    }
    if allowance.amount != i128::MAX {
        set_allowance(
            env,
            from,
            spender,
            allowance.amount - amount,
            allowance.expiration_ledger,
        );
    }
    Ok(())
}

pub fn allowance(env: &Env, from: &Address, spender: &Address) -> i128 {
    get_allowance(env, from, spender).amount
}

pub fn balance(env: &Env, id: &Address) -> i128 {
    get_balance(env, id)
}

pub fn total_supply(env: &Env) -> i128 {
    get_total_supply(env)
}
