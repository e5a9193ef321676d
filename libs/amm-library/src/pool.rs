use soroban_sdk::{Address, Bytes, Env, IntoVal, Symbol, Val, Vec};

// Thin wrappers over the pool's entry points. A pool error aborts the
// router invocation with the pool's error code.

pub fn pool_reserves(env: &Env, pool: &Address) -> (i128, i128, u64) {
    env.invoke_contract(pool, &Symbol::new(env, "get_reserves"), Vec::<Val>::new(env))
}

pub fn pool_mint(env: &Env, pool: &Address, to: &Address) -> i128 {
    env.invoke_contract(pool, &Symbol::new(env, "mint"), (to,).into_val(env))
}

pub fn pool_burn(env: &Env, pool: &Address, to: &Address) -> (i128, i128) {
    env.invoke_contract(pool, &Symbol::new(env, "burn"), (to,).into_val(env))
}

pub fn pool_swap(env: &Env, pool: &Address, amount_0_out: i128, amount_1_out: i128, to: &Address) {
    let data = Bytes::new(env);
    env.invoke_contract::<()>(
        pool,
        &Symbol::new(env, "swap"),
        (amount_0_out, amount_1_out, to, data).into_val(env),
    );
}

/// Move pool shares with `from`'s own authorization
pub fn share_transfer(env: &Env, pool: &Address, from: &Address, to: &Address, amount: i128) {
    env.invoke_contract::<()>(
        pool,
        &Symbol::new(env, "transfer"),
        (from, to, amount).into_val(env),
    );
}

/// Move pool shares through an allowance granted to the current contract
pub fn share_transfer_from(env: &Env, pool: &Address, from: &Address, to: &Address, amount: i128) {
    let spender = env.current_contract_address();
    env.invoke_contract::<()>(
        pool,
        &Symbol::new(env, "transfer_from"),
        (spender, from, to, amount).into_val(env),
    );
}

/// Grant the current contract an allowance over `from`'s shares, valid
/// through the current ledger
pub fn share_approve(env: &Env, pool: &Address, from: &Address, amount: i128) {
    let spender = env.current_contract_address();
    let expiration_ledger = env.ledger().sequence();
    env.invoke_contract::<()>(
        pool,
        &Symbol::new(env, "approve"),
        (from, spender, amount, expiration_ledger).into_val(env),
    );
}
