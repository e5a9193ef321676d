use crate::pool::pool_reserves;
use amm_types::{AmmError, PairRegistryClient};
use soroban_sdk::{Address, Env};

/// Order two tokens the way pools store them (token_0 < token_1)
pub fn sort_tokens(token_a: &Address, token_b: &Address) -> Result<(Address, Address), AmmError> {
    if token_a == token_b {
        return Err(AmmError::IdenticalAssets);
    }
    if token_a < token_b {
        Ok((token_a.clone(), token_b.clone()))
    } else {
        Ok((token_b.clone(), token_a.clone()))
    }
}

/// Registered pool for a pair
pub fn pair_for(
    env: &Env,
    factory: &Address,
    token_a: &Address,
    token_b: &Address,
) -> Result<Address, AmmError> {
    sort_tokens(token_a, token_b)?;
    PairRegistryClient::new(env, factory)
        .get_pair(token_a, token_b)
        .ok_or(AmmError::PairNotFound)
}

/// Reserves of the pair's pool, ordered as (reserve_a, reserve_b)
pub fn get_reserves(
    env: &Env,
    factory: &Address,
    token_a: &Address,
    token_b: &Address,
) -> Result<(i128, i128), AmmError> {
    let (token_0, _) = sort_tokens(token_a, token_b)?;
    let pool = pair_for(env, factory, token_a, token_b)?;
    let (reserve_0, reserve_1, _) = pool_reserves(env, &pool);
    if *token_a == token_0 {
        Ok((reserve_0, reserve_1))
    } else {
        Ok((reserve_1, reserve_0))
    }
}
