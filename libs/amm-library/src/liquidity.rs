use crate::pairs::{get_reserves, pair_for, sort_tokens};
use crate::pool::{pool_burn, pool_mint, share_approve, share_transfer, share_transfer_from};
use amm_math::quote;
use amm_types::{AmmError, PairRegistryClient};
use soroban_sdk::{token, Address, Env};

/// Amounts to deposit so that the pool ratio is preserved.
///
/// Creates the pair on first use. An empty pool takes the desired amounts
/// as-is; otherwise one side is held at its desired amount and the other is
/// quoted from reserves, subject to the caller's minimums. Both desired
/// amounts must be positive.
#[allow(clippy::too_many_arguments)]
pub fn optimal_liquidity_amounts(
    env: &Env,
    factory: &Address,
    token_a: &Address,
    token_b: &Address,
    amount_a_desired: i128,
    amount_b_desired: i128,
    amount_a_min: i128,
    amount_b_min: i128,
) -> Result<(i128, i128), AmmError> {
    sort_tokens(token_a, token_b)?;
    if amount_a_desired <= 0 || amount_b_desired <= 0 {
        return Err(AmmError::InsufficientAmount);
    }
    let registry = PairRegistryClient::new(env, factory);
    if registry.get_pair(token_a, token_b).is_none() {
        registry.create_pair(token_a, token_b);
    }

    let (reserve_a, reserve_b) = get_reserves(env, factory, token_a, token_b)?;
    if reserve_a == 0 && reserve_b == 0 {
        return Ok((amount_a_desired, amount_b_desired));
    }

    let amount_b_optimal = quote(env, amount_a_desired, reserve_a, reserve_b)?;
    if amount_b_optimal <= amount_b_desired {
        if amount_b_optimal < amount_b_min {
            return Err(AmmError::InsufficientBAmount);
        }
        return Ok((amount_a_desired, amount_b_optimal));
    }

    let amount_a_optimal = quote(env, amount_b_desired, reserve_b, reserve_a)?;
    if amount_a_optimal > amount_a_desired || amount_a_optimal < amount_a_min {
        return Err(AmmError::InsufficientAAmount);
    }
    Ok((amount_a_optimal, amount_b_desired))
}

/// Deposit at the optimal ratio from `to` and mint the shares to `to`
#[allow(clippy::too_many_arguments)]
pub fn add_liquidity(
    env: &Env,
    factory: &Address,
    token_a: &Address,
    token_b: &Address,
    amount_a_desired: i128,
    amount_b_desired: i128,
    amount_a_min: i128,
    amount_b_min: i128,
    to: &Address,
) -> Result<(i128, i128, i128), AmmError> {
    let (amount_a, amount_b) = optimal_liquidity_amounts(
        env,
        factory,
        token_a,
        token_b,
        amount_a_desired,
        amount_b_desired,
        amount_a_min,
        amount_b_min,
    )?;

    let pool = pair_for(env, factory, token_a, token_b)?;
    token::Client::new(env, token_a).transfer(to, &pool, &amount_a);
    token::Client::new(env, token_b).transfer(to, &pool, &amount_b);
    let liquidity = pool_mint(env, &pool, to);

    Ok((amount_a, amount_b, liquidity))
}

/// Return `to`'s shares to the pool and burn them
#[allow(clippy::too_many_arguments)]
pub fn remove_liquidity(
    env: &Env,
    factory: &Address,
    token_a: &Address,
    token_b: &Address,
    liquidity: i128,
    amount_a_min: i128,
    amount_b_min: i128,
    to: &Address,
) -> Result<(i128, i128), AmmError> {
    let pool = pair_for(env, factory, token_a, token_b)?;
    share_transfer(env, &pool, to, &pool, liquidity);
    redeem(env, &pool, token_a, token_b, amount_a_min, amount_b_min, to)
}

/// `remove_liquidity` where the shares move through an allowance `to`
/// grants the current contract inside the same invocation
#[allow(clippy::too_many_arguments)]
pub fn remove_liquidity_with_permit(
    env: &Env,
    factory: &Address,
    token_a: &Address,
    token_b: &Address,
    liquidity: i128,
    amount_a_min: i128,
    amount_b_min: i128,
    to: &Address,
    approve_max: bool,
) -> Result<(i128, i128), AmmError> {
    let pool = pair_for(env, factory, token_a, token_b)?;
    let value = if approve_max { i128::MAX } else { liquidity };
    share_approve(env, &pool, to, value);
    share_transfer_from(env, &pool, to, &pool, liquidity);
    redeem(env, &pool, token_a, token_b, amount_a_min, amount_b_min, to)
}

fn redeem(
    env: &Env,
    pool: &Address,
    token_a: &Address,
    token_b: &Address,
    amount_a_min: i128,
    amount_b_min: i128,
    to: &Address,
) -> Result<(i128, i128), AmmError> {
    let (amount_0, amount_1) = pool_burn(env, pool, to);
    let (token_0, _) = sort_tokens(token_a, token_b)?;
    let (amount_a, amount_b) = if *token_a == token_0 {
        (amount_0, amount_1)
    } else {
        (amount_1, amount_0)
    };

    if amount_a < amount_a_min {
        return Err(AmmError::InsufficientAAmount);
    }
    if amount_b < amount_b_min {
        return Err(AmmError::InsufficientBAmount);
    }
    Ok((amount_a, amount_b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use amm_testutils::AmmTest;

    const E18: i128 = 1_000_000_000_000_000_000;

    #[test]
    fn test_optimal_amounts_empty_pool_creates_pair() {
        let t = AmmTest::setup();
        let amounts = optimal_liquidity_amounts(
            &t.env, &t.registry, &t.token_a, &t.token_b, 100, 400, 0, 0,
        );
        assert_eq!(amounts, Ok((100, 400)));
        assert!(pair_for(&t.env, &t.registry, &t.token_a, &t.token_b).is_ok());
    }

    #[test]
    fn test_optimal_amounts_rejects_non_positive_desired() {
        let t = AmmTest::setup();
        let negative = optimal_liquidity_amounts(
            &t.env, &t.registry, &t.token_a, &t.token_b, -5, 400, 0, 0,
        );
        assert_eq!(negative, Err(AmmError::InsufficientAmount));
        let zero = optimal_liquidity_amounts(
            &t.env, &t.registry, &t.token_a, &t.token_b, 100, 0, 0, 0,
        );
        assert_eq!(zero, Err(AmmError::InsufficientAmount));
        // Rejected before the pair is created
        assert_eq!(
            pair_for(&t.env, &t.registry, &t.token_a, &t.token_b),
            Err(AmmError::PairNotFound)
        );
    }

    #[test]
    fn test_optimal_amounts_keeps_a() {
        let t = AmmTest::setup();
        t.provide(&t.token_a, &t.token_b, 5 * E18, 10 * E18);

        let amounts = optimal_liquidity_amounts(
            &t.env, &t.registry, &t.token_a, &t.token_b, E18, 3 * E18, 0, 0,
        );
        assert_eq!(amounts, Ok((E18, 2 * E18)));
    }

    #[test]
    fn test_optimal_amounts_keeps_b() {
        let t = AmmTest::setup();
        t.provide(&t.token_a, &t.token_b, 5 * E18, 10 * E18);

        let amounts = optimal_liquidity_amounts(
            &t.env, &t.registry, &t.token_a, &t.token_b, 2 * E18, 2 * E18, 0, 0,
        );
        assert_eq!(amounts, Ok((E18, 2 * E18)));
    }

    #[test]
    fn test_optimal_amounts_minimums() {
        let t = AmmTest::setup();
        t.provide(&t.token_a, &t.token_b, 5 * E18, 10 * E18);

        let b_short = optimal_liquidity_amounts(
            &t.env, &t.registry, &t.token_a, &t.token_b, E18, 3 * E18, 0, 2 * E18 + 1,
        );
        assert_eq!(b_short, Err(AmmError::InsufficientBAmount));

        let a_short = optimal_liquidity_amounts(
            &t.env, &t.registry, &t.token_a, &t.token_b, 2 * E18, 2 * E18, E18 + 1, 0,
        );
        assert_eq!(a_short, Err(AmmError::InsufficientAAmount));
    }

    #[test]
    fn test_add_then_remove_liquidity() {
        let t = AmmTest::setup();
        let user = t.funded_user(10 * E18);

        let (a, b, liquidity) = add_liquidity(
            &t.env, &t.registry, &t.token_a, &t.token_b, E18, 4 * E18, 0, 0, &user,
        )
        .unwrap();
        assert_eq!((a, b), (E18, 4 * E18));
        assert_eq!(liquidity, 2 * E18 - 1000);

        let (a_out, b_out) = remove_liquidity(
            &t.env, &t.registry, &t.token_a, &t.token_b, liquidity, 0, 0, &user,
        )
        .unwrap();
        assert_eq!((a_out, b_out), (E18 - 500, 4 * E18 - 2000));
        assert_eq!(t.balance(&t.token_a, &user), 10 * E18 - 500);
    }
}
