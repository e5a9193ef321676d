use crate::full_math::{mul_div, to_i128};
use amm_types::{AmmError, FEE_DENOMINATOR, FEE_MULTIPLIER};
use soroban_sdk::{Env, U256};

/// Amount of B equal in value to `amount_a` at the reserve ratio
pub fn quote(env: &Env, amount_a: i128, reserve_a: i128, reserve_b: i128) -> Result<i128, AmmError> {
    if amount_a <= 0 {
        return Err(AmmError::InsufficientAmount);
    }
    if reserve_a <= 0 || reserve_b <= 0 {
        return Err(AmmError::InsufficientLiquidity);
    }
    mul_div(env, amount_a, reserve_b, reserve_a)
}

/// Maximum output for an exact input, after the 0.3% fee (rounds down)
pub fn get_amount_out(
    env: &Env,
    amount_in: i128,
    reserve_in: i128,
    reserve_out: i128,
) -> Result<i128, AmmError> {
    if amount_in <= 0 {
        return Err(AmmError::InsufficientInputAmount);
    }
    if reserve_in <= 0 || reserve_out <= 0 {
        return Err(AmmError::InsufficientLiquidity);
    }

    let amount_in_with_fee = wide(env, amount_in).mul(&wide(env, FEE_MULTIPLIER));
    let numerator = amount_in_with_fee.mul(&wide(env, reserve_out));
    let denominator = wide(env, reserve_in)
        .mul(&wide(env, FEE_DENOMINATOR))
        .add(&amount_in_with_fee);
    to_i128(&numerator.div(&denominator))
}

/// Minimum input for an exact output, after the 0.3% fee (rounds up)
pub fn get_amount_in(
    env: &Env,
    amount_out: i128,
    reserve_in: i128,
    reserve_out: i128,
) -> Result<i128, AmmError> {
    if amount_out <= 0 {
        return Err(AmmError::InsufficientOutputAmount);
    }
    if reserve_in <= 0 || reserve_out <= 0 || amount_out >= reserve_out {
        return Err(AmmError::InsufficientLiquidity);
    }

    let numerator = wide(env, reserve_in)
        .mul(&wide(env, amount_out))
        .mul(&wide(env, FEE_DENOMINATOR));
    let denominator = wide(env, reserve_out - amount_out).mul(&wide(env, FEE_MULTIPLIER));
    let mut amount_in = numerator.div(&denominator);
    if numerator.rem_euclid(&denominator) > U256::from_u32(env, 0) {
        amount_in = amount_in.add(&U256::from_u32(env, 1));
    }
    to_i128(&amount_in)
}

/// reserve_0 * reserve_1
pub fn k(env: &Env, reserve_0: i128, reserve_1: i128) -> U256 {
    wide(env, reserve_0).mul(&wide(env, reserve_1))
}

/// Fee-adjusted constant-product check run after every swap:
/// (b0*1000 - in0*3) * (b1*1000 - in1*3) >= r0 * r1 * 1000^2
pub fn constant_product_holds(
    env: &Env,
    balance_0: i128,
    balance_1: i128,
    amount_0_in: i128,
    amount_1_in: i128,
    reserve_0: i128,
    reserve_1: i128,
) -> bool {
    let fee = wide(env, FEE_DENOMINATOR - FEE_MULTIPLIER);
    let scale = wide(env, FEE_DENOMINATOR);

    let adjusted_0 = wide(env, balance_0).mul(&scale).sub(&wide(env, amount_0_in).mul(&fee));
    let adjusted_1 = wide(env, balance_1).mul(&scale).sub(&wide(env, amount_1_in).mul(&fee));

    adjusted_0.mul(&adjusted_1) >= k(env, reserve_0, reserve_1).mul(&scale).mul(&scale)
}

fn wide(env: &Env, value: i128) -> U256 {
    U256::from_u128(env, value.max(0) as u128)
}

#[cfg(test)]
mod tests {
    use super::*;

    const E18: i128 = 1_000_000_000_000_000_000;

    // === quote tests ===

    #[test]
    fn test_quote() {
        let env = Env::default();
        assert_eq!(quote(&env, 1, 100, 200), Ok(2));
        assert_eq!(quote(&env, 2, 200, 100), Ok(1));
        assert_eq!(quote(&env, E18, 5 * E18, 10 * E18), Ok(2 * E18));
    }

    #[test]
    fn test_quote_errors() {
        let env = Env::default();
        assert_eq!(quote(&env, 0, 100, 200), Err(AmmError::InsufficientAmount));
        assert_eq!(quote(&env, 1, 0, 200), Err(AmmError::InsufficientLiquidity));
        assert_eq!(quote(&env, 1, 100, 0), Err(AmmError::InsufficientLiquidity));
    }

    // === get_amount_out tests ===

    #[test]
    fn test_get_amount_out() {
        let env = Env::default();
        assert_eq!(get_amount_out(&env, 2, 100, 100), Ok(1));
        assert_eq!(
            get_amount_out(&env, E18, 5 * E18, 10 * E18),
            Ok(1_662_497_915_624_478_906)
        );
    }

    #[test]
    fn test_get_amount_out_errors() {
        let env = Env::default();
        assert_eq!(get_amount_out(&env, 0, 100, 100), Err(AmmError::InsufficientInputAmount));
        assert_eq!(get_amount_out(&env, 2, 0, 100), Err(AmmError::InsufficientLiquidity));
        assert_eq!(get_amount_out(&env, 2, 100, 0), Err(AmmError::InsufficientLiquidity));
    }

    // === get_amount_in tests ===

    #[test]
    fn test_get_amount_in() {
        let env = Env::default();
        assert_eq!(get_amount_in(&env, 1, 100, 100), Ok(2));
        assert_eq!(
            get_amount_in(&env, E18, 5 * E18, 10 * E18),
            Ok(557_227_237_267_357_629)
        );
    }

    #[test]
    fn test_get_amount_in_exact_division_is_not_bumped() {
        let env = Env::default();
        // 997 * 1000 * 1 / (1 * 997) = 1000 exactly
        assert_eq!(get_amount_in(&env, 1, 997, 2), Ok(1000));
    }

    #[test]
    fn test_get_amount_in_errors() {
        let env = Env::default();
        assert_eq!(get_amount_in(&env, 0, 100, 100), Err(AmmError::InsufficientOutputAmount));
        assert_eq!(get_amount_in(&env, 1, 0, 100), Err(AmmError::InsufficientLiquidity));
        assert_eq!(get_amount_in(&env, 100, 100, 100), Err(AmmError::InsufficientLiquidity));
    }

    #[test]
    fn test_amount_in_covers_amount_out() {
        let env = Env::default();
        let (r_in, r_out) = (5 * E18, 10 * E18);
        let amount_in = get_amount_in(&env, E18, r_in, r_out).unwrap();
        assert!(get_amount_out(&env, amount_in, r_in, r_out).unwrap() >= E18);
        assert!(get_amount_out(&env, amount_in - 1, r_in, r_out).unwrap() < E18);
    }

    // === invariant tests ===

    #[test]
    fn test_constant_product_accepts_quoted_swap() {
        let env = Env::default();
        let (r0, r1) = (5 * E18, 10 * E18);
        let out = get_amount_out(&env, E18, r0, r1).unwrap();
        assert!(constant_product_holds(&env, r0 + E18, r1 - out, E18, 0, r0, r1));
        assert!(constant_product_holds(&env, r0 + E18, r1 - out + 1, E18, 0, r0, r1));
    }

    #[test]
    fn test_constant_product_rejects_overdraw() {
        let env = Env::default();
        let (r0, r1) = (5 * E18, 10 * E18);
        let out = get_amount_out(&env, E18, r0, r1).unwrap();
        // One unit beyond the quoted output breaks the invariant
        assert!(!constant_product_holds(&env, r0 + E18, r1 - out - 1, E18, 0, r0, r1));
        assert!(!constant_product_holds(&env, r0 + E18 - 1, r1 - out, E18 - 1, 0, r0, r1));
    }

    #[test]
    fn test_constant_product_without_fee_fails() {
        let env = Env::default();
        // Fee-free constant product output is too generous once the fee applies
        let (r0, r1) = (1000 * E18, 1000 * E18);
        let fee_free_out = mul_div(&env, E18, r1, r0 + E18).unwrap();
        assert!(!constant_product_holds(&env, r0 + E18, r1 - fee_free_out, E18, 0, r0, r1));
    }
}
