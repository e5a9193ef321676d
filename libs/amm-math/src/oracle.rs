use soroban_sdk::{Env, U256};

/// Price of one unit of `base` in `quote`, UQ64.64, multiplied by the seconds
/// it was in effect, reduced mod 2^128.
///
/// Reserves are bounded to 112 bits, so the intermediate fits in 256 bits.
pub fn price_time_weighted(env: &Env, base_reserve: i128, quote_reserve: i128, elapsed: u64) -> u128 {
    if base_reserve <= 0 || quote_reserve <= 0 || elapsed == 0 {
        return 0;
    }
    let price = U256::from_u128(env, quote_reserve as u128)
        .shl(64)
        .div(&U256::from_u128(env, base_reserve as u128));
    let weighted = price.mul(&U256::from_u128(env, elapsed as u128));

    // 2^128
    let modulus = U256::from_parts(env, 0, 1, 0, 0);
    weighted.rem_euclid(&modulus).to_u128().unwrap_or_default()
}

/// Advance both cumulative prices for `elapsed` seconds at the given reserves
pub fn accumulate_prices(
    env: &Env,
    price_0_cumulative: u128,
    price_1_cumulative: u128,
    reserve_0: i128,
    reserve_1: i128,
    elapsed: u64,
) -> (u128, u128) {
    (
        price_0_cumulative.wrapping_add(price_time_weighted(env, reserve_0, reserve_1, elapsed)),
        price_1_cumulative.wrapping_add(price_time_weighted(env, reserve_1, reserve_0, elapsed)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q64: u128 = 1 << 64;

    #[test]
    fn test_price_is_uq64x64() {
        let env = Env::default();
        assert_eq!(price_time_weighted(&env, 100, 100, 1), Q64);
        assert_eq!(price_time_weighted(&env, 100, 200, 1), 2 * Q64);
        assert_eq!(price_time_weighted(&env, 200, 100, 1), Q64 / 2);
    }

    #[test]
    fn test_price_scales_with_elapsed() {
        let env = Env::default();
        assert_eq!(price_time_weighted(&env, 100, 300, 10), 30 * Q64);
    }

    #[test]
    fn test_no_accumulation_without_time_or_reserves() {
        let env = Env::default();
        assert_eq!(price_time_weighted(&env, 100, 300, 0), 0);
        assert_eq!(price_time_weighted(&env, 0, 300, 10), 0);
        assert_eq!(accumulate_prices(&env, 7, 9, 100, 100, 0), (7, 9));
    }

    #[test]
    fn test_accumulators_wrap() {
        let env = Env::default();
        let (p0, p1) = accumulate_prices(&env, u128::MAX, 0, 100, 100, 1);
        assert_eq!(p0, Q64 - 1);
        assert_eq!(p1, Q64);
    }

    #[test]
    fn test_weighted_price_reduced_mod_2_128() {
        let env = Env::default();
        // price 2^64 (in UQ64.64 that is 2^128), one second: exactly wraps to zero
        assert_eq!(price_time_weighted(&env, 1, 1i128 << 64, 1), 0);
        assert_eq!(price_time_weighted(&env, 1, (1i128 << 64) + 1, 1), Q64);
    }
}
