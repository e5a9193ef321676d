use amm_types::AmmError;
use soroban_sdk::{Env, U256};

/// Multiply and divide with 256-bit intermediate precision (rounds down)
/// Returns (a * b) / denominator
pub fn mul_div(env: &Env, a: i128, b: i128, denominator: i128) -> Result<i128, AmmError> {
    let (product, denom) = widen(env, a, b, denominator)?;
    to_i128(&product.div(&denom))
}

/// Multiply and divide with 256-bit intermediate precision (rounds up)
/// Returns ceil((a * b) / denominator)
pub fn mul_div_rounding_up(
    env: &Env,
    a: i128,
    b: i128,
    denominator: i128,
) -> Result<i128, AmmError> {
    let (product, denom) = widen(env, a, b, denominator)?;
    let quotient = product.div(&denom);
    if product.rem_euclid(&denom) > U256::from_u32(env, 0) {
        to_i128(&quotient.add(&U256::from_u32(env, 1)))
    } else {
        to_i128(&quotient)
    }
}

fn widen(env: &Env, a: i128, b: i128, denominator: i128) -> Result<(U256, U256), AmmError> {
    if denominator == 0 {
        panic!("Division by zero");
    }
    if a < 0 || b < 0 || denominator < 0 {
        return Err(AmmError::NegativeAmount);
    }
    let product = U256::from_u128(env, a as u128).mul(&U256::from_u128(env, b as u128));
    Ok((product, U256::from_u128(env, denominator as u128)))
}

/// Narrow a U256 back to a non-negative i128
pub fn to_i128(value: &U256) -> Result<i128, AmmError> {
    match value.to_u128() {
        Some(v) if v <= i128::MAX as u128 => Ok(v as i128),
        _ => Err(AmmError::Overflow),
    }
}

/// Floor of the square root (Newton iteration seeded above the root)
pub fn sqrt(env: &Env, value: &U256) -> U256 {
    let zero = U256::from_u32(env, 0);
    if *value == zero {
        return zero;
    }

    // 2^ceil(bits/2) is never below the root
    let mut x = U256::from_u32(env, 1).shl((bit_length(value) + 1) / 2);
    loop {
        let next = x.add(&value.div(&x)).shr(1);
        if next >= x {
            return x;
        }
        x = next;
    }
}

fn bit_length(value: &U256) -> u32 {
    let bytes = value.to_be_bytes();
    for i in 0..bytes.len() {
        let byte = bytes.get_unchecked(i);
        if byte != 0 {
            return (bytes.len() - i) * 8 - byte.leading_zeros();
        }
    }
    0
}
