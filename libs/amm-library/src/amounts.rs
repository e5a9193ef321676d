use crate::pairs::get_reserves;
use amm_math::{get_amount_in, get_amount_out};
use amm_types::AmmError;
use soroban_sdk::{vec, Address, Env, Vec};

/// Chained `get_amount_out` along `path`; element 0 is `amount_in`
pub fn get_amounts_out(
    env: &Env,
    factory: &Address,
    amount_in: i128,
    path: &Vec<Address>,
) -> Result<Vec<i128>, AmmError> {
    if path.len() < 2 {
        return Err(AmmError::InvalidPath);
    }

    let mut amounts = vec![env, amount_in];
    for i in 0..path.len() - 1 {
        let (reserve_in, reserve_out) =
            get_reserves(env, factory, &path.get_unchecked(i), &path.get_unchecked(i + 1))?;
        let next = get_amount_out(env, amounts.get_unchecked(i), reserve_in, reserve_out)?;
        amounts.push_back(next);
    }
    Ok(amounts)
}

/// Chained `get_amount_in` walking `path` backwards; the last element is
/// `amount_out`
pub fn get_amounts_in(
    env: &Env,
    factory: &Address,
    amount_out: i128,
    path: &Vec<Address>,
) -> Result<Vec<i128>, AmmError> {
    if path.len() < 2 {
        return Err(AmmError::InvalidPath);
    }

    let mut amounts = vec![env, amount_out];
    for i in (1..path.len()).rev() {
        let (reserve_in, reserve_out) =
            get_reserves(env, factory, &path.get_unchecked(i - 1), &path.get_unchecked(i))?;
        let next = get_amount_in(env, amounts.get_unchecked(0), reserve_in, reserve_out)?;
        amounts.push_front(next);
    }
    Ok(amounts)
}
