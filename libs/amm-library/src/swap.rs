use crate::pairs::{pair_for, sort_tokens};
use crate::pool::pool_swap;
use amm_types::AmmError;
use soroban_sdk::{Address, Env, Vec};

/// Output amounts of one hop in pool token order
pub fn hop_outputs(
    input: &Address,
    output: &Address,
    amount_out: i128,
) -> Result<(i128, i128), AmmError> {
    let (token_0, _) = sort_tokens(input, output)?;
    if *input == token_0 {
        Ok((0, amount_out))
    } else {
        Ok((amount_out, 0))
    }
}

/// Run precomputed `amounts` through every pool on `path`.
///
/// The first pool must already hold `amounts[0]`. Each hop pays straight
/// into the next pool; the last one pays `to`.
pub fn swap_along_path(
    env: &Env,
    factory: &Address,
    amounts: &Vec<i128>,
    path: &Vec<Address>,
    to: &Address,
) -> Result<(), AmmError> {
    for i in 0..path.len() - 1 {
        let input = path.get_unchecked(i);
        let output = path.get_unchecked(i + 1);
        let (amount_0_out, amount_1_out) =
            hop_outputs(&input, &output, amounts.get_unchecked(i + 1))?;

        let recipient = if i < path.len() - 2 {
            pair_for(env, factory, &output, &path.get_unchecked(i + 2))?
        } else {
            to.clone()
        };

        let pool = pair_for(env, factory, &input, &output)?;
        pool_swap(env, &pool, amount_0_out, amount_1_out, &recipient);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amounts::get_amounts_out;
    use amm_testutils::AmmTest;
    use soroban_sdk::{token, vec};

    #[test]
    fn test_hop_outputs_orientation() {
        let t = AmmTest::setup();
        let (token_0, token_1) = sort_tokens(&t.token_a, &t.token_b).unwrap();
        assert_eq!(hop_outputs(&token_0, &token_1, 7), Ok((0, 7)));
        assert_eq!(hop_outputs(&token_1, &token_0, 7), Ok((7, 0)));
    }

    #[test]
    fn test_swap_along_two_hops() {
        let t = AmmTest::setup();
        t.provide(&t.token_a, &t.token_b, 1_000_000, 1_000_000);
        t.provide(&t.token_b, &t.token_c, 1_000_000, 1_000_000);
        let user = t.funded_user(10_000);
        let path = vec![&t.env, t.token_a.clone(), t.token_b.clone(), t.token_c.clone()];

        let amounts = get_amounts_out(&t.env, &t.registry, 10_000, &path).unwrap();
        let first = pair_for(&t.env, &t.registry, &t.token_a, &t.token_b).unwrap();
        token::Client::new(&t.env, &t.token_a).transfer(&user, &first, &10_000);
        swap_along_path(&t.env, &t.registry, &amounts, &path, &user).unwrap();

        assert_eq!(t.balance(&t.token_a, &user), 0);
        assert_eq!(t.balance(&t.token_b, &user), 10_000);
        assert_eq!(t.balance(&t.token_c, &user), 10_000 + amounts.get_unchecked(2));
    }
}
