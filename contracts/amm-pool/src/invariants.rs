// ============================================================================
// INVARIANTS MODULE
// ============================================================================
//
// Properties every reserve update must preserve. They are checked with
// debug_assert! at the mutation points, so builds with debug assertions
// (tests, the release-with-logs profile) trap on a violation.
//
// 1. RESERVE INVARIANTS
//    - Reserves fit in 112 bits and are never negative
//    - After a swap, reserve_0 * reserve_1 did not decrease
//
// 2. SHARE INVARIANTS
//    - Once minted, the supply never drops below the locked minimum
//
// ============================================================================

use amm_math::k;
use amm_types::{within_reserve_bounds, PoolState, MINIMUM_LIQUIDITY};
use soroban_sdk::Env;

/// Invariant: both reserves are storable
pub fn reserves_in_bounds(state: &PoolState) -> bool {
    within_reserve_bounds(state.reserve_0) && within_reserve_bounds(state.reserve_1)
}

/// Invariant: a swap never shrinks the product of reserves
///
/// Property:
///   new.reserve_0 * new.reserve_1 >= old.reserve_0 * old.reserve_1
///
/// The fee-adjusted check is strictly stronger; this is the form that
/// holds across any sequence of swaps.
pub fn k_non_decreasing(env: &Env, old: &PoolState, new: &PoolState) -> bool {
    k(env, new.reserve_0, new.reserve_1) >= k(env, old.reserve_0, old.reserve_1)
}

/// Invariant: the locked minimum stays in the supply
///
/// Property:
///   total_supply == 0 || total_supply >= MINIMUM_LIQUIDITY
pub fn supply_covers_locked_minimum(total_supply: i128) -> bool {
    total_supply == 0 || total_supply >= MINIMUM_LIQUIDITY
}
