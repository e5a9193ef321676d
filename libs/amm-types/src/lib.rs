#![no_std]

mod error;
mod interfaces;
mod pool;

pub use error::*;
pub use interfaces::*;
pub use pool::*;

/// Shares locked forever at a pool's first mint
pub const MINIMUM_LIQUIDITY: i128 = 1000;

/// Swap fee denominator (fee is expressed in thousandths)
pub const FEE_DENOMINATOR: i128 = 1000;

/// Share of a swap input that counts toward the invariant (0.3% fee)
pub const FEE_MULTIPLIER: i128 = 997;

/// Largest reserve a pool will record (2^112 - 1)
pub const MAX_RESERVE: i128 = (1i128 << 112) - 1;

/// Returns true if `amount` can be stored as a reserve
pub fn within_reserve_bounds(amount: i128) -> bool {
    (0..=MAX_RESERVE).contains(&amount)
}
