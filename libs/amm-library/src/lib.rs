#![no_std]

//! Routing helpers shared by every router revision.
//!
//! Everything here runs inside the calling router's invocation: pairs are
//! resolved through the registry, pools are driven with their low-level
//! primitives (`mint`, `burn`, `swap`) after the router has pushed input
//! tokens to them.

mod amounts;
mod liquidity;
mod pairs;
mod pool;
mod swap;

pub use amounts::*;
pub use liquidity::*;
pub use pairs::*;
pub use pool::*;
pub use swap::*;

use amm_types::AmmError;
use soroban_sdk::Env;

/// Reject the call once the ledger has moved past `deadline`
pub fn ensure(env: &Env, deadline: u64) -> Result<(), AmmError> {
    if env.ledger().timestamp() > deadline {
        return Err(AmmError::Expired);
    }
    Ok(())
}
