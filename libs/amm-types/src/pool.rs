use soroban_sdk::{contracttype, Address, Env, U256};

/// Pool configuration - immutable after initialization
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    /// Registry that created the pool
    pub factory: Address,
    /// Token0 address (lower address)
    pub token_0: Address,
    /// Token1 address (higher address)
    pub token_1: Address,
}

/// Reserve state - stored in Instance storage, rewritten on every mutation
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    pub reserve_0: i128,
    pub reserve_1: i128,
    /// Ledger timestamp of the last reserve update
    pub block_timestamp_last: u64,
    /// Sum of UQ64.64 price of token0 (in token1) times seconds, mod 2^128
    pub price_0_cumulative_last: u128,
    /// Sum of UQ64.64 price of token1 (in token0) times seconds, mod 2^128
    pub price_1_cumulative_last: u128,
    /// reserve_0 * reserve_1 after the last liquidity event, zero while the
    /// protocol fee is off
    pub k_last: U256,
}

impl PoolState {
    pub fn new(env: &Env) -> Self {
        Self {
            reserve_0: 0,
            reserve_1: 0,
            block_timestamp_last: 0,
            price_0_cumulative_last: 0,
            price_1_cumulative_last: 0,
            k_last: U256::from_u32(env, 0),
        }
    }
}
