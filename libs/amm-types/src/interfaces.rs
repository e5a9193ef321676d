use crate::AmmError;
use soroban_sdk::{contractclient, Address, Bytes, Env, Vec};

/// Registry mapping an unordered token pair to its pool.
///
/// Implemented by the factory; pools read `fee_to` from it and routers
/// resolve and lazily create pairs through it.
#[contractclient(name = "PairRegistryClient")]
pub trait PairRegistry {
    /// Pool for the pair, in either token order
    fn get_pair(env: Env, token_a: Address, token_b: Address) -> Option<Address>;

    /// Create and initialize the pool for a pair that has none yet
    fn create_pair(env: Env, token_a: Address, token_b: Address) -> Result<Address, AmmError>;

    /// Recipient of the protocol fee, `None` while the fee is off
    fn fee_to(env: Env) -> Option<Address>;
}

/// Borrower side of a flash swap.
///
/// A pool calls `amm_call` on the swap recipient after sending the requested
/// outputs and before checking the invariant. The callee must leave the pool
/// holding enough input for the check to pass. `pool` is the lending pool;
/// as the direct caller, `pool.require_auth()` succeeds without a signature.
#[contractclient(name = "FlashSwapCalleeClient")]
pub trait FlashSwapCallee {
    fn amm_call(
        env: Env,
        pool: Address,
        amount_0_out: i128,
        amount_1_out: i128,
        data: Bytes,
    ) -> Result<(), AmmError>;
}

/// Surface shared by every router revision.
#[contractclient(name = "RouterClient")]
pub trait RouterInterface {
    /// Registry the router resolves pairs through
    fn factory(env: Env) -> Result<Address, AmmError>;

    /// Router revision number
    fn version(env: Env) -> u32;

    /// Deposit both tokens at the current pool ratio and mint shares to `to`.
    ///
    /// # Returns
    /// (amount_a, amount_b, liquidity)
    fn add_liquidity(
        env: Env,
        token_a: Address,
        token_b: Address,
        amount_a_desired: i128,
        amount_b_desired: i128,
        amount_a_min: i128,
        amount_b_min: i128,
        to: Address,
        deadline: u64,
    ) -> Result<(i128, i128, i128), AmmError>;

    /// Redeem `liquidity` shares held by `to`
    fn remove_liquidity(
        env: Env,
        token_a: Address,
        token_b: Address,
        liquidity: i128,
        amount_a_min: i128,
        amount_b_min: i128,
        to: Address,
        deadline: u64,
    ) -> Result<(i128, i128), AmmError>;

    /// Same as `remove_liquidity`, but the shares are pulled through an
    /// allowance that `to` signs for in the same call
    fn remove_liquidity_with_permit(
        env: Env,
        token_a: Address,
        token_b: Address,
        liquidity: i128,
        amount_a_min: i128,
        amount_b_min: i128,
        to: Address,
        deadline: u64,
        approve_max: bool,
    ) -> Result<(i128, i128), AmmError>;

    fn swap_exact_input_for_output(
        env: Env,
        amount_in: i128,
        amount_out_min: i128,
        path: Vec<Address>,
        to: Address,
        deadline: u64,
    ) -> Result<Vec<i128>, AmmError>;

    fn swap_input_for_exact_output(
        env: Env,
        amount_out: i128,
        amount_in_max: i128,
        path: Vec<Address>,
        to: Address,
        deadline: u64,
    ) -> Result<Vec<i128>, AmmError>;

    fn quote(env: Env, amount_a: i128, reserve_a: i128, reserve_b: i128) -> Result<i128, AmmError>;

    fn get_amount_out(
        env: Env,
        amount_in: i128,
        reserve_in: i128,
        reserve_out: i128,
    ) -> Result<i128, AmmError>;

    fn get_amount_in(
        env: Env,
        amount_out: i128,
        reserve_in: i128,
        reserve_out: i128,
    ) -> Result<i128, AmmError>;

    fn get_amounts_out(env: Env, amount_in: i128, path: Vec<Address>) -> Result<Vec<i128>, AmmError>;

    fn get_amounts_in(env: Env, amount_out: i128, path: Vec<Address>) -> Result<Vec<i128>, AmmError>;
}
