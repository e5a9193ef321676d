use soroban_sdk::contracterror;

/// Errors shared by every contract in the workspace.
///
/// One enum keeps error codes stable when a failure raised inside a pool
/// surfaces through a router or migrator invocation. Codes start at 100 so
/// they never collide with the Stellar asset contract's own error codes.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum AmmError {
    AlreadyInitialized = 100,
    NotInitialized = 101,
    Forbidden = 102,
    /// Ledger time is past the caller's deadline
    Expired = 103,
    IdenticalAssets = 104,
    PairExists = 105,
    PairNotFound = 106,
    /// Swap path shorter than two assets
    InvalidPath = 107,
    InsufficientAmount = 108,
    InsufficientInputAmount = 109,
    InsufficientOutputAmount = 110,
    ExcessiveInputAmount = 111,
    InsufficientLiquidity = 112,
    InsufficientLiquidityMinted = 113,
    InsufficientLiquidityBurned = 114,
    InsufficientAAmount = 115,
    InsufficientBAmount = 116,
    /// Swap recipient is one of the pool's own tokens
    InvalidTo = 117,
    /// Constant-product check failed after a swap (K)
    InvariantViolated = 118,
    /// Balance does not fit in a reserve
    Overflow = 119,
    NegativeAmount = 120,
    InsufficientBalance = 121,
    InsufficientAllowance = 122,
    LegacyExchangeNotFound = 123,
    InvalidCallbackData = 124,
    /// Nonzero allowance whose expiration ledger has already passed
    InvalidExpiration = 125,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_clear_of_asset_contract_range() {
        assert_eq!(AmmError::AlreadyInitialized as u32, 100);
        assert_eq!(AmmError::InvalidPath as u32, 107);
        assert_eq!(AmmError::InsufficientInputAmount as u32, 109);
        assert_eq!(AmmError::InvalidExpiration as u32, 125);
    }
}
