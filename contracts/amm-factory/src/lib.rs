#![no_std]

use amm_types::{AmmError, PairRegistry};
use soroban_sdk::xdr::ToXdr;
use soroban_sdk::{
    contract, contractimpl, contracttype, Address, Bytes, BytesN, Env, IntoVal, Symbol, Vec,
};

#[contract]
pub struct AmmFactory;

/// Storage keys for Factory contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Admin address, allowed to set the protocol fee recipient
    Admin,
    /// Pool WASM hash for deployment
    PoolWasmHash,
    /// (token_0, token_1) -> pool address
    Pair(Address, Address),
    /// Total number of pairs created (counter for indexed storage)
    PairCount,
    /// Pool address at index (indexed storage to avoid unbounded Vec)
    PairAt(u32),
    /// Protocol fee recipient
    FeeTo,
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280;
const INSTANCE_TTL_EXTEND: u32 = 518400;
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

/// Page size cap for `get_pairs_paginated`
const MAX_PAGE: u32 = 50;

// ============================================================================
// SOROBAN RESOURCE LIMITS - Important constraints to be aware of:
// ============================================================================
// - Storage key size: 250 bytes max
// - Read entries per tx: 100 entries / 200 KB
// - Write entries per tx: 50 entries / 132 KB
//
// Design choices to stay within limits:
// - Pair list uses indexed storage (PairCount + PairAt) instead of Vec
//   to avoid a single unbounded ledger entry
// - Each pair address is stored separately (~56 bytes each)
// - Pagination is provided for querying pairs
// ============================================================================

#[contractimpl]
impl AmmFactory {
    /// Initialize factory with admin and pool WASM hash
    pub fn initialize(env: Env, admin: Address, pool_wasm_hash: BytesN<32>) -> Result<(), AmmError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(AmmError::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::PoolWasmHash, &pool_wasm_hash);
        env.storage().instance().set(&DataKey::PairCount, &0u32);

        extend_instance_ttl(&env);
        Ok(())
    }

    /// Turn the protocol fee on (`Some`) or off (`None`)
    pub fn set_fee_to(env: Env, fee_to: Option<Address>) -> Result<(), AmmError> {
        get_admin(&env)?.require_auth();

        match fee_to {
            Some(fee_to) => env.storage().instance().set(&DataKey::FeeTo, &fee_to),
            None => env.storage().instance().remove(&DataKey::FeeTo),
        }
        extend_instance_ttl(&env);
        Ok(())
    }

    /// Hand the admin role to another address
    pub fn set_admin(env: Env, new_admin: Address) -> Result<(), AmmError> {
        get_admin(&env)?.require_auth();
        env.storage().instance().set(&DataKey::Admin, &new_admin);
        extend_instance_ttl(&env);
        Ok(())
    }

    /// Get total number of pairs created
    pub fn all_pairs_length(env: Env) -> u32 {
        extend_instance_ttl(&env);
        pair_count(&env)
    }

    /// Get pair address at specific index
    pub fn get_pair_at(env: Env, index: u32) -> Option<Address> {
        env.storage().persistent().get(&DataKey::PairAt(index))
    }

    /// Get pairs with pagination
    /// Returns up to `limit` pairs starting from `start_index`
    /// Maximum limit is 50 to stay within Soroban's read entry limits
    pub fn get_pairs_paginated(env: Env, start_index: u32, limit: u32) -> Vec<Address> {
        let safe_limit = limit.min(MAX_PAGE);
        let end_index = start_index.saturating_add(safe_limit).min(pair_count(&env));

        let mut pairs: Vec<Address> = Vec::new(&env);
        for i in start_index..end_index {
            if let Some(pair) = env.storage().persistent().get(&DataKey::PairAt(i)) {
                pairs.push_back(pair);
            }
        }
        pairs
    }

    /// Get admin address
    pub fn get_admin(env: Env) -> Result<Address, AmmError> {
        extend_instance_ttl(&env);
        get_admin(&env)
    }

    /// Get pool WASM hash
    pub fn get_pool_wasm_hash(env: Env) -> Result<BytesN<32>, AmmError> {
        extend_instance_ttl(&env);
        env.storage()
            .instance()
            .get(&DataKey::PoolWasmHash)
            .ok_or(AmmError::NotInitialized)
    }
}

#[contractimpl]
impl PairRegistry for AmmFactory {
    /// Get pool address for token pair, in either order
    fn get_pair(env: Env, token_a: Address, token_b: Address) -> Option<Address> {
        let (token_0, token_1) = sort(token_a, token_b);
        env.storage()
            .persistent()
            .get(&DataKey::Pair(token_0, token_1))
    }

    /// Deploy and initialize the pool for a new pair
    /// Returns the pool contract address
    fn create_pair(env: Env, token_a: Address, token_b: Address) -> Result<Address, AmmError> {
        if token_a == token_b {
            return Err(AmmError::IdenticalAssets);
        }
        let (token_0, token_1) = sort(token_a, token_b);

        let pair_key = DataKey::Pair(token_0.clone(), token_1.clone());
        if env.storage().persistent().has(&pair_key) {
            return Err(AmmError::PairExists);
        }

        let pool_wasm_hash: BytesN<32> = env
            .storage()
            .instance()
            .get(&DataKey::PoolWasmHash)
            .ok_or(AmmError::NotInitialized)?;

        // One pool per pair, so the pair itself is the salt
        let pool_address = env
            .deployer()
            .with_current_contract(pair_salt(&env, &token_0, &token_1))
            .deploy_v2(pool_wasm_hash, ());

        env.invoke_contract::<()>(
            &pool_address,
            &Symbol::new(&env, "initialize"),
            (env.current_contract_address(), &token_0, &token_1).into_val(&env),
        );

        env.storage().persistent().set(&pair_key, &pool_address);
        extend_persistent_ttl(&env, &pair_key);

        let pair_count = pair_count(&env);
        let pair_at_key = DataKey::PairAt(pair_count);
        env.storage().persistent().set(&pair_at_key, &pool_address);
        extend_persistent_ttl(&env, &pair_at_key);
        env.storage()
            .instance()
            .set(&DataKey::PairCount, &(pair_count + 1));

        env.events().publish(
            (Symbol::new(&env, "pair_created"),),
            (token_0, token_1, pool_address.clone(), pair_count + 1),
        );

        extend_instance_ttl(&env);
        Ok(pool_address)
    }

    /// Get protocol fee recipient
    fn fee_to(env: Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::FeeTo)
    }
}

fn sort(token_a: Address, token_b: Address) -> (Address, Address) {
    if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    }
}

fn pair_salt(env: &Env, token_0: &Address, token_1: &Address) -> BytesN<32> {
    let mut preimage = Bytes::new(env);
    preimage.append(&token_0.clone().to_xdr(env));
    preimage.append(&token_1.clone().to_xdr(env));
    env.crypto().sha256(&preimage).to_bytes()
}

fn pair_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::PairCount)
        .unwrap_or(0)
}

fn get_admin(env: &Env) -> Result<Address, AmmError> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(AmmError::NotInitialized)
}

fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::{Address, BytesN, Env};

    fn setup_factory(env: &Env) -> (Address, AmmFactoryClient<'_>) {
        let admin = Address::generate(env);
        let contract_id = env.register(AmmFactory, ());
        let client = AmmFactoryClient::new(env, &contract_id);
        client.initialize(&admin, &BytesN::from_array(env, &[1u8; 32]));
        (admin, client)
    }

    // === Initialization Tests ===

    #[test]
    fn test_initialize_factory() {
        let env = Env::default();
        env.mock_all_auths();

        let admin = Address::generate(&env);
        let contract_id = env.register(AmmFactory, ());
        let client = AmmFactoryClient::new(&env, &contract_id);

        let pool_wasm_hash = BytesN::from_array(&env, &[1u8; 32]);
        client.initialize(&admin, &pool_wasm_hash);

        assert_eq!(client.get_admin(), admin);
        assert_eq!(client.get_pool_wasm_hash(), pool_wasm_hash);
        assert_eq!(client.all_pairs_length(), 0);
        assert_eq!(client.fee_to(), None);
    }

    #[test]
    fn test_initialize_twice_fails() {
        let env = Env::default();
        env.mock_all_auths();

        let (admin, client) = setup_factory(&env);
        let result = client.try_initialize(&admin, &BytesN::from_array(&env, &[2u8; 32]));
        assert_eq!(result, Err(Ok(AmmError::AlreadyInitialized)));
    }

    #[test]
    fn test_uninitialized_factory() {
        let env = Env::default();
        let contract_id = env.register(AmmFactory, ());
        let client = AmmFactoryClient::new(&env, &contract_id);

        assert_eq!(client.try_get_admin(), Err(Ok(AmmError::NotInitialized)));
        assert_eq!(client.try_set_fee_to(&None), Err(Ok(AmmError::NotInitialized)));
    }

    // === Pair Tests ===

    #[test]
    fn test_get_pair_not_exists() {
        let env = Env::default();
        env.mock_all_auths();

        let (_, client) = setup_factory(&env);
        let token_a = Address::generate(&env);
        let token_b = Address::generate(&env);

        assert_eq!(client.get_pair(&token_a, &token_b), None);
        assert_eq!(client.get_pair_at(&0), None);
    }

    #[test]
    fn test_create_pair_identical_tokens() {
        let env = Env::default();
        env.mock_all_auths();

        let (_, client) = setup_factory(&env);
        let token = Address::generate(&env);

        let result = client.try_create_pair(&token, &token);
        assert_eq!(result, Err(Ok(AmmError::IdenticalAssets)));
    }

    #[test]
    fn test_pagination_empty() {
        let env = Env::default();
        env.mock_all_auths();

        let (_, client) = setup_factory(&env);
        assert_eq!(client.get_pairs_paginated(&0, &10).len(), 0);
        assert_eq!(client.get_pairs_paginated(&u32::MAX, &u32::MAX).len(), 0);
    }

    #[test]
    fn test_pair_salt_depends_on_token_order() {
        let env = Env::default();
        let token_a = Address::generate(&env);
        let token_b = Address::generate(&env);
        let (token_0, token_1) = sort(token_a.clone(), token_b.clone());

        assert_eq!(sort(token_b, token_a), (token_0.clone(), token_1.clone()));
        assert_ne!(
            pair_salt(&env, &token_0, &token_1),
            pair_salt(&env, &token_1, &token_0)
        );
    }

    // === Fee Tests ===

    #[test]
    fn test_set_fee_to() {
        let env = Env::default();
        env.mock_all_auths();

        let (admin, client) = setup_factory(&env);
        let fee_to = Address::generate(&env);

        client.set_fee_to(&Some(fee_to.clone()));
        let auths = env.auths();
        assert_eq!(auths.len(), 1);
        assert_eq!(auths[0].0, admin);
        assert_eq!(client.fee_to(), Some(fee_to));

        client.set_fee_to(&None);
        assert_eq!(client.fee_to(), None);
    }

    #[test]
    #[should_panic]
    fn test_set_fee_to_requires_admin() {
        let env = Env::default();

        let admin = Address::generate(&env);
        let contract_id = env.register(AmmFactory, ());
        let client = AmmFactoryClient::new(&env, &contract_id);
        client
            .mock_all_auths()
            .initialize(&admin, &BytesN::from_array(&env, &[1u8; 32]));

        // No authorization mocked for the admin
        client.set_fee_to(&Some(Address::generate(&env)));
    }

    #[test]
    fn test_set_admin() {
        let env = Env::default();
        env.mock_all_auths();

        let (_, client) = setup_factory(&env);
        let new_admin = Address::generate(&env);

        client.set_admin(&new_admin);
        assert_eq!(client.get_admin(), new_admin);
    }
}
