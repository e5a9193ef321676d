//! Test fixtures shared by the contract crates.
//!
//! Native tests cannot deploy a pool from its wasm hash, so [`TestRegistry`]
//! stands in for the factory: pools are registered up front and handed out
//! one per `create_pair`, initialized exactly as the factory would.

use amm_pool::{AmmPool, AmmPoolClient};
use amm_types::{AmmError, PairRegistry, PairRegistryClient};
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{
    contract, contractimpl, contracttype, token, Address, Env, IntoVal, Symbol, Vec,
};

/// Spare pools registered by [`AmmTest::setup`]
pub const SPARE_POOLS: u32 = 4;

#[contracttype]
#[derive(Clone)]
enum RegistryKey {
    Spare,
    Pair(Address, Address),
    FeeTo,
}

#[contract]
pub struct TestRegistry;

#[contractimpl]
impl TestRegistry {
    /// Queue an uninitialized pool for the next `create_pair`
    pub fn add_spare_pool(env: Env, pool: Address) {
        let mut spare: Vec<Address> = env
            .storage()
            .instance()
            .get(&RegistryKey::Spare)
            .unwrap_or_else(|| Vec::new(&env));
        spare.push_back(pool);
        env.storage().instance().set(&RegistryKey::Spare, &spare);
    }

    pub fn set_fee_to(env: Env, fee_to: Option<Address>) {
        match fee_to {
            Some(fee_to) => env.storage().instance().set(&RegistryKey::FeeTo, &fee_to),
            None => env.storage().instance().remove(&RegistryKey::FeeTo),
        }
    }
}

#[contractimpl]
impl PairRegistry for TestRegistry {
    fn get_pair(env: Env, token_a: Address, token_b: Address) -> Option<Address> {
        let (token_0, token_1) = sorted(token_a, token_b);
        env.storage()
            .instance()
            .get(&RegistryKey::Pair(token_0, token_1))
    }

    fn create_pair(env: Env, token_a: Address, token_b: Address) -> Result<Address, AmmError> {
        if token_a == token_b {
            return Err(AmmError::IdenticalAssets);
        }
        let (token_0, token_1) = sorted(token_a, token_b);
        let key = RegistryKey::Pair(token_0.clone(), token_1.clone());
        if env.storage().instance().has(&key) {
            return Err(AmmError::PairExists);
        }

        let mut spare: Vec<Address> = env
            .storage()
            .instance()
            .get(&RegistryKey::Spare)
            .unwrap_or_else(|| Vec::new(&env));
        let pool = spare.pop_front().ok_or(AmmError::NotInitialized)?;
        env.storage().instance().set(&RegistryKey::Spare, &spare);

        env.invoke_contract::<()>(
            &pool,
            &Symbol::new(&env, "initialize"),
            (env.current_contract_address(), &token_0, &token_1).into_val(&env),
        );
        env.storage().instance().set(&key, &pool);
        Ok(pool)
    }

    fn fee_to(env: Env) -> Option<Address> {
        env.storage().instance().get(&RegistryKey::FeeTo)
    }
}

fn sorted(token_a: Address, token_b: Address) -> (Address, Address) {
    if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    }
}

/// Environment with three Stellar asset tokens, a registry and spare pools.
///
/// Auths are mocked for every call.
pub struct AmmTest {
    pub env: Env,
    pub registry: Address,
    pub token_a: Address,
    pub token_b: Address,
    pub token_c: Address,
    /// Owner of the shares minted by [`AmmTest::provide`]
    pub provider: Address,
}

impl AmmTest {
    pub fn setup() -> Self {
        let env = Env::default();
        env.mock_all_auths();

        let admin = Address::generate(&env);
        let token_a = env.register_stellar_asset_contract_v2(admin.clone()).address();
        let token_b = env.register_stellar_asset_contract_v2(admin.clone()).address();
        let token_c = env.register_stellar_asset_contract_v2(admin).address();

        let registry = env.register(TestRegistry, ());
        let provider = Address::generate(&env);
        let test = AmmTest {
            env,
            registry,
            token_a,
            token_b,
            token_c,
            provider,
        };
        for _ in 0..SPARE_POOLS {
            test.add_spare_pool();
        }
        test
    }

    /// Register one more pool for `create_pair` to hand out
    pub fn add_spare_pool(&self) -> Address {
        let pool = self.env.register(AmmPool, ());
        TestRegistryClient::new(&self.env, &self.registry).add_spare_pool(&pool);
        pool
    }

    pub fn registry_client(&self) -> PairRegistryClient<'_> {
        PairRegistryClient::new(&self.env, &self.registry)
    }

    pub fn pool_client(&self, pool: &Address) -> AmmPoolClient<'_> {
        AmmPoolClient::new(&self.env, pool)
    }

    /// Pool of a pair that must already exist
    pub fn pool(&self, token_x: &Address, token_y: &Address) -> Address {
        self.registry_client()
            .get_pair(token_x, token_y)
            .expect("pair not created")
    }

    pub fn set_fee_to(&self, fee_to: Option<Address>) {
        TestRegistryClient::new(&self.env, &self.registry).set_fee_to(&fee_to);
    }

    pub fn mint(&self, token: &Address, to: &Address, amount: i128) {
        token::StellarAssetClient::new(&self.env, token).mint(to, &amount);
    }

    pub fn balance(&self, token: &Address, id: &Address) -> i128 {
        token::Client::new(&self.env, token).balance(id)
    }

    /// New address holding `amount` of each of the three tokens
    pub fn funded_user(&self, amount: i128) -> Address {
        let user = Address::generate(&self.env);
        for token in [&self.token_a, &self.token_b, &self.token_c] {
            self.mint(token, &user, amount);
        }
        user
    }

    /// Seed the pair's pool with `amount_x`/`amount_y`, creating the pair if
    /// needed; shares go to `provider`
    pub fn provide(
        &self,
        token_x: &Address,
        token_y: &Address,
        amount_x: i128,
        amount_y: i128,
    ) -> Address {
        let registry = self.registry_client();
        let pool = match registry.get_pair(token_x, token_y) {
            Some(pool) => pool,
            None => registry.create_pair(token_x, token_y),
        };
        self.mint(token_x, &pool, amount_x);
        self.mint(token_y, &pool, amount_y);
        self.pool_client(&pool).mint(&self.provider);
        pool
    }
}
