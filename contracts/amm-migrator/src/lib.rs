#![no_std]

//! Moves a provider's position out of a legacy single-token exchange and
//! into the pair pool for `token` and the native asset.

use amm_library::ensure;
use amm_types::{AmmError, RouterClient};
use soroban_sdk::{
    contract, contractclient, contractimpl, contracttype, log, token, Address, Env,
};

/// Registry of legacy exchanges, one per token
#[contractclient(name = "LegacyFactoryClient")]
pub trait LegacyFactory {
    fn get_exchange(env: Env, token: Address) -> Option<Address>;
}

/// Legacy exchange pairing one token with the native asset. Its shares are
/// a token of their own.
#[contractclient(name = "LegacyExchangeClient")]
pub trait LegacyExchange {
    fn balance(env: Env, id: Address) -> i128;

    fn transfer(env: Env, from: Address, to: Address, amount: i128);

    /// Burn `amount` of `provider`'s shares and pay out both sides to
    /// `provider`.
    ///
    /// # Returns
    /// (amount_native, amount_token)
    fn remove_liquidity(
        env: Env,
        provider: Address,
        amount: i128,
        min_native: i128,
        min_tokens: i128,
        deadline: u64,
    ) -> (i128, i128);
}

#[contract]
pub struct AmmMigrator;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Config,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MigratorConfig {
    pub legacy_factory: Address,
    pub router: Address,
    /// Token contract of the native asset
    pub native: Address,
}

const INSTANCE_TTL_THRESHOLD: u32 = 17280;
const INSTANCE_TTL_EXTEND: u32 = 518400;

#[contractimpl]
impl AmmMigrator {
    pub fn initialize(
        env: Env,
        legacy_factory: Address,
        router: Address,
        native: Address,
    ) -> Result<(), AmmError> {
        if env.storage().instance().has(&DataKey::Config) {
            return Err(AmmError::AlreadyInitialized);
        }
        let config = MigratorConfig {
            legacy_factory,
            router,
            native,
        };
        env.storage().instance().set(&DataKey::Config, &config);
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
        Ok(())
    }

    pub fn get_config(env: Env) -> Result<MigratorConfig, AmmError> {
        get_config(&env)
    }

    /// Migrate all of `to`'s legacy shares for `token`.
    ///
    /// The withdrawn tokens are handed back to `to`, which then pays the
    /// router's `add_liquidity`; whatever the pool ratio leaves unused stays
    /// with `to`.
    ///
    /// # Returns
    /// (amount_token, amount_native, liquidity) - Deposited amounts and
    /// shares minted
    pub fn migrate(
        env: Env,
        token: Address,
        amount_token_min: i128,
        amount_native_min: i128,
        to: Address,
        deadline: u64,
    ) -> Result<(i128, i128, i128), AmmError> {
        to.require_auth();
        ensure(&env, deadline)?;
        let config = get_config(&env)?;

        let exchange = LegacyFactoryClient::new(&env, &config.legacy_factory)
            .get_exchange(&token)
            .ok_or(AmmError::LegacyExchangeNotFound)?;
        let exchange = LegacyExchangeClient::new(&env, &exchange);
        let migrator = env.current_contract_address();

        let legacy_liquidity = exchange.balance(&to);
        exchange.transfer(&to, &migrator, &legacy_liquidity);
        let (amount_native, amount_token) =
            exchange.remove_liquidity(&migrator, &legacy_liquidity, &1, &1, &deadline);

        token::Client::new(&env, &token).transfer(&migrator, &to, &amount_token);
        token::Client::new(&env, &config.native).transfer(&migrator, &to, &amount_native);

        let result = RouterClient::new(&env, &config.router).add_liquidity(
            &token,
            &config.native,
            &amount_token,
            &amount_native,
            &amount_token_min,
            &amount_native_min,
            &to,
            &deadline,
        );
        log!(&env, "migrate", to, legacy_liquidity, result.2);
        Ok(result)
    }
}

fn get_config(env: &Env) -> Result<MigratorConfig, AmmError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(AmmError::NotInitialized)
}
