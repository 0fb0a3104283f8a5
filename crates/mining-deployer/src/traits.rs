//! Trait definitions for the collaborators a deployment run talks to.
//!
//! Every method is one round trip: writes return once the transaction is
//! confirmed (or failed), reads return the decoded value. These traits
//! abstract the blockchain so the deployment components can be unit tested
//! with mocks.

use {
    crate::domain::{
        MiningProgramArgs,
        PoolState,
        RewardSlot,
        eth::{Address, B256, FeeTier, InitialPrice, TokenHandle, U256},
    },
    anyhow::Result,
};

/// Deploys and inspects fungible tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TokenFactory: Send + Sync {
    /// Deploys a new token whose initial supply is owned by the deployer.
    async fn create_token(&self, name: &str, symbol: &str, decimals: u8) -> Result<Address>;

    /// Reads the metadata of an already deployed token.
    async fn token(&self, address: Address) -> Result<TokenHandle>;
}

/// Moves and approves token balances on behalf of the loaded accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TokenLedger: Send + Sync {
    /// Transfers `amount` of `token` from `from` to `to`, returning the
    /// transaction hash.
    async fn transfer(&self, token: Address, from: Address, to: Address, amount: U256)
    -> Result<B256>;

    /// Sets `owner`'s allowance of `token` for `spender` to `amount`,
    /// returning the transaction hash.
    async fn approve(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<B256>;

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256>;

    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256>;
}

/// The concentrated liquidity exchange the mining program is built on.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Exchange: Send + Sync {
    /// Address of the position manager mining programs are bound to.
    fn position_manager(&self) -> Address;

    /// Creates the `(token0, token1, fee)` pool if it does not exist and
    /// initializes it at `price` if it is not initialized yet. Returns the
    /// pool address.
    async fn create_and_initialize_pool_if_necessary(
        &self,
        token0: Address,
        token1: Address,
        fee: FeeTier,
        price: InitialPrice,
    ) -> Result<Address>;

    /// Looks up the `(token0, token1, fee)` pool.
    async fn pool(&self, token0: Address, token1: Address, fee: FeeTier)
    -> Result<Option<Address>>;

    /// Reads the current price, tick and liquidity of a pool.
    async fn pool_state(&self, pool: Address) -> Result<PoolState>;
}

/// Deploys and inspects reward distribution contracts.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MiningFactory: Send + Sync {
    /// Deploys a mining program and returns its address.
    async fn deploy_mining_program(&self, args: MiningProgramArgs) -> Result<Address>;

    /// Number of reward slots a deployed program holds.
    async fn reward_slot_count(&self, program: Address) -> Result<usize>;

    /// Reads the reward slot at `index` of a deployed program.
    async fn reward_slot(&self, program: Address, index: usize) -> Result<RewardSlot>;
}
