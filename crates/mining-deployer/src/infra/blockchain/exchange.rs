use {
    super::Chain,
    crate::{
        domain::{
            PoolState,
            eth::{Address, FeeTier, InitialPrice},
        },
        traits::Exchange,
    },
    anyhow::{Context, Result},
    contracts::alloy::{
        NonfungiblePositionManager,
        SwapRouter,
        TestToken,
        UniswapV3Factory,
        UniswapV3Pool,
    },
    ethrpc::alloy::errors::ContractResultExt,
    serde::Serialize,
};

/// Contracts of a Uniswap V3 deployment.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeAddresses {
    pub weth: Address,
    pub factory: Address,
    /// Only known when the exchange was deployed by this run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub router: Option<Address>,
    pub position_manager: Address,
}

/// A Uniswap V3 deployment, reached through its position manager.
pub struct UniswapV3 {
    chain: Chain,
    addresses: ExchangeAddresses,
    factory: UniswapV3Factory::Instance,
    position_manager: NonfungiblePositionManager::Instance,
}

impl UniswapV3 {
    /// Attaches to an exchange that is already deployed. The factory and
    /// wrapped native token are read from the position manager.
    pub async fn attach(chain: Chain, position_manager: Address) -> Result<Self> {
        let manager =
            NonfungiblePositionManager::Instance::new(position_manager, chain.web3().alloy.clone());
        let factory = manager.factory().call().await.call_context("factory")?;
        let weth = manager.WETH9().call().await.call_context("WETH9")?;
        tracing::info!(?position_manager, ?factory, "attached to exchange");
        Ok(Self::new(
            chain,
            ExchangeAddresses {
                weth,
                factory,
                router: None,
                position_manager,
            },
        ))
    }

    /// Deploys a fresh exchange: a stand-in for the wrapped native token, the
    /// factory, the swap router and the position manager.
    pub async fn deploy(chain: Chain, token_descriptor: Address) -> Result<Self> {
        let weth = chain
            .deploy(
                "TestToken",
                &TestToken::TestToken::constructorCall {
                    name: "weth".to_owned(),
                    symbol: "weth".to_owned(),
                    decimals: 18,
                },
            )
            .await
            .context("failed to deploy wrapped native token")?;
        let factory = chain
            .deploy("UniswapV3Factory", &UniswapV3Factory::UniswapV3Factory::constructorCall {})
            .await?;
        let router = chain
            .deploy(
                "SwapRouter",
                &SwapRouter::SwapRouter::constructorCall {
                    factory,
                    WETH9: weth,
                },
            )
            .await?;
        let position_manager = chain
            .deploy(
                "NonfungiblePositionManager",
                &NonfungiblePositionManager::NonfungiblePositionManager::constructorCall {
                    factory,
                    WETH9: weth,
                    tokenDescriptor: token_descriptor,
                },
            )
            .await?;
        let addresses = ExchangeAddresses {
            weth,
            factory,
            router: Some(router),
            position_manager,
        };
        tracing::info!(?addresses, "deployed exchange");
        Ok(Self::new(chain, addresses))
    }

    fn new(chain: Chain, addresses: ExchangeAddresses) -> Self {
        let provider = chain.web3().alloy.clone();
        Self {
            factory: UniswapV3Factory::Instance::new(addresses.factory, provider.clone()),
            position_manager: NonfungiblePositionManager::Instance::new(
                addresses.position_manager,
                provider,
            ),
            chain,
            addresses,
        }
    }

    pub fn addresses(&self) -> ExchangeAddresses {
        self.addresses
    }

    /// Lets `operator` move all of `owner`'s liquidity positions and reports
    /// whether the position manager now considers it approved.
    pub async fn approve_operator(&self, owner: Address, operator: Address) -> Result<bool> {
        let tx = self
            .position_manager
            .setApprovalForAll(operator, true)
            .from(owner)
            .into_transaction_request();
        self.chain.submit(tx, "setApprovalForAll").await?;
        self.position_manager
            .isApprovedForAll(owner, operator)
            .call()
            .await
            .call_context("isApprovedForAll")
    }
}

#[async_trait::async_trait]
impl Exchange for UniswapV3 {
    fn position_manager(&self) -> Address {
        self.addresses.position_manager
    }

    async fn create_and_initialize_pool_if_necessary(
        &self,
        token0: Address,
        token1: Address,
        fee: FeeTier,
        price: InitialPrice,
    ) -> Result<Address> {
        let tx = self
            .position_manager
            .createAndInitializePoolIfNecessary(token0, token1, fee.to_u24(), price.0)
            .from(self.chain.deployer())
            .into_transaction_request();
        self.chain
            .submit(tx, "createAndInitializePoolIfNecessary")
            .await?;
        // The created pool is only part of the call's return data, which a
        // receipt does not carry.
        self.pool(token0, token1, fee)
            .await?
            .context("pool missing after creation")
    }

    async fn pool(
        &self,
        token0: Address,
        token1: Address,
        fee: FeeTier,
    ) -> Result<Option<Address>> {
        let pool = self
            .factory
            .getPool(token0, token1, fee.to_u24())
            .call()
            .await
            .call_context("getPool")?;
        Ok((!pool.is_zero()).then_some(pool))
    }

    async fn pool_state(&self, pool: Address) -> Result<PoolState> {
        let pool = UniswapV3Pool::Instance::new(pool, self.chain.web3().alloy.clone());
        let slot0 = pool.slot0().call().await.call_context("slot0")?;
        let liquidity = pool.liquidity().call().await.call_context("liquidity")?;
        Ok(PoolState {
            sqrt_price_x96: slot0.sqrtPriceX96,
            tick: slot0.tick.as_i32(),
            observation_index: slot0.observationIndex,
            observation_cardinality: slot0.observationCardinality,
            observation_cardinality_next: slot0.observationCardinalityNext,
            fee_protocol: slot0.feeProtocol,
            unlocked: slot0.unlocked,
            liquidity,
        })
    }
}
