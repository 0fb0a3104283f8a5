use {
    super::{
        Error,
        TokenPair,
        eth::{Address, FeeTier, InitialPrice, U160},
    },
    crate::traits::Exchange,
    anyhow::{Context, Result},
    serde::Serialize,
    std::sync::Arc,
    tracing::instrument,
};

/// Identifies a pool: an ordered pair and a fee tier.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolKey {
    pub pair: TokenPair,
    pub fee: FeeTier,
}

/// An existing, initialized pool.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolHandle {
    pub address: Address,
    pub key: PoolKey,
}

/// The pool's `slot0` together with its in-range liquidity.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolState {
    pub sqrt_price_x96: U160,
    pub tick: i32,
    pub observation_index: u16,
    pub observation_cardinality: u16,
    pub observation_cardinality_next: u16,
    pub fee_protocol: u8,
    pub unlocked: bool,
    pub liquidity: u128,
}

pub struct PoolInitializer {
    exchange: Arc<dyn Exchange>,
}

impl PoolInitializer {
    pub fn new(exchange: Arc<dyn Exchange>) -> Self {
        Self { exchange }
    }

    /// Makes sure the pool for `pair` and `fee` exists and is initialized.
    ///
    /// An existing pool keeps its price: `price` is only used when the pool
    /// has not been initialized yet.
    #[instrument(skip_all, fields(
        token0 = ?pair.token0().address,
        token1 = ?pair.token1().address,
        %fee,
    ))]
    pub async fn ensure_pool_initialized(
        &self,
        pair: TokenPair,
        fee: FeeTier,
        price: InitialPrice,
    ) -> Result<PoolHandle, Error> {
        let (token0, token1) = (pair.token0().address, pair.token1().address);
        let address = self
            .exchange
            .create_and_initialize_pool_if_necessary(token0, token1, fee, price)
            .await
            .map_err(|source| Error::PoolInitialization {
                token0,
                token1,
                fee,
                source,
            })?;
        tracing::info!(?address, "pool ready");
        Ok(PoolHandle {
            address,
            key: PoolKey { pair, fee },
        })
    }

    /// Looks up the pool of `pair` and `fee` and reads its state.
    #[instrument(skip_all, fields(%fee))]
    pub async fn pool_state(&self, pair: &TokenPair, fee: FeeTier) -> Result<(Address, PoolState)> {
        let (token0, token1) = (pair.token0().address, pair.token1().address);
        let pool = self
            .exchange
            .pool(token0, token1, fee)
            .await?
            .with_context(|| format!("no {token0}/{token1} pool with fee tier {fee}"))?;
        let state = self.exchange.pool_state(pool).await?;
        Ok((pool, state))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            domain::{canonicalize, eth::TokenHandle},
            traits::MockExchange,
        },
        alloy::primitives::address,
        anyhow::anyhow,
    };

    const LOW: Address = address!("0x1111111111111111111111111111111111111111");
    const HIGH: Address = address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
    const POOL: Address = address!("0x5555555555555555555555555555555555555555");

    fn pair() -> TokenPair {
        let token = |address| TokenHandle {
            address,
            name: String::new(),
            symbol: String::new(),
            decimals: 18,
        };
        canonicalize(token(HIGH), token(LOW)).unwrap()
    }

    fn price() -> InitialPrice {
        InitialPrice(U160::from(1) << 97)
    }

    #[tokio::test]
    async fn passes_the_canonical_order() {
        let mut exchange = MockExchange::new();
        exchange
            .expect_create_and_initialize_pool_if_necessary()
            .times(1)
            .withf(|token0, token1, fee, price| {
                *token0 == LOW
                    && *token1 == HIGH
                    && *fee == FeeTier::MEDIUM
                    && price.0 == U160::from(1) << 97
            })
            .returning(|_, _, _, _| Ok(POOL));

        let pools = PoolInitializer::new(Arc::new(exchange));
        let pool = pools
            .ensure_pool_initialized(pair(), FeeTier::MEDIUM, price())
            .await
            .unwrap();
        assert_eq!(pool.address, POOL);
        assert_eq!(pool.key.fee, FeeTier::MEDIUM);
        assert_eq!(pool.key.pair, pair());
    }

    #[tokio::test]
    async fn failure_is_tagged_with_the_pool() {
        let mut exchange = MockExchange::new();
        exchange
            .expect_create_and_initialize_pool_if_necessary()
            .returning(|_, _, _, _| Err(anyhow!("execution reverted")));

        let pools = PoolInitializer::new(Arc::new(exchange));
        let err = pools
            .ensure_pool_initialized(pair(), FeeTier::LOW, price())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::PoolInitialization { token0, token1, fee, .. }
                if token0 == LOW && token1 == HIGH && fee == FeeTier::LOW
        ));
    }

    #[tokio::test]
    async fn reads_state_of_existing_pool() {
        let state = PoolState {
            sqrt_price_x96: U160::from(1) << 97,
            tick: -6932,
            observation_index: 0,
            observation_cardinality: 1,
            observation_cardinality_next: 1,
            fee_protocol: 0,
            unlocked: true,
            liquidity: 0,
        };

        let mut exchange = MockExchange::new();
        exchange
            .expect_pool()
            .withf(|token0, token1, fee| {
                *token0 == LOW && *token1 == HIGH && *fee == FeeTier::MEDIUM
            })
            .returning(|_, _, _| Ok(Some(POOL)));
        exchange
            .expect_pool_state()
            .withf(|pool| *pool == POOL)
            .returning(move |_| Ok(state));

        let pools = PoolInitializer::new(Arc::new(exchange));
        assert_eq!(
            pools.pool_state(&pair(), FeeTier::MEDIUM).await.unwrap(),
            (POOL, state)
        );
    }

    #[tokio::test]
    async fn missing_pool_is_an_error() {
        let mut exchange = MockExchange::new();
        exchange.expect_pool().returning(|_, _, _| Ok(None));

        let pools = PoolInitializer::new(Arc::new(exchange));
        assert!(pools.pool_state(&pair(), FeeTier::HIGH).await.is_err());
    }
}
