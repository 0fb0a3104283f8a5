use {
    super::{
        Error,
        InvalidSpec,
        PoolKey,
        RewardStreamDescriptor,
        eth::{Address, BlockRange, FeeTier, MAX_TICK, MIN_TICK, TickRange, U256},
    },
    crate::traits::MiningFactory,
    anyhow::anyhow,
    serde::Serialize,
    std::sync::Arc,
    tracing::instrument,
};

const CONTRACT: &str = "MiningFixRangeBoost";

/// A reward slot as stored by the mining contract.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardSlot {
    pub reward_token: Address,
    pub provider: Address,
    pub acc_reward_per_share: U256,
    pub reward_per_block: U256,
}

/// Everything describing one mining program. Built once per run and only
/// read afterwards.
#[derive(Clone, Debug)]
pub struct MiningDeploymentSpec {
    pub pool: PoolKey,
    /// Token whose holdings boost a position's reward share. `None` disables
    /// boosting.
    pub boost_token: Option<Address>,
    pub tick_range: TickRange,
    pub block_range: BlockRange,
    /// In reward slot order.
    pub rewards: Vec<RewardStreamDescriptor>,
}

impl MiningDeploymentSpec {
    /// Checks everything that can be checked without talking to the chain.
    pub fn validate(&self) -> Result<(), InvalidSpec> {
        validate_parameters(self.rewards.len(), self.tick_range, self.block_range)
    }
}

/// The checks of [`MiningDeploymentSpec::validate`] that do not need any
/// token to be known yet.
pub(super) fn validate_parameters(
    rewards: usize,
    tick_range: TickRange,
    block_range: BlockRange,
) -> Result<(), InvalidSpec> {
    if rewards == 0 {
        return Err(InvalidSpec::NoRewards);
    }
    let TickRange { lower, upper } = tick_range;
    if let Some(tick) = [lower, upper]
        .into_iter()
        .find(|tick| !(MIN_TICK..=MAX_TICK).contains(tick))
    {
        return Err(InvalidSpec::TickOutOfBounds(tick));
    }
    if lower >= upper {
        return Err(InvalidSpec::EmptyTickRange { lower, upper });
    }
    let BlockRange { start, end } = block_range;
    if start > end {
        return Err(InvalidSpec::InvertedBlockRange { start, end });
    }
    Ok(())
}

/// Constructor arguments of the mining contract, in the order the contract
/// takes them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MiningProgramArgs {
    pub position_manager: Address,
    pub token0: Address,
    pub token1: Address,
    pub fee: FeeTier,
    pub rewards: Vec<RewardSlot>,
    /// Zero when boosting is disabled.
    pub boost_token: Address,
    pub tick_upper: i32,
    pub tick_lower: i32,
    pub block_start: U256,
    pub block_end: U256,
}

impl MiningProgramArgs {
    fn new(position_manager: Address, spec: &MiningDeploymentSpec) -> Self {
        Self {
            position_manager,
            token0: spec.pool.pair.token0().address,
            token1: spec.pool.pair.token1().address,
            fee: spec.pool.fee,
            rewards: spec.rewards.iter().map(RewardStreamDescriptor::slot).collect(),
            boost_token: spec.boost_token.unwrap_or(Address::ZERO),
            tick_upper: spec.tick_range.upper,
            tick_lower: spec.tick_range.lower,
            block_start: spec.block_range.start,
            block_end: spec.block_range.end,
        }
    }
}

/// A deployed mining program.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct MiningProgram {
    pub address: Address,
}

pub struct MiningDeployer {
    factory: Arc<dyn MiningFactory>,
    position_manager: Address,
}

impl MiningDeployer {
    pub fn new(factory: Arc<dyn MiningFactory>, position_manager: Address) -> Self {
        Self {
            factory,
            position_manager,
        }
    }

    /// Validates `spec` and deploys the program it describes. Nothing is
    /// submitted when validation fails.
    ///
    /// After deployment the reward slots are read back from the contract and
    /// compared with the submitted ones.
    #[instrument(skip_all, fields(fee = %spec.pool.fee, rewards = spec.rewards.len()))]
    pub async fn deploy_mining(&self, spec: &MiningDeploymentSpec) -> Result<MiningProgram, Error> {
        spec.validate()?;

        let args = MiningProgramArgs::new(self.position_manager, spec);
        let expected = args.rewards.clone();
        let address = self
            .factory
            .deploy_mining_program(args)
            .await
            .map_err(deployment)?;
        tracing::info!(?address, "deployed mining program");

        self.check_slots(address, &expected).await.map_err(deployment)?;

        Ok(MiningProgram { address })
    }

    /// Compares the program's reward slots with the submitted ones. The slot
    /// count is checked before any slot is read.
    ///
    /// The accumulator is owned by the contract, so only the configured fields
    /// are compared.
    async fn check_slots(&self, program: Address, expected: &[RewardSlot]) -> anyhow::Result<()> {
        let count = self.factory.reward_slot_count(program).await?;
        if count != expected.len() {
            return Err(anyhow!(
                "contract reports {count} reward slots, expected {}",
                expected.len()
            ));
        }
        for (index, expected) in expected.iter().enumerate() {
            let actual = self.factory.reward_slot(program, index).await?;
            let matches = expected.reward_token == actual.reward_token
                && expected.provider == actual.provider
                && expected.reward_per_block == actual.reward_per_block;
            if !matches {
                return Err(anyhow!(
                    "reward slot #{index} is {actual:?}, expected {expected:?}"
                ));
            }
        }
        Ok(())
    }
}

fn deployment(source: anyhow::Error) -> Error {
    Error::Deployment {
        contract: CONTRACT.to_owned(),
        source,
    }
}
