use {
    super::{
        Error,
        MiningDeployer,
        MiningDeploymentSpec,
        PoolInitializer,
        Provisioned,
        ProvisioningWorkflow,
        RewardStreamDescriptor,
        TokenProvisioner,
        TokenSource,
        canonicalize,
        eth::{Address, BlockRange, FeeTier, InitialPrice, TickRange, TokenHandle, U256},
        mining::validate_parameters,
    },
    serde::Serialize,
    tracing::instrument,
};

/// Everything a deployment run needs to know, with tokens not resolved yet.
#[derive(Clone, Debug)]
pub struct DeploymentPlan {
    /// The two pool tokens in any order.
    pub pair: (TokenSource, TokenSource),
    pub fee: FeeTier,
    pub price: InitialPrice,
    pub boost_token: Option<Address>,
    pub tick_range: TickRange,
    pub block_range: BlockRange,
    /// In reward slot order.
    pub rewards: Vec<RewardPlan>,
}

/// A reward stream to set up together with the budget its provider gets.
#[derive(Clone, Debug)]
pub struct RewardPlan {
    pub token: TokenSource,
    pub provider: Address,
    pub reward_per_block: U256,
    pub budget: U256,
}

impl DeploymentPlan {
    /// Runs the checks that do not depend on deployed tokens, so that an
    /// invalid plan fails before the first transaction.
    pub fn validate(&self) -> Result<(), Error> {
        match &self.pair {
            (TokenSource::Existing(a), TokenSource::Existing(b)) if a == b => {
                return Err(Error::InvalidPair(*a));
            }
            _ => (),
        }
        validate_parameters(self.rewards.len(), self.tick_range, self.block_range)?;
        Ok(())
    }
}

/// What a successful run deployed.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentReport {
    pub token0: TokenHandle,
    pub token1: TokenHandle,
    pub fee: FeeTier,
    pub pool: Address,
    pub reward_tokens: Vec<TokenHandle>,
    pub program: Address,
    pub provisioned: Vec<Provisioned>,
}

/// The deployment components wired together in the order a run needs them:
/// pair tokens, pool, reward tokens, mining program, provisioning.
pub struct Pipeline {
    pub tokens: TokenProvisioner,
    pub pools: PoolInitializer,
    pub mining: MiningDeployer,
    pub provisioning: ProvisioningWorkflow,
}

impl Pipeline {
    #[instrument(skip_all)]
    pub async fn run(&self, plan: &DeploymentPlan) -> Result<DeploymentReport, Error> {
        plan.validate()?;

        let a = self.tokens.provision(&plan.pair.0).await?;
        let b = self.tokens.provision(&plan.pair.1).await?;
        let pair = canonicalize(a, b)?;
        let pool = self
            .pools
            .ensure_pool_initialized(pair, plan.fee, plan.price)
            .await?;

        let mut rewards = Vec::with_capacity(plan.rewards.len());
        for reward in &plan.rewards {
            let token = self.tokens.provision(&reward.token).await?;
            rewards.push(RewardStreamDescriptor::new(
                token,
                reward.provider,
                reward.reward_per_block,
            ));
        }

        let spec = MiningDeploymentSpec {
            pool: pool.key.clone(),
            boost_token: plan.boost_token,
            tick_range: plan.tick_range,
            block_range: plan.block_range,
            rewards,
        };
        let program = self.mining.deploy_mining(&spec).await?;

        let streams: Vec<_> = spec
            .rewards
            .iter()
            .cloned()
            .zip(plan.rewards.iter().map(|reward| reward.budget))
            .collect();
        let provisioned = self.provisioning.provision_all(&program, &streams).await?;

        let (token0, token1) = pool.key.pair.into_tokens();
        Ok(DeploymentReport {
            token0,
            token1,
            fee: pool.key.fee,
            pool: pool.address,
            reward_tokens: spec
                .rewards
                .into_iter()
                .map(|reward| reward.reward_token)
                .collect(),
            program: program.address,
            provisioned,
        })
    }
}
