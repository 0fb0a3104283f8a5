use {
    super::eth::{Address, FeeTier, U256},
    std::fmt::{self, Display, Formatter},
};

/// Every way a deployment run can fail. All of them abort the run; on-chain
/// effects of the steps that already completed stay in place.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("token {0} cannot be paired with itself")]
    InvalidPair(Address),

    #[error("failed to deploy {contract}")]
    Deployment {
        contract: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to create or initialize the {token0}/{token1} pool with fee tier {fee}")]
    PoolInitialization {
        token0: Address,
        token1: Address,
        fee: FeeTier,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid mining deployment")]
    SpecValidation(#[from] InvalidSpec),

    #[error(
        "failed to provision reward stream #{index} (token {token}, provider {provider}): {step} \
         failed"
    )]
    Provisioning {
        index: usize,
        token: Address,
        provider: Address,
        step: ProvisioningStep,
        #[source]
        source: anyhow::Error,
    },
}

/// Problems with a mining deployment that are detected before anything is
/// submitted.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum InvalidSpec {
    #[error("at least one reward stream is required")]
    NoRewards,

    #[error("lower tick {lower} must be below upper tick {upper}")]
    EmptyTickRange { lower: i32, upper: i32 },

    #[error("tick {0} is outside of the supported range [-887272, 887272]")]
    TickOutOfBounds(i32),

    #[error("start block {start} is after end block {end}")]
    InvertedBlockRange { start: U256, end: U256 },
}

/// The two halves of provisioning a reward stream.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ProvisioningStep {
    /// Funding the provider from the deployer's balance.
    Transfer,
    /// The provider allowing the mining program to pull the funds.
    Approve,
}

impl Display for ProvisioningStep {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Transfer => "transfer",
            Self::Approve => "approve",
        })
    }
}
