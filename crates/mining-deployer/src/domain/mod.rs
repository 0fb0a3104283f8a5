//! The deployment core: pure data types and the components that sequence the
//! collaborator calls. Nothing in here knows how a collaborator is reached;
//! see [`crate::traits`] for the seams and [`crate::infra`] for the on-chain
//! implementations.

mod error;
pub mod eth;
mod mining;
mod pair;
mod pipeline;
mod pool;
mod provision;
mod reward;
mod token;

pub use self::{
    error::{Error, InvalidSpec, ProvisioningStep},
    mining::{MiningDeployer, MiningDeploymentSpec, MiningProgram, MiningProgramArgs, RewardSlot},
    pair::{TokenPair, canonicalize},
    pipeline::{DeploymentPlan, DeploymentReport, Pipeline, RewardPlan},
    pool::{PoolHandle, PoolInitializer, PoolKey, PoolState},
    provision::{Provisioned, ProvisioningWorkflow},
    reward::RewardStreamDescriptor,
    token::{TokenProvisioner, TokenSource},
};
