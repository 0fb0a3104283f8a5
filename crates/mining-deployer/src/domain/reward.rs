use super::{
    eth::{Address, TokenHandle, U256},
    mining::RewardSlot,
};

/// One reward stream of a mining program: which token is paid out, who funds
/// it and how much is emitted per block.
///
/// `acc_reward_per_share` belongs to the mining contract. It is seeded with
/// zero here and only ever changed on-chain.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardStreamDescriptor {
    pub reward_token: TokenHandle,
    pub provider: Address,
    pub reward_per_block: U256,
    pub acc_reward_per_share: U256,
}

impl RewardStreamDescriptor {
    pub fn new(reward_token: TokenHandle, provider: Address, reward_per_block: U256) -> Self {
        Self {
            reward_token,
            provider,
            reward_per_block,
            acc_reward_per_share: U256::ZERO,
        }
    }

    /// The reward slot this stream occupies in the mining contract.
    pub fn slot(&self) -> RewardSlot {
        RewardSlot {
            reward_token: self.reward_token.address,
            provider: self.provider,
            acc_reward_per_share: self.acc_reward_per_share,
            reward_per_block: self.reward_per_block,
        }
    }
}
