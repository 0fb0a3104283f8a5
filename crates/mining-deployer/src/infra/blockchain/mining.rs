use {
    super::Chain,
    crate::{
        domain::{
            MiningProgramArgs,
            RewardSlot,
            eth::{Address, I24, U256},
        },
        traits::MiningFactory,
    },
    anyhow::{Context, Result},
    contracts::alloy::MiningFixRangeBoost::{
        self,
        MiningFixRangeBoost::{RewardInfo, constructorCall},
    },
    ethrpc::alloy::errors::ContractResultExt,
};

impl Chain {
    fn mining_contract(&self, address: Address) -> MiningFixRangeBoost::Instance {
        MiningFixRangeBoost::Instance::new(address, self.web3().alloy.clone())
    }
}

fn tick(tick: i32) -> Result<I24> {
    I24::try_from(tick).with_context(|| format!("tick {tick} does not fit into int24"))
}

fn constructor(args: &MiningProgramArgs) -> Result<constructorCall> {
    Ok(constructorCall {
        uniV3NFTManager: args.position_manager,
        token0: args.token0,
        token1: args.token1,
        fee: args.fee.to_u24(),
        rewardInfos: args
            .rewards
            .iter()
            .map(|slot| RewardInfo {
                rewardToken: slot.reward_token,
                provider: slot.provider,
                accRewardPerShare: slot.acc_reward_per_share,
                rewardPerBlock: slot.reward_per_block,
            })
            .collect(),
        iziTokenAddr: args.boost_token,
        rewardUpperTick: tick(args.tick_upper)?,
        rewardLowerTick: tick(args.tick_lower)?,
        startBlock: args.block_start,
        endBlock: args.block_end,
    })
}

#[async_trait::async_trait]
impl MiningFactory for Chain {
    async fn deploy_mining_program(&self, args: MiningProgramArgs) -> Result<Address> {
        self.deploy("MiningFixRangeBoost", &constructor(&args)?).await
    }

    async fn reward_slot_count(&self, program: Address) -> Result<usize> {
        let len = self
            .mining_contract(program)
            .rewardInfosLen()
            .call()
            .await
            .call_context("rewardInfosLen")?;
        usize::try_from(len).context("reward slot count out of range")
    }

    async fn reward_slot(&self, program: Address, index: usize) -> Result<RewardSlot> {
        let info = self
            .mining_contract(program)
            .rewardInfos(U256::from(index))
            .call()
            .await
            .call_context("rewardInfos")?;
        Ok(RewardSlot {
            reward_token: info.rewardToken,
            provider: info.provider,
            acc_reward_per_share: info.accRewardPerShare,
            reward_per_block: info.rewardPerBlock,
        })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::domain::eth::FeeTier,
        alloy::primitives::address,
    };

    fn args() -> MiningProgramArgs {
        MiningProgramArgs {
            position_manager: address!("0xc36442b4a4522e871399cd717abdd847ab11fe88"),
            token0: address!("0x1111111111111111111111111111111111111111"),
            token1: address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
            fee: FeeTier::MEDIUM,
            rewards: [(0x33, 30_000_000_000_000u64), (0x22, 60_000_000_000_000u64)]
                .into_iter()
                .map(|(token, rate)| RewardSlot {
                    reward_token: Address::repeat_byte(token),
                    provider: Address::with_last_byte(token),
                    acc_reward_per_share: U256::ZERO,
                    reward_per_block: U256::from(rate),
                })
                .collect(),
            boost_token: Address::ZERO,
            tick_upper: 50000,
            tick_lower: -5000,
            block_start: U256::ZERO,
            block_end: U256::from(10_000_000_000_000_000_000u128),
        }
    }

    #[test]
    fn constructor_takes_arguments_in_contract_order() {
        let call = constructor(&args()).unwrap();
        assert_eq!(call.uniV3NFTManager, args().position_manager);
        assert_eq!(call.token0, args().token0);
        assert_eq!(call.token1, args().token1);
        assert_eq!(call.fee, FeeTier::MEDIUM.to_u24());
        assert_eq!(
            call.rewardInfos
                .iter()
                .map(|info| (info.rewardToken, info.rewardPerBlock))
                .collect::<Vec<_>>(),
            vec![
                (Address::repeat_byte(0x33), U256::from(30_000_000_000_000u64)),
                (Address::repeat_byte(0x22), U256::from(60_000_000_000_000u64)),
            ]
        );
        assert_eq!(call.iziTokenAddr, Address::ZERO);
        assert_eq!(call.rewardUpperTick, tick(50000).unwrap());
        assert_eq!(call.rewardLowerTick, tick(-5000).unwrap());
        assert_eq!(call.endBlock, U256::from(10_000_000_000_000_000_000u128));
    }

    #[test]
    fn constructor_rejects_ticks_beyond_int24() {
        let mut args = args();
        args.tick_upper = 1 << 23;
        assert!(constructor(&args).is_err());
    }

    #[test]
    fn ticks_fit_int24() {
        assert_eq!(tick(-5000).unwrap(), I24::try_from(-5000).unwrap());
        assert!(tick(887272).is_ok());
        assert!(tick(1 << 23).is_err());
        assert!(tick(-(1 << 23) - 1).is_err());
    }
}
