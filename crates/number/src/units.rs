use alloy::primitives::{U256, utils::Unit};

/// Whole token amounts of 18 decimal tokens, written the way budgets are
/// usually thought about: `1_000_000u64.eth()`.
pub trait EthUnit: Sized {
    fn eth(self) -> U256;
}

impl EthUnit for u64 {
    fn eth(self) -> U256 {
        U256::from(self) * Unit::ETHER.wei()
    }
}
