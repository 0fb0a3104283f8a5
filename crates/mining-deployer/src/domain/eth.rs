pub use alloy::primitives::{
    Address,
    B256,
    U256,
    aliases::{I24, U24, U160},
};
use {
    serde::Serialize,
    std::fmt::{self, Display, Formatter},
};

/// Lowest tick a concentrated liquidity position can reference.
pub const MIN_TICK: i32 = -887272;
/// Highest tick a concentrated liquidity position can reference.
pub const MAX_TICK: i32 = 887272;

/// A deployed ERC20 token.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TokenHandle {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Selects one of the pools of a token pair by its swap fee, expressed in
/// hundredths of a basis point (`3000` is 0.3%).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct FeeTier(u32);

impl FeeTier {
    pub const HIGH: Self = Self(10_000);
    pub const LOW: Self = Self(500);
    pub const LOWEST: Self = Self(100);
    pub const MEDIUM: Self = Self(3_000);

    /// The fee as the `uint24` contracts expect.
    pub fn to_u24(self) -> U24 {
        U24::from(self.0)
    }
}

impl TryFrom<u32> for FeeTier {
    type Error = String;

    fn try_from(fee: u32) -> Result<Self, Self::Error> {
        if fee >= 1 << 24 {
            return Err(format!("fee tier {fee} does not fit into 24 bits"));
        }
        Ok(Self(fee))
    }
}

impl Display for FeeTier {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Starting price of a new pool as a Q64.96 square root (`sqrtPriceX96`).
/// Handed to the exchange unchanged.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InitialPrice(pub U160);

/// Ticks bounding the price range rewarded by a mining program.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct TickRange {
    pub lower: i32,
    pub upper: i32,
}

/// Inclusive span of block heights over which rewards are emitted.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct BlockRange {
    pub start: U256,
    pub end: U256,
}
