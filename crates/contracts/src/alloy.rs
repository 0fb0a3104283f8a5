//! Typed bindings for the contracts a mining deployment talks to.
//!
//! Only the entry points the deployer uses are declared. Deployable bytecode
//! is not compiled into the bindings; it is loaded from build artifacts at
//! runtime, see [`crate::artifact`].

macro_rules! bindings {
    ($contract:ident { $($body:tt)* }) => {
        paste::paste! {
            // Generate the main bindings in a private module. That allows
            // us to re-export all items in our own module while also adding
            // some items ourselves.
            #[allow(non_snake_case)]
            mod [<$contract Private>] {
                alloy::sol!(
                    #[allow(missing_docs)]
                    #[sol(rpc)]
                    contract $contract {
                        $($body)*
                    }
                );
            }

            #[allow(non_snake_case)]
            pub mod $contract {
                use alloy::providers::DynProvider;

                pub use super::[<$contract Private>]::*;
                pub type Instance = $contract::[<$contract Instance>]<DynProvider>;
            }
        }
    };
}

bindings!(TestToken {
    constructor(string name, string symbol, uint8 decimals);

    function name() external view returns (string);
    function symbol() external view returns (string);
    function decimals() external view returns (uint8);
    function balanceOf(address owner) external view returns (uint256);
    function allowance(address owner, address spender) external view returns (uint256);
    function transfer(address to, uint256 amount) external returns (bool);
    function approve(address spender, uint256 amount) external returns (bool);
});

bindings!(UniswapV3Factory {
    constructor();

    function getPool(address tokenA, address tokenB, uint24 fee) external view returns (address pool);
});

bindings!(UniswapV3Pool {
    function liquidity() external view returns (uint128);
    function slot0() external view returns (
        uint160 sqrtPriceX96,
        int24 tick,
        uint16 observationIndex,
        uint16 observationCardinality,
        uint16 observationCardinalityNext,
        uint8 feeProtocol,
        bool unlocked
    );
});

bindings!(SwapRouter {
    constructor(address factory, address WETH9);
});

bindings!(NonfungiblePositionManager {
    constructor(address factory, address WETH9, address tokenDescriptor);

    function factory() external view returns (address);
    function WETH9() external view returns (address);
    function createAndInitializePoolIfNecessary(
        address token0,
        address token1,
        uint24 fee,
        uint160 sqrtPriceX96
    ) external payable returns (address pool);
    function setApprovalForAll(address operator, bool approved) external;
    function isApprovedForAll(address owner, address operator) external view returns (bool);
});

bindings!(MiningFixRangeBoost {
    struct RewardInfo {
        address rewardToken;
        address provider;
        uint256 accRewardPerShare;
        uint256 rewardPerBlock;
    }

    constructor(
        address uniV3NFTManager,
        address token0,
        address token1,
        uint24 fee,
        RewardInfo[] rewardInfos,
        address iziTokenAddr,
        int24 rewardUpperTick,
        int24 rewardLowerTick,
        uint256 startBlock,
        uint256 endBlock
    );

    function rewardInfosLen() external view returns (uint256);
    function rewardInfos(uint256 index) external view returns (
        address rewardToken,
        address provider,
        uint256 accRewardPerShare,
        uint256 rewardPerBlock
    );
});
