pub mod blockchain;
pub mod config;

pub use self::{
    blockchain::{Chain, TxSettings, exchange::UniswapV3},
    config::Config,
};
