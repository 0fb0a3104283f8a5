use {
    crate::domain::eth::{Address, U160, U256},
    number::serialization::HexOrDecimal,
    serde::Deserialize,
    serde_with::serde_as,
    std::{collections::BTreeMap, path::PathBuf, time::Duration},
    url::Url,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Directory holding the compiled contract artifacts. Relative paths are
    /// resolved against the directory of the configuration file.
    #[serde(default = "default_artifacts")]
    pub artifacts: PathBuf,

    pub networks: BTreeMap<String, Network>,

    pub exchange: Exchange,

    /// Only needed by the `deploy` command.
    pub deployment: Option<Deployment>,
}

fn default_artifacts() -> PathBuf {
    PathBuf::from("artifacts")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Network {
    pub url: Url,

    /// When set, the node must report this chain ID.
    pub chain_id: Option<u64>,

    /// Use this gas limit for every transaction instead of estimating it.
    pub gas_limit: Option<u64>,

    /// Legacy gas price in wei. TOML integers are 64 bit wide.
    pub gas_price: Option<u64>,

    /// Number of blocks a transaction must be buried under before it counts
    /// as confirmed.
    #[serde(default = "default_confirmations")]
    pub confirmations: u64,

    #[serde(default, with = "humantime_serde")]
    pub confirmation_timeout: Option<Duration>,
}

fn default_confirmations() -> u64 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Exchange {
    /// Use an exchange that is already deployed.
    Existing(ExistingExchange),
    /// Deploy a fresh exchange before anything else.
    Deploy(DeployExchange),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ExistingExchange {
    pub position_manager: Address,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DeployExchange {
    /// Renders position NFT metadata. Positions have no metadata when unset.
    #[serde(default)]
    pub token_descriptor: Address,
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Deployment {
    pub fee: u32,

    #[serde_as(as = "HexOrDecimal")]
    pub sqrt_price_x96: U160,

    pub tick_lower: i32,

    pub tick_upper: i32,

    #[serde_as(as = "HexOrDecimal")]
    pub start_block: U256,

    #[serde_as(as = "HexOrDecimal")]
    pub end_block: U256,

    /// The zero address disables boosting, same as leaving it out.
    #[serde(default)]
    pub boost_token: Option<Address>,

    pub pair: Pair,

    pub rewards: Vec<Reward>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Pair {
    pub token_a: Token,
    pub token_b: Token,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Token {
    Deploy(DeployToken),
    Existing(Address),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DeployToken {
    pub name: String,
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

fn default_decimals() -> u8 {
    18
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Reward {
    pub token: Token,

    /// Index of the account funding this stream.
    pub provider: usize,

    #[serde_as(as = "HexOrDecimal")]
    pub reward_per_block: U256,

    /// Amount transferred to the provider and approved for the program.
    #[serde_as(as = "HexOrDecimal")]
    pub budget: U256,
}
