use {
    crate::{
        domain::{
            DeploymentPlan,
            RewardPlan,
            TokenSource,
            eth::{Address, BlockRange, FeeTier, InitialPrice, TickRange},
        },
        infra::TxSettings,
    },
    anyhow::{Context, Result, anyhow},
    ethrpc::alloy::wallet::Accounts,
    std::path::{Path, PathBuf},
    tokio::fs,
    url::Url,
};

mod file;

/// The resolved configuration of a run.
#[derive(Debug)]
pub struct Config {
    pub artifacts: PathBuf,
    pub network: Network,
    pub exchange: ExchangeSetup,
    deployment: Option<file::Deployment>,
}

#[derive(Debug)]
pub struct Network {
    pub name: String,
    pub url: Url,
    pub chain_id: Option<u64>,
    pub tx: TxSettings,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExchangeSetup {
    Existing { position_manager: Address },
    Deploy { token_descriptor: Address },
}

impl Config {
    /// Loads the TOML configuration at `path` and selects `network` from it.
    /// Without a network name the configuration must define exactly one.
    pub async fn load(path: &Path, network: Option<&str>) -> Result<Self> {
        let data = fs::read_to_string(path)
            .await
            .with_context(|| format!("I/O error while reading {path:?}"))?;
        let mut config = Self::parse(&data, network)
            .with_context(|| format!("invalid configuration in {path:?}"))?;
        if config.artifacts.is_relative() {
            let dir = path.parent().unwrap_or(Path::new(""));
            config.artifacts = dir.join(&config.artifacts);
        }
        Ok(config)
    }

    fn parse(data: &str, network: Option<&str>) -> Result<Self> {
        let mut config: file::Config = toml::from_str(data)?;

        let name = match network {
            Some(name) => name.to_owned(),
            None => match config.networks.keys().collect::<Vec<_>>().as_slice() {
                [name] => (*name).clone(),
                [] => return Err(anyhow!("no network is configured")),
                _ => return Err(anyhow!("several networks are configured, select one")),
            },
        };
        let network = config
            .networks
            .remove(&name)
            .with_context(|| format!("network {name:?} is not configured"))?;
        anyhow::ensure!(
            network.confirmations > 0,
            "network {name:?} requires at least one confirmation"
        );

        Ok(Self {
            artifacts: config.artifacts,
            network: Network {
                name,
                url: network.url,
                chain_id: network.chain_id,
                tx: TxSettings {
                    gas_limit: network.gas_limit,
                    gas_price: network.gas_price.map(u128::from),
                    confirmations: network.confirmations,
                    confirmation_timeout: network.confirmation_timeout,
                },
            },
            exchange: match config.exchange {
                file::Exchange::Existing(exchange) => ExchangeSetup::Existing {
                    position_manager: exchange.position_manager,
                },
                file::Exchange::Deploy(exchange) => ExchangeSetup::Deploy {
                    token_descriptor: exchange.token_descriptor,
                },
            },
            deployment: config.deployment,
        })
    }

    /// Builds the deployment plan, resolving reward providers among
    /// `accounts`.
    pub fn plan(&self, accounts: &Accounts) -> Result<DeploymentPlan> {
        let deployment = self
            .deployment
            .as_ref()
            .context("the configuration has no [deployment] section")?;

        let rewards = deployment
            .rewards
            .iter()
            .enumerate()
            .map(|(index, reward)| {
                let provider = accounts.address(reward.provider).with_context(|| {
                    format!(
                        "reward #{index} is provided by account {} but only {} accounts are loaded",
                        reward.provider,
                        accounts.count()
                    )
                })?;
                Ok(RewardPlan {
                    token: token_source(&reward.token),
                    provider,
                    reward_per_block: reward.reward_per_block,
                    budget: reward.budget,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(DeploymentPlan {
            pair: (
                token_source(&deployment.pair.token_a),
                token_source(&deployment.pair.token_b),
            ),
            fee: FeeTier::try_from(deployment.fee).map_err(|err| anyhow!(err))?,
            price: InitialPrice(deployment.sqrt_price_x96),
            boost_token: deployment.boost_token.filter(|token| !token.is_zero()),
            tick_range: TickRange {
                lower: deployment.tick_lower,
                upper: deployment.tick_upper,
            },
            block_range: BlockRange {
                start: deployment.start_block,
                end: deployment.end_block,
            },
            rewards,
        })
    }
}

fn token_source(token: &file::Token) -> TokenSource {
    match token {
        file::Token::Deploy(token) => TokenSource::Deploy {
            name: token.name.clone(),
            symbol: token.symbol.clone(),
            decimals: token.decimals,
        },
        file::Token::Existing(address) => TokenSource::Existing(*address),
    }
}
