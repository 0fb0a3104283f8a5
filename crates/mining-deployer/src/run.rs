use {
    crate::{
        cli::{self, Command},
        domain::{
            DeploymentReport,
            MiningDeployer,
            Pipeline,
            PoolInitializer,
            PoolState,
            ProvisioningWorkflow,
            TokenProvisioner,
            canonicalize,
            eth::{Address, FeeTier, TokenHandle},
        },
        infra::{
            Chain,
            Config,
            UniswapV3,
            blockchain::exchange::ExchangeAddresses,
            config::ExchangeSetup,
        },
        traits::Exchange,
    },
    anyhow::{Context, Result, anyhow},
    clap::Parser,
    contracts::Artifacts,
    ethrpc::Web3,
    serde::Serialize,
    std::{process::ExitCode, sync::Arc},
};

pub async fn start(args: impl Iterator<Item = String>) -> ExitCode {
    let args = cli::Args::parse_from(args);
    let format = if args.use_json_logs {
        observe::Format::Json
    } else {
        observe::Format::Plain
    };
    observe::tracing::initialize(
        &observe::Config::new(&args.log)
            .with_stderr_threshold(args.stderr_threshold)
            .with_format(format),
    );
    tracing::info!("running mining deployer with validated arguments:\n{}", args);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(?err, "run failed");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Executes the command of `args` and prints its result as JSON on stdout.
pub async fn run(args: cli::Args) -> Result<()> {
    let config = Config::load(&args.config, args.network.as_deref()).await?;
    tracing::debug!(
        network = %config.network.name,
        url = %config.network.url,
        "loaded configuration"
    );
    let web3 = Web3::new(&config.network.url, args.signers()?);
    let chain = Chain::connect(
        web3,
        Artifacts::new(&config.artifacts),
        config.network.tx.clone(),
        config.network.chain_id,
    )
    .await?;

    match args.command {
        Command::Deploy => print(&deploy(&config, chain).await?),
        Command::PoolState {
            token_a,
            token_b,
            fee,
        } => {
            let fee = FeeTier::try_from(fee).map_err(|err| anyhow!(err))?;
            print(&pool_state(&config, chain, token_a, token_b, fee).await?)
        }
        Command::ApproveOperator { operator, account } => {
            print(&approve_operator(&config, chain, operator, account).await?)
        }
    }
}

fn print(output: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Deployed {
    exchange: ExchangeAddresses,
    #[serde(flatten)]
    deployment: DeploymentReport,
}

async fn deploy(config: &Config, chain: Chain) -> Result<Deployed> {
    let plan = config.plan(&chain.web3().accounts)?;
    // Fail before the exchange gets deployed.
    plan.validate()?;

    let exchange = match config.exchange {
        ExchangeSetup::Existing { position_manager } => {
            UniswapV3::attach(chain.clone(), position_manager).await?
        }
        ExchangeSetup::Deploy { token_descriptor } => {
            UniswapV3::deploy(chain.clone(), token_descriptor).await?
        }
    };
    let addresses = exchange.addresses();
    let chain = Arc::new(chain);
    let pipeline = Pipeline {
        tokens: TokenProvisioner::new(chain.clone()),
        mining: MiningDeployer::new(chain.clone(), exchange.position_manager()),
        pools: PoolInitializer::new(Arc::new(exchange)),
        provisioning: ProvisioningWorkflow::new(chain.clone(), chain.deployer()),
    };

    let deployment = pipeline.run(&plan).await?;
    tracing::info!(program = ?deployment.program, "mining program deployed and provisioned");
    Ok(Deployed {
        exchange: addresses,
        deployment,
    })
}

async fn attach(config: &Config, chain: Chain) -> Result<UniswapV3> {
    match config.exchange {
        ExchangeSetup::Existing { position_manager } => {
            UniswapV3::attach(chain, position_manager).await
        }
        ExchangeSetup::Deploy { .. } => Err(anyhow!(
            "this command needs an already deployed exchange, configure [exchange.existing]"
        )),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PoolReport {
    pool: Address,
    token0: TokenHandle,
    token1: TokenHandle,
    fee: FeeTier,
    #[serde(flatten)]
    state: PoolState,
}

async fn pool_state(
    config: &Config,
    chain: Chain,
    token_a: Address,
    token_b: Address,
    fee: FeeTier,
) -> Result<PoolReport> {
    let exchange = attach(config, chain.clone()).await?;
    let tokens = TokenProvisioner::new(Arc::new(chain));
    let pair = canonicalize(
        tokens.resolve_token(token_a).await?,
        tokens.resolve_token(token_b).await?,
    )?;
    let (pool, state) = PoolInitializer::new(Arc::new(exchange))
        .pool_state(&pair, fee)
        .await?;
    let (token0, token1) = pair.into_tokens();
    Ok(PoolReport {
        pool,
        token0,
        token1,
        fee,
        state,
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Approval {
    owner: Address,
    operator: Address,
    approved: bool,
}

async fn approve_operator(
    config: &Config,
    chain: Chain,
    operator: Address,
    account: usize,
) -> Result<Approval> {
    let owner = chain
        .web3()
        .accounts
        .address(account)
        .with_context(|| format!("account {account} is not loaded"))?;
    let exchange = attach(config, chain).await?;
    let approved = exchange.approve_operator(owner, operator).await?;
    if !approved {
        tracing::warn!(?owner, ?operator, "operator is still not approved");
    }
    Ok(Approval {
        owner,
        operator,
        approved,
    })
}
