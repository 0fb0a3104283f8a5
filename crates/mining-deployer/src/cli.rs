//! CLI arguments for the `mining-deployer` binary.

use {
    crate::domain::eth::Address,
    anyhow::Result,
    clap::{Parser, Subcommand},
    ethrpc::alloy::wallet::{Accounts, DEV_MNEMONIC},
    std::{
        fmt::{self, Display, Formatter},
        path::PathBuf,
    },
    tracing::Level,
};

/// Deploy and configure a liquidity mining program.
#[derive(Parser)]
#[command(version)]
pub struct Args {
    /// The log filter.
    #[arg(long, env, default_value = "warn,mining_deployer=debug,ethrpc=debug")]
    pub log: String,

    /// Only log events at least this severe go to stderr, the others go to
    /// stdout. By default all logs go to stderr and stdout only carries the
    /// JSON result.
    #[arg(long, env)]
    pub stderr_threshold: Option<Level>,

    /// Emit logs as JSON.
    #[arg(long, env)]
    pub use_json_logs: bool,

    /// Path to the deployment configuration file. This file should be in TOML
    /// format.
    #[arg(long, env, default_value = "deploy.toml")]
    pub config: PathBuf,

    /// The configured network to use. May be omitted when only one network
    /// is configured.
    #[arg(long, env)]
    pub network: Option<String>,

    /// BIP-39 mnemonic the signing accounts are derived from. Defaults to the
    /// well-known development mnemonic.
    #[arg(long, env, conflicts_with = "private_key")]
    pub mnemonic: Option<String>,

    /// Sign with this single account instead of mnemonic derived ones.
    #[arg(long, env)]
    pub private_key: Option<String>,

    /// Number of accounts derived from the mnemonic.
    #[arg(long, env, default_value_t = 10)]
    pub accounts: u32,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the pool, deploy the mining program and fund its reward
    /// providers.
    Deploy,

    /// Print the current state of a pool.
    PoolState {
        #[arg(long)]
        token_a: Address,
        #[arg(long)]
        token_b: Address,
        #[arg(long, default_value_t = 3000)]
        fee: u32,
    },

    /// Let an operator, usually a mining program, manage all liquidity
    /// positions of an account.
    ApproveOperator {
        #[arg(long)]
        operator: Address,
        /// Index of the approving account.
        #[arg(long, default_value_t = 0)]
        account: usize,
    },
}

impl Args {
    /// Loads the signing accounts.
    pub fn signers(&self) -> Result<Accounts> {
        match (&self.mnemonic, &self.private_key) {
            (_, Some(key)) => Accounts::from_private_key(key),
            (Some(mnemonic), None) => Accounts::from_mnemonic(mnemonic, self.accounts),
            (None, None) => {
                tracing::warn!("no mnemonic or private key given, using development accounts");
                Accounts::from_mnemonic(DEV_MNEMONIC, self.accounts)
            }
        }
    }
}

impl Display for Args {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            log,
            stderr_threshold,
            use_json_logs,
            config,
            network,
            mnemonic,
            private_key,
            accounts,
            command,
        } = self;

        writeln!(f, "log: {log}")?;
        writeln!(f, "stderr_threshold: {stderr_threshold:?}")?;
        writeln!(f, "use_json_logs: {use_json_logs}")?;
        writeln!(f, "config: {config:?}")?;
        writeln!(f, "network: {network:?}")?;
        writeln!(f, "mnemonic: {}", secret(mnemonic))?;
        writeln!(f, "private_key: {}", secret(private_key))?;
        writeln!(f, "accounts: {accounts}")?;
        writeln!(f, "command: {command:?}")?;
        Ok(())
    }
}

fn secret<T>(option: &Option<T>) -> &'static str {
    match option {
        Some(_) => "SECRET",
        None => "None",
    }
}
