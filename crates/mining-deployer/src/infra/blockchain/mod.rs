//! On-chain implementations of the collaborator traits.

pub mod exchange;
mod mining;
mod tokens;

use {
    alloy::{
        network::TransactionBuilder,
        primitives::Address,
        providers::Provider,
        rpc::types::{TransactionReceipt, TransactionRequest},
        sol_types::SolConstructor,
    },
    anyhow::{Context, Result},
    contracts::Artifacts,
    ethrpc::Web3,
    std::time::Duration,
};

/// How transactions are priced and when they count as confirmed.
#[derive(Clone, Debug)]
pub struct TxSettings {
    /// Fixed gas limit. Estimated per transaction when unset.
    pub gas_limit: Option<u64>,
    /// Legacy gas price in wei. Estimated per transaction when unset.
    pub gas_price: Option<u128>,
    pub confirmations: u64,
    /// Give up waiting for a receipt after this long.
    pub confirmation_timeout: Option<Duration>,
}

impl Default for TxSettings {
    fn default() -> Self {
        Self {
            gas_limit: None,
            gas_price: None,
            confirmations: 1,
            confirmation_timeout: None,
        }
    }
}

/// A node connection able to sign for the loaded accounts, plus the compiled
/// contracts it can deploy.
#[derive(Clone, Debug)]
pub struct Chain {
    web3: Web3,
    artifacts: Artifacts,
    settings: TxSettings,
}

impl Chain {
    /// Connects to the node and makes sure it serves the expected chain.
    pub async fn connect(
        web3: Web3,
        artifacts: Artifacts,
        settings: TxSettings,
        chain_id: Option<u64>,
    ) -> Result<Self> {
        let actual = web3
            .alloy
            .get_chain_id()
            .await
            .context("failed to fetch chain id")?;
        if let Some(expected) = chain_id {
            anyhow::ensure!(
                actual == expected,
                "node serves chain {actual} but chain {expected} is configured"
            );
        }
        tracing::info!(
            chain_id = actual,
            deployer = ?web3.accounts.deployer(),
            "connected to node"
        );
        Ok(Self {
            web3,
            artifacts,
            settings,
        })
    }

    pub fn web3(&self) -> &Web3 {
        &self.web3
    }

    /// The account deploying contracts and funding reward providers.
    pub fn deployer(&self) -> Address {
        self.web3.accounts.deployer()
    }

    /// Sends a transaction and waits until it is confirmed. Reverted
    /// transactions are errors. `what` names the transaction in logs and
    /// errors.
    pub async fn submit(
        &self,
        mut tx: TransactionRequest,
        what: &str,
    ) -> Result<TransactionReceipt> {
        if let Some(gas_limit) = self.settings.gas_limit {
            tx = tx.with_gas_limit(gas_limit);
        }
        if let Some(gas_price) = self.settings.gas_price {
            tx = tx.with_gas_price(gas_price);
        }

        let pending = self
            .web3
            .alloy
            .send_transaction(tx)
            .await
            .with_context(|| format!("failed to send {what} transaction"))?;
        tracing::debug!(tx_hash = ?pending.tx_hash(), what, "submitted transaction");

        let receipt = pending
            .with_required_confirmations(self.settings.confirmations)
            .with_timeout(self.settings.confirmation_timeout)
            .get_receipt()
            .await
            .with_context(|| format!("failed to get {what} receipt"))?;
        anyhow::ensure!(
            receipt.status(),
            "{what} transaction reverted: {:?}",
            receipt.transaction_hash
        );
        tracing::debug!(
            tx_hash = ?receipt.transaction_hash,
            block = ?receipt.block_number,
            gas_used = receipt.gas_used,
            what,
            "transaction confirmed"
        );
        Ok(receipt)
    }

    /// Deploys the `contract` artifact from the deployer account.
    pub async fn deploy<C: SolConstructor>(
        &self,
        contract: &str,
        constructor: &C,
    ) -> Result<Address> {
        let code = self.artifacts.deploy_code(contract, constructor)?;
        let tx = TransactionRequest::default()
            .from(self.deployer())
            .with_deploy_code(code);
        let receipt = self.submit(tx, contract).await?;
        let address = receipt
            .contract_address
            .with_context(|| format!("{contract} deployment receipt has no contract address"))?;
        tracing::debug!(?address, contract, "contract deployed");
        Ok(address)
    }
}
