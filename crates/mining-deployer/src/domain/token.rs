use {
    super::{
        Error,
        eth::{Address, TokenHandle},
    },
    crate::traits::TokenFactory,
    std::sync::Arc,
    tracing::instrument,
};

/// Where a token used by the run comes from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TokenSource {
    /// Deploy a fresh test token owned by the deployer.
    Deploy {
        name: String,
        symbol: String,
        decimals: u8,
    },
    /// Use a token that is already deployed.
    Existing(Address),
}

pub struct TokenProvisioner {
    factory: Arc<dyn TokenFactory>,
}

impl TokenProvisioner {
    pub fn new(factory: Arc<dyn TokenFactory>) -> Self {
        Self { factory }
    }

    /// Deploys a token and waits for the deployment to be confirmed.
    #[instrument(skip(self))]
    pub async fn deploy_token(
        &self,
        name: &str,
        symbol: &str,
        decimals: u8,
    ) -> Result<TokenHandle, Error> {
        let address = self
            .factory
            .create_token(name, symbol, decimals)
            .await
            .map_err(|source| Error::Deployment {
                contract: format!("token {symbol}"),
                source,
            })?;
        tracing::info!(?address, "deployed token");
        Ok(TokenHandle {
            address,
            name: name.to_owned(),
            symbol: symbol.to_owned(),
            decimals,
        })
    }

    /// Attaches to a deployed token by reading its metadata.
    #[instrument(skip(self))]
    pub async fn resolve_token(&self, address: Address) -> Result<TokenHandle, Error> {
        let token = self
            .factory
            .token(address)
            .await
            .map_err(|source| Error::Deployment {
                contract: format!("token {address}"),
                source,
            })?;
        tracing::debug!(symbol = %token.symbol, "resolved token");
        Ok(token)
    }

    pub async fn provision(&self, source: &TokenSource) -> Result<TokenHandle, Error> {
        match source {
            TokenSource::Deploy {
                name,
                symbol,
                decimals,
            } => self.deploy_token(name, symbol, *decimals).await,
            TokenSource::Existing(address) => self.resolve_token(*address).await,
        }
    }
}
