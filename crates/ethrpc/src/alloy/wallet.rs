use {
    alloy::{
        network::EthereumWallet,
        primitives::Address,
        signers::local::{MnemonicBuilder, PrivateKeySigner, coins_bip39::English},
    },
    anyhow::{Context, Result},
    std::fmt,
};

/// Mnemonic of the well-known development accounts funded by hardhat and
/// anvil nodes.
pub const DEV_MNEMONIC: &str = "test test test test test test test test test test test junk";

/// Ordered set of signing accounts. Account `0` is the default sender.
#[derive(Clone)]
pub struct Accounts {
    signers: Vec<PrivateKeySigner>,
}

impl Accounts {
    /// Derives the first `count` accounts of a BIP-39 mnemonic along the
    /// standard `m/44'/60'/0'/0/{index}` path.
    pub fn from_mnemonic(phrase: &str, count: u32) -> Result<Self> {
        anyhow::ensure!(count > 0, "at least one account must be derived");
        let signers = (0..count)
            .map(|index| {
                MnemonicBuilder::<English>::default()
                    .phrase(phrase)
                    .index(index)?
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()
            // Not including the error details as they could leak the phrase.
            .context("invalid mnemonic")?;
        Ok(Self { signers })
    }

    pub fn from_private_key(key: &str) -> Result<Self> {
        let signer = key
            .trim()
            .parse::<PrivateKeySigner>()
            .map_err(|_| anyhow::anyhow!("invalid private key"))?;
        Ok(Self {
            signers: vec![signer],
        })
    }

    /// The accounts of a local development node.
    pub fn dev() -> Self {
        Self::from_mnemonic(DEV_MNEMONIC, 10).expect("dev mnemonic is valid")
    }

    /// Address of the account that deploys contracts and funds providers.
    pub fn deployer(&self) -> Address {
        self.signers[0].address()
    }

    pub fn address(&self, index: usize) -> Option<Address> {
        self.signers.get(index).map(PrivateKeySigner::address)
    }

    /// Number of loaded accounts, never zero.
    pub fn count(&self) -> usize {
        self.signers.len()
    }

    /// Wallet able to sign for every account, defaulting to the deployer.
    pub fn wallet(&self) -> EthereumWallet {
        let mut signers = self.signers.iter().cloned();
        let mut wallet = EthereumWallet::new(signers.next().expect("at least one signer"));
        for signer in signers {
            wallet.register_signer(signer);
        }
        wallet
    }
}

impl fmt::Debug for Accounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.signers.iter().map(PrivateKeySigner::address))
            .finish()
    }
}
