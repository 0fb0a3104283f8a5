pub mod alloy;

use {
    self::alloy::wallet::Accounts,
    ::alloy::providers::DynProvider,
    url::Url,
};

pub type AlloyProvider = DynProvider;

/// Connection to a node together with the accounts that may sign
/// transactions sent through it.
#[derive(Debug, Clone)]
pub struct Web3 {
    pub alloy: AlloyProvider,
    pub accounts: Accounts,
}

impl Web3 {
    pub fn new(url: &Url, accounts: Accounts) -> Self {
        Self {
            alloy: self::alloy::provider(url, accounts.wallet()),
            accounts,
        }
    }
}
