pub mod errors;
mod instrumentation;
pub mod wallet;

use {
    crate::AlloyProvider,
    alloy::{
        network::EthereumWallet,
        providers::{Provider, ProviderBuilder},
        rpc::client::ClientBuilder,
    },
    instrumentation::InstrumentationLayer,
    url::Url,
};

/// Creates a provider that signs transactions with the wallet's signers and
/// traces every RPC request it sends.
pub fn provider(url: &Url, wallet: EthereumWallet) -> AlloyProvider {
    let rpc = ClientBuilder::default()
        .layer(InstrumentationLayer)
        .http(url.clone());
    ProviderBuilder::new()
        .wallet(wallet)
        .connect_client(rpc)
        .erased()
}
