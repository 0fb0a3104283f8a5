use {
    super::Chain,
    crate::{
        domain::eth::{Address, B256, TokenHandle, U256},
        traits::{TokenFactory, TokenLedger},
    },
    anyhow::Result,
    contracts::alloy::TestToken,
    ethrpc::alloy::errors::ContractResultExt,
};

impl Chain {
    fn token_contract(&self, address: Address) -> TestToken::Instance {
        TestToken::Instance::new(address, self.web3().alloy.clone())
    }
}

#[async_trait::async_trait]
impl TokenFactory for Chain {
    async fn create_token(&self, name: &str, symbol: &str, decimals: u8) -> Result<Address> {
        self.deploy(
            "TestToken",
            &TestToken::TestToken::constructorCall {
                name: name.to_owned(),
                symbol: symbol.to_owned(),
                decimals,
            },
        )
        .await
    }

    async fn token(&self, address: Address) -> Result<TokenHandle> {
        let token = self.token_contract(address);
        let name = token.name().call().await.call_context("name")?;
        let symbol = token.symbol().call().await.call_context("symbol")?;
        let decimals = token.decimals().call().await.call_context("decimals")?;
        Ok(TokenHandle {
            address,
            name,
            symbol,
            decimals,
        })
    }
}

#[async_trait::async_trait]
impl TokenLedger for Chain {
    async fn transfer(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<B256> {
        let tx = self
            .token_contract(token)
            .transfer(to, amount)
            .from(from)
            .into_transaction_request();
        let receipt = self.submit(tx, "transfer").await?;
        Ok(receipt.transaction_hash)
    }

    async fn approve(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<B256> {
        let tx = self
            .token_contract(token)
            .approve(spender, amount)
            .from(owner)
            .into_transaction_request();
        let receipt = self.submit(tx, "approve").await?;
        Ok(receipt.transaction_hash)
    }

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256> {
        self.token_contract(token)
            .balanceOf(owner)
            .call()
            .await
            .call_context("balanceOf")
    }

    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        self.token_contract(token)
            .allowance(owner, spender)
            .call()
            .await
            .call_context("allowance")
    }
}
