use {
    super::{
        Error,
        MiningProgram,
        ProvisioningStep,
        RewardStreamDescriptor,
        eth::{Address, B256, U256},
    },
    crate::traits::TokenLedger,
    serde::Serialize,
    std::sync::Arc,
    tracing::instrument,
};

/// A funded and authorized reward stream.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Provisioned {
    pub index: usize,
    pub token: Address,
    pub provider: Address,
    pub amount: U256,
    /// Transaction moving the budget to the provider.
    pub transfer: B256,
    /// Transaction allowing the program to pull the budget.
    pub approval: B256,
}

/// Funds reward providers from the funder's balance and has them authorize
/// the mining program.
pub struct ProvisioningWorkflow {
    ledger: Arc<dyn TokenLedger>,
    funder: Address,
}

impl ProvisioningWorkflow {
    pub fn new(ledger: Arc<dyn TokenLedger>, funder: Address) -> Self {
        Self { ledger, funder }
    }

    /// Transfers `amount` of the stream's reward token to its provider, then
    /// approves `program` for exactly `amount` from the provider's account.
    #[instrument(skip_all, fields(
        index = index,
        token = ?descriptor.reward_token.address,
        provider = ?descriptor.provider,
        %amount,
    ))]
    pub async fn provision(
        &self,
        program: &MiningProgram,
        index: usize,
        descriptor: &RewardStreamDescriptor,
        amount: U256,
    ) -> Result<Provisioned, Error> {
        let token = descriptor.reward_token.address;
        let provider = descriptor.provider;
        let failed = |step| {
            move |source| Error::Provisioning {
                index,
                token,
                provider,
                step,
                source,
            }
        };

        let transfer = self
            .fund(token, provider, amount)
            .await
            .map_err(failed(ProvisioningStep::Transfer))?;
        tracing::debug!(?transfer, "funded provider");

        let approval = self
            .authorize(token, provider, program.address, amount)
            .await
            .map_err(failed(ProvisioningStep::Approve))?;
        tracing::debug!(?approval, "provider approved program");

        Ok(Provisioned {
            index,
            token,
            provider,
            amount,
            transfer,
            approval,
        })
    }

    /// Tokens may signal a failed transfer by returning `false` instead of
    /// reverting, so the transfer is judged by the provider's balance.
    async fn fund(&self, token: Address, provider: Address, amount: U256) -> anyhow::Result<B256> {
        let before = self.ledger.balance_of(token, provider).await?;
        let tx = self
            .ledger
            .transfer(token, self.funder, provider, amount)
            .await?;
        let after = self.ledger.balance_of(token, provider).await?;

        // Funding itself leaves the balance unchanged.
        let expected = if provider == self.funder {
            U256::ZERO
        } else {
            amount
        };
        anyhow::ensure!(
            after.checked_sub(before) == Some(expected),
            "provider balance went from {before} to {after} in {tx:?}, expected an increase of \
             {expected}"
        );
        Ok(tx)
    }

    async fn authorize(
        &self,
        token: Address,
        provider: Address,
        program: Address,
        amount: U256,
    ) -> anyhow::Result<B256> {
        let tx = self
            .ledger
            .approve(token, provider, program, amount)
            .await?;
        let allowance = self.ledger.allowance(token, provider, program).await?;
        anyhow::ensure!(
            allowance == amount,
            "allowance is {allowance} after {tx:?}, expected {amount}"
        );
        Ok(tx)
    }

    /// Provisions every stream in order, one after the other. Stops at the
    /// first failure; streams provisioned before it stay provisioned.
    pub async fn provision_all(
        &self,
        program: &MiningProgram,
        streams: &[(RewardStreamDescriptor, U256)],
    ) -> Result<Vec<Provisioned>, Error> {
        let mut provisioned = Vec::with_capacity(streams.len());
        for (index, (descriptor, amount)) in streams.iter().enumerate() {
            provisioned.push(self.provision(program, index, descriptor, *amount).await?);
        }
        Ok(provisioned)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{domain::eth::TokenHandle, traits::MockTokenLedger},
        alloy::primitives::address,
        anyhow::anyhow,
        mockall::{Sequence, predicate::eq},
        std::{collections::HashMap, sync::Mutex},
    };

    const FUNDER: Address = address!("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266");
    const PROGRAM: MiningProgram = MiningProgram {
        address: address!("0x9999999999999999999999999999999999999999"),
    };

    fn descriptor(token: u8, provider: u8) -> RewardStreamDescriptor {
        RewardStreamDescriptor::new(
            TokenHandle {
                address: Address::repeat_byte(token),
                name: String::new(),
                symbol: String::new(),
                decimals: 18,
            },
            Address::with_last_byte(provider),
            U256::from(30_000_000_000_000u64),
        )
    }

    fn budget() -> U256 {
        U256::from(10).pow(U256::from(24))
    }

    type Entries = Arc<Mutex<HashMap<(Address, Address), U256>>>;

    /// Token state keyed by `(token, account)`, updated by the mocked writes
    /// that are meant to succeed and served to the balance and allowance
    /// reads.
    #[derive(Clone, Default)]
    struct Book {
        balances: Entries,
        allowances: Entries,
    }

    impl Book {
        fn credit(&self, token: Address, owner: Address, amount: U256) {
            *self
                .balances
                .lock()
                .unwrap()
                .entry((token, owner))
                .or_default() += amount;
        }

        fn allow(&self, token: Address, owner: Address, amount: U256) {
            self.allowances
                .lock()
                .unwrap()
                .insert((token, owner), amount);
        }

        fn serve_reads(&self, ledger: &mut MockTokenLedger) {
            let balances = self.balances.clone();
            ledger.expect_balance_of().returning(move |token, owner| {
                Ok(balances
                    .lock()
                    .unwrap()
                    .get(&(token, owner))
                    .copied()
                    .unwrap_or_default())
            });
            let allowances = self.allowances.clone();
            ledger
                .expect_allowance()
                .withf(|_, _, spender| *spender == PROGRAM.address)
                .returning(move |token, owner, _| {
                    Ok(allowances
                        .lock()
                        .unwrap()
                        .get(&(token, owner))
                        .copied()
                        .unwrap_or_default())
                });
        }
    }

    #[tokio::test]
    async fn allowance_equals_transferred_amount() {
        let d = descriptor(0xaa, 4);
        let book = Book::default();
        // Balances held before provisioning do not count.
        book.credit(Address::repeat_byte(0xaa), Address::with_last_byte(4), U256::from(7));

        let mut ledger = MockTokenLedger::new();
        let mut seq = Sequence::new();
        let transfers = book.clone();
        ledger
            .expect_transfer()
            .times(1)
            .in_sequence(&mut seq)
            .with(
                eq(Address::repeat_byte(0xaa)),
                eq(FUNDER),
                eq(Address::with_last_byte(4)),
                eq(budget()),
            )
            .returning(move |token, _, to, amount| {
                transfers.credit(token, to, amount);
                Ok(B256::repeat_byte(1))
            });
        let approvals = book.clone();
        ledger
            .expect_approve()
            .times(1)
            .in_sequence(&mut seq)
            .with(
                eq(Address::repeat_byte(0xaa)),
                eq(Address::with_last_byte(4)),
                eq(PROGRAM.address),
                eq(budget()),
            )
            .returning(move |token, owner, _, amount| {
                approvals.allow(token, owner, amount);
                Ok(B256::repeat_byte(2))
            });
        book.serve_reads(&mut ledger);

        let workflow = ProvisioningWorkflow::new(Arc::new(ledger), FUNDER);
        let provisioned = workflow.provision(&PROGRAM, 0, &d, budget()).await.unwrap();
        assert_eq!(
            provisioned,
            Provisioned {
                index: 0,
                token: Address::repeat_byte(0xaa),
                provider: Address::with_last_byte(4),
                amount: budget(),
                transfer: B256::repeat_byte(1),
                approval: B256::repeat_byte(2),
            }
        );
    }

    #[tokio::test]
    async fn stops_at_first_failure() {
        let streams = [
            (descriptor(0xa0, 4), budget()),
            (descriptor(0xa1, 5), budget()),
            (descriptor(0xa2, 6), budget()),
        ];
        let book = Book::default();

        let mut ledger = MockTokenLedger::new();
        let mut seq = Sequence::new();
        for token in [0xa0, 0xa1] {
            let transfers = book.clone();
            ledger
                .expect_transfer()
                .times(1)
                .in_sequence(&mut seq)
                .withf(move |t, _, _, _| *t == Address::repeat_byte(token))
                .returning(move |token, _, to, amount| {
                    transfers.credit(token, to, amount);
                    Ok(B256::repeat_byte(1))
                });
            let approvals = book.clone();
            ledger
                .expect_approve()
                .times(1)
                .in_sequence(&mut seq)
                .withf(move |t, _, _, _| *t == Address::repeat_byte(token))
                .returning(move |token, owner, _, amount| {
                    if token == Address::repeat_byte(0xa1) {
                        return Err(anyhow!("execution reverted"));
                    }
                    approvals.allow(token, owner, amount);
                    Ok(B256::repeat_byte(2))
                });
        }
        // Nothing is expected for the third stream.
        book.serve_reads(&mut ledger);

        let workflow = ProvisioningWorkflow::new(Arc::new(ledger), FUNDER);
        let err = workflow.provision_all(&PROGRAM, &streams).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Provisioning { index: 1, token, provider, step: ProvisioningStep::Approve, .. }
                if token == Address::repeat_byte(0xa1) && provider == Address::with_last_byte(5)
        ));
    }

    #[tokio::test]
    async fn failed_transfer_skips_approval() {
        let mut ledger = MockTokenLedger::new();
        ledger
            .expect_transfer()
            .times(1)
            .returning(|_, _, _, _| Err(anyhow!("insufficient balance")));
        ledger.expect_approve().never();
        Book::default().serve_reads(&mut ledger);

        let workflow = ProvisioningWorkflow::new(Arc::new(ledger), FUNDER);
        let err = workflow
            .provision(&PROGRAM, 0, &descriptor(0xaa, 4), budget())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Provisioning {
                step: ProvisioningStep::Transfer,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn transfer_without_effect_is_a_failure() {
        // A token returning `false` from `transfer` confirms without moving funds.
        let mut ledger = MockTokenLedger::new();
        ledger
            .expect_transfer()
            .times(1)
            .returning(|_, _, _, _| Ok(B256::repeat_byte(1)));
        ledger.expect_approve().never();
        Book::default().serve_reads(&mut ledger);

        let workflow = ProvisioningWorkflow::new(Arc::new(ledger), FUNDER);
        let err = workflow
            .provision(&PROGRAM, 0, &descriptor(0xaa, 4), budget())
            .await
            .unwrap_err();
        match err {
            Error::Provisioning {
                step: ProvisioningStep::Transfer,
                source,
                ..
            } => assert!(
                source
                    .to_string()
                    .contains(&format!("expected an increase of {}", budget()))
            ),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn approval_without_effect_is_a_failure() {
        let book = Book::default();
        let mut ledger = MockTokenLedger::new();
        let transfers = book.clone();
        ledger
            .expect_transfer()
            .times(1)
            .returning(move |token, _, to, amount| {
                transfers.credit(token, to, amount);
                Ok(B256::repeat_byte(1))
            });
        ledger
            .expect_approve()
            .times(1)
            .returning(|_, _, _, _| Ok(B256::repeat_byte(2)));
        book.serve_reads(&mut ledger);

        let workflow = ProvisioningWorkflow::new(Arc::new(ledger), FUNDER);
        let err = workflow
            .provision(&PROGRAM, 0, &descriptor(0xaa, 4), budget())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Provisioning {
                step: ProvisioningStep::Approve,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn funder_can_provide_rewards_itself() {
        let book = Book::default();
        book.credit(Address::repeat_byte(0xaa), FUNDER, budget());

        let mut ledger = MockTokenLedger::new();
        ledger
            .expect_transfer()
            .times(1)
            .with(
                eq(Address::repeat_byte(0xaa)),
                eq(FUNDER),
                eq(FUNDER),
                eq(budget()),
            )
            .returning(|_, _, _, _| Ok(B256::repeat_byte(1)));
        let approvals = book.clone();
        ledger
            .expect_approve()
            .times(1)
            .returning(move |token, owner, _, amount| {
                approvals.allow(token, owner, amount);
                Ok(B256::repeat_byte(2))
            });
        book.serve_reads(&mut ledger);

        let mut d = descriptor(0xaa, 0);
        d.provider = FUNDER;
        let workflow = ProvisioningWorkflow::new(Arc::new(ledger), FUNDER);
        let provisioned = workflow.provision(&PROGRAM, 0, &d, budget()).await.unwrap();
        assert_eq!(provisioned.provider, FUNDER);
    }
}
