//! Ownership adapter that reads the ERC-721 contract directly.
//!
//! `balanceOf` gives the count. When the contract implements the enumerable
//! extension the ids are listed with `tokenOfOwnerByIndex`; otherwise the
//! result carries the count only.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::debug;

use super::client::{ContractCallError, ContractRpcClient};
use crate::domain::ports::{OwnershipSource, OwnershipSourceError, OwnershipSourceKind};
use crate::domain::{ContractAddress, OwnedToken, OwnershipResult, TokenId, WalletAddress};

/// Upper bound on `tokenOfOwnerByIndex` calls per lookup.
pub const DEFAULT_ENUMERATION_LIMIT: u64 = 50;

/// The contract reads enumeration depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub(crate) trait Erc721Reads: Send + Sync {
    async fn balance_of(
        &self,
        contract: &ContractAddress,
        owner: &WalletAddress,
    ) -> Result<u64, ContractCallError>;

    async fn token_of_owner_by_index(
        &self,
        contract: &ContractAddress,
        owner: &WalletAddress,
        index: u64,
    ) -> Result<TokenId, ContractCallError>;
}

#[async_trait]
impl Erc721Reads for ContractRpcClient {
    async fn balance_of(
        &self,
        contract: &ContractAddress,
        owner: &WalletAddress,
    ) -> Result<u64, ContractCallError> {
        ContractRpcClient::balance_of(self, contract, owner).await
    }

    async fn token_of_owner_by_index(
        &self,
        contract: &ContractAddress,
        owner: &WalletAddress,
        index: u64,
    ) -> Result<TokenId, ContractCallError> {
        ContractRpcClient::token_of_owner_by_index(self, contract, owner, index).await
    }
}

/// Direct contract-call ownership source.
pub struct ContractRpcSource {
    reads: Arc<dyn Erc721Reads>,
    enumeration_limit: u64,
}

impl ContractRpcSource {
    /// Wrap a shared RPC client.
    pub fn new(client: Arc<ContractRpcClient>) -> Self {
        Self::from_reads(client)
    }

    pub(crate) fn from_reads(reads: Arc<dyn Erc721Reads>) -> Self {
        Self {
            reads,
            enumeration_limit: DEFAULT_ENUMERATION_LIMIT,
        }
    }

    /// Cap the number of ids listed per lookup. Zero disables listing.
    #[must_use]
    pub fn with_enumeration_limit(mut self, limit: u64) -> Self {
        self.enumeration_limit = limit;
        self
    }
}

#[async_trait]
impl OwnershipSource for ContractRpcSource {
    async fn query_ownership(
        &self,
        owner: &WalletAddress,
        contract: &ContractAddress,
    ) -> Result<OwnershipResult, OwnershipSourceError> {
        let balance = self.reads.balance_of(contract, owner).await?;
        let listed = balance.min(self.enumeration_limit);
        if listed == 0 {
            return Ok(OwnershipResult::count_only(balance));
        }

        let first = match self.reads.token_of_owner_by_index(contract, owner, 0).await {
            Ok(token_id) => token_id,
            Err(ContractCallError::Rpc { code, message }) => {
                debug!(code, %message, "contract is not enumerable; reporting count only");
                return Ok(OwnershipResult::count_only(balance));
            }
            Err(other) => return Err(other.into()),
        };

        let rest = join_all(
            (1..listed).map(|index| self.reads.token_of_owner_by_index(contract, owner, index)),
        )
        .await;

        let mut tokens = Vec::with_capacity(rest.len() + 1);
        tokens.push(OwnedToken::bare(first));
        for token_id in rest {
            tokens.push(OwnedToken::bare(token_id?));
        }
        Ok(OwnershipResult::with_total(tokens, balance))
    }

    fn kind(&self) -> OwnershipSourceKind {
        OwnershipSourceKind::ContractCall
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EvmAddress;
    use crate::outbound::http_support::HttpFailure;
    use rstest::{fixture, rstest};

    #[fixture]
    fn owner() -> WalletAddress {
        EvmAddress::parse("0xabcabcabcabcabcabcabcabcabcabcabcabcabca").expect("valid")
    }

    #[fixture]
    fn contract() -> ContractAddress {
        EvmAddress::parse("0x1234567890123456789012345678901234567890").expect("valid")
    }

    fn run<F: std::future::Future>(future: F) -> F::Output {
        actix_rt::System::new().block_on(future)
    }

    #[rstest]
    fn enumerates_up_to_the_balance(owner: WalletAddress, contract: ContractAddress) {
        let mut reads = MockErc721Reads::new();
        reads.expect_balance_of().return_once(|_, _| Ok(3));
        reads
            .expect_token_of_owner_by_index()
            .times(3)
            .returning(|_, _, index| Ok(TokenId::from_u128(u128::from(index) + 100)));
        let source = ContractRpcSource::from_reads(Arc::new(reads));

        let result = run(source.query_ownership(&owner, &contract)).expect("lookup succeeds");

        let ids: Vec<&str> = result.tokens().iter().map(|t| t.token_id.as_str()).collect();
        assert_eq!(ids, vec!["100", "101", "102"]);
        assert_eq!(result.total_count(), 3);
    }

    #[rstest]
    fn non_enumerable_contracts_report_count_only(owner: WalletAddress, contract: ContractAddress) {
        let mut reads = MockErc721Reads::new();
        reads.expect_balance_of().return_once(|_, _| Ok(4));
        reads
            .expect_token_of_owner_by_index()
            .times(1)
            .returning(|_, _, _| {
                Err(ContractCallError::Rpc {
                    code: 3,
                    message: "execution reverted".to_owned(),
                })
            });
        let source = ContractRpcSource::from_reads(Arc::new(reads));

        let result = run(source.query_ownership(&owner, &contract)).expect("lookup succeeds");

        assert!(result.tokens().is_empty());
        assert_eq!(result.total_count(), 4);
        assert!(!result.is_empty());
    }

    #[rstest]
    fn listing_respects_the_limit(owner: WalletAddress, contract: ContractAddress) {
        let mut reads = MockErc721Reads::new();
        reads.expect_balance_of().return_once(|_, _| Ok(500));
        reads
            .expect_token_of_owner_by_index()
            .times(2)
            .returning(|_, _, index| Ok(TokenId::from_u128(u128::from(index))));
        let source = ContractRpcSource::from_reads(Arc::new(reads)).with_enumeration_limit(2);

        let result = run(source.query_ownership(&owner, &contract)).expect("lookup succeeds");

        assert_eq!(result.tokens().len(), 2);
        assert_eq!(result.total_count(), 500);
        assert!(!result.is_complete());
    }

    #[rstest]
    fn zero_balance_skips_enumeration(owner: WalletAddress, contract: ContractAddress) {
        let mut reads = MockErc721Reads::new();
        reads.expect_balance_of().return_once(|_, _| Ok(0));
        reads.expect_token_of_owner_by_index().never();
        let source = ContractRpcSource::from_reads(Arc::new(reads));

        let result = run(source.query_ownership(&owner, &contract)).expect("lookup succeeds");

        assert!(result.is_empty());
    }

    #[rstest]
    fn balance_transport_failures_propagate(owner: WalletAddress, contract: ContractAddress) {
        let mut reads = MockErc721Reads::new();
        reads.expect_balance_of().return_once(|_, _| {
            Err(ContractCallError::Http(HttpFailure::Timeout {
                message: "deadline".to_owned(),
            }))
        });
        let source = ContractRpcSource::from_reads(Arc::new(reads));

        let error = run(source.query_ownership(&owner, &contract)).expect_err("fails");

        assert_eq!(error, OwnershipSourceError::timeout("deadline"));
    }
}
