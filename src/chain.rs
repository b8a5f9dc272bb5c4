//! Provider construction and the typed binding over the staking contract.

use std::sync::Arc;

use ethers::{
    abi::{Abi, Detokenize, Tokenize},
    contract::Contract,
    providers::{Http, Middleware, Provider},
    types::{Address, U256, U64},
};
use tracing::{debug, info};

use crate::{
    abi::{ALL_NFTS_STATUS, PENDING_REWARD, STAKES, TOTAL_PENDING_REWARD},
    error::{QueryError, Result},
    stake::{OwnerPortfolio, StakeRecord, StakeTuple, StatusTuple},
};

/// Builds an HTTP provider. Does no network I/O.
pub fn connect(rpc_url: &str) -> Result<Provider<Http>> {
    Provider::<Http>::try_from(rpc_url)
        .map_err(|e| QueryError::Config(format!("RPC URL `{rpc_url}` cannot be used: {e}")))
}

/// Liveness check. Returns the node's client version string.
pub async fn ensure_live<M: Middleware>(client: &M, rpc_url: &str) -> Result<String> {
    let version = client
        .client_version()
        .await
        .map_err(|e| QueryError::Connection {
            url: rpc_url.to_string(),
            reason: e.to_string(),
        })?;
    info!(rpc = %rpc_url, node = %version, "connected");
    Ok(version)
}

pub async fn block_height<M: Middleware>(client: &M, rpc_url: &str) -> Result<U64> {
    client
        .get_block_number()
        .await
        .map_err(|e| QueryError::Connection {
            url: rpc_url.to_string(),
            reason: e.to_string(),
        })
}

/// An (address, ABI) pair bound to a client.
pub struct StakingContract<M> {
    inner: Contract<M>,
}

impl<M: Middleware + 'static> StakingContract<M> {
    pub fn bind(address: Address, abi: Abi, client: Arc<M>) -> Self {
        debug!(contract = ?address, "bound staking contract");
        Self {
            inner: Contract::new(address, abi, client),
        }
    }

    pub fn address(&self) -> Address {
        self.inner.address()
    }

    pub async fn pending_reward(&self, token_id: U256) -> Result<U256> {
        self.view(PENDING_REWARD, token_id).await
    }

    pub async fn stake_info(&self, token_id: U256) -> Result<StakeRecord> {
        let tuple: StakeTuple = self.view(STAKES, token_id).await?;
        StakeRecord::try_from(tuple).map_err(|reason| QueryError::call(STAKES, reason))
    }

    pub async fn owner_portfolio(&self, owner: Address) -> Result<OwnerPortfolio> {
        let status: StatusTuple = self.view(ALL_NFTS_STATUS, owner).await?;
        let total: U256 = self.view(TOTAL_PENDING_REWARD, owner).await?;
        Ok(OwnerPortfolio::new(status, total))
    }

    async fn view<A, D>(&self, method: &'static str, args: A) -> Result<D>
    where
        A: Tokenize,
        D: Detokenize,
    {
        debug!(method, "eth_call");
        self.inner
            .method::<A, D>(method, args)
            .map_err(|e| QueryError::call(method, e))?
            .call()
            .await
            .map_err(|e| QueryError::call(method, e))
    }
}
