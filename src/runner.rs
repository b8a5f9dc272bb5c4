//! The fixed query sequence and its printed report.

use std::{io::Write, sync::Arc};

use ethers::{
    providers::Middleware,
    types::{U256, U64},
    utils::to_checksum,
};
use tracing::{info, warn};

use crate::{
    abi::{self, OWNER_METHODS, TOKEN_METHODS},
    chain::{self, StakingContract},
    config::QueryConfig,
    error::Result,
    stake::{format_token_amount, join_ids, OwnerPortfolio, StakeRecord},
};

/// Values gathered by one run, in the order they were printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryReport {
    pub height: U64,
    pub pending_reward: U256,
    pub stake: StakeRecord,
    /// Height re-read just before computing `blocks_since_staked`.
    pub height_at_elapsed: U64,
    pub blocks_since_staked: U256,
    pub portfolio: Option<OwnerPortfolio>,
}

pub struct QueryRunner<M> {
    client: Arc<M>,
    config: QueryConfig,
}

impl<M: Middleware + 'static> QueryRunner<M> {
    pub fn new(client: Arc<M>, config: QueryConfig) -> Self {
        Self { client, config }
    }

    /// Runs the fixed query sequence and writes the report to `out`.
    ///
    /// Stops at the first failure; lines already written stay written.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<QueryReport> {
        let cfg = &self.config;
        let token_id = cfg.token_id;

        chain::ensure_live(self.client.as_ref(), &cfg.rpc_url).await?;

        let height = chain::block_height(self.client.as_ref(), &cfg.rpc_url).await?;
        writeln!(out, "Current block height: {height}")?;

        let mut required = TOKEN_METHODS.to_vec();
        if cfg.owner.is_some() {
            required.extend_from_slice(OWNER_METHODS);
        }
        let abi = abi::load(&cfg.abi_path, &required)?;
        let contract = StakingContract::bind(cfg.contract, abi, Arc::clone(&self.client));
        info!(contract = ?contract.address(), token_id = %token_id, "querying stake");

        let pending_reward = contract.pending_reward(token_id).await?;
        writeln!(out, "Token ID {token_id} pending reward: {pending_reward}")?;

        let stake = contract.stake_info(token_id).await?;
        if stake.is_vacant() {
            warn!(token_id = %token_id, "contract returned an empty stake record");
        }
        writeln!(out, "StakeInfo for Token ID {token_id}:")?;
        writeln!(out, "Owner: {}", to_checksum(&stake.owner, None))?;
        writeln!(out, "StakedAtBlock: {}", stake.staked_at_block)?;
        writeln!(out, "Level: {}", stake.level)?;
        writeln!(out, "Staked: {}", stake.staked)?;

        // the chain may have advanced since the first read
        let height_at_elapsed = chain::block_height(self.client.as_ref(), &cfg.rpc_url).await?;
        let blocks_since_staked = stake.blocks_since(height_at_elapsed).unwrap_or_else(|| {
            warn!(
                height = %height_at_elapsed,
                staked_at = %stake.staked_at_block,
                "stake block is ahead of the node, reporting 0"
            );
            U256::zero()
        });
        writeln!(out, "Blocks since staked: {blocks_since_staked}")?;

        let portfolio = match cfg.owner {
            Some(owner) => {
                let portfolio = contract.owner_portfolio(owner).await?;
                writeln!(out, "Owner summary for {}:", to_checksum(&owner, None))?;
                writeln!(
                    out,
                    "NFTs: {} (staked: {}, unstaked: {})",
                    portfolio.all.len(),
                    portfolio.staked.len(),
                    portfolio.unstaked.len()
                )?;
                writeln!(out, "Staked token IDs: {}", join_ids(&portfolio.staked))?;
                writeln!(
                    out,
                    "Total pending reward: {} ({})",
                    portfolio.total_pending_reward,
                    format_token_amount(portfolio.total_pending_reward, cfg.decimals)
                )?;
                Some(portfolio)
            }
            None => None,
        };

        Ok(QueryReport {
            height,
            pending_reward,
            stake,
            height_at_elapsed,
            blocks_since_staked,
            portfolio,
        })
    }
}
