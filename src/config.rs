use std::path::PathBuf;

use clap::Parser;
use ethers::types::{Address, U256};

use crate::error::{QueryError, Result};

pub const DEFAULT_RPC_URL: &str = "https://xlayerrpc.okx.com";
pub const DEFAULT_CONTRACT: &str = "0x958253CbAc08F33Fcb672eA8400f384a10fd737C";
pub const DEFAULT_TOKEN_ID: &str = "1";
pub const DEFAULT_ABI_PATH: &str = "game.json";
pub const DEFAULT_DECIMALS: u32 = 18;

/// Query an NFT's staking status and pending reward.
#[derive(Debug, Parser)]
#[command(name = "stake-query", version, about)]
pub struct Cli {
    /// HTTP JSON-RPC endpoint
    #[arg(long, env = "STAKE_QUERY_RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Staking contract address
    #[arg(long, env = "STAKE_QUERY_CONTRACT", default_value = DEFAULT_CONTRACT)]
    pub contract: String,

    /// Token id to query (decimal)
    #[arg(long, env = "STAKE_QUERY_TOKEN_ID", default_value = DEFAULT_TOKEN_ID)]
    pub token_id: String,

    /// Path to the contract ABI JSON
    #[arg(long = "abi", env = "STAKE_QUERY_ABI", default_value = DEFAULT_ABI_PATH)]
    pub abi_path: PathBuf,

    /// Also summarize every NFT held by this owner
    #[arg(long, env = "STAKE_QUERY_OWNER")]
    pub owner: Option<String>,

    /// Decimals of the reward token, used for the formatted total
    #[arg(long, env = "STAKE_QUERY_DECIMALS", default_value_t = DEFAULT_DECIMALS)]
    pub decimals: u32,
}

/// Validated settings handed to the runner.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub rpc_url: String,
    pub contract: Address,
    pub token_id: U256,
    pub abi_path: PathBuf,
    pub owner: Option<Address>,
    pub decimals: u32,
}

impl Cli {
    pub fn into_config(self) -> Result<QueryConfig> {
        let contract = parse_address("contract", &self.contract)?;
        let owner = self
            .owner
            .as_deref()
            .map(|o| parse_address("owner", o))
            .transpose()?;

        // U256::from_str reads hex, token ids are given in decimal
        let token_id = U256::from_dec_str(self.token_id.trim())
            .map_err(|e| QueryError::Config(format!("token id `{}`: {e}", self.token_id)))?;

        if self.decimals > 77 {
            return Err(QueryError::Config(format!(
                "decimals {} exceeds the uint256 range",
                self.decimals
            )));
        }

        Ok(QueryConfig {
            rpc_url: self.rpc_url,
            contract,
            token_id,
            abi_path: self.abi_path,
            owner,
            decimals: self.decimals,
        })
    }
}

fn parse_address(field: &str, raw: &str) -> Result<Address> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| QueryError::Config(format!("{field} address `{raw}`: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Built by hand so STAKE_QUERY_* variables in the test environment
    // cannot leak into the values under test.
    fn cli() -> Cli {
        Cli {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            contract: DEFAULT_CONTRACT.to_string(),
            token_id: DEFAULT_TOKEN_ID.to_string(),
            abi_path: PathBuf::from(DEFAULT_ABI_PATH),
            owner: None,
            decimals: DEFAULT_DECIMALS,
        }
    }

    #[test]
    fn defaults_are_valid() {
        let config = cli().into_config().unwrap();

        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.contract, DEFAULT_CONTRACT.parse::<Address>().unwrap());
        assert_eq!(config.token_id, U256::one());
        assert_eq!(config.abi_path, PathBuf::from(DEFAULT_ABI_PATH));
        assert!(config.owner.is_none());
        assert_eq!(config.decimals, 18);
    }

    #[test]
    fn every_flag_is_wired() {
        // each flag is given explicitly, so no env fallback applies
        let parsed = Cli::try_parse_from([
            "stake-query",
            "--rpc-url",
            "http://localhost:8545",
            "--contract",
            DEFAULT_CONTRACT,
            "--token-id",
            "10",
            "--abi",
            "abi/game.json",
            "--owner",
            "0x00000000000000000000000000000000000000aB",
            "--decimals",
            "6",
        ])
        .unwrap();
        let config = parsed.into_config().unwrap();

        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert_eq!(config.token_id, U256::from(10));
        assert_eq!(config.abi_path, PathBuf::from("abi/game.json"));
        assert_eq!(config.owner, Some(Address::from_low_u64_be(0xab)));
        assert_eq!(config.decimals, 6);
    }

    #[test]
    fn token_id_is_decimal() {
        let config = Cli {
            token_id: "255".into(),
            ..cli()
        }
        .into_config()
        .unwrap();
        assert_eq!(config.token_id, U256::from(255u64));
    }

    #[test]
    fn rejects_bad_contract_address() {
        let err = Cli {
            contract: "0x1234".into(),
            ..cli()
        }
        .into_config()
        .unwrap_err();
        assert!(matches!(err, QueryError::Config(msg) if msg.contains("contract")));
    }

    #[test]
    fn rejects_bad_owner_address() {
        let err = Cli {
            owner: Some("not-an-address".into()),
            ..cli()
        }
        .into_config()
        .unwrap_err();
        assert!(matches!(err, QueryError::Config(msg) if msg.contains("owner")));
    }

    #[test]
    fn rejects_non_numeric_token_id() {
        let err = Cli {
            token_id: "abc".into(),
            ..cli()
        }
        .into_config()
        .unwrap_err();
        assert!(matches!(err, QueryError::Config(_)));
    }

    #[test]
    fn rejects_decimals_past_uint256() {
        let err = Cli {
            decimals: 78,
            ..cli()
        }
        .into_config()
        .unwrap_err();
        assert!(matches!(err, QueryError::Config(msg) if msg.contains("78")));
    }
}
