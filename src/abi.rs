//! Loading and checking the contract interface definition.

use std::{fs, path::Path};

use ethers::abi::{Abi, StateMutability};
use serde_json::Value;
use tracing::debug;

use crate::error::{QueryError, Result};

pub const PENDING_REWARD: &str = "pendingReward";
pub const STAKES: &str = "stakes";
pub const ALL_NFTS_STATUS: &str = "getAllNFTsStatus";
pub const TOTAL_PENDING_REWARD: &str = "getTotalPendingReward";

/// Methods the runner calls for a single token.
pub const TOKEN_METHODS: &[&str] = &[PENDING_REWARD, STAKES];
/// Extra methods needed for the owner summary.
pub const OWNER_METHODS: &[&str] = &[ALL_NFTS_STATUS, TOTAL_PENDING_REWARD];

/// Reads the ABI at `path` and checks that every name in `required` is a
/// read-only function.
///
/// Accepts either a bare ABI array or a compiler artifact carrying the ABI
/// under an `"abi"` key.
pub fn load(path: &Path, required: &[&str]) -> Result<Abi> {
    let raw = fs::read_to_string(path).map_err(|source| QueryError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let abi = parse(&raw).map_err(|reason| QueryError::Parse {
        path: path.to_path_buf(),
        reason,
    })?;

    ensure_read_only(&abi, required).map_err(|reason| QueryError::Parse {
        path: path.to_path_buf(),
        reason,
    })?;

    debug!(
        path = %path.display(),
        functions = abi.functions.len(),
        "loaded interface definition"
    );
    Ok(abi)
}

fn parse(raw: &str) -> Result<Abi, String> {
    let value: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    let value = match value {
        Value::Object(mut artifact) => artifact
            .remove("abi")
            .ok_or_else(|| "expected an ABI array or an artifact with an `abi` field".to_string())?,
        other => other,
    };
    serde_json::from_value(value).map_err(|e| e.to_string())
}

fn ensure_read_only(abi: &Abi, required: &[&str]) -> Result<(), String> {
    for name in required {
        let overloads = abi
            .functions
            .get(*name)
            .ok_or_else(|| format!("method `{name}` is not declared"))?;

        if let Some(f) = overloads.iter().find(|f| {
            !matches!(f.state_mutability, StateMutability::View | StateMutability::Pure)
        }) {
            return Err(format!(
                "method `{}` is {:?}, only view or pure methods may be called",
                f.name, f.state_mutability
            ));
        }
    }
    Ok(())
}
