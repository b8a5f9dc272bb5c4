//! Read-only staking queries against the ship NFT game contract.

pub mod abi;
pub mod chain;
pub mod config;
pub mod error;
pub mod runner;
pub mod stake;

pub use config::{Cli, QueryConfig};
pub use error::{QueryError, Result};
pub use runner::{QueryReport, QueryRunner};
pub use stake::{OwnerPortfolio, StakeRecord};
