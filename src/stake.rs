//! Stake records and owner portfolios decoded from contract return values.

use ethers::{
    types::{Address, U256, U64},
    utils::format_units,
};

/// Return shape of `stakes(uint256)`. The level is decoded wide so that an
/// out-of-range value is rejected instead of truncated.
pub type StakeTuple = (Address, U256, U256, bool);

/// Return shape of `getAllNFTsStatus(address)`.
pub type StatusTuple = (Vec<U256>, Vec<U256>, Vec<U256>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeRecord {
    pub owner: Address,
    pub staked_at_block: U256,
    pub level: u8,
    pub staked: bool,
}

impl TryFrom<StakeTuple> for StakeRecord {
    type Error = String;

    fn try_from((owner, staked_at_block, level, staked): StakeTuple) -> Result<Self, String> {
        let level = u8::try_from(level).map_err(|_| format!("level {level} does not fit uint8"))?;
        Ok(Self {
            owner,
            staked_at_block,
            level,
            staked,
        })
    }
}

impl StakeRecord {
    /// The contract returns an all-zero record for tokens it has never seen.
    pub fn is_vacant(&self) -> bool {
        self.owner.is_zero() && self.staked_at_block.is_zero() && self.level == 0 && !self.staked
    }

    /// Blocks between `staked_at_block` and `height`, or `None` when the
    /// record claims a block the node has not reached yet.
    pub fn blocks_since(&self, height: U64) -> Option<U256> {
        U256::from(height.as_u64()).checked_sub(self.staked_at_block)
    }
}

/// NFTs held by one owner, split by staking state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerPortfolio {
    pub all: Vec<U256>,
    pub staked: Vec<U256>,
    pub unstaked: Vec<U256>,
    pub total_pending_reward: U256,
}

impl OwnerPortfolio {
    pub fn new((all, staked, unstaked): StatusTuple, total_pending_reward: U256) -> Self {
        Self {
            all,
            staked,
            unstaked,
            total_pending_reward,
        }
    }
}

/// Renders a raw token amount with four fractional digits, truncated.
pub fn format_token_amount(amount: U256, decimals: u32) -> String {
    let full = match format_units(amount, decimals) {
        Ok(s) => s,
        Err(_) => return amount.to_string(),
    };
    match full.split_once('.') {
        Some((whole, frac)) => {
            let mut frac: String = frac.chars().take(4).collect();
            while frac.len() < 4 {
                frac.push('0');
            }
            format!("{whole}.{frac}")
        }
        None => format!("{full}.0000"),
    }
}

/// Comma-separated token ids, or `-` when there are none.
pub(crate) fn join_ids(ids: &[U256]) -> String {
    if ids.is_empty() {
        return "-".to_string();
    }
    ids.iter().map(U256::to_string).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(block: u64) -> StakeRecord {
        StakeRecord::try_from((
            Address::from_low_u64_be(0xabc),
            U256::from(block),
            U256::from(3),
            true,
        ))
        .unwrap()
    }

    #[test]
    fn elapsed_blocks_from_height() {
        assert_eq!(record(900).blocks_since(U64::from(1000)), Some(U256::from(100)));
        assert_eq!(record(1000).blocks_since(U64::from(1000)), Some(U256::zero()));
    }

    #[test]
    fn future_stake_block_has_no_elapsed_count() {
        assert_eq!(record(1001).blocks_since(U64::from(1000)), None);
    }

    #[test]
    fn level_above_uint8_is_rejected() {
        let err = StakeRecord::try_from((Address::zero(), U256::zero(), U256::from(300), true))
            .unwrap_err();
        assert!(err.contains("300"));
    }

    #[test]
    fn zero_record_is_vacant() {
        let empty =
            StakeRecord::try_from((Address::zero(), U256::zero(), U256::zero(), false)).unwrap();
        assert!(empty.is_vacant());
        assert!(!record(900).is_vacant());
    }

    #[test]
    fn amounts_keep_four_truncated_decimals() {
        let one_and_a_half = U256::exp10(18) * 3 / 2;
        assert_eq!(format_token_amount(one_and_a_half, 18), "1.5000");
        assert_eq!(format_token_amount(U256::from(123_456_789u64), 6), "123.4567");
        assert_eq!(format_token_amount(U256::zero(), 18), "0.0000");
    }

    #[test]
    fn ids_are_comma_separated() {
        assert_eq!(join_ids(&[U256::from(1), U256::from(7)]), "1, 7");
        assert_eq!(join_ids(&[]), "-");
    }
}
