//! Table-stakes configuration: blinds, bet sizing, and ante rules.

use serde::{Deserialize, Serialize};

/// Who pays the ante.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnteTarget {
    /// Every dealt-in player posts an ante.
    All,
    /// Only the big blind posts.
    BbOnly,
    /// Only the button posts.
    ButtonOnly,
}

/// Static rules for a table: blind/bet sizes and ante policy.
///
/// `is_fixed_limit` is derived from whether `small_bet`/`big_bet` are set —
/// a no-limit table leaves both at zero and relies on `min_bet` only.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub small_blind: u32,
    pub big_blind: u32,
    /// Fixed-limit bet size for preflop/flop rounds. Zero for no-limit.
    pub small_bet: u32,
    /// Fixed-limit bet size for turn/river rounds. Zero for no-limit.
    pub big_bet: u32,
    /// No-limit minimum opening bet/raise increment. Ignored for fixed-limit.
    pub min_bet: u32,
    pub ante_amt: u32,
    pub ante_target: AnteTarget,
}

impl GameConfig {
    /// No-limit table: minimum bet defaults to the big blind.
    pub fn no_limit(big_blind: u32) -> Self {
        Self::no_limit_with_min(big_blind, big_blind)
    }

    pub fn no_limit_with_min(big_blind: u32, min_bet: u32) -> Self {
        GameConfig {
            small_blind: big_blind / 2,
            big_blind,
            small_bet: 0,
            big_bet: 0,
            min_bet,
            ante_amt: 0,
            ante_target: AnteTarget::All,
        }
    }

    /// Fixed-limit table: small bet equals the big blind, big bet is double.
    pub fn fixed_limit(big_blind: u32) -> Self {
        GameConfig {
            small_blind: big_blind / 2,
            big_blind,
            small_bet: big_blind,
            big_bet: big_blind * 2,
            min_bet: 0,
            ante_amt: 0,
            ante_target: AnteTarget::All,
        }
    }

    pub fn is_fixed_limit(&self) -> bool {
        self.small_bet > 0 || self.big_bet > 0
    }

    pub fn with_ante(mut self, amt: u32, target: AnteTarget) -> Self {
        self.ante_amt = amt;
        self.ante_target = target;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_limit_is_not_fixed_limit() {
        let cfg = GameConfig::no_limit(10);
        assert!(!cfg.is_fixed_limit());
        assert_eq!(cfg.small_blind, 5);
        assert_eq!(cfg.min_bet, 10);
    }

    #[test]
    fn fixed_limit_sets_both_bet_sizes() {
        let cfg = GameConfig::fixed_limit(10);
        assert!(cfg.is_fixed_limit());
        assert_eq!(cfg.small_bet, 10);
        assert_eq!(cfg.big_bet, 20);
    }

    #[test]
    fn serde_round_trip() {
        let cfg = GameConfig::no_limit(20).with_ante(1, AnteTarget::ButtonOnly);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
