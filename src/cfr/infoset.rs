//! Per-information-set regrets and the strategy derived from them.

use crate::action::Action;
use std::collections::HashMap;

pub type Strategy = HashMap<Action, f64>;

/// One decision point for one player, identified by everything that player
/// can observe (hole cards, community, current-round betting history).
#[derive(Clone, Debug)]
pub struct InfoSet {
    pub key: String,
    pub player: usize,
    actions: Vec<Action>,
    pub regrets: HashMap<Action, f64>,
    pub strategy_sum: HashMap<Action, f64>,
    pub strategy: Strategy,
}

impl InfoSet {
    pub fn new(key: String, player: usize, actions: Vec<Action>) -> Self {
        let regrets = actions.iter().map(|&a| (a, 0.0)).collect();
        let strategy_sum = actions.iter().map(|&a| (a, 0.0)).collect();
        let mut info_set = InfoSet { key, player, actions, regrets, strategy_sum, strategy: HashMap::new() };
        info_set.calculate_strategy();
        info_set
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Regret-match: weight each action by the positive part of its
    /// accumulated regret, normalized; uniform if no regret is positive.
    pub fn calculate_strategy(&mut self) {
        let positive: HashMap<Action, f64> =
            self.regrets.iter().map(|(&a, &r)| (a, r.max(0.0))).collect();
        let total: f64 = positive.values().sum();

        self.strategy = if total <= 0.0 {
            let n = self.actions.len() as f64;
            self.actions.iter().map(|&a| (a, 1.0 / n)).collect()
        } else {
            positive.into_iter().map(|(a, r)| (a, r / total)).collect()
        };
    }

    /// Average strategy over every iteration this info-set was visited;
    /// this, not the instantaneous `strategy`, is what converges to a Nash
    /// equilibrium and is what gets persisted and sampled at inference time.
    pub fn average_strategy(&self) -> Strategy {
        let total: f64 = self.strategy_sum.values().sum();
        if total <= 0.0 {
            let n = self.actions.len() as f64;
            self.actions.iter().map(|&a| (a, 1.0 / n)).collect()
        } else {
            self.actions.iter().map(|&a| (a, self.strategy_sum[&a] / total)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uniform_with_no_regret() {
        let info = InfoSet::new("k".into(), 0, vec![Action::Fold, Action::Call, Action::AllIn]);
        for p in info.strategy.values() {
            assert!((p - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn strategy_always_sums_to_one() {
        let mut info = InfoSet::new("k".into(), 0, vec![Action::Fold, Action::Call]);
        *info.regrets.get_mut(&Action::Fold).unwrap() = 3.0;
        *info.regrets.get_mut(&Action::Call).unwrap() = -1.0;
        info.calculate_strategy();
        let sum: f64 = info.strategy.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!((info.strategy[&Action::Fold] - 1.0).abs() < 1e-12);
    }
}
