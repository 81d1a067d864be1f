//! Chance-aware history wrapper and the recursive CFR tree walker.

use super::infoset::{InfoSet, Strategy};
use crate::action::Action;
use crate::card::Card;
use crate::config::GameConfig;
use crate::game::{Game, GameState, Player};
use crate::pot::PlayerId;
use log::warn;
use rand::Rng;
use std::collections::HashMap;

/// Sentinel "current player" values meaning a chance node is next.
pub const HAND_DEAL: i64 = -1;
pub const BOARD_DEAL: i64 = -2;

/// Build the key identifying a player's current information set.
pub fn make_infoset_key(hole: &[Card], community: &[Card], bet_history: &str) -> String {
    let hole_str: String = hole.iter().map(|c| c.to_string()).collect();
    let community_str: String = community.iter().map(|c| c.to_string()).collect();
    format!("{hole_str}:{community_str:<10}:{bet_history}")
}

/// A single-hand game wrapped with an explicit notion of chance nodes, so
/// the CFR walker can recurse through dealing the same way it recurses
/// through player decisions. Distinct from [`crate::history::GameHistory`],
/// which is the engine's permanent replay log across many hands.
#[derive(Clone)]
pub struct History {
    pub game: Game,
    /// Betting-history string for the hand so far; round boundaries are `/`.
    pub bet_history: String,
    last_community_len: usize,
}

impl History {
    pub fn new(config: GameConfig, players: usize, buy_in: u32) -> Self {
        History { game: Game::new(config, players, buy_in), bet_history: String::new(), last_community_len: 0 }
    }

    pub fn is_done(&self) -> bool {
        let hand_played = self.game.history.hand_count() > 0;
        let hand_over = self.game.state != GameState::Running && hand_played;
        let too_few_live = self.game.state == GameState::Running && self.game.not_folded_count() < 2;
        hand_over || too_few_live
    }

    /// Chip delta from `player`'s starting stack.
    pub fn payoff(&self, player: usize) -> f64 {
        self.game.player(player).chips as f64 - self.game.buy_in as f64
    }

    pub fn current_player(&self) -> i64 {
        if self.game.state != GameState::Running {
            return HAND_DEAL;
        }
        if self.game.community.len() > self.last_community_len {
            return BOARD_DEAL;
        }
        self.game.current as i64
    }

    pub fn to_deal_card(&self) -> bool {
        matches!(self.current_player(), HAND_DEAL | BOARD_DEAL)
    }

    /// Deal the hole cards (if the hand hasn't started) or acknowledge
    /// community cards the engine already dealt internally, pushing a round
    /// separator onto the betting history either way.
    pub fn deal(&mut self, seed: u64) {
        if self.game.state != GameState::Running {
            self.game.init_hand(seed);
        } else {
            self.bet_history.push('/');
        }
        self.last_community_len = self.game.community.len();
    }

    fn current_round_suffix(&self) -> &str {
        self.bet_history.rsplit('/').next().unwrap_or("")
    }

    pub fn current_pl_info_set_key(&self) -> String {
        let player = self.game.current;
        make_infoset_key(&self.game.player(player).hand, &self.game.community, self.current_round_suffix())
    }

    pub fn current_pl_new_info_set(&self) -> InfoSet {
        let player = self.game.current;
        InfoSet::new(self.current_pl_info_set_key(), player, self.game.get_moves(player))
    }

    /// Apply a player decision, recording its short code onto the history.
    pub fn append(&mut self, action: Action) {
        self.bet_history.push_str(&action.to_short_str());
        self.game
            .accept_move(self.game.current, action)
            .expect("CFR only ever plays actions drawn from get_moves");
    }
}

/// Recursive counterfactual-regret-minimization tree walker.
pub struct Cfr {
    pub players: usize,
    pub config: GameConfig,
    pub buy_in: u32,
    pub info_sets: HashMap<String, InfoSet>,
}

impl Cfr {
    pub fn new(players: usize, config: GameConfig, buy_in: u32) -> Self {
        Cfr { players, config, buy_in, info_sets: HashMap::new() }
    }

    /// `p_self`: probability of `player` reaching this node through their
    /// own strategy. `p_other`: probability of reaching it through chance
    /// and every other player's strategy. Returns `player`'s expected
    /// payoff at this node, updating regrets and strategy sums along the way.
    pub fn step_tree(&mut self, h: &History, player: usize, p_self: f64, p_other: f64, seed: &mut u64) -> f64 {
        if h.is_done() {
            return h.payoff(player);
        }
        if h.to_deal_card() {
            let mut next = h.clone();
            *seed += 1;
            next.deal(*seed);
            return self.step_tree(&next, player, p_self, p_other, seed);
        }

        let key = h.current_pl_info_set_key();
        self.info_sets.entry(key.clone()).or_insert_with(|| h.current_pl_new_info_set());

        let acting_player = h.game.current;
        let actions = self.info_sets[&key].actions().to_vec();
        let strategy = self.info_sets[&key].strategy.clone();

        let mut payoffs = HashMap::with_capacity(actions.len());
        let mut payoff = 0.0;
        for &action in &actions {
            let mut next = h.clone();
            next.append(action);
            let weight = strategy[&action];
            let child = if acting_player == player {
                self.step_tree(&next, player, p_self * weight, p_other, seed)
            } else {
                self.step_tree(&next, player, p_self, p_other * weight, seed)
            };
            payoffs.insert(action, child);
            payoff += child * weight;
        }

        if acting_player == player {
            let info = self.info_sets.get_mut(&key).unwrap();
            for &action in &actions {
                *info.strategy_sum.get_mut(&action).unwrap() += p_self * strategy[&action];
                *info.regrets.get_mut(&action).unwrap() += p_other * (payoffs[&action] - payoff);
            }
            info.calculate_strategy();
        }

        payoff
    }

    /// Run `iterations` full passes, one `step_tree` per player per
    /// iteration, each starting from a freshly dealt hand.
    pub fn run(&mut self, iterations: u64) {
        let mut seed = 0u64;
        for _ in 0..iterations {
            for player in 0..self.players {
                let h = History::new(self.config, self.players, self.buy_in);
                seed += 1;
                self.step_tree(&h, player, 1.0, 1.0, &mut seed);
            }
        }
    }
}

fn current_round_bet_history(game: &Game) -> String {
    let hand = game.history.hand_count().saturating_sub(1);
    let rounds = game.history.actions_by_round(hand);
    let Some(group) = rounds.iter().find(|g| g.first().map(|e| e.stage) == Some(game.round)) else {
        return String::new();
    };
    // Blinds are forced and recorded like ordinary actions, but they aren't
    // part of the betting-history a player conditions their strategy on.
    let skip = if game.round == crate::game::BettingRound::Preflop { 2 } else { 0 };
    group.iter().skip(skip).map(|e| e.action.to_short_str()).collect()
}

/// Plays by sampling from a strategy table learned by [`Cfr::run`], falling
/// back to folding at any information set it never visited during training.
pub struct CfrBot {
    pub strategies: HashMap<String, Strategy>,
}

impl CfrBot {
    pub fn new(strategies: HashMap<String, Strategy>) -> Self {
        CfrBot { strategies }
    }

    fn sample(strategy: &Strategy) -> Action {
        let roll: f64 = rand::thread_rng().gen_range(0.0..1.0);
        let mut acc = 0.0;
        for (&action, &p) in strategy {
            acc += p;
            if roll < acc {
                return action;
            }
        }
        *strategy.keys().next().expect("strategy always has at least one action")
    }
}

impl Player for CfrBot {
    fn act(&mut self, game: &Game, id: PlayerId) -> Action {
        let hole = game.player(id).hand.clone();
        let suffix = current_round_bet_history(game);
        let key = make_infoset_key(&hole, &game.community, &suffix);
        match self.strategies.get(&key) {
            Some(strategy) => Self::sample(strategy),
            None => {
                warn!("no trained strategy for info set {key}, folding");
                Action::Fold
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn a_few_iterations_populate_infosets_with_valid_strategies() {
        let mut cfr = Cfr::new(2, GameConfig::no_limit(2), 20);
        cfr.run(3);
        assert!(!cfr.info_sets.is_empty());
        for info in cfr.info_sets.values() {
            let sum: f64 = info.strategy.values().sum();
            assert!((sum - 1.0).abs() < 1e-9, "strategy for {} summed to {sum}", info.key);
        }
    }

    #[test]
    fn bot_folds_at_an_unseen_info_set() {
        let mut bot = CfrBot::new(HashMap::new());
        let mut g = Game::new(GameConfig::no_limit(2), 2, 20);
        g.init_hand(1);
        assert_eq!(bot.act(&g, g.current), Action::Fold);
    }
}
