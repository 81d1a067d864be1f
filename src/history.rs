//! Append-only hand history and the dealing-order / seat-order index maps.
//!
//! The button rotates one seat clockwise every hand, so "the player who acts
//! first" is a different seat each hand. History records hole cards and
//! starting stacks in *dealing order* (dealing index 0 is always the first
//! hand's first-to-act) so a player's identity across the log is stable
//! regardless of where the button happens to sit. [`to_history_index`] and
//! [`to_game_index`] are the inverse affine maps between the two orderings.

use crate::action::Action;
use crate::card::Card;
use crate::game::BettingRound;
use crate::pot::PlayerId;

/// Convert a stable seat index to its dealing-order index for `hand`.
pub fn to_history_index(hand: u64, seat: usize, players: usize) -> usize {
    let players = players as i64;
    let v = (1 - hand as i64 + seat as i64).rem_euclid(players);
    v as usize
}

/// Convert a dealing-order index back to a stable seat index for `hand`.
pub fn to_game_index(hand: u64, dealing_idx: usize, players: usize) -> usize {
    let players = players as i64;
    let v = (dealing_idx as i64 - 1 + hand as i64).rem_euclid(players);
    v as usize
}

#[derive(Clone, Debug)]
pub struct ActionEntry {
    pub stage: BettingRound,
    pub player: PlayerId,
    pub action: Action,
}

#[derive(Clone, Debug)]
pub struct ResultEntry {
    pub pot_total: u32,
    pub winners: Vec<PlayerId>,
    pub winning_rank: Option<u16>,
}

#[derive(Clone, Debug)]
struct HandRecord {
    starting_chips: Vec<u32>,
    hole_cards: Vec<Vec<Card>>,
}

/// The full replayable log across every hand played at this table.
#[derive(Clone, Debug)]
pub struct GameHistory {
    pub players: usize,
    pub buy_in: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    hands: Vec<HandRecord>,
    community: Vec<Vec<Card>>,
    /// Flat action log across all hands; `None` is a hand-boundary sentinel.
    actions: Vec<Option<ActionEntry>>,
    results: Vec<Vec<ResultEntry>>,
}

impl GameHistory {
    pub fn new(players: usize, buy_in: u32, small_blind: u32, big_blind: u32) -> Self {
        GameHistory {
            players,
            buy_in,
            small_blind,
            big_blind,
            hands: Vec::new(),
            community: Vec::new(),
            actions: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn hand_count(&self) -> u64 {
        self.hands.len() as u64
    }

    /// Begin a new hand: `starting_chips`/`hole_cards` are in dealing order.
    pub fn start_hand(&mut self, starting_chips: Vec<u32>, hole_cards: Vec<Vec<Card>>) {
        if !self.hands.is_empty() {
            self.actions.push(None);
        }
        self.hands.push(HandRecord { starting_chips, hole_cards });
        self.community.push(Vec::new());
        self.results.push(Vec::new());
    }

    pub fn deal_community(&mut self, cards: &[Card]) {
        self.community
            .last_mut()
            .expect("deal_community called before start_hand")
            .extend_from_slice(cards);
    }

    pub fn record_action(&mut self, stage: BettingRound, player: PlayerId, action: Action) {
        self.actions.push(Some(ActionEntry { stage, player, action }));
    }

    pub fn end_hand(&mut self, results: Vec<ResultEntry>) {
        *self.results.last_mut().expect("end_hand called before start_hand") = results;
    }

    pub fn starting_chips(&self, hand: u64) -> &[u32] {
        &self.hands[hand as usize].starting_chips
    }

    pub fn hole_cards(&self, hand: u64) -> &[Vec<Card>] {
        &self.hands[hand as usize].hole_cards
    }

    pub fn community(&self, hand: u64) -> &[Card] {
        &self.community[hand as usize]
    }

    pub fn results(&self, hand: u64) -> &[ResultEntry] {
        &self.results[hand as usize]
    }

    /// Action log for a single hand, in chronological order.
    pub fn hand_actions(&self, hand: u64) -> Vec<&ActionEntry> {
        self.actions
            .split(|a| a.is_none())
            .nth(hand as usize)
            .unwrap_or(&[])
            .iter()
            .map(|a| a.as_ref().unwrap())
            .collect()
    }

    /// That hand's actions, grouped into one `Vec` per betting round in order.
    pub fn actions_by_round(&self, hand: u64) -> Vec<Vec<&ActionEntry>> {
        let mut rounds: Vec<Vec<&ActionEntry>> = Vec::new();
        for entry in self.hand_actions(hand) {
            match rounds.last_mut() {
                Some(round) if round.last().map(|e| e.stage) == Some(entry.stage) => {
                    round.push(entry)
                }
                _ => rounds.push(vec![entry]),
            }
        }
        rounds
    }
}
