//! Pot accounting: live bets for the current betting round, plus the
//! side-pot split performed when one or more players are all-in for less
//! than the full bet.

use std::collections::BTreeMap;

/// Dealing-order seat index.
pub type PlayerId = usize;

/// One pot layer: chips already resolved (`chips`) plus live, uncollected
/// bets for the current betting round (`bets`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pot {
    chips: u32,
    bets: BTreeMap<PlayerId, u32>,
    /// Lower bound on `raised()`, used at hand init to force the preflop
    /// raise level to the big blind even when that blind was posted short.
    floor: u32,
}

impl Pot {
    pub fn new() -> Self {
        Pot::default()
    }

    /// The current bet every active player must match.
    pub fn raised(&self) -> u32 {
        self.bets.values().copied().max().unwrap_or(0).max(self.floor)
    }

    /// Force `raised()` to be at least `floor`, even if the highest live bet
    /// is smaller (a short-stacked blind must not lower what others owe).
    pub fn set_floor(&mut self, floor: u32) {
        self.floor = floor;
    }

    /// Chips `player` still owes to call the current bet.
    pub fn chips_to_call(&self, player: PlayerId) -> u32 {
        self.raised().saturating_sub(self.bets.get(&player).copied().unwrap_or(0))
    }

    /// Add chips to `player`'s live bet (posting a blind, calling, raising).
    pub fn add(&mut self, player: PlayerId, amount: u32) {
        *self.bets.entry(player).or_insert(0) += amount;
    }

    /// Add chips straight to resolved `chips`, bypassing the live-bet
    /// accounting — used for antes, which are not bets.
    pub fn collect_into_center(&mut self, amount: u32) {
        self.chips += amount;
    }

    /// Move `player`'s live bet to the resolved center and drop them from
    /// `bets` entirely: they're no longer eligible for this pot, and their
    /// chips can't reappear as an extra side-pot boundary.
    pub fn fold(&mut self, player: PlayerId) {
        if let Some(amount) = self.bets.remove(&player) {
            self.chips += amount;
        }
    }

    /// Players with a live bet in this pot, seat order.
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.bets.keys().copied()
    }

    /// Chips already resolved plus everything bet so far this round.
    pub fn total(&self) -> u32 {
        self.chips + self.bets.values().sum::<u32>()
    }

    /// Move all live bets into resolved chips, ending the betting round.
    pub fn collect_bets(&mut self) {
        self.chips += self.bets.values().sum::<u32>();
        self.bets.clear();
        self.floor = 0;
    }

    /// Split unequal bets into side-pot layers.
    ///
    /// Repeatedly takes the smallest live bet, caps every bet at that
    /// amount into a layer, and carries the excess into a fresh layer
    /// restricted to the players who bet more — standard side-pot
    /// construction for an all-in below the full bet. Resolved `chips`
    /// belong entirely to the first (main) layer. Returns `[self.clone()]`
    /// unchanged if there's nothing to split.
    pub fn split(&self) -> Vec<Pot> {
        if self.bets.is_empty() {
            return vec![self.clone()];
        }

        let mut layers = Vec::new();
        let mut remaining = self.bets.clone();
        let mut carried_chips = self.chips;

        while !remaining.is_empty() {
            let min_bet = *remaining.values().min().unwrap();
            let mut layer_bets = BTreeMap::new();
            let mut next_remaining = BTreeMap::new();
            for (&player, &amount) in remaining.iter() {
                layer_bets.insert(player, min_bet);
                if amount > min_bet {
                    next_remaining.insert(player, amount - min_bet);
                }
            }
            layers.push(Pot {
                chips: carried_chips,
                bets: layer_bets,
                floor: 0,
            });
            carried_chips = 0;
            remaining = next_remaining;
        }
        layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chips_to_call_tracks_the_highest_bet() {
        let mut pot = Pot::new();
        pot.add(0, 10);
        pot.add(1, 25);
        assert_eq!(pot.chips_to_call(0), 15);
        assert_eq!(pot.chips_to_call(1), 0);
    }

    #[test]
    fn collect_bets_moves_live_bets_into_chips() {
        let mut pot = Pot::new();
        pot.add(0, 10);
        pot.add(1, 10);
        pot.collect_bets();
        assert_eq!(pot.total(), 20);
        assert_eq!(pot.raised(), 0);
    }

    #[test]
    fn fold_moves_the_bet_to_chips_and_drops_the_player() {
        let mut pot = Pot::new();
        pot.add(0, 10);
        pot.add(1, 10);
        pot.fold(0);
        assert_eq!(pot.players().collect::<Vec<_>>(), vec![1]);
        assert_eq!(pot.total(), 20);
        assert_eq!(pot.chips_to_call(1), 0);
    }

    #[test]
    fn split_creates_a_side_pot_for_an_uneven_all_in() {
        let mut pot = Pot::new();
        pot.add(0, 10);
        pot.add(1, 20);
        pot.add(2, 100);
        let layers = pot.split();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0].total(), 30); // everyone matches 10
        assert_eq!(layers[0].players().count(), 3);
        assert_eq!(layers[1].total(), 20); // players 1 and 2 match another 10
        assert_eq!(layers[1].players().count(), 2);
        assert_eq!(layers[2].total(), 80); // player 2's uncontested excess
        assert_eq!(layers[2].players().count(), 1);
    }

    #[test]
    fn split_is_a_no_op_when_bets_are_even() {
        let mut pot = Pot::new();
        pot.add(0, 10);
        pot.add(1, 10);
        let layers = pot.split();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].total(), 20);
    }
}
