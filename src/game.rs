//! The hand lifecycle state machine: blinds, antes, betting rounds, showdown.

use crate::action::Action;
use crate::card::{Card, Deck};
use crate::config::{AnteTarget, GameConfig};
use crate::error::EngineError;
use crate::evaluator;
use crate::history::{to_history_index, GameHistory, ResultEntry};
use crate::pot::{Pot, PlayerId};
use log::{debug, info, trace};

/// Per-player state during a hand. Transitions are driven solely by
/// [`Game::accept_move`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayerState {
    ToMove,
    Moved,
    AllIn,
    Folded,
    /// Not participating this hand (had zero chips at hand start).
    Out,
}

impl PlayerState {
    pub fn active(self) -> bool {
        matches!(self, PlayerState::ToMove | PlayerState::Moved)
    }
}

/// Overall game lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    /// Between hands, or the starting state before the first `init_hand`.
    HandDone,
    Running,
    /// Fewer than two players have chips; no further hands are possible.
    Over,
}

/// A betting round, also used as the community card count it ends with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BettingRound {
    Preflop,
    Flop,
    Turn,
    River,
}

impl BettingRound {
    fn next(self) -> Option<Self> {
        match self {
            BettingRound::Preflop => Some(BettingRound::Flop),
            BettingRound::Flop => Some(BettingRound::Turn),
            BettingRound::Turn => Some(BettingRound::River),
            BettingRound::River => None,
        }
    }

    /// Community cards dealt on transitioning *into* this round.
    fn cards_dealt_entering(self) -> usize {
        match self {
            BettingRound::Preflop => 0,
            BettingRound::Flop => 3,
            BettingRound::Turn | BettingRound::River => 1,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PlayerData {
    pub chips: u32,
    pub state: PlayerState,
    pub hand: Vec<Card>,
}

/// A legal move, paired with the chip amount a UI would show for it (always
/// 0 for `Fold`/`Call`/`AllIn` since the engine fills those in).
pub type LegalMove = Action;

/// Minimal interface a decision-making client implements. The engine only
/// ever calls `act`; concrete players are plain structs.
pub trait Player {
    fn act(&mut self, game: &Game, id: PlayerId) -> Action;
}

/// N-player hold'em engine: one `accept_move` call advances the hand by
/// exactly one player decision.
#[derive(Clone)]
pub struct Game {
    pub config: GameConfig,
    pub buy_in: u32,
    players: Vec<PlayerData>,
    pub community: Vec<Card>,
    pots: Vec<Pot>,
    deck: Deck,
    button: usize,
    pub current: PlayerId,
    pub round: BettingRound,
    pub state: GameState,
    raises_left: u8,
    last_raise: u32,
    pub history: GameHistory,
}

const FIXED_LIMIT_RAISES_PER_ROUND: u8 = 5;

impl Game {
    /// Create a table of `num_players` seats, each starting with `buy_in`
    /// chips. Call [`Game::init_hand`] to deal the first hand.
    pub fn new(config: GameConfig, num_players: usize, buy_in: u32) -> Self {
        assert!(num_players >= 2, "need at least two players");
        let players = (0..num_players)
            .map(|_| PlayerData { chips: buy_in, state: PlayerState::Out, hand: Vec::new() })
            .collect();
        Game {
            buy_in,
            players,
            community: Vec::new(),
            pots: vec![Pot::new()],
            deck: Deck::new(),
            button: 0,
            current: 0,
            round: BettingRound::Preflop,
            state: GameState::HandDone,
            raises_left: FIXED_LIMIT_RAISES_PER_ROUND,
            last_raise: config.min_bet.max(1),
            history: GameHistory::new(num_players, buy_in, config.small_blind, config.big_blind),
            config,
        }
    }

    /// Create a table with each seat's own starting stack, for scenarios a
    /// uniform buy-in can't express (a short-stacked blind, a specific
    /// three-way all-in setup). `buy_in` is recorded as the nominal stake
    /// for history metadata and CFR payoffs; it need not match every seat.
    pub fn with_stacks(config: GameConfig, stacks: Vec<u32>) -> Self {
        let nominal = stacks.iter().copied().max().unwrap_or(0);
        let mut game = Game::new(config, stacks.len(), nominal);
        for (seat, &chips) in stacks.iter().enumerate() {
            game.players[seat].chips = chips;
        }
        game
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, id: PlayerId) -> &PlayerData {
        &self.players[id]
    }

    pub fn chips_to_call(&self, player: PlayerId) -> u32 {
        self.pots.last().unwrap().chips_to_call(player)
    }

    fn in_hand_seats_from(&self, start: usize) -> Vec<usize> {
        let n = self.players.len();
        (0..n)
            .map(|offset| (start + offset) % n)
            .filter(|&seat| self.players[seat].state != PlayerState::Out)
            .collect()
    }

    /// Deal a new hand: blinds, antes, hole cards. Transitions to `Over` if
    /// fewer than two players still have chips.
    pub fn init_hand(&mut self, seed: u64) {
        let mut deck = Deck::new();
        deck.shuffle_seeded(seed);
        self.init_hand_with_deck(deck);
    }

    /// Same lifecycle as [`Game::init_hand`], but hole/community cards come
    /// off a caller-supplied deck instead of a fresh shuffle. Used directly
    /// by [`Game::replay_hand`] to inject recorded cards deterministically.
    fn init_hand_with_deck(&mut self, deck: Deck) {
        let n = self.players.len();
        let in_hand_count = self.players.iter().filter(|p| p.chips > 0).count();
        if in_hand_count < 2 {
            self.state = GameState::Over;
            info!("game over: only {in_hand_count} player(s) have chips left");
            return;
        }

        if self.history.hand_count() > 0 {
            self.button = (self.button + 1) % n;
        }
        for p in &mut self.players {
            p.state = if p.chips == 0 { PlayerState::Out } else { PlayerState::ToMove };
            p.hand.clear();
        }
        self.community.clear();
        self.pots = vec![Pot::new()];
        self.deck = deck;
        self.round = BettingRound::Preflop;

        let order = self.in_hand_seats_from((self.button + 1) % n);
        for &seat in &order {
            let card = self.deck.deal_one();
            self.players[seat].hand.push(card);
        }
        for &seat in &order {
            let card = self.deck.deal_one();
            self.players[seat].hand.push(card);
        }

        let hand_no = self.history.hand_count();
        let starting_chips: Vec<u32> = order.iter().map(|&s| self.players[s].chips).collect();
        let hole_cards: Vec<Vec<Card>> = order.iter().map(|&s| self.players[s].hand.clone()).collect();
        self.history.start_hand(starting_chips, hole_cards);

        // Blind posting. Heads-up the button posts the small blind and acts
        // first preflop; three-handed or more, the seat left of the button
        // posts the small blind and the next seat posts the big blind.
        let (sb_seat, bb_seat) = if order.len() == 2 { (self.button, order[0]) } else { (order[0], order[1]) };
        self.post_blind(sb_seat, self.config.small_blind);
        self.post_blind(bb_seat, self.config.big_blind);

        if self.config.ante_amt > 0 {
            match self.config.ante_target {
                AnteTarget::All => {
                    let ante = self.config.ante_amt;
                    for &seat in &order {
                        self.post_ante(seat, ante);
                    }
                }
                AnteTarget::BbOnly => self.post_ante(bb_seat, self.config.ante_amt),
                AnteTarget::ButtonOnly => self.post_ante(self.button, self.config.ante_amt),
            }
        }

        // Force the preflop raise level to the big blind even if that blind
        // was posted short, so a short-stacked blind doesn't lower what
        // others owe.
        self.pots.last_mut().unwrap().set_floor(self.config.big_blind);
        self.raises_left = FIXED_LIMIT_RAISES_PER_ROUND;
        // No raise has happened yet this round (blinds don't count); the
        // minimum legal raise-by is `max(1, last_raise)`, so this allows a
        // one-chip minimum raise until somebody actually raises.
        self.last_raise = if self.config.is_fixed_limit() { self.config.small_bet } else { 0 };

        let after_bb = order.iter().position(|&s| s == bb_seat).unwrap();
        self.current = order[(after_bb + 1) % order.len()];
        self.state = GameState::Running;
        debug!("hand {hand_no} dealt: button seat {}, sb {sb_seat}, bb {bb_seat}", self.button);

        // A short-stacked blind can put every seat all-in before anyone has
        // a decision to make; resolve the hand immediately instead of
        // leaving it stuck waiting on a player who can't act.
        if self.hand_should_end_now() {
            self.end_hand();
        } else if self.round_is_over() {
            self.end_round();
        }
    }

    /// Reconstruct the sequence of `Game` snapshots for a single recorded
    /// hand: one right after dealing, then one after each decision in the
    /// action log. Hole and community cards are injected from `history`
    /// rather than shuffled, so replay is deterministic regardless of the
    /// seed the hand was originally dealt with.
    ///
    /// History records cards and chips in dealing order, not seat order, so
    /// the replayed game relabels dealing position `i` as seat `i` directly
    /// and pins the button to the last seat: with every seat active, that's
    /// the only button placement whose own dealing order comes out as the
    /// identity `0, 1, 2, ...`, matching how `starting_chips`/`hole_cards`
    /// are already indexed.
    pub fn replay_hand(config: GameConfig, history: &GameHistory, hand: u64) -> Vec<Game> {
        let starting_chips = history.starting_chips(hand).to_vec();
        let hole_cards = history.hole_cards(hand);
        let seats = starting_chips.len();

        let mut deal_sequence: Vec<Card> = Vec::new();
        for card_idx in 0..2 {
            for cards in hole_cards {
                deal_sequence.push(cards[card_idx]);
            }
        }
        deal_sequence.extend_from_slice(history.community(hand));

        let mut game = Game::with_stacks(config, starting_chips);
        game.button = seats - 1;
        game.init_hand_with_deck(Deck::scripted(&deal_sequence));

        let mut snapshots = vec![game.clone()];
        for entry in history.hand_actions(hand).into_iter().skip(2) {
            game.accept_move(entry.player, entry.action).expect("recorded action replays cleanly");
            snapshots.push(game.clone());
        }
        snapshots
    }

    fn post_blind(&mut self, seat: PlayerId, amount: u32) {
        let posted = amount.min(self.players[seat].chips);
        self.players[seat].chips -= posted;
        self.pots.last_mut().unwrap().add(seat, posted);
        self.history.record_action(self.round, seat, Action::Raise(posted));
        if self.players[seat].chips == 0 {
            self.players[seat].state = PlayerState::AllIn;
        }
        debug!("seat {seat} posts blind {posted}");
    }

    fn post_ante(&mut self, seat: PlayerId, amount: u32) {
        let posted = amount.min(self.players[seat].chips);
        self.players[seat].chips -= posted;
        self.pots.last_mut().unwrap().collect_into_center(posted);
        if self.players[seat].chips == 0 {
            self.players[seat].state = PlayerState::AllIn;
        }
        debug!("seat {seat} posts ante {posted}");
    }

    /// How many chips `player` could still add beyond the call (may be
    /// negative, meaning they can't even cover the call).
    fn free_chips(&self, player: PlayerId) -> i64 {
        self.players[player].chips as i64 - self.chips_to_call(player) as i64
    }

    /// Every legal move for `player` right now; empty if it's not their turn
    /// or the hand isn't running.
    pub fn get_moves(&self, player: PlayerId) -> Vec<LegalMove> {
        if self.state != GameState::Running
            || self.current != player
            || self.players[player].state != PlayerState::ToMove
        {
            return Vec::new();
        }

        let mut moves = vec![Action::Fold];
        let free = self.free_chips(player);

        if free < 0 {
            moves.push(Action::AllIn);
            return moves;
        }
        if free == 0 {
            moves.push(Action::Call);
            return moves;
        }

        moves.push(Action::Call);
        if self.config.is_fixed_limit() {
            if self.raises_left > 0 {
                let limit = self.current_limit();
                // A standing raise under half the limit (a short all-in push)
                // can only be completed up to one full limit, not re-raised
                // by a whole extra limit on top.
                let standing = self.last_raise;
                let amt = if standing > 0 && standing < limit / 2 {
                    limit - standing
                } else {
                    limit
                };
                if (free as u32) >= amt {
                    moves.push(Action::Raise(amt));
                }
            }
            if (free as u32) < self.current_limit() {
                moves.push(Action::AllIn);
            }
        } else {
            let min_raise = self.last_raise.max(1);
            for amt in min_raise..(free as u32) {
                moves.push(Action::Raise(amt));
            }
            moves.push(Action::AllIn);
        }
        moves
    }

    fn current_limit(&self) -> u32 {
        match self.round {
            BettingRound::Preflop | BettingRound::Flop => self.config.small_bet,
            BettingRound::Turn | BettingRound::River => self.config.big_bet,
        }
    }

    /// Apply one player decision. Invalid moves return an error and leave
    /// the game unmodified; a move from a player who isn't due to act is a
    /// silent no-op (forgiving replay of already-resolved seats).
    pub fn accept_move(&mut self, player: PlayerId, action: Action) -> Result<(), EngineError> {
        if self.state != GameState::Running {
            return Err(EngineError::IllegalAction { action: "hand not running" });
        }
        if self.current != player {
            return Err(EngineError::NotPlayerToAct(player));
        }
        if self.players[player].state != PlayerState::ToMove {
            trace!("move from seat {player} ignored: not awaiting a decision");
            self.advance_current();
            return Ok(());
        }

        let chips = self.players[player].chips;
        let chips_to_call = self.chips_to_call(player);

        // Coerce a raise that would put the player all-in anyway, and a
        // zero-amount raise, into their simpler equivalent action.
        let action = match action {
            Action::Raise(amt) if amt as u64 + chips_to_call as u64 == chips as u64 => Action::AllIn,
            Action::Raise(0) => Action::Call,
            other => other,
        };

        match action {
            Action::Fold => {
                for pot in &mut self.pots {
                    pot.fold(player);
                }
                self.players[player].state = PlayerState::Folded;
            }
            Action::Call => {
                let pay = chips_to_call.min(chips);
                self.players[player].chips -= pay;
                self.pots.last_mut().unwrap().add(player, pay);
                self.players[player].state = PlayerState::Moved;
            }
            Action::Raise(amt) => {
                if self.config.is_fixed_limit() && self.raises_left == 0 {
                    return Err(EngineError::RaiseWithoutRaisesLeft);
                }
                let min_raise = self.last_raise.max(1);
                if amt < min_raise {
                    return Err(EngineError::RaiseBelowMinimum { attempted: amt, minimum: min_raise });
                }
                let pay = chips_to_call + amt;
                if pay > chips {
                    return Err(EngineError::InsufficientChips { player, chips, amount: pay });
                }
                self.players[player].chips -= pay;
                let pot = self.pots.last_mut().unwrap();
                pot.add(player, pay);
                self.last_raise = amt;
                self.raises_left = self.raises_left.saturating_sub(1);
                self.players[player].state = PlayerState::Moved;
                self.reopen_betting_for_others(player);
            }
            Action::AllIn => {
                let pay = chips;
                self.players[player].chips = 0;
                let raised_before = self.pots.last().unwrap().raised();
                self.pots.last_mut().unwrap().add(player, pay);
                self.players[player].state = PlayerState::AllIn;
                let new_raise = self.pots.last().unwrap().raised();
                // An all-in below the current bet is just a short call, not
                // a raise. In fixed-limit, a push under half the limit also
                // doesn't reopen betting for players who already acted.
                let effective_raise = new_raise.saturating_sub(raised_before);
                let reopens = effective_raise > 0
                    && (!self.config.is_fixed_limit() || effective_raise * 2 >= self.current_limit().max(1));
                if reopens {
                    self.last_raise = self.last_raise.max(effective_raise);
                    self.reopen_betting_for_others(player);
                }
            }
        }

        self.history.record_action(self.round, player, action);
        debug!("seat {player} plays {action}");

        if self.hand_should_end_now() {
            self.end_hand();
        } else if self.round_is_over() {
            self.end_round();
        } else {
            self.advance_current();
        }
        Ok(())
    }

    fn reopen_betting_for_others(&mut self, raiser: PlayerId) {
        for (seat, p) in self.players.iter_mut().enumerate() {
            if seat != raiser && p.state == PlayerState::Moved {
                p.state = PlayerState::ToMove;
            }
        }
    }

    /// Players still contesting the pot: neither folded nor sitting out.
    pub fn not_folded_count(&self) -> usize {
        self.players.iter().filter(|p| p.state != PlayerState::Folded && p.state != PlayerState::Out).count()
    }

    fn hand_should_end_now(&self) -> bool {
        self.not_folded_count() <= 1
    }

    fn round_is_over(&self) -> bool {
        !self.players.iter().any(|p| p.state == PlayerState::ToMove)
    }

    fn advance_current(&mut self) {
        let n = self.players.len();
        for offset in 1..=n {
            let seat = (self.current + offset) % n;
            if self.players[seat].state != PlayerState::Out {
                self.current = seat;
                if self.players[seat].state == PlayerState::ToMove {
                    return;
                }
            }
        }
    }

    fn end_round(&mut self) {
        let split = self.pots.last().unwrap().split();
        self.pots.pop();
        self.pots.extend(split);
        for pot in &mut self.pots {
            pot.collect_bets();
        }
        for p in &mut self.players {
            if p.state == PlayerState::Moved {
                p.state = PlayerState::ToMove;
            }
        }
        self.raises_left = FIXED_LIMIT_RAISES_PER_ROUND;
        self.last_raise = if self.config.is_fixed_limit() { self.config.small_bet } else { 0 };

        let can_act = self.players.iter().filter(|p| p.state == PlayerState::ToMove).count();
        if can_act < 2 || self.round == BettingRound::River {
            // Everyone left is all-in (or it's already the river): run out
            // the rest of the board before showdown so the evaluator always
            // sees a full hand.
            while let Some(next_round) = self.round.next() {
                let to_deal = next_round.cards_dealt_entering();
                let dealt = self.deck.deal(to_deal);
                self.community.extend_from_slice(&dealt);
                self.history.deal_community(&dealt);
                self.round = next_round;
            }
            self.end_hand();
            return;
        }

        let next_round = self.round.next().unwrap();
        let to_deal = next_round.cards_dealt_entering();
        let dealt = self.deck.deal(to_deal);
        self.community.extend_from_slice(&dealt);
        self.history.deal_community(&dealt);
        self.round = next_round;
        debug!("round transition to {:?}, dealt {to_deal} card(s)", self.round);

        self.advance_to_first_actor_postflop();
    }

    fn advance_to_first_actor_postflop(&mut self) {
        let n = self.players.len();
        for offset in 1..=n {
            let seat = (self.button + offset) % n;
            if self.players[seat].state == PlayerState::ToMove {
                self.current = seat;
                return;
            }
        }
    }

    fn end_hand(&mut self) {
        let not_folded: Vec<PlayerId> = (0..self.players.len())
            .filter(|&s| self.players[s].state != PlayerState::Folded && self.players[s].state != PlayerState::Out)
            .collect();

        let mut results = Vec::new();
        if not_folded.len() == 1 {
            let winner = not_folded[0];
            let total: u32 = self.pots.iter().map(|p| p.total()).sum();
            self.players[winner].chips += total;
            results.push(ResultEntry { pot_total: total, winners: vec![winner], winning_rank: None });
            info!("hand ends: seat {winner} wins uncontested pot of {total}");
        } else {
            for pot in self.pots.clone().iter() {
                let total = pot.total();
                if total == 0 {
                    continue;
                }
                let contenders: Vec<PlayerId> = pot.players().filter(|&s| not_folded.contains(&s)).collect();
                if contenders.is_empty() {
                    continue;
                }
                let ranked: Vec<(PlayerId, u16)> = contenders
                    .iter()
                    .map(|&s| {
                        let mut cards = self.players[s].hand.clone();
                        cards.extend_from_slice(&self.community);
                        (s, evaluator::evaluate(&cards))
                    })
                    .collect();
                let best_rank = ranked.iter().map(|&(_, r)| r).min().unwrap();
                let mut winners: Vec<PlayerId> = ranked.iter().filter(|&&(_, r)| r == best_rank).map(|&(s, _)| s).collect();
                winners.sort_unstable();

                let share = total / winners.len() as u32;
                let remainder = total % winners.len() as u32;
                for &w in &winners {
                    self.players[w].chips += share;
                }
                if remainder > 0 {
                    let first_clockwise = winners
                        .iter()
                        .copied()
                        .cycle()
                        .find(|&w| self.seat_distance_from_button(w) == winners.iter().map(|&x| self.seat_distance_from_button(x)).min().unwrap())
                        .unwrap();
                    self.players[first_clockwise].chips += remainder;
                }
                results.push(ResultEntry { pot_total: total, winners, winning_rank: Some(best_rank) });
            }
        }

        self.history.end_hand(results);
        self.state = GameState::HandDone;
    }

    fn seat_distance_from_button(&self, seat: PlayerId) -> usize {
        let n = self.players.len();
        (seat + n - (self.button + 1) % n) % n
    }

    /// Stable dealing-order seat for `seat` in the hand currently being (or
    /// just) played — thin wrapper over [`to_history_index`].
    pub fn dealing_index(&self, seat: PlayerId) -> usize {
        let hand = self.history.hand_count().saturating_sub(1);
        to_history_index(hand, seat, self.players.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn two_player_game() -> Game {
        Game::new(GameConfig::no_limit(2), 2, 200)
    }

    #[test]
    fn init_hand_posts_blinds_and_deals_two_cards_each() {
        let mut g = two_player_game();
        g.init_hand(1);
        assert_eq!(g.state, GameState::Running);
        assert_eq!(g.player(0).hand.len(), 2);
        assert_eq!(g.player(1).hand.len(), 2);
        let total_chips: u32 = (0..2).map(|i| g.player(i).chips).sum::<u32>()
            + g.pots.iter().map(|p| p.total()).sum::<u32>();
        assert_eq!(total_chips, 400);
    }

    #[test]
    fn three_folders_preflop_moves_one_chip_between_blinds() {
        let mut g = Game::new(GameConfig::no_limit(2), 3, 100);
        g.init_hand(5);
        // Every player folds in turn; chip conservation must hold throughout.
        loop {
            let mv = g.get_moves(g.current);
            if mv.is_empty() {
                break;
            }
            g.accept_move(g.current, Action::Fold).unwrap();
            if g.state != GameState::Running {
                break;
            }
        }
        let total: u32 = (0..3).map(|i| g.player(i).chips).sum();
        assert_eq!(total, 300);
    }

    #[test]
    fn all_fold_scenario_matches_blind_only_transfer() {
        // Three folders, buy_in=100, BB=2: seat 0 is the button/dealer, seat 1
        // posts SB, seat 2 posts BB; everyone folds preflop so the blinds
        // alone settle the hand -> [100, 99, 101].
        let mut g = Game::new(GameConfig::no_limit(2), 3, 100);
        g.init_hand(42);
        while g.state == GameState::Running {
            let player = g.current;
            g.accept_move(player, Action::Fold).unwrap();
        }
        let stacks: Vec<u32> = (0..3).map(|i| g.player(i).chips).collect();
        assert_eq!(stacks, vec![100, 99, 101]);
    }

    #[test]
    fn get_moves_enumerates_every_integer_raise_no_limit() {
        // No-limit, buy_in=10, BB=2: the small blind should see all ten legal
        // moves (FOLD, CALL, RAISE 1..7, ALL_IN).
        let mut g = Game::new(GameConfig::no_limit(2), 2, 10);
        g.init_hand(9);
        // Heads-up preflop actor is the button (small blind).
        let moves = g.get_moves(g.current);
        assert_eq!(moves.len(), 10, "{moves:?}");
        assert!(moves.contains(&Action::Fold));
        assert!(moves.contains(&Action::Call));
        assert!(moves.contains(&Action::AllIn));
        for amt in 1..=7 {
            assert!(moves.contains(&Action::Raise(amt)), "missing raise by {amt}");
        }
    }
}
