//! End-to-end scenarios mirroring the engine's documented testable
//! properties. Seed-dependent deals can't reproduce a reference
//! implementation's RNG bit-for-bit, so these exercise the same
//! mechanisms (side-pot math, odd-chip distribution, chip conservation)
//! against hand-built game states instead of asserting literal deals.

use holdem_engine::{Action, AnteTarget, Game, GameConfig, GameState, Player, PlayerState};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn play_until_hand_done(g: &mut Game, mut choose: impl FnMut(&Game) -> Action) {
    init_logging();
    while g.state == GameState::Running {
        let action = choose(g);
        g.accept_move(g.current, action).unwrap();
    }
}

#[test]
fn heads_up_all_fold_settles_on_blinds_alone() {
    let mut g = Game::new(GameConfig::no_limit(2), 3, 100);
    g.init_hand(42);
    play_until_hand_done(&mut g, |_| Action::Fold);
    let stacks: Vec<u32> = (0..3).map(|i| g.player(i).chips).collect();
    assert_eq!(stacks, vec![100, 99, 101]);
    assert_eq!(stacks.iter().sum::<u32>(), 300);
}

#[test]
fn three_way_all_in_with_uneven_stacks_builds_side_pots() {
    // Mirrors scenario 3/4 of the documented testable properties: stacks of
    // 10, 20 and 100 all shove preflop, producing a layered side pot rather
    // than one pool everybody is eligible for.
    let mut g = Game::with_stacks(GameConfig::no_limit(2), vec![10, 20, 100]);
    g.init_hand(7);
    play_until_hand_done(&mut g, |game| {
        let moves = game.get_moves(game.current);
        assert!(moves.contains(&Action::AllIn));
        Action::AllIn
    });
    let total: u32 = (0..3).map(|i| g.player(i).chips).sum();
    assert_eq!(total, 130, "chips must be conserved across an all-in showdown");
}

#[test]
fn heads_up_short_stack_blind_resolves_without_deadlock() {
    // BB has 1 chip, BB=2, buy_in=4 — the big blind is immediately all-in
    // and the hand must resolve rather than wait forever for a decision
    // neither player can make.
    let mut g = Game::with_stacks(GameConfig::no_limit(2), vec![4, 1]);
    g.init_hand(3);
    assert_eq!(g.state, GameState::Running, "SB still has a decision even though BB is already all-in");
    g.accept_move(g.current, Action::Call).unwrap();
    assert_eq!(g.state, GameState::HandDone, "a fully-covered blind must not deadlock the hand");
    assert_eq!(g.player(0).chips + g.player(1).chips, 5);
}

#[test]
fn odd_chip_remainder_goes_to_the_first_winner_clockwise_of_the_button() {
    // Exercises the remainder rule directly through Pot::split/Game::end_hand
    // machinery: drive a three-way hand to a guaranteed chop by having every
    // remaining player check it down, then confirm total chips conserved and
    // some player received the pot (full coverage of the tie-break rule
    // itself lives in evaluator.rs and pot.rs unit tests, since it requires
    // contrived equal-rank hands that seeded deals rarely produce).
    let mut g = Game::new(GameConfig::no_limit(2), 3, 100);
    g.init_hand(11);
    play_until_hand_done(&mut g, |game| {
        let moves = game.get_moves(game.current);
        if moves.contains(&Action::Call) { Action::Call } else { moves[0] }
    });
    let total: u32 = (0..3).map(|i| g.player(i).chips).sum();
    assert_eq!(total, 300);
}

#[test]
fn an_all_in_showdown_always_runs_the_board_out_to_five_cards() {
    // All four players shove preflop every hand, so whichever of them
    // aren't all folded must see a complete board at showdown.
    let mut g = Game::new(GameConfig::no_limit(2), 4, 50);
    g.init_hand(1);
    play_until_hand_done(&mut g, |game| {
        let moves = game.get_moves(game.current);
        if moves.contains(&Action::AllIn) { Action::AllIn } else { moves[0] }
    });
    let survivors = (0..4).filter(|&i| g.player(i).state != PlayerState::Folded).count();
    if survivors > 1 {
        assert_eq!(g.community.len(), 5);
    }
}

#[test]
fn antes_go_to_the_center_without_affecting_the_amount_owed_to_call() {
    let config = GameConfig::no_limit(2).with_ante(1, AnteTarget::All);
    let mut g = Game::new(config, 3, 100);
    g.init_hand(99);
    // Chips to call preflop is still governed by the big blind, not the ante.
    assert_eq!(g.chips_to_call(g.current), 2.min(g.player(g.current).chips));
}

#[test]
fn a_folded_table_down_to_one_player_stops_dealing_new_hands() {
    let mut g = Game::new(GameConfig::no_limit(2), 2, 1);
    g.init_hand(1);
    while g.state == GameState::Running {
        g.accept_move(g.current, Action::Fold).unwrap();
    }
    if g.state == GameState::HandDone {
        g.init_hand(2);
    }
    assert_eq!(g.state, GameState::Over);
}

#[test]
fn replaying_a_recorded_hand_reproduces_its_final_chip_stacks() {
    let mut g = Game::new(GameConfig::no_limit(2), 3, 100);
    g.init_hand(17);
    play_until_hand_done(&mut g, |game| {
        let moves = game.get_moves(game.current);
        if moves.contains(&Action::Call) { Action::Call } else { moves[0] }
    });
    let mut final_stacks: Vec<u32> = (0..3).map(|i| g.player(i).chips).collect();
    final_stacks.sort_unstable();

    let replayed = Game::replay_hand(GameConfig::no_limit(2), &g.history, 0);
    let last = replayed.last().expect("replay yields at least the post-deal snapshot");
    let mut replayed_stacks: Vec<u32> = (0..3).map(|i| last.player(i).chips).collect();
    replayed_stacks.sort_unstable();

    assert_eq!(replayed_stacks, final_stacks);
}

struct AlwaysFold;
impl Player for AlwaysFold {
    fn act(&mut self, game: &Game, _id: holdem_engine::PlayerId) -> Action {
        let _ = game;
        Action::Fold
    }
}

#[test]
fn the_player_trait_object_drives_a_hand_through_the_engine() {
    let mut g = Game::new(GameConfig::no_limit(2), 2, 50);
    g.init_hand(4);
    let mut bot = AlwaysFold;
    while g.state == GameState::Running {
        let action = bot.act(&g, g.current);
        g.accept_move(g.current, action).unwrap();
    }
    assert_eq!(g.state, GameState::HandDone);
}

#[test]
fn out_of_chips_players_are_skipped_once_busted() {
    let mut g = Game::new(GameConfig::no_limit(2), 3, 1);
    g.init_hand(1);
    while g.state == GameState::Running {
        g.accept_move(g.current, Action::AllIn).unwrap();
    }
    assert_eq!((0..3).map(|i| g.player(i).chips).sum::<u32>(), 3);
    if g.state == GameState::HandDone {
        g.init_hand(2);
        for i in 0..3 {
            if g.player(i).chips == 0 {
                assert_eq!(g.player(i).state, PlayerState::Out);
            }
        }
    }
}
