//! Hand evaluator: maps 5-7 cards to a strength rank in `[1, 7462]`, 1 best.
//!
//! Two global lookup tables (`UNSUITED`, `SUITED`), both keyed by the product
//! of the five hand-cards' rank primes, are built once on first use via
//! `lazy_static`. Building them enumerates every hand-type band in strength
//! order — straight flushes, fours, full houses, flushes, straights, trips,
//! two pair, pair, high card — assigning ranks as it goes, the same way the
//! reference generator does it.

use crate::card::{Card, Rank, PRIMES};
use lazy_static::lazy_static;
use std::collections::HashMap;

pub const HAND_COUNT: u16 = 7462;

const STR_FLUSH_COUNT: u16 = 10;
const FOURS_COUNT: u16 = 156;
const FULL_COUNT: u16 = 156;
const FLUSH_COUNT: u16 = 1277;
const STRAIGHT_COUNT: u16 = 10;
const TRIPS_COUNT: u16 = 858;
const TPAIR_COUNT: u16 = 858;
const PAIR_COUNT: u16 = 2860;
const HIGH_COUNT: u16 = 1277;

const STR_FLUSH_BEST: u16 = 1;
const FOURS_BEST: u16 = STR_FLUSH_BEST + STR_FLUSH_COUNT;
const FULL_BEST: u16 = FOURS_BEST + FOURS_COUNT;
const FLUSH_BEST: u16 = FULL_BEST + FULL_COUNT;
const STRAIGHT_BEST: u16 = FLUSH_BEST + FLUSH_COUNT;
const TRIPS_BEST: u16 = STRAIGHT_BEST + STRAIGHT_COUNT;
const TPAIR_BEST: u16 = TRIPS_BEST + TRIPS_COUNT;
const PAIR_BEST: u16 = TPAIR_BEST + TPAIR_COUNT;
const HIGH_BEST: u16 = PAIR_BEST + PAIR_COUNT;
const HIGH_WORST: u16 = HIGH_BEST + HIGH_COUNT - 1;

/// Hand category, ordered worst-to-best by discriminant for convenient
/// comparison (`HighCard` < `Pair` < ... < `StraightFlush`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum HandType {
    HighCard,
    Pair,
    TwoPair,
    Trips,
    Straight,
    Flush,
    FullHouse,
    Fours,
    StraightFlush,
}

/// Classify a rank produced by [`evaluate`].
pub fn hand_type(rank: u16) -> HandType {
    debug_assert!((1..=HAND_COUNT).contains(&rank), "rank out of range: {rank}");
    if rank < FOURS_BEST {
        HandType::StraightFlush
    } else if rank < FULL_BEST {
        HandType::Fours
    } else if rank < FLUSH_BEST {
        HandType::FullHouse
    } else if rank < STRAIGHT_BEST {
        HandType::Flush
    } else if rank < TRIPS_BEST {
        HandType::Straight
    } else if rank < TPAIR_BEST {
        HandType::Trips
    } else if rank < PAIR_BEST {
        HandType::TwoPair
    } else if rank < HIGH_BEST {
        HandType::Pair
    } else {
        HandType::HighCard
    }
}

/// Human-readable name for a hand category.
pub fn type_name(t: HandType) -> &'static str {
    match t {
        HandType::HighCard => "High Card",
        HandType::Pair => "Pair",
        HandType::TwoPair => "Two Pair",
        HandType::Trips => "Three of a Kind",
        HandType::Straight => "Straight",
        HandType::Flush => "Flush",
        HandType::FullHouse => "Full House",
        HandType::Fours => "Four of a Kind",
        HandType::StraightFlush => "Straight Flush",
    }
}

/// The ten rank 5-tuples (descending, high card first) that form a straight,
/// including the wheel (A-2-3-4-5) which ranks lowest.
fn straight_rank_sets() -> [[u8; 5]; 10] {
    [
        [12, 11, 10, 9, 8], // A-K-Q-J-T, best
        [11, 10, 9, 8, 7],
        [10, 9, 8, 7, 6],
        [9, 8, 7, 6, 5],
        [8, 7, 6, 5, 4],
        [7, 6, 5, 4, 3],
        [6, 5, 4, 3, 2],
        [5, 4, 3, 2, 1],
        [4, 3, 2, 1, 0],
        [12, 3, 2, 1, 0], // wheel: A-5-4-3-2, worst
    ]
}

fn key(ranks: &[u8]) -> u64 {
    ranks.iter().map(|&r| PRIMES[r as usize] as u64).product()
}

fn is_straight_set(ranks: &[u8; 5]) -> bool {
    straight_rank_sets().iter().any(|s| {
        let mut a = *s;
        let mut b = *ranks;
        a.sort_unstable();
        b.sort_unstable();
        a == b
    })
}

struct Tables {
    unsuited: HashMap<u64, u16>,
    suited: HashMap<u64, u16>,
}

fn generate_tables() -> Tables {
    let mut unsuited = HashMap::new();
    let mut suited = HashMap::new();

    // Straight flushes (suited only), best to worst.
    let mut rank = STR_FLUSH_BEST;
    for set in straight_rank_sets() {
        suited.insert(key(&set), rank);
        rank += 1;
    }

    // Four of a kind: quad rank (desc), then kicker rank (desc).
    let mut rank = FOURS_BEST;
    for &quad in Rank::ALL.iter().rev() {
        for &kicker in Rank::ALL.iter().rev() {
            if kicker == quad {
                continue;
            }
            let ranks = [quad as u8, quad as u8, quad as u8, quad as u8, kicker as u8];
            unsuited.insert(key(&ranks), rank);
            rank += 1;
        }
    }

    // Full house: trips rank (desc), then pair rank (desc).
    let mut rank = FULL_BEST;
    for &trips in Rank::ALL.iter().rev() {
        for &pair in Rank::ALL.iter().rev() {
            if pair == trips {
                continue;
            }
            let ranks = [trips as u8, trips as u8, trips as u8, pair as u8, pair as u8];
            unsuited.insert(key(&ranks), rank);
            rank += 1;
        }
    }

    // Flush: all non-straight 5-card rank combinations, suited, desc.
    let mut rank = FLUSH_BEST;
    for combo in descending_five_combos() {
        if is_straight_set(&combo) {
            continue;
        }
        suited.insert(key(&combo), rank);
        rank += 1;
    }

    // Straight (unsuited), best to worst.
    let mut rank = STRAIGHT_BEST;
    for set in straight_rank_sets() {
        unsuited.insert(key(&set), rank);
        rank += 1;
    }

    // Trips: trips rank (desc), then two kickers (desc).
    let mut rank = TRIPS_BEST;
    for &trips in Rank::ALL.iter().rev() {
        let kickers: Vec<Rank> = Rank::ALL.iter().rev().copied().filter(|&r| r != trips).collect();
        for i in 0..kickers.len() {
            for j in (i + 1)..kickers.len() {
                let ranks = [
                    trips as u8,
                    trips as u8,
                    trips as u8,
                    kickers[i] as u8,
                    kickers[j] as u8,
                ];
                unsuited.insert(key(&ranks), rank);
                rank += 1;
            }
        }
    }

    // Two pair: high pair (desc), low pair (desc), kicker (desc).
    let mut rank = TPAIR_BEST;
    for &hi in Rank::ALL.iter().rev() {
        for &lo in Rank::ALL.iter().rev() {
            if lo >= hi {
                continue;
            }
            for &kicker in Rank::ALL.iter().rev() {
                if kicker == hi || kicker == lo {
                    continue;
                }
                let ranks = [hi as u8, hi as u8, lo as u8, lo as u8, kicker as u8];
                unsuited.insert(key(&ranks), rank);
                rank += 1;
            }
        }
    }

    // Pair: pair rank (desc), then three kickers (desc).
    let mut rank = PAIR_BEST;
    for &pair in Rank::ALL.iter().rev() {
        let kickers: Vec<Rank> = Rank::ALL.iter().rev().copied().filter(|&r| r != pair).collect();
        for i in 0..kickers.len() {
            for j in (i + 1)..kickers.len() {
                for k in (j + 1)..kickers.len() {
                    let ranks = [
                        pair as u8,
                        pair as u8,
                        kickers[i] as u8,
                        kickers[j] as u8,
                        kickers[k] as u8,
                    ];
                    unsuited.insert(key(&ranks), rank);
                    rank += 1;
                }
            }
        }
    }

    // High card: all non-straight 5-card rank combinations, unsuited, desc.
    let mut rank = HIGH_BEST;
    for combo in descending_five_combos() {
        if is_straight_set(&combo) {
            continue;
        }
        unsuited.insert(key(&combo), rank);
        rank += 1;
    }
    debug_assert_eq!(rank - 1, HIGH_WORST);

    Tables { unsuited, suited }
}

/// Every 5-subset of the 13 ranks, in descending lexicographic order by rank
/// value (so iteration order matches standard "best hand first" ranking).
fn descending_five_combos() -> Vec<[u8; 5]> {
    let mut all: Vec<u8> = (0..13u8).collect();
    all.reverse();
    let mut out = Vec::with_capacity(1287);
    for a in 0..all.len() {
        for b in (a + 1)..all.len() {
            for c in (b + 1)..all.len() {
                for d in (c + 1)..all.len() {
                    for e in (d + 1)..all.len() {
                        out.push([all[a], all[b], all[c], all[d], all[e]]);
                    }
                }
            }
        }
    }
    out
}

lazy_static! {
    static ref TABLES: Tables = generate_tables();
}

/// Evaluate exactly five cards, returning a rank in `[1, 7462]` (1 best).
pub fn evaluate_5(cards: &[Card; 5]) -> u16 {
    let mut ranks: Vec<u8> = cards.iter().map(|c| c.rank() as u8).collect();
    ranks.sort_unstable();
    let k = key(&ranks);
    let suited = cards.iter().all(|c| c.suit() == cards[0].suit());

    let table = if suited { &TABLES.suited } else { &TABLES.unsuited };
    *table
        .get(&k)
        .unwrap_or_else(|| panic!("no rank found for card key {k}"))
}

/// Evaluate 5, 6, or 7 cards: the best rank over every 5-card subset.
pub fn evaluate(cards: &[Card]) -> u16 {
    assert!(cards.len() >= 5, "evaluate requires at least 5 cards, got {}", cards.len());
    if cards.len() == 5 {
        let arr: [Card; 5] = cards.try_into().unwrap();
        return evaluate_5(&arr);
    }

    let n = cards.len();
    let mut best = HAND_COUNT;
    for a in 0..n {
        for b in (a + 1)..n {
            for c in (b + 1)..n {
                for d in (c + 1)..n {
                    for e in (d + 1)..n {
                        let hand = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        best = best.min(evaluate_5(&hand));
                    }
                }
            }
        }
    }
    best
}

/// Human-readable description, e.g. `"Four of a Kind"`.
pub fn describe(rank: u16) -> &'static str {
    type_name(hand_type(rank))
}
