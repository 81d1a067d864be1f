//! Card representation and the 52-card deck.
//!
//! Uses compact `u8` storage (0..51) matching the classic `(suit << 4) | rank`
//! packing: 4 bits of rank (0-12, Two..Ace) and 2 bits of suit (0-3). Each
//! rank additionally carries a small prime, used by the evaluator to key
//! hands by the product of their five ranks' primes.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt;

/// Rank characters, Two through Ace, matching `Rank`'s numeric order.
const RANK_CHARS: [char; 13] = ['2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A'];
const SUIT_CHARS: [char; 4] = ['s', 'h', 'd', 'c'];

/// The prime assigned to each rank, Two through Ace, used to key the
/// evaluator's lookup tables by prime product.
pub const PRIMES: [u32; 13] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41];

/// A card rank, Two through Ace.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Rank {
    Two = 0,
    Three = 1,
    Four = 2,
    Five = 3,
    Six = 4,
    Seven = 5,
    Eight = 6,
    Nine = 7,
    Ten = 8,
    Jack = 9,
    Queen = 10,
    King = 11,
    Ace = 12,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    #[inline]
    pub fn from_u8(v: u8) -> Self {
        debug_assert!(v < 13, "rank out of range: {v}");
        Rank::ALL[v as usize]
    }

    #[inline]
    pub fn prime(self) -> u32 {
        PRIMES[self as usize]
    }

    pub fn from_char(c: char) -> Option<Self> {
        RANK_CHARS
            .iter()
            .position(|&r| r.eq_ignore_ascii_case(&c))
            .map(|i| Rank::ALL[i])
    }

    pub fn to_char(self) -> char {
        RANK_CHARS[self as usize]
    }

    pub fn name(self) -> &'static str {
        [
            "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Jack",
            "Queen", "King", "Ace",
        ][self as usize]
    }
}

/// A card suit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Suit {
    Spades = 0,
    Hearts = 1,
    Diamonds = 2,
    Clubs = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    #[inline]
    pub fn from_u8(v: u8) -> Self {
        debug_assert!(v < 4, "suit out of range: {v}");
        Suit::ALL[v as usize]
    }

    pub fn from_char(c: char) -> Option<Self> {
        SUIT_CHARS
            .iter()
            .position(|&s| s.eq_ignore_ascii_case(&c))
            .map(|i| Suit::ALL[i])
    }

    pub fn to_char(self) -> char {
        SUIT_CHARS[self as usize]
    }
}

/// A single playing card, packed into one byte as `(suit << 4) | rank`.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Card(u8);

impl Card {
    #[inline]
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card(((suit as u8) << 4) | rank as u8)
    }

    #[inline]
    pub fn rank(self) -> Rank {
        Rank::from_u8(self.0 & 0x0F)
    }

    #[inline]
    pub fn suit(self) -> Suit {
        Suit::from_u8(self.0 >> 4)
    }

    /// Parse a two-character card like `"As"`, `"Th"`, `"2c"`.
    pub fn from_str(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let rank = Rank::from_char(chars.next()?)?;
        let suit = Suit::from_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Card::new(rank, suit))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank().to_char(), self.suit().to_char())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// An ordered 52-card deck. `deal` takes cards off the back and rotates them
/// to the front, so a second `deal` after a `shuffle` is deterministic given
/// the seed that drove the shuffle.
#[derive(Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    pub fn new() -> Self {
        let mut cards = Vec::with_capacity(52);
        for &suit in &Suit::ALL {
            for &rank in &Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Deck { cards }
    }

    /// Shuffle using a caller-supplied RNG.
    pub fn shuffle<R: rand::RngCore>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Shuffle deterministically from a 64-bit seed.
    pub fn shuffle_seeded(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.shuffle(&mut rng);
    }

    /// Shuffle using the thread-local OS-seeded RNG (non-deterministic).
    pub fn shuffle_random(&mut self) {
        let mut rng = StdRng::from_entropy();
        self.shuffle(&mut rng);
    }

    /// Build a deck that deals exactly `sequence`, in order, via successive
    /// `deal`/`deal_one` calls — used to replay a recorded hand by injecting
    /// its recorded cards instead of shuffling.
    pub fn scripted(sequence: &[Card]) -> Self {
        assert!(sequence.len() <= 52, "can't script more than 52 cards");
        let mut seen = std::collections::HashSet::new();
        for &card in sequence {
            assert!(seen.insert(card), "scripted deck deals {card} twice");
        }
        let mut cards: Vec<Card> =
            Deck::new().cards.into_iter().filter(|c| !seen.contains(c)).collect();
        cards.extend(sequence.iter().rev().copied());
        Deck { cards }
    }

    /// Deal `n` cards from the back of the deck, rotating them to the front.
    pub fn deal(&mut self, n: usize) -> Vec<Card> {
        assert!(n >= 1 && n <= self.cards.len(), "invalid deal count: {n}");
        let split_at = self.cards.len() - n;
        let mut dealt: Vec<Card> = self.cards.split_off(split_at);
        dealt.reverse();
        let mut rest = std::mem::take(&mut self.cards);
        self.cards = dealt.clone();
        self.cards.append(&mut rest);
        dealt
    }

    /// Deal a single card.
    pub fn deal_one(&mut self) -> Card {
        self.deal(1)[0]
    }

    /// Burn `n` cards: deal them nowhere, still rotating them to the front.
    pub fn burn(&mut self, n: usize) {
        self.deal(n);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_and_displays_round_trip() {
        for &suit in &Suit::ALL {
            for &rank in &Rank::ALL {
                let card = Card::new(rank, suit);
                let s = card.to_string();
                assert_eq!(Card::from_str(&s), Some(card));
            }
        }
    }

    #[rstest]
    #[case("Xx")]
    #[case("A")]
    #[case("Asd")]
    #[case("")]
    fn rejects_invalid_strings(#[case] s: &str) {
        assert_eq!(Card::from_str(s), None);
    }

    #[test]
    fn new_deck_has_52_unique_cards() {
        let deck = Deck::new();
        assert_eq!(deck.len(), 52);
        let unique: std::collections::HashSet<_> = deck.cards.iter().collect();
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn shuffle_is_deterministic_for_a_given_seed() {
        let mut a = Deck::new();
        let mut b = Deck::new();
        a.shuffle_seeded(42);
        b.shuffle_seeded(42);
        assert_eq!(a.cards, b.cards);
    }

    #[test]
    fn different_seeds_produce_different_orders() {
        let mut a = Deck::new();
        let mut b = Deck::new();
        a.shuffle_seeded(1);
        b.shuffle_seeded(2);
        assert_ne!(a.cards, b.cards);
    }

    #[test]
    fn deal_rotates_dealt_cards_to_the_front() {
        let mut deck = Deck::new();
        deck.shuffle_seeded(7);
        let before = deck.cards.clone();
        let dealt = deck.deal(3);
        assert_eq!(dealt.len(), 3);
        assert_eq!(deck.len(), 52);
        assert_eq!(&deck.cards[0..3], &dealt[..]);
        assert_eq!(&deck.cards[3..], &before[0..49]);
    }

    #[test]
    fn prime_table_is_injective_over_ranks() {
        let mut seen = std::collections::HashSet::new();
        for &r in &Rank::ALL {
            assert!(seen.insert(r.prime()), "duplicate prime for {r:?}");
        }
    }
}
