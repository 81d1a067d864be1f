//! Typed errors returned by the move API.

use thiserror::Error;

/// Everything that can go wrong accepting a player's move. Every variant
/// leaves the game state untouched — see [`crate::game::Game::accept_move`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("raise/bet amount must be positive, got {0}")]
    NegativeAmount(i64),

    #[error("raise to {attempted} is below the minimum raise of {minimum}")]
    RaiseBelowMinimum { attempted: u32, minimum: u32 },

    #[error("no raises left this betting round (fixed-limit cap reached)")]
    RaiseWithoutRaisesLeft,

    #[error("player {player} has {chips} chips, not enough to cover {amount}")]
    InsufficientChips { player: usize, chips: u32, amount: u32 },

    #[error("player {0} is not the player to act")]
    NotPlayerToAct(usize),

    #[error("action {action} is not legal in the current state")]
    IllegalAction { action: &'static str },

    #[error("strategy file error: {0}")]
    StrategyIo(String),

    #[error("malformed strategy file: {0}")]
    StrategyFormat(String),
}
