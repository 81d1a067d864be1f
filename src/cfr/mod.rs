//! Counterfactual-regret-minimization solver: self-play training that
//! converges each information set's strategy toward a Nash equilibrium.

mod infoset;
mod strategy;
mod tree;

pub use infoset::{InfoSet, Strategy};
pub use strategy::{load, save};
pub use tree::{make_infoset_key, Cfr, CfrBot, History, BOARD_DEAL, HAND_DEAL};
