//! Player actions and their short betting-history codes.

use std::fmt;

/// A player action. `Raise` carries the amount being raised *by*, on top of
/// the call already owed — never the absolute total bet.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Fold,
    Call,
    Raise(u32),
    AllIn,
}

impl Action {
    /// Short single-stage code used in CFR betting-history strings:
    /// `f` fold, `c` call/check, `a` all-in, `rN` raise to N.
    pub fn to_short_str(self) -> String {
        match self {
            Action::Fold => "f".to_string(),
            Action::Call => "c".to_string(),
            Action::AllIn => "a".to_string(),
            Action::Raise(amt) => format!("r{amt}"),
        }
    }

    /// Parse a short code back into an `Action`. Returns `None` on malformed
    /// input (used only for loading persisted strategies).
    pub fn from_short_str(s: &str) -> Option<Self> {
        match s {
            "f" => Some(Action::Fold),
            "c" => Some(Action::Call),
            "a" => Some(Action::AllIn),
            _ if s.starts_with('r') => s[1..].parse::<u32>().ok().map(Action::Raise),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fold => write!(f, "fold"),
            Action::Call => write!(f, "call"),
            Action::AllIn => write!(f, "all-in"),
            Action::Raise(amt) => write!(f, "raise by {amt}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_codes_round_trip() {
        for a in [Action::Fold, Action::Call, Action::AllIn, Action::Raise(42)] {
            let s = a.to_short_str();
            assert_eq!(Action::from_short_str(&s), Some(a));
        }
    }

    #[test]
    fn rejects_garbage_codes() {
        assert_eq!(Action::from_short_str("x"), None);
        assert_eq!(Action::from_short_str("rabc"), None);
        assert_eq!(Action::from_short_str(""), None);
    }
}
