//! Persisted-strategy file format: a player-count header line followed by
//! one `<infoset key>=<json action:probability map>` line per info set.

use super::infoset::{InfoSet, Strategy};
use crate::action::Action;
use crate::error::EngineError;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Write every info-set's average strategy to `path`.
pub fn save(path: &Path, players: usize, info_sets: &HashMap<String, InfoSet>) -> Result<(), EngineError> {
    let mut out = format!("P{players}\n");
    for (key, info) in info_sets {
        let avg = info.average_strategy();
        let json = strategy_to_json(&avg);
        let _ = writeln!(out, "{key}={json}");
    }
    fs::write(path, out).map_err(|e| EngineError::StrategyIo(e.to_string()))
}

/// Load a previously saved strategy file, keyed by info-set key.
pub fn load(path: &Path) -> Result<(usize, HashMap<String, Strategy>), EngineError> {
    let text = fs::read_to_string(path).map_err(|e| EngineError::StrategyIo(e.to_string()))?;
    let mut lines = text.lines();
    let header = lines.next().unwrap_or("");
    let players: usize = header
        .strip_prefix('P')
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| EngineError::StrategyFormat(format!("bad header {header:?}")))?;

    let mut strategies = HashMap::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let (key, json) = line
            .split_once('=')
            .ok_or_else(|| EngineError::StrategyFormat(format!("no '=' in line {line:?}")))?;
        strategies.insert(key.to_string(), strategy_from_json(json)?);
    }
    Ok((players, strategies))
}

fn strategy_to_json(strategy: &Strategy) -> String {
    let entries: Vec<String> =
        strategy.iter().map(|(a, p)| format!("\"{}\": {p}", a.to_short_str())).collect();
    format!("{{{}}}", entries.join(", "))
}

fn strategy_from_json(json: &str) -> Result<Strategy, EngineError> {
    let parsed: serde_json::Value =
        serde_json::from_str(json).map_err(|e| EngineError::StrategyFormat(e.to_string()))?;
    let map = parsed
        .as_object()
        .ok_or_else(|| EngineError::StrategyFormat(format!("expected a JSON object, got {json:?}")))?;
    let mut strategy = HashMap::new();
    for (code, prob) in map {
        let action = Action::from_short_str(code)
            .ok_or_else(|| EngineError::StrategyFormat(format!("unrecognized action code {code:?}")))?;
        let prob = prob
            .as_f64()
            .ok_or_else(|| EngineError::StrategyFormat(format!("non-numeric probability for {code:?}")))?;
        strategy.insert(action, prob);
    }
    Ok(strategy)
}
