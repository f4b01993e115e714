//! Pattern extraction from free-text cells.
//!
//! The sheets describe move pools and evolution conditions in prose. Each
//! recognized phrase has its own small matcher; the matchers are independent
//! and can all hit the same cell.
//!
//! A move cell looks like:
//!
//! ```text
//! Starting Moves: Tackle, Growl Level 2: Ember Level 6: Bite, Leer TM: 1, 2, 45 Egg Moves: Flail
//! ```
//!
//! A labelled section runs until the next recognized label or the end of
//! the cell.

use regex::Regex;
use crate::normalize::null_as_default;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Number of TMs granted by `EVERY TM`.
pub const TM_COUNT: u32 = 100;

static SECTION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Starting Moves|Egg Moves|\bLevel \d+|\bTM):").expect("valid section regex")
});
static STARTING_MOVES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Starting Moves:").expect("valid starting moves regex"));
static LEVEL_MOVES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bLevel (\d{1,2}):").expect("valid level moves regex"));
static TM_MOVES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bTM:").expect("valid TM regex"));
static EGG_MOVES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Egg Moves:").expect("valid egg moves regex"));
static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid number regex"));

static EVOLVE_POINTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"gains (\d{1,2})").expect("valid points regex"));
static EVOLVE_LEVEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"level (\d{1,2})").expect("valid level regex"));
static EVOLVE_MOVE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'(.*)'").expect("valid move regex"));

/// Structured move pool of a creature.
///
/// Serialized under the `Moves` key of a creature record. Fields added by
/// override data that have no typed slot are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveSet {
    #[serde(rename = "Starting Moves", default, deserialize_with = "null_as_default")]
    pub starting: Vec<String>,

    /// Level (as text) -> moves learned at that level. A `null` level drops it.
    #[serde(rename = "Level", default, deserialize_with = "level_map")]
    pub level: BTreeMap<String, Vec<String>>,

    #[serde(rename = "TM", default, skip_serializing_if = "Option::is_none")]
    pub tm: Option<Vec<u32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub egg: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn level_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let levels: Option<BTreeMap<String, Option<Vec<String>>>> = Option::deserialize(deserializer)?;
    Ok(levels
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(level, moves)| Some((level, moves?)))
        .collect())
}

/// Text of the section starting at byte `start`, up to the next label.
fn section_from(text: &str, start: usize) -> &str {
    let end = SECTION_LABEL
        .find_at(text, start)
        .map_or(text.len(), |label| label.start());
    &text[start..end]
}

fn split_moves(section: &str) -> Vec<String> {
    section
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// `Starting Moves: <list>`
pub fn starting_moves(text: &str) -> Option<Vec<String>> {
    let label = STARTING_MOVES.find(text)?;
    Some(split_moves(section_from(text, label.end())))
}

/// Every `Level <N>: <list>` occurrence, keyed by the level as written.
pub fn level_moves(text: &str) -> BTreeMap<String, Vec<String>> {
    LEVEL_MOVES
        .captures_iter(text)
        .filter_map(|caps| {
            let label = caps.get(0)?;
            let level = caps.get(1)?.as_str().to_string();
            Some((level, split_moves(section_from(text, label.end()))))
        })
        .collect()
}

/// `TM: <text>`, either every TM or the TM numbers listed.
pub fn tm_moves(text: &str) -> Option<Vec<u32>> {
    let label = TM_MOVES.find(text)?;
    let section = section_from(text, label.end());

    if section.contains("EVERY TM") {
        return Some((1..=TM_COUNT).collect());
    }

    Some(
        NUMBER
            .find_iter(section)
            .filter_map(|number| number.as_str().parse().ok())
            .collect(),
    )
}

/// `Egg Moves: <list>`
pub fn egg_moves(text: &str) -> Option<Vec<String>> {
    let label = EGG_MOVES.find(text)?;
    Some(split_moves(section_from(text, label.end())))
}

/// Run every move matcher over one cell.
pub fn parse_moves(text: &str) -> MoveSet {
    MoveSet {
        starting: starting_moves(text).unwrap_or_default(),
        level: level_moves(text),
        tm: tm_moves(text),
        egg: egg_moves(text),
        extra: Map::new(),
    }
}

/// Triggers found in an evolution description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvolutionTriggers {
    pub points: Option<u32>,
    pub level: Option<u32>,
    pub move_name: Option<String>,
}

/// Extract the point, level and move triggers from an evolution cell.
///
/// The move trigger (`'<name>'`) is only looked for when the text has no
/// `level N` phrase. A level of 0 is reported as no level.
pub fn evolution_triggers(text: &str) -> EvolutionTriggers {
    let points = EVOLVE_POINTS
        .captures(text)
        .and_then(|caps| caps[1].parse::<u32>().ok());

    let (level, move_name) = match EVOLVE_LEVEL.captures(text) {
        Some(caps) => (caps[1].parse::<u32>().ok().filter(|level| *level > 0), None),
        None => (
            None,
            EVOLVE_MOVE.captures(text).map(|caps| caps[1].to_string()),
        ),
    };

    EvolutionTriggers {
        points,
        level,
        move_name,
    }
}
