//! Typed creature record built from one sheet row.
//!
//! Every optional field is skipped on serialization when absent, so the
//! JSON output never carries `null` or empty placeholders. Serde renames
//! keep the key names the downstream app reads.

use super::columns::{is_attribute, CreatureColumns, ATTRIBUTES};
use crate::error::{ConvertError, Result};
use crate::extraction::{parse_moves, MoveSet};
use crate::merge::merge;
use crate::normalize::{
    clean_object, ensure_float, ensure_int, ensure_list, ensure_string, null_as_default, PLACEHOLDER,
};
use crate::table::Row;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Levels whose move list is dropped when empty.
pub const MILESTONE_LEVELS: [&str; 5] = ["2", "6", "10", "14", "18"];

/// Ability scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(rename = "STR", default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<i64>,
    #[serde(rename = "DEX", default, skip_serializing_if = "Option::is_none")]
    pub dexterity: Option<i64>,
    #[serde(rename = "CON", default, skip_serializing_if = "Option::is_none")]
    pub constitution: Option<i64>,
    #[serde(rename = "INT", default, skip_serializing_if = "Option::is_none")]
    pub intelligence: Option<i64>,
    #[serde(rename = "WIS", default, skip_serializing_if = "Option::is_none")]
    pub wisdom: Option<i64>,
    #[serde(rename = "CHA", default, skip_serializing_if = "Option::is_none")]
    pub charisma: Option<i64>,

    /// Override scores with no typed slot
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Attributes {
    fn set(&mut self, abbreviation: &str, value: Option<i64>) {
        match abbreviation {
            "STR" => self.strength = value,
            "DEX" => self.dexterity = value,
            "CON" => self.constitution = value,
            "INT" => self.intelligence = value,
            "WIS" => self.wisdom = value,
            "CHA" => self.charisma = value,
            _ => {}
        }
    }
}

/// One creature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatureRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,

    /// Difficulty rating
    #[serde(rename = "SR", default, skip_serializing_if = "Option::is_none")]
    pub sr: Option<f64>,

    #[serde(rename = "Hit Dice", default, skip_serializing_if = "Option::is_none")]
    pub hit_dice: Option<i64>,

    #[serde(rename = "MIN LVL FD", default, skip_serializing_if = "Option::is_none")]
    pub min_level: Option<i64>,

    #[serde(rename = "HP", default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<i64>,

    #[serde(rename = "AC", default, skip_serializing_if = "Option::is_none")]
    pub ac: Option<i64>,

    /// Evolve-trigger marker
    #[serde(rename = "Evolve", default, skip_serializing_if = "Option::is_none")]
    pub evolve: Option<String>,

    #[serde(rename = "WSp", default, skip_serializing_if = "Option::is_none")]
    pub walking_speed: Option<i64>,

    #[serde(rename = "Ssp", default, skip_serializing_if = "Option::is_none")]
    pub swimming_speed: Option<i64>,

    #[serde(rename = "Fsp", default, skip_serializing_if = "Option::is_none")]
    pub flying_speed: Option<i64>,

    #[serde(rename = "Climbing Speed", default, skip_serializing_if = "Option::is_none")]
    pub climbing_speed: Option<i64>,

    #[serde(rename = "Burrowing Speed", default, skip_serializing_if = "Option::is_none")]
    pub burrowing_speed: Option<i64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Attributes,

    #[serde(rename = "Abilities", default, skip_serializing_if = "Option::is_none")]
    pub abilities: Option<Vec<String>>,

    #[serde(rename = "Hidden Ability", default, skip_serializing_if = "Option::is_none")]
    pub hidden_ability: Option<String>,

    #[serde(rename = "Senses", default, skip_serializing_if = "Option::is_none")]
    pub senses: Option<Vec<String>>,

    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,

    #[serde(rename = "Skill", default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saving_throws: Option<Vec<String>>,

    #[serde(rename = "Moves", default, deserialize_with = "null_as_default")]
    pub moves: MoveSet,

    /// Override fields with no typed slot
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Display name of a creature from its name cell.
pub fn species_name(cell: &str) -> String {
    cell.replace("\r\n", " ").replace('\n', " ")
}

impl CreatureRecord {
    /// Populate every field from a row. `name` is only used for warnings.
    pub fn from_row(name: &str, row: &Row, columns: &CreatureColumns) -> Self {
        let mut attributes = Attributes::default();
        for (abbreviation, column) in columns.attributes {
            attributes.set(abbreviation, ensure_int(row.cell(column)));
        }

        Self {
            index: ensure_int(row.cell(columns.index)),
            sr: ensure_float(row.cell(columns.sr)),
            hit_dice: ensure_int(row.cell(columns.hit_dice)),
            min_level: ensure_int(row.cell(columns.min_level)),
            hp: ensure_int(row.cell(columns.hp)),
            ac: ensure_int(row.cell(columns.ac)),
            evolve: ensure_string(row.cell(columns.evolve)),
            walking_speed: ensure_int(row.cell(columns.walking_speed)),
            swimming_speed: ensure_int(row.cell(columns.swimming_speed)),
            flying_speed: ensure_int(row.cell(columns.flying_speed)),
            climbing_speed: ensure_int(row.cell(columns.climbing_speed)),
            burrowing_speed: ensure_int(row.cell(columns.burrowing_speed)),
            attributes,
            abilities: Some(
                columns
                    .abilities
                    .iter()
                    .map(|&column| row.cell(column).to_string())
                    .collect(),
            ),
            hidden_ability: ensure_string(row.cell(columns.hidden_ability)),
            senses: ensure_list(row.cell(columns.senses), ','),
            types: ensure_list(row.cell(columns.types), '/'),
            skills: ensure_list(row.cell(columns.skill), ','),
            size: ensure_string(row.cell(columns.size)),
            saving_throws: Some(saving_throws(name, row, columns)),
            moves: parse_moves(row.cell(columns.moves)),
            extra: Map::new(),
        }
    }

    /// The record as a JSON object.
    pub fn to_map(&self, name: &str) -> Result<Map<String, Value>> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Ok(Map::new()),
            Err(source) => Err(ConvertError::Serialize {
                name: name.to_string(),
                source,
            }),
        }
    }

    /// Deep-merge override data into the record.
    ///
    /// A `null` in the override clears the field; keys without a typed field
    /// land in [`CreatureRecord::extra`].
    pub fn apply_override(&mut self, name: &str, overlay: &Map<String, Value>) -> Result<()> {
        let mut merged = self.to_map(name)?;
        merge(&mut merged, overlay);

        *self = serde_json::from_value(Value::Object(merged)).map_err(|source| ConvertError::OverrideShape {
            name: name.to_string(),
            source,
        })?;
        Ok(())
    }

    /// Drop placeholder entries and empty lists.
    pub fn cleanup(&mut self) {
        self.abilities = cleaned(self.abilities.take());
        self.skills = cleaned(self.skills.take());
        self.saving_throws = cleaned(self.saving_throws.take());

        if self.moves.tm.as_ref().is_some_and(Vec::is_empty) {
            self.moves.tm = None;
        }

        for level in MILESTONE_LEVELS {
            if self.moves.level.get(level).is_some_and(Vec::is_empty) {
                self.moves.level.remove(level);
            }
        }
    }
}

fn cleaned(list: Option<Vec<String>>) -> Option<Vec<String>> {
    let mut list = list?;
    clean_object(&mut list);
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}

/// Saving throw proficiencies.
///
/// `All` in the first column grants every attribute. Values that are not an
/// attribute name are kept but logged.
fn saving_throws(name: &str, row: &Row, columns: &CreatureColumns) -> Vec<String> {
    let [first, second, third] = columns.saving_throws;

    let throws: Vec<String> = if row.cell(first).trim() == "All" {
        ATTRIBUTES.iter().map(|attribute| attribute.to_string()).collect()
    } else {
        [first, second, third]
            .iter()
            .map(|&column| row.cell(column).to_string())
            .collect()
    };

    for value in unrecognized_saving_throws(&throws) {
        tracing::warn!(creature = name, value, "Unrecognized saving throw");
    }

    throws
}

/// Saving throws that name no attribute. Blank and placeholder values are
/// not reported.
pub fn unrecognized_saving_throws(throws: &[String]) -> Vec<&str> {
    throws
        .iter()
        .map(|throw| throw.trim())
        .filter(|value| !value.is_empty() && *value != PLACEHOLDER && !is_attribute(value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pokemon::columns::{default_header, DEFAULT_HEADER};
    use serde_json::json;

    fn row(cells: &[(&str, &str)]) -> Row {
        let mut values = vec![String::new(); DEFAULT_HEADER.len()];
        for (column, value) in cells {
            let position = DEFAULT_HEADER.iter().position(|c| c == column).unwrap();
            values[position] = value.to_string();
        }
        Row::new(values)
    }

    fn columns() -> CreatureColumns {
        CreatureColumns::resolve(&default_header()).unwrap()
    }

    fn charmander() -> Row {
        row(&[
            ("Index Number", "4"),
            ("Pokémon", "Charmander"),
            ("Type", "Fire"),
            ("SR", "0.5"),
            ("AC", "13"),
            ("Hit Dice", "6"),
            ("HP", "18"),
            ("WSp", "30"),
            ("Senses", "Darkvision, Keen Smell"),
            ("STR", "10"),
            ("DEX", "14"),
            ("CON", "12"),
            ("INT", "8"),
            ("WIS", "10"),
            ("CHA", "10"),
            ("MIN LVL FD", "1"),
            ("Evolve", "Yes"),
            ("ST1", "DEX"),
            ("Skill", "Acrobatics"),
            ("Ability1", "Blaze"),
            ("Ability2", "None"),
            ("HiddenAbility", "Solar Power"),
            ("Moves", "Starting Moves: Scratch, Growl Level 2: Ember Level 6: TM: 1, 35"),
            ("Size", "Small"),
        ])
    }

    fn built(row: &Row) -> CreatureRecord {
        let mut record = CreatureRecord::from_row("Charmander", row, &columns());
        record.cleanup();
        record
    }

    #[test]
    fn test_from_row_basic_fields() {
        let record = built(&charmander());

        assert_eq!(record.index, Some(4));
        assert_eq!(record.sr, Some(0.5));
        assert_eq!(record.hp, Some(18));
        assert_eq!(record.walking_speed, Some(30));
        assert_eq!(record.swimming_speed, None);
        assert_eq!(record.attributes.dexterity, Some(14));
        assert_eq!(record.types, Some(vec!["Fire".to_string()]));
        assert_eq!(
            record.senses,
            Some(vec!["Darkvision".to_string(), "Keen Smell".to_string()])
        );
        assert_eq!(record.size.as_deref(), Some("Small"));
        assert_eq!(record.hidden_ability.as_deref(), Some("Solar Power"));
    }

    #[test]
    fn test_cleanup() {
        let record = built(&charmander());

        assert_eq!(record.abilities, Some(vec!["Blaze".to_string()]));
        assert_eq!(record.saving_throws, Some(vec!["DEX".to_string()]));
        assert_eq!(record.moves.tm, Some(vec![1, 35]));
        assert!(!record.moves.level.contains_key("6"));
        assert_eq!(record.moves.level["2"], vec!["Ember".to_string()]);
    }

    #[test]
    fn test_cleanup_drops_empty_lists() {
        let record = built(&row(&[("Pokémon", "Ditto"), ("Moves", "Starting Moves: Transform TM:")]));

        assert_eq!(record.abilities, None);
        assert_eq!(record.skills, None);
        assert_eq!(record.saving_throws, None);
        assert_eq!(record.moves.tm, None);

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("Abilities").is_none());
        assert!(value["Moves"].get("TM").is_none());
        assert_eq!(value["Moves"]["Starting Moves"], json!(["Transform"]));
    }

    #[test]
    fn test_saving_throws_all() {
        let record = built(&row(&[("Pokémon", "Mew"), ("ST1", "All"), ("ST2", "STR")]));
        assert_eq!(
            record.saving_throws,
            Some(ATTRIBUTES.iter().map(|a| a.to_string()).collect())
        );
    }

    #[test]
    fn test_unrecognized_saving_throw_kept() {
        let record = built(&row(&[("Pokémon", "Mew"), ("ST1", "Luck"), ("ST2", "Wisdom")]));
        assert_eq!(
            record.saving_throws,
            Some(vec!["Luck".to_string(), "Wisdom".to_string()])
        );
    }

    #[test]
    fn test_serialized_keys() {
        let value = serde_json::to_value(built(&charmander())).unwrap();

        assert_eq!(value["index"], json!(4));
        assert_eq!(value["SR"], json!(0.5));
        assert_eq!(value["MIN LVL FD"], json!(1));
        assert_eq!(value["attributes"]["STR"], json!(10));
        assert_eq!(value["Hidden Ability"], json!("Solar Power"));
        assert_eq!(value["Moves"]["Starting Moves"], json!(["Scratch", "Growl"]));
        assert!(value.get("Ssp").is_none());
    }

    #[test]
    fn test_apply_override() {
        let mut record = built(&charmander());
        let overlay = json!({
            "SR": 1,
            "size": null,
            "attributes": {"STR": 11},
            "Moves": {"Level": {"10": ["Flame Burst"]}},
            "notes": "Starter"
        });

        record
            .apply_override("Charmander", overlay.as_object().unwrap())
            .unwrap();

        assert_eq!(record.sr, Some(1.0));
        assert_eq!(record.size, None);
        assert_eq!(record.attributes.strength, Some(11));
        assert_eq!(record.attributes.dexterity, Some(14));
        assert_eq!(record.moves.level["10"], vec!["Flame Burst".to_string()]);
        assert_eq!(record.moves.level["2"], vec!["Ember".to_string()]);
        assert_eq!(record.extra["notes"], json!("Starter"));
    }

    #[test]
    fn test_override_keeps_unknown_attribute() {
        let mut record = built(&charmander());
        let overlay = json!({"attributes": {"SPD": 3}});

        record
            .apply_override("Charmander", overlay.as_object().unwrap())
            .unwrap();

        assert_eq!(record.attributes.strength, Some(10));
        assert_eq!(record.attributes.extra["SPD"], json!(3));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["attributes"]["SPD"], json!(3));
        assert_eq!(value["attributes"]["STR"], json!(10));
    }

    #[test]
    fn test_null_override_clears_nested_fields() {
        let mut record = built(&charmander());
        let overlay = json!({"Moves": {"Starting Moves": null, "TM": null}});
        record
            .apply_override("Charmander", overlay.as_object().unwrap())
            .unwrap();

        assert!(record.moves.starting.is_empty());
        assert_eq!(record.moves.tm, None);
        assert_eq!(record.moves.level["2"], vec!["Ember".to_string()]);

        let overlay = json!({"attributes": null, "Moves": null});
        record
            .apply_override("Charmander", overlay.as_object().unwrap())
            .unwrap();

        assert_eq!(record.attributes, Attributes::default());
        assert_eq!(record.moves, MoveSet::default());
        assert_eq!(record.hp, Some(18));
    }

    #[test]
    fn test_unrecognized_saving_throws_reported() {
        let throws: Vec<String> = ["Luck", " Wisdom ", "None", "", "DEX", "Speed "]
            .iter()
            .map(|t| t.to_string())
            .collect();
        assert_eq!(unrecognized_saving_throws(&throws), vec!["Luck", "Speed"]);

        let record = built(&row(&[("Pokémon", "Mew"), ("ST1", "Luck"), ("ST2", "None")]));
        let throws = record.saving_throws.unwrap_or_default();
        assert_eq!(unrecognized_saving_throws(&throws), vec!["Luck"]);
    }

    #[test]
    fn test_override_shape_mismatch() {
        let mut record = built(&charmander());
        let overlay = json!({"HP": "lots"});

        let err = record
            .apply_override("Charmander", overlay.as_object().unwrap())
            .unwrap_err();
        assert!(matches!(err, ConvertError::OverrideShape { .. }));
    }

    #[test]
    fn test_empty_override_round_trip() {
        let source = charmander();

        let mut with_override = CreatureRecord::from_row("Charmander", &source, &columns());
        with_override.apply_override("Charmander", &Map::new()).unwrap();
        with_override.cleanup();

        assert_eq!(with_override, built(&source));
    }

    #[test]
    fn test_species_name_strips_line_breaks() {
        assert_eq!(species_name("Nidoran\n♀"), "Nidoran ♀");
        assert_eq!(species_name("Mr.\r\nMime"), "Mr. Mime");
    }
}
