//! Canonical creature sheet layout.

use crate::error::Result;
use crate::table::Header;

/// Column holding the creature name.
pub const POKEMON: &str = "Pokémon";

/// Column names of the creature sheet, in sheet order.
///
/// The sheet's own header line is discarded; columns are addressed through
/// this list. The two blank names are unused columns.
pub const DEFAULT_HEADER: [&str; 42] = [
    "Index Number",
    "Evo Stages with Eviolite",
    "Evo Stages w/o Eviolite",
    POKEMON,
    "Type",
    "SR",
    "AC",
    "Hit Dice",
    "HP",
    "",
    "",
    "WSp",
    "Ssp",
    "Fsp",
    "Senses",
    "STR",
    "DEX",
    "CON",
    "INT",
    "WIS",
    "CHA",
    "MIN LVL FD",
    "Ev",
    "Evolve",
    "Evo Stages",
    "ST1",
    "ST2",
    "ST3",
    "Skill",
    "Res",
    "Vul",
    "Imm",
    "Ability1",
    "Ability2",
    "HiddenAbility",
    "Moves",
    "Evolution for sheet",
    "Evolve Bonus",
    "Climbing Speed",
    "Burrowing Speed",
    "Description 17",
    "Size",
];

/// Attribute abbreviations, in canonical order.
pub const ATTRIBUTES: [&str; 6] = ["STR", "CON", "DEX", "INT", "WIS", "CHA"];

/// Long attribute names, matching [`ATTRIBUTES`] by position.
pub const ATTRIBUTES_FULL: [&str; 6] = [
    "Strength",
    "Constitution",
    "Dexterity",
    "Intelligence",
    "Wisdom",
    "Charisma",
];

/// The canonical creature header.
pub fn default_header() -> Header {
    Header::new(DEFAULT_HEADER)
}

/// Positions of every column the creature pipeline reads.
///
/// Resolved once per sheet so a missing column fails before any row is
/// built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatureColumns {
    pub name: usize,
    pub index: usize,
    pub current_stage: usize,
    pub total_stages: usize,
    pub types: usize,
    pub sr: usize,
    pub ac: usize,
    pub hit_dice: usize,
    pub hp: usize,
    pub walking_speed: usize,
    pub swimming_speed: usize,
    pub flying_speed: usize,
    pub climbing_speed: usize,
    pub burrowing_speed: usize,
    pub senses: usize,
    /// Attribute abbreviation -> column, in sheet order
    pub attributes: [(&'static str, usize); 6],
    pub min_level: usize,
    pub evolve: usize,
    pub saving_throws: [usize; 3],
    pub skill: usize,
    pub abilities: [usize; 2],
    pub hidden_ability: usize,
    pub moves: usize,
    pub evolution_text: usize,
    pub size: usize,
}

impl CreatureColumns {
    /// Resolve every column against `header`.
    ///
    /// # Errors
    /// [`crate::ConvertError::MissingColumn`] naming the first column that
    /// is not in the header, starting with the creature name column.
    pub fn resolve(header: &Header) -> Result<Self> {
        let name = header.require(POKEMON)?;
        let attribute = |abbreviation: &'static str| -> Result<(&'static str, usize)> {
            Ok((abbreviation, header.require(abbreviation)?))
        };

        Ok(Self {
            name,
            index: header.require("Index Number")?,
            current_stage: header.require("Evo Stages with Eviolite")?,
            total_stages: header.require("Evo Stages w/o Eviolite")?,
            types: header.require("Type")?,
            sr: header.require("SR")?,
            ac: header.require("AC")?,
            hit_dice: header.require("Hit Dice")?,
            hp: header.require("HP")?,
            walking_speed: header.require("WSp")?,
            swimming_speed: header.require("Ssp")?,
            flying_speed: header.require("Fsp")?,
            climbing_speed: header.require("Climbing Speed")?,
            burrowing_speed: header.require("Burrowing Speed")?,
            senses: header.require("Senses")?,
            attributes: [
                attribute("STR")?,
                attribute("DEX")?,
                attribute("CON")?,
                attribute("INT")?,
                attribute("WIS")?,
                attribute("CHA")?,
            ],
            min_level: header.require("MIN LVL FD")?,
            evolve: header.require("Evolve")?,
            saving_throws: [
                header.require("ST1")?,
                header.require("ST2")?,
                header.require("ST3")?,
            ],
            skill: header.require("Skill")?,
            abilities: [header.require("Ability1")?, header.require("Ability2")?],
            hidden_ability: header.require("HiddenAbility")?,
            moves: header.require("Moves")?,
            evolution_text: header.require("Evolution for sheet")?,
            size: header.require("Size")?,
        })
    }
}

/// Whether `value` names an attribute, short or long form.
pub fn is_attribute(value: &str) -> bool {
    ATTRIBUTES.contains(&value) || ATTRIBUTES_FULL.contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;

    #[test]
    fn test_resolve_default_header() {
        let columns = CreatureColumns::resolve(&default_header()).unwrap();
        assert_eq!(columns.name, 3);
        assert_eq!(columns.hp, 8);
        assert_eq!(columns.attributes[0], ("STR", 15));
        assert_eq!(columns.size, 41);
    }

    #[test]
    fn test_missing_name_column_reported_first() {
        let header = Header::new(["Index Number", "Type"]);
        let err = CreatureColumns::resolve(&header).unwrap_err();
        assert!(matches!(err, ConvertError::MissingColumn(name) if name == POKEMON));
    }

    #[test]
    fn test_is_attribute() {
        assert!(is_attribute("WIS"));
        assert!(is_attribute("Charisma"));
        assert!(!is_attribute("Luck"));
        assert!(!is_attribute("str"));
    }
}
