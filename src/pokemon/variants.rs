//! Variant groups.
//!
//! Some rows are alternate forms of one creature. The group's default row is
//! renamed to the group name and carries a `variant_data` block; every other
//! member is folded into that block as a diff and dropped from the outputs.

use super::{Creature, CreatureSet};
use crate::error::{ConvertError, Result};
use crate::merge::diff;
use crate::overrides::{VariantGroupDef, VariantMemberDef};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Group name -> original names of its members.
pub type VariantMap = IndexMap<String, Vec<String>>;

/// One entry of `variant_data.variants`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantEntry {
    pub display: String,
    pub original_species: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<Map<String, Value>>,
}

/// Variant block attached to a group's default record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantData {
    pub create_mode: String,
    pub permanent: bool,
    /// Variant identifier of the default member
    pub default: String,
    pub variants: IndexMap<String, VariantEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprite_suffix: Option<String>,
}

impl Creature {
    /// Make this creature the default member of `group_name`.
    ///
    /// # Errors
    /// [`ConvertError::DuplicateDefaultVariant`] if it already heads a group.
    pub fn add_default_variant(
        &mut self,
        group_name: &str,
        group: &VariantGroupDef,
        member: &VariantMemberDef,
    ) -> Result<()> {
        if self.variant_data.is_some() {
            return Err(ConvertError::DuplicateDefaultVariant {
                group: group_name.to_string(),
                name: member.name.clone(),
            });
        }

        self.variant_data = Some(VariantData {
            create_mode: group.create_mode.clone(),
            permanent: group.permanent,
            default: member.variant_name.clone(),
            variants: IndexMap::new(),
            sprite_suffix: group.sprite_suffix.clone(),
        });
        self.add_variant(group_name, member, None)
    }

    /// Register a variant. `other` is the variant's own creature, stored as
    /// a diff against this one; `None` for the default member itself.
    ///
    /// # Errors
    /// [`ConvertError::MissingDefaultVariant`] if no default was added yet.
    pub fn add_variant(
        &mut self,
        group_name: &str,
        member: &VariantMemberDef,
        other: Option<&Creature>,
    ) -> Result<()> {
        let delta = match other {
            Some(other) => Some(diff(
                &self.record.to_map(&self.name)?,
                &other.record.to_map(&other.name)?,
            )),
            None => None,
        };

        let data = self
            .variant_data
            .as_mut()
            .ok_or_else(|| ConvertError::MissingDefaultVariant {
                group: group_name.to_string(),
            })?;

        data.variants.insert(
            member.variant_name.clone(),
            VariantEntry {
                display: member.display().to_string(),
                original_species: member.original().to_string(),
                diff: delta,
            },
        );
        Ok(())
    }
}

/// Collapse every configured variant group.
///
/// Defaults are registered first so that a non-default member always finds
/// its default, whatever order the definition lists them in.
///
/// # Errors
/// - [`ConvertError::VariantNotFound`] when a member's row doesn't exist
/// - [`ConvertError::DuplicateDefaultVariant`] for a second default
/// - [`ConvertError::MissingDefaultVariant`] for members of a group with no default
pub fn collect_variant_data(
    creatures: &mut CreatureSet,
    groups: &IndexMap<String, VariantGroupDef>,
) -> Result<VariantMap> {
    let mut variant_map = VariantMap::new();
    // group name -> source key of its default creature
    let mut defaults: HashMap<&str, &str> = HashMap::new();
    let mut pending: Vec<(&str, &VariantMemberDef)> = Vec::new();

    for (group_name, group) in groups {
        for member in &group.variants {
            let creature = creatures
                .get_mut(&member.name)
                .ok_or_else(|| ConvertError::VariantNotFound {
                    group: group_name.clone(),
                    name: member.name.clone(),
                })?;

            if !member.default {
                pending.push((group_name.as_str(), member));
                continue;
            }

            if defaults.contains_key(group_name.as_str()) {
                return Err(ConvertError::DuplicateDefaultVariant {
                    group: group_name.clone(),
                    name: member.name.clone(),
                });
            }

            creature.add_default_variant(group_name, group, member)?;
            creature.name = group_name.clone();
            defaults.insert(group_name.as_str(), member.name.as_str());
            variant_map
                .entry(group_name.clone())
                .or_default()
                .push(member.original().to_string());
        }
    }

    for (group_name, member) in pending {
        let default_key = *defaults
            .get(group_name)
            .ok_or_else(|| ConvertError::MissingDefaultVariant {
                group: group_name.to_string(),
            })?;

        let variant = creatures
            .get_mut(&member.name)
            .ok_or_else(|| ConvertError::VariantNotFound {
                group: group_name.to_string(),
                name: member.name.clone(),
            })?;
        variant.valid = false;
        let variant = variant.clone();

        let default = creatures
            .get_mut(default_key)
            .ok_or_else(|| ConvertError::VariantNotFound {
                group: group_name.to_string(),
                name: default_key.to_string(),
            })?;
        default.add_variant(group_name, member, Some(&variant))?;

        variant_map
            .entry(group_name.to_string())
            .or_default()
            .push(member.original().to_string());
    }

    tracing::debug!("Collected {} variant groups", variant_map.len());
    Ok(variant_map)
}
