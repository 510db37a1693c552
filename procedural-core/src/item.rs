//! Item model consumed by the itemization pipeline.
//!
//! [`GeneratedItem`] is the loot item under construction, created by an
//! external factory and lent to exactly one pipeline call. [`TreasureProfile`]
//! and [`TreasureRoll`] describe the drop that produced it.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_TIER, MIN_TIER};
use crate::error::{LootError, LootResult};
use crate::spells::SpellId;

// =====================================================
// Item enums
// =====================================================

/// Legacy category discriminator used to pick a spell family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeenieType {
    #[default]
    Generic,
    Clothing,
    MeleeWeapon,
    MissileLauncher,
    Caster,
    Gem,
    Food,
}

/// Broad item type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemType {
    #[default]
    Misc,
    Armor,
    Clothing,
    Jewelry,
    MeleeWeapon,
    MissileWeapon,
    Caster,
    Gem,
    Food,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    HeavyWeapons,
    LightWeapons,
    FinesseWeapons,
    TwoHandedCombat,
    MissileWeapons,
    WarMagic,
    LifeMagic,
    VoidMagic,
    MeleeDefense,
    MissileDefense,
    MagicDefense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heritage {
    Aluvian,
    Gharundim,
    Sho,
}

impl Heritage {
    pub fn all() -> [Heritage; 3] {
        [Heritage::Aluvian, Heritage::Gharundim, Heritage::Sho]
    }

    /// Player-facing restriction label
    pub fn label(self) -> &'static str {
        match self {
            Heritage::Aluvian => "Aluvian",
            Heritage::Gharundim => "Gharu'ndim",
            Heritage::Sho => "Sho",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WieldRequirement {
    Skill,
    RawSkill,
    Attribute,
    Level,
}

/// Visual marker shown on the item icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UiEffects {
    Magical,
    Fire,
    Frost,
    Acid,
    Lightning,
}

// =====================================================
// Spellbook
// =====================================================

/// Insertion-ordered spell set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spellbook {
    spells: Vec<SpellId>,
}

impl Spellbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `spell`; returns false if it was already known
    pub fn add(&mut self, spell: SpellId) -> bool {
        if self.spells.contains(&spell) {
            return false;
        }
        self.spells.push(spell);
        true
    }

    pub fn contains(&self, spell: SpellId) -> bool {
        self.spells.contains(&spell)
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = SpellId> + '_ {
        self.spells.iter().copied()
    }

    pub fn as_slice(&self) -> &[SpellId] {
        &self.spells
    }

    pub fn clear(&mut self) {
        self.spells.clear();
    }
}

// =====================================================
// Generated item
// =====================================================

/// Loot item under construction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedItem {
    pub name: String,
    pub weenie_type: WeenieType,
    pub item_type: ItemType,
    pub is_shield: bool,

    pub spellbook: Spellbook,
    /// Innate spell
    pub spell_did: Option<SpellId>,
    pub proc_spell: Option<SpellId>,

    pub item_mana_cost: Option<i32>,
    pub item_max_mana: Option<i32>,
    pub item_cur_mana: Option<i32>,
    pub mana_rate: Option<f32>,
    pub item_spellcraft: Option<i32>,
    pub item_difficulty: Option<i32>,
    pub item_workmanship: Option<i32>,

    pub item_skill_limit: Option<Skill>,
    pub item_skill_level_limit: Option<i32>,
    pub heritage_group: Option<Heritage>,
    pub item_heritage_group_restriction: Option<String>,
    pub item_allegiance_rank_limit: Option<i32>,

    pub wield_requirements: Option<WieldRequirement>,
    pub wield_skill_type: Option<Skill>,
    pub wield_difficulty: Option<i32>,
    pub weapon_skill: Option<Skill>,

    pub ui_effects: Option<UiEffects>,
}

impl GeneratedItem {
    pub fn new(name: impl Into<String>, weenie_type: WeenieType, item_type: ItemType) -> Self {
        Self {
            name: name.into(),
            weenie_type,
            item_type,
            ..Self::default()
        }
    }

    /// True if the item carries any spell source (spellbook, innate or proc)
    pub fn has_spell_source(&self) -> bool {
        !self.spellbook.is_empty() || self.spell_did.is_some() || self.proc_spell.is_some()
    }

    /// Every spell on the item: innate first, then spellbook, then proc
    pub fn all_spells(&self) -> impl Iterator<Item = SpellId> + '_ {
        self.spell_did
            .into_iter()
            .chain(self.spellbook.iter())
            .chain(self.proc_spell)
    }
}

// =====================================================
// Treasure profile & roll
// =====================================================

/// Tier and quality of a loot drop. Immutable once drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTreasureProfile")]
pub struct TreasureProfile {
    tier: u32,
    loot_quality_mod: f32,
}

#[derive(Deserialize)]
struct RawTreasureProfile {
    tier: u32,
    loot_quality_mod: f32,
}

impl TryFrom<RawTreasureProfile> for TreasureProfile {
    type Error = LootError;

    fn try_from(raw: RawTreasureProfile) -> LootResult<Self> {
        Self::new(raw.tier, raw.loot_quality_mod)
    }
}

impl TreasureProfile {
    pub fn new(tier: u32, loot_quality_mod: f32) -> LootResult<Self> {
        if !(MIN_TIER..=MAX_TIER).contains(&tier) {
            return Err(LootError::InvalidTier(tier));
        }
        if !(0.0..1.0).contains(&loot_quality_mod) {
            return Err(LootError::InvalidQualityMod(loot_quality_mod));
        }
        Ok(Self {
            tier,
            loot_quality_mod,
        })
    }

    pub fn tier(&self) -> u32 {
        self.tier
    }

    pub fn loot_quality_mod(&self) -> f32 {
        self.loot_quality_mod
    }
}

/// Treasure-roll item category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreasureItemType {
    Armor { cloth: bool, shield: bool },
    MeleeWeapon,
    MissileWeapon,
    Caster,
    Jewelry,
    Clothing,
    Gem,
    Dinnerware,
    Other,
}

/// Specific item kinds that change restriction odds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TreasureItemKind {
    Crown,
    #[default]
    Other,
}

/// Descriptor of what the treasure system rolled for this item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreasureRoll {
    pub item_type: TreasureItemType,
    pub kind: TreasureItemKind,
    pub heritage: Option<Heritage>,
    /// Base difficulty contribution added to arcane lore
    pub item_difficulty: f32,
}

impl TreasureRoll {
    pub fn new(item_type: TreasureItemType) -> Self {
        Self {
            item_type,
            kind: TreasureItemKind::Other,
            heritage: None,
            item_difficulty: 0.0,
        }
    }

    pub fn with_kind(mut self, kind: TreasureItemKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_heritage(mut self, heritage: Heritage) -> Self {
        self.heritage = Some(heritage);
        self
    }

    pub fn with_item_difficulty(mut self, item_difficulty: f32) -> Self {
        self.item_difficulty = item_difficulty;
        self
    }

    pub fn is_armor(&self) -> bool {
        matches!(self.item_type, TreasureItemType::Armor { .. })
    }

    pub fn is_cloth_armor(&self) -> bool {
        matches!(self.item_type, TreasureItemType::Armor { cloth: true, .. })
    }

    pub fn is_shield(&self) -> bool {
        matches!(self.item_type, TreasureItemType::Armor { shield: true, .. })
    }

    pub fn is_melee_weapon(&self) -> bool {
        self.item_type == TreasureItemType::MeleeWeapon
    }

    pub fn is_missile_weapon(&self) -> bool {
        self.item_type == TreasureItemType::MissileWeapon
    }

    pub fn is_caster(&self) -> bool {
        self.item_type == TreasureItemType::Caster
    }

    pub fn is_weapon(&self) -> bool {
        self.is_melee_weapon() || self.is_missile_weapon() || self.is_caster()
    }

    pub fn is_jewelry(&self) -> bool {
        self.item_type == TreasureItemType::Jewelry
    }

    pub fn is_clothing(&self) -> bool {
        self.item_type == TreasureItemType::Clothing
    }

    pub fn is_gem(&self) -> bool {
        self.item_type == TreasureItemType::Gem
    }

    pub fn is_dinnerware(&self) -> bool {
        self.item_type == TreasureItemType::Dinnerware
    }

    pub fn is_crown(&self) -> bool {
        self.kind == TreasureItemKind::Crown
    }
}
