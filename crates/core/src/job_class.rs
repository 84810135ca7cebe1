//! The fixed job-class taxonomy characters are drawn from.
//!
//! Class names are accepted case-insensitively and always stored in the
//! canonical spelling listed here.

use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// Advancement tier a job class belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobTier {
    Novice,
    First,
    Second,
    Transcendent,
    Third,
    Fourth,
}

impl JobTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Novice => "novice",
            Self::First => "first",
            Self::Second => "second",
            Self::Transcendent => "transcendent",
            Self::Third => "third",
            Self::Fourth => "fourth",
        }
    }
}

impl std::fmt::Display for JobTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

/// A single entry of the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JobClass {
    pub name: &'static str,
    pub tier: JobTier,
}

const fn job(name: &'static str, tier: JobTier) -> JobClass {
    JobClass { name, tier }
}

/// Every selectable job class, grouped by tier.
pub const JOB_CLASSES: &[JobClass] = &[
    job("Novice", JobTier::Novice),
    job("Super Novice", JobTier::Novice),
    job("Swordman", JobTier::First),
    job("Mage", JobTier::First),
    job("Archer", JobTier::First),
    job("Acolyte", JobTier::First),
    job("Merchant", JobTier::First),
    job("Thief", JobTier::First),
    job("Knight", JobTier::Second),
    job("Priest", JobTier::Second),
    job("Wizard", JobTier::Second),
    job("Blacksmith", JobTier::Second),
    job("Hunter", JobTier::Second),
    job("Assassin", JobTier::Second),
    job("Crusader", JobTier::Second),
    job("Monk", JobTier::Second),
    job("Sage", JobTier::Second),
    job("Rogue", JobTier::Second),
    job("Alchemist", JobTier::Second),
    job("Bard", JobTier::Second),
    job("Dancer", JobTier::Second),
    job("Lord Knight", JobTier::Transcendent),
    job("High Priest", JobTier::Transcendent),
    job("High Wizard", JobTier::Transcendent),
    job("Whitesmith", JobTier::Transcendent),
    job("Sniper", JobTier::Transcendent),
    job("Assassin Cross", JobTier::Transcendent),
    job("Paladin", JobTier::Transcendent),
    job("Champion", JobTier::Transcendent),
    job("Professor", JobTier::Transcendent),
    job("Stalker", JobTier::Transcendent),
    job("Creator", JobTier::Transcendent),
    job("Clown", JobTier::Transcendent),
    job("Gypsy", JobTier::Transcendent),
    job("Rune Knight", JobTier::Third),
    job("Warlock", JobTier::Third),
    job("Ranger", JobTier::Third),
    job("Arch Bishop", JobTier::Third),
    job("Mechanic", JobTier::Third),
    job("Guillotine Cross", JobTier::Third),
    job("Royal Guard", JobTier::Third),
    job("Sorcerer", JobTier::Third),
    job("Minstrel", JobTier::Third),
    job("Wanderer", JobTier::Third),
    job("Sura", JobTier::Third),
    job("Genetic", JobTier::Third),
    job("Shadow Chaser", JobTier::Third),
    job("Dragon Knight", JobTier::Fourth),
    job("Arch Mage", JobTier::Fourth),
    job("Windhawk", JobTier::Fourth),
    job("Cardinal", JobTier::Fourth),
    job("Meister", JobTier::Fourth),
    job("Shadow Cross", JobTier::Fourth),
    job("Imperial Guard", JobTier::Fourth),
    job("Biolo", JobTier::Fourth),
    job("Troubadour", JobTier::Fourth),
    job("Trouvere", JobTier::Fourth),
    job("Inquisitor", JobTier::Fourth),
    job("Abyss Chaser", JobTier::Fourth),
    job("Elemental Master", JobTier::Fourth),
];

/// Class assigned when none is chosen.
pub const DEFAULT_JOB_CLASS: &str = "Novice";

/// Look up a class by name, ignoring case and surrounding whitespace.
pub fn find_job_class(name: &str) -> Option<&'static JobClass> {
    let needle = name.trim();
    JOB_CLASSES
        .iter()
        .find(|job| job.name.eq_ignore_ascii_case(needle))
}

/// Validate a class name and return its canonical spelling.
pub fn canonical_job_class(name: &str) -> Result<&'static str, CoreError> {
    find_job_class(name).map(|job| job.name).ok_or_else(|| {
        CoreError::Validation(format!("Unknown job class '{}'", name.trim()))
    })
}
