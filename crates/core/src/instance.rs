//! Recurring in-game instances and the per-character completion side-table.
//!
//! The tick table is ephemeral: it lives in memory of whoever owns it and is
//! cleared only by an explicit reset. Nothing here is persisted.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::types::DbId;

/// Minimum base level required to enter any tracked instance.
pub const INSTANCE_MIN_LEVEL: i32 = 250;

// ---------------------------------------------------------------------------
// Instance codes
// ---------------------------------------------------------------------------

/// A tracked instance, identified by its short code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstanceCode {
    Ngh,
    Hgh,
    Cogh,
    Lof,
    Hol,
    Ct,
}

impl InstanceCode {
    /// Every tracked instance, in display order.
    pub const ALL: &'static [InstanceCode] = &[
        Self::Ngh,
        Self::Hgh,
        Self::Cogh,
        Self::Lof,
        Self::Hol,
        Self::Ct,
    ];

    /// The short code as typed by users (`"LOF"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ngh => "NGH",
            Self::Hgh => "HGH",
            Self::Cogh => "COGH",
            Self::Lof => "LOF",
            Self::Hol => "HOL",
            Self::Ct => "CT",
        }
    }

    /// Parse a code, ignoring ASCII case. Returns `None` for unknown codes.
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.as_str().eq_ignore_ascii_case(s))
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ngh => "Glast Heim normal",
            Self::Hgh => "Glast Heim hard",
            Self::Cogh => "Glast Heim challenge",
            Self::Lof => "Lake of Fire",
            Self::Hol => "Hall of Life",
            Self::Ct => "Constellation Tower",
        }
    }

    /// Whether completion is shared by every character of the same account.
    ///
    /// Hall of Life resets weekly per master account, so ticking it on one
    /// character ticks it for all of them.
    pub fn is_account_wide(&self) -> bool {
        matches!(self, Self::Hol)
    }
}

impl std::fmt::Display for InstanceCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalogue entry describing an instance.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceInfo {
    pub code: InstanceCode,
    pub name: &'static str,
    pub min_level: i32,
    pub account_wide: bool,
}

/// The full instance catalogue.
pub fn instance_catalogue() -> Vec<InstanceInfo> {
    InstanceCode::ALL
        .iter()
        .map(|code| InstanceInfo {
            code: *code,
            name: code.display_name(),
            min_level: INSTANCE_MIN_LEVEL,
            account_wide: code.is_account_wide(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tick table
// ---------------------------------------------------------------------------

/// Per-character instance completion flags.
#[derive(Debug, Clone, Default)]
pub struct InstanceTicks {
    ticks: HashMap<DbId, HashSet<InstanceCode>>,
}

impl InstanceTicks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `code` has been completed by `character_id`. Unset means no.
    pub fn is_ticked(&self, character_id: DbId, code: InstanceCode) -> bool {
        self.ticks
            .get(&character_id)
            .is_some_and(|codes| codes.contains(&code))
    }

    /// Completed codes of one character, in display order.
    pub fn codes_for(&self, character_id: DbId) -> Vec<InstanceCode> {
        InstanceCode::ALL
            .iter()
            .copied()
            .filter(|code| self.is_ticked(character_id, *code))
            .collect()
    }

    /// Set or clear a single flag.
    pub fn set(&mut self, character_id: DbId, code: InstanceCode, ticked: bool) {
        if ticked {
            self.ticks.entry(character_id).or_default().insert(code);
        } else if let Some(codes) = self.ticks.get_mut(&character_id) {
            codes.remove(&code);
            if codes.is_empty() {
                self.ticks.remove(&character_id);
            }
        }
    }

    /// Set or clear a flag on several characters at once (account-wide codes).
    pub fn set_many(
        &mut self,
        character_ids: impl IntoIterator<Item = DbId>,
        code: InstanceCode,
        ticked: bool,
    ) {
        for id in character_ids {
            self.set(id, code, ticked);
        }
    }

    /// Drop every flag of a character (used when the character is deleted).
    pub fn forget(&mut self, character_id: DbId) {
        self.ticks.remove(&character_id);
    }

    /// Clear the whole table.
    pub fn reset(&mut self) {
        self.ticks.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Ordered view of the table for serialization.
    pub fn snapshot(&self) -> BTreeMap<DbId, Vec<InstanceCode>> {
        self.ticks
            .iter()
            .map(|(id, codes)| {
                let mut codes: Vec<InstanceCode> = codes.iter().copied().collect();
                codes.sort();
                (*id, codes)
            })
            .collect()
    }
}
