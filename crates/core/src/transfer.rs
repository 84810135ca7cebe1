//! Roster export documents and import reconciliation.
//!
//! Import accepts three historical payload shapes:
//!
//! - an array of accounts, each optionally embedding a `characters` array;
//! - an object with sibling `accounts` and `characters` arrays;
//! - a legacy object whose `accounts` is a map of name-bearing values.
//!
//! Reconciliation is a pure function of the payload and a snapshot of the
//! existing store. New IDs start above the snapshot's high-water marks, old
//! account IDs are remapped, and characters whose account cannot be resolved
//! are skipped and reported instead of aborting the import.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::CoreError;
use crate::job_class::{canonical_job_class, DEFAULT_JOB_CLASS};
use crate::roster::{validate_level, validate_name, AccountRecord, CharacterRecord};
use crate::types::DbId;

/// File name suggested for downloaded exports.
pub const EXPORT_FILE_NAME: &str = "ro_manager_export.json";

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// The full-roster export document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterExport {
    pub accounts: Vec<AccountRecord>,
    pub characters: Vec<CharacterRecord>,
}

/// The roster seeded into an empty store on request.
pub fn sample_roster() -> Value {
    json!({
        "accounts": [
            { "id": 1, "name": "Kolanthes", "sortOrder": 0 },
            { "id": 2, "name": "Kuma", "sortOrder": 1 },
            { "id": 3, "name": "akeruh", "sortOrder": 2 }
        ],
        "characters": [
            { "accountId": 1, "name": "SalmonHaki", "class": "Biolo", "lvl": 250 },
            { "accountId": 1, "name": "AkumaNoMi", "class": "Novice", "lvl": 10 }
        ]
    })
}

// ---------------------------------------------------------------------------
// Payload shapes
// ---------------------------------------------------------------------------

/// Which historical format an import payload was recognised as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadShape {
    /// `[ { id, name, sortOrder, characters: [...] }, ... ]`
    AccountArray,
    /// `{ accounts: [...], characters: [...] }`
    SplitLists,
    /// `{ accounts: { key: { name } | "name", ... } }`
    LegacyAccountMap,
}

impl PayloadShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountArray => "account_array",
            Self::SplitLists => "split_lists",
            Self::LegacyAccountMap => "legacy_account_map",
        }
    }
}

/// Recognise the payload shape without reading any records.
pub fn detect_shape(payload: &Value) -> Result<PayloadShape, CoreError> {
    match payload {
        Value::Array(_) => Ok(PayloadShape::AccountArray),
        Value::Object(obj) => {
            let accounts = non_null(obj.get("accounts"));
            let characters = non_null(obj.get("characters"));
            match (accounts, characters) {
                (Some(Value::Array(_)), _) => Ok(PayloadShape::SplitLists),
                (Some(Value::Object(_)), _) => Ok(PayloadShape::LegacyAccountMap),
                (Some(_), _) => Err(CoreError::Validation(
                    "'accounts' must be an array or an object".to_string(),
                )),
                (None, Some(_)) => Ok(PayloadShape::SplitLists),
                (None, None) => Err(CoreError::Validation(
                    "Unrecognized import format: expected an array of accounts or an object \
                     with 'accounts' and/or 'characters'"
                        .to_string(),
                )),
            }
        }
        _ => Err(CoreError::Validation(
            "Import payload must be a JSON array or object".to_string(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// An imported account before ID allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateAccount {
    pub name: String,
    pub sort_order: i32,
    pub provided_id: Option<DbId>,
}

/// How an imported character refers to its account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRef {
    /// Embedded under the imported account at this position.
    Parent(usize),
    /// Explicit `oldAccountId`.
    OldId(DbId),
    /// Plain `accountId`.
    Raw(DbId),
    Missing,
}

impl AccountRef {
    fn reference(&self) -> Option<DbId> {
        match self {
            Self::OldId(id) | Self::Raw(id) => Some(*id),
            Self::Parent(_) | Self::Missing => None,
        }
    }
}

/// An imported character before validation and ID allocation.
///
/// Fields are kept loose so bad records can be skipped with a reason.
#[derive(Debug, Clone)]
pub struct CandidateCharacter {
    pub account_ref: AccountRef,
    pub record: Value,
}

/// Both flattened candidate lists, in input order.
#[derive(Debug, Clone)]
pub struct NormalizedImport {
    pub shape: PayloadShape,
    pub accounts: Vec<CandidateAccount>,
    pub characters: Vec<CandidateCharacter>,
}

/// Detect the shape and flatten the payload into candidate lists.
///
/// Fails when the shape is unrecognised, an account entry is unusable, or
/// the payload carries no records at all.
pub fn normalize(payload: &Value) -> Result<NormalizedImport, CoreError> {
    let shape = detect_shape(payload)?;
    let mut accounts = Vec::new();
    let mut characters = Vec::new();

    match (shape, payload) {
        (PayloadShape::AccountArray, Value::Array(items)) => {
            collect_accounts(items, &mut accounts, &mut characters)?;
        }
        (PayloadShape::SplitLists, Value::Object(obj)) => {
            if let Some(items) = non_null(obj.get("accounts")).and_then(Value::as_array) {
                collect_accounts(items, &mut accounts, &mut characters)?;
            }
            collect_characters(obj, &mut characters)?;
        }
        (PayloadShape::LegacyAccountMap, Value::Object(obj)) => {
            if let Some(map) = obj.get("accounts").and_then(Value::as_object) {
                collect_legacy_accounts(map, &mut accounts)?;
            }
            collect_characters(obj, &mut characters)?;
        }
        _ => {
            return Err(CoreError::Internal(format!(
                "Payload does not fit detected shape {}",
                shape.as_str()
            )))
        }
    }

    if accounts.is_empty() && characters.is_empty() {
        return Err(CoreError::Validation(
            "No accounts or characters found in import payload".to_string(),
        ));
    }

    Ok(NormalizedImport {
        shape,
        accounts,
        characters,
    })
}

fn collect_accounts(
    items: &[Value],
    accounts: &mut Vec<CandidateAccount>,
    characters: &mut Vec<CandidateCharacter>,
) -> Result<(), CoreError> {
    for (index, item) in items.iter().enumerate() {
        let obj = item.as_object().ok_or_else(|| {
            CoreError::Validation(format!("Account at index {index} must be a JSON object"))
        })?;
        let name = obj.get("name").and_then(Value::as_str).unwrap_or_default();
        let name = validate_name("Account", name)
            .map_err(|e| with_context(&format!("Account at index {index}"), e))?;

        let parent = accounts.len();
        accounts.push(CandidateAccount {
            name,
            sort_order: field(obj, &["sortOrder", "sort_order"])
                .and_then(as_i32)
                .unwrap_or(0),
            provided_id: field(obj, &["id"]).and_then(as_id),
        });

        if let Some(embedded) = obj.get("characters").and_then(Value::as_array) {
            characters.extend(embedded.iter().map(|record| CandidateCharacter {
                account_ref: AccountRef::Parent(parent),
                record: record.clone(),
            }));
        }
    }
    Ok(())
}

/// Legacy maps carry no usable identity; IDs are fabricated from iteration
/// order (1, 2, ...) so sibling characters can still refer to them.
fn collect_legacy_accounts(
    map: &Map<String, Value>,
    accounts: &mut Vec<CandidateAccount>,
) -> Result<(), CoreError> {
    for (index, (key, value)) in legacy_key_order(map).into_iter().enumerate() {
        let name = match value {
            Value::String(name) => name.as_str(),
            Value::Object(obj) => obj.get("name").and_then(Value::as_str).unwrap_or_default(),
            _ => "",
        };
        let name = validate_name("Account", name)
            .map_err(|e| with_context(&format!("Legacy account '{key}'"), e))?;
        accounts.push(CandidateAccount {
            name,
            sort_order: 0,
            provided_id: Some(index as DbId + 1),
        });
    }
    Ok(())
}

/// Entries in the order the legacy writer enumerated them: integer-like keys
/// ascending by value, then every other key in document order.
fn legacy_key_order(map: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let mut numeric: Vec<(u32, (&String, &Value))> = Vec::new();
    let mut named = Vec::new();
    for entry in map.iter() {
        match array_index(entry.0) {
            Some(n) => numeric.push((n, entry)),
            None => named.push(entry),
        }
    }
    numeric.sort_by_key(|(n, _)| *n);
    numeric.into_iter().map(|(_, entry)| entry).chain(named).collect()
}

/// Canonical decimal form below `u32::MAX`, with no sign or leading zeros.
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse::<u32>().ok().filter(|n| *n < u32::MAX)
}

fn collect_characters(
    obj: &Map<String, Value>,
    characters: &mut Vec<CandidateCharacter>,
) -> Result<(), CoreError> {
    let Some(list) = non_null(obj.get("characters")) else {
        return Ok(());
    };
    let items = list.as_array().ok_or_else(|| {
        CoreError::Validation("'characters' must be an array".to_string())
    })?;

    for record in items {
        let account_ref = match record.as_object() {
            Some(fields) => {
                if let Some(id) = field(fields, &["oldAccountId", "old_account_id"]).and_then(as_id) {
                    AccountRef::OldId(id)
                } else if let Some(id) = field(fields, &["accountId", "account_id"]).and_then(as_id) {
                    AccountRef::Raw(id)
                } else {
                    AccountRef::Missing
                }
            }
            None => AccountRef::Missing,
        };
        characters.push(CandidateCharacter {
            account_ref,
            record: record.clone(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// What the reconciler needs to know about the existing store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterSnapshot {
    /// Highest account ID ever handed out (0 when none).
    pub account_high_water: DbId,
    /// Highest character ID ever handed out (0 when none).
    pub character_high_water: DbId,
    /// IDs of accounts that currently exist.
    pub account_ids: HashSet<DbId>,
}

impl RosterSnapshot {
    /// Build a snapshot from in-memory records.
    pub fn from_records(accounts: &[AccountRecord], characters: &[CharacterRecord]) -> Self {
        Self {
            account_high_water: accounts.iter().map(|a| a.id).max().unwrap_or(0),
            character_high_water: characters.iter().map(|c| c.id).max().unwrap_or(0),
            account_ids: accounts.iter().map(|a| a.id).collect(),
        }
    }
}

/// Why an imported character was left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The account reference matched neither an imported nor an existing account.
    UnresolvedAccount { reference: Option<DbId> },
    /// A field was missing or out of range.
    InvalidRecord { message: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnresolvedAccount {
                reference: Some(id),
            } => write!(f, "account {id} not found"),
            Self::UnresolvedAccount { reference: None } => f.write_str("no account reference"),
            Self::InvalidRecord { message } => f.write_str(message),
        }
    }
}

/// A character that was not imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCharacter {
    /// Position among all imported characters, in input order.
    pub index: usize,
    pub name: Option<String>,
    pub reason: SkipReason,
}

/// Records to write, with their final IDs, plus everything skipped.
#[derive(Debug, Clone)]
pub struct ImportPlan {
    pub shape: PayloadShape,
    pub accounts: Vec<AccountRecord>,
    pub characters: Vec<CharacterRecord>,
    pub skipped: Vec<SkippedCharacter>,
}

/// Counts reported back to the caller after an import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub shape: PayloadShape,
    pub accounts_imported: usize,
    pub characters_imported: usize,
    pub characters_skipped: usize,
    pub skipped: Vec<SkippedCharacter>,
}

impl ImportPlan {
    pub fn summary(&self) -> ImportSummary {
        ImportSummary {
            shape: self.shape,
            accounts_imported: self.accounts.len(),
            characters_imported: self.characters.len(),
            characters_skipped: self.skipped.len(),
            skipped: self.skipped.clone(),
        }
    }

    /// Highest account ID allocated by this plan, if any.
    pub fn max_account_id(&self) -> Option<DbId> {
        self.accounts.iter().map(|a| a.id).max()
    }

    /// Highest character ID allocated by this plan, if any.
    pub fn max_character_id(&self) -> Option<DbId> {
        self.characters.iter().map(|c| c.id).max()
    }
}

/// Allocate IDs and resolve account references against `snapshot`.
pub fn reconcile(normalized: NormalizedImport, snapshot: &RosterSnapshot) -> ImportPlan {
    let mut next_account_id = snapshot.account_high_water + 1;
    let mut id_map: HashMap<DbId, DbId> = HashMap::new();
    let mut accounts = Vec::with_capacity(normalized.accounts.len());

    for candidate in normalized.accounts {
        let id = next_account_id;
        next_account_id += 1;
        if let Some(old) = candidate.provided_id {
            id_map.entry(old).or_insert(id);
        }
        accounts.push(AccountRecord {
            id,
            name: candidate.name,
            sort_order: candidate.sort_order,
        });
    }

    let resolve = |account_ref: AccountRef| -> Option<DbId> {
        match account_ref {
            AccountRef::Parent(position) => accounts.get(position).map(|a| a.id),
            AccountRef::OldId(id) | AccountRef::Raw(id) => id_map
                .get(&id)
                .copied()
                .or_else(|| snapshot.account_ids.contains(&id).then_some(id)),
            AccountRef::Missing => None,
        }
    };

    let mut next_character_id = snapshot.character_high_water + 1;
    let mut characters = Vec::with_capacity(normalized.characters.len());
    let mut skipped = Vec::new();

    for (index, candidate) in normalized.characters.into_iter().enumerate() {
        let name = candidate
            .record
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string);

        let fields = match character_fields(&candidate.record) {
            Ok(fields) => fields,
            Err(message) => {
                skipped.push(SkippedCharacter {
                    index,
                    name,
                    reason: SkipReason::InvalidRecord { message },
                });
                continue;
            }
        };

        let Some(account_id) = resolve(candidate.account_ref) else {
            skipped.push(SkippedCharacter {
                index,
                name,
                reason: SkipReason::UnresolvedAccount {
                    reference: candidate.account_ref.reference(),
                },
            });
            continue;
        };

        let (name, class, lvl) = fields;
        characters.push(CharacterRecord {
            id: next_character_id,
            account_id,
            name,
            class,
            lvl,
        });
        next_character_id += 1;
    }

    ImportPlan {
        shape: normalized.shape,
        accounts,
        characters,
        skipped,
    }
}

/// Normalize and reconcile in one step.
pub fn plan_import(payload: &Value, snapshot: &RosterSnapshot) -> Result<ImportPlan, CoreError> {
    let normalized = normalize(payload)?;
    Ok(reconcile(normalized, snapshot))
}

/// Validated `(name, class, lvl)` of an imported character record.
fn character_fields(record: &Value) -> Result<(String, String, i32), String> {
    let obj = record
        .as_object()
        .ok_or_else(|| "Character must be a JSON object".to_string())?;

    let name = obj.get("name").and_then(Value::as_str).unwrap_or_default();
    let name = validate_name("Character", name).map_err(message)?;

    let class = match non_null(obj.get("class")) {
        None => DEFAULT_JOB_CLASS,
        Some(Value::String(class)) => canonical_job_class(class).map_err(message)?,
        Some(_) => return Err("Character class must be a string".to_string()),
    };

    let lvl = obj
        .get("lvl")
        .and_then(as_i32)
        .ok_or_else(|| "Character level is missing or not a number".to_string())?;
    validate_level(lvl).map_err(message)?;

    Ok((name, class.to_string(), lvl))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn with_context(prefix: &str, err: CoreError) -> CoreError {
    match err {
        CoreError::Validation(msg) => CoreError::Validation(format!("{prefix}: {msg}")),
        other => other,
    }
}

/// Bare message of a validation error, for skip reasons.
fn message(err: CoreError) -> String {
    match err {
        CoreError::Validation(msg) => msg,
        other => other.to_string(),
    }
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// First non-null value among `keys`.
fn field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| non_null(obj.get(*key)))
}

/// IDs may arrive as numbers or numeric strings.
fn as_id(value: &Value) -> Option<DbId> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_i32(value: &Value) -> Option<i32> {
    as_id(value).and_then(|n| i32::try_from(n).ok())
}
