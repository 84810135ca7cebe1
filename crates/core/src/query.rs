//! Free-text roster query matching.
//!
//! A query is a conjunction of conditions. Fragments are separated by `+`;
//! inside a fragment, level comparators (`>250`, `<100`, `=99`, `250`) and
//! instance negations (`-LOF`) are split out as their own conditions and the
//! remaining words form a single free-text condition. So `Biolo >200 -NGH`
//! is three conditions while `Elemental master` stays one.
//!
//! Matching never fails: anything that cannot be interpreted is a
//! condition no character satisfies.

use std::sync::LazyLock;

use regex::Regex;

use crate::instance::{InstanceCode, InstanceTicks, INSTANCE_MIN_LEVEL};
use crate::roster::{AccountRecord, CharacterRecord};
use crate::types::DbId;

/// Separator between independently evaluated fragments.
pub const FRAGMENT_SEPARATOR: char = '+';

static INSTANCE_NEGATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-([A-Za-z]+)$").expect("valid regex"));

static LEVEL_COMPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([<>=])(.*)$").expect("valid regex"));

static BARE_LEVEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Searchable views
// ---------------------------------------------------------------------------

/// Character fields the matcher looks at.
pub trait SearchableCharacter {
    fn character_id(&self) -> DbId;
    fn owner_id(&self) -> DbId;
    fn character_name(&self) -> &str;
    fn job_class(&self) -> &str;
    fn level(&self) -> i32;
}

/// Account fields the matcher looks at.
pub trait SearchableAccount {
    fn account_id(&self) -> DbId;
    fn account_name(&self) -> &str;
}

impl SearchableCharacter for CharacterRecord {
    fn character_id(&self) -> DbId {
        self.id
    }
    fn owner_id(&self) -> DbId {
        self.account_id
    }
    fn character_name(&self) -> &str {
        &self.name
    }
    fn job_class(&self) -> &str {
        &self.class
    }
    fn level(&self) -> i32 {
        self.lvl
    }
}

impl SearchableAccount for AccountRecord {
    fn account_id(&self) -> DbId {
        self.id
    }
    fn account_name(&self) -> &str {
        &self.name
    }
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOp {
    Greater,
    Less,
    Equal,
}

impl LevelOp {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            ">" => Some(Self::Greater),
            "<" => Some(Self::Less),
            "=" => Some(Self::Equal),
            _ => None,
        }
    }

    fn holds(&self, lvl: i32, threshold: i32) -> bool {
        match self {
            Self::Greater => lvl > threshold,
            Self::Less => lvl < threshold,
            Self::Equal => lvl == threshold,
        }
    }
}

/// One atomic predicate of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `-CODE`: the instance is not yet completed. `code` is `None` for
    /// codes outside the catalogue, which never match.
    InstancePending {
        raw: String,
        code: Option<InstanceCode>,
    },
    /// Level comparison. `threshold` is `None` when the number is malformed,
    /// which never matches.
    Level {
        raw: String,
        op: LevelOp,
        threshold: Option<i32>,
    },
    /// Case-insensitive substring of name or class. `needle` is lowercased.
    Text { raw: String, needle: String },
}

impl Condition {
    /// Classify a single whitespace-free token, or `None` for plain words.
    fn classify_token(token: &str) -> Option<Self> {
        if let Some(caps) = INSTANCE_NEGATION_RE.captures(token) {
            return Some(Self::InstancePending {
                raw: token.to_string(),
                code: InstanceCode::from_str(&caps[1]),
            });
        }
        if let Some(caps) = LEVEL_COMPARATOR_RE.captures(token) {
            let op = LevelOp::from_symbol(&caps[1])?;
            return Some(Self::Level {
                raw: token.to_string(),
                op,
                threshold: parse_level(&caps[2]),
            });
        }
        if BARE_LEVEL_RE.is_match(token) {
            return Some(Self::Level {
                raw: token.to_string(),
                op: LevelOp::Equal,
                threshold: parse_level(token),
            });
        }
        None
    }

    fn text(words: &[&str]) -> Self {
        let raw = words.join(" ");
        let needle = raw.to_lowercase();
        Self::Text { raw, needle }
    }

    /// The text the user typed for this condition.
    pub fn raw(&self) -> &str {
        match self {
            Self::InstancePending { raw, .. } | Self::Level { raw, .. } | Self::Text { raw, .. } => {
                raw
            }
        }
    }

    pub fn is_level(&self) -> bool {
        matches!(self, Self::Level { .. })
    }

    /// Evaluate this condition against one character.
    pub fn matches<C: SearchableCharacter + ?Sized>(
        &self,
        character: &C,
        ticks: &InstanceTicks,
    ) -> bool {
        match self {
            Self::InstancePending { code, .. } => code.is_some_and(|code| {
                character.level() >= INSTANCE_MIN_LEVEL
                    && !ticks.is_ticked(character.character_id(), code)
            }),
            Self::Level { op, threshold, .. } => {
                threshold.is_some_and(|threshold| op.holds(character.level(), threshold))
            }
            Self::Text { needle, .. } => {
                character.character_name().to_lowercase().contains(needle.as_str())
                    || character.job_class().to_lowercase().contains(needle.as_str())
            }
        }
    }
}

/// Digits only; anything else (signs, overflow, empty) is malformed.
fn parse_level(digits: &str) -> Option<i32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// A parsed query: every condition must hold for the same character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    conditions: Vec<Condition>,
}

impl Query {
    pub fn parse(raw: &str) -> Self {
        let mut conditions = Vec::new();

        for fragment in raw.split(FRAGMENT_SEPARATOR) {
            let mut words = Vec::new();
            for token in fragment.split_whitespace() {
                match Condition::classify_token(token) {
                    Some(condition) => conditions.push(condition),
                    None => words.push(token),
                }
            }
            if !words.is_empty() {
                conditions.push(Condition::text(&words));
            }
        }

        Self { conditions }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Whether a character satisfies every condition. Empty queries match all.
    pub fn matches<C: SearchableCharacter + ?Sized>(
        &self,
        character: &C,
        ticks: &InstanceTicks,
    ) -> bool {
        self.conditions
            .iter()
            .all(|condition| condition.matches(character, ticks))
    }

    /// Whether the account name contains the text of any non-level condition.
    pub fn account_name_matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.conditions
            .iter()
            .filter(|condition| !condition.is_level())
            .any(|condition| name.contains(&condition.raw().to_lowercase()))
    }

    /// Whether an account should be shown for this query.
    pub fn account_visible<'a, C>(
        &self,
        account_name: &str,
        characters: impl IntoIterator<Item = &'a C>,
        ticks: &InstanceTicks,
    ) -> bool
    where
        C: SearchableCharacter + 'a,
    {
        self.is_empty()
            || self.account_name_matches(account_name)
            || characters.into_iter().any(|c| self.matches(c, ticks))
    }
}

/// Parse `query` and match it against a single character.
pub fn matches<C: SearchableCharacter + ?Sized>(
    character: &C,
    query: &str,
    ticks: &InstanceTicks,
) -> bool {
    Query::parse(query).matches(character, ticks)
}

// ---------------------------------------------------------------------------
// Roster search
// ---------------------------------------------------------------------------

/// A visible account and the characters of it that satisfy the query.
#[derive(Debug)]
pub struct AccountHit<'a, A, C> {
    pub account: &'a A,
    pub account_name_matched: bool,
    pub characters: Vec<&'a C>,
}

/// Filter a whole roster, preserving the order of `accounts` and `characters`.
pub fn search_roster<'a, A, C>(
    query: &Query,
    accounts: &'a [A],
    characters: &'a [C],
    ticks: &InstanceTicks,
) -> Vec<AccountHit<'a, A, C>>
where
    A: SearchableAccount,
    C: SearchableCharacter,
{
    accounts
        .iter()
        .filter_map(|account| {
            let name_matched =
                !query.is_empty() && query.account_name_matches(account.account_name());
            let matching: Vec<&C> = characters
                .iter()
                .filter(|c| c.owner_id() == account.account_id() && query.matches(*c, ticks))
                .collect();

            if query.is_empty() || name_matched || !matching.is_empty() {
                Some(AccountHit {
                    account,
                    account_name_matched: name_matched,
                    characters: matching,
                })
            } else {
                None
            }
        })
        .collect()
}
