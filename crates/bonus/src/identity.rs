//! Employee identity: name normalization and directory resolution.
//!
//! Every comparison between a leader field, a worker-log name, an override
//! key, or a directory entry goes through [`sanitize`]. Stored payout history
//! already depends on this exact rule: lowercase, then keep only `a-z0-9`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::de::{lenient_opt_string, lenient_string};
use crate::error::EngineError;
use crate::model::JobRecord;

/// Lowercase `name` and strip every character outside `a-z0-9`.
pub fn sanitize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Normalized identity of one person. Two names that sanitize to the same
/// key are the same ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EmployeeKey(String);

impl EmployeeKey {
    pub fn new(raw: &str) -> Self {
        Self(sanitize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EmployeeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

/// One known employee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    #[serde(alias = "displayName", alias = "fullName", alias = "name")]
    #[serde(deserialize_with = "lenient_string")]
    pub display_name: String,
    /// Extra alias the log may use for this person.
    #[serde(default, alias = "matchKey", deserialize_with = "lenient_opt_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_key: Option<String>,
    #[serde(default, alias = "firstName", deserialize_with = "lenient_opt_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName", deserialize_with = "lenient_opt_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl DirectoryEntry {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    /// True when `key` is this person under the display name, the explicit
    /// alias, or "last name + first name" as some logs record it.
    pub fn matches(&self, key: &EmployeeKey) -> bool {
        if key.is_empty() {
            return false;
        }
        if EmployeeKey::new(&self.display_name) == *key {
            return true;
        }
        if let Some(alias) = &self.match_key {
            if EmployeeKey::new(alias) == *key {
                return true;
            }
        }
        match (&self.last_name, &self.first_name) {
            (Some(last), Some(first)) => EmployeeKey::new(&format!("{last}{first}")) == *key,
            _ => false,
        }
    }

    fn sort_key(&self) -> &str {
        self.last_name.as_deref().unwrap_or(&self.display_name)
    }
}

/// Known employees, used to resolve raw log names to display names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeDirectory {
    pub entries: Vec<DirectoryEntry>,
}

impl EmployeeDirectory {
    pub fn new(entries: Vec<DirectoryEntry>) -> Self {
        Self { entries }
    }

    pub fn from_json(input: &str) -> Result<Self, EngineError> {
        serde_json::from_str(input).map_err(|e| EngineError::DirectoryParse(e.to_string()))
    }

    /// First entry matching `name`, if any.
    pub fn resolve(&self, name: &str) -> Option<&DirectoryEntry> {
        let key = EmployeeKey::new(name);
        self.entries.iter().find(|e| e.matches(&key))
    }

    /// Directory display name for `name`, or `name` itself when unmatched so
    /// former and unlinked employees stay visible under their log name.
    pub fn display_name(&self, name: &str) -> String {
        self.resolve(name)
            .map(|e| e.display_name.clone())
            .unwrap_or_else(|| name.to_string())
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterEntry {
    pub name: String,
    pub key: EmployeeKey,
}

/// Everyone named across a job set, split by directory membership.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Roster {
    pub active: Vec<RosterEntry>,
    pub former: Vec<RosterEntry>,
}

/// Collect every leader and worker-log name, resolve against the directory,
/// and split into active (matched) and former (unmatched) employees.
pub fn roster(jobs: &[JobRecord], directory: &EmployeeDirectory) -> Roster {
    let mut active: BTreeMap<EmployeeKey, (&DirectoryEntry, String)> = BTreeMap::new();
    let mut former: BTreeMap<EmployeeKey, String> = BTreeMap::new();

    let names = jobs.iter().flat_map(|job| {
        job.leader_name()
            .into_iter()
            .chain(job.worker_log.iter().map(|w| w.name.as_str()))
    });

    for raw in names {
        let name = raw.trim();
        if name.is_empty() {
            continue;
        }
        match directory.resolve(name) {
            Some(entry) => {
                let key = EmployeeKey::new(&entry.display_name);
                active
                    .entry(key)
                    .or_insert_with(|| (entry, entry.display_name.clone()));
            }
            None => {
                former
                    .entry(EmployeeKey::new(name))
                    .or_insert_with(|| name.to_string());
            }
        }
    }

    let mut active: Vec<(&str, RosterEntry)> = active
        .into_iter()
        .map(|(key, (entry, name))| (entry.sort_key(), RosterEntry { name, key }))
        .collect();
    active.sort_by(|a, b| compare_names(a.0, b.0).then_with(|| compare_names(&a.1.name, &b.1.name)));

    let mut former: Vec<RosterEntry> = former
        .into_iter()
        .map(|(key, name)| RosterEntry { name, key })
        .collect();
    former.sort_by(|a, b| compare_names(&a.name, &b.name));

    Roster {
        active: active.into_iter().map(|(_, e)| e).collect(),
        former,
    }
}

/// Case-insensitive name order, ties broken by exact text.
pub fn compare_names(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
