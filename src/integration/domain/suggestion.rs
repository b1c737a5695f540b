//! Import-time status mapping suggestions.
//!
//! These heuristics only pre-fill the mapping a user confirms when importing
//! a project. Steady-state sync never calls them; it reads the stored
//! [`FieldMapping`] instead.

use super::{FieldMapping, LocalField};
use crate::board::domain::TaskStatus;
use serde::{Deserialize, Serialize};

/// One value a remote status field can take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteStatusOption {
    value: String,
    category: Option<String>,
}

impl RemoteStatusOption {
    /// Creates an option with its display value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into().trim().to_owned(),
            category: None,
        }
    }

    /// Sets the tracker-defined category (Azure DevOps state category).
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let raw = category.into();
        let normalized = raw.trim();
        self.category = (!normalized.is_empty()).then_some(normalized.to_owned());
        self
    }

    /// Returns the option value as written to the remote field.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the option category, if the tracker reports one.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// Outcome of classifying one remote status option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSuggestion {
    /// The option corresponds to a local status.
    Mapped(TaskStatus),
    /// The option denotes a removed or abandoned item with no local column.
    Unmapped,
}

const UNMAPPED_NAMES: &[&str] = &[
    "removed",
    "cut",
    "obsolete",
    "wontfix",
    "wont fix",
    "won t fix",
    "rejected",
    "cancelled",
    "canceled",
    "duplicate",
    "abandoned",
];
const COMPLETE_NAMES: &[&str] = &[
    "done", "complete", "completed", "closed", "shipped", "resolved", "released", "finished",
    "merged",
];
const IN_PROCESS_NAMES: &[&str] = &[
    "in progress",
    "inprogress",
    "doing",
    "active",
    "in review",
    "review",
    "committed",
    "testing",
    "blocked",
    "started",
    "wip",
];
const TODO_NAMES: &[&str] = &[
    "todo",
    "to do",
    "ready",
    "new",
    "next",
    "up next",
    "approved",
    "selected",
    "not started",
];
const BACKLOG_NAMES: &[&str] = &["backlog", "icebox", "triage", "proposed", "later", "someday"];

/// Classifies a remote status option into a local status.
///
/// A tracker-reported category wins over the option name. Names that match
/// nothing suggest [`TaskStatus::Backlog`].
#[must_use]
pub fn suggest_status(option: &RemoteStatusOption) -> StatusSuggestion {
    option
        .category()
        .and_then(classify_category)
        .or_else(|| classify_name(option.value()))
        .unwrap_or(StatusSuggestion::Mapped(TaskStatus::Backlog))
}

fn classify_category(category: &str) -> Option<StatusSuggestion> {
    let normalized: String = category
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    match normalized.as_str() {
        "proposed" => Some(StatusSuggestion::Mapped(TaskStatus::Todo)),
        "inprogress" | "resolved" => Some(StatusSuggestion::Mapped(TaskStatus::InProcess)),
        "completed" => Some(StatusSuggestion::Mapped(TaskStatus::Complete)),
        "removed" => Some(StatusSuggestion::Unmapped),
        _ => None,
    }
}

fn classify_name(name: &str) -> Option<StatusSuggestion> {
    let normalized = normalize_name(name);
    let phrase = normalized.as_str();
    let tables: [(&[&str], StatusSuggestion); 5] = [
        (UNMAPPED_NAMES, StatusSuggestion::Unmapped),
        (COMPLETE_NAMES, StatusSuggestion::Mapped(TaskStatus::Complete)),
        (IN_PROCESS_NAMES, StatusSuggestion::Mapped(TaskStatus::InProcess)),
        (TODO_NAMES, StatusSuggestion::Mapped(TaskStatus::Todo)),
        (BACKLOG_NAMES, StatusSuggestion::Mapped(TaskStatus::Backlog)),
    ];
    if let Some((_, suggestion)) = tables.iter().find(|(names, _)| names.contains(&phrase)) {
        return Some(*suggestion);
    }

    let words: Vec<&str> = phrase.split(' ').collect();
    let has_word = |candidates: &[&str]| words.iter().any(|word| candidates.contains(word));
    if has_word(&["progress", "doing", "review", "active"]) {
        return Some(StatusSuggestion::Mapped(TaskStatus::InProcess));
    }
    if has_word(&["done", "closed", "complete", "completed"]) {
        return Some(StatusSuggestion::Mapped(TaskStatus::Complete));
    }
    None
}

fn normalize_name(name: &str) -> String {
    name.to_ascii_lowercase()
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds a status mapping suggestion for a remote field.
///
/// Every mapped option contributes a forward entry. The reverse entry for a
/// status is the first option, in the order given, that suggests it.
/// Unmapped options get no entry in either direction.
#[must_use]
pub fn suggest_field_mapping(
    remote_field_id: impl Into<String>,
    remote_field_name: impl Into<String>,
    options: &[RemoteStatusOption],
) -> FieldMapping {
    let mut mapping = FieldMapping::new(remote_field_id, remote_field_name, LocalField::Status);
    for option in options {
        let StatusSuggestion::Mapped(status) = suggest_status(option) else {
            continue;
        };
        mapping = mapping.with_value(option.value(), status);
        if mapping.to_remote_value(status).is_none() {
            mapping = mapping.with_reverse(status, option.value());
        }
    }
    mapping
}
