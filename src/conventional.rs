//! Conventional commit classification
//!
//! Only the subject line prefix is inspected: the token before the first
//! colon, with any `(scope)` dropped and a trailing `!` turned into
//! [BREAKING_CHANGE].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Type token used for breaking changes
pub const BREAKING_CHANGE: &str = "BREAKING CHANGE";

/// Section for types no other section claims
pub const OTHER_SECTION: &str = "Other";

/// Extract the conventional commit type from a subject line.
///
/// Returns `None` when the subject has no `type:` prefix.
///
/// ```
/// use since::conventional::classify;
///
/// assert_eq!(classify("feat(parser): add x").as_deref(), Some("feat"));
/// assert_eq!(classify("fix!: drop y").as_deref(), Some("BREAKING CHANGE"));
/// assert_eq!(classify("random text"), None);
/// ```
pub fn classify(subject: &str) -> Option<String> {
    let (prefix, _) = subject.split_once(':')?;
    let mut prefix = prefix.trim();

    if prefix.ends_with('!') {
        return Some(BREAKING_CHANGE.to_string());
    }
    if let Some(scope_start) = prefix.find('(') {
        prefix = &prefix[..scope_start];
    }

    let prefix = prefix.trim();
    if prefix.is_empty() {
        None
    } else {
        Some(prefix.to_string())
    }
}

/// What to do with commits that carry no conventional type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyMode {
    /// Leave them out entirely
    SkipUntyped,
    /// File them under an empty type, shown as [OTHER_SECTION]
    Fallback,
}

/// Group commit subjects by their conventional type.
///
/// Keys are types; in [ClassifyMode::Fallback] untyped commits are kept under
/// the empty string.
pub fn categorise_by_type(commits: &[String], mode: ClassifyMode) -> BTreeMap<String, Vec<String>> {
    let mut categorised: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for commit in commits {
        let key = match (classify(commit), mode) {
            (Some(commit_type), _) => commit_type,
            (None, ClassifyMode::Fallback) => String::new(),
            (None, ClassifyMode::SkipUntyped) => continue,
        };
        categorised.entry(key).or_default().push(commit.clone());
    }
    categorised
}

/// Distinct conventional types present in a set of commits, untyped ones skipped
pub fn determine_types(commits: &[String]) -> BTreeSet<String> {
    commits.iter().filter_map(|c| classify(c)).collect()
}

/// Mapping from changelog section to the commit types it collects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionMap {
    sections: BTreeMap<String, Vec<String>>,
}

impl SectionMap {
    pub fn new(sections: BTreeMap<String, Vec<String>>) -> Self {
        SectionMap { sections }
    }

    /// Section a commit type belongs to, or [OTHER_SECTION]
    pub fn section_for(&self, commit_type: &str) -> &str {
        self.sections
            .iter()
            .find(|(_, types)| types.iter().any(|t| t == commit_type))
            .map(|(section, _)| section.as_str())
            .unwrap_or(OTHER_SECTION)
    }

    /// Re-key type-grouped commits by section, merging types that share one
    pub fn group(&self, by_type: BTreeMap<String, Vec<String>>) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (commit_type, commits) in by_type {
            grouped
                .entry(self.section_for(&commit_type).to_string())
                .or_default()
                .extend(commits);
        }
        grouped
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl Default for SectionMap {
    fn default() -> Self {
        let table: [(&str, &[&str]); 3] = [
            ("Added", &["feat"]),
            ("Fixed", &["fix"]),
            (
                "Changed",
                &["build", "chore", "ci", "docs", "refactor", "style", "test"],
            ),
        ];

        SectionMap::new(
            table
                .iter()
                .map(|(section, types)| {
                    (
                        section.to_string(),
                        types.iter().map(|t| t.to_string()).collect(),
                    )
                })
                .collect(),
        )
    }
}
