use crate::conventional::{determine_types, BREAKING_CHANGE};
use crate::domain::{ChangeComponent, Version};
use crate::error::{Result, SinceError};
use tracing::{debug, warn};

/// Types that warrant a patch release
const PATCH_TYPES: [&str; 8] = [
    "build", "chore", "ci", "docs", "fix", "refactor", "style", "test",
];

/// Derives the next version from the conventional types found in commits
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionAnalyzer;

impl VersionAnalyzer {
    /// Create a new version analyzer
    pub fn new() -> Self {
        VersionAnalyzer
    }

    /// Pick the bump a set of commit types calls for.
    ///
    /// Types compare case-insensitively; a breaking change beats a feature,
    /// which beats any patch-level type.
    pub fn determine_change_type<I, S>(&self, types: I) -> ChangeComponent
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut component = ChangeComponent::None;
        for commit_type in types {
            let commit_type = commit_type.as_ref();
            let found = if commit_type.eq_ignore_ascii_case(BREAKING_CHANGE) {
                ChangeComponent::Major
            } else if commit_type.eq_ignore_ascii_case("feat") {
                ChangeComponent::Minor
            } else if PATCH_TYPES.iter().any(|t| commit_type.eq_ignore_ascii_case(t)) {
                ChangeComponent::Patch
            } else {
                ChangeComponent::None
            };
            component = component.max(found);
        }

        if component == ChangeComponent::None {
            warn!("unable to determine next version from changes");
        }
        component
    }

    /// Bump for a set of commit subjects, skipping untyped ones
    pub fn analyze_messages(&self, messages: &[String]) -> ChangeComponent {
        let types = determine_types(messages);
        debug!(?types, "commit types");
        self.determine_change_type(&types)
    }

    /// Next version after `current` given the commit subjects in the window
    ///
    /// # Errors
    /// `UndeterminableVersion` when no recognised type is present.
    pub fn next_version(&self, current: &Version, messages: &[String]) -> Result<Version> {
        let component = self.analyze_messages(messages);
        let next = current.bump(component).ok_or_else(|| {
            SinceError::undeterminable(format!(
                "no conventional commit types found since {}",
                current
            ))
        })?;

        debug!(%component, from = %current, to = %next, "bumped version");
        Ok(next)
    }
}
