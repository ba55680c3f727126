use crate::domain::ReleaseMetadata;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Points in the release workflow where hooks run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookType {
    /// After the changelog is rendered, before it is written and committed
    Before,
    /// After the release commit is tagged
    After,
}

impl HookType {
    /// Get the hook name as a string
    pub fn name(&self) -> &'static str {
        match self {
            HookType::Before => "before",
            HookType::After => "after",
        }
    }
}

impl fmt::Display for HookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Context information passed to a hook
#[derive(Debug, Clone)]
pub struct HookContext {
    /// Type of hook being executed
    pub hook_type: HookType,
    pub old_version: String,
    pub new_version: String,
    /// HEAD commit at the time the hook runs
    pub sha: String,
    /// Working directory for the hook process
    pub repo_path: PathBuf,
}

impl HookContext {
    pub fn new(hook_type: HookType, metadata: &ReleaseMetadata) -> Self {
        HookContext {
            hook_type,
            old_version: metadata.old_version.clone(),
            new_version: metadata.new_version.clone(),
            sha: metadata.sha.clone(),
            repo_path: metadata.repo_path.clone(),
        }
    }

    /// Convert context to environment variables for the hook process
    ///
    /// Maps context fields to SINCE_* environment variables
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert("SINCE_NEW_VERSION".to_string(), self.new_version.clone());
        env.insert("SINCE_OLD_VERSION".to_string(), self.old_version.clone());
        env.insert("SINCE_SHA".to_string(), self.sha.clone());
        env.insert(
            "SINCE_REPO_PATH".to_string(),
            self.repo_path.display().to_string(),
        );

        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> ReleaseMetadata {
        ReleaseMetadata {
            old_version: "0.1.0".to_string(),
            new_version: "0.2.0".to_string(),
            repo_path: PathBuf::from("/work/repo"),
            sha: "abc123".to_string(),
            v_prefix: true,
        }
    }

    #[test]
    fn test_hook_type_names() {
        assert_eq!(HookType::Before.name(), "before");
        assert_eq!(HookType::After.to_string(), "after");
    }

    #[test]
    fn test_hook_context_to_env_vars() {
        let ctx = HookContext::new(HookType::After, &metadata());

        let env = ctx.to_env_vars();
        assert_eq!(env.len(), 4);
        assert_eq!(env.get("SINCE_NEW_VERSION"), Some(&"0.2.0".to_string()));
        assert_eq!(env.get("SINCE_OLD_VERSION"), Some(&"0.1.0".to_string()));
        assert_eq!(env.get("SINCE_SHA"), Some(&"abc123".to_string()));
        assert_eq!(env.get("SINCE_REPO_PATH"), Some(&"/work/repo".to_string()));
    }
}
