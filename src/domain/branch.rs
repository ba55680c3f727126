use crate::error::{Result, SinceError};

/// The branch a release is being cut from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub name: String,
}

impl BranchContext {
    /// Create a new branch context
    pub fn new(name: impl Into<String>) -> Self {
        BranchContext { name: name.into() }
    }

    /// Check this branch against an optional required branch
    pub fn require(&self, required: Option<&str>) -> Result<()> {
        match required {
            Some(required) if !required.is_empty() && required != self.name => {
                Err(SinceError::BranchMismatch {
                    required: required.to_string(),
                    actual: self.name.clone(),
                })
            }
            _ => Ok(()),
        }
    }
}
