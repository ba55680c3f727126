use crate::config::{Config, HookCommand};
use crate::domain::ReleaseMetadata;
use crate::error::{Result, SinceError};
use crate::hooks::{HookContext, HookType};
use std::process::Command;
use tracing::{debug, trace};

/// Runs configured release hooks
pub struct HookExecutor;

impl HookExecutor {
    /// Execute a hook command with the given context
    ///
    /// The command runs in the repository directory with the context exported
    /// as environment variables. Its output goes straight to the terminal.
    ///
    /// # Returns
    /// * `Ok(())` if the command exits with code 0
    /// * `Err(SinceError::Hook)` if it cannot be started or exits non-zero
    pub fn execute(hook: &HookCommand, context: &HookContext) -> Result<()> {
        debug!(hook = %hook.display(), kind = %context.hook_type, "executing hook");

        let status = Command::new(&hook.command)
            .args(&hook.args)
            .current_dir(&context.repo_path)
            .envs(context.to_env_vars())
            .status()
            .map_err(|e| {
                SinceError::hook(format!("failed to execute '{}': {}", hook.display(), e))
            })?;

        if !status.success() {
            return Err(SinceError::hook(format!(
                "'{}' exited with code {}",
                hook.display(),
                status.code().unwrap_or(-1)
            )));
        }

        debug!(hook = %hook.display(), "hook executed successfully");
        Ok(())
    }

    /// Execute every hook of one type from the configuration, stopping at the first failure
    pub fn execute_all(config: &Config, hook_type: HookType, metadata: &ReleaseMetadata) -> Result<()> {
        let hooks = match hook_type {
            HookType::Before => &config.before,
            HookType::After => &config.after,
        };
        trace!(count = hooks.len(), kind = %hook_type, "hooks found");

        let context = HookContext::new(hook_type, metadata);
        for hook in hooks {
            Self::execute(hook, &context)?;
        }
        Ok(())
    }
}
