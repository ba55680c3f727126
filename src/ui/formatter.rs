//! Pure formatting functions for UI output.
//!
//! Status lines go to stderr so stdout only carries the requested output
//! (a version, a changelog) and stays usable in scripts.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::domain::commit::short_sha;
use crate::domain::ReleaseMetadata;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green().bold(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
///
/// Shows a yellow warning icon followed by the warning message.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Summary line for a finished release
pub fn format_release(metadata: &ReleaseMetadata) -> String {
    format!(
        "Released {} (previous: {}, commit {})",
        style(metadata.tag_name()).green().bold(),
        style(&metadata.old_version).dim(),
        short_sha(&metadata.sha)
    )
}
