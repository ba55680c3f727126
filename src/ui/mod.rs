//! User interface module - output destinations and formatting.
//!
//! Separates concerns:
//! - `formatter` - Styled status, warning and error lines
//! - This module - Where command output ends up

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, trace};

use crate::error::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_error, display_status, display_success, format_release,
};

/// Writes command output to a file, or to stdout when no file is given.
///
/// # Arguments
/// * `output` - Text to write; a trailing newline is added
/// * `output_file` - Destination file, if any
pub fn write_output(output: &str, output_file: Option<&Path>) -> Result<()> {
    match output_file {
        Some(path) => {
            trace!(file = %path.display(), "writing output to file");
            fs::write(path, format!("{}\n", output))?;
        }
        None => {
            debug!("no output file specified, writing to stdout");
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", output)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
