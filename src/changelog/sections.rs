use crate::error::{Result, SinceError};
use tracing::trace;

const RELEASE_HEADING: &str = "## ";
const UNRELEASED_MARKER: &str = "[Unreleased]";

/// What to do when a changelog has no release heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitMode {
    /// Treat the whole document as boilerplate
    #[default]
    Lenient,
    /// Fail with `MalformedChangelog`
    Strict,
}

/// A changelog split around its first release heading
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangelogSections {
    /// Lines before the first release heading, each ending in a newline
    pub boilerplate: String,
    /// The first release heading onward, trimmed
    pub body: String,
}

pub(crate) fn is_release_heading(line: &str) -> bool {
    line.starts_with(RELEASE_HEADING)
}

/// Split changelog lines into boilerplate and body.
///
/// An `[Unreleased]` heading and the lines under it are dropped, since that
/// section is regenerated on every run.
pub fn split_into_sections<S: AsRef<str>>(lines: &[S], mode: SplitMode) -> Result<ChangelogSections> {
    let mut boilerplate = String::new();
    let mut skipping = false;
    let mut first_heading = None;

    for (i, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        if is_release_heading(line) {
            if line.contains(UNRELEASED_MARKER) {
                skipping = true;
                continue;
            }
            first_heading = Some(i);
            break;
        }
        if !skipping {
            boilerplate.push_str(line);
            boilerplate.push('\n');
        }
    }

    let body = match first_heading {
        Some(start) => {
            let mut body = String::new();
            for line in &lines[start..] {
                body.push_str(line.as_ref());
                body.push('\n');
            }
            body.trim().to_string()
        }
        None if mode == SplitMode::Strict => {
            return Err(SinceError::malformed("could not find a release heading"));
        }
        None => String::new(),
    };

    trace!(
        boilerplate_len = boilerplate.len(),
        body_len = body.len(),
        "split changelog"
    );
    Ok(ChangelogSections { boilerplate, body })
}

/// Reassemble a changelog from boilerplate, new sections and the prior body.
///
/// Sections are separated from each other and from the body by a blank line;
/// trailing whitespace is trimmed from the result.
pub fn merge<S: AsRef<str>>(boilerplate: &str, sections: &[S], body: &str) -> String {
    let mut output = String::from(boilerplate);
    for section in sections {
        output.push_str(section.as_ref());
        output.push_str("\n\n");
    }
    output.push_str(body);
    output.trim_end().to_string()
}
