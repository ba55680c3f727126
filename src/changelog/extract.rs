use crate::changelog::sections::is_release_heading;
use crate::error::{Result, SinceError};

/// Lines of one release section.
///
/// `version` selects the section whose heading contains `[version]`; `None`
/// picks the first section. Trailing blank lines are dropped.
///
/// # Errors
/// * `MalformedChangelog` - the document has no release headings
/// * `NotFound` - no heading matches `version`
pub fn read_changes<S: AsRef<str>>(
    lines: &[S],
    version: Option<&str>,
    include_header: bool,
) -> Result<Vec<String>> {
    let headings: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_release_heading(line.as_ref()))
        .map(|(i, _)| i)
        .collect();

    if headings.is_empty() {
        return Err(SinceError::malformed("no release headings found"));
    }

    let start = match version.filter(|v| !v.is_empty()) {
        Some(version) => {
            let marker = format!("[{}]", version);
            headings
                .iter()
                .copied()
                .find(|&i| lines[i].as_ref().contains(&marker))
                .ok_or_else(|| {
                    SinceError::not_found(format!("version {} in changelog", version))
                })?
        }
        None => headings[0],
    };
    let end = headings
        .iter()
        .copied()
        .find(|&i| i > start)
        .unwrap_or(lines.len());

    let first = if include_header { start } else { start + 1 };
    let mut section: Vec<String> = lines[first..end]
        .iter()
        .map(|l| l.as_ref().to_string())
        .collect();
    while section.last().is_some_and(|l| l.trim().is_empty()) {
        section.pop();
    }

    Ok(section)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = "# Changelog

## [0.2.0] - 2023-03-05
### Added
- feat: some change.

## [0.1.0] - 2023-03-04
### Added
- feat: another change.
";

    fn lines() -> Vec<&'static str> {
        SIMPLE.split('\n').collect()
    }

    #[test]
    fn test_read_specific_version() {
        let changes = read_changes(&lines(), Some("0.1.0"), true).unwrap();
        assert_eq!(
            changes,
            vec!["## [0.1.0] - 2023-03-04", "### Added", "- feat: another change."]
        );
    }

    #[test]
    fn test_read_latest_version() {
        let changes = read_changes(&lines(), None, true).unwrap();
        assert_eq!(
            changes,
            vec!["## [0.2.0] - 2023-03-05", "### Added", "- feat: some change."]
        );
    }

    #[test]
    fn test_skip_version_header() {
        let changes = read_changes(&lines(), None, false).unwrap();
        assert_eq!(changes, vec!["### Added", "- feat: some change."]);
    }

    #[test]
    fn test_empty_version_means_latest() {
        assert_eq!(
            read_changes(&lines(), Some(""), true).unwrap(),
            read_changes(&lines(), None, true).unwrap()
        );
    }

    #[test]
    fn test_missing_version() {
        let err = read_changes(&lines(), Some("9.9.9"), true).unwrap_err();
        assert!(matches!(err, SinceError::NotFound(_)));
    }

    #[test]
    fn test_no_headings() {
        let doc = vec!["# Changelog", "", "nothing here"];
        let err = read_changes(&doc, None, true).unwrap_err();
        assert!(matches!(err, SinceError::MalformedChangelog(_)));
    }
}
