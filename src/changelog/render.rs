use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::conventional::{categorise_by_type, ClassifyMode, SectionMap, OTHER_SECTION};
use crate::domain::ReleaseBucket;

/// Renders release buckets as changelog sections
#[derive(Debug, Clone)]
pub struct Renderer {
    sections: SectionMap,
    group: bool,
}

impl Renderer {
    /// Renderer grouping commits into sections
    pub fn grouped(sections: SectionMap) -> Self {
        Renderer {
            sections,
            group: true,
        }
    }

    /// Renderer using raw commit types as headings
    pub fn by_type() -> Self {
        Renderer {
            sections: SectionMap::default(),
            group: false,
        }
    }

    /// Render commit subjects as `### category` blocks.
    ///
    /// Categories and the lines inside them are sorted; blocks are separated
    /// by a blank line.
    pub fn render_commits(&self, commits: &[String]) -> String {
        let by_type = categorise_by_type(commits, ClassifyMode::Fallback);
        let categorised = if self.group {
            self.sections.group(by_type)
        } else {
            untyped_as_other(by_type)
        };

        let blocks: Vec<String> = categorised
            .iter()
            .map(|(category, items)| {
                let mut items = items.clone();
                items.sort();

                let mut block = format!("### {}\n", category);
                for item in items {
                    block.push_str("- ");
                    block.push_str(&item);
                    block.push('\n');
                }
                block
            })
            .collect();

        debug!(sections = blocks.len(), "grouped commits");
        blocks.join("\n").trim().to_string()
    }

    /// Render one bucket under its `## ` heading.
    ///
    /// With `release_as`, the Unreleased bucket is titled with that version
    /// and dated like a release.
    pub fn render_bucket(&self, bucket: &ReleaseBucket, release_as: Option<&str>) -> String {
        format!(
            "{}\n{}",
            heading(bucket, release_as),
            self.render_commits(&bucket.commits)
        )
    }

    /// Render every bucket, newest first
    pub fn render_buckets(&self, buckets: &[ReleaseBucket], release_as: Option<&str>) -> Vec<String> {
        buckets
            .iter()
            .map(|bucket| self.render_bucket(bucket, release_as))
            .collect()
    }

    /// Render every bucket as one block of text
    pub fn render_all(&self, buckets: &[ReleaseBucket], release_as: Option<&str>) -> String {
        self.render_buckets(buckets, release_as).join("\n\n")
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::grouped(SectionMap::default())
    }
}

/// `## [name]` for Unreleased, `## [name] - YYYY-MM-DD` for releases
pub fn heading(bucket: &ReleaseBucket, release_as: Option<&str>) -> String {
    match (bucket.is_unreleased(), release_as) {
        (true, Some(version)) => format!("## [{}] - {}", version, format_date(&bucket.date)),
        (true, None) => format!("## [{}]", bucket.name),
        (false, _) => format!("## [{}] - {}", bucket.name, format_date(&bucket.date)),
    }
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn untyped_as_other(by_type: BTreeMap<String, Vec<String>>) -> BTreeMap<String, Vec<String>> {
    let mut renamed: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (commit_type, commits) in by_type {
        let key = if commit_type.is_empty() {
            OTHER_SECTION.to_string()
        } else {
            commit_type
        };
        renamed.entry(key).or_default().extend(commits);
    }
    renamed
}
