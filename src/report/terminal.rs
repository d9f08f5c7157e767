use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::Artifact;
use crate::sorter::{versions, GroupDiff, Grouped};

fn header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|l| Cell::new(l).add_attribute(Attribute::Bold))
        .collect()
}

fn joined(artifacts: &[Artifact]) -> String {
    artifacts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Table of every `groupId:artifactId` key with its versions and artifacts.
/// Keys with at least `min_versions` distinct versions are highlighted.
pub fn grouped_table(grouped: &Grouped, min_versions: usize) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["Group:Artifact", "Versions", "Artifacts"]));

    for (key, bucket) in grouped {
        let versions = versions(bucket);
        let color = if versions.len() >= min_versions.max(1) {
            Color::Yellow
        } else {
            Color::Reset
        };
        let artifacts: Vec<Artifact> = bucket.iter().cloned().collect();
        table.add_row(vec![
            Cell::new(key).fg(color),
            Cell::new(versions.into_iter().collect::<Vec<_>>().join(", ")).fg(color),
            Cell::new(joined(&artifacts)),
        ]);
    }

    table
}

/// Side-by-side table of keys whose artifacts differ between two universes.
pub fn comparison_table(diffs: &[GroupDiff], left: &str, right: &str) -> Table {
    let only_left = format!("Only in {left}");
    let only_right = format!("Only in {right}");
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&[
            "Group:Artifact",
            only_left.as_str(),
            only_right.as_str(),
            "Both",
        ]));

    for diff in diffs {
        table.add_row(vec![
            Cell::new(&diff.key),
            Cell::new(joined(&diff.only_left)).fg(Color::Red),
            Cell::new(joined(&diff.only_right)).fg(Color::Green),
            Cell::new(joined(&diff.common)),
        ]);
    }

    table
}

/// Print a titled grouped report followed by a summary line.
pub fn render_grouped(title: &str, grouped: &Grouped, min_versions: usize) {
    let flagged = crate::sorter::version_conflicts(grouped, min_versions).len();
    println!("\n {} {}\n", "##".bold(), title.bold());
    println!("{}", grouped_table(grouped, min_versions));
    println!(
        " {} keys, {} with {}+ versions",
        grouped.len(),
        flagged.to_string().yellow(),
        min_versions
    );
}

pub fn render_comparison(diffs: &[GroupDiff], left: &str, right: &str) {
    println!("\n {} {}\n", "##".bold(), "COMPARISON".bold());
    if diffs.is_empty() {
        println!(" {} no differences", "✓".green());
        return;
    }
    println!("{}", comparison_table(diffs, left, right));
    println!(" {} keys differ", diffs.len().to_string().red());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArtifactBuilder;
    use crate::sorter::{compare_grouped, group_by_ga};

    #[test]
    fn test_grouped_table_rows() {
        let mut b = ArtifactBuilder::new();
        let artifacts = vec![
            b.gav("org.foo", "core", "1.0").unwrap(),
            b.gav("org.foo", "core", "2.0").unwrap(),
            b.gav("org.foo", "api", "1.0").unwrap(),
        ];
        let table = grouped_table(&group_by_ga(&artifacts), 2);
        assert_eq!(table.row_iter().count(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("org.foo:core"));
        assert!(rendered.contains("1.0, 2.0"));
    }

    #[test]
    fn test_comparison_table_sides() {
        let mut b = ArtifactBuilder::new();
        let left = group_by_ga(&[b.gav("org.foo", "core", "1.0").unwrap()]);
        let right = group_by_ga(&[b.gav("org.foo", "core", "2.0").unwrap()]);
        let diffs = compare_grouped(&left, &right, false);
        let rendered = comparison_table(&diffs, "repo", "sources").to_string();
        assert!(rendered.contains("Only in repo"));
        assert!(rendered.contains("org.foo:core:1.0"));
        assert!(rendered.contains("org.foo:core:2.0"));
    }
}
