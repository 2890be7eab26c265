use crate::algo::check;
use crate::core::{Instance, Matcher};
use crate::data::deserialize;
use anyhow::anyhow;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::fmt::{Display, Formatter, Result};
use std::fs::File;
use std::io::BufReader;

/// Report of running a directory of samples.
#[derive(Debug, Deserialize, Serialize)]
pub struct Report {
    matcher: String,
    entries: Vec<ReportEntry>,
}

impl Report {
    /// Create a new report.
    fn new(matcher: String) -> Self {
        let entries = Vec::new();
        Self { matcher, entries }
    }

    /// Get the matcher name.
    #[must_use]
    pub fn matcher_name(&self) -> &str {
        &self.matcher
    }

    /// Get the entries.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Matcher: {}", self.matcher)?;
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        writeln!(f, "-------------------")
    }
}

/// Report of running a single sample.
#[non_exhaustive]
#[derive(Debug, Deserialize, Serialize)]
pub struct ReportEntry {
    pub name: String,
    pub vertices: usize,
    pub size: usize,
    pub expected: usize,
    pub time: f64,
}

impl Display for ReportEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "{}: {} of {} on {} vertices in {:.4} sec",
            self.name, self.size, self.expected, self.vertices, self.time
        )
    }
}

/// Run all samples in the `samples` directory.
/// Print the report to stdout.
///
/// # Arguments
/// - `valid` is true, check if the size is the expected maximum.
/// - `matcher` is the matcher to run.
///
/// # Errors
/// - If a file cannot be read.
/// - If no samples are found.
/// - If the matcher fails on a sample.
///
/// # Panics
/// - If the matching is invalid.
/// - If the size is incorrect and `valid` is true.
pub fn samples(valid: bool, matcher: &mut dyn Matcher) -> anyhow::Result<()> {
    run("samples", valid, matcher).and_then(|report| {
        if report.entries.is_empty() {
            Err(anyhow!("No samples found"))
        } else {
            println!("{report}");
            Ok(())
        }
    })
}

/// Run all samples in the `dir` directory.
/// Files without the `json` extension are skipped.
///
/// # Arguments
/// - `valid` is true, check if the size is the expected maximum.
/// - `matcher` is the matcher to run.
///
/// # Errors
/// - If a file cannot be read.
/// - If the matcher fails on a sample.
///
/// # Panics
/// - If the matching is invalid.
/// - If the size or the number of vertices is incorrect and `valid` is true.
pub fn run(dir: &str, valid: bool, matcher: &mut dyn Matcher) -> anyhow::Result<Report> {
    let mut report = Report::new(matcher.name().into());

    for file in std::fs::read_dir(dir)? {
        let file = file?;
        if file.path().extension() != Some(OsStr::new("json")) {
            continue;
        }

        let (name, vertices, expected) = parse_filename(&file.file_name())?;
        let instance: Instance = deserialize(&mut BufReader::new(File::open(file.path())?))?;
        let graph = &instance.graph;

        let time = std::time::Instant::now();
        let matching = matcher.matching(graph, &instance.matching)?;
        let time = time.elapsed().as_secs_f64();

        let verdict = check(graph, &matching);
        assert!(verdict.valid, "Invalid matching created for {name}");
        if verdict.is_maximum() {
            info!("{name}: {verdict}");
        } else {
            warn!("{name}: {verdict}");
        }

        if valid {
            assert_eq!(graph.vertex_count(), vertices, "Invalid vertex count {name}");
            assert_eq!(matching.len(), expected, "Invalid size {name}");
        }

        report.entries.push(ReportEntry {
            name,
            vertices: graph.vertex_count(),
            size: matching.len(),
            expected,
            time,
        });
    }

    Ok(report)
}

fn parse_filename(filename: &OsString) -> anyhow::Result<(String, usize, usize)> {
    static NAME_ERR: &str = "Cannot read filename";

    let name = filename.to_str().ok_or_else(|| anyhow!(NAME_ERR))?;
    let mut parts = name.split('.');
    let mut parts = parts.next().ok_or_else(|| anyhow!(NAME_ERR))?.split('_');
    let vertices = parts.next().ok_or_else(|| anyhow!(NAME_ERR))?.parse()?;
    let expected = parts.next().ok_or_else(|| anyhow!(NAME_ERR))?.parse()?;
    let _: usize = parts.next().ok_or_else(|| anyhow!(NAME_ERR))?.parse()?;
    Ok((name.into(), vertices, expected))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_filename() -> anyhow::Result<()> {
        let filename = "10_4_0.json".into();
        let (name, vertices, expected) = parse_filename(&filename)?;
        assert_eq!(name, "10_4_0.json");
        assert_eq!(vertices, 10);
        assert_eq!(expected, 4);

        let filename = "0_0_12.json".into();
        let (name, vertices, expected) = parse_filename(&filename)?;
        assert_eq!(name, "0_0_12.json");
        assert_eq!(vertices, 0);
        assert_eq!(expected, 0);
        Ok(())
    }

    #[test]
    fn test_parse_filename_errors() {
        assert!(parse_filename(&"".into()).is_err());
        assert!(parse_filename(&".json".into()).is_err());
        assert!(parse_filename(&"10.json".into()).is_err());
        assert!(parse_filename(&"10_4.json".into()).is_err());
        assert!(parse_filename(&"10_4a_0.json".into()).is_err());
        assert!(parse_filename(&"1a0_4_0.json".into()).is_err());
        assert!(parse_filename(&"10_4_0a2.json".into()).is_err());
    }

    #[test]
    fn test_gabow_samples() -> anyhow::Result<()> {
        let mut gabow = crate::algo::Gabow;
        let report = run("samples", true, &mut gabow)?;
        assert_eq!(report.matcher_name(), "Gabow");
        assert!(report.entries().iter().all(|entry| entry.size == entry.expected));
        Ok(())
    }
}
