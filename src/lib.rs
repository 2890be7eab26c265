#![deny(clippy::all, clippy::cargo, clippy::expect_used, clippy::unwrap_used)]
#![deny(clippy::pedantic, clippy::nursery, unsafe_code)]
#![warn(clippy::unimplemented, clippy::redundant_type_annotations)]

use anyhow::Result;
use std::io::BufRead;

pub mod algo;
pub mod core;
pub mod data;

/// Runs the given matcher on the instance read from reader and writes the matching to stdout.
/// Also writes the verdict of the checker to stdout, preceded by the recorded steps if `trace`
/// is set.
///
/// # Errors
/// - If the instance could not be read from the reader.
/// - If the matcher fails on the instance.
/// - If the matching could not be written to stdout.
///
/// # Panics
///  - If the matching is invalid in debug mode.
pub fn run_reader(matcher: &mut dyn core::Matcher, reader: &mut impl BufRead, trace: bool) -> Result<()> {
    let instance: core::Instance = data::deserialize(reader)?;
    let matching = matcher.matching(&instance.graph, &instance.matching)?;

    debug_assert!(matching.is_valid(&instance.graph), "Matching is invalid: {matching:?}");

    if trace {
        for step in matcher.steps() {
            println!("{}", data::to_string(step)?);
        }
    }

    println!("{}", data::to_string(&matching)?);
    println!("{}", algo::check(&instance.graph, &matching));

    Ok(())
}
