use blossom_matching::core::{random_graph, Instance, Matcher};
use blossom_matching::{algo, data, run_reader};
use clap::{Parser, ValueEnum};
use log::info;
use rand::prelude::*;
use std::io::Write;
use std::num::NonZero;

#[derive(Copy, Clone, Debug)]
struct Algorithm(usize, &'static str);

impl From<Algorithm> for Box<dyn Matcher> {
    fn from(value: Algorithm) -> Box<dyn Matcher> {
        algo::MATCHERS[value.0]()
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.1)
    }
}

impl ValueEnum for Algorithm {
    fn value_variants<'a>() -> &'a [Self] {
        static ALGORITHMS: std::sync::LazyLock<Vec<Algorithm>> = std::sync::LazyLock::new(|| {
            let iter = algo::MATCHERS.iter().enumerate();
            iter.map(|(i, init)| Algorithm(i, init().name())).collect()
        });

        ALGORITHMS.as_slice()
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.1))
    }
}

/// Application computing maximum matchings in general graphs.
#[derive(Debug, Parser)]
enum Application {
    /// Run one of the implemented algorithms on an instance read from stdin.
    Run {
        algorithm: Algorithm,
        /// Print the recorded steps before the matching.
        #[clap(short, long, default_value = "false")]
        trace: bool,
    },
    /// Run benchmarks on a set of instances.
    Bench {
        /// The input directory.
        input: String,
        /// Exclude matching algorithms.
        #[clap(short, long, value_delimiter = ',')]
        exclude: Vec<Algorithm>,
    },
    /// Generate random graphs in the `G(n, p)` model.
    Gen {
        /// The minimum number of vertices.
        min_vertices: usize,
        /// The maximum number of vertices.
        max_vertices: usize,
        /// The probability of every edge.
        #[clap(short, long, default_value = "0.5")]
        probability: f64,
        /// Number of graphs to generate.
        #[clap(short, long, default_value = "1")]
        amount: NonZero<u64>,
        /// Path to output the generated instances. If the directory does not exist, it will be created.
        #[clap(short, long, default_value = "output")]
        output: String,
        /// Seed of the random generator.
        #[clap(short, long)]
        seed: Option<u64>,
    },
}

fn matchers(exclude: &[Algorithm]) -> impl Iterator<Item = Box<dyn Matcher>> + '_ {
    let iter = algo::MATCHERS.iter().map(|init| init());
    iter.filter(|matcher| !exclude.iter().any(|name| name.1 == matcher.name()))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    match Application::parse() {
        Application::Run { algorithm, trace } => {
            let mut matcher = Box::<dyn Matcher>::from(algorithm);
            run_reader(matcher.as_mut(), &mut std::io::stdin().lock(), trace)
        }
        Application::Bench { input, exclude } => {
            for mut matcher in matchers(&exclude) {
                println!("{}", data::run(&input, false, matcher.as_mut())?);
            }
            Ok(())
        }
        Application::Gen {
            min_vertices,
            max_vertices,
            probability,
            amount,
            output,
            seed,
        } => {
            anyhow::ensure!(min_vertices <= max_vertices, "Empty range of vertices");
            anyhow::ensure!((0.0..=1.0).contains(&probability), "Probability must be in [0, 1]");

            let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

            let output = std::path::Path::new(&output);
            if !output.try_exists()? {
                std::fs::create_dir_all(output)?;
            }

            for i in 0..amount.get() {
                let graph = random_graph(min_vertices..=max_vertices, probability, &mut rng);
                let size = algo::reference_maximum_matching_size(&graph);
                let filename = format!("{}_{size}_{i}.json", graph.vertex_count());
                info!("Generated {filename} with {} edges", graph.edge_count());

                std::fs::File::create(output.join(filename))?
                    .write_all(data::to_string(&Instance::new(graph))?.as_bytes())?;
            }
            Ok(())
        }
    }
}
