use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, bail};
use log::{LevelFilter, info, warn};
use pairing::{log::build_logger_for_verbosity, prelude::*};
use serde::Serialize;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(about = "Pairs all students such that the total compatibility score is maximal")]
struct Opts {
    /// Score file with lines `name,name,score`; read from stdin if omitted
    #[structopt(short, long)]
    input: Option<PathBuf>,

    /// Write the pairing here instead of stdout
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// Stop after this many seconds and report the best pairing found so far
    #[structopt(short = "T", long)]
    timeout: Option<f64>,

    /// Stop after this many expansions and report the best pairing found so far
    #[structopt(short, long)]
    node_limit: Option<u64>,

    /// Do not clamp the bound of a node at zero (tighter if scores may be negative)
    #[structopt(long)]
    unclamped: bool,

    /// Verify the result against exhaustive enumeration (small inputs only)
    #[structopt(long)]
    cross_validate: bool,

    /// Emit solution and statistics as JSON
    #[structopt(long)]
    json: bool,

    /// Fail if a pair is listed twice with different scores
    #[structopt(long)]
    reject_duplicates: bool,

    /// Score of pairs missing from the input
    #[structopt(long, default_value = "0")]
    fill: f64,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    solution: &'a PairingSolution,
    names: Vec<[String; 2]>,
    statistics: SolverStatistics,
}

fn load_scores(opts: &Opts) -> anyhow::Result<(WeightMatrix, NameIndex)> {
    let options = ReaderOptions {
        fill: opts.fill,
        duplicates: if opts.reject_duplicates {
            DuplicatePolicy::Reject
        } else {
            DuplicatePolicy::Overwrite
        },
    };

    if let Some(path) = &opts.input {
        WeightMatrix::try_read_scores_file_with(path, &options)
            .with_context(|| format!("Cannot read scores from {}", path.display()))
    } else {
        let stdin = std::io::stdin().lock();
        Ok(WeightMatrix::try_read_scores_with(stdin, &options)?)
    }
}

fn open_output(path: &Option<PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    })
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::from_args();
    build_logger_for_verbosity(LevelFilter::Warn, opts.verbose);
    signal_handling::initialize();

    let (matrix, names) = load_scores(&opts)?;
    info!(
        "Read {} students and {} scores",
        matrix.number_of_nodes(),
        matrix.edges().count()
    );

    let mut algo = BranchAndBound::new(&matrix)?;
    if opts.unclamped {
        algo.set_bound_kind(BoundKind::Unclamped);
    }
    algo.set_node_limit(opts.node_limit);

    if let Some(secs) = opts.timeout {
        algo.run_until_timeout(Duration::from_secs_f64(secs));
    } else {
        algo.run_to_completion();
    }

    let Some(solution) = algo.best_known_solution() else {
        bail!("Stopped before the first complete pairing was found");
    };
    if !solution.optimal {
        warn!("Search was interrupted; the pairing is not proven optimal");
    }

    if opts.cross_validate && !solution.optimal {
        warn!("Skip cross-validation of an unfinished search");
    } else if opts.cross_validate {
        let reference = naive_solver(&matrix)?;
        if !scores_agree(reference.score, solution.score) {
            bail!(
                "Cross-validation failed: branch-and-bound {} vs. enumeration {}",
                solution.score,
                reference.score
            );
        }
        info!(
            "Cross-validation passed; expansions: {} vs. {}",
            solution.nodes_expanded, reference.nodes_expanded
        );
    }

    let mut writer = open_output(&opts.output)?;
    if opts.json {
        let report = JsonReport {
            solution: &solution,
            names: solution
                .pairing
                .iter()
                .map(|&Edge(u, v)| [names.display_name(u), names.display_name(v)])
                .collect(),
            statistics: algo.statistics(),
        };
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writeln!(writer)?;
        writer.flush()?;
    } else {
        solution.try_write_pairing(writer, &matrix, &names)?;
    }

    Ok(())
}
