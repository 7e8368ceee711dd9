use std::time::{Duration, Instant};

use anyhow::bail;
use log::{LevelFilter, info, warn};
use pairing::{log::build_logger_for_verbosity, prelude::*};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(about = "Compares branch-and-bound against exhaustive enumeration on random scores")]
struct Opts {
    /// Instance sizes to test; odd values are rounded up
    #[structopt(short, long, default_value = "8,10,12", use_delimiter = true)]
    nodes: Vec<NumNodes>,

    /// Instances per size and bound
    #[structopt(short, long, default_value = "100")]
    repeats: u32,

    #[structopt(short, long, default_value = "1234")]
    seed: u64,

    /// Write mismatching instances as score files into the working directory
    #[structopt(short, long)]
    write: bool,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

#[derive(Default)]
struct Totals {
    instances: u64,
    mismatches: u64,
    expansions_bb: u64,
    expansions_naive: u64,
    time_bb: Duration,
    time_naive: Duration,
}

fn random_instance(rng: &mut Pcg64, n: NumNodes) -> WeightMatrix {
    // alternate between non-negative scores and scores of mixed sign
    if rng.gen_bool(0.5) {
        WeightMatrix::random_uniform(rng, n, 0.0..1.0)
    } else {
        WeightMatrix::random_normal(rng, n, 0.0, 1.0)
    }
}

fn process_instance(
    opts: &Opts,
    matrix: &WeightMatrix,
    kind: BoundKind,
    label: &str,
    totals: &mut Totals,
) -> anyhow::Result<()> {
    let time = Instant::now();
    let solution = solve_with_bound(matrix, kind)?;
    totals.time_bb += time.elapsed();

    let time = Instant::now();
    let reference = naive_solver(matrix)?;
    totals.time_naive += time.elapsed();

    totals.instances += 1;
    totals.expansions_bb += solution.nodes_expanded;
    totals.expansions_naive += reference.nodes_expanded;

    let valid = solution.pairing.is_correct().is_ok()
        && scores_agree(solution.pairing.total_score(matrix), solution.score);
    if valid && scores_agree(solution.score, reference.score) {
        return Ok(());
    }

    totals.mismatches += 1;
    warn!(
        "Mismatch for {label} ({kind:?}): branch-and-bound {} (valid: {valid}) vs. enumeration {}",
        solution.score, reference.score
    );

    if opts.write {
        let filename = format!("{label}.csv");
        matrix.try_write_scores_file(&filename, &NameIndex::default())?;
        info!("Wrote {filename}");
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::from_args();
    build_logger_for_verbosity(LevelFilter::Info, opts.verbose);
    signal_handling::initialize();

    let mut rng = Pcg64::seed_from_u64(opts.seed);
    let mut totals = Totals::default();

    'outer: for &n in &opts.nodes {
        let n = n + n % 2;
        for round in 0..opts.repeats {
            if signal_handling::received_ctrl_c() {
                break 'outer;
            }

            let matrix = random_instance(&mut rng, n);
            let label = format!("mismatch_n{n:03}_s{}_r{round:05}", opts.seed);
            for kind in [BoundKind::Clamped, BoundKind::Unclamped] {
                process_instance(&opts, &matrix, kind, &label, &mut totals)?;
            }
        }

        info!(
            "Completed n = {n:>3} | instances: {:>7} expansions bb/naive: {}/{} time bb/naive: {:?}/{:?}",
            totals.instances,
            totals.expansions_bb,
            totals.expansions_naive,
            totals.time_bb,
            totals.time_naive
        );
    }

    if totals.mismatches > 0 {
        bail!(
            "{} of {} runs disagree with exhaustive enumeration",
            totals.mismatches,
            totals.instances
        );
    }

    println!("All {} runs agree", totals.instances);
    Ok(())
}
