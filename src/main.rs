use clap::Parser as _;
use rand::SeedableRng as _;

mod algorithms;
mod cli;
mod data;
mod protocol;
mod topology;
mod transport;


/// Program entry point
fn main() {
    env_logger::init();

    let cli::Args {
        size,
        participants,
        runs,
        data,
        seed,
    } = cli::Args::parse();

    if participants == 0 {
        abort("the participant group cannot be empty");
    }

    println!("Array size = {size}");
    println!("Participants = {participants}");
    println!("Runs: {runs}, Data: {data}");

    let mut rng = match seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => {
            println!("No seed provided, generating one using system rng");
            rand::rngs::StdRng::from_os_rng()
        }
    };

    let (samples, stats) = match data {
        cli::DataType::Uniform => {
            perform_experiment::<data::UniformData>(size, participants, runs, &mut rng)
        }
        cli::DataType::Permutation => {
            perform_experiment::<data::PermutationData>(size, participants, runs, &mut rng)
        }
        cli::DataType::Zipf => {
            perform_experiment::<data::ZipfData>(size, participants, runs, &mut rng)
        }
    };

    match samples.as_slice() {
        [only] => println!("Elapsed = {only:?}"),
        _ => println!("Stats: {stats:?}"),
    }
}

/// Perform a time sampling experiment on the distributed sort
///
/// - size: The length of the arrays to sort
/// - participants: The size of the process group, including the root
/// - runs: The number of samples to measure; an extra warmup run, which also
///   warms up thread spawning, is not recorded
/// - rng: The rng used for sampling the data
fn perform_experiment<D: data::Data<u64>>(
    size: usize,
    participants: usize,
    runs: usize,
    rng: &mut rand::rngs::StdRng,
) -> (Vec<std::time::Duration>, rolling_stats::Stats<f64>) {
    let mut samples = Vec::with_capacity(runs);

    let mut stats: rolling_stats::Stats<f64> = rolling_stats::Stats::new();

    let bar = indicatif::ProgressBar::new(runs as u64);

    for run in 0..=runs {
        let mut array = D::initialize(size, rng);
        let mut tmp = array.clone();

        let now = std::time::Instant::now();
        let outcome = protocol::run_group(&mut array, &mut tmp, participants, protocol::SORT_TAG);
        let elapsed = now.elapsed();

        let counters = match outcome {
            Ok(counters) => counters,
            Err(error) => abort(format!("run {run} failed: {error}")),
        };

        if !array.is_sorted() {
            abort(format!("run {run} finished with an unsorted array"));
        }

        log::debug!(
            "run {run}: {elapsed:?}, {sent} messages sent, {received} received",
            sent = counters.sent,
            received = counters.received
        );

        // Skip the warmup sample
        if run != 0 {
            samples.push(elapsed);
            stats.update(elapsed.as_secs_f64() * 1e3);

            bar.inc(1);
        }
    }

    bar.finish_and_clear();

    (samples, stats)
}

/// Report a fatal error on stderr and end the process with a non-zero status.
fn abort(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}
