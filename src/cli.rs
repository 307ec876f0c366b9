//! Command line input handling

/// Command line arguments
#[derive(clap::Parser)]
#[command(author, version, about)]
pub struct Args {
    /// The length of the array to sort
    #[arg()]
    pub size: usize,
    /// The number of cooperating participants, including the root
    #[arg(short, long, default_value_t = default_participants())]
    pub participants: usize,
    /// The number of timed runs to do
    #[arg(short, long, default_value_t = 1)]
    pub runs: usize,
    /// The data to fill the array with
    #[arg(short, long, default_value_t = DataType::Uniform)]
    pub data: DataType,
    /// Seed for the rng
    #[arg(long)]
    pub seed: Option<u64>,
}

/// One participant per available core.
fn default_participants() -> usize {
    std::thread::available_parallelism()
        .map(|parallelism| parallelism.get())
        .unwrap_or(1)
}

/// Available data patterns for sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DataType {
    /// Uniform values below the array length
    Uniform,
    /// A shuffled permutation of `0..size`
    Permutation,
    /// Zipf-skewed values with heavy duplication
    Zipf,
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(clap::ValueEnum::to_possible_value(self).unwrap().get_name())
    }
}
