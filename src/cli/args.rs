use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "order_pipeline")]
#[command(about = "A three-stage kitchen pipeline: intake, preparation, delivery")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run orders through the pipeline until every order is delivered or dropped
    Run(RunArgs),

    /// List the breakfast menus and their steps
    Menu,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Comma-separated order ids (e.g. A,B,C)
    #[arg(short, long, value_delimiter = ',', conflicts_with = "count")]
    pub orders: Vec<String>,

    /// Generate N orders named order-001, order-002, ...
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Number of intake workers
    #[arg(long)]
    pub intake_workers: Option<usize>,

    /// Number of preparation workers (defaults to the CPU count)
    #[arg(long)]
    pub prep_workers: Option<usize>,

    /// Number of delivery workers
    #[arg(long)]
    pub delivery_workers: Option<usize>,

    /// Minimum simulated cook time in milliseconds
    #[arg(long)]
    pub min_delay_ms: Option<u64>,

    /// Maximum simulated cook time in milliseconds
    #[arg(long)]
    pub max_delay_ms: Option<u64>,

    /// Completion monitor poll interval in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// What to do with an order whose preparation fails
    #[arg(long, value_enum)]
    pub fault_policy: Option<FaultPolicyArg>,

    /// Attempts per order under the retry policy
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Comma-separated order ids whose preparation always fails
    #[arg(long, value_delimiter = ',')]
    pub fail_orders: Vec<String>,

    /// Breakfast to cook for every order (e.g. "Bacon Egg And Cheese")
    #[arg(short, long)]
    pub menu: Option<String>,

    /// Overlap independent recipe steps (heat the pan while grabbing ingredients)
    #[arg(long, requires = "menu")]
    pub overlap: bool,

    /// Multiplier applied to recipe step durations
    #[arg(long, default_value = "0.001")]
    pub time_scale: f64,

    /// JSON configuration file; command-line flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the run summary as JSON to this path
    #[arg(short, long)]
    pub summary: Option<PathBuf>,

    /// Suppress per-order console output
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultPolicyArg {
    Drop,
    Retry,
}
