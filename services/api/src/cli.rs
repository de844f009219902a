use crate::infra::{parse_sub_weight, parse_weight_override};
use crate::render::{run_presets, run_rank, run_traits};
use crate::server;
use clap::{Args, Parser, Subcommand, ValueEnum};
use phone_match::decision::{Condition, OsFilter, Preset, ScreenFilter, SubFactor, TraitKey};
use phone_match::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Phone Match",
    about = "Rank smartphones against hard constraints and weighted priorities",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Rank the catalog once and print the top matches
    Rank(RankArgs),
    /// List the weight presets
    Presets,
    /// List the traits and their sub-factors
    Traits,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Load the catalog from this JSON file instead of the bundled one
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// ios, android or all
    #[arg(long, default_value = "all")]
    pub(crate) os: OsFilter,
    /// new, used or all
    #[arg(long, default_value = "all")]
    pub(crate) condition: Condition,
    /// Minimum budget in USD; non-digits are ignored
    #[arg(long)]
    pub(crate) budget_min: Option<String>,
    /// Maximum budget in USD; non-digits are ignored
    #[arg(long)]
    pub(crate) budget_max: Option<String>,
    /// small, medium, large or all
    #[arg(long, default_value = "all")]
    pub(crate) screen: ScreenFilter,
    /// Brand to leave out (repeatable)
    #[arg(long = "exclude-brand")]
    pub(crate) exclude_brands: Vec<String>,
    /// Start from a named preset instead of the balanced weights
    #[arg(long)]
    pub(crate) preset: Option<Preset>,
    /// Trait weight override, e.g. camera=9 (repeatable)
    #[arg(long = "weight", value_parser = parse_weight_override)]
    pub(crate) weights: Vec<(TraitKey, i64)>,
    /// Sub-factor weight, e.g. battery.charging=10 (repeatable)
    #[arg(long = "sub-weight", value_parser = parse_sub_weight)]
    pub(crate) sub_weights: Vec<(TraitKey, SubFactor, i64)>,
    /// Load the catalog from this JSON file instead of the bundled one
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
    Csv,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rank(args) => run_rank(args),
        Command::Presets => run_presets(),
        Command::Traits => run_traits(),
    }
}
