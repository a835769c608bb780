use std::path::{Path, PathBuf};

use clap::Args;

use super::{fail, load_config, load_estimator, read_labels, read_rows, TargetArgs};

#[derive(Args)]
pub struct ScoreArgs {
    /// Model descriptor (JSON)
    pub model: PathBuf,
    /// Input rows: a JSON array of feature arrays
    pub rows: PathBuf,
    #[command(flatten)]
    pub target: TargetArgs,
    /// Expected labels (default: the model's own predictions)
    #[arg(long, value_name = "PATH")]
    pub expected: Option<PathBuf>,
    /// Print the number of matches instead of the fraction
    #[arg(long)]
    pub raw: bool,
}

pub fn cmd_score(args: ScoreArgs, config: Option<&Path>) {
    let estimator = load_estimator(&args.model, args.target, load_config(config));
    let rows = read_rows(&args.rows);
    let labels = args.expected.as_deref().map(read_labels);
    let accuracy = estimator
        .score(&rows, labels.as_deref(), !args.raw)
        .unwrap_or_else(|e| fail(e));
    println!("{}", accuracy);
}
