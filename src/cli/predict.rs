use std::path::{Path, PathBuf};

use clap::Args;

use super::{fail, load_config, load_estimator, read_rows, TargetArgs};

#[derive(Args)]
pub struct PredictArgs {
    /// Model descriptor (JSON)
    pub model: PathBuf,
    /// Input rows: a JSON array of feature arrays
    pub rows: PathBuf,
    #[command(flatten)]
    pub target: TargetArgs,
    /// Worker threads (default: from config, else one per core)
    #[arg(long)]
    pub workers: Option<usize>,
    /// Keep the generated and compiled files
    #[arg(long)]
    pub keep_files: bool,
}

pub fn cmd_predict(args: PredictArgs, config: Option<&Path>) {
    let mut config = load_config(config);
    if let Some(workers) = args.workers {
        if workers == 0 {
            fail("--workers must be at least 1");
        }
        config.harness.workers = Some(workers);
    }
    if args.keep_files {
        config.harness.cleanup = false;
    }
    let estimator = load_estimator(&args.model, args.target, config);
    let rows = read_rows(&args.rows);
    let predictions = estimator.predict(&rows).unwrap_or_else(|e| fail(e));
    for prediction in predictions {
        match prediction {
            Some(p) => println!("{}", serde_json::to_string(&p).unwrap_or_else(|e| fail(e))),
            None => println!("null"),
        }
    }
}
