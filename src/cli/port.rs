use std::path::{Path, PathBuf};

use clap::Args;

use super::{fail, load_config, load_estimator, TargetArgs};

#[derive(Args)]
pub struct PortArgs {
    /// Model descriptor (JSON)
    pub model: PathBuf,
    #[command(flatten)]
    pub target: TargetArgs,
    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

pub fn cmd_port(args: PortArgs, config: Option<&Path>) {
    let estimator = load_estimator(&args.model, args.target, load_config(config));
    let written = estimator.save(&args.output).unwrap_or_else(|e| fail(e));
    for path in written {
        println!("{}", path.display());
    }
}
