use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(
    name = "porter",
    version,
    about = "Compile trained models into standalone programs and check them against the original"
)]
struct Cli {
    /// Config file (default: nearest porter.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print which model kinds can be ported to which languages
    Show(cli::show::ShowArgs),
    /// Generate the program for a model descriptor
    Port(cli::port::PortArgs),
    /// Run the generated program once per input row
    Predict(cli::predict::PredictArgs),
    /// Compare the generated program's predictions with the model's
    Score(cli::score::ScoreArgs),
}

fn main() {
    let filter = EnvFilter::try_from_env("PORTER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();
    match cli.command {
        Command::Show(args) => cli::show::cmd_show(args),
        Command::Port(args) => cli::port::cmd_port(args, config),
        Command::Predict(args) => cli::predict::cmd_predict(args, config),
        Command::Score(args) => cli::score::cmd_score(args, config),
    }
}
