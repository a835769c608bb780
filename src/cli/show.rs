use clap::Args;
use porter::{Estimator, Language};

#[derive(Args)]
pub struct ShowArgs {
    /// Only show this language's column
    #[arg(short, long)]
    pub language: Option<Language>,
}

pub fn cmd_show(args: ShowArgs) {
    println!("{}", Estimator::show(args.language));
    println!();
    println!("✓ supported, ᴀ attached, ᴄ combined, ᴇ exported, ᴾ with predict_proba");
}
