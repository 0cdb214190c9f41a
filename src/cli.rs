use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "ipatriage")]
#[command(about = "Static triage for iOS application packages")]
#[command(version)]
pub struct Args {
    /// Path to the .ipa package to triage
    pub archive: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
