use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "aging-extract",
    version,
    about = "Rebuild an accounts-receivable aging table from a grid-less PDF page"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Extract(ExtractArgs),
    Repair(RepairArgs),
    Rows(RowsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct BodyArgs {
    #[arg(long)]
    pub body_start: Option<usize>,

    #[arg(long)]
    pub body_end: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long)]
    pub pdf: PathBuf,

    /// Character offsets where each column starts in the layout text.
    #[arg(long, value_delimiter = ',', required = true)]
    pub columns: Vec<usize>,

    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub body: BodyArgs,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RepairArgs {
    #[arg(long)]
    pub rows: PathBuf,

    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub body: BodyArgs,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RowsArgs {
    #[arg(long)]
    pub pdf: PathBuf,

    #[arg(long, value_delimiter = ',', required = true)]
    pub columns: Vec<usize>,

    #[arg(long)]
    pub output: Option<PathBuf>,
}
