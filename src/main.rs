//! threadpaths CLI.
//!
//! Usage:
//!   threadpaths paths -i comments.csv [-o paths.csv]
//!   threadpaths batch -i threads/ -o windows/
//!   threadpaths clean -i comments.csv [-o comments_cleaned.csv]

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use threadpaths::{today_stamp, DepthOrder, TableFormat, ThreadPaths};

#[derive(Parser)]
#[command(
    name = "threadpaths",
    version,
    about = "Rebuild reply trees from scraped comment tables and cut them into conversation windows"
)]
struct Cli {
    /// Rayon worker threads (defaults to available cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
    /// Disable progress bars
    #[arg(long, global = true)]
    no_progress: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Jsonl,
}

impl From<Format> for TableFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Csv => TableFormat::Csv,
            Format::Jsonl => TableFormat::Jsonl,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Decompose one thread's comment table into path windows
    Paths {
        /// Comment table with comment_id, reply_to and depth columns (.csv, .jsonl, optionally .zst)
        #[arg(short, long)]
        infile: PathBuf,
        /// Window table to write (default: paths_<date>.<format>)
        #[arg(short, long)]
        outfile: Option<PathBuf>,
        /// Output format when the output path has no table extension
        #[arg(long, value_enum, default_value = "csv")]
        format: Format,
        /// Sort depth as text ("10" before "2") like a raw string column
        #[arg(long)]
        lexical_depth: bool,
    },
    /// Decompose every comment table in a directory
    Batch {
        /// Directory of comment tables (one thread per file)
        #[arg(short, long)]
        indir: PathBuf,
        /// Directory for <stem>_paths.<format> outputs
        #[arg(short, long)]
        outdir: PathBuf,
        #[arg(long, value_enum, default_value = "csv")]
        format: Format,
        #[arg(long)]
        lexical_depth: bool,
    },
    /// Fill the body column with cleaned comment text
    Clean {
        /// Comment table with a text column
        #[arg(short, long)]
        infile: PathBuf,
        /// Cleaned table to write (default: comments_cleaned_<date>.csv)
        #[arg(short, long)]
        outfile: Option<PathBuf>,
    },
}

fn depth_order(lexical: bool) -> DepthOrder {
    if lexical { DepthOrder::Lexical } else { DepthOrder::Numeric }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut base = ThreadPaths::new().progress(!cli.no_progress);
    if let Some(n) = cli.threads {
        base = base.parallelism(n);
    }

    match cli.command {
        Commands::Paths { infile, outfile, format, lexical_depth } => {
            let format = TableFormat::from(format);
            let outfile = outfile
                .unwrap_or_else(|| PathBuf::from(format!("paths_{}.{}", today_stamp(), format.extension())));
            println!("Opening {}", infile.display());
            let summary = base
                .format(format)
                .depth_order(depth_order(lexical_depth))
                .run_file(&infile, &outfile)?;
            println!("Results written to {}", summary.output.display());
            println!("Windows: {}", summary.windows);
            println!("Orphan comments: {}", summary.orphans);
        }
        Commands::Batch { indir, outdir, format, lexical_depth } => {
            let report = base
                .format(format.into())
                .depth_order(depth_order(lexical_depth))
                .run_dir(&indir, &outdir)?;
            for (path, err) in &report.failures {
                eprintln!("Skipped {}: {}", path.display(), err);
            }
            println!("Threads processed: {}", report.summaries.len());
            println!("Windows: {}", report.total_windows());
            println!("Orphan comments: {}", report.total_orphans());
        }
        Commands::Clean { infile, outfile } => {
            let outfile = outfile.unwrap_or_else(|| PathBuf::from(format!("comments_cleaned_{}.csv", today_stamp())));
            println!("Opening {}", infile.display());
            let rows = base.clean_table(&infile, &outfile)?;
            println!("Cleaned text for {rows} comments written to {}", outfile.display());
        }
    }

    Ok(())
}
