use std::path::PathBuf;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::error;

use mirscore_rs::manifest::{load_manifest, ResultDirs};
use mirscore_rs::types::LabelStyle;
use mirscore_rs::{score_manifest_with, ToolKind};

/// Score miRNA aligners against the ground truth encoded in simulated read names.
#[derive(Parser, Debug)]
#[command(name = "mirscore-rs", version)]
struct Cli {
    /// Manifest with a `simReads` column and one result column per tool
    #[arg(short, long)]
    manifest: PathBuf,

    /// Output table (TSV)
    #[arg(short, long)]
    output: PathBuf,

    #[arg(long)]
    quagmir_dir: Option<PathBuf>,

    #[arg(long)]
    microrazers_dir: Option<PathBuf>,

    #[arg(long)]
    star_dir: Option<PathBuf>,

    #[arg(long)]
    miraligner_dir: Option<PathBuf>,

    #[arg(long)]
    razers3_dir: Option<PathBuf>,

    /// Worker threads (0 = all cores)
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    /// Write yes/no/multi-yes/multi-no/NA instead of descriptive labels
    #[arg(long)]
    legacy_labels: bool,
}

impl Cli {
    fn result_dirs(&self) -> ResultDirs {
        [
            (ToolKind::Quagmir, &self.quagmir_dir),
            (ToolKind::Microrazers, &self.microrazers_dir),
            (ToolKind::Star, &self.star_dir),
            (ToolKind::Miraligner, &self.miraligner_dir),
            (ToolKind::Razers3, &self.razers3_dir),
        ]
        .into_iter()
        .filter_map(|(tool, dir)| dir.clone().map(|d| (tool, d)))
        .collect()
    }
}

fn spinner(color: &str, msg: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template(&format!("{{spinner:.{color}}} {{msg}}"))
            .expect("Invalid spinner template"),
    );
    spinner.set_message(msg.to_string());
    spinner
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()?;
    }

    // 1. Manifest
    let sp = spinner("blue", "Loading manifest...");
    let entries = load_manifest(&cli.manifest, &cli.result_dirs())?;
    sp.finish_with_message(format!("Found {} dataset(s).", entries.len()));

    // 2. Scoring
    let bar = ProgressBar::new(entries.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.green} {pos}/{len} datasets {msg}")
            .expect("Invalid progress template"),
    );
    let results = score_manifest_with(&entries, |entry| {
        bar.set_message(entry.dataset_id());
        bar.inc(1);
    })?;
    bar.finish_with_message("scored");

    // 3. Output
    let sp = spinner("yellow", "Writing output table...");
    let style = if cli.legacy_labels {
        LabelStyle::Legacy
    } else {
        LabelStyle::Descriptive
    };
    results.write_table(&cli.output, style)?;
    sp.finish_with_message(format!(
        "Wrote {} rows to {}.",
        results.rows.len(),
        cli.output.display()
    ));

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        error!("{e}");
        std::process::exit(1);
    }
}
