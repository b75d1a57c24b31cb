use anyhow::{Context as _, Result, bail};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use corpus_metrics::metric::{Context, Metric};
use corpus_metrics::sanity::{self, Metadata};
use corpus_metrics::{corpus, options, plugin, registry};
use log::{debug, error, info};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a metric over a corpus directory and write result rows as CSV
    Run {
        /// Corpus directory containing .txt documents
        corpus: PathBuf,
        /// Output CSV file
        outfile: PathBuf,
        /// Name of a registered metric
        #[arg(short, long)]
        metric: Option<String>,
        /// Load the metric from a driver library at this location instead
        #[arg(long, conflicts_with = "metric")]
        driver: Option<PathBuf>,
        /// Metric options, as key=value
        #[arg(short = 'o', long = "option")]
        options: Vec<String>,
        /// Worker threads (default: number of CPUs)
        #[arg(short, long)]
        jobs: Option<usize>,
    },
    /// List registered metrics and their options
    List,
    /// Sanity-check corpus metadata
    Sanity {
        /// Metadata CSV file with a 'words' column
        metadata: PathBuf,
        /// Proportion of minimum-word documents required to raise a warning
        #[arg(long, default_value_t = sanity::DEFAULT_CUTOFF)]
        cutoff: f64,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(feature = "nlp")]
fn context() -> Context {
    Context::with_default_backend()
}

#[cfg(not(feature = "nlp"))]
fn context() -> Context {
    Context::new(None)
}

fn cmd_run(
    corpus_dir: &Path,
    outfile: &Path,
    metric_name: Option<String>,
    driver_path: Option<PathBuf>,
    raw_options: &[String],
    jobs: Option<usize>,
) -> Result<()> {
    let registered;
    let loaded;
    let metric: &dyn Metric = match (metric_name, driver_path) {
        (Some(name), None) => {
            registered = registry::builtin().lookup(&name).map_err(anyhow::Error::from_boxed)?;
            registered.as_ref()
        }
        (None, Some(path)) => {
            loaded = plugin::load_driver(&path).map_err(anyhow::Error::from_boxed)?;
            loaded.metric()
        }
        _ => bail!("specify exactly one of --metric and --driver"),
    };
    let raw = options::parse_pairs(raw_options).map_err(anyhow::Error::from_boxed)?;
    let opts = options::resolve(metric.options(), &raw).map_err(anyhow::Error::from_boxed)?;
    let columns = metric.columns(&opts).map_err(anyhow::Error::from_boxed)?;
    let documents = corpus::read_corpus(corpus_dir).map_err(anyhow::Error::from_boxed)?;
    let ctx = context();
    let jobs = jobs.unwrap_or_else(num_cpus::get);
    let rows = corpus::process_corpus(metric, &opts, &ctx, &documents, jobs).map_err(anyhow::Error::from_boxed)?;
    let out = File::create(outfile).with_context(|| format!("cannot create {}", outfile.display()))?;
    corpus::write_csv(out, &[corpus::INDEX_LABEL.to_owned()], &columns, &rows).map_err(anyhow::Error::from_boxed)?;
    info!("{}: wrote {} rows to {}", metric.name(), rows.len(), outfile.display());
    Ok(())
}

fn cmd_list() -> Result<()> {
    let registry = registry::builtin();
    for name in registry.names() {
        let metric = registry.lookup(name).map_err(anyhow::Error::from_boxed)?;
        println!("{name}: {}", metric.help());
        for opt in metric.options() {
            let mut line = format!("  {}: {}", opt.name, opt.help);
            if let Some(default) = opt.default {
                line.push_str(&format!(" [default: {default}]"));
            }
            if opt.required {
                line.push_str(" [required]");
            }
            println!("{line}");
        }
    }
    Ok(())
}

fn cmd_sanity(path: &Path, cutoff: f64, json: bool) -> Result<()> {
    let metadata = Metadata::from_path(path).map_err(anyhow::Error::from_boxed)?;
    debug!("identifying columns: {}", metadata.id_columns().join(", "));
    let report = metadata.check(cutoff).map_err(anyhow::Error::from_boxed)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("documents: {}", report.statistics.documents);
        println!("total words: {}", report.statistics.total_words);
        println!(
            "largest document: {} ({} words)",
            report.extremes.max_document, report.extremes.max_words
        );
        println!(
            "smallest document: {} ({} words, {} documents at the minimum)",
            report.extremes.min_document, report.extremes.min_words, report.extremes.min_count
        );
    }
    if report.warning {
        bail!(
            "{} of {} documents have the minimum word count of {}",
            report.extremes.min_count,
            report.statistics.documents,
            report.extremes.min_words
        );
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Run {
            corpus,
            outfile,
            metric,
            driver,
            options,
            jobs,
        } => cmd_run(&corpus, &outfile, metric, driver, &options, jobs),
        Command::List => cmd_list(),
        Command::Sanity {
            metadata,
            cutoff,
            json,
        } => cmd_sanity(&metadata, cutoff, json),
    }
}

fn main() {
    let args = Args::parse();
    pretty_env_logger::formatted_timed_builder()
        .filter_level(args.verbose.log_level_filter())
        .init();
    match run(args) {
        Ok(()) => (),
        Err(e) => {
            error!("{e:#}");
            process::exit(1);
        }
    }
}
