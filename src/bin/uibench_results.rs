use clap::{Parser, Subcommand, ValueEnum};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uibench_results::launch::{self, LaunchOptions, CONTESTANTS};
use uibench_results::render::text_table;
use uibench_results::schema::{DashboardReport, RunMeta, SCHEMA_VERSION};
use uibench_results::simulate::{self, SimConfig};
use uibench_results::{project, DeliveryCounts, OutputFormat, ReportChannel, ResultStore};
use url::Url;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProfileArg {
    Quick,
    Full,
}

impl ProfileArg {
    fn session(self, seed: u64) -> SimConfig {
        match self {
            ProfileArg::Quick => SimConfig::quick(seed),
            ProfileArg::Full => SimConfig::full(seed),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate newline-delimited report events and print the results table.
    Ingest {
        /// Event file (one JSON message per line). Reads stdin when omitted.
        #[arg(short, long, value_name = "FILE", num_args = 1.., action = clap::ArgAction::Append)]
        input: Vec<PathBuf>,

        /// Only show test cases whose name contains this text (case-sensitive).
        #[arg(long, default_value = "")]
        filter: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Print the table again after every applied report.
        #[arg(long, default_value_t = false)]
        watch: bool,
    },

    /// Emit a deterministic synthetic session as newline-delimited report events.
    Simulate {
        /// Number of simulated contestants.
        #[arg(long, default_value_t = 4)]
        contestants: usize,
    },

    /// Print launch URLs for contestant benchmark pages.
    LaunchUrl {
        /// Built-in contestant name. Can be provided multiple times.
        #[arg(long, value_name = "NAME", action = clap::ArgAction::Append)]
        contestant: Vec<String>,

        /// Custom benchmark page URL.
        #[arg(long, value_name = "URL")]
        url: Option<Url>,

        #[arg(long, default_value_t = 3)]
        iterations: u32,

        /// Disable the shouldComponentUpdate optimization.
        #[arg(long, default_value_t = false)]
        disable_scu: bool,

        /// Enable DOM recycling (if the implementation supports changing it).
        #[arg(long, default_value_t = false)]
        enable_dom_recycling: bool,

        #[arg(long, default_value_t = false)]
        mobile: bool,

        /// Restrict the benchmark page to matching test cases.
        #[arg(long, value_name = "TEXT")]
        test_filter: Option<String>,
    },

    /// List built-in contestants.
    Contestants,
}

#[derive(Parser, Debug)]
#[command(name = "uibench-results")]
#[command(about = "Aggregates cross-window UI benchmark reports into a comparison table")]
struct Args {
    #[arg(long, value_enum, default_value_t = ProfileArg::Quick, global = true)]
    profile: ProfileArg,

    #[arg(long, default_value_t = 0, global = true)]
    seed: u64,

    /// Where to write the output. If omitted, prints to stdout.
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// Increase logging verbosity.
    #[arg(long, short, default_value_t = false, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "uibench_results=debug"
    } else {
        "uibench_results=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn now_utc() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("unix:{secs}")
}

fn output(out: &Option<PathBuf>) -> io::Result<Box<dyn Write>> {
    Ok(match out {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    })
}

fn render(
    store: &ResultStore,
    filter: &str,
    format: OutputFormat,
    counts: &DeliveryCounts,
    pretty: bool,
) -> io::Result<String> {
    let table = project(store, filter);
    match format {
        OutputFormat::Table => Ok(text_table(&table)),
        OutputFormat::Json => {
            let report = DashboardReport {
                run: RunMeta {
                    schema_version: SCHEMA_VERSION,
                    tool_version: env!("CARGO_PKG_VERSION").to_string(),
                    timestamp_utc: now_utc(),
                    filter: filter.to_string(),
                    revision: store.revision(),
                    events_applied: counts.applied,
                    events_ignored: counts.ignored,
                    events_rejected: counts.rejected,
                },
                table,
            };
            let json = if pretty {
                serde_json::to_string_pretty(&report)
            } else {
                serde_json::to_string(&report)
            };
            json.map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(io::Error::other)
        }
    }
}

fn ingest(
    args: &Args,
    inputs: &[PathBuf],
    filter: &str,
    format: OutputFormat,
    watch: bool,
) -> io::Result<()> {
    let mut readers: Vec<Box<dyn BufRead>> = Vec::new();
    if inputs.is_empty() {
        readers.push(Box::new(io::stdin().lock()));
    } else {
        for path in inputs {
            readers.push(Box::new(BufReader::new(File::open(path)?)));
        }
    }

    let mut out = output(&args.out)?;
    let mut store = ResultStore::new();
    let mut counts = DeliveryCounts::default();

    for reader in readers {
        let mut channel = ReportChannel::new(&mut store);
        let seen = counts;
        let input_counts = channel.deliver_lines(reader, |store, outcome, so_far| {
            if outcome.created {
                info!(reports = store.len(), "new contestant reported");
            }
            if watch {
                let text = render(store, filter, format, &(seen + *so_far), false)?;
                out.write_all(text.as_bytes())?;
                if format == OutputFormat::Table {
                    writeln!(out)?;
                }
                out.flush()?;
            }
            Ok(())
        })?;
        counts = counts + input_counts;
    }

    info!(
        applied = counts.applied,
        ignored = counts.ignored,
        rejected = counts.rejected,
        reports = store.len(),
        test_cases = store.test_cases().len(),
        "ingest finished"
    );

    if !watch {
        out.write_all(render(&store, filter, format, &counts, true)?.as_bytes())?;
    }
    out.flush()
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match &args.cmd {
        Command::Ingest {
            input,
            filter,
            format,
            watch,
        } => ingest(&args, input, filter, *format, *watch),
        Command::Simulate { contestants } => {
            let cfg = args.profile.session(args.seed);
            let events = simulate::generate(&cfg, *contestants);
            info!(
                profile = ?args.profile,
                seed = cfg.seed,
                events = events.len(),
                "generated synthetic session"
            );

            let mut out = output(&args.out)?;
            for event in &events {
                let message = event.to_message().map_err(io::Error::other)?;
                let line = serde_json::to_string(&message).map_err(io::Error::other)?;
                writeln!(out, "{line}")?;
            }
            out.flush()
        }
        Command::LaunchUrl {
            contestant,
            url,
            iterations,
            disable_scu,
            enable_dom_recycling,
            mobile,
            test_filter,
        } => {
            let opts = LaunchOptions {
                iterations: *iterations,
                disable_scu: *disable_scu,
                enable_dom_recycling: *enable_dom_recycling,
                mobile_mode: *mobile,
                test_filter: test_filter.clone(),
            };

            let mut lines = Vec::new();
            if let Some(url) = url {
                lines.push(format!("custom\t{}", launch::launch_url(url, &opts)));
            }
            let selected: Vec<_> = if contestant.is_empty() && url.is_none() {
                CONTESTANTS.iter().collect()
            } else {
                let mut found = Vec::new();
                for name in contestant {
                    match launch::find_contestant(name) {
                        Some(c) => found.push(c),
                        None => warn!(name = %name, "unknown contestant"),
                    }
                }
                found
            };
            for c in selected {
                let target = c.launch_url(&opts).map_err(io::Error::other)?;
                lines.push(format!("{}\t{}", c.name, target));
            }

            let mut out = output(&args.out)?;
            for line in lines {
                writeln!(out, "{line}")?;
            }
            out.flush()
        }
        Command::Contestants => {
            let json = serde_json::to_string_pretty(CONTESTANTS).map_err(io::Error::other)?;
            if let Some(out) = &args.out {
                fs::write(out, json)?;
            } else {
                println!("{json}");
            }
            Ok(())
        }
    }
}
