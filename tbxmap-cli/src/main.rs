use clap::{Parser, Subcommand};
use tbxmap_cli::{
    inspect::run_inspect_command,
    map::{MapArgs, run_map_command},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tbxmap", author, version, about, long_about = None)]
struct Args {
    /// Print debug logs to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Map a Congree TBX export to the Phrase TMS import layout.
    Map {
        /// The TBX file to map
        #[arg(short, long)]
        input: String,

        /// Full output path (defaults to `<input>_mapped.tbx` next to the input)
        #[arg(short, long, conflicts_with = "name")]
        output: Option<String>,

        /// Output file name without extension, placed next to the input
        #[arg(short, long)]
        name: Option<String>,

        /// Value for the entry-level conceptDomain description
        #[arg(long)]
        domain: Option<String>,

        /// Value for the entry-level conceptSubdomain description
        #[arg(long)]
        subdomain: Option<String>,

        /// Print a JSON summary instead of the status line
        #[arg(long)]
        json: bool,

        /// Suppress the progress bar and status line
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show term entry, language and usage counts of a TBX file.
    Inspect {
        /// The TBX file to inspect
        #[arg(short, long)]
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.commands {
        Commands::Map {
            input,
            output,
            name,
            domain,
            subdomain,
            json,
            quiet,
        } => run_map_command(MapArgs {
            input,
            output,
            name,
            domain,
            subdomain,
            json,
            quiet,
        }),
        Commands::Inspect { input, json } => run_inspect_command(input, json),
    }
}
