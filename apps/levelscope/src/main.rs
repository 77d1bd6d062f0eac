mod commands;
mod obs;

use clap::Parser;
use commands::{AnalyzeCommand, Source};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "levelscope")]
#[command(
    about = "Gann and Fibonacci price levels for a daily bar series",
    version,
    arg_required_else_help = true
)]
#[command(
    after_help = "Examples:\n  levelscope --input data/ACME.json --pretty\n  levelscope --symbol ACME --data-dir data/ --weekly --config configs/levelscope.toml\n"
)]
struct Cli {
    /// JSON or CSV bar file (`.csv` is read as CSV, anything else as JSON).
    #[arg(long, conflicts_with = "symbol", required_unless_present = "symbol")]
    input: Option<PathBuf>,
    /// Symbol resolved to `<data-dir>/<symbol>.json` or `.csv`.
    #[arg(long, requires = "data_dir")]
    symbol: Option<String>,
    #[arg(long)]
    data_dir: Option<PathBuf>,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Add the weekly view and the weekly breakout check.
    #[arg(long, default_value_t = false)]
    weekly: bool,
    /// Last day (YYYY-MM-DD) folded into the weekly view.
    #[arg(long)]
    as_of: Option<String>,
    #[arg(long, default_value = "info")]
    log_level: String,
    /// text or json
    #[arg(long, default_value = "text")]
    log_format: String,
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = obs::init_tracing(&cli.log_level, &cli.log_format) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }

    let source = match (cli.input, cli.symbol, cli.data_dir) {
        (Some(path), _, _) => Source::File(path),
        (None, Some(symbol), Some(data_dir)) => Source::Symbol { symbol, data_dir },
        _ => {
            eprintln!("error: pass --input <file> or --symbol <symbol> --data-dir <dir>");
            std::process::exit(1);
        }
    };
    let command = AnalyzeCommand {
        source,
        config: cli.config,
        weekly: cli.weekly,
        as_of: cli.as_of,
        pretty: cli.pretty,
    };

    match commands::execute(&command) {
        Ok(output) => println!("{output}"),
        Err(err) => {
            tracing::error!(error = %err, "analysis failed");
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    }
}
