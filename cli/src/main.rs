use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use opt_table_config::TableDefinition;
use opt_table_core::{ArgumentList, HelpSettings, MissingArgs, OptTable, OptionFlags};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit status when parsing stopped on an option with missing values.
const EXIT_MISSING_ARGS: i32 = 2;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
    Text,
}

#[derive(Debug, Parser)]
#[command(name = "optparse")]
#[command(version = PACKAGE_VERSION)]
#[command(about = "Validate, document, and exercise option table definitions")]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that one or more table definitions build into valid tables.
    Validate(ValidateArgs),
    /// Print the help listing of a table definition.
    Help(HelpArgs),
    /// Parse an argument vector against a table definition.
    Parse(ParseArgs),
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Table definition files (.json, .yaml, .yml).
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    /// Table definition file.
    #[arg(long)]
    table: PathBuf,
    /// Also list options flagged hidden.
    #[arg(long)]
    all: bool,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Table definition file.
    #[arg(long)]
    table: PathBuf,
    /// Output format.
    #[arg(long, default_value = "text")]
    format: CliOutputFormat,
    /// Exit with status 1 when any argument was not recognized.
    #[arg(long)]
    fail_on_unknown: bool,
    /// Arguments to parse, after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ParseOutput<'a> {
    args: &'a ArgumentList,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing: Option<&'a MissingArgs>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Validate(args) => run_validate(args).map(|()| 0),
        Command::Help(args) => run_help(args).map(|()| 0),
        Command::Parse(args) => run_parse(args),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_table(path: &Path) -> Result<(TableDefinition, OptTable), String> {
    let definition =
        TableDefinition::load(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let table = definition
        .build_table()
        .map_err(|e| format!("{}: {e}", path.display()))?;
    Ok((definition, table))
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut failures = 0;
    for path in &args.files {
        match load_table(path) {
            Ok((_, table)) => {
                debug!(path = %path.display(), options = table.len(), "table is valid");
            }
            Err(err) => {
                eprintln!("{err}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(format!(
            "{failures} of {} table definition(s) failed validation",
            args.files.len()
        ));
    }
    println!("Validated {} table definition(s).", args.files.len());
    Ok(())
}

fn run_help(args: HelpArgs) -> Result<(), String> {
    let (definition, table) = load_table(&args.table)?;

    let mut settings = HelpSettings::from(&definition.help);
    if args.all {
        settings = settings.excluding(OptionFlags::empty());
    }
    let help = table.help(&settings).map_err(|e| e.to_string())?;

    if let Some(name) = &definition.name {
        println!("Usage: {name} [options]\n");
    }
    print!("{help}");
    Ok(())
}

fn run_parse(args: ParseArgs) -> Result<i32, String> {
    let (_, table) = load_table(&args.table)?;
    let parsed = table.parse_args(&args.args);

    let output = ParseOutput {
        args: &parsed.args,
        missing: parsed.missing.as_ref(),
    };
    match args.format {
        CliOutputFormat::Json => {
            let json = serde_json::to_string_pretty(&output).map_err(|e| e.to_string())?;
            println!("{json}");
        }
        CliOutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&output).map_err(|e| e.to_string())?;
            print!("{yaml}");
        }
        CliOutputFormat::Text => {
            for arg in &parsed.args {
                let mut line = format!("{}: {} [id {}]", arg.index(), arg.spelling(), arg.option());
                for value in arg.values() {
                    line.push_str(&format!(" {value:?}"));
                }
                println!("{line}");
            }
        }
    }

    if let Some(missing) = &parsed.missing {
        eprintln!("error: {missing}");
        return Ok(EXIT_MISSING_ARGS);
    }

    if args.fail_on_unknown {
        let unknown: Vec<&str> = parsed
            .args
            .matching(table.unknown_id())
            .map(|arg| arg.spelling())
            .collect();
        if !unknown.is_empty() {
            eprintln!("error: unrecognized argument(s): {}", unknown.join(" "));
            return Ok(1);
        }
    }

    Ok(0)
}
