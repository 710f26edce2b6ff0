// tabmatch CLI - find duplicate records across Excel and Word tables

mod commands;
mod exit_codes;
mod inputs;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use tabmatch_engine::EngineError;
use tabmatch_io::{ExportError, SourceError};

use exit_codes::{
    engine_exit_code, EXIT_ERROR, EXIT_EXPORT, EXIT_SOURCE_FAILED, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "tabmatch")]
#[command(about = "Find duplicate records across tables in .xlsx and .docx files")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Input files shared by every data command.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Input files (.xlsx, .docx)
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Fail (exit 7) if any input cannot be read instead of skipping it
    #[arg(long)]
    pub strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show sources, row counts and the unified field list
    #[command(after_help = "\
Examples:
  tabmatch inspect clients.xlsx contracts.docx
  tabmatch inspect *.xlsx --json")]
    Inspect {
        #[command(flatten)]
        input: InputArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Case-insensitive full-text search over all fields
    #[command(after_help = "\
Examples:
  tabmatch search clients.xlsx contracts.docx -q ivanov
  tabmatch search clients.xlsx -q 'Sheet: Archive'
  tabmatch search clients.xlsx -q riga --no-system-fields -o hits.xlsx")]
    Search {
        #[command(flatten)]
        input: InputArgs,

        /// Text to look for (empty = every row)
        #[arg(long, short = 'q', default_value = "")]
        query: String,

        /// Do not match against row_id and provenance
        #[arg(long)]
        no_system_fields: bool,

        /// Write the result to a file (.xlsx, .csv, .json)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Group rows whose selected fields normalize to the same key
    #[command(after_help = "\
Examples:
  tabmatch dupes clients.xlsx contracts.docx --fields Phone
  tabmatch dupes clients.xlsx --fields 'Last name,First name' --all-fields -o dupes.xlsx
  tabmatch dupes clients.xlsx --fields Email --keep-symbols --case-sensitive")]
    Dupes {
        #[command(flatten)]
        input: InputArgs,

        /// Fields forming the match key, in order (comma-separated or repeated)
        #[arg(long, short = 'f', required = true, value_delimiter = ',')]
        fields: Vec<String>,

        /// Compare letter case exactly
        #[arg(long)]
        case_sensitive: bool,

        /// Keep punctuation, spaces and other symbols in the key
        #[arg(long)]
        keep_symbols: bool,

        /// Include every field in the output, not only the selected ones
        #[arg(long)]
        all_fields: bool,

        /// Write the result to a file (.xlsx, .csv, .json)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a match profile (TOML)
    #[command(after_help = "\
Examples:
  tabmatch run match.toml
  tabmatch run match.toml -o result.csv --json

Profile format:
  files = [\"clients.xlsx\", \"contracts.docx\"]   # relative to the profile
  fields = [\"Phone\"]
  ignore_case = true
  ignore_symbols = true
  search = \"\"
  output = \"duplicates.xlsx\"")]
    Run {
        /// Profile file
        profile: PathBuf,

        /// Override the profile's output file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Fail (exit 7) if any input cannot be read
        #[arg(long)]
        strict: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  tabmatch-engine ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
        "\ninputs:  xlsx, docx",
        "\noutputs: xlsx, csv, json",
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = tabmatch_config::Settings::load();
    log::debug!("settings: {:?}", settings);

    let result = match cli.command {
        Commands::Inspect { input, json } => commands::cmd_inspect(&input, json),
        Commands::Search {
            input,
            query,
            no_system_fields,
            output,
            json,
        } => commands::cmd_search(&input, &settings, query, no_system_fields, output, json),
        Commands::Dupes {
            input,
            fields,
            case_sensitive,
            keep_symbols,
            all_fields,
            output,
            json,
        } => commands::cmd_dupes(
            &input,
            &settings,
            commands::DupesOptions {
                fields,
                case_sensitive,
                keep_symbols,
                all_fields,
            },
            output,
            json,
        ),
        Commands::Run {
            profile,
            output,
            strict,
            json,
        } => commands::cmd_run(&profile, output, strict, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise `warn`, raised by `-v`.
/// Library crates log through `log`; the subscriber bridges those records.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    /// Create error from an engine error with the matching exit code.
    pub fn engine(err: EngineError) -> Self {
        let code = engine_exit_code(&err);
        let hint = match &err {
            EngineError::EmptyInput => {
                Some("check that the files contain tables with at least one data row".to_string())
            }
            EngineError::InvalidSelection { .. } => {
                Some("run `tabmatch inspect` on the same files to list field names".to_string())
            }
            EngineError::ConfigParse(_) | EngineError::ConfigValidation(_) => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    pub fn export(err: ExportError) -> Self {
        Self { code: EXIT_EXPORT, message: err.to_string(), hint: None }
    }

    /// `--strict` with unreadable inputs.
    pub fn sources(failures: &[SourceError]) -> Self {
        let message = match failures {
            [single] => format!("could not read {}", single),
            _ => format!("{} inputs could not be read", failures.len()),
        };
        Self {
            code: EXIT_SOURCE_FAILED,
            message,
            hint: Some("drop --strict to skip unreadable inputs".to_string()),
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
