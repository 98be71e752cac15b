use std::path::PathBuf;

use clap::{CommandFactory, Parser, error::ErrorKind};

pub const DEFAULT_BASE_URL: &str = "https://api.meraki.com/api/v1";

pub const READ_ME: &str = "\
=== PREREQUISITES ===
An API key with write access to the target dashboard network.

Have input CSV file with client name and MAC address specified.

=== DESCRIPTION ===
This tool renames clients in a dashboard network using an input CSV file.
The first row of the file is a header and is skipped; column 1 holds the
new client name and column 2 the client's MAC address. Each client's
current policy is preserved while the name is updated.

=== USAGE ===
client-rename -f <input_file> -k <api_key> -n <net_id> [-m <mode>]
Mode defaults to \"simulate\" unless \"commit\" is specified.";

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Rename dashboard network clients from a CSV file",
    after_help = READ_ME,
    args_override_self = true
)]
pub struct Cli {
    /// Input CSV file with client name and MAC address columns
    #[arg(short = 'f', long = "file")]
    pub input: PathBuf,
    /// Dashboard API key
    #[arg(short = 'k', long = "api-key")]
    pub api_key: String,
    /// Network identifier the clients belong to
    #[arg(short = 'n', long = "network-id")]
    pub network_id: String,
    /// Run mode; anything other than "commit" runs a simulation
    #[arg(short = 'm', long = "mode")]
    pub mode: Option<String>,
    /// Dashboard API base URL
    #[arg(long = "base-url", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Option parsing stops at the first non-option; the rest is ignored
    #[arg(hide = true, trailing_var_arg = true)]
    pub ignored: Vec<String>,
}

impl Cli {
    pub fn run_mode(&self) -> RunMode {
        RunMode::from_flag(self.mode.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Simulate,
    Commit,
}

impl RunMode {
    /// Only the literal `commit` enables remote changes.
    pub fn from_flag(value: Option<&str>) -> Self {
        match value {
            Some("commit") => RunMode::Commit,
            _ => RunMode::Simulate,
        }
    }

    pub fn is_simulate(self) -> bool {
        self == RunMode::Simulate
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunMode::Simulate => "simulate",
            RunMode::Commit => "commit",
        }
    }
}

/// Parses process arguments, printing the help text and exiting with status 2
/// on any usage error. `-h` and `--version` exit with status 0.
pub fn parse_or_exit() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                // Exiting with 2 regardless; a failed write to stderr changes nothing.
                let _ = err.print();
                eprintln!();
                eprintln!("{}", Cli::command().render_long_help());
                std::process::exit(2);
            }
        },
    }
}
