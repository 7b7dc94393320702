use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;
use std::process::exit;
use tlsexpiry::config::Config;
use tlsexpiry::output;
use tlsexpiry::severity::{EXIT_FATAL, EXIT_OK, EXIT_USAGE};
use tlsexpiry::{check_endpoints, now_unix, OpenSslProbe};
use tracing::{error, Level};

/// Checks certificate validity bounds of TLS endpoints.
///
/// Exit codes: 0 all certificates fine, 1 wrong usage, 2 at least one
/// certificate about to expire, 3 at least one certificate expired,
/// 4 an endpoint could not be reached.
#[derive(Parser, Debug)]
#[command(name = "tlsexpiry", version, about)]
struct Cli {
    /// Skip certificate chain trust and hostname verification
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    insecure: Option<bool>,

    /// Number of days to show as about to expire [default: 30]
    #[arg(long, value_name = "DAYS", allow_negative_numbers = true)]
    yellow: Option<i64>,

    /// Number of days to show as expired [default: -1]
    #[arg(long, value_name = "DAYS", allow_negative_numbers = true)]
    red: Option<i64>,

    /// Connect and handshake timeout in seconds [default: 10]
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Report printed on stdout: log, json, table [default: log]
    #[arg(long, value_name = "FORMAT")]
    output: Option<String>,

    /// On an unreachable endpoint: abort the run, or score it red and continue [default: abort]
    #[arg(long = "on-error", value_name = "POLICY")]
    on_error: Option<String>,

    /// TOML file with default settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,

    /// Endpoints to check
    #[arg(value_name = "HOST[:PORT]")]
    hosts: Vec<String>,
}

impl Cli {
    fn to_config(&self) -> Config {
        Config {
            hosts: if self.hosts.is_empty() {
                None
            } else {
                Some(self.hosts.clone())
            },
            insecure: self.insecure,
            yellow: self.yellow,
            red: self.red,
            timeout: self.timeout,
            output: self.output.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

fn usage() {
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "tlsexpiry".to_string());
    eprintln!(
        "Usage: {} [--insecure[=BOOL]] [--yellow=DAYS] [--red=DAYS] [host[:port]]...",
        program
    );
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_OK,
                _ => {
                    usage();
                    EXIT_USAGE
                }
            };
        }
    };

    if cli.print_config {
        println!("{}", Config::example_toml());
        return EXIT_OK;
    }

    let file_config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                return EXIT_USAGE;
            }
        },
        None => Config::default(),
    };

    let settings = match file_config.merge_with(cli.to_config()).resolve() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            usage();
            return EXIT_USAGE;
        }
    };

    if settings.hosts.is_empty() {
        usage();
        return EXIT_USAGE;
    }

    init_logging();

    let probe = OpenSslProbe::new(settings.insecure, settings.timeout);
    let report = match check_endpoints(
        &probe,
        &settings.hosts,
        settings.thresholds,
        settings.on_error,
        now_unix(),
    ) {
        Ok(report) => report,
        // already logged by check_endpoints
        Err(_) => return EXIT_FATAL,
    };

    match output::render(&report, settings.output) {
        Ok(Some(rendered)) => println!("{}", rendered),
        Ok(None) => {}
        Err(e) => error!("failed to render report: {}", e),
    }

    report.severity.exit_code()
}

fn main() {
    exit(run());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_leave_everything_unset() {
        let cli = Cli::try_parse_from(["tlsexpiry", "example.com"]).unwrap();
        let config = cli.to_config();
        assert_eq!(config.hosts, Some(vec!["example.com".to_string()]));
        assert_eq!(config.insecure, None);
        assert_eq!(config.yellow, None);
        assert_eq!(config.red, None);
    }

    #[test]
    fn test_go_style_flags() {
        let cli = Cli::try_parse_from([
            "tlsexpiry",
            "--insecure=false",
            "--yellow=14",
            "--red=-5",
            "a.example:8443",
            "b.example",
        ])
        .unwrap();
        assert_eq!(cli.insecure, Some(false));
        assert_eq!(cli.yellow, Some(14));
        assert_eq!(cli.red, Some(-5));
        assert_eq!(cli.hosts, vec!["a.example:8443", "b.example"]);
    }

    #[test]
    fn test_bare_insecure_flag_means_true() {
        let cli = Cli::try_parse_from(["tlsexpiry", "--insecure", "example.com"]).unwrap();
        assert_eq!(cli.insecure, Some(true));
        assert_eq!(cli.hosts, vec!["example.com"]);
    }

    #[test]
    fn test_negative_threshold_with_space() {
        let cli = Cli::try_parse_from(["tlsexpiry", "--red", "-3", "example.com"]).unwrap();
        assert_eq!(cli.red, Some(-3));
    }

    #[test]
    fn test_no_hosts_parses_to_empty_list() {
        let cli = Cli::try_parse_from(["tlsexpiry"]).unwrap();
        assert!(cli.hosts.is_empty());
        assert_eq!(cli.to_config().hosts, None);
    }

    #[test]
    fn test_bad_threshold_is_a_parse_error() {
        assert!(Cli::try_parse_from(["tlsexpiry", "--yellow=soon", "example.com"]).is_err());
    }
}
