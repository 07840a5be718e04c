//! procwatch CLI entry point.
//!
//! Parses command-line arguments and dispatches to the appropriate command handler.

use clap::{CommandFactory, Parser, Subcommand};
use procwatch::commands::{
    config_display_command, config_path_command, config_reset_command, config_set_command,
    export_command, health_command, monitor_command, resolve_config, system_command,
    ExportOptions, MonitorOptions,
};
use procwatch::completion::{print_completion_script, ShellType, SUPPORTED_SHELLS};
use procwatch::config::load_config;
use procwatch::logging::init_logger;
use procwatch::output::print_error;
use procwatch::ProcessQuery;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "procwatch")]
#[command(
    version,
    about = "Client for the Process Manager REST API: CPU alerts and CSV snapshots",
    after_help = "EXAMPLES:
    # Alert on processes above 50% CPU, checking every 5 seconds
    procwatch monitor

    # Stricter threshold, faster polling, against another host
    procwatch --url http://build-01:8080/api monitor --threshold 80 --interval 2

    # Save the current snapshot
    procwatch export --output snapshot.csv

CONFIG FILE:
    ~/.config/procwatch/config.toml (created with defaults on first run).
    Command-line flags override values from the file."
)]
struct Cli {
    /// Show debug logging on stderr (PROCWATCH_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Process Manager API base URL (overrides base_url from the config file)
    #[arg(long, global = true, value_name = "URL")]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the API and alert on processes with high CPU usage
    #[command(after_help = "EXAMPLES:
    procwatch monitor                      # Defaults from config (50%, every 5s, top 5)
    procwatch monitor -t 90 -i 10          # Alert above 90%, poll every 10 seconds
    procwatch monitor --once               # Single check, then exit

Press Ctrl+C to stop monitoring.")]
    Monitor {
        /// Alert when CPU usage is strictly above this percentage
        #[arg(short, long, value_name = "PCT")]
        threshold: Option<f64>,

        /// Seconds between polls
        #[arg(short, long, value_name = "SECS")]
        interval: Option<u64>,

        /// Maximum number of alerts per poll
        #[arg(short = 'n', long = "top", value_name = "N")]
        top: Option<usize>,

        /// Poll once and exit
        #[arg(long)]
        once: bool,
    },

    /// Write the current process snapshot to a CSV file
    #[command(after_help = "EXAMPLES:
    procwatch export                               # Writes process_snapshot.csv
    procwatch export -o /tmp/procs.csv --user root # Only root's processes
    procwatch export --sort-by memory --limit 50   # 50 biggest memory users

COLUMNS:
    pid, ppid, name, user, cpu_usage, memory_usage, memory_percent, status,
    threads, network_connections, is_container, container_id, gpu_memory, command")]
    Export {
        /// Output file (overrides output_file from the config file)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Only processes owned by this user
        #[arg(long)]
        user: Option<String>,

        /// Only processes whose name matches this regular expression
        #[arg(long, value_name = "REGEX")]
        name: Option<String>,

        /// Maximum number of processes
        #[arg(long)]
        limit: Option<usize>,

        /// Server-side sort column (pid, name, user, cpu, memory, start_time)
        #[arg(long, value_name = "COLUMN")]
        sort_by: Option<String>,

        /// Sort ascending instead of descending
        #[arg(long)]
        ascending: bool,
    },

    /// Show host information reported by the API
    System,

    /// Check whether the API is reachable and healthy
    Health,

    /// View, modify, or reset configuration values
    #[command(after_help = "EXAMPLES:
    procwatch config                            # Show the config file
    procwatch config set cpu_threshold 75       # Change a value
    procwatch config reset                      # Restore defaults
    procwatch config path                       # Print the file location

VALID KEYS:
    base_url, cpu_threshold, interval_secs, top_n, output_file, timeout_secs")]
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },

    /// Output shell completion script to stdout (hidden utility command)
    #[command(hide = true)]
    Completions {
        /// Shell type to generate completions for (bash, zsh, or fish)
        shell: String,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },
    /// Reset the configuration file to defaults
    Reset,
    /// Print the configuration file path
    Path,
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    // Commands that don't need a loaded configuration
    let result = match &cli.command {
        Commands::Config { subcommand } => Some(match subcommand {
            None => config_display_command(),
            Some(ConfigSubcommand::Set { key, value }) => config_set_command(key, value),
            Some(ConfigSubcommand::Reset) => config_reset_command(),
            Some(ConfigSubcommand::Path) => config_path_command(),
        }),

        Commands::Completions { shell } => match ShellType::from_name(shell) {
            Ok(shell_type) => {
                print_completion_script(shell_type, &mut Cli::command());
                Some(Ok(()))
            }
            Err(e) => {
                print_error(&format!(
                    "{}\nSupported shells: {}",
                    e,
                    SUPPORTED_SHELLS.join(", ")
                ));
                std::process::exit(1);
            }
        },

        _ => None,
    };

    let result = result.unwrap_or_else(|| {
        let config = match load_config().and_then(|c| resolve_config(&c, cli.url.as_deref())) {
            Ok(config) => config,
            Err(e) => {
                print_error(&format!("Failed to load configuration: {}", e));
                std::process::exit(1);
            }
        };

        match &cli.command {
            Commands::Monitor {
                threshold,
                interval,
                top,
                once,
            } => monitor_command(
                &config,
                &MonitorOptions {
                    threshold: *threshold,
                    interval_secs: *interval,
                    top_n: *top,
                    once: *once,
                },
            ),

            Commands::Export {
                output,
                user,
                name,
                limit,
                sort_by,
                ascending,
            } => export_command(
                &config,
                &ExportOptions {
                    output: output.clone(),
                    query: ProcessQuery {
                        sort_by: sort_by.clone(),
                        ascending: ascending.then_some(true),
                        user: user.clone(),
                        name: name.clone(),
                        limit: *limit,
                    },
                },
            ),

            Commands::System => system_command(&config),

            Commands::Health => health_command(&config),

            // Handled above
            Commands::Config { .. } | Commands::Completions { .. } => unreachable!(),
        }
    });

    if let Err(e) = result {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
