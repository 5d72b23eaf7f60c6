//! Questlog CLI - Track goals and earn points for keeping them.

use clap::Parser;
use questlog::action_log;
use questlog::cli::{Cli, Commands, ConfigCommands};
use questlog::commands::{self, Output};
use questlog::config::{ConfigOverrides, OutputFormat, ResolvedConfig, resolve_config};
use questlog::models::NewGoal;
use std::process;
use std::time::Instant;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the tracing filter directive.
const LOG_ENV: &str = "QL_LOG";

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let mut overrides = ConfigOverrides::new();
    if let Some(path) = cli.data_file.clone() {
        overrides = overrides.with_data_file(path);
    }
    if cli.human_readable {
        overrides = overrides.with_output_format(OutputFormat::Human);
    }

    let config = match resolve_config(&overrides) {
        Ok(config) => config,
        Err(e) => exit_with_error(&e, cli.human_readable),
    };
    let human = config.human();

    // Serialize command for logging
    let (cmd_name, args_json) = serialize_command(&cli.command);

    let start = Instant::now();
    let result = run_command(cli.command, &config);
    let duration = start.elapsed().as_millis() as u64;

    let (success, error) = match &result {
        Ok(_) => (true, None),
        Err(e) => (false, Some(e.to_string())),
    };
    action_log::log_action(&config, &cmd_name, args_json, success, error, duration);

    if let Err(e) = result {
        exit_with_error(&e, human);
    }
}

/// Log to stderr, filtered by `QL_LOG` (warnings only by default).
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn run_command(
    command: Option<Commands>,
    config: &ResolvedConfig,
) -> Result<(), questlog::Error> {
    let human = config.human();
    let data_file = config.data_file();

    match command {
        None => output(&commands::status(data_file)?, human),

        Some(Commands::Create {
            kind,
            name,
            description,
            points,
            target,
            bonus,
        }) => {
            let new_goal = NewGoal {
                goal_type: kind,
                name,
                description,
                points,
                target_count: target,
                bonus_points: bonus,
            };
            output(&commands::goal_create(data_file, new_goal)?, human);
        }

        Some(Commands::List) => output(&commands::goal_list(data_file)?, human),

        Some(Commands::Record { index }) => {
            output(&commands::goal_record(data_file, index)?, human)
        }

        Some(Commands::Score) => output(&commands::score(data_file)?, human),

        Some(Commands::Save { path }) => output(&commands::save(data_file, &path)?, human),

        Some(Commands::Load { path }) => output(&commands::load(data_file, &path)?, human),

        Some(Commands::Reset) => output(&commands::reset(data_file)?, human),

        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => output(&commands::config_show(config), human),
        },
    }

    Ok(())
}

/// Print output in JSON or human-readable format.
fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}

/// Report an error on stderr and exit with status 1.
fn exit_with_error(e: &questlog::Error, human: bool) -> ! {
    if human {
        eprintln!("Error: {}", e);
    } else {
        eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
    }
    process::exit(1);
}

/// Serialize command to extract name and arguments for logging.
fn serialize_command(command: &Option<Commands>) -> (String, serde_json::Value) {
    match command {
        None => ("status".to_string(), serde_json::json!({})),

        Some(Commands::Create {
            kind,
            name,
            description,
            points,
            target,
            bonus,
        }) => (
            "create".to_string(),
            serde_json::json!({
                "kind": kind,
                "name": name,
                "description": description,
                "points": points,
                "target": target,
                "bonus": bonus,
            }),
        ),

        Some(Commands::List) => ("list".to_string(), serde_json::json!({})),

        Some(Commands::Record { index }) => {
            ("record".to_string(), serde_json::json!({ "index": index }))
        }

        Some(Commands::Score) => ("score".to_string(), serde_json::json!({})),

        Some(Commands::Save { path }) => (
            "save".to_string(),
            serde_json::json!({ "path": path.display().to_string() }),
        ),

        Some(Commands::Load { path }) => (
            "load".to_string(),
            serde_json::json!({ "path": path.display().to_string() }),
        ),

        Some(Commands::Reset) => ("reset".to_string(), serde_json::json!({})),

        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => ("config show".to_string(), serde_json::json!({})),
        },
    }
}
