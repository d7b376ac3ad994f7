//! Command-line interface for h_sharp
//! Transpiles one h_sharp source file into htvm.
//!
//! Usage:
//!   h_sharp                               - Print usage
//!   h_sharp `<file.hss>` [options]        - Write `<file>.htvm` next to the source
//!   h_sharp `<file.hss>` --dump-stages    - Also print every intermediate buffer as JSON

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use h_sharp::transpiler::files::{
    output_path_for, read_source, usage_message, write_output, FileError, SOURCE_EXTENSION,
};
use h_sharp::{BraceStyle, TranspileError, Transpiler};
use h_sharp_config::{ConfigError, HSharpConfig, Loader, LOCAL_CONFIG_FILE};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const BIN_NAME: &str = "h_sharp";

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    File(#[from] FileError),

    #[error(transparent)]
    Transpile(#[from] TranspileError),

    #[error("cannot serialize stage dump: {0}")]
    Dump(#[from] serde_json::Error),
}

fn build_command() -> Command {
    Command::new(BIN_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Transpile h_sharp sources into htvm")
        .arg(
            Arg::new("path")
                .help("Path to the h_sharp source file")
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults and ./h_sharp.toml")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Write the generated code here instead of next to the source")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("escape-char")
                .long("escape-char")
                .help("Escape character used inside string literals"),
        )
        .arg(
            Arg::new("comment")
                .long("comment")
                .help("Comment marker (everything after it on a line is dropped)"),
        )
        .arg(
            Arg::new("brace-style")
                .long("brace-style")
                .help("Brace placement in the generated code")
                .value_parser(BraceStyle::ALL.map(BraceStyle::name)),
        )
        .arg(
            Arg::new("dump-stages")
                .long("dump-stages")
                .help("Print the buffer after every pipeline stage as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase log verbosity (-v debug, -vv trace)")
                .action(ArgAction::Count),
        )
}

fn main() {
    let matches = build_command().get_matches();
    setup_logging(matches.get_count("verbose"));

    let Some(path) = matches.get_one::<PathBuf>("path") else {
        println!("{}", usage_message(BIN_NAME, SOURCE_EXTENSION));
        return;
    };

    match run(path, &matches) {
        Ok(output) => println!("Generation finished: {} generated.", output.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn setup_logging(verbose: u8) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        })
    });

    let formatter = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(formatter)
        .with(filter)
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<HSharpConfig, CliError> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    if let Some(file) = matches.get_one::<PathBuf>("config") {
        debug!(path = %file.display(), "layering config file");
        loader = loader.with_file(file);
    }

    let overrides = [
        ("escape-char", "transpile.escape_char"),
        ("comment", "transpile.comment_marker"),
        ("brace-style", "transpile.brace_style"),
    ];
    for (arg, key) in overrides {
        if let Some(value) = matches.get_one::<String>(arg) {
            loader = loader.set_override(key, value.as_str())?;
        }
    }

    Ok(loader.build()?)
}

fn run(path: &Path, matches: &ArgMatches) -> Result<PathBuf, CliError> {
    let config = load_config(matches)?;
    let dump_stages = matches.get_flag("dump-stages");

    let source = read_source(path)?;
    let output = Transpiler::new(config.transpile)
        .record_stages(dump_stages)
        .transpile(&source)?;
    info!(
        functions = output.functions.len(),
        literals = output.literal_count,
        "transpiled {}",
        path.display()
    );

    if dump_stages {
        println!("{}", serde_json::to_string_pretty(&output.stages)?);
    }

    let target = match matches.get_one::<PathBuf>("output") {
        Some(target) => target.clone(),
        None => output_path_for(
            path,
            &config.output.source_extension,
            &config.output.target_extension,
        ),
    };
    write_output(&target, &output.code)?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        build_command().debug_assert();
    }

    #[test]
    fn parses_overrides() {
        let matches = build_command()
            .try_get_matches_from(["h_sharp", "prog.hss", "--brace-style", "own-line", "-vv"])
            .unwrap();
        assert_eq!(
            matches.get_one::<String>("brace-style").map(String::as_str),
            Some("own-line")
        );
        assert_eq!(matches.get_count("verbose"), 2);
    }

    #[test]
    fn rejects_unknown_brace_style() {
        let result =
            build_command().try_get_matches_from(["h_sharp", "prog.hss", "--brace-style", "allman"]);
        assert!(result.is_err());
    }
}
