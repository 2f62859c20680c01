use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fitch")]
#[command(
    about = "Parse Fitch-style natural deduction proofs written in a compact, easy-to-type format"
)]
#[command(version)]
struct Cli {
    /// Input proof file (reads stdin when omitted and piped)
    input: Option<PathBuf>,

    /// Print the syntax tree as JSON instead of an indented outline
    #[arg(short, long)]
    json: bool,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let source = read_source(cli.input.as_deref());

    let tree = match fitch_parser::Parser::parse(&source) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if cli.json {
        match serde_json::to_string(&tree) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing tree: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", tree.pretty());
    }
}

/// Log to stderr, only when `RUST_LOG` is set (e.g. `RUST_LOG=fitch_parser=trace`).
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn read_source(path: Option<&std::path::Path>) -> String {
    let Some(path) = path else {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            Cli::command()
                .error(
                    ErrorKind::MissingRequiredArgument,
                    "no input file given and stdin is a terminal",
                )
                .exit();
        }
        let mut source = String::new();
        if let Err(e) = stdin.lock().read_to_string(&mut source) {
            eprintln!("Error reading stdin: {e}");
            std::process::exit(1);
        }
        tracing::debug!(bytes = source.len(), "read proof from stdin");
        return source;
    };

    if !path.exists() {
        eprintln!("Error: file `{}` doesn't exist", path.display());
        std::process::exit(1);
    }
    match std::fs::read_to_string(path) {
        Ok(source) => {
            tracing::debug!(path = %path.display(), bytes = source.len(), "read proof");
            source
        }
        Err(e) => {
            eprintln!("Error reading {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_json_flag() {
        let cli = Cli::try_parse_from(["fitch", "--json", "proof.fitch"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.input, Some(PathBuf::from("proof.fitch")));
    }

    #[test]
    fn test_input_optional() {
        let cli = Cli::try_parse_from(["fitch", "-j"]).unwrap();
        assert!(cli.json);
        assert!(cli.input.is_none());
    }

    #[test]
    fn test_single_positional() {
        assert!(Cli::try_parse_from(["fitch", "a.fitch", "b.fitch"]).is_err());
    }
}
