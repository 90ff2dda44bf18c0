use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use crashsym::symbolicate::{CommandDebugTools, SymbolicateOptions, Symbolicator};

fn execute(matches: &ArgMatches) -> Result<()> {
    let report_path = matches.get_one::<String>("report").unwrap();
    let text = if report_path == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read report from stdin")?;
        buffer
    } else {
        fs::read_to_string(report_path)
            .with_context(|| format!("failed to read report from {report_path}"))?
    };

    let options = SymbolicateOptions {
        dsym_path: matches.get_one::<PathBuf>("dsym").cloned(),
        search_paths: matches
            .get_many::<PathBuf>("search")
            .unwrap_or_default()
            .cloned()
            .collect(),
    };

    let symbolicator = Symbolicator::new(options, CommandDebugTools);
    let rewritten = symbolicator.process(&text)?;

    match matches.get_one::<String>("output") {
        Some(path) => fs::write(path, rewritten)
            .with_context(|| format!("failed to write output to {path}"))?,
        None => io::stdout().write_all(rewritten.as_bytes())?,
    }

    Ok(())
}

fn main() {
    let matches = Command::new("crashsym")
        .about("Symbolicates textual crash reports against debug-symbol bundles")
        .arg(
            Arg::new("report")
                .value_name("REPORT")
                .required(true)
                .help("Path to the crash report, or - for standard input"),
        )
        .arg(
            Arg::new("dsym")
                .short('d')
                .long("dsym")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("A .dSYM bundle directory or debug artifact for the crashed binary"),
        )
        .arg(
            Arg::new("search")
                .short('s')
                .long("search")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Append)
                .help("A directory to probe for <executable>.dSYM; may be given multiple times"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("PATH")
                .help("Write the rewritten report to a file instead of standard output"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Raise log verbosity; may be given multiple times"),
        )
        .get_matches();

    let filter = match matches.get_count("verbose") {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(io::stderr)
        .init();

    if let Err(error) = execute(&matches) {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}
