// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

use crate::commands;

fn build_cli() -> Command {
    Command::new("tutorial-runner")
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(
            "Runs parameterized notebook tutorials against connected hardware \
             configurations and renders the results.",
        )
        .arg(
            Arg::new("config")
                .help("Path to the declarative test configuration file")
                .value_name("CONFIG")
                .value_parser(clap::value_parser!(PathBuf))
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("docs-dir")
                .long("docs-dir")
                .help(
                    "Directory containing the tutorial documents \
                     (defaults to the configuration file's directory)",
                )
                .value_name("DOCS_DIR")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory receiving rendered artifacts")
                .value_name("OUTPUT_DIR")
                .default_value("rendered")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("engine")
                .long("engine")
                .help("Execution engine command override, e.g. \"jupyter nbconvert\"")
                .value_name("COMMAND")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("full-tracebacks")
                .long("full-tracebacks")
                .help("Report every error's traceback instead of only the first")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-export")
                .long("no-export")
                .help("Skip rendering of passing runs")
                .action(ArgAction::SetTrue),
        )
}

pub async fn run() -> Result<()> {
    let matches = build_cli().get_matches();

    let config = matches
        .get_one::<PathBuf>("config")
        .expect("required argument")
        .clone();
    let docs_dir = matches.get_one::<PathBuf>("docs-dir").cloned();
    let output_dir = matches
        .get_one::<PathBuf>("output-dir")
        .expect("has default")
        .clone();
    let engine = matches.get_one::<String>("engine").cloned();
    let full_tracebacks = matches.get_flag("full-tracebacks");
    let export = !matches.get_flag("no-export");

    commands::run::execute(commands::run::RunArgs {
        config,
        docs_dir,
        output_dir,
        engine,
        full_tracebacks,
        export,
    })
    .await
}
