use std::fs;
use std::io::Read;

use anyhow::{Context, Result};
use clap::{App, Arg};
use cql::{Cql2Dnf, DnfConfig, Predicate};
use log::{debug, info, LevelFilter};
use simplelog::{SimpleLogger, TermLogger};

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Could not read predicate from standard input")?;
        Ok(buffer)
    } else {
        fs::read_to_string(input).with_context(|| format!("Could not read file {}", input))
    }
}

fn read_config(path: Option<&str>) -> Result<DnfConfig> {
    match path {
        Some(path) => {
            let content =
                fs::read_to_string(path).with_context(|| format!("Could not read file {}", path))?;
            let config = DnfConfig::from_toml_str(&content)
                .with_context(|| format!("Invalid configuration file {}", path))?;
            Ok(config)
        }
        None => Ok(DnfConfig::default()),
    }
}

fn main() -> Result<()> {
    let matches = App::new("cql2dnf")
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("Normalizes a CQL WHERE clause predicate to Disjunctive Normal Form.")
        .arg(
            Arg::with_name("debug")
                .short("d")
                .long("debug")
                .help("Enables debug output")
                .takes_value(false),
        )
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .help("TOML file with conversion limits")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .help("Prints the normalized predicate as JSON instead of CQL text")
                .takes_value(false),
        )
        .arg(
            Arg::with_name("stats")
                .long("stats")
                .help("Logs the size of the conversion")
                .takes_value(false),
        )
        .arg(
            Arg::with_name("INPUT")
                .help("JSON file with the predicate tree, \"-\" reads from standard input")
                .required(true)
                .index(1),
        )
        .get_matches();

    let log_filter = if matches.is_present("debug") {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let log_filter = if matches.is_present("stats") {
        log_filter.max(LevelFilter::Info)
    } else {
        log_filter
    };

    let log_config = simplelog::ConfigBuilder::new().build();

    if let Err(e) = TermLogger::init(
        log_filter,
        log_config.clone(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("Error, can't initialize the terminal log output: {}.\nWill degrade to a more simple logger", e);
        if let Err(e_simple) = SimpleLogger::init(log_filter, log_config) {
            eprintln!("Simple logging failed too: {}", e_simple);
        }
    }

    let config = read_config(matches.value_of("config"))?;
    debug!("using configuration {:?}", config);

    let input = matches.value_of("INPUT").unwrap_or("-");
    let predicate: Predicate =
        serde_json::from_str(&read_input(input)?).context("Input is not a valid predicate tree")?;

    let dnf = Cql2Dnf::new(config).compile(&predicate)?;
    if matches.is_present("stats") {
        info!(
            "{} clause(s), {} terminals, {} heap entries, {} rewrites",
            dnf.predicate.clause_count(),
            dnf.stats.terminals,
            dnf.stats.heap_entries,
            dnf.stats.rewrites
        );
    }

    if matches.is_present("json") {
        println!("{}", serde_json::to_string_pretty(&dnf.predicate)?);
    } else {
        println!("{}", dnf.predicate);
    }
    Ok(())
}
