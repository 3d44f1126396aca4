use std::{
    io::{Read, Write},
    path::{Path, PathBuf},
};

use determinize::prelude::*;

use thiserror::Error;
use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::{filter, prelude::*};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

mod document;
use document::{InputDocument, OutputDocument};

#[derive(Debug, Error)]
enum CliError {
    #[error("could not access {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Automaton(#[from] AutomatonError),
    #[error("rendering {path} failed: {reason}")]
    Render { path: String, reason: String },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CliError + '_ {
    move |source| CliError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn cli() -> clap::Command {
    Command::new("fadet")
        .about("Determinizes (and optionally minimizes) finite automata given as JSON documents")
        .arg(
            Arg::new("input")
                .value_name("INPUT")
                .help("JSON file that contains the NFA")
                .value_parser(value_parser!(PathBuf))
                .required_unless_present("stdin")
                .conflicts_with("stdin"),
        )
        .arg(
            Arg::new("stdin")
                .short('i')
                .long("stdin")
                .help("read the NFA from stdin")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("write the automata as JSON files into DIR")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("do not print the automata to stdout")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("minimize")
                .short('m')
                .long("minimize")
                .help("also minimize the DFA")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("render")
                .short('r')
                .long("render")
                .help("write graphviz files (and PNGs, if dot is installed) into the output directory")
                .requires("output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("accepts")
                .short('a')
                .long("accepts")
                .value_name("WORD")
                .help("check whether WORD is accepted, every character is one symbol")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("epsilon")
                .long("epsilon")
                .value_name("MARK")
                .help("symbol that marks epsilon transitions in the input")
                .default_value("@"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .num_args(0..=1)
                .require_equals(true)
                .value_parser(["info", "debug", "trace"])
                .default_missing_value("info"),
        )
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(|m| m.as_str())
    {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::WARN,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

fn read_input(matches: &ArgMatches) -> Result<String, CliError> {
    match matches.get_one::<PathBuf>("input") {
        Some(path) => {
            debug!("reading NFA from {}", path.display());
            std::fs::read_to_string(path).map_err(io_error(path))
        }
        None => {
            debug!("reading NFA from stdin");
            let mut data = String::new();
            std::io::stdin()
                .lock()
                .read_to_string(&mut data)
                .map_err(io_error(Path::new("stdin")))?;
            Ok(data)
        }
    }
}

/// Converts `dot_file` into a PNG next to it. A missing `dot` executable is not an error.
fn render_png(dot_file: &Path) -> Result<(), CliError> {
    let png_file = dot_file.with_extension("png");
    let status = std::process::Command::new("dot")
        .arg("-Tpng")
        .arg("-o")
        .arg(&png_file)
        .arg(dot_file)
        .status();
    match status {
        Ok(status) if status.success() => {
            debug!("rendered {}", png_file.display());
            Ok(())
        }
        Ok(status) => Err(CliError::Render {
            path: png_file.display().to_string(),
            reason: format!("dot process exited with status: {status}"),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(
                "graphviz dot executable not found, skipping {}",
                png_file.display()
            );
            Ok(())
        }
        Err(e) => Err(io_error(&png_file)(e)),
    }
}

struct Artifact {
    name: &'static str,
    json: String,
    diagram: Option<String>,
}

/// Processes the input selected by `matches`. Documents and verdicts are written to `out`.
fn run(matches: &ArgMatches, out: &mut impl Write) -> Result<(), CliError> {
    let epsilon = matches
        .get_one::<String>("epsilon")
        .map(String::as_str)
        .unwrap_or("@");

    let document: InputDocument = serde_json::from_str(&read_input(matches)?)?;
    let nfa = document.into_nfa(epsilon)?;
    info!("read NFA with {} states", nfa.size());

    let start = std::time::Instant::now();
    let dfa = nfa.dfa();
    info!(
        "subset construction produced {} states in {}µs",
        dfa.size(),
        start.elapsed().as_micros()
    );

    let render = matches.get_flag("render");
    let mut artifacts = vec![
        Artifact {
            name: "fadet_nfa",
            json: serde_json::to_string(&OutputDocument::from_nfa(&nfa, epsilon))?,
            diagram: render.then(|| nfa.diagram().dot_representation("nfa")),
        },
        Artifact {
            name: "fadet_dfa",
            json: serde_json::to_string(&OutputDocument::from_dfa(dfa))?,
            diagram: render.then(|| dfa.diagram().dot_representation("dfa")),
        },
    ];

    if matches.get_flag("minimize") {
        let start = std::time::Instant::now();
        let min = dfa.minimize()?;
        info!(
            "minimization produced {} states in {}µs",
            min.size(),
            start.elapsed().as_micros()
        );
        artifacts.push(Artifact {
            name: "fadet_min_dfa",
            json: serde_json::to_string(&OutputDocument::from_dfa(&min))?,
            diagram: render.then(|| min.diagram().dot_representation("min_dfa")),
        });
    }

    if !matches.get_flag("silent") {
        for artifact in &artifacts {
            writeln!(out, "{}", artifact.json).map_err(io_error(Path::new("stdout")))?;
        }
    }

    if let Some(dir) = matches.get_one::<PathBuf>("output") {
        std::fs::create_dir_all(dir).map_err(io_error(dir))?;
        for artifact in &artifacts {
            let json_file = dir.join(format!("{}.json", artifact.name));
            std::fs::write(&json_file, &artifact.json).map_err(io_error(&json_file))?;
            debug!("wrote {}", json_file.display());

            if let Some(diagram) = &artifact.diagram {
                let dot_file = dir.join(format!("{}.dot", artifact.name));
                std::fs::write(&dot_file, diagram).map_err(io_error(&dot_file))?;
                render_png(&dot_file)?;
            }
        }
    }

    if let Some(words) = matches.get_many::<String>("accepts") {
        for word in words {
            let symbols = word.chars().map(String::from).collect::<Vec<_>>();
            let verdict = if nfa.accepts(&symbols) {
                "accepted"
            } else {
                "rejected"
            };
            writeln!(out, "{word:?} {verdict}").map_err(io_error(Path::new("stdout")))?;
        }
    }

    Ok(())
}

/// Logs a failed run and maps it to the process exit code.
fn exit_status(result: Result<(), CliError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            error!("{err}");
            1
        }
    }
}

pub fn main() {
    let matches = match cli().try_get_matches() {
        Ok(matches) => matches,
        // help and version requests
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            eprint!("{err}");
            std::process::exit(1);
        }
    };

    setup_logging(&matches);

    let result = run(&matches, &mut std::io::stdout().lock());
    std::process::exit(exit_status(result));
}
