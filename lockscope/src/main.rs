//! # lockscope - Main Entry Point
//!
//! Runs two independent passes over a thread dump:
//! - **Report**: thread state summary and waiting-thread analysis on stdout
//! - **Graph**: wait-for digraph written as Graphviz DOT
//!
//! A failed pass is reported and the other still runs.

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use std::io;

use lockscope::analysis::{Report, WaitForGraph};
use lockscope::cli::Args;
use lockscope::export::{render_report, write_json_to_path, AnalysisDocument, DotExporter};
use lockscope::source::{run_graph_pass, run_report_pass, DumpSource};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;
const EXIT_PARTIAL: i32 = 3;

fn main() {
    env_logger::init();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version also come through here
            let code = if e.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS };
            let _ = e.print();
            std::process::exit(code);
        }
    };
    std::process::exit(run(&args));
}

/// Run the requested passes and map their outcomes to an exit code.
fn run(args: &Args) -> i32 {
    let source = match DumpSource::from_arg(&args.dump).buffered() {
        Ok(source) => source,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            return EXIT_ERROR;
        }
    };

    let report = (!args.no_report).then(|| report_pass(&source));
    let graph = (!args.no_graph).then(|| graph_pass(&source, args));
    let mut code = exit_code(report.as_ref(), graph.as_ref());

    if let Some(json_path) = &args.json {
        if let Some(Ok(report)) = &report {
            let document = AnalysisDocument {
                report,
                graph: graph.as_ref().and_then(|g| g.as_ref().ok()),
            };
            match write_json_to_path(&document, json_path) {
                Ok(()) if !args.quiet => println!("saved: {}", json_path.display()),
                Ok(()) => {}
                Err(e) => {
                    error!("{e}");
                    eprintln!("error: {e}");
                    code = code.max(EXIT_PARTIAL);
                }
            }
        } else {
            warn!("no report available, skipping JSON export to {}", json_path.display());
        }
    }

    code
}

fn report_pass(source: &DumpSource) -> Result<Report> {
    let outcome = run_report_pass(source).context("report pass failed").and_then(|report| {
        render_report(&report, io::stdout().lock()).context("Failed to print report")?;
        Ok(report)
    });
    if let Err(e) = &outcome {
        error!("{e:#}");
        eprintln!("error: {e:#}");
    }
    outcome
}

fn graph_pass(source: &DumpSource, args: &Args) -> Result<WaitForGraph> {
    let outcome = run_graph_pass(source).context("graph pass failed").and_then(|graph| {
        DotExporter::new(&graph)
            .with_name(args.graph_name.as_str())
            .write_to_path(&args.graph)
            .context("graph pass failed")?;
        for edge in graph.unresolved() {
            info!("no holder found for lock {} awaited by {}", edge.lock, edge.from);
        }
        if !args.quiet {
            println!("✅ Dependency graph saved as {}", args.graph.display());
        }
        Ok(graph)
    });
    if let Err(e) = &outcome {
        error!("{e:#}");
        eprintln!("error: {e:#}");
    }
    outcome
}

fn exit_code<R, G>(report: Option<&Result<R>>, graph: Option<&Result<G>>) -> i32 {
    let outcomes = [report.map(Result::is_ok), graph.map(Result::is_ok)];
    let ran = outcomes.iter().flatten().count();
    let succeeded = outcomes.iter().flatten().filter(|ok| **ok).count();
    match succeeded {
        0 if ran > 0 => EXIT_ERROR,
        n if n == ran => EXIT_SUCCESS,
        _ => EXIT_PARTIAL,
    }
}
