//! Command-line interface for the reference-model miner.
//!
//! Four modes cover the two pipelines at two granularities: `mcc` mines
//! one reference model across whole input models and `mcc-views` mines
//! one per viewpoint name, while the `refpa` variants additionally prune
//! the mined graph down to common nodes and winning clusters. Every run
//! writes node/edge tables, per-kind occurrence stats and an ArchiMate
//! exchange file into the output directory and prints a JSON run summary
//! to stdout.

mod report;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use ream_archimate::{Element, ExchangeDocument, IdGenerator};
use ream_core::{ModelGraph, NULL_NODE_ID};
use ream_mine::{
    mine_reference, mine_views, refine_reference, refine_views, CostParams, ModelViews,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "ream",
    about = "Mines ArchiMate reference models from a directory of exchange files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mine one reference model across the whole of every input model.
    Mcc {
        #[command(flatten)]
        run: RunArgs,
        /// Minimum cost value an edge must reach to be accepted.
        #[arg(long, default_value_t = 4.0, allow_hyphen_values = true)]
        threshold: f64,
    },
    /// Mine one reference model per viewpoint name.
    MccViews {
        #[command(flatten)]
        run: RunArgs,
        /// Minimum cost value an edge must reach to be accepted.
        #[arg(long, default_value_t = 4.0, allow_hyphen_values = true)]
        threshold: f64,
    },
    /// Mine, then prune to common nodes and winning clusters.
    Refpa {
        #[command(flatten)]
        run: RunArgs,
        /// Minimum cost value an edge must reach to be accepted. The
        /// permissive default leaves the selection to the pruning pass.
        #[arg(long, default_value_t = -100.0, allow_hyphen_values = true)]
        threshold: f64,
    },
    /// Mine and prune one reference model per viewpoint name.
    RefpaViews {
        #[command(flatten)]
        run: RunArgs,
        /// Minimum cost value an edge must reach to be accepted. The
        /// permissive default leaves the selection to the pruning pass.
        #[arg(long, default_value_t = -100.0, allow_hyphen_values = true)]
        threshold: f64,
    },
}

/// Arguments shared by every mode.
#[derive(Args, Debug)]
struct RunArgs {
    /// Directory holding the ArchiMate exchange files to mine.
    #[arg(short, long)]
    input: PathBuf,
    /// Directory the reports and the exchange file are written to.
    #[arg(short, long)]
    output: PathBuf,
    /// Edge move weight in the adaptation score.
    #[arg(long, default_value_t = 2.0)]
    move_cost: f64,
    /// Edge deletion weight in the adaptation score.
    #[arg(long, default_value_t = 1.0)]
    delete_cost: f64,
    /// Edge insertion weight in the adaptation score.
    #[arg(long, default_value_t = 10.0)]
    insert_cost: f64,
    /// Seed for exchange-file identifier generation. Defaults to the clock.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Mcc { run, threshold } => run_whole(&run, threshold, false, "mcc"),
        Commands::MccViews { run, threshold } => run_views(&run, threshold, false, "mcc-views"),
        Commands::Refpa { run, threshold } => run_whole(&run, threshold, true, "refpa"),
        Commands::RefpaViews { run, threshold } => run_views(&run, threshold, true, "refpa-views"),
    };
    process::exit(code);
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

fn run_whole(run: &RunArgs, threshold: f64, refine: bool, mode: &'static str) -> i32 {
    let params = CostParams::new(run.move_cost, run.delete_cost, run.insert_cost, threshold);
    let files = match exchange_files(&run.input) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error: cannot list '{}': {}", run.input.display(), e);
            return 3;
        }
    };
    let mut graphs = Vec::with_capacity(files.len());
    for path in &files {
        let document = match read_document(path) {
            Ok(document) => document,
            Err(code) => return code,
        };
        match ream_archimate::model_graph(&document) {
            Ok(graph) => graphs.push(graph),
            Err(e) => {
                eprintln!("Error: '{}' is not a usable model: {}", path.display(), e);
                return 2;
            }
        }
    }
    if let Err(e) = fs::create_dir_all(&run.output) {
        eprintln!("Error: cannot create '{}': {}", run.output.display(), e);
        return 3;
    }

    info!(models = graphs.len(), mode, "mining reference model");
    let mut outcome = if refine {
        refine_reference(&mut graphs, &params)
    } else {
        mine_reference(&mut graphs, &params)
    };
    if !refine {
        strip_synthetic_structure(&mut outcome.reference);
    }

    if let Err(e) = write_reports(&run.output, None, &outcome.reference, refine) {
        eprintln!("Error: cannot write reports to '{}': {}", run.output.display(), e);
        return 3;
    }
    let mut document = exchange_document(run.seed);
    if let Err(e) = document.add_graph(&outcome.reference) {
        eprintln!("Error: reference model cannot be exported: {}", e);
        return 1;
    }
    if let Some(code) = write_exchange(&run.output, &mut document) {
        return code;
    }

    let summary = serde_json::json!({
        "mode": mode,
        "models": files.len(),
        "nodes": outcome.reference.node_count(),
        "edges": outcome.reference.edge_count(),
        "engine": outcome.counters,
        "output": run.output.display().to_string(),
    });
    print_summary(&summary);
    0
}

fn run_views(run: &RunArgs, threshold: f64, refine: bool, mode: &'static str) -> i32 {
    let params = CostParams::new(run.move_cost, run.delete_cost, run.insert_cost, threshold);
    let files = match exchange_files(&run.input) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error: cannot list '{}': {}", run.input.display(), e);
            return 3;
        }
    };
    let mut models = Vec::with_capacity(files.len());
    for path in &files {
        let document = match read_document(path) {
            Ok(document) => document,
            Err(code) => return code,
        };
        let views = match ream_archimate::view_graphs(&document) {
            Ok(views) => views,
            Err(e) => {
                eprintln!("Error: '{}' is not a usable model: {}", path.display(), e);
                return 2;
            }
        };
        let model = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        models.push(ModelViews { model, views });
    }
    if let Err(e) = fs::create_dir_all(&run.output) {
        eprintln!("Error: cannot create '{}': {}", run.output.display(), e);
        return 3;
    }

    info!(models = models.len(), mode, "mining per-view reference models");
    let mut outcomes = if refine {
        refine_views(models, &params)
    } else {
        mine_views(models, &params)
    };
    if !refine {
        for (_, outcome) in outcomes.iter_mut() {
            strip_synthetic_structure(&mut outcome.reference);
        }
    }
    if outcomes.is_empty() {
        warn!("no viewpoints found in any input model");
    }

    let mut document = exchange_document(run.seed);
    for (view, outcome) in &outcomes {
        let stem = report::view_file_stem(view);
        if let Err(e) = write_reports(&run.output, Some(&stem), &outcome.reference, refine) {
            eprintln!("Error: cannot write reports to '{}': {}", run.output.display(), e);
            return 3;
        }
        if let Err(e) = document.add_view(&stem, &outcome.reference) {
            eprintln!("Error: view '{}' cannot be exported: {}", view, e);
            return 1;
        }
    }
    if let Some(code) = write_exchange(&run.output, &mut document) {
        return code;
    }

    let views: serde_json::Map<String, serde_json::Value> = outcomes
        .iter()
        .map(|(view, outcome)| {
            let entry = serde_json::json!({
                "nodes": outcome.reference.node_count(),
                "edges": outcome.reference.edge_count(),
                "engine": outcome.counters,
            });
            (view.clone(), entry)
        })
        .collect();
    let summary = serde_json::json!({
        "mode": mode,
        "models": files.len(),
        "views": views,
        "output": run.output.display().to_string(),
    });
    print_summary(&summary);
    0
}

// ---------------------------------------------------------------------------
// Shared plumbing
// ---------------------------------------------------------------------------

/// Lists the `.xml` files of `input`, sorted by path so runs do not depend
/// on directory iteration order.
fn exchange_files(input: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(input)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_xml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
        if is_xml {
            files.push(path);
        } else {
            warn!(file = %path.display(), "skipping non-xml entry");
        }
    }
    files.sort();
    if files.is_empty() {
        warn!(input = %input.display(), "no .xml exchange files found");
    }
    Ok(files)
}

/// Reads and parses one exchange file, reporting the failure and handing
/// back the exit code when the file cannot be used.
fn read_document(path: &Path) -> Result<Element, i32> {
    let xml = match fs::read_to_string(path) {
        Ok(xml) => xml,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", path.display(), e);
            return Err(3);
        }
    };
    match ream_archimate::parse(&xml) {
        Ok(document) => Ok(document),
        Err(e) => {
            eprintln!("Error: '{}' is not well-formed XML: {}", path.display(), e);
            Err(2)
        }
    }
}

/// Drops the synthetic source node and its outgoing edges from a mined
/// graph. The refined pipeline already does this itself.
fn strip_synthetic_structure(reference: &mut ModelGraph) {
    reference.delete_node(NULL_NODE_ID);
    reference.delete_root_edges();
}

/// Writes the node/edge tables plus the per-kind stats tables. A `stem`
/// prefixes the file names in the per-view modes.
fn write_reports(
    output: &Path,
    stem: Option<&str>,
    graph: &ModelGraph,
    refined: bool,
) -> io::Result<()> {
    let stats = output.join("stats");
    fs::create_dir_all(&stats)?;
    let prefix = match stem {
        Some(stem) => format!("{stem}_"),
        None => String::new(),
    };
    fs::write(
        output.join(format!("{prefix}nodes.csv")),
        report::nodes_csv(graph, refined),
    )?;
    fs::write(
        output.join(format!("{prefix}edges.csv")),
        report::edges_csv(graph, refined),
    )?;
    fs::write(
        stats.join(format!("{prefix}node_stats.csv")),
        report::stats_csv(&graph.node_kind_stats()),
    )?;
    fs::write(
        stats.join(format!("{prefix}edge_stats.csv")),
        report::stats_csv(&graph.edge_kind_stats()),
    )?;
    Ok(())
}

fn exchange_document(seed: Option<u64>) -> ExchangeDocument {
    match seed {
        Some(seed) => ExchangeDocument::with_generator(IdGenerator::seeded(seed)),
        None => ExchangeDocument::new(),
    }
}

/// Regenerates identifiers and writes `reference_model.xml`. Returns the
/// exit code on failure.
fn write_exchange(output: &Path, document: &mut ExchangeDocument) -> Option<i32> {
    document.regenerate_identifiers();
    let path = output.join("reference_model.xml");
    if let Err(e) = fs::write(&path, document.to_xml()) {
        eprintln!("Error: cannot write '{}': {}", path.display(), e);
        return Some(3);
    }
    None
}

fn print_summary(summary: &serde_json::Value) {
    let json = serde_json::to_string_pretty(summary).unwrap_or_else(|e| {
        format!("{{\"error\": \"failed to serialize summary: {}\"}}", e)
    });
    println!("{}", json);
}
