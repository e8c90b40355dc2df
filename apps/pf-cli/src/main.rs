use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use pf_catalog::Catalog;
use pf_core::NodeId;
use pf_graph::{Graph, NodeKind, node_view};
use pf_project::LoadReport;
use pf_solver::{Evaluator, balanced_value, demand_output, recipe_report};

#[derive(Parser)]
#[command(name = "pf-cli")]
#[command(about = "Prodflow CLI - production chain modeling and balancing", long_about = None)]
struct Cli {
    /// Path to the parts catalog JSON file
    #[arg(long, global = true, default_value = "data/parts.json")]
    parts: PathBuf,
    /// Path to the recipes catalog JSON file
    #[arg(long, global = true, default_value = "data/recipes.json")]
    recipes: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog parts and the recipes that produce them
    Catalog {
        /// Case-insensitive part name filter
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Load a graph document and report what survived
    Validate {
        /// Path to the graph document (.json or .yaml)
        graph_path: PathBuf,
    },
    /// Forward-evaluate every Output node in a graph
    Eval {
        /// Path to the graph document (.json or .yaml)
        graph_path: PathBuf,
    },
    /// Inject a demand at an Output node and propagate it upstream
    Balance {
        /// Path to the graph document (.json or .yaml)
        graph_path: PathBuf,
        /// Id of the Output node to demand from
        node_id: u32,
        /// Demanded rate (units/min)
        demand: f64,
        /// Write the balanced graph back to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

type CliResult<T> = Result<T, CliError>;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Catalog(#[from] pf_catalog::CatalogError),
    #[error(transparent)]
    Project(#[from] pf_project::ProjectError),
    #[error(transparent)]
    Solve(#[from] pf_solver::SolveError),
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let catalog = Catalog::load(&cli.parts, &cli.recipes)?;

    match cli.command {
        Commands::Catalog { query } => cmd_catalog(&catalog, &query),
        Commands::Validate { graph_path } => cmd_validate(&catalog, &graph_path),
        Commands::Eval { graph_path } => cmd_eval(&catalog, &graph_path),
        Commands::Balance {
            graph_path,
            node_id,
            demand,
            output,
        } => cmd_balance(&catalog, &graph_path, node_id, demand, output.as_deref()),
    }
}

fn load_graph(catalog: &Catalog, path: &Path) -> CliResult<(Graph, LoadReport)> {
    let by_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);
    let loaded = if by_ext {
        pf_project::load_yaml(path, catalog)?
    } else {
        pf_project::load_json(path, catalog)?
    };
    Ok(loaded)
}

fn cmd_catalog(catalog: &Catalog, query: &str) -> CliResult<()> {
    let matches = catalog.search_parts(query);
    if matches.is_empty() {
        println!("No parts match '{query}'");
        return Ok(());
    }
    for part_id in matches {
        let part = catalog.part(part_id).expect("search returned valid id");
        println!("{}", part.name);
        for &recipe_id in catalog.producers_of(part_id) {
            let recipe = catalog.recipe(recipe_id).expect("index holds valid ids");
            let inputs: Vec<String> = recipe
                .inputs
                .iter()
                .map(|ing| format!("{} x{}", ing.part, ing.quantity))
                .collect();
            let outputs: Vec<String> = recipe
                .outputs
                .iter()
                .map(|ing| format!("{} x{}", ing.part, ing.quantity))
                .collect();
            println!(
                "  recipe {}: {} -> {}",
                recipe.id,
                inputs.join(", "),
                outputs.join(", ")
            );
        }
    }
    Ok(())
}

fn cmd_validate(catalog: &Catalog, graph_path: &Path) -> CliResult<()> {
    println!("Validating graph: {}", graph_path.display());
    let (graph, report) = load_graph(catalog, graph_path)?;
    println!(
        "Loaded {} nodes, {} links",
        graph.nodes().len(),
        graph.links().len()
    );
    if report.is_clean() {
        println!("✓ Document loaded cleanly");
    } else {
        println!(
            "⚠ Skipped {} node(s), {} link(s)",
            report.skipped_nodes, report.skipped_links
        );
    }
    Ok(())
}

fn cmd_eval(catalog: &Catalog, graph_path: &Path) -> CliResult<()> {
    let (graph, _) = load_graph(catalog, graph_path)?;
    let mut eval = Evaluator::new(catalog);

    for node in graph.nodes() {
        match &node.kind {
            NodeKind::Output(_) => {
                let value = eval.sink_value(&graph, node.id)?;
                println!("output {}: {value}", node.id);
            }
            NodeKind::Recipe(_) => {
                let report = recipe_report(&graph, catalog, node.id)?;
                println!(
                    "recipe {}: limiting ratio {}",
                    node.id, report.limiting_ratio
                );
                for input in &report.inputs {
                    if input.surplus > 0.0 {
                        println!("  surplus {}: {}", input.part, input.surplus);
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn cmd_balance(
    catalog: &Catalog,
    graph_path: &Path,
    node_id: u32,
    demand: f64,
    output: Option<&Path>,
) -> CliResult<()> {
    let (mut graph, _) = load_graph(catalog, graph_path)?;
    let node = NodeId::from_index(node_id);

    demand_output(&mut graph, catalog, node, demand)?;
    println!("Balanced for {demand} units/min at output {node}");

    for n in graph.nodes() {
        if matches!(n.kind, NodeKind::Input(_)) {
            if let Ok(j) = balanced_value(&graph, n.id) {
                let view = node_view(&graph, catalog, n.id).expect("node exists");
                println!("  {} {} must supply {j}", view.title, n.id);
            }
        }
    }

    if let Some(path) = output {
        pf_project::save_json(path, &graph, catalog)?;
        println!("✓ Saved balanced graph to {}", path.display());
    }
    Ok(())
}
