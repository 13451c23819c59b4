use clap::{Parser, Subcommand};
use itertools::Itertools;
use nodeflow::prelude::*;
use std::fs;

/// Inspect, normalize and merge node-flow diagram documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional editor config JSON applied to every loaded diagram
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print counts, skipped entries and the integrity check of a document
    Inspect {
        /// Path to the diagram JSON file
        path: String,
    },
    /// Load a document and write it back, dropping everything that failed to load
    Normalize {
        path: String,
        /// Output path; stdout if omitted
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Append the nodes of `other` to `base`; templates of `other` win on clashes
    Merge {
        base: String,
        other: String,
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Check whether an output type may feed an input type under a compatibility table
    Compat {
        /// Path to the compatibility table JSON file
        table: String,
        source: String,
        destination: String,
    },
}

fn main() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EditorConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => EditorConfig::default(),
    };

    match cli.command {
        Command::Inspect { path } => run_inspect(config, &path),
        Command::Normalize { path, output } => {
            let diagram = load(config, &path);
            write_output(&diagram, output.as_deref());
        }
        Command::Merge {
            base,
            other,
            output,
        } => {
            let mut diagram = load(config, &base);
            let report = codec::load_file(&mut diagram, &other, false)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to merge '{}': {}", other, e)));
            tracing::info!(%report, "merged '{}'", other);
            write_output(&diagram, output.as_deref());
        }
        Command::Compat {
            table,
            source,
            destination,
        } => {
            let content = fs::read_to_string(&table)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", table, e)));
            let table = CompatibilityTable::from_json(&content)
                .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            let verdict = table.are_compatible(&source, &destination);
            println!("{} -> {}: {}", source, destination, verdict);
            if !verdict {
                std::process::exit(2);
            }
        }
    }
}

fn load(config: EditorConfig, path: &str) -> Diagram {
    let mut diagram = Diagram::builder().with_config(config).build();
    let report = codec::load_file(&mut diagram, path, true)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load '{}': {}", path, e)));
    tracing::info!(%report, "loaded '{}'", path);
    diagram
}

fn run_inspect(config: EditorConfig, path: &str) {
    let diagram = load(config, path);

    println!("--- {} ---", path);
    println!("Templates: {}", diagram.templates().len());
    for (name, template) in diagram.templates().iter() {
        let instances = diagram
            .nodes()
            .filter(|n| n.template_name() == name)
            .count();
        println!(
            "  {:<24} {:>3} in / {:>3} out / {:>3} params, {} node(s)",
            name,
            template.inputs.occupied(),
            template.outputs.occupied(),
            template.parameters.occupied(),
            instances
        );
    }
    println!("Nodes: {}", diagram.node_count());
    println!("Edges: {}", diagram.edge_count());

    let types = diagram
        .edges()
        .filter_map(|(_, edge)| {
            let source = diagram.terminal_type(edge.source_terminal()).ok()?;
            let target = diagram.terminal_type(edge.target_terminal()).ok()?;
            Some(format!("{} -> {}", source, target))
        })
        .counts();
    for (pair, count) in types.into_iter().sorted() {
        println!("  {:<32} x{}", pair, count);
    }

    match diagram.verify_integrity() {
        Ok(()) => println!("Integrity: ok"),
        Err(e) => exit_with_error(&format!("Integrity check failed: {}", e)),
    }
}

fn write_output(diagram: &Diagram, output: Option<&str>) {
    match output {
        Some(path) => {
            codec::save_file(diagram, path)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to write '{}': {}", path, e)));
            println!("Wrote {} nodes and {} edges to '{}'", diagram.node_count(), diagram.edge_count(), path);
        }
        None => {
            let json = diagram
                .to_json()
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize diagram: {}", e)));
            println!("{}", json);
        }
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
