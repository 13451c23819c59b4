use clap::Parser;
use nodeflow::prelude::*;
use rand::Rng;
use rand::rngs::ThreadRng;

const TYPES: [&str; 4] = ["number", "string", "boolean", "any"];

/// A CLI tool to generate random diagram documents for stress-testing import
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_diagram.json")]
    output: String,

    /// Number of templates to define
    #[arg(long, default_value_t = 6)]
    templates: usize,

    /// Number of nodes to place
    #[arg(long, default_value_t = 50)]
    nodes: usize,

    /// Number of link attempts; incompatible picks are dropped
    #[arg(long, default_value_t = 120)]
    links: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.templates == 0 && cli.nodes > 0 {
        eprintln!("Error: cannot place nodes without at least one template");
        std::process::exit(1);
    }

    println!(
        "Generating diagram ({} templates, {} nodes, {} link attempts)...",
        cli.templates, cli.nodes, cli.links
    );

    let mut diagram = Diagram::builder()
        .with_compatibility(CompatibilityTable::new().allow("any", TYPES))
        .build();
    let names: Vec<String> = (0..cli.templates)
        .map(|i| {
            let name = format!("Generated_{}", i);
            diagram.add_template(&name, generate_template(&mut rng))?;
            Ok(name)
        })
        .collect::<std::result::Result<_, GraphError>>()?;
    println!("-> Generated {} templates.", names.len());

    let mut nodes = Vec::with_capacity(cli.nodes);
    for _ in 0..cli.nodes {
        let name = &names[rng.random_range(0..names.len())];
        let position = Point::new(rng.random_range(-2000.0..2000.0), rng.random_range(-2000.0..2000.0));
        nodes.push(diagram.create_node(name, position)?);
    }
    println!("-> Placed {} nodes.", nodes.len());

    if nodes.len() > 1 {
        for _ in 0..cli.links {
            let source = nodes[rng.random_range(0..nodes.len())];
            let target = nodes[rng.random_range(0..nodes.len())];
            if source == target {
                continue;
            }
            let output = pick_slot(&mut rng, diagram.template_of(source).map(|t| t.outputs.len()));
            let input = pick_slot(&mut rng, diagram.template_of(target).map(|t| t.inputs.len()));
            if let (Some(output), Some(input)) = (output, input) {
                let _ = diagram.link_nodes(source, output, target, input);
            }
        }
    }
    println!("-> Linked {} edges.", diagram.edge_count());

    codec::save_file(&diagram, &cli.output)?;
    println!(
        "Successfully generated and saved diagram to '{}'",
        cli.output
    );

    Ok(())
}

/// A template with a few terminals (some slots left empty) and parameters.
fn generate_template(rng: &mut ThreadRng) -> Template {
    let mut template = Template::new(rng.random_range(120.0..260.0), rng.random_range(60.0..200.0));
    for side in [Side::Input, Side::Output] {
        let slots = rng.random_range(0..5);
        for index in 0..slots {
            if rng.random_bool(0.8) {
                let data_type = TYPES[rng.random_range(0..TYPES.len())];
                let label = format!("{}{}", side, index);
                template.terminals_mut(side).set(index, Terminal::new(label, data_type));
            }
        }
    }
    for index in 0..rng.random_range(0..3) {
        let kind = match rng.random_range(0..4) {
            0 => ParameterKind::Boolean {
                default: Some(rng.random_bool(0.5)),
            },
            1 => ParameterKind::Dropdown {
                options: vec!["low".into(), "mid".into(), "high".into()],
                default: None,
            },
            2 => ParameterKind::StringField {
                default: Some(String::new()),
            },
            _ => ParameterKind::NumField {
                default: Some(0.0),
                min: Some(-1.0),
                max: Some(1.0),
                step: Some(0.1),
            },
        };
        template
            .parameters
            .set(index, Parameter::new(format!("param{}", index), kind).with_tooltip("Generated"));
    }
    template
}

fn pick_slot(rng: &mut ThreadRng, slots: Option<usize>) -> Option<usize> {
    match slots {
        Some(len) if len > 0 => Some(rng.random_range(0..len)),
        _ => None,
    }
}
