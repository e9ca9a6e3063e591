use clap::Parser;
use keiro::api::{
    EdgeDto, GraphDto, GraphEnvelope, NodeDataDto, NodeDto, PositionDto, SlaValue, SlasDto,
    StepWeightDto, WeightDataDto, WireId, WorkflowDto,
};
use keiro::sla::SlaDuration;
use rand::Rng;
use rand::rngs::ThreadRng;
use std::fs;

const ROLES: [&str; 5] = ["Requester", "Reviewer", "Approver", "Finance", "Auditor"];

/// A CLI tool to generate random workflow graphs and weight data
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated graph JSON file to
    #[arg(short, long, default_value = "generated_graph.json")]
    output: String,

    /// The path to write the matching weight data JSON file to
    #[arg(short, long, default_value = "generated_weights.json")]
    weights: String,

    /// The number of steps, start and end included
    #[arg(long, default_value_t = 8)]
    steps: usize,

    /// Write handles with legacy side names instead of canonical IDs
    #[arg(long)]
    legacy: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.steps < 2 {
        eprintln!("Error: --steps ({}) must be at least 2", cli.steps);
        std::process::exit(1);
    }

    println!("Generating a workflow with {} steps...", cli.steps);

    let workflow = generate_workflow(&mut rng);
    let nodes = generate_nodes(&mut rng, cli.steps);
    let edges = generate_edges(&mut rng, cli.steps, cli.legacy);
    println!(
        "-> Generated {} node(s) and {} edge(s).",
        nodes.len(),
        edges.len()
    );

    let weights = WeightDataDto {
        workflow_name: workflow.name.clone(),
        slas: SlasDto {
            urgent_sla: workflow.urgent_sla.clone(),
            high_sla: workflow.high_sla.clone(),
            medium_sla: workflow.medium_sla.clone(),
            low_sla: workflow.low_sla.clone(),
        },
        steps: nodes
            .iter()
            .enumerate()
            .map(|(i, node)| StepWeightDto {
                step_id: node.id.clone(),
                name: node.data.name.clone().unwrap_or_default(),
                role_name: node.data.role.clone(),
                order: Some(i as u32),
                // Weights move in 0.1 steps between 0.1 and 1.0.
                weight: Some(rng.random_range(1..=10) as f64 / 10.0),
            })
            .collect(),
    };

    let envelope = GraphEnvelope {
        workflow,
        graph: GraphDto { nodes, edges },
    };

    fs::write(&cli.output, serde_json::to_string_pretty(&envelope)?)?;
    fs::write(&cli.weights, serde_json::to_string_pretty(&weights)?)?;

    println!(
        "Successfully generated '{}' and '{}'",
        cli.output, cli.weights
    );

    Ok(())
}

/// Tier durations grow strictly from urgent to low.
fn generate_workflow(rng: &mut ThreadRng) -> WorkflowDto {
    let urgent_hours = rng.random_range(1..=8);
    let high_hours = urgent_hours + rng.random_range(4..=24);
    let medium_hours = high_hours + rng.random_range(24..=72);
    let low_hours = medium_hours + rng.random_range(72..=240);
    let sla = |hours: u64| {
        Some(SlaValue::Text(
            SlaDuration::from_parts(0, hours, 0).to_duration_string(),
        ))
    };

    WorkflowDto {
        id: Some(1),
        name: format!("Generated workflow {}", rng.random_range(100..1000)),
        description: Some("Randomly generated for manual testing".to_string()),
        urgent_sla: sla(urgent_hours),
        high_sla: sla(high_hours),
        medium_sla: sla(medium_hours),
        low_sla: sla(low_hours),
        ..WorkflowDto::default()
    }
}

fn generate_nodes(rng: &mut ThreadRng, count: usize) -> Vec<NodeDto> {
    (0..count)
        .map(|i| NodeDto {
            id: WireId::Number(i as u64 + 1),
            node_type: Some("step".to_string()),
            position: Some(PositionDto {
                x: rng.random_range(-40.0..40.0),
                y: i as f64 * 140.0,
            }),
            data: NodeDataDto {
                name: Some(format!("Step {}", i + 1)),
                role: Some(ROLES[rng.random_range(0..ROLES.len())].to_string()),
                is_start: Some(i == 0),
                is_end: Some(i + 1 == count),
                ..NodeDataDto::default()
            },
            to_delete: false,
        })
        .collect()
}

/// A straight chain, plus a few return paths from later steps back to earlier ones.
fn generate_edges(rng: &mut ThreadRng, count: usize, legacy: bool) -> Vec<EdgeDto> {
    let handle = |canonical: &str, legacy_name: &str| {
        Some(if legacy { legacy_name } else { canonical }.to_string())
    };
    let mut edges: Vec<EdgeDto> = (1..count)
        .map(|i| EdgeDto {
            id: Some(WireId::Number(100 + i as u64)),
            source: WireId::Number(i as u64),
            target: WireId::Number(i as u64 + 1),
            source_handle: handle("out-B", "bottom"),
            target_handle: handle("in-T", "top"),
            label: None,
            name: Some("Approve".to_string()),
            to_delete: false,
        })
        .collect();

    // Regular steps sit between the start (1) and end (count).
    for i in 3..count {
        if rng.random_bool(0.3) {
            let target = rng.random_range(2..i) as u64;
            edges.push(EdgeDto {
                id: Some(WireId::Number(200 + i as u64)),
                source: WireId::Number(i as u64),
                target: WireId::Number(target),
                source_handle: handle("out-L", "left"),
                target_handle: handle("in-R", "right"),
                label: None,
                name: Some("Reject".to_string()),
                to_delete: false,
            });
        }
    }
    edges
}
