use clap::{Parser, Subcommand, ValueEnum};
use keiro::api::WeightDataDto;
use keiro::prelude::*;
use keiro::workflow::{adapt_weight_data, export_graph};
use std::fs;
use std::time::Instant;

/// Define a CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PriorityCli {
    Urgent,
    High,
    Medium,
    Low,
}

impl From<PriorityCli> for Priority {
    fn from(p: PriorityCli) -> Self {
        match p {
            PriorityCli::Urgent => Priority::Urgent,
            PriorityCli::High => Priority::High,
            PriorityCli::Medium => Priority::Medium,
            PriorityCli::Low => Priority::Low,
        }
    }
}

/// Workflow graph validation and SLA distribution tool
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Optional editor configuration JSON file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report structural issues in a saved workflow graph
    Validate {
        /// Path to the workflow graph JSON file
        graph_path: String,
        /// Treat unknown handle names as errors
        #[arg(long)]
        strict: bool,
    },
    /// Show how each SLA tier divides across steps
    Sla {
        /// Path to the weight data JSON file
        weights_path: String,
        /// Only show one tier
        #[arg(short, long, value_enum)]
        priority: Option<PriorityCli>,
    },
    /// Rewrite a saved graph with canonical handle IDs and field names
    Normalize {
        /// Path to the workflow graph JSON file
        graph_path: String,
        /// Where to write the result (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    let config = match &cli.config {
        Some(path) => EditorConfig::from_file(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to load config '{}': {}", path, e))
        }),
        None => EditorConfig::default(),
    };

    match cli.command {
        Command::Validate { graph_path, strict } => {
            let policy = if strict {
                HandlePolicy::Strict
            } else {
                config.handle_policy
            };
            run_validate(&graph_path, policy);
        }
        Command::Sla {
            weights_path,
            priority,
        } => run_sla(&weights_path, priority.map(Priority::from)),
        Command::Normalize { graph_path, output } => {
            run_normalize(&graph_path, output.as_deref(), config.handle_policy)
        }
    }
}

fn load_workflow(graph_path: &str, policy: HandlePolicy) -> LoadedWorkflow {
    let json = fs::read_to_string(graph_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read graph file '{}': {}",
            graph_path, e
        ))
    });
    let envelope: GraphEnvelope = serde_json::from_str(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse graph JSON: {}", e)));
    envelope
        .into_workflow(policy)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert graph: {}", e)))
}

fn run_validate(graph_path: &str, policy: HandlePolicy) {
    let start = Instant::now();
    let workflow = load_workflow(graph_path, policy);
    let issues = workflow.graph.validate();
    let duration = start.elapsed();

    println!("Workflow: {}", workflow.details.name);
    println!(
        "Steps: {} live / {} total",
        workflow.graph.live_steps().count(),
        workflow.graph.steps().len()
    );
    println!(
        "Transitions: {} live / {} total ({} return path(s))",
        workflow.graph.live_transitions().count(),
        workflow.graph.transitions().len(),
        workflow
            .graph
            .live_transitions()
            .filter(|t| t.is_return())
            .count()
    );
    if let Err(WorkflowError::Invalid(errors)) = workflow.details.validate() {
        println!("\n--- Details ---");
        for error in errors {
            println!("- {}", error);
        }
    }
    println!("\n--- Graph ---");
    println!("{}", ReportFormatter::format_issues(&issues));
    println!("\nValidated in {:?}", duration);
}

fn run_sla(weights_path: &str, priority: Option<Priority>) {
    let json = fs::read_to_string(weights_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read weights file '{}': {}",
            weights_path, e
        ))
    });
    let data: WeightDataDto = serde_json::from_str(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse weights JSON: {}", e)));
    let (name, distributor) = adapt_weight_data(data)
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid weight data: {}", e)));

    println!("Workflow: {}", name);
    println!("Total weight: {:.2}\n", distributor.total_weight());

    match priority {
        Some(priority) => {
            println!(
                "{} SLA: {}",
                priority,
                format_duration(distributor.slas().get(priority).as_seconds() as f64)
            );
            for step in distributor.steps() {
                let allocation = distributor
                    .allocation(&step.step_id, priority)
                    .unwrap_or(Allocation::NotAvailable);
                println!("  {:<24} {}", step.name, allocation);
            }
        }
        None => println!("{}", ReportFormatter::format_allocations(&distributor)),
    }
}

fn run_normalize(graph_path: &str, output: Option<&str>, policy: HandlePolicy) {
    let workflow = load_workflow(graph_path, policy);
    let envelope = export_graph(workflow.id, &workflow.details, &workflow.graph);
    let json = serde_json::to_string_pretty(&envelope)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize graph: {}", e)));

    match output {
        Some(path) => {
            fs::write(path, json).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write '{}': {}", path, e))
            });
            println!("Normalized graph written to '{}'", path);
        }
        None => println!("{}", json),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
