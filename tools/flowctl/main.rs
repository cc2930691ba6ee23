use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use truora_flow::client::{API_KEY_ENV, API_SERVER_ENV, DEFAULT_API_SERVER};
use truora_flow::prelude::*;
use truora_flow::reconcile::{lookup_flow, render_document};

/// Manage Truora identity verification flows from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// API key sent in the Truora-Api-Key header
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of the Truora API
    #[arg(long, env = API_SERVER_ENV, default_value = DEFAULT_API_SERVER)]
    api_server: String,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Treat non-success responses on read as errors
    #[arg(long)]
    strict_reads: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a flow and all of its attributes
    Get { flow_id: String },
    /// Create a flow from a JSON document file ("-" reads stdin)
    Create { document_path: String },
    /// Replace a flow's definition with a JSON document file ("-" reads stdin)
    Update {
        flow_id: String,
        document_path: String,
    },
    /// Delete a flow
    Delete { flow_id: String },
    /// Render a JSON attribute tree into a flow document, without contacting the API
    Render { attributes_path: String },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Command::Render { attributes_path } = &cli.command {
        let raw: serde_json::Value = serde_json::from_str(&read_input(attributes_path)?)?;
        let attributes = TreeValue::from_json(&raw).ok_or("Attribute file is null")?;
        let rendered = render_document(&attributes)?;
        eprintln!("Rendered flow '{}'", rendered.id);
        println!("{}", rendered.json);
        return Ok(());
    }

    let client = build_client(&cli)?;

    match cli.command {
        Command::Get { flow_id } => {
            let lookup = lookup_flow(&client, &flow_id)?;
            println!("{}", serde_json::to_string_pretty(&lookup.attributes.to_json())?);
        }
        Command::Create { document_path } => {
            let declaration = Declaration::from_document(read_input(&document_path)?);
            let mut resource = FlowResource::new();
            resource.create(&client, &declaration)?;
            print_state(&resource)?;
        }
        Command::Update {
            flow_id,
            document_path,
        } => {
            let declaration = Declaration::from_document(read_input(&document_path)?);
            let mut resource = FlowResource::import(&client, &flow_id)?;
            resource.update(&client, &declaration)?;
            print_state(&resource)?;
        }
        Command::Delete { flow_id } => {
            client.delete(&flow_id)?;
            eprintln!("Deleted flow '{}'", flow_id);
        }
        Command::Render { .. } => {}
    }

    Ok(())
}

fn build_client(cli: &Cli) -> Result<FlowClient> {
    let mut config = ClientConfig::new(cli.api_key.clone().unwrap_or_default(), &cli.api_server)
        .with_strict_reads(cli.strict_reads);
    if let Some(seconds) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(seconds));
    }
    Ok(FlowClient::from_config(config)?)
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    fs::read_to_string(path).map_err(|e| format!("Could not read '{}': {}", path, e).into())
}

fn print_state(resource: &FlowResource) -> Result<()> {
    let state = TreeValue::Map(resource.state().clone()).to_json();
    println!("{}", serde_json::to_string_pretty(&state)?);
    if let Some(flow_id) = resource.id() {
        eprintln!("Flow id: {}", flow_id);
    }
    Ok(())
}
