//! Komposer - compose projects to an intermediate service model
//!
//! This is the CLI entry point for inspecting translations.

use clap::{Parser, Subcommand, ValueEnum};
use komposer::compose::ProjectParser;
use komposer::error::Result;
use komposer::model::IntermediateModel;
use komposer::translate::{translate_project, unsupported_features, ProcessEnv};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Komposer - translate loaded compose projects
#[derive(Parser)]
#[command(name = "komposer")]
#[command(author = "Evoker Industries")]
#[command(version)]
#[command(about = "Translates loaded compose projects into an intermediate service model", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a project document and print the result
    Convert {
        /// Normalized project document (YAML or JSON)
        file: PathBuf,
        /// Working directory for build contexts (defaults to the document's)
        #[arg(short, long)]
        working_dir: Option<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
        output: OutputFormat,
    },

    /// Report features of a project document that cannot be translated
    Check {
        /// Normalized project document (YAML or JSON)
        file: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One line per service
    Summary,
    /// Full model as JSON
    Json,
}

fn print_summary(model: &IntermediateModel) {
    let mut names: Vec<&String> = model.services.keys().collect();
    names.sort();

    println!(
        "{:<24} {:<32} {:<24} {:>8}",
        "SERVICE", "IMAGE", "PORTS", "REPLICAS"
    );
    for name in names {
        let record = &model.services[name];
        let ports: Vec<String> = record
            .ports
            .iter()
            .map(|p| format!("{}:{}/{}", p.host_port, p.container_port, p.protocol.to_lowercase()))
            .collect();
        println!(
            "{:<24} {:<32} {:<24} {:>8}",
            name,
            record.image,
            ports.join(","),
            record.replicas
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Convert {
            file,
            working_dir,
            output,
        } => {
            let mut project = ProjectParser::parse_file(&file)?;
            if let Some(wd) = working_dir {
                project.working_dir = wd;
            }

            for feature in unsupported_features(Some(&project)) {
                tracing::warn!("Unsupported compose feature: {}", feature);
            }

            let model = translate_project(&project, &ProcessEnv)?;
            tracing::info!("Translated {} services", model.services.len());

            match output {
                OutputFormat::Summary => print_summary(&model),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&model)?),
            }
        }
        Commands::Check { file } => {
            let project = ProjectParser::parse_file(&file)?;
            let features = unsupported_features(Some(&project));

            if features.is_empty() {
                println!("No unsupported features found");
            } else {
                for feature in features {
                    println!("Warning: unsupported feature: {}", feature);
                }
            }
        }
    }

    Ok(())
}
