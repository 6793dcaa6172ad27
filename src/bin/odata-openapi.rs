//! OData OpenAPI CLI
//!
//! Command-line interface for converting annotated EDM models to OpenAPI
//! documents.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use odata_openapi::{check_model, convert, load_model, ConvertSettings, OpenApiVersion};

#[derive(Parser)]
#[command(name = "odata-openapi")]
#[command(about = "Convert annotated EDM models to OpenAPI documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a model file to an OpenAPI document
    Convert {
        /// Model file (JSON)
        model: PathBuf,

        /// Service root URL, written into the document's server section
        #[arg(long, default_value = "http://localhost")]
        service_root: String,

        /// Target OpenAPI version: 2.0, 3.0, or 3.1
        #[arg(long, default_value = "3.0")]
        openapi_version: OpenApiVersion,

        /// Render entity keys as path segments instead of parentheses
        #[arg(long)]
        key_as_segment: bool,

        /// Maximum navigation property traversal depth
        #[arg(long, default_value_t = 5)]
        nav_depth: u32,

        /// Count key segments against the navigation depth budget
        #[arg(long)]
        count_key_segment_as_depth: bool,

        /// Skip navigation property paths entirely
        #[arg(long)]
        no_navigation_paths: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Check that a model file loads and converts cleanly
    Check {
        /// Model file (JSON)
        model: PathBuf,

        /// Output result as JSON (for automation)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            model,
            service_root,
            openapi_version,
            key_as_segment,
            nav_depth,
            count_key_segment_as_depth,
            no_navigation_paths,
            output,
            pretty,
        } => run_convert(ConvertArgs {
            model,
            service_root,
            openapi_version,
            key_as_segment,
            nav_depth,
            count_key_segment_as_depth,
            no_navigation_paths,
            output,
            pretty,
        }),

        Commands::Check { model, json } => run_check(&model, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

struct ConvertArgs {
    model: PathBuf,
    service_root: String,
    openapi_version: OpenApiVersion,
    key_as_segment: bool,
    nav_depth: u32,
    count_key_segment_as_depth: bool,
    no_navigation_paths: bool,
    output: Option<PathBuf>,
    pretty: bool,
}

fn run_convert(args: ConvertArgs) -> Result<(), u8> {
    let model = load_model(&args.model).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let settings = ConvertSettings::new()
        .service_root(args.service_root)
        .open_api_version(args.openapi_version)
        .key_as_segment(args.key_as_segment)
        .navigation_property_depth(args.nav_depth)
        .count_key_segment_as_depth(args.count_key_segment_as_depth)
        .enable_navigation_property_path(!args.no_navigation_paths);

    let document = convert(&model, &settings).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let json_output = if args.pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_check(model_path: &PathBuf, json_output: bool) -> Result<(), u8> {
    let model = load_model(model_path).map_err(|e| {
        report_error(json_output, &e.to_string());
        e.exit_code() as u8
    })?;

    let report = check_model(&model);

    if json_output {
        let output = serde_json::json!({
            "valid": report.is_ok(),
            "elements_checked": report.elements_checked,
            "findings": report.findings,
        });
        println!("{}", output);
    } else if report.is_ok() {
        println!("Valid: {} elements checked", report.elements_checked);
    } else {
        eprintln!("Check failed:");
        for finding in &report.findings {
            match &finding.term {
                Some(term) => eprintln!("  {} [{}]: {}", finding.element, term, finding.message),
                None => eprintln!("  {}: {}", finding.element, finding.message),
            }
        }
    }

    if report.is_ok() {
        Ok(())
    } else {
        Err(1)
    }
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!(
            r#"{{"valid":false,"error":{}}}"#,
            serde_json::Value::String(msg.to_string())
        );
    } else {
        eprintln!("Error: {}", msg);
    }
}
