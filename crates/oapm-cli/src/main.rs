use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use dialoguer::Input;
use log::{debug, info};

use oapm_core::config::{self, CONFIG_FILE_NAME, OapmConfig};
use oapm_core::parse;
use oapm_core::transform::{self, TransformOptions};
use oapm_core::{SpecDocument, SpecVersion};

#[derive(Parser)]
#[command(
    name = "oapm",
    about = "Convert OpenAPI 3.0 / Swagger 2.0 documents into Postman collections",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the CSV summary, Postman environment and Postman collection
    Generate {
        /// Path or http(s) URL of the API description (JSON or YAML)
        #[arg(short, long)]
        input: Option<String>,

        /// Project name used in output file names
        #[arg(short, long)]
        name: Option<String>,

        /// Directory under which data-in/ and data-out/ are created
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that a document is a supported version and converts cleanly
    Validate {
        /// Path to the API description
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Show what a document would produce
    Inspect {
        /// Path to the API description
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Write a default .oapm.yaml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            name,
            output,
        } => cmd_generate(input, name, output),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "oapm", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<OapmConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    Ok(config::load_config(&config_path)?)
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Ask on the terminal for a value that was given neither as a flag nor in
/// the config file.
fn prompt(label: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(label)
        .interact_text()
        .with_context(|| format!("failed to read {label}"))
}

/// Create `data-in/` and `data-out/` under `root`.
fn create_data_dirs(root: &Path) -> Result<(PathBuf, PathBuf)> {
    let data_in = root.join("data-in");
    let data_out = root.join("data-out");
    for dir in [&data_in, &data_out] {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }
    eprintln!("Using {} and {}", data_in.display(), data_out.display());
    Ok((data_in, data_out))
}

/// Fetch a remote document and keep a copy of the bytes on disk.
fn download(url: &str, dest: &Path) -> Result<String> {
    info!("downloading {url}");
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("failed to download {url}"))?;
    let body = response
        .text()
        .with_context(|| format!("failed to read response from {url}"))?;
    fs::write(dest, &body).with_context(|| format!("failed to write {}", dest.display()))?;
    eprintln!("  downloaded {url} → {}", dest.display());
    Ok(body)
}

fn parse_file(path: &Path) -> Result<SpecDocument> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");
    let doc = match ext {
        "json" => parse::from_json(&content)?,
        _ => parse::from_yaml(&content)?,
    };
    Ok(doc)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    eprintln!("  wrote {}", path.display());
    Ok(())
}

fn write_summary(doc: &SpecDocument, options: &TransformOptions, path: &Path) -> Result<()> {
    let csv = transform::summarize(doc, options).to_csv()?;
    fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))?;
    eprintln!("  wrote {}", path.display());
    Ok(())
}

fn cmd_generate(
    input: Option<String>,
    name: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();

    let name = match name.or_else(|| cfg.name.clone()) {
        Some(name) => name,
        None => prompt("Project name")?,
    };
    let input = match input.or_else(|| cfg.input.clone()) {
        Some(input) => input,
        None => prompt("URL or path of the API description")?,
    };
    let root = output.unwrap_or_else(|| PathBuf::from(&cfg.output));
    let (data_in, data_out) = create_data_dirs(&root)?;

    let (doc, source_url) = if is_url(&input) {
        let dest = data_in.join(format!("swagger_{name}.json"));
        let content = download(&input, &dest)?;
        (parse::from_str_auto(&content)?, Some(input.as_str()))
    } else {
        (parse_file(Path::new(&input))?, None)
    };
    eprintln!(
        "Detected {} document with {} operation(s)",
        doc.version.label(),
        doc.operation_count()
    );

    let options = cfg.transform_options(&name, source_url);
    let mut failures: Vec<anyhow::Error> = Vec::new();

    // Each artifact stage runs even when another one failed.
    if let Err(e) = write_summary(&doc, &options, &data_out.join(format!("output_{name}.csv"))) {
        failures.push(e.context("summary"));
    }

    let env = transform::build_environment(&doc, &options);
    if let Err(e) = write_json(&data_out.join(format!("{name}_environment.json")), &env) {
        failures.push(e.context("environment"));
    }

    let collection = transform::build_collection(&doc, &options)
        .map_err(anyhow::Error::new)
        .and_then(|c| write_json(&data_out.join(format!("collection_{name}.json")), &c));
    if let Err(e) = collection {
        failures.push(e.context("collection"));
    }

    for failure in &failures {
        eprintln!("error: {failure:#}");
    }
    if !failures.is_empty() {
        anyhow::bail!("{} artifact stage(s) failed", failures.len());
    }

    eprintln!("Collection written to {}", data_out.display());
    Ok(())
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let doc = parse_file(&input)?;

    eprintln!(
        "Valid {} document: {}",
        match doc.version {
            SpecVersion::Swagger2 => "Swagger 2.0",
            _ => "OpenAPI 3.0",
        },
        doc.info.title.as_deref().unwrap_or("(untitled)")
    );
    eprintln!("  Version: {}", doc.info.version.as_deref().unwrap_or("-"));
    eprintln!("  Paths: {}", doc.paths.len());
    eprintln!("  Operations: {}", doc.operation_count());

    // Also check that every request body resolves
    let options = TransformOptions::new("validate");
    let env = transform::build_environment(&doc, &options);
    let collection = transform::build_collection(&doc, &options)?;
    eprintln!("  Requests: {}", collection.requests().count());
    eprintln!("  Tag folders: {}", collection.folders().count());
    eprintln!("  Environment variables: {}", env.values.len());

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(input: PathBuf, format: InspectFormat) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let doc = parse_file(&input)?;
    let options = cfg.transform_options("inspect", None);
    let artifacts = transform::transform_with_options(&doc, &options)?;
    debug!("inspected {}", input.display());

    let summary = serde_json::json!({
        "version": doc.version,
        "info": {
            "title": doc.info.title,
            "version": doc.info.version,
        },
        "paths": doc.paths.len(),
        "operations": doc.operation_count(),
        "folders": artifacts
            .collection
            .folders()
            .map(|f| serde_json::json!({ "name": f.name, "requests": f.item.len() }))
            .collect::<Vec<_>>(),
        "environment": artifacts.environment.keys().collect::<Vec<_>>(),
        "summary": artifacts.summary.rows,
    });

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
