use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mango_mdconverter::config::{Config, CONFIG_FILE_NAME};
use mango_mdconverter::convert::MetadataConverter;
use mango_mdconverter::filter::{filter_metadata_dict, parse_filter_expression};
use mango_mdconverter::loader::load_triples_from_file;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mango-mdconvert")]
#[command(about = "Convert flat namespaced metadata into nested mango documents", long_about = None)]
struct Cli {
    /// Configuration file (default: mango.toml next to the input, if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert exported metadata triples into a nested document
    Convert {
        /// Triples file (.json or .toml)
        input: PathBuf,

        /// Filter: JSON spec or comma-separated dotted paths (e.g. "schema.book,mg")
        #[arg(short, long)]
        filter: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show the intermediate tree before unit grouping
    Raw {
        /// Triples file (.json or .toml)
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Filter an already converted document
    Filter {
        /// Converted document (.json)
        document: PathBuf,

        /// Filter: JSON spec or comma-separated dotted paths
        #[arg(short, long)]
        filter: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert {
            input,
            filter,
            output,
            compact,
        } => {
            let config = load_config(cli.config.as_deref(), &input)?;
            convert_file(&input, filter.as_deref(), output.as_deref(), compact, &config)
        }
        Commands::Raw { input, output } => {
            let config = load_config(cli.config.as_deref(), &input)?;
            dump_raw_tree(&input, output.as_deref(), &config)
        }
        Commands::Filter {
            document,
            filter,
            output,
            compact,
        } => {
            let config = load_config(cli.config.as_deref(), &document)?;
            filter_file(&document, &filter, output.as_deref(), compact, &config)
        }
    }
}

fn load_config(explicit: Option<&Path>, input: &Path) -> Result<Config> {
    if let Some(path) = explicit {
        return Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    let candidate = input
        .parent()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file());

    match candidate {
        Some(path) => {
            log::info!("Using config {}", path.display());
            Config::load_from_file(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))
        }
        None => Ok(Config::empty()),
    }
}

fn convert_file(
    input: &Path,
    filter: Option<&str>,
    output: Option<&Path>,
    compact: bool,
    config: &Config,
) -> Result<()> {
    let triples = load_triples_from_file(input)
        .with_context(|| format!("Failed to load metadata from {}", input.display()))?;

    let converter = MetadataConverter::new(config.conversion.clone());
    let document = converter.convert(&triples)?;

    let spec = match filter {
        Some(expr) => parse_filter_expression(expr)?,
        None => config.filter.spec.clone(),
    };
    let document = filter_metadata_dict(&document, &spec);

    write_document(&document, output, config.output.pretty && !compact)
}

fn dump_raw_tree(input: &Path, output: Option<&Path>, config: &Config) -> Result<()> {
    let triples = load_triples_from_file(input)
        .with_context(|| format!("Failed to load metadata from {}", input.display()))?;

    let converter = MetadataConverter::new(config.conversion.clone());
    let tree = converter.build_raw_tree(&triples)?;

    write_document(&tree.to_json(), output, config.output.pretty)
}

fn filter_file(
    document: &Path,
    filter: &str,
    output: Option<&Path>,
    compact: bool,
    config: &Config,
) -> Result<()> {
    let content = std::fs::read_to_string(document)
        .with_context(|| format!("Failed to read {}", document.display()))?;
    let document: JsonValue = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", document.display()))?;

    let spec = parse_filter_expression(filter)?;
    let filtered = filter_metadata_dict(&document, &spec);

    write_document(&filtered, output, config.output.pretty && !compact)
}

fn write_document(document: &JsonValue, output: Option<&Path>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };

    if let Some(output_path) = output {
        std::fs::write(output_path, json)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        eprintln!("Document written to {}", output_path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}
