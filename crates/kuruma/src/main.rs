//! Kuruma command-line interface

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use kuruma::config::CONFIG_FILE_NAME;
use kuruma::tree::TREE_HEADING;
use kuruma::{
    discover_resources, loader, read_resource, render_tree, Config, Diagnostic, ManifestSource,
    Resolver,
};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kuruma")]
#[command(about = "Resource dependency resolver", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the load order of a resource set
    Order {
        #[command(flatten)]
        set: ResourceSetArgs,

        /// Print the full resolution as JSON
        #[arg(long)]
        json: bool,
    },

    /// Draw the dependency tree of a resource set
    Tree {
        #[command(flatten)]
        set: ResourceSetArgs,
    },

    /// Print the properties of a single manifest as JSON
    Inspect {
        /// Manifest file
        file: PathBuf,
    },

    /// List resource directories below a root
    Discover {
        /// Root directory
        #[arg(default_value = ".")]
        root: PathBuf,
    },
}

#[derive(Args)]
struct ResourceSetArgs {
    /// Resource directories; read from the config file when omitted
    dirs: Vec<PathBuf>,

    /// Config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Infer dependencies from `@resource/...` script paths
    #[arg(long)]
    infer_scripts: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Order { set, json } => {
            let (resolver, sources) = load_set(&set)?;
            let resolution = resolver.resolve(&sources)?;
            report(&resolution.diagnostics);

            if json {
                println!("{}", serde_json::to_string_pretty(&resolution)?);
            } else {
                for resource in &resolution.load_order {
                    println!("{}", resource);
                }
            }
        }
        Commands::Tree { set } => {
            let (resolver, sources) = load_set(&set)?;
            let graph = resolver.build_graph(&sources)?;
            report(&graph.load_order().diagnostics);

            println!("{}", TREE_HEADING);
            for line in render_tree(&graph) {
                println!("{}", line);
            }
        }
        Commands::Inspect { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let interpretation = kuruma_manifest::interpret(&text)?;
            report(&interpretation.diagnostics);
            println!("{}", serde_json::to_string_pretty(&interpretation.properties)?);
        }
        Commands::Discover { root } => {
            for dir in discover_resources(&root)? {
                println!("{}", dir.display());
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "kuruma=debug" } else { "kuruma=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the resolver and read the manifests of the selected resource set.
fn load_set(args: &ResourceSetArgs) -> anyhow::Result<(Resolver, Vec<ManifestSource>)> {
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

    let config = if args.config.is_some() {
        Config::from_file(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?
    } else {
        Config::load_or_default(&config_path)?
    };

    let resolver = Resolver::new()
        .with_script_inference(args.infer_scripts || config.resolver.infer_script_dependencies);

    let sources = if args.dirs.is_empty() {
        let base = config_path.parent().unwrap_or_else(|| Path::new("."));
        loader::read_configured_resources(&config, base)?
    } else {
        args.dirs
            .iter()
            .map(|dir| read_resource(dir, None))
            .collect::<Result<Vec<_>, _>>()?
    };

    if sources.is_empty() {
        warn!("No resources selected; pass resource directories or list them in {}", CONFIG_FILE_NAME);
    }
    Ok((resolver, sources))
}

fn report(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        warn!("{}", diagnostic);
    }
}
