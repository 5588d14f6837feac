use camino::Utf8PathBuf;
use facet::Facet;
use facet_args as args;
use owo_colors::OwoColorize;
use tablescope::{DiscriminatorRule, MemoryCatalog, TableModelBuilder};
use tablescope_config::{ConfigError, LoadedConfig};
use tracing_subscriber::EnvFilter;

mod render;

/// Inspect table models: columns, references and choices.
#[derive(Facet, Debug)]
struct Cli {
    /// Show version information
    #[facet(args::named, args::short = 'V')]
    version: bool,

    /// Command to run
    #[facet(default, args::subcommand)]
    command: Option<Commands>,
}

/// Available commands
#[derive(Facet, Debug)]
#[repr(u8)]
enum Commands {
    /// Describe the columns of a table
    Describe {
        /// Table name (e.g., "incident")
        #[facet(args::positional)]
        table: String,

        /// Path to a JSON catalog (defaults to `catalog.path` from the config)
        #[facet(default, args::named)]
        catalog: Option<String>,

        /// Print the model as JSON
        #[facet(default, args::named)]
        json: bool,
    },
    /// List the tables of a catalog
    Tables {
        /// Path to a JSON catalog (defaults to `catalog.path` from the config)
        #[facet(default, args::named)]
        catalog: Option<String>,
    },
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args_ref: Vec<&str> = args.iter().map(|s| s.as_str()).collect();

    let result: Result<Cli, _> = args::from_slice(&args_ref);

    match result {
        Ok(cli) => {
            if let Err(message) = run(cli) {
                eprintln!("{} {}", "error:".red().bold(), message);
                std::process::exit(1);
            }
        }
        Err(err) if err.is_help_request() => {
            print!("{}", err.help_text().unwrap_or(""));
        }
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tablescope=info"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> Result<(), String> {
    if cli.version {
        println!("tablescope {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    match cli.command {
        Some(Commands::Describe {
            table,
            catalog,
            json,
        }) => {
            let config = load_config()?;
            let catalog = load_catalog(catalog, config.as_ref())?;
            let mut builder = TableModelBuilder::new(&catalog);
            if let Some(rule) = discriminator_rule(config.as_ref().map(|c| &c.config)) {
                builder = builder.discriminator(rule);
            }

            let model = builder.build(Some(&table)).map_err(|e| e.to_string())?;
            if json {
                println!("{}", model.to_json_pretty());
            } else {
                print!("{}", render::render_model(&table, &model));
            }
            Ok(())
        }
        Some(Commands::Tables { catalog }) => {
            let config = load_config()?;
            let catalog = load_catalog(catalog, config.as_ref())?;

            for table in catalog.tables() {
                match &table.extends {
                    Some(parent) => println!(
                        "{} {}",
                        table.name,
                        format!("({}, extends {})", table.label, parent).dimmed()
                    ),
                    None => println!("{} {}", table.name, format!("({})", table.label).dimmed()),
                }
            }
            Ok(())
        }
        None => {
            let config = args::HelpConfig {
                program_name: Some("tablescope".to_string()),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
                ..Default::default()
            };
            print!("{}", args::generate_help::<Cli>(&config));
            Ok(())
        }
    }
}

/// Load `.config/tablescope.styx` if there is one.
fn load_config() -> Result<Option<LoadedConfig>, String> {
    match tablescope_config::load() {
        Ok(loaded) => {
            tracing::debug!(root = %loaded.root, "loaded config");
            Ok(Some(loaded))
        }
        Err(ConfigError::NotFound) => Ok(None),
        Err(e) => Err(e.to_string()),
    }
}

fn load_catalog(
    flag: Option<String>,
    config: Option<&LoadedConfig>,
) -> Result<MemoryCatalog, String> {
    let path = flag
        .map(Utf8PathBuf::from)
        .or_else(|| config.and_then(LoadedConfig::catalog_path))
        .ok_or_else(|| "no catalog given: pass --catalog or set catalog.path".to_string())?;

    let content = std::fs::read_to_string(&path)
        .map_err(|e| format!("failed to read {}: {}", path, e))?;
    let mut catalog =
        MemoryCatalog::from_json(&content).map_err(|e| format!("{}: {}", path, e))?;

    if let Some(column) = config.and_then(|c| c.config.introspect.discriminator_column.clone()) {
        catalog = catalog.with_class_column(column);
    }

    eprintln!(
        "{} {} ({} tables)",
        "Loaded".green(),
        path,
        catalog.tables().count()
    );
    Ok(catalog)
}

/// Type-based matching from the config. Name-based matching needs no rule:
/// the catalog's class column is the builder's default.
fn discriminator_rule(config: Option<&tablescope_config::Config>) -> Option<DiscriminatorRule> {
    let tag = config?.introspect.discriminator_type.as_ref()?;
    Some(DiscriminatorRule::InternalType(tag.clone()))
}
