use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use jdlrs::config::ConfigError;
use jdlrs::database::DatabaseType;
use jdlrs::export::ExportError;
use jdlrs::logger::TracingLogger;
use jdlrs::model::ApplicationType;
use jdlrs::{ImportConfig, JdlError, JdlImporter, lint, reader};

#[derive(Parser)]
#[command(name = "jdlrs", version)]
#[command(about = "Import JDL files into entity and application JSON", long_about = None)]
struct Cli {
    /// JDL files (.jh or .jdl)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Database type used when the JDL declares no application
    #[arg(long)]
    db: Option<String>,

    /// Application type used when the JDL declares no application
    #[arg(long)]
    app_type: Option<String>,

    /// Base name of the application entities are imported into
    #[arg(long)]
    base_name: Option<String>,

    #[arg(long, default_value_t = false)]
    skip_user_management: bool,

    /// Don't mirror relationships lacking an injected field on their destination
    #[arg(long, default_value_t = false)]
    unidirectional: bool,

    /// Export entities even when unchanged
    #[arg(short, long, default_value_t = false)]
    force: bool,

    /// Print the entity JSON instead of writing files
    #[arg(long, default_value_t = false)]
    json_only: bool,

    /// Report lint issues before importing
    #[arg(long, default_value_t = false)]
    lint: bool,

    /// Folder of the generated application(s)
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), JdlError> {
    let config = import_config(cli)?;

    if cli.lint {
        let document = reader::parse_files(&cli.files)?;
        let issues = lint::check(&document);
        for issue in issues.iter() {
            warn!("{}", issue);
        }
        info!(issues = issues.len(), "lint done");
    }

    let logger = TracingLogger;
    let import = JdlImporter::new(config, &logger).import_files(&cli.files)?;

    if cli.json_only {
        let json = serde_json::to_string_pretty(&import.entities).map_err(ExportError::from)?;
        println!("{}", json);
        return Ok(());
    }

    for path in &import.written {
        info!("wrote {}", path.display());
    }
    info!(
        entities = import.entities.len(),
        applications = import.applications.len(),
        deployments = import.deployments.len(),
        warnings = import.warnings.len(),
        "import done"
    );
    Ok(())
}

fn import_config(cli: &Cli) -> Result<ImportConfig, JdlError> {
    let mut config = ImportConfig::from_yo_rc(&cli.output)?
        .with_unidirectional_relationships(cli.unidirectional)
        .with_force_no_filtering(cli.force)
        .with_json_only(cli.json_only);

    if let Some(db) = &cli.db {
        let database = DatabaseType::from_str(db)
            .ok_or_else(|| ConfigError::UnknownDatabase(db.clone()))?;
        config = config.with_database_type(database);
    }
    if let Some(app_type) = &cli.app_type {
        let application_type = ApplicationType::from_str(app_type)
            .ok_or_else(|| ConfigError::UnknownApplicationType(app_type.clone()))?;
        config = config.with_application_type(application_type);
    }
    if let Some(name) = &cli.base_name {
        config = config.with_application_name(name);
    }
    if cli.skip_user_management {
        config = config.with_skip_user_management(true);
    }
    Ok(config)
}
