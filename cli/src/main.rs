use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use client::api::HttpProjectApi;
use client::config::{
    ClientConfig, ConfigError, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use mapcore::api::{ApiError, ProjectApi};
use mapcore::doc::{CatalogError, DistrictCatalog, DistrictFeature, Project, ProjectId};
use mapcore::geometry::{Feature, GeoJson, GeometryError};
use mapcore::mask;
use mapcore::persistence::{DrawingBatch, PersistError};
use mapcore::selection::LABEL_SEPARATOR;
use mapcore::stats::DistrictStats;
use serde_json::Value;


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("invalid GeoJSON: {0}")]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("reading {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("unknown districts: {0}")]
    UnknownDistricts(String),
}

#[derive(Parser, Debug)]
#[command(name = "litmap", about = "District map and project drawings CLI")]
struct Cli {
    #[arg(long, env = "LITMAP_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, env = "LITMAP_TOKEN")]
    token: Option<String>,

    #[arg(long, env = "LITMAP_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    request_timeout_secs: u64,

    #[arg(long, env = "LITMAP_CONNECT_TIMEOUT_SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    connect_timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            request_timeout_secs: self.request_timeout_secs,
            connect_timeout_secs: self.connect_timeout_secs,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the detail-view mask for a set of districts as a GeoJSON Feature.
    Mask(MaskArgs),
    Projects(ProjectsCommand),
    District(DistrictCommand),
    Drawings(DrawingsCommand),
}

#[derive(Args, Debug)]
struct MaskArgs {
    /// District catalog FeatureCollection; fetched from the API when omitted.
    #[arg(long)]
    catalog: Option<PathBuf>,

    #[arg(required = true)]
    districts: Vec<String>,
}

#[derive(Args, Debug)]
struct ProjectsCommand {
    #[command(subcommand)]
    command: ProjectsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProjectsSubcommand {
    List,
    Show { project_id: ProjectId },
}

#[derive(Args, Debug)]
struct DistrictCommand {
    #[command(subcommand)]
    command: DistrictSubcommand,
}

#[derive(Subcommand, Debug)]
enum DistrictSubcommand {
    /// Projects in any of the named districts.
    Projects {
        #[arg(required = true)]
        districts: Vec<String>,
    },
    /// Per-status project counts for the named districts.
    Stats {
        #[arg(required = true)]
        districts: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct DrawingsCommand {
    #[command(subcommand)]
    command: DrawingsSubcommand,
}

#[derive(Subcommand, Debug)]
enum DrawingsSubcommand {
    /// Replace every drawing of a project with the geometries in a GeoJSON file.
    Save {
        project_id: ProjectId,
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let api = HttpProjectApi::new(&cli.client_config())?;

    match cli.command {
        Command::Mask(args) => run_mask(&api, args).await,
        Command::Projects(projects) => run_projects(&api, projects).await,
        Command::District(district) => run_district(&api, district).await,
        Command::Drawings(drawings) => run_drawings(&api, drawings).await,
    }
}

async fn run_mask(api: &dyn ProjectApi, args: MaskArgs) -> Result<(), CliError> {
    let raw = match &args.catalog {
        Some(path) => read_json(path)?,
        None => api.fetch_district_catalog().await?,
    };
    let catalog = DistrictCatalog::from_geojson(&raw)?;
    let features = resolve_districts(&catalog, &args.districts)?;
    let holes = mask::mask_holes(features.iter().copied()).len();
    tracing::info!(districts = features.len(), holes, "mask computed");

    let value = match mask::compute_mask(features) {
        Some(geometry) => serde_json::to_value(Feature::bare(geometry))?,
        None => Value::Null,
    };
    print_json(&value)
}

async fn run_projects(api: &dyn ProjectApi, projects: ProjectsCommand) -> Result<(), CliError> {
    match projects.command {
        ProjectsSubcommand::List => {
            for row in project_rows(&api.list_projects().await?) {
                println!("{row}");
            }
            Ok(())
        }
        ProjectsSubcommand::Show { project_id } => {
            let project = api.fetch_project(project_id).await?;
            print_json(&serde_json::to_value(project)?)
        }
    }
}

async fn run_district(api: &dyn ProjectApi, district: DistrictCommand) -> Result<(), CliError> {
    match district.command {
        DistrictSubcommand::Projects { districts } => {
            let label = district_label(&districts);
            for row in project_rows(&api.fetch_district_projects(&label).await?) {
                println!("{row}");
            }
            Ok(())
        }
        DistrictSubcommand::Stats { districts } => {
            let label = district_label(&districts);
            let projects = api.fetch_district_projects(&label).await?;
            for line in stats_lines(&DistrictStats::compute(&label, &projects)) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

async fn run_drawings(api: &dyn ProjectApi, drawings: DrawingsCommand) -> Result<(), CliError> {
    match drawings.command {
        DrawingsSubcommand::Save { project_id, file } => {
            let batch = batch_from_geojson(&read_json(&file)?)?;
            api.save_drawings(project_id, &batch).await?;
            println!("saved {} drawings to project {project_id}", batch.len());
            Ok(())
        }
    }
}

fn read_json(path: &Path) -> Result<Value, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io { path: path.display().to_string(), source })?;
    Ok(serde_json::from_str(&text)?)
}

/// Canonical multi-district label, e.g. `"Lima, Callao"`.
fn district_label(names: &[String]) -> String {
    names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR)
}

/// Look up every name; all unknown names are reported together.
fn resolve_districts<'a>(catalog: &'a DistrictCatalog, names: &[String]) -> Result<Vec<&'a DistrictFeature>, CliError> {
    let unknown: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|n| !catalog.contains(n))
        .collect();
    if !unknown.is_empty() {
        return Err(CliError::UnknownDistricts(unknown.join(", ")));
    }
    Ok(names.iter().filter_map(|n| catalog.get(n)).collect())
}

/// Replace-all batch from any GeoJSON object. An empty result is an error.
fn batch_from_geojson(value: &Value) -> Result<DrawingBatch, CliError> {
    let batch = DrawingBatch::from_features(GeoJson::from_value(value)?.into_features());
    if batch.is_empty() {
        return Err(PersistError::EmptyLayer.into());
    }
    Ok(batch)
}

fn project_rows(projects: &[Project]) -> Vec<String> {
    projects
        .iter()
        .map(|p| {
            format!(
                "{}\t{}\t{}\t{}\t{} drawings",
                p.id,
                p.status,
                p.name,
                p.districts.join(LABEL_SEPARATOR),
                p.drawings.len()
            )
        })
        .collect()
}

fn stats_lines(stats: &DistrictStats) -> Vec<String> {
    vec![
        stats.title.clone(),
        format!("total\t{}", stats.total),
        format!("active\t{}", stats.active),
        format!("inactive\t{}", stats.inactive),
        format!("completed\t{}", stats.completed),
        format!("archived\t{}", stats.archived),
    ]
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
