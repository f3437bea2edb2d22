use std::env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::SeedableRng;
use sugar_engine::{
    resolve_app_paths, InputSource, LoopConfig, Pacing, SceneError, StartupError,
};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::economy::{ProfileError, SaveStore, DEFAULT_SLOT};
use crate::scenes::{build_director, CatalogError, GameDirector, SceneCatalog, SceneContext};

use super::frame_log::TraceRenderer;
use super::script::{ScriptError, ScriptInput};

const SLOT_ENV_VAR: &str = "SUGARRUSH_SLOT";
const SEED_ENV_VAR: &str = "SUGARRUSH_SEED";
const SCRIPT_ENV_VAR: &str = "SUGARRUSH_SCRIPT";
const MAX_TICKS_ENV_VAR: &str = "SUGARRUSH_MAX_TICKS";

#[derive(Debug, Error)]
pub(crate) enum BootError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("failed to enter the first scene: {0}")]
    Scene(#[from] SceneError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) director: GameDirector,
    pub(crate) input: Box<dyn InputSource>,
    pub(crate) renderer: TraceRenderer,
}

pub(crate) fn build_app() -> Result<AppWiring, BootError> {
    init_tracing();
    info!("=== Sugar Rush Startup ===");

    let paths = resolve_app_paths()?;
    let slot = env::var(SLOT_ENV_VAR).unwrap_or_else(|_| DEFAULT_SLOT.to_string());
    let seed = parse_env_u64(SEED_ENV_VAR).unwrap_or_else(seed_from_clock);
    let script = env::var_os(SCRIPT_ENV_VAR).map(PathBuf::from);
    info!(
        root = %paths.root.display(),
        slot = %slot,
        seed,
        script = ?script,
        "startup_config"
    );

    let store = SaveStore::new(&paths.saves_dir, &slot)?;
    let catalog = SceneCatalog::load(&paths.config_dir)?;
    let context = SceneContext::open(store, StdRng::seed_from_u64(seed))?;
    let director = build_director(&catalog, context)?;

    let mut config = LoopConfig {
        max_ticks: parse_env_u64(MAX_TICKS_ENV_VAR),
        ..LoopConfig::default()
    };
    let fixed_dt_seconds = config.fixed_dt().as_secs_f32();
    let input: Box<dyn InputSource> = match script {
        Some(path) => {
            config.pacing = Pacing::Headless;
            Box::new(ScriptInput::from_path(&path, fixed_dt_seconds)?)
        }
        None => Box::new(ScriptInput::from_stdin(fixed_dt_seconds)),
    };

    Ok(AppWiring {
        config,
        director,
        input,
        renderer: TraceRenderer::default(),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn parse_env_u64(var: &'static str) -> Option<u64> {
    let value = env::var(var).ok()?;
    match parse_u64_value(var, &value) {
        Ok(parsed) => Some(parsed),
        Err(error) => {
            warn!(error = %error, "invalid_env_value_ignored");
            None
        }
    }
}

fn parse_u64_value(var: &'static str, value: &str) -> Result<u64, StartupError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|error| StartupError::InvalidEnvValue {
            var,
            value: value.to_string(),
            reason: error.to_string(),
        })
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
