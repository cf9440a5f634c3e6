use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::Config;
use crate::fetch::{Fetcher, FsFetcher};
use crate::i18n::{report_missing_keys, DictionaryCache, DictionaryLoader, Language, Localizer};
use crate::site::projects::{self, ProjectCatalog};
use crate::site::{AssetProbe, StaticDirProbe};
use crate::storage::{JsonFileStorage, Storage};

#[derive(Clone)]
pub struct AppState {
    pub env: Config,
    pub localizer: Arc<Localizer>,
    pub catalog: Arc<RwLock<ProjectCatalog>>,
    pub fetcher: Arc<dyn Fetcher>,
    pub probe: Arc<dyn AssetProbe>,
}

impl AppState {
    pub fn new(
        env: Config,
        localizer: Arc<Localizer>,
        catalog: ProjectCatalog,
        fetcher: Arc<dyn Fetcher>,
        probe: Arc<dyn AssetProbe>,
    ) -> Self {
        Self {
            env,
            localizer,
            catalog: Arc::new(RwLock::new(catalog)),
            fetcher,
            probe,
        }
    }

    /// Load dictionaries and projects from the configured content root.
    /// Failures degrade (cache, built-in dictionaries, empty catalog).
    pub async fn initialize(env: Config) -> Self {
        if !env.app.content_dir.is_dir() {
            warn!(path = %env.app.content_dir.display(), "Content directory not found");
        }
        let fetcher: Arc<dyn Fetcher> = Arc::new(FsFetcher::new(env.app.content_dir.clone()));
        let storage: Arc<dyn Storage> = Arc::new(JsonFileStorage::open(env.app.storage_path.clone()));
        let cache = DictionaryCache::new(storage, env.i18n.cache_ttl);

        let localizer = DictionaryLoader::new(fetcher.as_ref(), env.retry_policy())
            .with_cache(&cache)
            .load(Language::all(), env.i18n.default_language)
            .await;
        let missing = report_missing_keys(&localizer);
        if missing > 0 {
            warn!(missing, "Dictionaries are out of parity");
        }

        let catalog =
            ProjectCatalog::from_result(projects::load_all(fetcher.as_ref(), &env.retry_policy()).await);
        let probe: Arc<dyn AssetProbe> = Arc::new(StaticDirProbe::new(env.app.static_dir.clone(), "/static"));

        Self::new(env, Arc::new(localizer), catalog, fetcher, probe)
    }

    pub async fn catalog(&self) -> ProjectCatalog {
        self.catalog.read().await.clone()
    }

    /// Fetch the project collection again and replace the current catalog.
    pub async fn reload_projects(&self) -> ProjectCatalog {
        let result = projects::load_all(self.fetcher.as_ref(), &self.env.retry_policy()).await;
        let catalog = ProjectCatalog::from_result(result);
        info!(
            projects = catalog.collection().len(),
            failed = catalog.is_failed(),
            "Project catalog reloaded"
        );
        *self.catalog.write().await = catalog.clone();
        catalog
    }
}
