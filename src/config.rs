use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RmError};
use crate::retry::RetryConfig;

/// Root configuration for the matching/authoring core.
///
/// Layered load order: built-in defaults, then an optional toml patch
/// file (explicit path or `ROLEMATCH_CONFIG`), then `ROLEMATCH_*`
/// environment overrides. Sections merge field-by-field so a patch file
/// only needs to name what it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            embedding: EmbeddingConfig::default(),
            completion: CompletionConfig::default(),
            search: SearchConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl Config {
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("ROLEMATCH_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| RmError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| RmError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.embedding {
            self.embedding.merge(patch);
        }
        if let Some(patch) = patch.completion {
            self.completion.merge(patch);
        }
        if let Some(patch) = patch.search {
            self.search.merge(patch);
        }
        if let Some(patch) = patch.scoring {
            self.scoring.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Some(value) = env_string("ROLEMATCH_EMBEDDING_ENDPOINT") {
            self.embedding.endpoint = Some(value);
        }
        if let Some(value) = env_string("ROLEMATCH_EMBEDDING_API_KEY") {
            self.embedding.api_key = Some(value);
        }
        if let Some(value) = env_string("ROLEMATCH_COMPLETION_ENDPOINT") {
            self.completion.endpoint = Some(value);
        }
        if let Some(value) = env_string("ROLEMATCH_COMPLETION_API_KEY") {
            self.completion.api_key = Some(value);
        }
        if let Some(value) = env_string("ROLEMATCH_SEARCH_ENDPOINT") {
            self.search.endpoint = value;
        }
        if let Some(value) = env_string("ROLEMATCH_SEARCH_API_KEY") {
            self.search.api_key = value;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.scoring.min_relevancy < 0.0 || self.scoring.min_relevancy > 1.0 {
            return Err(RmError::Config(format!(
                "scoring.min_relevancy must be in [0, 1], got {}",
                self.scoring.min_relevancy
            )));
        }
        if self.search.over_fetch_factor == 0 {
            return Err(RmError::Config(
                "search.over_fetch_factor must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Embedding service connection and retry budget. An absent endpoint
/// means the deterministic hash fallback runs directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_embedding_dims")]
    pub dims: usize,
    #[serde(default = "default_embedding_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_dims() -> usize {
    1536
}

fn default_embedding_attempts() -> u32 {
    6
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            model: default_embedding_model(),
            dims: default_embedding_dims(),
            max_attempts: default_embedding_attempts(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl EmbeddingConfig {
    fn merge(&mut self, patch: EmbeddingConfigPatch) {
        if let Some(endpoint) = patch.endpoint {
            self.endpoint = Some(endpoint);
        }
        if let Some(api_key) = patch.api_key {
            self.api_key = Some(api_key);
        }
        if let Some(model) = patch.model {
            self.model = model;
        }
        if let Some(dims) = patch.dims {
            self.dims = dims;
        }
        if let Some(max_attempts) = patch.max_attempts {
            self.max_attempts = max_attempts;
        }
        if let Some(timeout_secs) = patch.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
    }

    pub fn retry(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_attempts,
            ..RetryConfig::embedding()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Completion service connection; fewer retry attempts than embedding
/// because completion calls sit inside the interactive authoring flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_completion_model")]
    pub model: String,
    #[serde(default = "default_completion_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_completion_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_completion_attempts() -> u32 {
    3
}

fn default_temperature() -> f64 {
    0.3
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            model: default_completion_model(),
            max_attempts: default_completion_attempts(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CompletionConfig {
    fn merge(&mut self, patch: CompletionConfigPatch) {
        if let Some(endpoint) = patch.endpoint {
            self.endpoint = Some(endpoint);
        }
        if let Some(api_key) = patch.api_key {
            self.api_key = Some(api_key);
        }
        if let Some(model) = patch.model {
            self.model = model;
        }
        if let Some(max_attempts) = patch.max_attempts {
            self.max_attempts = max_attempts;
        }
        if let Some(temperature) = patch.temperature {
            self.temperature = temperature;
        }
        if let Some(timeout_secs) = patch.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
    }

    pub fn retry(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_attempts,
            ..RetryConfig::completion()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Hybrid search service connection. The index name is namespaced per
/// entity type; only roles are indexed by this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_index_name")]
    pub index_name: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Over-fetch multiplier applied to the caller's desired result
    /// count before querying the engine, so recalibration has enough
    /// candidates to re-rank.
    #[serde(default = "default_over_fetch")]
    pub over_fetch_factor: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_index_name() -> String {
    "roles".to_string()
}

fn default_api_version() -> String {
    "2024-07-01".to_string()
}

fn default_over_fetch() -> usize {
    3
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            index_name: default_index_name(),
            api_version: default_api_version(),
            over_fetch_factor: default_over_fetch(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SearchConfig {
    fn merge(&mut self, patch: SearchConfigPatch) {
        if let Some(endpoint) = patch.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(api_key) = patch.api_key {
            self.api_key = api_key;
        }
        if let Some(index_name) = patch.index_name {
            self.index_name = index_name;
        }
        if let Some(api_version) = patch.api_version {
            self.api_version = api_version;
        }
        if let Some(over_fetch_factor) = patch.over_fetch_factor {
            self.over_fetch_factor = over_fetch_factor;
        }
        if let Some(timeout_secs) = patch.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Score recalibration constants.
///
/// Empirically tuned against the engine's native score distribution
/// (strong matches typically land in 0.01-0.1 raw). Preserved verbatim
/// from the source system; exposed as configuration, not re-derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Candidates below this recalibrated score are discarded entirely.
    #[serde(default = "default_min_relevancy")]
    pub min_relevancy: f64,
    /// Piecewise-linear breakpoints on the raw engine score.
    #[serde(default = "default_breakpoints")]
    pub breakpoints: [f64; 3],
    /// Boost when the title appears inside the query (or a long query
    /// word prefixes the title).
    #[serde(default = "default_title_boost")]
    pub title_match_boost: f64,
    /// Boost for two or more shared words between title and query.
    #[serde(default = "default_strong_overlap_boost")]
    pub strong_overlap_boost: f64,
    /// Boost for exactly one shared word.
    #[serde(default = "default_weak_overlap_boost")]
    pub weak_overlap_boost: f64,
}

fn default_min_relevancy() -> f64 {
    0.70
}

fn default_breakpoints() -> [f64; 3] {
    [0.01, 0.025, 0.035]
}

fn default_title_boost() -> f64 {
    1.4
}

fn default_strong_overlap_boost() -> f64 {
    1.2
}

fn default_weak_overlap_boost() -> f64 {
    1.1
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_relevancy: default_min_relevancy(),
            breakpoints: default_breakpoints(),
            title_match_boost: default_title_boost(),
            strong_overlap_boost: default_strong_overlap_boost(),
            weak_overlap_boost: default_weak_overlap_boost(),
        }
    }
}

impl ScoringConfig {
    fn merge(&mut self, patch: ScoringConfigPatch) {
        if let Some(min_relevancy) = patch.min_relevancy {
            self.min_relevancy = min_relevancy;
        }
        if let Some(breakpoints) = patch.breakpoints {
            self.breakpoints = breakpoints;
        }
        if let Some(title_match_boost) = patch.title_match_boost {
            self.title_match_boost = title_match_boost;
        }
        if let Some(strong_overlap_boost) = patch.strong_overlap_boost {
            self.strong_overlap_boost = strong_overlap_boost;
        }
        if let Some(weak_overlap_boost) = patch.weak_overlap_boost {
            self.weak_overlap_boost = weak_overlap_boost;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    embedding: Option<EmbeddingConfigPatch>,
    completion: Option<CompletionConfigPatch>,
    search: Option<SearchConfigPatch>,
    scoring: Option<ScoringConfigPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct EmbeddingConfigPatch {
    endpoint: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    dims: Option<usize>,
    max_attempts: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct CompletionConfigPatch {
    endpoint: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    max_attempts: Option<u32>,
    temperature: Option<f64>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchConfigPatch {
    endpoint: Option<String>,
    api_key: Option<String>,
    index_name: Option<String>,
    api_version: Option<String>,
    over_fetch_factor: Option<usize>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ScoringConfigPatch {
    min_relevancy: Option<f64>,
    breakpoints: Option<[f64; 3]>,
    title_match_boost: Option<f64>,
    strong_overlap_boost: Option<f64>,
    weak_overlap_boost: Option<f64>,
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
