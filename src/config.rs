use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDb API key used for metadata lookups
    pub tmdb_api_key: String,

    /// TMDb API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base path for poster images
    #[serde(default = "default_tmdb_image_base_url")]
    pub tmdb_image_base_url: String,

    /// Poster width bucket appended to the image base path (e.g. "w200")
    #[serde(default = "default_poster_width")]
    pub poster_width: String,

    /// Recommender service base URL
    #[serde(default = "default_recommender_url")]
    pub recommender_url: String,

    /// Redis connection URL. Metadata caching is disabled when unset.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Metadata cache TTL in seconds
    #[serde(default = "default_metadata_cache_ttl")]
    pub metadata_cache_ttl: u64,

    /// Maximum number of metadata lookups in flight within one enrichment call.
    /// Each call has its own budget. Unbounded when unset.
    #[serde(default)]
    pub enrich_concurrency: Option<usize>,

    /// Timeout applied to each outbound request, in seconds
    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,

    /// Where UI preferences are persisted
    #[serde(default = "default_preferences_path")]
    pub preferences_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_poster_width() -> String {
    "w200".to_string()
}

fn default_recommender_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_metadata_cache_ttl() -> u64 {
    86400
}

fn default_lookup_timeout_secs() -> u64 {
    10
}

fn default_preferences_path() -> String {
    "preferences.json".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_applied() {
        let config: Config = envy::from_iter(vars(&[("TMDB_API_KEY", "secret")])).unwrap();

        assert_eq!(config.tmdb_api_key, "secret");
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb_image_base_url, "https://image.tmdb.org/t/p");
        assert_eq!(config.poster_width, "w200");
        assert_eq!(config.recommender_url, "http://localhost:5000");
        assert_eq!(config.redis_url, None);
        assert_eq!(config.enrich_concurrency, None);
        assert_eq!(config.metadata_cache_ttl, 86400);
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_optional_values_parsed() {
        let config: Config = envy::from_iter(vars(&[
            ("TMDB_API_KEY", "secret"),
            ("REDIS_URL", "redis://cache:6379"),
            ("ENRICH_CONCURRENCY", "4"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.enrich_concurrency, Some(4));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_missing_api_key_is_error() {
        let result = envy::from_iter::<_, Config>(vars(&[("PORT", "8080")]));
        assert!(result.is_err());
    }
}
