use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod preferences;

pub use preferences::{Preferences, Theme};

/// Number of precomputed clusters the recommender exposes
pub const CLUSTER_COUNT: u8 = 5;

/// Genre catalogue understood by the recommender (MovieLens 100K)
pub const GENRES: [&str; 18] = [
    "Action",
    "Adventure",
    "Animation",
    "Children's",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Fantasy",
    "Film-Noir",
    "Horror",
    "Musical",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Thriller",
    "War",
    "Western",
];

/// Returns the catalogue spelling of a genre name, matched case-insensitively
pub fn canonical_genre(name: &str) -> Option<&'static str> {
    let name = name.trim();
    GENRES.iter().copied().find(|g| g.eq_ignore_ascii_case(name))
}

/// One ranked item as returned by the recommender service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationEntry {
    pub title: String,
    /// Relevance / similarity in 0..1
    #[serde(default)]
    pub score: f64,
    /// Only set for cluster queries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_label: Option<String>,
}

impl RecommendationEntry {
    pub fn new(title: impl Into<String>, score: f64) -> Self {
        Self {
            title: title.into(),
            score,
            cluster_label: None,
        }
    }

    pub fn with_cluster_label(mut self, label: impl Into<String>) -> Self {
        self.cluster_label = Some(label.into());
        self
    }
}

/// Display metadata resolved for one title.
///
/// `None` means the lookup yielded nothing usable for that field, not that it failed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Metadata {
    pub poster_url: Option<String>,
    /// Average critic rating in 0..10
    pub rating: Option<f64>,
    pub year: Option<i32>,
    pub details_url: Option<String>,
}

impl Metadata {
    /// Metadata with every field absent
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn is_absent(&self) -> bool {
        self == &Self::absent()
    }
}

/// A recommendation entry merged with its looked-up metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedEntry {
    #[serde(flatten)]
    pub entry: RecommendationEntry,
    #[serde(flatten)]
    pub metadata: Metadata,
}

impl EnrichedEntry {
    pub fn new(entry: RecommendationEntry, metadata: Metadata) -> Self {
        Self { entry, metadata }
    }

    pub fn title(&self) -> &str {
        &self.entry.title
    }

    pub fn year(&self) -> Option<i32> {
        self.metadata.year
    }
}

/// Inclusive release-year bounds.
///
/// `min_year <= max_year` is not enforced; an inverted range matches no year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearRange {
    pub min_year: i32,
    pub max_year: i32,
}

impl YearRange {
    pub fn new(min_year: i32, max_year: i32) -> Self {
        Self { min_year, max_year }
    }

    /// Builds a range from optional bounds. A missing bound is left open;
    /// returns `None` when both are missing.
    pub fn from_bounds(min_year: Option<i32>, max_year: Option<i32>) -> Option<Self> {
        if min_year.is_none() && max_year.is_none() {
            return None;
        }
        Some(Self {
            min_year: min_year.unwrap_or(i32::MIN),
            max_year: max_year.unwrap_or(i32::MAX),
        })
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min_year <= year && year <= self.max_year
    }
}

/// The three user actions that produce a result list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Title,
    Genres,
    Cluster,
}

impl SearchKind {
    pub const ALL: [SearchKind; 3] = [SearchKind::Title, SearchKind::Genres, SearchKind::Cluster];
}

impl Display for SearchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchKind::Title => write!(f, "title"),
            SearchKind::Genres => write!(f, "genres"),
            SearchKind::Cluster => write!(f, "cluster"),
        }
    }
}

/// Identifier of a precomputed cluster, always below [`CLUSTER_COUNT`]
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub struct ClusterId(u8);

impl ClusterId {
    pub fn new(id: i64) -> Option<Self> {
        u8::try_from(id)
            .ok()
            .filter(|id| *id < CLUSTER_COUNT)
            .map(ClusterId)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Response body for the recommendation endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub kind: SearchKind,
    pub count: usize,
    pub results: Vec<EnrichedEntry>,
}

impl RecommendationResponse {
    pub fn new(kind: SearchKind, results: Vec<EnrichedEntry>) -> Self {
        Self {
            kind,
            count: results.len(),
            results,
        }
    }
}

// ============================================================================
// Recommender Service Types
// ============================================================================

/// Body returned by every recommender endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RecommenderResponse {
    /// Echoed back by the title endpoint only
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub results: Vec<RecommendationEntry>,
}

/// Body sent to the genre endpoint
#[derive(Debug, Clone, Serialize)]
pub struct GenreQuery {
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_year: Option<i32>,
}

// ============================================================================
// TMDb API Types
// ============================================================================

/// Raw `/search/movie` response.
///
/// Candidates stay untyped so that one malformed field only drops that field.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

/// Extracts the calendar year from a `YYYY-MM-DD` style date
pub fn parse_release_year(date: &str) -> Option<i32> {
    let year = date.trim().get(..4)?;
    if !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    year.parse().ok()
}
