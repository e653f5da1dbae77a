pub mod enrichment;
pub mod preferences;
pub mod providers;
pub mod recommendations;
pub mod recommender;
pub mod result_board;
pub mod sources;
pub mod title_normalizer;
pub mod year_filter;

pub use enrichment::Enricher;
pub use preferences::PreferencesStore;
pub use recommender::{HttpRecommender, Recommender};
pub use result_board::ResultBoard;
pub use sources::RecommendationSource;
