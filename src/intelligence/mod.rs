pub mod dedup;
pub mod market_store;
pub mod scorer;
pub mod wallet_store;

pub use dedup::AlertDeduplicator;
pub use market_store::MarketVolumeStore;
pub use scorer::{score_trade, ScoreBreakdown, ScoringConfig};
pub use wallet_store::WalletHistoryStore;
