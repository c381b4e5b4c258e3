//! Configuration module

mod settings;

pub use settings::{
    CacheSettings, OutgoingSettings, RankingWeights, ScriptRange, Settings, SourceConfig,
};
