// サービス層 - 機能別のビジネスロジック
// 各サービスは特定の責任を持ち、疎結合で設計されている

pub mod config;
pub mod monitoring;
pub mod persistence;
pub mod processing;
pub mod recipe;

// 公開API - 各サービスの主要機能を明示的にエクスポート
pub use config::{DelayRange, FaultPolicy, PipelineConfig};
pub use monitoring::{ConsoleReporter, MemoryReporter, NoOpReporter};
pub use persistence::write_summary_json;
pub use processing::prepare_order;
pub use recipe::{
    BreakfastMenu, BreakfastRecipe, FaultInjectingRecipe, InjectedFault, InstantRecipe,
};
