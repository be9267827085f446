// 注文パイプライン - 受付・調理・配達の3段Producer-Consumerパイプライン

pub mod cli;
pub mod core;
pub mod engine;
pub mod services;

// 公開API
pub use crate::core::{
    Order, OrderId, PipelineError, PipelineReporter, PipelineResult, PipelineSummary, Recipe,
    Stage,
};
pub use crate::engine::OrderPipeline;
pub use crate::services::{
    BreakfastMenu, BreakfastRecipe, ConsoleReporter, FaultPolicy, InstantRecipe, MemoryReporter,
    NoOpReporter, PipelineConfig,
};
