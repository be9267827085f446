// コアレイヤー - 基盤となるトレイト、型、エラー定義
// 他のレイヤーから参照される基本的な抽象化を提供

pub mod context;
pub mod error;
pub mod queue;
pub mod traits;
pub mod types;

// 公開API - 明示的にエクスポートして曖昧性を回避
pub use context::{ActiveSignal, OrderCounters, PipelineContext};
pub use error::{ErrorSeverity, PipelineError, PipelineResult};
pub use queue::ConcurrentQueue;
pub use traits::{PipelineReporter, Recipe};
pub use types::{
    DeliveryEvent, Order, OrderFault, OrderId, PipelineSummary, PreparationOutcome, Stage,
};
