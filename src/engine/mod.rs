// エンジン層 - 並列処理とオーケストレーション
// ステージワーカー・ワーカープール・完了監視を組み合わせてパイプラインを構成

pub mod consumer;
pub mod monitor;
pub mod pipeline;

// 公開API - 主要エンジンクラス
pub use consumer::{StageWorker, WorkerPool, WorkerSettings};
pub use monitor::{CompletionMonitor, MonitorHandle, MonitorReport};
pub use pipeline::OrderPipeline;
