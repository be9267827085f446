// 設定管理機能
// ワーカー数、調理時間、監視間隔、障害ポリシー

pub mod implementations;

// 公開API
pub use implementations::{DelayRange, FaultPolicy, PipelineConfig};
