// 出力報告機能
// 配達イベント、障害通知、完了サマリー

pub mod implementations;

// 公開API
pub use implementations::{ConsoleReporter, MemoryReporter, NoOpReporter};
