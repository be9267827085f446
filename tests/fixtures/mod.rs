// テストユーティリティ
// パイプライン実行とアサーションの共通ヘルパー

pub mod helpers;

// 公開API
pub use helpers::*;
