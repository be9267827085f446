// 結果永続化機能
// 実行サマリーのJSON出力

pub mod implementations;

// 公開API
pub use implementations::write_summary_json;
