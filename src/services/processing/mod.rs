// 注文準備機能
// 調理時間の待機、レシピ実行、障害時の再試行/破棄

pub mod worker;

// 公開API
pub use worker::{cook_time, prepare_order};
