// パイプラインに関連するデータ型定義

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 注文識別子
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// キュー間を流れる作業単位
///
/// 状態（Pending/Placed/Completed）はどのキューに入っているかで決まる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
}

impl Order {
    pub fn new(id: impl Into<OrderId>) -> Self {
        Self { id: id.into() }
    }
}

/// パイプラインのステージ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Intake,
    Preparation,
    Delivery,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Intake, Stage::Preparation, Stage::Delivery];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Intake => "intake",
            Self::Preparation => "preparation",
            Self::Delivery => "delivery",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 配達完了イベント
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryEvent {
    pub order_id: OrderId,
    pub worker: String,
    /// 配達済みカウンターのインクリメント後の値（1始まり）
    pub sequence: usize,
    pub delivered_at: DateTime<Utc>,
}

/// 準備ステージで発生した注文単位の障害
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderFault {
    pub order_id: OrderId,
    pub worker: String,
    pub attempt: u32,
    pub message: String,
    /// trueなら再試行せずに破棄された
    pub dropped: bool,
}

/// 準備ステージにおける注文1件の処理結果
#[derive(Debug, Clone, PartialEq)]
pub enum PreparationOutcome {
    Prepared { attempts: u32 },
    Dropped { attempts: u32, reason: String },
}

/// パイプライン全体のサマリー
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub total_orders: usize,
    pub delivered_orders: usize,
    pub dropped_orders: usize,
    pub dropped_ids: Vec<OrderId>,
    pub intake_workers: usize,
    pub prep_workers: usize,
    pub delivery_workers: usize,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl PipelineSummary {
    /// 全注文が配達済みか破棄済みか
    pub fn is_settled(&self) -> bool {
        self.delivered_orders + self.dropped_orders == self.total_orders
    }
}
