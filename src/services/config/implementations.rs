// 設定管理の具象実装

use crate::core::{OrderId, PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// 準備ステージの擬似調理時間（ミリ秒、両端含む）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// 遅延なし
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self::new(0, 50)
    }
}

/// 準備ステージで注文単位の障害が起きたときの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum FaultPolicy {
    /// 即座に破棄
    Drop,
    /// その場で再試行し、max_attempts回失敗したら破棄
    Retry { max_attempts: u32 },
}

impl FaultPolicy {
    /// 1注文あたりの最大試行回数
    pub fn max_attempts(&self) -> u32 {
        match self {
            Self::Drop => 1,
            Self::Retry { max_attempts } => *max_attempts,
        }
    }
}

impl Default for FaultPolicy {
    fn default() -> Self {
        Self::Retry { max_attempts: 3 }
    }
}

/// パイプライン設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    orders: Vec<OrderId>,
    intake_workers: usize,
    prep_workers: usize,
    delivery_workers: usize,
    processing_delay: DelayRange,
    poll_interval_ms: u64,
    idle_backoff_ms: u64,
    fault_policy: FaultPolicy,
}

impl PipelineConfig {
    pub fn new(cpu_count: usize) -> Self {
        Self {
            orders: Vec::new(),
            intake_workers: 1,
            prep_workers: cpu_count.max(1),
            delivery_workers: 1,
            processing_delay: DelayRange::default(),
            poll_interval_ms: 10,
            idle_backoff_ms: 1,
            fault_policy: FaultPolicy::default(),
        }
    }

    /// JSONファイルから設定を読み込む（省略された項目はデフォルト値）
    pub fn from_json_file(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let content = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::config_load(&display, e.into()))?;
        serde_json::from_str(&content).map_err(|e| PipelineError::config_load(&display, e.into()))
    }

    pub fn with_orders<I>(mut self, orders: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<OrderId>,
    {
        self.orders = orders.into_iter().map(Into::into).collect();
        self
    }

    /// `order-001`形式の注文をcount件生成
    pub fn with_order_count(self, count: usize) -> Self {
        let width = count.to_string().len().max(3);
        self.with_orders((1..=count).map(|i| format!("order-{i:0width$}")))
    }

    pub fn with_workers(mut self, intake: usize, prep: usize, delivery: usize) -> Self {
        self.intake_workers = intake;
        self.prep_workers = prep;
        self.delivery_workers = delivery;
        self
    }

    pub fn with_intake_workers(mut self, workers: usize) -> Self {
        self.intake_workers = workers;
        self
    }

    pub fn with_prep_workers(mut self, workers: usize) -> Self {
        self.prep_workers = workers;
        self
    }

    pub fn with_delivery_workers(mut self, workers: usize) -> Self {
        self.delivery_workers = workers;
        self
    }

    pub fn with_processing_delay(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.processing_delay = DelayRange::new(min_ms, max_ms);
        self
    }

    pub fn with_poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    pub fn with_idle_backoff_ms(mut self, idle_backoff_ms: u64) -> Self {
        self.idle_backoff_ms = idle_backoff_ms;
        self
    }

    pub fn with_fault_policy(mut self, fault_policy: FaultPolicy) -> Self {
        self.fault_policy = fault_policy;
        self
    }

    pub fn orders(&self) -> &[OrderId] {
        &self.orders
    }

    pub fn intake_workers(&self) -> usize {
        self.intake_workers
    }

    pub fn prep_workers(&self) -> usize {
        self.prep_workers
    }

    pub fn delivery_workers(&self) -> usize {
        self.delivery_workers
    }

    pub fn processing_delay(&self) -> DelayRange {
        self.processing_delay
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn idle_backoff(&self) -> Duration {
        Duration::from_millis(self.idle_backoff_ms)
    }

    pub fn fault_policy(&self) -> FaultPolicy {
        self.fault_policy
    }

    /// 起動前の設定検証
    ///
    /// 注文があるのにワーカー0人のステージがあると完了条件が満たされずデッドロックする。
    pub fn validate(&self) -> PipelineResult<()> {
        if !self.orders.is_empty() {
            for (field, workers) in [
                ("intake_workers", self.intake_workers),
                ("prep_workers", self.prep_workers),
                ("delivery_workers", self.delivery_workers),
            ] {
                if workers == 0 {
                    return Err(PipelineError::validation(
                        field,
                        format!(
                            "must be at least 1 when {} orders are queued",
                            self.orders.len()
                        ),
                    ));
                }
            }
        }

        let mut seen = HashSet::with_capacity(self.orders.len());
        if let Some(duplicate) = self.orders.iter().find(|id| !seen.insert(*id)) {
            return Err(PipelineError::validation(
                "orders",
                format!("duplicate order id '{duplicate}'"),
            ));
        }

        if self.processing_delay.min_ms > self.processing_delay.max_ms {
            return Err(PipelineError::validation(
                "processing_delay",
                format!(
                    "min_ms ({}) is greater than max_ms ({})",
                    self.processing_delay.min_ms, self.processing_delay.max_ms
                ),
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err(PipelineError::validation(
                "poll_interval_ms",
                "must be at least 1",
            ));
        }

        if self.fault_policy.max_attempts() == 0 {
            return Err(PipelineError::validation(
                "fault_policy",
                "max_attempts must be at least 1",
            ));
        }

        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
