// 出力報告の具象実装

use crate::core::{DeliveryEvent, OrderFault, OrderId, PipelineReporter, PipelineSummary};
use std::sync::{Arc, Mutex};

/// コンソール出力による報告実装
///
/// 配達1件ごとに1行、完了時にサマリー1行を出力する。
#[derive(Debug, Default, Clone)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

impl PipelineReporter for ConsoleReporter {
    fn report_started(&self, total_orders: usize) {
        if !self.quiet {
            println!("🍳 Kitchen open: {total_orders} orders in the backlog");
        }
    }

    fn report_delivered(&self, event: &DeliveryEvent) {
        if !self.quiet {
            println!(
                "🛎️  [{}] order {} delivered by {} ({})",
                event.sequence,
                event.order_id,
                event.worker,
                event.delivered_at.format("%H:%M:%S%.3f")
            );
        }
    }

    fn report_fault(&self, fault: &OrderFault) {
        if !self.quiet {
            let outcome = if fault.dropped { "dropped" } else { "retrying" };
            eprintln!(
                "⚠️  order {} failed on {} (attempt {}, {outcome}): {}",
                fault.order_id, fault.worker, fault.attempt, fault.message
            );
        }
    }

    fn report_completed(&self, summary: &PipelineSummary) {
        if !self.quiet {
            println!(
                "✅ All orders settled! Delivered: {}/{}, Dropped: {}, Elapsed: {}ms",
                summary.delivered_orders,
                summary.total_orders,
                summary.dropped_orders,
                summary.elapsed_ms
            );
        }
    }
}

/// 何もしない報告実装（ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct NoOpReporter;

impl NoOpReporter {
    pub fn new() -> Self {
        Self
    }
}

impl PipelineReporter for NoOpReporter {
    fn report_started(&self, _total_orders: usize) {}

    fn report_delivered(&self, _event: &DeliveryEvent) {}

    fn report_fault(&self, _fault: &OrderFault) {}

    fn report_completed(&self, _summary: &PipelineSummary) {}
}

#[derive(Debug, Default)]
struct RecordedEvents {
    started: Option<usize>,
    delivered: Vec<DeliveryEvent>,
    faults: Vec<OrderFault>,
    completed: Option<PipelineSummary>,
}

/// 受け取ったイベントをメモリに記録する報告実装（テスト用）
///
/// クローンは同じ記録を共有するため、パイプラインに渡した後も結果を参照できる。
#[derive(Debug, Default, Clone)]
pub struct MemoryReporter {
    events: Arc<Mutex<RecordedEvents>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_events<T>(&self, f: impl FnOnce(&mut RecordedEvents) -> T) -> T {
        let mut events = self
            .events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut events)
    }

    /// 配達順の注文ID
    pub fn delivered_ids(&self) -> Vec<OrderId> {
        self.with_events(|e| e.delivered.iter().map(|d| d.order_id.clone()).collect())
    }

    pub fn delivered_events(&self) -> Vec<DeliveryEvent> {
        self.with_events(|e| e.delivered.clone())
    }

    pub fn faults(&self) -> Vec<OrderFault> {
        self.with_events(|e| e.faults.clone())
    }

    pub fn started_with(&self) -> Option<usize> {
        self.with_events(|e| e.started)
    }

    pub fn completed_summary(&self) -> Option<PipelineSummary> {
        self.with_events(|e| e.completed.clone())
    }
}

impl PipelineReporter for MemoryReporter {
    fn report_started(&self, total_orders: usize) {
        self.with_events(|e| e.started = Some(total_orders));
    }

    fn report_delivered(&self, event: &DeliveryEvent) {
        self.with_events(|e| e.delivered.push(event.clone()));
    }

    fn report_fault(&self, fault: &OrderFault) {
        self.with_events(|e| e.faults.push(fault.clone()));
    }

    fn report_completed(&self, summary: &PipelineSummary) {
        self.with_events(|e| e.completed = Some(summary.clone()));
    }
}
