// 統合テスト用ヘルパー

use order_pipeline::{
    core::{OrderId, PipelineReporter, PipelineResult, PipelineSummary, Recipe},
    engine::OrderPipeline,
    services::{MemoryReporter, PipelineConfig},
};
use std::collections::HashSet;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// 全注文が確定するまでの上限時間
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

/// 遅延なし・短いポーリング間隔の設定
pub fn quick_config() -> PipelineConfig {
    PipelineConfig::new(1)
        .with_processing_delay(0, 0)
        .with_poll_interval_ms(1)
}

/// `ticket-0`, `ticket-1`, ... 形式の注文ID
pub fn order_ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("ticket-{i}")).collect()
}

/// 別スレッドでパイプラインを実行し、上限時間内の完了を待つ
pub fn run_within<R, P>(pipeline: OrderPipeline<R, P>, limit: Duration) -> PipelineResult<PipelineSummary>
where
    R: Recipe + 'static,
    P: PipelineReporter + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(pipeline.run());
    });

    rx.recv_timeout(limit)
        .unwrap_or_else(|_| panic!("pipeline did not settle within {limit:?}"))
}

/// MemoryReporterで記録しながら実行
pub fn run_recorded<R>(config: PipelineConfig, recipe: R) -> (PipelineSummary, MemoryReporter)
where
    R: Recipe + 'static,
{
    let reporter = MemoryReporter::new();
    let pipeline = OrderPipeline::new(config, recipe, reporter.clone());
    let summary = run_within(pipeline, SETTLE_TIMEOUT).unwrap();
    (summary, reporter)
}

/// 配達済みIDが期待集合と一致し、重複がないこと
pub fn assert_delivered_exactly_once<S: AsRef<str>>(reporter: &MemoryReporter, expected: &[S]) {
    let delivered = reporter.delivered_ids();
    let unique: HashSet<&OrderId> = delivered.iter().collect();
    assert_eq!(
        unique.len(),
        delivered.len(),
        "order delivered more than once: {delivered:?}"
    );

    let expected: HashSet<OrderId> = expected.iter().map(|id| OrderId::new(id.as_ref())).collect();
    let delivered: HashSet<OrderId> = delivered.into_iter().collect();
    assert_eq!(delivered, expected);
}
