// 受付2・調理3・配達2、遅延0〜50ms、ポーリング10msの5注文シナリオ
use crate::fixtures::*;
use order_pipeline::{
    engine::OrderPipeline,
    services::{InstantRecipe, MemoryReporter, PipelineConfig},
};

fn scenario_config() -> PipelineConfig {
    PipelineConfig::new(1)
        .with_orders(["A", "B", "C", "D", "E"])
        .with_workers(2, 3, 2)
        .with_processing_delay(0, 50)
        .with_poll_interval_ms(10)
}

#[test]
fn test_five_order_scenario() {
    let (summary, reporter) = run_recorded(scenario_config(), InstantRecipe::new());

    assert_eq!(summary.total_orders, 5);
    assert_eq!(summary.delivered_orders, 5);
    assert!(summary.dropped_ids.is_empty());
    assert_delivered_exactly_once(&reporter, &["A", "B", "C", "D", "E"]);
    assert_eq!(reporter.completed_summary(), Some(summary));
}

#[tokio::test]
async fn test_five_order_scenario_async() {
    let reporter = MemoryReporter::new();
    let pipeline = OrderPipeline::new(scenario_config(), InstantRecipe::new(), reporter.clone());

    let summary = tokio::time::timeout(SETTLE_TIMEOUT, pipeline.run_async())
        .await
        .expect("pipeline did not settle in time")
        .unwrap();

    assert_eq!(summary.delivered_orders, 5);
    assert_delivered_exactly_once(&reporter, &["A", "B", "C", "D", "E"]);
}
