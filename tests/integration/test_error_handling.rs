// エラーハンドリング統合テスト
use crate::fixtures::*;
use order_pipeline::{
    core::{ErrorSeverity, PipelineError},
    engine::OrderPipeline,
    services::{write_summary_json, FaultPolicy, InstantRecipe, NoOpReporter, PipelineConfig},
};
use std::fs;
use tempfile::TempDir;

fn run_invalid(config: PipelineConfig) -> PipelineError {
    OrderPipeline::new(config, InstantRecipe::new(), NoOpReporter::new())
        .run()
        .unwrap_err()
}

#[test]
fn test_zero_workers_with_orders_is_rejected() {
    for (workers, field) in [
        ((0, 1, 1), "intake_workers"),
        ((1, 0, 1), "prep_workers"),
        ((1, 1, 0), "delivery_workers"),
    ] {
        let config = quick_config()
            .with_orders(["A"])
            .with_workers(workers.0, workers.1, workers.2);

        match run_invalid(config) {
            PipelineError::ValidationError { field: reported, .. } => assert_eq!(reported, field),
            other => panic!("Expected ValidationError, got {other:?}"),
        }
    }
}

#[test]
fn test_invalid_settings_are_rejected() {
    let cases = [
        quick_config().with_processing_delay(10, 5),
        quick_config().with_poll_interval_ms(0),
        quick_config().with_fault_policy(FaultPolicy::Retry { max_attempts: 0 }),
        quick_config().with_orders(["A", "B", "A"]),
    ];

    for config in cases {
        let error = run_invalid(config);
        assert!(matches!(error, PipelineError::ValidationError { .. }));
        assert_eq!(error.severity(), ErrorSeverity::Critical);
        assert!(!error.is_recoverable());
    }
}

#[test]
fn test_config_file_errors() {
    let temp_dir = TempDir::new().unwrap();

    let missing = temp_dir.path().join("missing.json");
    let error = PipelineConfig::from_json_file(&missing).unwrap_err();
    assert!(matches!(error, PipelineError::ConfigLoadError { .. }));

    let broken = temp_dir.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();
    let error = PipelineConfig::from_json_file(&broken).unwrap_err();
    assert!(matches!(error, PipelineError::ConfigLoadError { .. }));
    assert!(error.to_string().contains("broken.json"));
}

#[test]
fn test_config_file_drives_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pipeline.json");
    fs::write(
        &path,
        r#"{
            "orders": ["A", "B", "C"],
            "intake_workers": 1,
            "prep_workers": 2,
            "delivery_workers": 1,
            "processing_delay": { "min_ms": 0, "max_ms": 1 },
            "poll_interval_ms": 1,
            "fault_policy": { "policy": "drop" }
        }"#,
    )
    .unwrap();

    let config = PipelineConfig::from_json_file(&path).unwrap();
    assert_eq!(config.fault_policy(), FaultPolicy::Drop);

    let (summary, reporter) = run_recorded(config, InstantRecipe::new());
    assert_eq!(summary.delivered_orders, 3);
    assert_delivered_exactly_once(&reporter, &["A", "B", "C"]);
}

#[test]
fn test_summary_write_to_missing_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    let (summary, _) = run_recorded(quick_config().with_orders(["A"]), InstantRecipe::new());

    let path = temp_dir.path().join("no_such_dir").join("summary.json");
    let error = write_summary_json(&path, &summary).unwrap_err();

    assert!(matches!(error, PipelineError::PersistenceError { .. }));
}

#[test]
fn test_worker_panic_stops_pipeline_with_error() {
    use order_pipeline::core::{DeliveryEvent, OrderFault, PipelineReporter, PipelineSummary};

    struct JammedPrinter;
    impl PipelineReporter for JammedPrinter {
        fn report_started(&self, _total_orders: usize) {}
        fn report_delivered(&self, event: &DeliveryEvent) {
            if event.sequence == 2 {
                panic!("printer jammed");
            }
        }
        fn report_fault(&self, _fault: &OrderFault) {}
        fn report_completed(&self, _summary: &PipelineSummary) {}
    }

    let config = quick_config().with_order_count(20).with_workers(2, 2, 1);
    let pipeline = OrderPipeline::new(config, InstantRecipe::new(), JammedPrinter);

    match run_within(pipeline, SETTLE_TIMEOUT) {
        Err(PipelineError::WorkerPanicked { worker }) => assert_eq!(worker, "delivery-0"),
        other => panic!("Expected WorkerPanicked, got {other:?}"),
    }
}
