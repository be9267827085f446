// 競合下でも二重カウントしない
use crate::fixtures::*;
use order_pipeline::services::InstantRecipe;

#[test]
fn test_no_double_counting_under_contention() {
    let ids = order_ids(100);

    for round in 0..20 {
        let config = quick_config()
            .with_orders(ids.clone())
            .with_workers(8, 8, 8)
            .with_idle_backoff_ms(0);

        let (summary, reporter) = run_recorded(config, InstantRecipe::new());

        assert_eq!(summary.delivered_orders, 100, "round {round}");
        assert_eq!(reporter.delivered_ids().len(), 100, "round {round}");
        assert_delivered_exactly_once(&reporter, &ids);
    }
}

#[test]
fn test_contention_with_processing_delay() {
    let ids = order_ids(100);
    let config = quick_config()
        .with_orders(ids.clone())
        .with_workers(8, 8, 8)
        .with_processing_delay(0, 5);

    let (summary, reporter) = run_recorded(config, InstantRecipe::new());

    assert_eq!(summary.delivered_orders, 100);
    assert_delivered_exactly_once(&reporter, &ids);
}
