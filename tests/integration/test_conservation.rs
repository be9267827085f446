// 保存則: 全注文がちょうど1回ずつ配達される
use crate::fixtures::*;
use order_pipeline::services::InstantRecipe;
use std::time::{Duration, Instant};

#[test]
fn test_every_order_delivered_exactly_once() {
    for count in [1, 7, 50] {
        let ids = order_ids(count);
        let config = quick_config()
            .with_orders(ids.clone())
            .with_workers(2, 2, 2)
            .with_processing_delay(0, 2);

        let (summary, reporter) = run_recorded(config, InstantRecipe::new());

        assert_eq!(summary.total_orders, count);
        assert_eq!(summary.delivered_orders, count);
        assert_eq!(summary.dropped_orders, 0);
        assert!(summary.is_settled());
        assert_delivered_exactly_once(&reporter, &ids);
    }
}

#[test]
fn test_delivery_sequence_numbers_are_unique() {
    let config = quick_config().with_order_count(30).with_workers(2, 3, 3);

    let (_, reporter) = run_recorded(config, InstantRecipe::new());

    let mut sequences: Vec<_> = reporter.delivered_events().iter().map(|e| e.sequence).collect();
    sequences.sort_unstable();
    assert_eq!(sequences, (1..=30).collect::<Vec<_>>());
}

#[test]
fn test_empty_input_terminates_immediately() {
    let started = Instant::now();
    let config = quick_config().with_workers(3, 3, 3);

    let (summary, reporter) = run_recorded(config, InstantRecipe::new());

    assert_eq!(summary.total_orders, 0);
    assert_eq!(summary.delivered_orders, 0);
    assert!(reporter.delivered_ids().is_empty());
    assert_eq!(reporter.started_with(), Some(0));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_empty_input_allows_empty_pools() {
    let config = quick_config().with_workers(0, 0, 0);

    let (summary, _) = run_recorded(config, InstantRecipe::new());

    assert_eq!(summary.delivered_orders, 0);
    assert_eq!(summary.prep_workers, 0);
}
