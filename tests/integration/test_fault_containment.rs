// 障害の局所化: 一部の注文が失敗しても他の注文とワーカーは止まらない
use crate::fixtures::*;
use order_pipeline::core::OrderId;
use order_pipeline::services::{
    FaultInjectingRecipe, FaultPolicy, InjectedFault, InstantRecipe,
};
use std::collections::HashSet;

#[test]
fn test_drop_policy_drops_only_faulty_orders() {
    let ids = order_ids(20);
    let faulty = ["ticket-3", "ticket-11", "ticket-17"];
    let config = quick_config()
        .with_orders(ids.clone())
        .with_workers(2, 3, 2)
        .with_fault_policy(FaultPolicy::Drop);
    let recipe = FaultInjectingRecipe::new(InstantRecipe::new(), faulty);

    let (summary, reporter) = run_recorded(config, recipe);

    assert_eq!(summary.delivered_orders, 17);
    assert_eq!(summary.dropped_orders, 3);
    let dropped: HashSet<_> = summary.dropped_ids.iter().cloned().collect();
    let expected_dropped: HashSet<_> = faulty.map(OrderId::new).into();
    assert_eq!(dropped, expected_dropped);

    let healthy: Vec<&String> = ids.iter().filter(|id| !faulty.contains(&id.as_str())).collect();
    assert_delivered_exactly_once(&reporter, &healthy);
    assert_eq!(reporter.faults().len(), 3);
}

#[test]
fn test_retry_policy_recovers_transient_faults() {
    let ids = order_ids(10);
    let config = quick_config()
        .with_orders(ids.clone())
        .with_workers(1, 2, 1)
        .with_fault_policy(FaultPolicy::Retry { max_attempts: 3 });
    let recipe =
        FaultInjectingRecipe::new(InstantRecipe::new(), ["ticket-0", "ticket-5"]).failing_first(2);

    let (summary, reporter) = run_recorded(config, recipe);

    assert_eq!(summary.delivered_orders, 10);
    assert_eq!(summary.dropped_orders, 0);
    assert_delivered_exactly_once(&reporter, &ids);

    let faults = reporter.faults();
    assert_eq!(faults.len(), 4);
    assert!(faults.iter().all(|fault| !fault.dropped));
}

#[test]
fn test_retry_policy_drops_after_max_attempts() {
    let config = quick_config()
        .with_orders(["A", "B", "C"])
        .with_workers(1, 1, 1)
        .with_fault_policy(FaultPolicy::Retry { max_attempts: 4 });
    let recipe = FaultInjectingRecipe::new(InstantRecipe::new(), ["B"]);

    let (summary, reporter) = run_recorded(config, recipe);

    assert_eq!(summary.delivered_orders, 2);
    assert_eq!(summary.dropped_ids, vec![OrderId::new("B")]);
    let faults = reporter.faults();
    assert_eq!(faults.len(), 4);
    assert_eq!(faults.iter().filter(|fault| fault.dropped).count(), 1);
    assert_eq!(faults.last().map(|fault| fault.attempt), Some(4));
}

#[test]
fn test_panicking_recipe_does_not_kill_workers() {
    let ids = order_ids(12);
    let config = quick_config()
        .with_orders(ids.clone())
        .with_workers(1, 1, 1)
        .with_fault_policy(FaultPolicy::Drop);
    let recipe = FaultInjectingRecipe::new(InstantRecipe::new(), ["ticket-2", "ticket-8"])
        .with_fault(InjectedFault::Panic);

    let (summary, reporter) = run_recorded(config, recipe);

    assert_eq!(summary.delivered_orders, 10);
    assert_eq!(summary.dropped_orders, 2);
    assert!(summary.is_settled());
    assert!(reporter
        .faults()
        .iter()
        .all(|fault| fault.message.contains("dropped the pan")));
}
