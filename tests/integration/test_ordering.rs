// 各ステージ1ワーカーなら配達順は投入順と一致する
use crate::fixtures::*;
use order_pipeline::core::OrderId;
use order_pipeline::services::{BreakfastMenu, BreakfastRecipe, InstantRecipe};

#[test]
fn test_single_worker_per_stage_preserves_order() {
    let ids = order_ids(25);
    let config = quick_config().with_orders(ids.clone()).with_workers(1, 1, 1);

    let (_, reporter) = run_recorded(config, InstantRecipe::new());

    let expected: Vec<OrderId> = ids.into_iter().map(OrderId::new).collect();
    assert_eq!(reporter.delivered_ids(), expected);
}

#[test]
fn test_single_worker_breakfast_recipe_preserves_order() {
    let config = quick_config()
        .with_orders(["A", "B", "C"])
        .with_workers(1, 1, 1);
    let recipe = BreakfastRecipe::new(BreakfastMenu::Bacon).with_time_scale(0.0);

    let (summary, reporter) = run_recorded(config, recipe);

    assert_eq!(summary.delivered_orders, 3);
    assert_eq!(
        reporter.delivered_ids(),
        vec![OrderId::new("A"), OrderId::new("B"), OrderId::new("C")]
    );
}
