// ワーカー数の組み合わせに依らず全注文が確定する
use crate::fixtures::*;
use order_pipeline::services::InstantRecipe;

#[test]
fn test_pool_size_combinations_all_settle() {
    let ids = order_ids(10);

    for intake in 1..=3 {
        for prep in 1..=3 {
            for delivery in 1..=3 {
                let config = quick_config()
                    .with_orders(ids.clone())
                    .with_workers(intake, prep, delivery)
                    .with_processing_delay(0, 3);

                let (summary, reporter) = run_recorded(config, InstantRecipe::new());

                assert_eq!(
                    summary.delivered_orders, 10,
                    "workers {intake}/{prep}/{delivery}"
                );
                assert_eq!(summary.intake_workers, intake);
                assert_eq!(summary.prep_workers, prep);
                assert_eq!(summary.delivery_workers, delivery);
                assert_delivered_exactly_once(&reporter, &ids);
            }
        }
    }
}
