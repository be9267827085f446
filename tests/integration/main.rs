// 統合テスト - パイプライン全体の性質を検証

#[path = "../fixtures/mod.rs"]
mod fixtures;

mod test_conservation;
mod test_contention;
mod test_error_handling;
mod test_fault_containment;
mod test_ordering;
mod test_pool_sizes;
mod test_scenario;
