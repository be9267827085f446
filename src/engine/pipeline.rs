// Pipeline - 受付 → 調理 → 配達 の多段Producer-Consumerパイプライン
// キュー・カウンターの構築、ワーカープールと監視ループの起動、終了待機

use super::{
    consumer::{WorkerPool, WorkerSettings},
    monitor::CompletionMonitor,
};
use crate::{
    core::{
        PipelineContext, PipelineError, PipelineReporter, PipelineResult, PipelineSummary, Recipe,
        Stage,
    },
    services::config::PipelineConfig,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// 注文パイプラインのオーケストレーター
///
/// 依存関係（レシピ、報告先）はコンストラクタで注入し、Arcで各ワーカーと共有する。
pub struct OrderPipeline<R, P> {
    config: PipelineConfig,
    recipe: Arc<R>,
    reporter: Arc<P>,
}

impl<R, P> OrderPipeline<R, P>
where
    R: Recipe + 'static,
    P: PipelineReporter + 'static,
{
    pub fn new(config: PipelineConfig, recipe: R, reporter: P) -> Self {
        Self {
            config,
            recipe: Arc::new(recipe),
            reporter: Arc::new(reporter),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn reporter(&self) -> &P {
        &self.reporter
    }

    /// 全注文を処理し、全ワーカーの終了を待ってからサマリーを返す
    pub fn run(&self) -> PipelineResult<PipelineSummary> {
        self.config.validate()?;

        let started_at = Utc::now();
        let start_time = Instant::now();

        // 全スレッド起動前にtotalとBacklogを確定させる
        let context = Arc::new(PipelineContext::seeded(self.config.orders().iter().cloned()));
        let total_orders = context.counters.total();

        info!(
            total_orders,
            intake_workers = self.config.intake_workers(),
            prep_workers = self.config.prep_workers(),
            delivery_workers = self.config.delivery_workers(),
            recipe = self.recipe.name(),
            "starting order pipeline"
        );
        self.reporter.report_started(total_orders);

        let mut pools = Vec::with_capacity(Stage::ALL.len());
        let monitor = match self.start_pools(&context, &mut pools).and_then(|_| {
            CompletionMonitor::new(Arc::clone(&context), self.config.poll_interval()).spawn()
        }) {
            Ok(monitor) => monitor,
            Err(error) => {
                Self::abort(&context, pools);
                return Err(error);
            }
        };

        // 監視ループの終了 = 全注文の確定。その後、残りのワーカーが抜けるのを待つ
        let monitor_result = monitor.join();
        if monitor_result.is_err() {
            // 監視ループがパニックした場合もワーカーを止める
            context.active.deactivate();
        }
        let pool_result = Self::join_pools(pools);
        monitor_result?;
        pool_result?;

        let summary = PipelineSummary {
            total_orders,
            delivered_orders: context.counters.delivered(),
            dropped_orders: context.counters.dropped(),
            dropped_ids: context.counters.dropped_ids(),
            intake_workers: self.config.intake_workers(),
            prep_workers: self.config.prep_workers(),
            delivery_workers: self.config.delivery_workers(),
            started_at,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            delivered = summary.delivered_orders,
            dropped = summary.dropped_orders,
            elapsed_ms = summary.elapsed_ms,
            "order pipeline finished"
        );
        self.reporter.report_completed(&summary);
        Ok(summary)
    }

    fn start_pools(
        &self,
        context: &Arc<PipelineContext>,
        pools: &mut Vec<WorkerPool>,
    ) -> PipelineResult<()> {
        let settings = WorkerSettings::from_config(&self.config);

        for stage in Stage::ALL {
            let count = match stage {
                Stage::Intake => self.config.intake_workers(),
                Stage::Preparation => self.config.prep_workers(),
                Stage::Delivery => self.config.delivery_workers(),
            };
            pools.push(WorkerPool::new(stage));
            if let Some(pool) = pools.last_mut() {
                pool.spawn_workers(count, context, &self.recipe, &self.reporter, settings)?;
            }
        }
        Ok(())
    }

    /// 起動途中の失敗時: 監視ループは存在しないため、ここでシグナルを落としてワーカーを回収する
    fn abort(context: &PipelineContext, pools: Vec<WorkerPool>) {
        context.active.deactivate();
        if let Err(join_error) = Self::join_pools(pools) {
            error!("worker failed while aborting pipeline: {join_error}");
        }
    }

    fn join_pools(pools: Vec<WorkerPool>) -> PipelineResult<()> {
        let mut first_error: Option<PipelineError> = None;

        for pool in pools {
            let stage = pool.stage();
            match pool.join() {
                Ok(handled) => info!(stage = %stage, handled, "worker pool stopped"),
                Err(error) => {
                    error!(stage = %stage, "worker pool failed: {error}");
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// 非同期コンテキストから実行する（ブロッキングスレッドプール上で`run`を呼ぶ）
    pub async fn run_async(self) -> PipelineResult<PipelineSummary> {
        tokio::task::spawn_blocking(move || self.run())
            .await
            .map_err(PipelineError::task)?
    }
}
