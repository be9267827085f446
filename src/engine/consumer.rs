// Consumer - ステージワーカーとワーカープール

use crate::{
    core::{
        ConcurrentQueue, DeliveryEvent, Order, PipelineContext, PipelineError, PipelineReporter,
        PipelineResult, PreparationOutcome, Recipe, Stage,
    },
    services::{
        config::{DelayRange, FaultPolicy, PipelineConfig},
        processing::prepare_order,
    },
};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error};

/// 全ワーカー共通の動作設定
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkerSettings {
    pub delay: DelayRange,
    pub fault_policy: FaultPolicy,
    pub idle_backoff: Duration,
}

impl WorkerSettings {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            delay: config.processing_delay(),
            fault_policy: config.fault_policy(),
            idle_backoff: config.idle_backoff(),
        }
    }
}

/// 1スレッドで動くステージワーカー
///
/// 入力キューから取り出した注文を処理し、次のキューまたはカウンターへ送る。
/// `稼働中 || 入力キューが空でない` の間ループする。
pub struct StageWorker<R, P> {
    name: String,
    stage: Stage,
    context: Arc<PipelineContext>,
    recipe: Arc<R>,
    reporter: Arc<P>,
    settings: WorkerSettings,
}

impl<R, P> StageWorker<R, P>
where
    R: Recipe + 'static,
    P: PipelineReporter + 'static,
{
    pub fn new(
        name: impl Into<String>,
        stage: Stage,
        context: Arc<PipelineContext>,
        recipe: Arc<R>,
        reporter: Arc<P>,
        settings: WorkerSettings,
    ) -> Self {
        Self {
            name: name.into(),
            stage,
            context,
            recipe,
            reporter,
            settings,
        }
    }

    /// ワーカーループを実行し、処理した注文数を返す
    ///
    /// パニックで抜けた場合は保持中の注文が失われるため、稼働シグナルを落として全体を止める。
    pub fn run(self) -> usize {
        let _guard = UnwindGuard {
            worker: &self.name,
            context: &self.context,
        };
        debug!(worker = %self.name, stage = %self.stage, "worker started");
        let mut handled = 0;

        loop {
            let input = self.input();
            if !self.context.active.is_active() && input.is_empty() {
                break;
            }

            match input.try_take() {
                Some(order) => {
                    self.handle(order);
                    handled += 1;
                }
                None => self.idle(),
            }
        }

        debug!(worker = %self.name, stage = %self.stage, handled, "worker stopped");
        handled
    }

    fn input(&self) -> &ConcurrentQueue<Order> {
        match self.stage {
            Stage::Intake => &self.context.backlog,
            Stage::Preparation => &self.context.placed,
            Stage::Delivery => &self.context.completed,
        }
    }

    fn idle(&self) {
        if self.settings.idle_backoff.is_zero() {
            thread::yield_now();
        } else {
            thread::sleep(self.settings.idle_backoff);
        }
    }

    fn handle(&self, order: Order) {
        match self.stage {
            Stage::Intake => self.context.placed.enqueue(order),
            Stage::Preparation => {
                let outcome = prepare_order(
                    self.recipe.as_ref(),
                    self.reporter.as_ref(),
                    &order,
                    &self.name,
                    self.settings.delay,
                    self.settings.fault_policy,
                );
                match outcome {
                    PreparationOutcome::Prepared { .. } => self.context.completed.enqueue(order),
                    PreparationOutcome::Dropped { .. } => {
                        self.context.counters.record_dropped(order.id)
                    }
                }
            }
            Stage::Delivery => {
                let sequence = self.context.counters.record_delivered();
                self.reporter.report_delivered(&DeliveryEvent {
                    order_id: order.id,
                    worker: self.name.clone(),
                    sequence,
                    delivered_at: chrono::Utc::now(),
                });
            }
        }
    }
}

struct UnwindGuard<'a> {
    worker: &'a str,
    context: &'a PipelineContext,
}

impl Drop for UnwindGuard<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            error!(worker = %self.worker, "worker panicked, stopping pipeline");
            self.context.active.deactivate();
        }
    }
}

/// 同じステージを担当するワーカースレッドの集合
///
/// 同じ入力キューを共有するワーカー間の排他はキュー自身の原子性に任せる。
pub struct WorkerPool {
    stage: Stage,
    handles: Vec<(String, JoinHandle<usize>)>,
}

impl WorkerPool {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            handles: Vec::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// 起動済みワーカー数
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// ワーカーをcount個起動する
    ///
    /// 途中で起動に失敗した場合、それまでに起動したワーカーはプールに残る。
    pub fn spawn_workers<R, P>(
        &mut self,
        count: usize,
        context: &Arc<PipelineContext>,
        recipe: &Arc<R>,
        reporter: &Arc<P>,
        settings: WorkerSettings,
    ) -> PipelineResult<()>
    where
        R: Recipe + 'static,
        P: PipelineReporter + 'static,
    {
        for _ in 0..count {
            let name = format!("{}-{}", self.stage, self.handles.len());
            let worker = StageWorker::new(
                name.clone(),
                self.stage,
                Arc::clone(context),
                Arc::clone(recipe),
                Arc::clone(reporter),
                settings,
            );

            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || worker.run())
                .map_err(|e| PipelineError::spawn(&name, e))?;
            self.handles.push((name, handle));
        }
        Ok(())
    }

    /// 全ワーカーの終了を待ち、処理件数の合計を返す
    ///
    /// パニックしたワーカーがあっても残りは全て待ってから最初のエラーを返す。
    pub fn join(self) -> PipelineResult<usize> {
        let mut handled = 0;
        let mut first_error = None;

        for (name, handle) in self.handles {
            match handle.join() {
                Ok(count) => handled += count,
                Err(_) if first_error.is_none() => {
                    first_error = Some(PipelineError::worker_panicked(name));
                }
                Err(_) => {}
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(handled),
        }
    }
}
