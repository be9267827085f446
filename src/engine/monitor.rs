// Monitor - 完了監視

use crate::core::{PipelineContext, PipelineError, PipelineResult};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// 配達済み+破棄済みが総数に達したら稼働シグナルを落とす監視ループ
///
/// 正常終了時に稼働シグナルを書き込むのはこの監視ループのみ。条件はレベルトリガーなので
/// 毎回のポーリングで再評価しても問題ない。ワーカーのパニックなどで先にシグナルが
/// 落とされた場合は、確定を待たずに終了する。
pub struct CompletionMonitor {
    context: Arc<PipelineContext>,
    poll_interval: Duration,
}

/// 監視ループの実行結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorReport {
    pub polls: u64,
    /// falseなら全注文の確定前に中断された
    pub settled: bool,
}

impl CompletionMonitor {
    pub fn new(context: Arc<PipelineContext>, poll_interval: Duration) -> Self {
        Self {
            context,
            poll_interval,
        }
    }

    /// 呼び出しスレッドで監視ループを実行
    pub fn run(&self) -> MonitorReport {
        let counters = &self.context.counters;
        let mut polls = 0;

        loop {
            polls += 1;
            if counters.settled() {
                self.context.active.deactivate();
                info!(
                    total = counters.total(),
                    delivered = counters.delivered(),
                    dropped = counters.dropped(),
                    polls,
                    "all orders settled, kitchen closing"
                );
                return MonitorReport {
                    polls,
                    settled: true,
                };
            }

            if !self.context.active.is_active() {
                warn!(
                    total = counters.total(),
                    delivered = counters.delivered(),
                    dropped = counters.dropped(),
                    polls,
                    "pipeline stopped before all orders settled"
                );
                return MonitorReport {
                    polls,
                    settled: false,
                };
            }

            debug!(
                delivered = counters.delivered(),
                dropped = counters.dropped(),
                in_flight = self.context.in_flight(),
                "waiting for orders"
            );
            thread::sleep(self.poll_interval);
        }
    }

    /// 専用スレッドで監視ループを起動
    pub fn spawn(self) -> PipelineResult<MonitorHandle> {
        let handle = thread::Builder::new()
            .name("completion-monitor".to_string())
            .spawn(move || self.run())
            .map_err(|e| PipelineError::spawn("completion-monitor", e))?;
        Ok(MonitorHandle { handle })
    }
}

/// 起動済み監視スレッドのハンドル
pub struct MonitorHandle {
    handle: JoinHandle<MonitorReport>,
}

impl MonitorHandle {
    /// 全注文が確定するまで待機
    pub fn join(self) -> PipelineResult<MonitorReport> {
        self.handle
            .join()
            .map_err(|_| PipelineError::worker_panicked("completion-monitor"))
    }
}
