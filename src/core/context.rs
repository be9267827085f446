// 共有状態 - キュー、カウンター、稼働シグナル
// オーケストレーターが構築し、Arc<PipelineContext>で全スレッドに配布する

use super::queue::ConcurrentQueue;
use super::types::{Order, OrderId};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// 稼働シグナル
///
/// true → false へ一度だけ遷移する。書き込むのはCompletionMonitor（起動失敗時のみオーケストレーター）。
#[derive(Debug)]
pub struct ActiveSignal {
    active: AtomicBool,
}

impl ActiveSignal {
    pub fn new() -> Self {
        Self {
            active: AtomicBool::new(true),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// 非稼働に遷移させる。この呼び出しで遷移した場合のみtrue
    pub fn deactivate(&self) -> bool {
        self.active
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for ActiveSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// 注文カウンター
#[derive(Debug)]
pub struct OrderCounters {
    total: usize,
    delivered: AtomicUsize,
    dropped: AtomicUsize,
    dropped_ids: Mutex<Vec<OrderId>>,
}

impl OrderCounters {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            delivered: AtomicUsize::new(0),
            dropped: AtomicUsize::new(0),
            dropped_ids: Mutex::new(Vec::new()),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn delivered(&self) -> usize {
        self.delivered.load(Ordering::Acquire)
    }

    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Acquire)
    }

    /// 配達済みをインクリメントし、インクリメント後の値を返す
    pub fn record_delivered(&self) -> usize {
        self.delivered.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// 破棄された注文を記録
    pub fn record_dropped(&self, id: OrderId) {
        // ロック中にパニックしても記録自体は有効なので中身を取り出して続行
        let mut ids = self
            .dropped_ids
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        ids.push(id);
        // ID記録後にカウントすることで、settled時点でdropped_idsが揃っている
        self.dropped.fetch_add(1, Ordering::AcqRel);
    }

    pub fn dropped_ids(&self) -> Vec<OrderId> {
        self.dropped_ids
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// 全注文が配達済みまたは破棄済み
    pub fn settled(&self) -> bool {
        self.delivered() + self.dropped() >= self.total
    }
}

/// パイプライン全体で共有される状態
#[derive(Debug)]
pub struct PipelineContext {
    pub backlog: ConcurrentQueue<Order>,
    pub placed: ConcurrentQueue<Order>,
    pub completed: ConcurrentQueue<Order>,
    pub counters: OrderCounters,
    pub active: ActiveSignal,
}

impl PipelineContext {
    /// 全シード注文をBacklogに投入済みのコンテキストを作成
    ///
    /// スレッド起動前に呼ぶことで、totalとBacklogが全スレッドから見える状態で開始する。
    pub fn seeded<I>(orders: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<OrderId>,
    {
        let backlog: ConcurrentQueue<Order> = orders.into_iter().map(Order::new).collect();
        let total = backlog.len();

        Self {
            backlog,
            placed: ConcurrentQueue::new(),
            completed: ConcurrentQueue::new(),
            counters: OrderCounters::new(total),
            active: ActiveSignal::new(),
        }
    }

    /// 処理中（いずれかのキューに存在する）注文数
    pub fn in_flight(&self) -> usize {
        self.backlog.len() + self.placed.len() + self.completed.len()
    }
}
