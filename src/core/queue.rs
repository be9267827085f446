// 並行キュー - 複数Producer/複数ConsumerのFIFO

use crossbeam_queue::SegQueue;

/// スレッドセーフなMPMC FIFOキュー
///
/// `enqueue`は常に成功し、`try_take`はブロックしない。
/// 通知機構は持たないため、Consumer側はポーリングで取り出す。
/// FIFO順序は同一インスタンス内の取り出しに対してのみ保証される。
#[derive(Debug)]
pub struct ConcurrentQueue<T> {
    inner: SegQueue<T>,
}

impl<T> ConcurrentQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: SegQueue::new(),
        }
    }

    /// 末尾に要素を追加
    pub fn enqueue(&self, item: T) {
        self.inner.push(item);
    }

    /// 先頭要素の取り出しを試みる（空なら`None`）
    pub fn try_take(&self) -> Option<T> {
        self.inner.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> Default for ConcurrentQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for ConcurrentQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let queue = Self::new();
        for item in iter {
            queue.enqueue(item);
        }
        queue
    }
}
