// 汎用レシピ実装 - 即時完了と障害注入

use crate::core::{OrderId, Recipe};
use anyhow::{bail, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// 何もせず即座に成功するレシピ
#[derive(Debug, Default, Clone)]
pub struct InstantRecipe;

impl InstantRecipe {
    pub fn new() -> Self {
        Self
    }
}

impl Recipe for InstantRecipe {
    fn name(&self) -> &str {
        "instant"
    }

    fn perform(&self, _cook: &str, _order: Option<OrderId>) -> Result<()> {
        Ok(())
    }
}

/// 障害の起こし方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFault {
    /// エラーを返す
    Error,
    /// パニックする
    Panic,
}

/// 指定した注文で失敗させるレシピのラッパー
///
/// `failures_per_order`を指定すると、その回数だけ失敗した後は内側のレシピに委譲する。
/// 未指定なら対象注文は毎回失敗する。
#[derive(Debug)]
pub struct FaultInjectingRecipe<R> {
    inner: R,
    faulty: HashSet<OrderId>,
    failures_per_order: Option<u32>,
    fault: InjectedFault,
    attempts: Mutex<HashMap<OrderId, u32>>,
}

impl<R: Recipe> FaultInjectingRecipe<R> {
    pub fn new<I>(inner: R, faulty: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<OrderId>,
    {
        Self {
            inner,
            faulty: faulty.into_iter().map(Into::into).collect(),
            failures_per_order: None,
            fault: InjectedFault::Error,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    /// 最初のn回だけ失敗させる
    pub fn failing_first(mut self, failures: u32) -> Self {
        self.failures_per_order = Some(failures);
        self
    }

    pub fn with_fault(mut self, fault: InjectedFault) -> Self {
        self.fault = fault;
        self
    }

    /// 対象注文に対するこれまでの試行回数
    pub fn attempts_for(&self, id: &OrderId) -> u32 {
        self.attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(id)
            .copied()
            .unwrap_or(0)
    }

    fn should_fail(&self, id: &OrderId) -> bool {
        if !self.faulty.contains(id) {
            return false;
        }

        let mut attempts = self
            .attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let count = attempts.entry(id.clone()).or_insert(0);
        *count += 1;

        match self.failures_per_order {
            Some(limit) => *count <= limit,
            None => true,
        }
    }
}

impl<R: Recipe> Recipe for FaultInjectingRecipe<R> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn perform(&self, cook: &str, order: Option<OrderId>) -> Result<()> {
        if let Some(id) = order.as_ref() {
            if self.should_fail(id) {
                match self.fault {
                    InjectedFault::Error => bail!("{cook} burnt order {id}"),
                    InjectedFault::Panic => panic!("{cook} dropped the pan on order {id}"),
                }
            }
        }
        self.inner.perform(cook, order)
    }
}
