// Worker - 注文1件の準備処理

use crate::core::{Order, OrderFault, PipelineReporter, PreparationOutcome, Recipe};
use crate::services::config::{DelayRange, FaultPolicy};
use rand::Rng;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;
use tracing::warn;

/// 調理時間を範囲内から一様に選ぶ
pub fn cook_time(delay: DelayRange) -> Duration {
    if delay.min_ms >= delay.max_ms {
        return Duration::from_millis(delay.min_ms);
    }
    Duration::from_millis(rand::rng().random_range(delay.min_ms..=delay.max_ms))
}

/// 単一注文の準備
///
/// 調理時間だけ待ってからレシピを実行する。レシピのエラーやパニックは
/// ここで捕捉し、ポリシーに従って再試行または破棄する。呼び出し元には伝播しない。
pub fn prepare_order<R, P>(
    recipe: &R,
    reporter: &P,
    order: &Order,
    worker: &str,
    delay: DelayRange,
    policy: FaultPolicy,
) -> PreparationOutcome
where
    R: Recipe + ?Sized,
    P: PipelineReporter + ?Sized,
{
    let max_attempts = policy.max_attempts().max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        let pause = cook_time(delay);
        if !pause.is_zero() {
            std::thread::sleep(pause);
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            recipe.perform(worker, Some(order.id.clone()))
        }));

        let message = match result {
            Ok(Ok(())) => return PreparationOutcome::Prepared { attempts: attempt },
            Ok(Err(error)) => format!("{error:#}"),
            Err(payload) => panic_message(payload.as_ref()),
        };

        let dropped = attempt >= max_attempts;
        warn!(
            order = %order.id,
            worker,
            attempt,
            dropped,
            "preparation failed: {message}"
        );
        reporter.report_fault(&OrderFault {
            order_id: order.id.clone(),
            worker: worker.to_string(),
            attempt,
            message: message.clone(),
            dropped,
        });

        if dropped {
            return PreparationOutcome::Dropped {
                attempts: attempt,
                reason: message,
            };
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}
