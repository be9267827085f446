// パイプラインのトレイト定義
// ワーカーから呼び出される外部協調者の抽象化

use super::types::{DeliveryEvent, OrderFault, OrderId, PipelineSummary};
use anyhow::Result;
use mockall::automock;

/// 準備ステージで実行される作業単位（レシピ）の抽象化
///
/// `cook`は実行中のワーカー名。注文なしで呼ばれた場合は単発の調理として扱う。
#[automock]
pub trait Recipe: Send + Sync {
    /// レシピ名
    fn name(&self) -> &str;

    /// 作業単位を実行し、成功/失敗を返す
    fn perform(&self, cook: &str, order: Option<OrderId>) -> Result<()>;
}

// Recipe for Box<dyn Recipe>
impl Recipe for Box<dyn Recipe> {
    fn name(&self) -> &str {
        self.as_ref().name()
    }

    fn perform(&self, cook: &str, order: Option<OrderId>) -> Result<()> {
        self.as_ref().perform(cook, order)
    }
}

/// パイプラインの観測可能な出力を抽象化するトレイト
///
/// ワーカースレッドから直接呼ばれるため同期APIとする。
#[automock]
pub trait PipelineReporter: Send + Sync {
    /// 処理開始時の報告
    fn report_started(&self, total_orders: usize);

    /// 注文1件の配達完了
    fn report_delivered(&self, event: &DeliveryEvent);

    /// 準備ステージでの障害
    fn report_fault(&self, fault: &OrderFault);

    /// 全注文の処理完了
    fn report_completed(&self, summary: &PipelineSummary);
}

// PipelineReporter for Box<dyn PipelineReporter>
impl PipelineReporter for Box<dyn PipelineReporter> {
    fn report_started(&self, total_orders: usize) {
        self.as_ref().report_started(total_orders)
    }

    fn report_delivered(&self, event: &DeliveryEvent) {
        self.as_ref().report_delivered(event)
    }

    fn report_fault(&self, fault: &OrderFault) {
        self.as_ref().report_fault(fault)
    }

    fn report_completed(&self, summary: &PipelineSummary) {
        self.as_ref().report_completed(summary)
    }
}
