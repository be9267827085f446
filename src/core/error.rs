// Custom error types for the order pipeline
// パイプライン専用のカスタムエラー型定義

use thiserror::Error;

/// パイプライン固有のエラー型
///
/// 注文単位の障害はワーカー内で処理されるため、ここには含まれない。
/// ここに現れるのはオーケストレーターまで伝播する起動・終了時のエラーのみ。
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("バリデーションエラー: {field} - {reason}")]
    ValidationError { field: String, reason: String },

    #[error("設定読み込みエラー: {path} - {source}")]
    ConfigLoadError {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("スレッド起動エラー: {worker} - {source}")]
    SpawnError {
        worker: String,
        #[source]
        source: std::io::Error,
    },

    #[error("ワーカーがパニックしました: {worker}")]
    WorkerPanicked { worker: String },

    #[error("タスクエラー: {source}")]
    TaskError {
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("永続化エラー: {source}")]
    PersistenceError {
        #[source]
        source: anyhow::Error,
    },
}

/// パイプライン処理の結果型
pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// バリデーションエラーの作成
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// 設定読み込みエラーの作成
    pub fn config_load(path: impl Into<String>, source: anyhow::Error) -> Self {
        Self::ConfigLoadError {
            path: path.into(),
            source,
        }
    }

    /// スレッド起動エラーの作成
    pub fn spawn(worker: impl Into<String>, source: std::io::Error) -> Self {
        Self::SpawnError {
            worker: worker.into(),
            source,
        }
    }

    pub fn worker_panicked(worker: impl Into<String>) -> Self {
        Self::WorkerPanicked {
            worker: worker.into(),
        }
    }

    /// タスクエラーの作成
    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::TaskError { source }
    }

    /// 永続化エラーの作成
    pub fn persistence(source: anyhow::Error) -> Self {
        Self::PersistenceError { source }
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ValidationError { .. } | Self::ConfigurationError { .. } => {
                ErrorSeverity::Critical
            }
            Self::ConfigLoadError { .. } | Self::SpawnError { .. } => ErrorSeverity::High,
            Self::WorkerPanicked { .. } | Self::TaskError { .. } => ErrorSeverity::High,
            Self::PersistenceError { .. } => ErrorSeverity::Medium,
        }
    }

    /// エラーが回復可能かどうかを判定
    ///
    /// 設定起因のエラーは再実行しても結果が変わらない。
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ValidationError { .. } | Self::ConfigurationError { .. } => false,
            Self::ConfigLoadError { .. } => false,
            Self::SpawnError { .. } => true,
            Self::WorkerPanicked { .. } => false,
            Self::TaskError { .. } => false,
            Self::PersistenceError { .. } => true,
        }
    }
}

/// エラーの重要度レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 低重要度 - ログ出力程度
    Low,
    /// 中重要度 - 警告レベル
    Medium,
    /// 高重要度 - 要対応
    High,
    /// 致命的 - 起動中止レベル
    Critical,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}
