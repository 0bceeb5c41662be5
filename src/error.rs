use thiserror::Error;

/// ファサードエンジンのエラー
///
/// 入力エラーとリソースエラーはディスパッチ境界でログに記録して
/// 吸収される。外部依存エラー（スクリプトロード失敗）はローダーに
/// 記憶され、以降の呼び出しにも同じエラーが返る。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FacadeError {
    #[error("Element is not part of the document")]
    ElementNotFound,

    #[error("No video ID found on element")]
    MissingVideoId,

    #[error("Invalid video ID: {0}")]
    InvalidVideoId(String),

    #[error("No matching target for selector: {0}")]
    TargetNotFound(String),

    #[error("Modal overlay has not been set up")]
    ModalUnavailable,

    #[error("Player API script failed to load: {0}")]
    ScriptLoadFailed(String),

    #[error("Player construction failed: {0}")]
    PlayerCreationFailed(String),

    #[error("Element is already activated")]
    AlreadyActivated,
}

impl From<FacadeError> for String {
    fn from(err: FacadeError) -> String {
        err.to_string()
    }
}
