//! Player APIスクリプトローダー
//!
//! 外部スクリプトのロードをシングルフライトで管理する。状態は
//! `{Unloaded, Loading, Ready, Failed}` の単方向遷移で、スクリプト
//! タグの挿入はページ（エンジン）の生存期間中ちょうど1回だけ起きる。
//!
//! 実際のスクリプト取得はホストの仕事であり、readyコールバック相当の
//! [`PlayerApiLoader::notify_ready`] / 失敗時の
//! [`PlayerApiLoader::notify_failure`] を通じて結果がこのローダーへ
//! 届く。失敗は終端状態で、以降の呼び出しにも同じエラーが返る
//! （リトライはしない）。

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::dom::SharedDocument;
use crate::error::FacadeError;
use crate::facade::player::PlayerApiHandle;

/// 外部Player APIスクリプトのURL
pub const PLAYER_API_SCRIPT_URL: &str = "https://www.youtube.com/iframe_api";

/// 挿入するスクリプトタグのID
pub const PLAYER_API_SCRIPT_ID: &str = "youtube-iframe-api";

type LoadResult = Result<PlayerApiHandle, FacadeError>;

enum LoadState {
    Unloaded,
    Loading {
        tx: watch::Sender<Option<LoadResult>>,
        rx: watch::Receiver<Option<LoadResult>>,
    },
    Ready(PlayerApiHandle),
    Failed(FacadeError),
}

impl LoadState {
    fn name(&self) -> &'static str {
        match self {
            LoadState::Unloaded => "unloaded",
            LoadState::Loading { .. } => "loading",
            LoadState::Ready(_) => "ready",
            LoadState::Failed(_) => "failed",
        }
    }
}

/// シングルフライトのスクリプトローダー
pub struct PlayerApiLoader {
    state: Mutex<LoadState>,
}

impl PlayerApiLoader {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LoadState::Unloaded),
        }
    }

    /// Player APIをロードする
    ///
    /// 最初の呼び出しだけがスクリプトタグを `<head>` に挿入し、同時に
    /// 到着した呼び出しは全て同じ結果を待つ。解決済みなら即座に同じ
    /// 値（または同じエラー）を返す。
    pub async fn load(&self, document: &SharedDocument) -> LoadResult {
        let mut rx = {
            let mut state = self.state.lock().unwrap();
            match &*state {
                LoadState::Ready(api) => return Ok(Arc::clone(api)),
                LoadState::Failed(err) => return Err(err.clone()),
                LoadState::Loading { rx, .. } => rx.clone(),
                LoadState::Unloaded => {
                    {
                        let mut doc = document.lock().unwrap();
                        let script = doc.create_element("script");
                        doc.set_attribute(script, "id", PLAYER_API_SCRIPT_ID);
                        doc.set_attribute(script, "src", PLAYER_API_SCRIPT_URL);
                        let head = doc.head();
                        doc.append_child(head, script);
                    }
                    log::info!("Player API script tag inserted: {}", PLAYER_API_SCRIPT_URL);
                    let (tx, rx) = watch::channel(None);
                    let waiter = rx.clone();
                    *state = LoadState::Loading { tx, rx };
                    waiter
                }
            }
        };

        loop {
            if let Some(result) = rx.borrow_and_update().clone() {
                return result;
            }
            if rx.changed().await.is_err() {
                return Err(FacadeError::ScriptLoadFailed(
                    "loader dropped before the API became ready".to_string(),
                ));
            }
        }
    }

    /// 外部スクリプトのreadyコールバックに相当する通知
    ///
    /// ロード待ちの全呼び出しに同じハンドルを配る。ロード要求より先に
    /// 届いた場合（ホストが先行ロード済み）はそのままReadyへ遷移する。
    pub fn notify_ready(&self, api: PlayerApiHandle) {
        let mut state = self.state.lock().unwrap();
        match std::mem::replace(&mut *state, LoadState::Unloaded) {
            LoadState::Loading { tx, .. } => {
                *state = LoadState::Ready(Arc::clone(&api));
                let _ = tx.send(Some(Ok(api)));
                log::info!("Player API is ready");
            }
            LoadState::Unloaded => {
                *state = LoadState::Ready(api);
                log::info!("Player API was ready before any load request");
            }
            other => {
                log::warn!("Ignoring ready signal in state: {}", other.name());
                *state = other;
            }
        }
    }

    /// スクリプトロード失敗の通知（ネットワークエラーなど）
    ///
    /// Failed状態は終端で、以降のロード要求にも同じエラーが返る。
    pub fn notify_failure(&self, reason: &str) {
        let err = FacadeError::ScriptLoadFailed(reason.to_string());
        let mut state = self.state.lock().unwrap();
        match std::mem::replace(&mut *state, LoadState::Unloaded) {
            LoadState::Loading { tx, .. } => {
                *state = LoadState::Failed(err.clone());
                let _ = tx.send(Some(Err(err)));
                log::error!("Player API script failed to load: {}", reason);
            }
            LoadState::Unloaded => {
                log::error!("Player API script failed before any load request: {}", reason);
                *state = LoadState::Failed(err);
            }
            other => {
                log::warn!("Ignoring failure signal in state: {}", other.name());
                *state = other;
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(&*self.state.lock().unwrap(), LoadState::Ready(_))
    }

    pub fn has_failed(&self) -> bool {
        matches!(&*self.state.lock().unwrap(), LoadState::Failed(_))
    }
}

impl Default for PlayerApiLoader {
    fn default() -> Self {
        Self::new()
    }
}
