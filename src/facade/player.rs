//! Player APIレンダラー
//!
//! 外部APIとの契約はここで閉じる: (a) スクリプトタグの挿入は
//! ローダーが1回だけ行い、(b) readyコールバックでAPIハンドルが
//! 届き、(c) 固定形状のオプションでコンストラクタを1回呼ぶ。

use std::sync::Arc;

use crate::config::PlayerVars;
use crate::dom::{Document, NodeId, SharedDocument};
use crate::error::FacadeError;
use crate::facade::loader::PlayerApiLoader;
use crate::facade::resolver::ensure_valid_video_id;

pub const PLAYER_WIDTH: u32 = 720;
pub const PLAYER_HEIGHT: u32 = 405;

/// プレーヤー構築に渡す固定形状のオプション
#[derive(Debug, Clone)]
pub struct PlayerOptions {
    pub width: u32,
    pub height: u32,
    pub video_id: String,
    pub player_vars: PlayerVars,
}

/// 外部スクリプトが提供するプレーヤーコンストラクタ
///
/// ホストはreadyコールバック時にこの実装を
/// [`PlayerApiLoader::notify_ready`] へ渡す。
pub trait PlayerApi: std::fmt::Debug + Send + Sync {
    fn create_player(
        &self,
        document: &mut Document,
        target: NodeId,
        options: &PlayerOptions,
    ) -> Result<Arc<dyn PlayerInstance>, FacadeError>;
}

pub type PlayerApiHandle = Arc<dyn PlayerApi>;

/// 構築済みプレーヤーの不透明ハンドル
pub trait PlayerInstance: std::fmt::Debug + Send + Sync {
    /// 再生を開始する
    fn play(&self);

    /// プレーヤーがバインドされているノード
    fn node(&self) -> NodeId;
}

/// APIプレーヤーをターゲットノードへ構築する
///
/// ローダーを待ち、構築完了（=ready）と同時に再生を開始する。
/// ローダー失敗はそのまま伝播し、ターゲットには触れない。
pub async fn render_api_player(
    loader: &PlayerApiLoader,
    document: &SharedDocument,
    target: NodeId,
    video_id: &str,
    player_vars: &PlayerVars,
) -> Result<Arc<dyn PlayerInstance>, FacadeError> {
    ensure_valid_video_id(video_id)?;
    let api = loader.load(document).await?;

    let options = PlayerOptions {
        width: PLAYER_WIDTH,
        height: PLAYER_HEIGHT,
        video_id: video_id.to_string(),
        player_vars: player_vars.clone(),
    };

    let player = {
        let mut doc = document.lock().unwrap();
        if !doc.exists(target) {
            return Err(FacadeError::ElementNotFound);
        }
        api.create_player(&mut doc, target, &options)?
    };

    // onReady相当: 構築できたら即座に再生する
    player.play();
    log::info!("API player created for video: {}", video_id);
    Ok(player)
}
