//! アクティベーション通知
//!
//! アクティベーション成功時にブロードキャストチャンネルへ流れる
//! イベントを定義する。ホストページのリスナーはエンジンの
//! `subscribe` で受信する。

use serde::Serialize;

use crate::dom::NodeId;

/// ホストページへ通知するイベント名
pub const ACTIVATED_EVENT: &str = "youtube-facade-active";

/// 埋め込みの描画方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// プレーンなiframe埋め込み
    Iframe,
    /// Player API経由の管理されたプレーヤー
    ApiPlayer,
}

/// ファサードがアクティベートされたことを示すイベント
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacadeActivated {
    /// 発火元の要素
    pub element: NodeId,
    /// 解決された動画ID
    pub video_id: String,
    /// 使用された描画方式
    pub mode: RenderMode,
}

impl FacadeActivated {
    /// ホストページへ中継するためのJSON表現
    pub fn to_json(&self) -> Option<String> {
        match serde_json::to_string(self) {
            Ok(json) => Some(json),
            Err(e) => {
                log::error!("Failed to serialize activation event: {}", e);
                None
            }
        }
    }
}
