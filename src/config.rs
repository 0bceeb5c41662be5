// =============================================================================
// 設定・属性モジュール
// =============================================================================
// エンジン全体のオプションと、要素単位の設定（データ属性から一度だけ
// 解析してキャッシュする）を定義する
// =============================================================================

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dom::{Document, NodeId};
use crate::facade::resolver;

/// ファサード要素を特定する既定のセレクタ
pub const FACADE_SELECTOR: &str = ".youtube-facade";

/// 動画IDを直接指定する属性
pub const ATTR_VIDEO_ID: &str = "data-youtube-id";

/// モーダル内で再生することを示す属性
pub const ATTR_MODAL: &str = "data-youtube-modal";

/// 埋め込み先を外部コンテナに向けるセレクタ属性
pub const ATTR_TARGET: &str = "data-target";

/// Player APIの使用を強制する属性
pub const ATTR_USE_API: &str = "data-use-youtube-api";

/// モバイル時にミュートすることを要求する属性
pub const ATTR_MUTE_FOR_MOBILE: &str = "data-mute-for-mobile";

/// エンジン全体のオプション
#[derive(Debug, Clone)]
pub struct FacadeOptions {
    /// ファサード要素のセレクタ
    pub selector: String,
    /// モバイルでの自動再生のためにミュートするかどうか
    pub mute_for_autoplay: bool,
}

impl Default for FacadeOptions {
    fn default() -> Self {
        Self {
            selector: FACADE_SELECTOR.to_string(),
            mute_for_autoplay: true,
        }
    }
}

/// プレーヤーへ渡す再生パラメータ
///
/// 埋め込みURLのクエリ文字列、またはAPIプレーヤーのオプションとして
/// シリアライズされる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerVars(BTreeMap<String, String>);

impl PlayerVars {
    /// 空のパラメータ
    pub fn new() -> Self {
        Self::default()
    }

    /// 既定の再生パラメータ（インライン再生・自動再生・関連動画抑制）
    pub fn stock() -> Self {
        let mut vars = Self::new();
        vars.set("playsinline", "1");
        vars.set("autoplay", "1");
        vars.set("rel", "0");
        vars
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// 要素単位の設定
///
/// データ属性は初回登録時に一度だけ読み取られ、以降はこの構造体が
/// 参照される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementConfig {
    /// 解決済みの動画ID（属性またはhrefの `v` パラメータ）
    pub video_id: Option<String>,
    /// モーダル内で再生するかどうか
    pub modal: bool,
    /// 埋め込み先セレクタ（`data-target`）
    pub target_selector: Option<String>,
    /// Player APIの使用を強制するかどうか
    pub force_api: bool,
    /// モバイル時にミュートするかどうか
    pub mute_for_mobile: bool,
}

impl ElementConfig {
    /// 要素の属性から設定を解析する
    pub fn parse(document: &Document, element: NodeId) -> Self {
        Self {
            video_id: resolver::resolve_video_id(document, element),
            modal: document.has_attribute(element, ATTR_MODAL),
            target_selector: document
                .get_attribute(element, ATTR_TARGET)
                .map(str::to_string),
            force_api: document.has_attribute(element, ATTR_USE_API),
            mute_for_mobile: document.has_attribute(element, ATTR_MUTE_FOR_MOBILE),
        }
    }
}
