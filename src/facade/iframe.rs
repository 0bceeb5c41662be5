//! iframeレンダラー
//!
//! APIが不要な場合に使う、プレーンな埋め込みiframeの純粋な構築。
//! プライバシー強化ドメインを指し、許可属性は固定。

use once_cell::sync::Lazy;
use url::Url;

use crate::config::PlayerVars;
use crate::dom::{Document, NodeId};
use crate::error::FacadeError;
use crate::facade::resolver::ensure_valid_video_id;

/// プライバシー強化モードの埋め込みベースURL
pub const EMBED_BASE_URL: &str = "https://www.youtube-nocookie.com/embed/";

pub const IFRAME_WIDTH: &str = "720";
pub const IFRAME_HEIGHT: &str = "405";

/// 生成されるiframeに付くクラス
pub const IFRAME_CLASS: &str = "youtube-facade-iframe";

/// iframeに許可する機能
pub const IFRAME_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";

static EMBED_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse(EMBED_BASE_URL).expect("embed base URL parses"));

/// 動画IDと再生パラメータから埋め込みURLを組み立てる
pub fn embed_url(video_id: &str, player_vars: &PlayerVars) -> Result<Url, FacadeError> {
    ensure_valid_video_id(video_id)?;
    let mut url = EMBED_BASE
        .join(video_id)
        .map_err(|_| FacadeError::InvalidVideoId(video_id.to_string()))?;
    if !player_vars.is_empty() {
        url.query_pairs_mut().extend_pairs(player_vars.iter());
    }
    Ok(url)
}

/// 埋め込みiframe要素を構築する（ツリーには接続しない）
///
/// 動画IDが不正な場合は要素を作らずエラー値を返すので、呼び出し側は
/// 安全に中断できる。
pub fn build_iframe(
    document: &mut Document,
    video_id: &str,
    player_vars: &PlayerVars,
) -> Result<NodeId, FacadeError> {
    let src = embed_url(video_id, player_vars)?;
    let iframe = document.create_element("iframe");
    document.set_attribute(iframe, "src", src.as_str());
    document.set_attribute(iframe, "width", IFRAME_WIDTH);
    document.set_attribute(iframe, "height", IFRAME_HEIGHT);
    document.add_class(iframe, IFRAME_CLASS);
    document.set_attribute(iframe, "frameborder", "0");
    document.set_attribute(iframe, "allow", IFRAME_ALLOW);
    document.set_attribute(iframe, "allowfullscreen", "");
    Ok(iframe)
}
