//! 動画IDリゾルバ
//!
//! `data-youtube-id` 属性を優先し、無ければhrefの `v` クエリ
//! パラメータから動画IDを解決する。失敗は例外ではなく `None`。

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::config::ATTR_VIDEO_ID;
use crate::dom::{Document, NodeId};
use crate::error::FacadeError;

static VIDEO_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("video ID regex compiles"));

/// 要素から動画IDを解決する
///
/// 属性が無い・hrefが不正などの場合は `None` を返し、決してパニック
/// しない。
pub fn resolve_video_id(document: &Document, element: NodeId) -> Option<String> {
    if let Some(video_id) = document.get_attribute(element, ATTR_VIDEO_ID) {
        if !video_id.is_empty() {
            return Some(video_id.to_string());
        }
    }

    let href = document.get_attribute(element, "href")?;
    match Url::parse(href) {
        Ok(url) => url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned()),
        Err(e) => {
            log::warn!("Failed to parse href as URL: {}", e);
            None
        }
    }
}

/// 動画IDが埋め込みURLに使える形式であることを確認する
pub fn ensure_valid_video_id(video_id: &str) -> Result<(), FacadeError> {
    if video_id.is_empty() {
        return Err(FacadeError::MissingVideoId);
    }
    if !VIDEO_ID_RE.is_match(video_id) {
        return Err(FacadeError::InvalidVideoId(video_id.to_string()));
    }
    Ok(())
}
