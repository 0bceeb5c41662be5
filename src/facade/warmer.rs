//! プリコネクトウォーマー
//!
//! 最初のホバー/フォーカスで関連オリジンへの `preconnect` ヒントを
//! `<head>` に挿入する。2回目以降の呼び出しは何もしない。

use std::sync::atomic::{AtomicBool, Ordering};

use crate::dom::Document;

/// プリコネクト対象のオリジン
pub const PRECONNECT_ORIGINS: [&str; 2] = [
    "https://www.youtube-nocookie.com",
    "https://www.google.com",
];

/// 冪等なプリコネクトヒント挿入サービス
#[derive(Debug, Default)]
pub struct PreconnectWarmer {
    warmed: AtomicBool,
}

impl PreconnectWarmer {
    pub fn new() -> Self {
        Self::default()
    }

    /// プリコネクトリンクを挿入する（初回のみ）
    pub fn warm(&self, document: &mut Document) {
        if self.warmed.swap(true, Ordering::SeqCst) {
            return;
        }
        let head = document.head();
        for origin in PRECONNECT_ORIGINS {
            let link = document.create_element("link");
            document.set_attribute(link, "rel", "preconnect");
            document.set_attribute(link, "href", origin);
            document.append_child(head, link);
        }
        log::debug!("Preconnect hints added for {} origins", PRECONNECT_ORIGINS.len());
    }

    pub fn is_warmed(&self) -> bool {
        self.warmed.load(Ordering::SeqCst)
    }
}
