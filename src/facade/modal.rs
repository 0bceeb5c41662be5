//! 共有モーダル
//!
//! ページに1つだけのオーバーレイを遅延構築し、表示トグル・スクロール
//! ロック・クローズ時のプレースホルダー消去を管理する。装飾用の
//! テンプレートやCSSはホスト側の責務で、ここでは構造だけを作る。

use crate::dom::{Document, NodeId};

pub const MODAL_CLASS: &str = "youtube-facade-modal";
pub const MODAL_ACTIVE_CLASS: &str = "youtube-facade-modal-active";
pub const MODAL_CONTENT_CLASS: &str = "youtube-facade-modal-content";
pub const MODAL_CONTENT_INNER_CLASS: &str = "youtube-facade-modal-content-inner";
pub const MODAL_CLOSE_CLASS: &str = "youtube-facade-modal-close";
pub const MODAL_PLACEHOLDER_ID: &str = "youtube-facade-modal-placeholder";
pub const MODAL_PLACEHOLDER_CLASS: &str = "youtube-facade-modal-inner";

/// ページスクロールをロックするために`<body>`へ付けるクラス
pub const BODY_NO_SCROLL_CLASS: &str = "youtube-facade-body-no-scroll";

#[derive(Debug, Clone, Copy)]
struct ModalNodes {
    root: NodeId,
    close_button: NodeId,
    placeholder: NodeId,
}

/// 共有モーダルのコントローラ
#[derive(Debug, Default)]
pub struct ModalController {
    nodes: Option<ModalNodes>,
    active: bool,
}

impl ModalController {
    pub fn new() -> Self {
        Self::default()
    }

    /// モーダルのDOM構造を構築する（初回のみ）
    ///
    /// プレースホルダーのノードIDを返す。
    pub fn ensure(&mut self, document: &mut Document) -> NodeId {
        if let Some(nodes) = self.nodes {
            return nodes.placeholder;
        }

        let root = document.create_element("div");
        document.add_class(root, MODAL_CLASS);

        let content = document.create_element("div");
        document.add_class(content, MODAL_CONTENT_CLASS);

        let close_button = document.create_element("button");
        document.add_class(close_button, MODAL_CLOSE_CLASS);
        document.set_attribute(close_button, "aria-label", "Close modal");

        let inner = document.create_element("div");
        document.add_class(inner, MODAL_CONTENT_INNER_CLASS);

        let placeholder = document.create_element("div");
        document.set_attribute(placeholder, "id", MODAL_PLACEHOLDER_ID);
        document.add_class(placeholder, MODAL_PLACEHOLDER_CLASS);

        document.append_child(content, close_button);
        document.append_child(inner, placeholder);
        document.append_child(content, inner);
        document.append_child(root, content);
        let body = document.body();
        document.append_child(body, root);

        self.nodes = Some(ModalNodes {
            root,
            close_button,
            placeholder,
        });
        log::debug!("Modal overlay created");
        placeholder
    }

    /// 表示状態を反転させる
    pub fn toggle(&mut self, document: &mut Document) {
        let Some(nodes) = self.nodes else {
            log::error!("toggle: modal has not been set up");
            return;
        };
        self.active = !self.active;
        let body = document.body();
        if self.active {
            document.add_class(nodes.root, MODAL_ACTIVE_CLASS);
            document.add_class(body, BODY_NO_SCROLL_CLASS);
        } else {
            document.remove_class(nodes.root, MODAL_ACTIVE_CLASS);
            document.remove_class(body, BODY_NO_SCROLL_CLASS);
        }
    }

    /// 非表示なら表示する（表示済みなら何もしない）
    pub fn open(&mut self, document: &mut Document) {
        if !self.active {
            self.toggle(document);
        }
    }

    /// モーダルを閉じ、プレースホルダーの中身を消去する
    pub fn close(&mut self, document: &mut Document) {
        let Some(nodes) = self.nodes else {
            return;
        };
        document.clear_children(nodes.placeholder);
        document.remove_class(nodes.root, MODAL_ACTIVE_CLASS);
        let body = document.body();
        document.remove_class(body, BODY_NO_SCROLL_CLASS);
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn placeholder(&self) -> Option<NodeId> {
        self.nodes.map(|n| n.placeholder)
    }

    pub fn close_button(&self) -> Option<NodeId> {
        self.nodes.map(|n| n.close_button)
    }
}
