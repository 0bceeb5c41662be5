//! 最小限の要素ツリー実装
//!
//! エンジンが操作する対象のドキュメントをアリーナ方式で保持する。
//! ホスト側はこのツリーの変更を実際のUIへ反映し、外部スクリプトの
//! コールバックをエンジンへ中継する責務を持つ。
//!
//! セレクタは `tag` / `.class` / `#id` / `[attr]` の単純な形式のみを
//! サポートする。

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// スレッド間で共有するドキュメントハンドル
pub type SharedDocument = Arc<Mutex<Document>>;

/// ドキュメント内のノードを指すハンドル
///
/// 同じ [`Document`] から払い出されたIDに対してのみ有効。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

/// 単一の要素ノード
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// 単純セレクタ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// タグ名（例: `iframe`）
    Tag(String),
    /// クラス名（例: `.youtube-facade`）
    Class(String),
    /// ID属性（例: `#youtube-facade-modal-placeholder`）
    Id(String),
    /// 属性の有無（例: `[data-youtube-modal]`）
    Attribute(String),
}

impl Selector {
    /// セレクタ文字列を解析する
    ///
    /// サポート外の形式（複合セレクタなど）は `None` を返す。
    pub fn parse(input: &str) -> Option<Selector> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if let Some(class) = input.strip_prefix('.') {
            if class.is_empty() || class.contains(char::is_whitespace) {
                return None;
            }
            return Some(Selector::Class(class.to_string()));
        }
        if let Some(id) = input.strip_prefix('#') {
            if id.is_empty() || id.contains(char::is_whitespace) {
                return None;
            }
            return Some(Selector::Id(id.to_string()));
        }
        if let Some(rest) = input.strip_prefix('[') {
            let attr = rest.strip_suffix(']')?;
            if attr.is_empty() {
                return None;
            }
            return Some(Selector::Attribute(attr.to_string()));
        }
        if input.contains(char::is_whitespace) {
            return None;
        }
        Some(Selector::Tag(input.to_ascii_lowercase()))
    }
}

/// アリーナ方式の要素ツリー
///
/// `html > (head, body)` のルート構造を持った状態で生成される。
/// 置換されたノードはツリーから切り離されるが、アリーナ内には残る
/// （IDは無効化されない）。
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
        };
        doc.root = doc.alloc("html");
        doc.head = doc.alloc("head");
        doc.body = doc.alloc("body");
        doc.append_child(doc.root, doc.head);
        doc.append_child(doc.root, doc.body);
        doc
    }

    /// 共有ハンドルに変換する
    pub fn into_shared(self) -> SharedDocument {
        Arc::new(Mutex::new(self))
    }

    fn alloc(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Element::new(tag));
        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// 新しい要素を作成する（どこにも接続されない）
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(tag)
    }

    fn node(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0)
    }

    pub fn exists(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(Element::tag)
    }

    // ------ 属性 ------

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(id) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)?.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.node(id)
            .map(|n| n.attributes.contains_key(name))
            .unwrap_or(false)
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(node) = self.node_mut(id) {
            node.attributes.remove(name);
        }
    }

    // ------ クラス ------

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(node) = self.node_mut(id) {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(node) = self.node_mut(id) {
            node.classes.retain(|c| c != class);
        }
    }

    /// クラスの有無を反転させ、反転後に存在するかどうかを返す
    pub fn toggle_class(&mut self, id: NodeId, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class);
            true
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id)
            .map(|n| n.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    // ------ ツリー操作 ------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
        }
    }

    /// 子ノードを末尾に追加する
    ///
    /// 既に別の親を持つ場合は付け替える。祖先を子孫に入れるような
    /// 循環は拒否する。
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || !self.exists(parent) || !self.exists(child) {
            log::warn!("append_child: invalid parent/child pair");
            return;
        }
        if self.contains(child, parent) {
            log::warn!("append_child: refusing to create a cycle");
            return;
        }
        self.detach(child);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// ノードを別のノードで置き換える
    ///
    /// 置き換えられたノードはツリーから切り離される。親を持たない
    /// ノードは置き換えられず `false` を返す。
    pub fn replace_with(&mut self, old: NodeId, new: NodeId) -> bool {
        if old == new || !self.exists(old) || !self.exists(new) {
            return false;
        }
        let Some(parent) = self.parent(old) else {
            log::warn!("replace_with: node has no parent");
            return false;
        };
        if self.contains(new, parent) {
            log::warn!("replace_with: refusing to create a cycle");
            return false;
        }
        self.detach(new);
        let pos = self
            .node(parent)
            .and_then(|p| p.children.iter().position(|c| *c == old));
        let Some(pos) = pos else {
            return false;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children[pos] = new;
        }
        if let Some(n) = self.node_mut(new) {
            n.parent = Some(parent);
        }
        if let Some(o) = self.node_mut(old) {
            o.parent = None;
        }
        true
    }

    /// 全ての子ノードを切り離す
    pub fn clear_children(&mut self, id: NodeId) {
        let children = match self.node_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            if let Some(c) = self.node_mut(child) {
                c.parent = None;
            }
        }
    }

    /// ルートから到達可能かどうか
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(self.root, id)
    }

    /// `ancestor` が `id` 自身またはその祖先かどうか
    pub fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    // ------ 検索 ------

    /// ノードがセレクタにマッチするかどうか
    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        match selector {
            Selector::Tag(tag) => node.tag == *tag,
            Selector::Class(class) => node.classes.iter().any(|c| c == class),
            Selector::Id(id_attr) => {
                node.attributes.get("id").map(String::as_str) == Some(id_attr.as_str())
            }
            Selector::Attribute(attr) => node.attributes.contains_key(attr),
        }
    }

    /// ドキュメント順でセレクタにマッチする最初のノードを返す
    pub fn query(&self, selector: &Selector) -> Option<NodeId> {
        self.walk(selector, true).into_iter().next()
    }

    /// セレクタにマッチする全ノードをドキュメント順で返す
    pub fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.walk(selector, false)
    }

    /// セレクタ文字列で最初のマッチを検索する
    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.query(&Selector::parse(selector)?)
    }

    pub fn get_element_by_id(&self, id_attr: &str) -> Option<NodeId> {
        self.query(&Selector::Id(id_attr.to_string()))
    }

    /// 自身から祖先方向へ辿り、最初にセレクタへマッチするノードを返す
    pub fn closest(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut current = if self.exists(id) { Some(id) } else { None };
        while let Some(node) = current {
            if self.matches(node, selector) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    fn walk(&self, selector: &Selector, first_only: bool) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if self.matches(id, selector) {
                found.push(id);
                if first_only {
                    break;
                }
            }
            // スタックなので逆順に積むとドキュメント順になる
            for child in self.children(id).iter().rev() {
                stack.push(*child);
            }
        }
        found
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
