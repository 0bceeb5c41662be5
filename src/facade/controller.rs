//! アクティベーションコントローラ
//!
//! ファサード要素ごとの `idle → activated` 遷移と、入力イベントの
//! 中央ディスパッチを担う。グローバルだった各種シングルトンは
//! ここに集約されたサービスオブジェクトとして注入・保持される。
//!
//! クリック処理の流れ:
//! 1. セレクタ表で対象ハンドラを解決
//! 2. 要素設定（動画ID等）を取得
//! 3. 描画先を解決（自身 / `data-target` / モーダル）
//! 4. API経由かiframeかを決定
//! 5. 描画してアクティベート済みにマークし、イベントを通知

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use crate::config::{ElementConfig, FacadeOptions, PlayerVars, FACADE_SELECTOR};
use crate::dom::{NodeId, Selector, SharedDocument};
use crate::error::FacadeError;
use crate::events::{FacadeActivated, RenderMode};
use crate::facade::iframe::{build_iframe, IFRAME_CLASS};
use crate::facade::loader::PlayerApiLoader;
use crate::facade::modal::{ModalController, MODAL_CLOSE_CLASS};
use crate::facade::player::{render_api_player, PlayerInstance};
use crate::facade::warmer::PreconnectWarmer;
use crate::platform::Platform;

/// アクティベート済みの要素に付くクラス
pub const ACTIVATED_CLASS: &str = "youtube-facade-active";

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// 要素ごとのアクティベーション状態（単方向遷移）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationState {
    Idle,
    Activated,
}

/// ホストから届く入力イベント
#[derive(Debug, Clone)]
pub enum InputEvent {
    Click { target: NodeId },
    PointerOver { target: NodeId },
    FocusIn { target: NodeId },
    KeyDown { key: String },
}

/// セレクタ表で引けるハンドラ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Activate,
    CloseModal,
}

/// ファサードエンジン
///
/// ドキュメントと各サービス（ウォーマー・ローダー・モーダル）を
/// 所有し、入力イベントを処理する。
pub struct FacadeEngine {
    document: SharedDocument,
    options: FacadeOptions,
    platform: Platform,
    facade_selector: Selector,
    routes: Vec<(Selector, Route)>,
    loader: Arc<PlayerApiLoader>,
    warmer: PreconnectWarmer,
    modal: Mutex<ModalController>,
    registry: Mutex<HashMap<NodeId, ElementConfig>>,
    activation: Mutex<HashMap<NodeId, ActivationState>>,
    events: broadcast::Sender<FacadeActivated>,
    last_player: Mutex<Option<Arc<dyn PlayerInstance>>>,
}

impl FacadeEngine {
    pub fn new(document: SharedDocument, options: FacadeOptions, platform: Platform) -> Self {
        let facade_selector = Selector::parse(&options.selector).unwrap_or_else(|| {
            log::warn!(
                "Unsupported facade selector '{}', falling back to '{}'",
                options.selector,
                FACADE_SELECTOR
            );
            Selector::Class("youtube-facade".to_string())
        });
        let routes = vec![
            (facade_selector.clone(), Route::Activate),
            (
                Selector::Class(MODAL_CLOSE_CLASS.to_string()),
                Route::CloseModal,
            ),
        ];
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            document,
            options,
            platform,
            facade_selector,
            routes,
            loader: Arc::new(PlayerApiLoader::new()),
            warmer: PreconnectWarmer::new(),
            modal: Mutex::new(ModalController::new()),
            registry: Mutex::new(HashMap::new()),
            activation: Mutex::new(HashMap::new()),
            events,
            last_player: Mutex::new(None),
        }
    }

    /// モーダルを構築し、既存のファサード要素の設定を登録する
    ///
    /// setup後に追加された要素も初クリック時に遅延登録されるため、
    /// 再setupは不要。
    pub fn setup(&self) {
        let mut doc = self.document.lock().unwrap();
        self.modal.lock().unwrap().ensure(&mut doc);

        let elements = doc.query_all(&self.facade_selector);
        let mut registry = self.registry.lock().unwrap();
        for element in elements {
            registry
                .entry(element)
                .or_insert_with(|| ElementConfig::parse(&doc, element));
        }
        log::info!("Facade setup complete: {} elements registered", registry.len());
    }

    /// ローダーへの参照
    ///
    /// ホストは外部スクリプトのready/失敗をこのハンドル経由で通知する。
    pub fn loader(&self) -> Arc<PlayerApiLoader> {
        Arc::clone(&self.loader)
    }

    pub fn document(&self) -> SharedDocument {
        Arc::clone(&self.document)
    }

    /// アクティベーション通知の購読
    pub fn subscribe(&self) -> broadcast::Receiver<FacadeActivated> {
        self.events.subscribe()
    }

    /// 直近に構築されたプレーヤーのハンドル
    pub fn last_player(&self) -> Option<Arc<dyn PlayerInstance>> {
        self.last_player.lock().unwrap().clone()
    }

    /// 入力イベントを処理する
    ///
    /// 失敗はここでログに記録して吸収する。ホストページへは決して
    /// 伝播しない。
    pub async fn dispatch(&self, event: InputEvent) {
        match event {
            InputEvent::Click { target } => match self.resolve_route(target) {
                Some((element, Route::Activate)) => match self.activate(element).await {
                    Ok(activated) => {
                        log::info!("Facade activated: video {}", activated.video_id);
                    }
                    Err(FacadeError::AlreadyActivated) => {
                        log::debug!("Element already activated, ignoring click");
                    }
                    Err(e) => {
                        log::error!("Activation failed: {}", e);
                    }
                },
                Some((_, Route::CloseModal)) => {
                    self.close_modal();
                }
                None => {
                    log::debug!("Click did not match any registered selector");
                }
            },
            InputEvent::PointerOver { target } | InputEvent::FocusIn { target } => {
                // APIパスが使われる見込みのときだけウォームアップする
                if !self.platform.requires_player_api() {
                    return;
                }
                let is_facade = {
                    let doc = self.document.lock().unwrap();
                    doc.closest(target, &self.facade_selector).is_some()
                };
                if is_facade {
                    let mut doc = self.document.lock().unwrap();
                    self.warmer.warm(&mut doc);
                }
            }
            InputEvent::KeyDown { key } => {
                if key == "Escape" || key == "Esc" {
                    self.close_modal();
                }
            }
        }
    }

    /// 要素をアクティベートする
    ///
    /// 成功時は通知イベントを発火して返す。アクティベート済みの要素
    /// には何もしない（再クリックは無効）。失敗時は発火元の要素に
    /// 一切触れない。
    pub async fn activate(&self, element: NodeId) -> Result<FacadeActivated, FacadeError> {
        {
            let activation = self.activation.lock().unwrap();
            if activation.get(&element) == Some(&ActivationState::Activated) {
                return Err(FacadeError::AlreadyActivated);
            }
        }

        let config = self.config_for(element)?;
        let video_id = config.video_id.clone().ok_or(FacadeError::MissingVideoId)?;

        let mut player_vars = PlayerVars::stock();
        if self.platform.is_mobile()
            && (self.options.mute_for_autoplay || config.mute_for_mobile)
        {
            player_vars.set("mute", "1");
        }

        // モーダル指定はターゲットだけを変え、描画方式には影響しない
        let use_api = config.force_api || self.platform.requires_player_api();

        let mode = if use_api {
            let target = self.resolve_player_target(element, &config)?;
            let player = render_api_player(
                self.loader.as_ref(),
                &self.document,
                target,
                &video_id,
                &player_vars,
            )
            .await?;
            *self.last_player.lock().unwrap() = Some(player);
            if element != target {
                self.mark_activated(element);
            }
            RenderMode::ApiPlayer
        } else {
            self.render_iframe(element, &config, &video_id, &player_vars)?;
            RenderMode::Iframe
        };

        self.activation
            .lock()
            .unwrap()
            .insert(element, ActivationState::Activated);

        let activated = FacadeActivated {
            element,
            video_id,
            mode,
        };
        // 購読者がいない場合の送信エラーは無視してよい
        let _ = self.events.send(activated.clone());
        Ok(activated)
    }

    /// 要素設定を取得する（未登録の要素は初見時に解析して登録）
    fn config_for(&self, element: NodeId) -> Result<ElementConfig, FacadeError> {
        let doc = self.document.lock().unwrap();
        if !doc.exists(element) {
            return Err(FacadeError::ElementNotFound);
        }
        let mut registry = self.registry.lock().unwrap();
        if let Some(config) = registry.get(&element) {
            return Ok(config.clone());
        }
        let config = ElementConfig::parse(&doc, element);
        registry.insert(element, config.clone());
        Ok(config)
    }

    /// APIプレーヤーの描画先を解決する
    ///
    /// モーダル指定ならモーダルを開いてプレースホルダー内にラッパーを
    /// 作り、`data-target` 指定ならそのセレクタで検索する。どちらも
    /// 無ければ要素自身が描画先になる。
    fn resolve_player_target(
        &self,
        element: NodeId,
        config: &ElementConfig,
    ) -> Result<NodeId, FacadeError> {
        let mut doc = self.document.lock().unwrap();
        if config.modal {
            let mut modal = self.modal.lock().unwrap();
            let placeholder = modal.ensure(&mut doc);
            if !doc.is_attached(placeholder) {
                return Err(FacadeError::ModalUnavailable);
            }
            let wrapper = doc.create_element("div");
            doc.add_class(wrapper, IFRAME_CLASS);
            doc.append_child(placeholder, wrapper);
            modal.open(&mut doc);
            return Ok(wrapper);
        }
        if let Some(selector) = &config.target_selector {
            let parsed = Selector::parse(selector)
                .ok_or_else(|| FacadeError::TargetNotFound(selector.clone()))?;
            return doc
                .query(&parsed)
                .ok_or_else(|| FacadeError::TargetNotFound(selector.clone()));
        }
        Ok(element)
    }

    /// iframeパスの描画
    fn render_iframe(
        &self,
        element: NodeId,
        config: &ElementConfig,
        video_id: &str,
        player_vars: &PlayerVars,
    ) -> Result<(), FacadeError> {
        let mut doc = self.document.lock().unwrap();

        if config.modal {
            let mut modal = self.modal.lock().unwrap();
            let placeholder = modal.ensure(&mut doc);
            if !doc.is_attached(placeholder) {
                return Err(FacadeError::ModalUnavailable);
            }
            let iframe = build_iframe(&mut doc, video_id, player_vars)?;
            doc.append_child(placeholder, iframe);
            modal.open(&mut doc);
            drop(modal);
            // 発火元は残るのでマーカーを付ける
            doc.add_class(element, ACTIVATED_CLASS);
            doc.set_attribute(element, "tabindex", "-1");
            return Ok(());
        }

        let target = match &config.target_selector {
            Some(selector) => {
                let parsed = Selector::parse(selector)
                    .ok_or_else(|| FacadeError::TargetNotFound(selector.clone()))?;
                doc.query(&parsed)
                    .ok_or_else(|| FacadeError::TargetNotFound(selector.clone()))?
            }
            None => element,
        };

        let iframe = build_iframe(&mut doc, video_id, player_vars)?;
        if !doc.replace_with(target, iframe) {
            return Err(FacadeError::ElementNotFound);
        }
        if element != target {
            doc.add_class(element, ACTIVATED_CLASS);
            doc.set_attribute(element, "tabindex", "-1");
        }
        Ok(())
    }

    fn mark_activated(&self, element: NodeId) {
        let mut doc = self.document.lock().unwrap();
        doc.add_class(element, ACTIVATED_CLASS);
        doc.set_attribute(element, "tabindex", "-1");
    }

    /// クリック位置からセレクタ表のハンドラを解決する
    fn resolve_route(&self, target: NodeId) -> Option<(NodeId, Route)> {
        let doc = self.document.lock().unwrap();
        for (selector, route) in &self.routes {
            if let Some(element) = doc.closest(target, selector) {
                return Some((element, *route));
            }
        }
        None
    }

    fn close_modal(&self) {
        let mut doc = self.document.lock().unwrap();
        self.modal.lock().unwrap().close(&mut doc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ATTR_MODAL, ATTR_TARGET, ATTR_USE_API, ATTR_VIDEO_ID};
    use crate::dom::Document;
    use crate::facade::modal::{MODAL_ACTIVE_CLASS, MODAL_CLASS, MODAL_PLACEHOLDER_ID};
    use crate::facade::test_support;
    use crate::facade::warmer::PRECONNECT_ORIGINS;

    const DESKTOP_UA: &str =
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0";
    const MOBILE_UA: &str =
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile Safari Mobi";

    fn desktop() -> Platform {
        Platform::new(DESKTOP_UA, "Google Inc.", 1920)
    }

    fn mobile() -> Platform {
        Platform::new(MOBILE_UA, "Apple Computer, Inc.", 375)
    }

    /// body直下にファサード用のアンカー（中に画像）を置いたドキュメント
    fn facade_document(video_id: &str) -> (SharedDocument, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let anchor = doc.create_element("a");
        doc.add_class(anchor, "youtube-facade");
        doc.set_attribute(anchor, ATTR_VIDEO_ID, video_id);
        let img = doc.create_element("img");
        doc.append_child(body, anchor);
        doc.append_child(anchor, img);
        (doc.into_shared(), anchor, img)
    }

    #[tokio::test]
    async fn test_click_replaces_facade_with_iframe() {
        let (document, anchor, img) = facade_document("dQw4w9WgXcQ");
        let engine = FacadeEngine::new(document.clone(), FacadeOptions::default(), desktop());
        engine.setup();
        let mut events = engine.subscribe();

        // 子要素へのクリックでも closest でファサードへ解決される
        engine.dispatch(InputEvent::Click { target: img }).await;

        let doc = document.lock().unwrap();
        assert!(!doc.is_attached(anchor));
        let iframe = doc.query_selector("iframe").unwrap();
        let src = doc.get_attribute(iframe, "src").unwrap();
        assert!(src.starts_with("https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ?"));
        assert!(src.contains("autoplay=1"));
        drop(doc);

        let event = events.try_recv().unwrap();
        assert_eq!(event.video_id, "dQw4w9WgXcQ");
        assert_eq!(event.mode, RenderMode::Iframe);
    }

    #[tokio::test]
    async fn test_second_activation_is_noop() {
        let (document, anchor, _) = facade_document("dQw4w9WgXcQ");
        let engine = FacadeEngine::new(document.clone(), FacadeOptions::default(), desktop());
        engine.setup();
        let mut events = engine.subscribe();

        engine.activate(anchor).await.unwrap();
        let err = engine.activate(anchor).await.unwrap_err();
        assert_eq!(err, FacadeError::AlreadyActivated);

        // iframeも通知も1つだけ
        let doc = document.lock().unwrap();
        assert_eq!(
            doc.query_all(&Selector::Tag("iframe".to_string())).len(),
            1
        );
        drop(doc);
        assert!(events.try_recv().is_ok());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_modal_facade_on_mobile_uses_api_player() {
        let (document, anchor, _) = facade_document("dQw4w9WgXcQ");
        {
            let mut doc = document.lock().unwrap();
            doc.set_attribute(anchor, ATTR_MODAL, "true");
        }
        let engine = FacadeEngine::new(document.clone(), FacadeOptions::default(), mobile());
        engine.setup();
        engine.loader().notify_ready(test_support::fake_api());

        let activated = engine.activate(anchor).await.unwrap();
        assert_eq!(activated.mode, RenderMode::ApiPlayer);

        let doc = document.lock().unwrap();
        // モーダルが表示され、プレースホルダー内にプレーヤーが構築される
        let modal_root = doc
            .query(&Selector::Class(MODAL_CLASS.to_string()))
            .unwrap();
        assert!(doc.has_class(modal_root, MODAL_ACTIVE_CLASS));
        let placeholder = doc.get_element_by_id(MODAL_PLACEHOLDER_ID).unwrap();
        let wrapper = doc.children(placeholder)[0];
        assert!(!doc.children(wrapper).is_empty());
        // 発火元は残り、アクティベートマーカーが付く
        assert!(doc.is_attached(anchor));
        assert!(doc.has_class(anchor, ACTIVATED_CLASS));
        drop(doc);

        assert!(engine.last_player().is_some());
    }

    #[tokio::test]
    async fn test_mobile_autoplay_is_muted() {
        let (document, anchor, _) = facade_document("dQw4w9WgXcQ");
        let engine = FacadeEngine::new(document.clone(), FacadeOptions::default(), mobile());
        engine.setup();
        engine.loader().notify_ready(test_support::fake_api());

        engine.activate(anchor).await.unwrap();

        // フェイクプレーヤーのノードは発火元の中に作られ、ミュートされる
        let player = engine.last_player().unwrap();
        let doc = document.lock().unwrap();
        assert_eq!(doc.parent(player.node()), Some(anchor));
        assert_eq!(doc.get_attribute(player.node(), "data-fake-muted"), Some("1"));
    }

    #[tokio::test]
    async fn test_missing_video_id_aborts_without_dom_change() {
        let (document, anchor, _) = facade_document("dQw4w9WgXcQ");
        {
            let mut doc = document.lock().unwrap();
            doc.remove_attribute(anchor, ATTR_VIDEO_ID);
        }
        let engine = FacadeEngine::new(document.clone(), FacadeOptions::default(), desktop());
        engine.setup();
        let mut events = engine.subscribe();

        let err = engine.activate(anchor).await.unwrap_err();
        assert_eq!(err, FacadeError::MissingVideoId);

        let doc = document.lock().unwrap();
        assert!(doc.is_attached(anchor));
        assert!(doc.query_selector("iframe").is_none());
        drop(doc);
        assert!(events.try_recv().is_err());

        // dispatch経由でもパニックせず吸収される
        engine.dispatch(InputEvent::Click { target: anchor }).await;
    }

    #[tokio::test]
    async fn test_data_target_redirects_embed() {
        let (document, anchor, _) = facade_document("n62zZATx9Ts");
        let slot = {
            let mut doc = document.lock().unwrap();
            doc.set_attribute(anchor, ATTR_TARGET, "#dynamic-target");
            let body = doc.body();
            let slot = doc.create_element("div");
            doc.set_attribute(slot, "id", "dynamic-target");
            doc.append_child(body, slot);
            slot
        };
        let engine = FacadeEngine::new(document.clone(), FacadeOptions::default(), desktop());
        engine.setup();

        engine.activate(anchor).await.unwrap();

        let doc = document.lock().unwrap();
        // ターゲットが置き換えられ、発火元にはマーカーが付いて残る
        assert!(!doc.is_attached(slot));
        assert!(doc.is_attached(anchor));
        assert!(doc.has_class(anchor, ACTIVATED_CLASS));
        assert_eq!(doc.get_attribute(anchor, "tabindex"), Some("-1"));
    }

    #[tokio::test]
    async fn test_unresolvable_target_aborts() {
        let (document, anchor, _) = facade_document("dQw4w9WgXcQ");
        {
            let mut doc = document.lock().unwrap();
            doc.set_attribute(anchor, ATTR_TARGET, "#missing");
        }
        let engine = FacadeEngine::new(document.clone(), FacadeOptions::default(), desktop());
        engine.setup();

        let err = engine.activate(anchor).await.unwrap_err();
        assert_eq!(err, FacadeError::TargetNotFound("#missing".to_string()));
        // 失敗時は発火元に触れない
        let doc = document.lock().unwrap();
        assert!(doc.is_attached(anchor));
        assert!(!doc.has_class(anchor, ACTIVATED_CLASS));
    }

    #[tokio::test]
    async fn test_force_api_attribute_on_desktop() {
        let (document, anchor, _) = facade_document("dQw4w9WgXcQ");
        {
            let mut doc = document.lock().unwrap();
            doc.set_attribute(anchor, ATTR_USE_API, "");
        }
        let engine = FacadeEngine::new(document.clone(), FacadeOptions::default(), desktop());
        engine.setup();
        let api = test_support::counting_api();
        engine.loader().notify_ready(api.clone());

        let activated = engine.activate(anchor).await.unwrap();
        assert_eq!(activated.mode, RenderMode::ApiPlayer);

        // 再クリックしてもプレーヤーは増えない
        let err = engine.activate(anchor).await.unwrap_err();
        assert_eq!(err, FacadeError::AlreadyActivated);
        assert_eq!(api.created_count(), 1);
    }

    #[tokio::test]
    async fn test_script_failure_leaves_facade_clickable_state() {
        let (document, anchor, _) = facade_document("dQw4w9WgXcQ");
        {
            let mut doc = document.lock().unwrap();
            doc.set_attribute(anchor, ATTR_USE_API, "");
        }
        let engine = FacadeEngine::new(document.clone(), FacadeOptions::default(), desktop());
        engine.setup();
        engine.loader().notify_failure("network error");

        let err = engine.activate(anchor).await.unwrap_err();
        assert!(matches!(err, FacadeError::ScriptLoadFailed(_)));

        // 要素は未変更のまま。再クリックしても同じ失敗が返る（リトライなし）
        let doc = document.lock().unwrap();
        assert!(doc.is_attached(anchor));
        assert!(!doc.has_class(anchor, ACTIVATED_CLASS));
        drop(doc);
        let err = engine.activate(anchor).await.unwrap_err();
        assert!(matches!(err, FacadeError::ScriptLoadFailed(_)));
    }

    #[tokio::test]
    async fn test_escape_closes_modal_and_clears_placeholder() {
        let (document, anchor, _) = facade_document("dQw4w9WgXcQ");
        {
            let mut doc = document.lock().unwrap();
            doc.set_attribute(anchor, ATTR_MODAL, "true");
        }
        let engine = FacadeEngine::new(document.clone(), FacadeOptions::default(), desktop());
        engine.setup();

        engine.activate(anchor).await.unwrap();
        {
            let doc = document.lock().unwrap();
            let placeholder = doc.get_element_by_id(MODAL_PLACEHOLDER_ID).unwrap();
            assert!(!doc.children(placeholder).is_empty());
        }

        engine
            .dispatch(InputEvent::KeyDown {
                key: "Escape".to_string(),
            })
            .await;

        let doc = document.lock().unwrap();
        let placeholder = doc.get_element_by_id(MODAL_PLACEHOLDER_ID).unwrap();
        assert!(doc.children(placeholder).is_empty());
        let modal_root = doc
            .query(&Selector::Class(MODAL_CLASS.to_string()))
            .unwrap();
        assert!(!doc.has_class(modal_root, MODAL_ACTIVE_CLASS));
    }

    #[tokio::test]
    async fn test_close_button_click_closes_modal() {
        let (document, anchor, _) = facade_document("dQw4w9WgXcQ");
        {
            let mut doc = document.lock().unwrap();
            doc.set_attribute(anchor, ATTR_MODAL, "true");
        }
        let engine = FacadeEngine::new(document.clone(), FacadeOptions::default(), desktop());
        engine.setup();
        engine.activate(anchor).await.unwrap();

        let close_button = {
            let doc = document.lock().unwrap();
            doc.query(&Selector::Class(MODAL_CLOSE_CLASS.to_string()))
                .unwrap()
        };
        engine
            .dispatch(InputEvent::Click {
                target: close_button,
            })
            .await;

        let doc = document.lock().unwrap();
        let modal_root = doc
            .query(&Selector::Class(MODAL_CLASS.to_string()))
            .unwrap();
        assert!(!doc.has_class(modal_root, MODAL_ACTIVE_CLASS));
    }

    #[tokio::test]
    async fn test_hover_warms_only_when_api_path_is_likely() {
        // デスクトップではウォームアップしない
        let (document, _, img) = facade_document("dQw4w9WgXcQ");
        let engine = FacadeEngine::new(document.clone(), FacadeOptions::default(), desktop());
        engine.setup();
        engine.dispatch(InputEvent::PointerOver { target: img }).await;
        assert!(document
            .lock()
            .unwrap()
            .query_selector("link")
            .is_none());

        // モバイルではプリコネクトが入る
        let (document, _, img) = facade_document("dQw4w9WgXcQ");
        let engine = FacadeEngine::new(document.clone(), FacadeOptions::default(), mobile());
        engine.setup();
        engine.dispatch(InputEvent::FocusIn { target: img }).await;
        let doc = document.lock().unwrap();
        assert_eq!(
            doc.query_all(&Selector::Tag("link".to_string())).len(),
            PRECONNECT_ORIGINS.len()
        );
    }

    #[tokio::test]
    async fn test_dynamically_added_facade_is_registered_lazily() {
        let (document, _, _) = facade_document("dQw4w9WgXcQ");
        let engine = FacadeEngine::new(document.clone(), FacadeOptions::default(), desktop());
        engine.setup();

        // setup後に追加された要素もクリックで動く
        let late = {
            let mut doc = document.lock().unwrap();
            let body = doc.body();
            let late = doc.create_element("a");
            doc.add_class(late, "youtube-facade");
            doc.set_attribute(late, ATTR_VIDEO_ID, "n62zZATx9Ts");
            doc.append_child(body, late);
            late
        };

        let activated = engine.activate(late).await.unwrap();
        assert_eq!(activated.video_id, "n62zZATx9Ts");
    }
}
