//! YouTube埋め込みファサードのヘッドレスエンジン
//!
//! 軽量なプレースホルダー（画像・リンク・ボタン）を表示しておき、
//! ユーザー操作があって初めてiframe埋め込み、またはIFrame Player API
//! 経由のプレーヤーをロードする「lite embed」パターンのコアロジック。
//!
//! エンジンはインメモリの要素ツリー（[`dom::Document`]）を所有し、
//! ホストから届く入力イベント（クリック・ホバー・キー入力）を処理
//! してツリーを変化させる。ホスト側はツリーの変更を実際のUIへ反映し、
//! 外部スクリプトのready/失敗コールバックを
//! [`facade::loader::PlayerApiLoader`] へ中継する。
//!
//! # Examples
//!
//! ```
//! use youtube_facade::{embed_url, PlayerVars};
//!
//! let url = embed_url("dQw4w9WgXcQ", &PlayerVars::stock()).unwrap();
//! assert!(url
//!     .as_str()
//!     .starts_with("https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ?"));
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod events;
pub mod facade;
pub mod platform;

pub use config::{ElementConfig, FacadeOptions, PlayerVars};
pub use dom::{Document, NodeId, Selector, SharedDocument};
pub use error::FacadeError;
pub use events::{FacadeActivated, RenderMode, ACTIVATED_EVENT};
pub use facade::controller::{FacadeEngine, InputEvent, ACTIVATED_CLASS};
pub use facade::iframe::embed_url;
pub use facade::loader::PlayerApiLoader;
pub use facade::player::{PlayerApi, PlayerApiHandle, PlayerInstance, PlayerOptions};
pub use platform::Platform;
