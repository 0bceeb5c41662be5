//! プラットフォーム判定
//!
//! モバイル判定とPlayer API必須判定のヒューリスティックを提供する。
//! テスト分離のため、グローバルを参照せずエンジン構築時に注入する。

/// モバイル判定で使うビューポート幅の閾値（px）
pub const MOBILE_VIEWPORT_MAX_WIDTH: u32 = 600;

/// ホスト環境の情報
#[derive(Debug, Clone)]
pub struct Platform {
    user_agent: String,
    vendor: String,
    viewport_width: u32,
}

impl Platform {
    pub fn new(
        user_agent: impl Into<String>,
        vendor: impl Into<String>,
        viewport_width: u32,
    ) -> Self {
        Self {
            user_agent: user_agent.into(),
            vendor: vendor.into(),
            viewport_width,
        }
    }

    /// モバイル端末かどうか
    ///
    /// ビューポート幅が閾値未満、かつUser-Agentに `Mobi` を含む場合に
    /// モバイルとみなす。
    pub fn is_mobile(&self) -> bool {
        self.viewport_width < MOBILE_VIEWPORT_MAX_WIDTH && self.user_agent.contains("Mobi")
    }

    /// 自動再生のためにPlayer APIが必要かどうか
    ///
    /// Apple系ベンダーまたはモバイルUser-Agentではプレーンな
    /// iframe埋め込みの自動再生が効かないため、API経由で再生する。
    pub fn requires_player_api(&self) -> bool {
        self.vendor.contains("Apple") || self.user_agent.contains("Mobi")
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP_UA: &str =
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0";
    const MOBILE_UA: &str =
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile Safari Mobi";

    #[test]
    fn test_desktop_is_not_mobile() {
        let platform = Platform::new(DESKTOP_UA, "Google Inc.", 1920);
        assert!(!platform.is_mobile());
        assert!(!platform.requires_player_api());
    }

    #[test]
    fn test_mobile_requires_api() {
        let platform = Platform::new(MOBILE_UA, "Apple Computer, Inc.", 375);
        assert!(platform.is_mobile());
        assert!(platform.requires_player_api());
    }

    #[test]
    fn test_wide_viewport_is_not_mobile() {
        // Mobi UAでもビューポートが広ければモバイル扱いしない
        let platform = Platform::new(MOBILE_UA, "Apple Computer, Inc.", 1024);
        assert!(!platform.is_mobile());
        assert!(platform.requires_player_api());
    }

    #[test]
    fn test_apple_vendor_on_desktop_requires_api() {
        let platform = Platform::new(DESKTOP_UA, "Apple Computer, Inc.", 1440);
        assert!(platform.requires_player_api());
        assert!(!platform.is_mobile());
    }
}
