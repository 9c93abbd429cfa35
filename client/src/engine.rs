/// Browser layout engine families that matter for boundary stacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEngine {
    Modern,
    /// Internet Explorer (Trident/MSIE).
    Trident,
    /// EdgeHTML, before the Chromium switch.
    LegacyEdge,
    /// Presto-era Opera.
    Presto,
}

impl RenderEngine {
    pub fn from_user_agent(ua: &str) -> Self {
        let ua = ua.to_ascii_lowercase();
        if ua.contains("trident/") || ua.contains("msie ") {
            RenderEngine::Trident
        } else if ua.contains("edge/") {
            RenderEngine::LegacyEdge
        } else if ua.contains("presto/") || ua.starts_with("opera/") {
            RenderEngine::Presto
        } else {
            RenderEngine::Modern
        }
    }

    pub fn detect() -> Self {
        let ua = web_sys::window()
            .and_then(|w| w.navigator().user_agent().ok())
            .unwrap_or_default();
        Self::from_user_agent(&ua)
    }

    /// Whether a hovered boundary is drawn above its neighbours.
    pub fn supports_raise(self) -> bool {
        self == RenderEngine::Modern
    }
}
