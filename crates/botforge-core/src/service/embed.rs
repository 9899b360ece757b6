//! Embeddable widget snippet.

use botforge_types::bot::BotId;

/// HTML snippet an operator pastes into a third-party page to load the chat
/// widget for `bot_id`. Pure: touches no state.
pub fn embed_snippet(widget_base_url: &str, bot_id: BotId) -> String {
    let base = widget_base_url.trim_end_matches('/');
    format!(r#"<script src="{base}/widget.js" data-bot-id="{bot_id}"></script>"#)
}
