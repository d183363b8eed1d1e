use crate::{include_res, res::html_escape};

use super::chat::ChatEntry;

pub const DEFAULT_TITLE: &str = "야화님 방송 중!";

/// Everything that goes on the page before it is rasterized.
#[derive(Debug, Clone)]
pub struct StreamCard {
    pub title: String,
    pub image_url: Option<String>,
    pub chats: Vec<ChatEntry>,
}

impl StreamCard {
    pub fn to_html(&self) -> String {
        let image = match &self.image_url {
            Some(url) => include_res!(str, "/pages/stream/image.html")
                .replace("{image_url}", &html_escape(url)),
            None => String::new(),
        };

        let chats: String = self.chats.iter().map(chat_to_html).collect();

        include_res!(str, "/pages/stream/card.html")
            .replace("{image}", &image)
            .replace("{chats}", &chats)
            .replace("{title}", &html_escape(&self.title))
    }
}

fn chat_to_html(chat: &ChatEntry) -> String {
    match chat {
        ChatEntry::Text { user, text } => include_res!(str, "/pages/stream/chat_text.html")
            .replace("{user}", &html_escape(user))
            .replace("{text}", &html_escape(text)),
        ChatEntry::Emote { user, emote_url } => include_res!(str, "/pages/stream/chat_emote.html")
            .replace("{user}", &html_escape(user))
            .replace("{emote_url}", &html_escape(emote_url)),
    }
}
