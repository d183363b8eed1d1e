use std::sync::Arc;

use anyhow::Context;
use axum::{
    debug_handler,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use rand::Rng;
use tracing::info;

use crate::{
    render::{self, Renderer},
    AppResult, AppState, AssetUrls,
};

use super::{
    card::{StreamCard, DEFAULT_TITLE},
    chat::{self, ChatEntry},
};

/// Raw `/make_stream` parameters. A repeated key keeps its first value.
#[derive(Debug, Default)]
pub struct MakeStreamQuery {
    pub i: Option<String>,
    pub t: Option<String>,
    pub c1u: Option<String>,
    pub c1t: Option<String>,
    pub c2u: Option<String>,
    pub c2t: Option<String>,
    pub c3u: Option<String>,
    pub c3t: Option<String>,
    pub c4u: Option<String>,
    pub c4t: Option<String>,
}

impl MakeStreamQuery {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query = MakeStreamQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "i" => &mut query.i,
                "t" => &mut query.t,
                "c1u" => &mut query.c1u,
                "c1t" => &mut query.c1t,
                "c2u" => &mut query.c2u,
                "c2t" => &mut query.c2t,
                "c3u" => &mut query.c3u,
                "c3t" => &mut query.c3t,
                "c4u" => &mut query.c4u,
                "c4t" => &mut query.c4t,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

/// The query after defaults are applied and incomplete chat pairs dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub image: Option<String>,
    pub title: String,
    pub user_chats: Vec<ChatEntry>,
}

impl From<MakeStreamQuery> for RenderRequest {
    fn from(query: MakeStreamQuery) -> Self {
        let MakeStreamQuery { i, t, c1u, c1t, c2u, c2t, c3u, c3t, c4u, c4t } = query;

        let user_chats = [(c1u, c1t), (c2u, c2t), (c3u, c3t), (c4u, c4t)]
            .into_iter()
            .filter_map(|(user, text)| chat::text_entry(user, text))
            .collect();

        RenderRequest {
            image: i.filter(|i| !i.is_empty()),
            title: t.filter(|t| !t.is_empty()).unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
            user_chats,
        }
    }
}

impl RenderRequest {
    pub fn into_card<R: Rng + ?Sized>(self, rng: &mut R, assets: &AssetUrls) -> StreamCard {
        StreamCard {
            title: self.title,
            image_url: self.image.map(|name| assets.image(&name)),
            chats: chat::compose(rng, self.user_chats, &assets.base),
        }
    }
}

#[debug_handler(state = AppState)]
pub(crate) async fn make_stream(
    State(renderer): State<Arc<dyn Renderer>>,
    State(assets): State<AssetUrls>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Response> {
    let request = RenderRequest::from(MakeStreamQuery::from_pairs(pairs));
    let card = request.into_card(&mut rand::rng(), &assets);
    info!(
        title = %card.title,
        image = card.image_url.as_deref().unwrap_or(""),
        chats = card.chats.len(),
        "rendering stream card"
    );

    let png = render::render_blocking(renderer, card.to_html())
        .await
        .context("Error in /make_stream")?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
        ],
        png,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn query(pairs: &[(&str, &str)]) -> MakeStreamQuery {
        MakeStreamQuery::from_pairs(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())))
    }

    #[test]
    fn first_value_wins_for_repeated_keys() {
        let query = query(&[("t", "a"), ("t", "b"), ("c1u", "A"), ("c1u", "B"), ("c1t", "hi")]);
        assert_eq!(query.t.as_deref(), Some("a"));
        assert_eq!(query.c1u.as_deref(), Some("A"));
        assert_eq!(query.c1t.as_deref(), Some("hi"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let request = RenderRequest::from(query(&[("x", "1"), ("c5u", "Eve"), ("c5t", "hi")]));
        assert_eq!(request, RenderRequest::from(query(&[])));
    }

    #[test]
    fn defaults_apply_when_fields_are_missing() {
        let request = RenderRequest::from(query(&[]));
        assert_eq!(request.image, None);
        assert_eq!(request.title, DEFAULT_TITLE);
        assert!(request.user_chats.is_empty());
    }

    #[test]
    fn empty_title_and_image_are_absent() {
        let request = RenderRequest::from(query(&[("i", ""), ("t", "")]));
        assert_eq!(request.image, None);
        assert_eq!(request.title, DEFAULT_TITLE);
    }

    #[test]
    fn only_complete_pairs_survive() {
        let request = RenderRequest::from(query(&[
            ("c1u", "Alice"),
            ("c1t", "Hello"),
            ("c2u", "Bob"),
            ("c3t", "orphan text"),
            ("c4u", "Dana"),
            ("c4t", "hi"),
        ]));
        assert_eq!(
            request.user_chats,
            vec![
                ChatEntry::Text { user: "Alice".into(), text: "Hello".into() },
                ChatEntry::Text { user: "Dana".into(), text: "hi".into() },
            ]
        );
    }

    #[test]
    fn card_resolves_asset_urls() {
        let assets = AssetUrls::new("https://cdn.example/");
        let card = RenderRequest::from(query(&[("i", "scene"), ("t", "TestShow")]))
            .into_card(&mut StdRng::seed_from_u64(1), &assets);

        assert_eq!(card.title, "TestShow");
        assert_eq!(card.image_url.as_deref(), Some("https://cdn.example/scene.png"));
        assert!(card.chats.iter().all(|c| match c {
            ChatEntry::Emote { emote_url, .. } => emote_url.starts_with("https://cdn.example/YA"),
            ChatEntry::Text { .. } => false,
        }));
    }
}
