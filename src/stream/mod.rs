pub mod card;
pub mod chat;
mod make;

use axum::{routing::get, Router};

use crate::AppState;

pub use card::StreamCard;
pub use chat::ChatEntry;
pub use make::{MakeStreamQuery, RenderRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/make_stream", get(make::make_stream))
}
