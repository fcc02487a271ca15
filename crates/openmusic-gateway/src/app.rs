use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use openmusic_service::COVER_ROUTE;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::*;
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        let covers = state.services().albums.covers();
        let cover_limit = DefaultBodyLimit::max(covers.max_bytes());
        let cover_files = ServeDir::new(covers.dir());

        Router::new()
            .route("/health", get(health_handler))
            .route("/albums", post(add_album_handler))
            .route(
                "/albums/{id}",
                get(get_album_handler)
                    .put(edit_album_handler)
                    .delete(delete_album_handler),
            )
            .route(
                "/albums/{id}/covers",
                post(upload_cover_handler).layer(cover_limit),
            )
            .route(
                "/albums/{id}/likes",
                post(toggle_like_handler).get(get_likes_handler),
            )
            .nest_service(COVER_ROUTE, cover_files)
            .route("/songs", post(add_song_handler).get(list_songs_handler))
            .route(
                "/songs/{id}",
                get(get_song_handler)
                    .put(edit_song_handler)
                    .delete(delete_song_handler),
            )
            .route("/users", post(add_user_handler))
            .route("/users/{id}", get(get_user_handler))
            .route(
                "/authentications",
                post(login_handler)
                    .put(refresh_handler)
                    .delete(logout_handler),
            )
            .route(
                "/playlists",
                post(add_playlist_handler).get(list_playlists_handler),
            )
            .route("/playlists/{id}", delete(delete_playlist_handler))
            .route(
                "/playlists/{id}/songs",
                post(add_playlist_song_handler)
                    .get(get_playlist_songs_handler)
                    .delete(delete_playlist_song_handler),
            )
            .route("/export/playlists/{id}", post(export_playlist_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
