use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::playlist::get_songs,
        api::export::export_playlist,
    ),
    tags(
        (name = "openmusic", description = "Open Music API")
    )
)]
pub struct ApiDoc;
