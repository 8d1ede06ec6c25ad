use std::sync::Arc;

use poem::{
    EndpointExt, Route,
    middleware::{AddData, AddDataEndpoint, Cors, CorsEndpoint},
};
use poem_openapi::OpenApiService;

use crate::core::engine::StickerEngine;
use crate::routes::sticker::ApiSticker;
use crate::settings::Config;

pub mod core;
pub mod error;
pub mod logging;
pub mod routes;
pub mod schemas;
pub mod settings;

pub struct AppState {
    pub engine: Arc<StickerEngine>,
}

pub fn init_openapi_route(
    app_state: Arc<AppState>,
    config: &Config,
) -> CorsEndpoint<AddDataEndpoint<Route, Arc<AppState>>> {
    let prefix = config.prefix.clone().unwrap_or("/".to_string());
    let openapi_route =
        OpenApiService::new(ApiSticker, "Sticker API", "1.0").server(prefix.clone());

    let openapi_json_endpoint = openapi_route.spec_endpoint();
    let ui = openapi_route.swagger_ui();
    Route::new()
        .nest(prefix, openapi_route)
        .nest("/docs", ui)
        .at("openapi.json", openapi_json_endpoint)
        .with(AddData::new(app_state))
        .with(cors(config))
}

// An empty origin list would make `Cors` accept any origin.
fn cors(config: &Config) -> Cors {
    let origins = config.origins();
    let cors = if origins.is_empty() {
        tracing::warn!("ALLOWED_ORIGINS is empty, rejecting all cross-origin requests");
        Cors::new().allow_origins_fn(|_| false)
    } else {
        Cors::new().allow_origins(origins)
    };
    cors.allow_credentials(true)
}
