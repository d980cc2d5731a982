use axum::{
    Json, Router, debug_handler,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use pokedex_backend::config::Config;
use pokedex_backend::error::AppError;
use pokedex_backend::model::Pokemon;
use pokedex_backend::service::PokedexService;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct AppState {
    service: PokedexService,
}

fn load_config() -> Result<Config, AppError> {
    let config_str = include_str!("../config/config.toml");
    toml::from_str(config_str).map_err(|e| {
        tracing::error!("Failed to parse config.toml: {}", e);
        AppError::from(e)
    })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let service = match PokedexService::new(&config.upstream) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!("Failed to initialize upstream client: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = Arc::new(AppState { service });

    let app = Router::new()
        .route("/pokemon/random", get(get_random_pokemon_handler))
        .route("/pokemon/{name_or_id}", get(get_pokemon_handler))
        .with_state(app_state);

    let listener = match tokio::net::TcpListener::bind("0.0.0.0:3000").await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind to address 0.0.0.0:3000: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

#[debug_handler]
async fn get_pokemon_handler(
    State(app_state): State<Arc<AppState>>,
    Path(name_or_id): Path<String>,
) -> (StatusCode, Json<Option<Pokemon>>) {
    match app_state.service.get_by_name_or_id(&name_or_id).await {
        Ok(Some(pokemon)) => {
            tracing::debug!("Resolved {:?} to species id {}", name_or_id, pokemon.id);
            (StatusCode::OK, Json(Some(pokemon)))
        }
        Ok(None) => {
            tracing::debug!("No species found for key {:?}", name_or_id);
            (StatusCode::NOT_FOUND, Json(None))
        }
        Err(e) => {
            tracing::error!("Lookup for {:?} failed: {}", name_or_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(None))
        }
    }
}

#[debug_handler]
async fn get_random_pokemon_handler(
    State(app_state): State<Arc<AppState>>,
) -> (StatusCode, Json<Option<Pokemon>>) {
    match app_state.service.get_random().await {
        Ok(Some(pokemon)) => {
            tracing::debug!("Random draw resolved to species id {}", pokemon.id);
            (StatusCode::OK, Json(Some(pokemon)))
        }
        Ok(None) => {
            // Ids in range may be unassigned upstream; the caller retries.
            tracing::debug!("Random draw did not resolve to a species");
            (StatusCode::NOT_FOUND, Json(None))
        }
        Err(e) => {
            tracing::error!("Random lookup failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(None))
        }
    }
}
