use crate::client::Clients;
use crate::config::{LogFormat, ServerConfig};
use crate::game::{Game, SharedGame};
use common::GameState;
use hashbrown::HashMap;
use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use warp::{
    http::{header, Method},
    Filter, Reply,
};

mod client;
mod config;
mod game;
mod handler;
mod util;
mod ws;

#[derive(Error, Debug)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config_path = ServerConfig::path_from_env();
    let config = ServerConfig::load_or_default(&config_path)?;

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, &config.log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(config.level()?)
        .with_writer(non_blocking);
    match config.log_format {
        LogFormat::Json => tracing::subscriber::set_global_default(subscriber.json().finish())?,
        LogFormat::Plain => {
            tracing::subscriber::set_global_default(subscriber.with_ansi(false).finish())?
        }
    }
    info!(
        "loaded config from {} (file present: {})",
        config_path.display(),
        config_path.exists()
    );

    let clients: Clients = Arc::new(RwLock::new(HashMap::new()));
    let game: SharedGame = Arc::new(RwLock::new(Game::new(GameState::default())));
    info!("created clients map and game state");

    let addr = config.socket_addr();
    info!("listening on {}", addr);
    warp::serve(routes(clients, game, config.static_dir.clone()))
        .run(addr)
        .await;
    Ok(())
}

fn routes(
    clients: Clients,
    game: SharedGame,
    static_dir: PathBuf,
) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    let health_route = warp::path!("health").and_then(handler::health_handler);

    let ws_route = warp::path("ws")
        .and(warp::path::end())
        .and(warp::ws())
        .and(with_clients(clients))
        .and(with_game(game))
        .and_then(handler::ws_handler);

    let static_route = warp::get().and(warp::fs::dir(static_dir));

    health_route.or(ws_route).or(static_route).with(
        warp::cors()
            .allow_credentials(true)
            .allow_methods(&[Method::OPTIONS, Method::GET])
            .allow_headers(vec![
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
            ])
            .max_age(300)
            .allow_any_origin(),
    )
}

fn with_clients(clients: Clients) -> impl Filter<Extract = (Clients,), Error = Infallible> + Clone {
    warp::any().map(move || clients.clone())
}

fn with_game(game: SharedGame) -> impl Filter<Extract = (SharedGame,), Error = Infallible> + Clone {
    warp::any().map(move || game.clone())
}
