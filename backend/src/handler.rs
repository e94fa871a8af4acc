use crate::{client::Clients, game::SharedGame, ws};
use uuid::Uuid;
use warp::{http::StatusCode, Rejection, Reply};

type Result<T> = std::result::Result<T, Rejection>;

// Every connection is its own viewer; there is no registration step
pub async fn ws_handler(ws: warp::ws::Ws, clients: Clients, game: SharedGame) -> Result<impl Reply> {
    let id = Uuid::new_v4().as_simple().to_string();
    Ok(ws.on_upgrade(move |socket| ws::client_connection(socket, id, clients, game)))
}

pub async fn health_handler() -> Result<impl Reply> {
    Ok(StatusCode::OK)
}
