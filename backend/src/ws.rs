use crate::client::{Client, Clients, Sender};
use crate::game::SharedGame;
use common::messages::PING;
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{error, info, warn};
use warp::ws::{Message, WebSocket};

pub async fn client_connection(ws: WebSocket, id: String, clients: Clients, game: SharedGame) {
    let (client_ws_sender, mut client_ws_rcv) = ws.split();
    let (client_sender, client_rcv) = mpsc::unbounded_channel();

    let client_rcv = UnboundedReceiverStream::new(client_rcv);
    tokio::task::spawn(client_rcv.forward(client_ws_sender).map(|result| {
        if let Err(e) = result {
            error!("error sending websocket msg: {}", e);
        }
    }));

    attach(&id, Sender(client_sender), &clients, &game).await;
    info!("{} connected", id);

    while let Some(result) = client_ws_rcv.next().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(e) => {
                error!("error receiving ws message for id: {}): {}", id, e);
                break;
            }
        };
        client_msg(&id, msg, &clients, &game).await;
    }

    clients.write().await.remove(&id);
    info!("{} disconnected", id);
}

// The game lock is held until the viewer is registered, so the init snapshot is
// never followed by a missed or out-of-order update. Lock order is always game, then clients.
async fn attach(id: &str, sender: Sender, clients: &Clients, game: &SharedGame) {
    let game = game.read().await;
    game.send_init(&sender);
    clients
        .write()
        .await
        .insert(id.to_string(), Client { sender });
}

#[tracing::instrument(skip(clients, game))]
async fn client_msg(id: &str, msg: Message, clients: &Clients, game: &SharedGame) {
    info!("received message from {}: {:?}", id, msg);
    // Binary frames get a malformed reply; close, ping and pong frames are ignored
    let message = match msg.to_str() {
        Ok(v) => Some(v.trim()),
        Err(_) if msg.is_binary() => None,
        Err(_) => return,
    };

    if message == Some(PING) {
        return;
    }

    let mut game = game.write().await;
    let clients_map = clients.read().await;
    let client = match clients_map.get(id) {
        Some(v) => v,
        None => {
            error!(
                "Message from client {} did not match any connected clients",
                id
            );
            return;
        }
    };
    match message {
        Some(message) => game.handle_message(
            message,
            &client.sender,
            clients_map.values().map(|c| &c.sender),
        ),
        None => {
            warn!("Binary frame from {} is not a move intent", id);
            game.reject_malformed(&client.sender);
        }
    }
}
