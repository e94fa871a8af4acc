use crate::client::SendMsg;
use crate::util;
use common::{messages::Response, GameState, RawMove};
use serde_json::from_str;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

// The one game this server runs. Every validate-then-apply goes through its write lock.
pub type SharedGame = Arc<RwLock<Game>>;

#[derive(Debug, Default)]
pub struct Game {
    game_state: GameState,
}

impl Game {
    pub fn new(game_state: GameState) -> Self {
        Game { game_state }
    }

    #[cfg(test)]
    pub fn state(&self) -> &GameState {
        &self.game_state
    }

    pub fn send_init(&self, viewer: &impl SendMsg) {
        send_message(
            viewer,
            &Response::Init {
                data: self.game_state.snapshot(),
            },
        );
    }

    // Rejections go back to `origin` alone. Accepted moves are published to every viewer,
    // which is expected to include `origin`.
    pub fn handle_message<'a, S: SendMsg + 'a>(
        &mut self,
        msg: &str,
        origin: &S,
        viewers: impl IntoIterator<Item = &'a S>,
    ) {
        let raw: RawMove = match from_str(msg) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("Failed to deserialize input into move intent: {}", err);
                self.reject_malformed(origin);
                return;
            }
        };
        let outcome = match self.game_state.submit(raw) {
            Ok(outcome) => outcome,
            Err(err) => {
                info!(code = err.code(), "Move rejected: {}", err);
                send_message(origin, &Response::rejected(err));
                return;
            }
        };

        info!("Accepted move {}", outcome.record);
        if let Some(capture) = outcome.capture {
            info!("{}", capture);
        }
        if let Some(winner) = outcome.winner {
            info!("Team {} wins", winner);
        }
        self.publish(viewers);
    }

    // For frames that can never hold a move intent, such as binary payloads
    pub fn reject_malformed(&self, origin: &impl SendMsg) {
        send_message(origin, &Response::malformed());
    }

    fn publish<'a, S: SendMsg + 'a>(&self, viewers: impl IntoIterator<Item = &'a S>) {
        let update = Response::Update {
            data: self.game_state.snapshot(),
        };
        let Some(update) = serialize(&update) else {
            return;
        };
        for viewer in viewers {
            // If the message fails to send even after retries, there's not much we can do but proceed
            let _ = util::retry(1, || viewer.send(&update));
        }
    }
}

fn serialize(response: &Response) -> Option<String> {
    match response.to_json() {
        Ok(json) => Some(json),
        Err(err) => {
            error!("Failed to serialize response: {}", err);
            None
        }
    }
}

fn send_message(client: &impl SendMsg, response: &Response) {
    if let Some(json) = serialize(response) {
        let _ = util::retry(1, || client.send(&json));
    }
}
