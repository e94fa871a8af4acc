mod board;
mod direction;
mod game_state;
mod input;
mod piece;

pub use board::{Board, BoardPosition, BoardPositionError, Coordinate, BOARD_SIZE};
pub use direction::{offset, Direction, DirectionParseError, Offset};
pub use game_state::{
    CaptureRecord, GameState, MoveOutcome, MoveRecord, Roster, Rosters, Snapshot, Status,
};
pub use input::{validate, MoveError, RawMove, Target, ValidMove};
pub use piece::{Piece, PieceKind, PieceParseError, Team};
