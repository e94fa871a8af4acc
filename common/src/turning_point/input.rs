use crate::turning_point::board::BoardPosition;
use crate::turning_point::direction::{offset, Direction};
use crate::turning_point::game_state::GameState;
use crate::turning_point::piece::{Piece, PieceKind, Team};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a move intent is turned away. None of these touch the game state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("The game is already finished")]
    GameAlreadyFinished,
    #[error("It is not your turn")]
    NotYourTurn,
    #[error("That piece is not in play")]
    UnknownOrCapturedPiece,
    #[error("That piece cannot move in that direction")]
    IllegalDirectionForPiece,
    #[error("That move leaves the board")]
    OutOfBounds,
    #[error("That square is held by your own piece")]
    FriendlyOccupied,
    #[error("Pawns cannot capture")]
    PawnCannotCapture,
}

impl MoveError {
    pub fn code(&self) -> &'static str {
        match self {
            MoveError::GameAlreadyFinished => "GameAlreadyFinished",
            MoveError::NotYourTurn => "NotYourTurn",
            MoveError::UnknownOrCapturedPiece => "UnknownOrCapturedPiece",
            MoveError::IllegalDirectionForPiece => "IllegalDirectionForPiece",
            MoveError::OutOfBounds => "OutOfBounds",
            MoveError::FriendlyOccupied => "FriendlyOccupied",
            MoveError::PawnCannotCapture => "PawnCannotCapture",
        }
    }
}

// Piece and direction stay as raw tokens so that an unknown token becomes a
// move rejection rather than a malformed message
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawMove {
    #[serde(alias = "player")]
    pub team: Team,
    #[serde(alias = "character")]
    pub piece_kind: String,
    #[serde(alias = "move")]
    pub direction: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub from: BoardPosition,
    pub to: BoardPosition,
    // The opposing piece sitting on `to`, if any
    pub captures: Option<Piece>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ValidMove {
    team: Team,
    kind: PieceKind,
    direction: Direction,
    target: Target,
}

impl ValidMove {
    // validates, in order:
    // - the game is still running
    // - it is the mover's turn
    // - the piece token names a piece still in play
    // - the direction token is legal for that piece
    // - the destination is on the board and not held by a friendly piece
    // - pawns do not land on opposing pieces
    pub fn new(raw: RawMove, state: &GameState) -> Result<Self, MoveError> {
        ensure_accepting(state, raw.team)?;
        let kind: PieceKind = raw
            .piece_kind
            .parse()
            .map_err(|_| MoveError::UnknownOrCapturedPiece)?;
        if !state.roster(raw.team).contains(kind) {
            return Err(MoveError::UnknownOrCapturedPiece);
        }
        let direction: Direction = raw
            .direction
            .parse()
            .map_err(|_| MoveError::IllegalDirectionForPiece)?;
        ValidMove::check(state, raw.team, kind, direction)
    }

    pub fn check(
        state: &GameState,
        team: Team,
        kind: PieceKind,
        direction: Direction,
    ) -> Result<Self, MoveError> {
        let target = validate(state, team, kind, direction)?;
        Ok(ValidMove {
            team,
            kind,
            direction,
            target,
        })
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn target(&self) -> Target {
        self.target
    }
}

fn ensure_accepting(state: &GameState, team: Team) -> Result<(), MoveError> {
    if state.winner().is_some() {
        return Err(MoveError::GameAlreadyFinished);
    }
    if state.current_turn() != team {
        return Err(MoveError::NotYourTurn);
    }
    Ok(())
}

/// Checks a move against the current state without changing it.
pub fn validate(
    state: &GameState,
    team: Team,
    kind: PieceKind,
    direction: Direction,
) -> Result<Target, MoveError> {
    ensure_accepting(state, team)?;
    let piece = Piece::new(team, kind);
    if !state.roster(team).contains(kind) {
        return Err(MoveError::UnknownOrCapturedPiece);
    }
    // A rostered piece is always on the board
    let from = state
        .board()
        .find(piece)
        .ok_or(MoveError::UnknownOrCapturedPiece)?;

    let (d_row, d_col) = offset(kind, direction)
        .ok_or(MoveError::IllegalDirectionForPiece)?
        .resolve(team);
    let to = from.offset(d_row, d_col).ok_or(MoveError::OutOfBounds)?;

    let captures = match state.board().get(to) {
        None => None,
        Some(occupant) if occupant.is_owned_by(team) => {
            return Err(MoveError::FriendlyOccupied);
        }
        Some(_) if kind.is_pawn() => return Err(MoveError::PawnCannotCapture),
        // Heroes jump: squares passed over are not inspected
        Some(occupant) => Some(occupant),
    };

    Ok(Target { from, to, captures })
}
