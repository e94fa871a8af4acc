use crate::turning_point::piece::{Piece, PieceKind, Team};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const BOARD_SIZE: usize = 5;

#[derive(Debug, PartialEq)]
pub enum Coordinate {
    Row,
    Col,
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Row => write!(f, "row"),
            Coordinate::Col => write!(f, "col"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum BoardPositionError {
    #[error("{0} {1} exceeds board size {}", BOARD_SIZE)]
    OutOfBounds(Coordinate, usize),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoardPosition {
    row: usize,
    col: usize,
}

impl BoardPosition {
    pub fn new(row: usize, col: usize) -> Result<Self, BoardPositionError> {
        if row >= BOARD_SIZE {
            return Err(BoardPositionError::OutOfBounds(Coordinate::Row, row));
        }
        if col >= BOARD_SIZE {
            return Err(BoardPositionError::OutOfBounds(Coordinate::Col, col));
        }
        Ok(BoardPosition { row, col })
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    // None when the shifted position falls off the grid
    pub fn offset(&self, d_row: i8, d_col: i8) -> Option<BoardPosition> {
        let row = self.row.checked_add_signed(d_row as isize)?;
        let col = self.col.checked_add_signed(d_col as isize)?;
        BoardPosition::new(row, col).ok()
    }

    fn all() -> impl Iterator<Item = BoardPosition> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| BoardPosition { row, col }))
    }
}

impl fmt::Display for BoardPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The 5x5 grid. Serializes as rows of `null` or `"A-H2"` style piece identifiers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Board([[Option<Piece>; BOARD_SIZE]; BOARD_SIZE]);

impl Default for Board {
    fn default() -> Self {
        Board::initial()
    }
}

impl Board {
    pub fn empty() -> Self {
        Board([[None; BOARD_SIZE]; BOARD_SIZE])
    }

    // Team A fills row 0 and team B mirrors it on row 4, both in PieceKind::ALL order
    pub fn initial() -> Self {
        let mut board = Board::empty();
        for (col, kind) in PieceKind::ALL.into_iter().enumerate() {
            board.0[0][col] = Some(Piece::new(Team::A, kind));
            board.0[BOARD_SIZE - 1][col] = Some(Piece::new(Team::B, kind));
        }
        board
    }

    pub fn get(&self, pos: BoardPosition) -> Option<Piece> {
        self.0[pos.row][pos.col]
    }

    pub fn rows(&self) -> &[[Option<Piece>; BOARD_SIZE]; BOARD_SIZE] {
        &self.0
    }

    pub fn find(&self, piece: Piece) -> Option<BoardPosition> {
        BoardPosition::all().find(|pos| self.get(*pos) == Some(piece))
    }

    pub fn pieces(&self) -> impl Iterator<Item = (BoardPosition, Piece)> + '_ {
        BoardPosition::all().filter_map(|pos| self.get(pos).map(|piece| (pos, piece)))
    }

    // Returns whatever previously occupied the cell
    pub fn place(&mut self, pos: BoardPosition, piece: Piece) -> Option<Piece> {
        self.0[pos.row][pos.col].replace(piece)
    }

    pub fn take(&mut self, pos: BoardPosition) -> Option<Piece> {
        self.0[pos.row][pos.col].take()
    }
}
