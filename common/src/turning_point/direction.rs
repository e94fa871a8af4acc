use crate::turning_point::piece::{PieceKind, Team};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
#[error("Unknown direction token {0:?}")]
pub struct DirectionParseError(pub String);

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    L,
    R,
    F,
    B,
    FL,
    FR,
    BL,
    BR,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::L,
        Direction::R,
        Direction::F,
        Direction::B,
        Direction::FL,
        Direction::FR,
        Direction::BL,
        Direction::BR,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Direction::L => "L",
            Direction::R => "R",
            Direction::F => "F",
            Direction::B => "B",
            Direction::FL => "FL",
            Direction::FR => "FR",
            Direction::BL => "BL",
            Direction::BR => "BR",
        }
    }

    pub fn allowed_for(kind: PieceKind) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |direction| offset(kind, *direction).is_some())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Direction {
    type Err = DirectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.token() == s)
            .ok_or_else(|| DirectionParseError(s.to_string()))
    }
}

/// A step expressed from the mover's point of view: `forward` is toward the
/// opponent's home row, `right` is toward higher column indices for both teams.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Offset {
    pub forward: i8,
    pub right: i8,
}

impl Offset {
    const fn new(forward: i8, right: i8) -> Self {
        Offset { forward, right }
    }

    // (row delta, col delta) on the board for the given team
    pub fn resolve(self, team: Team) -> (i8, i8) {
        (self.forward * team.forward(), self.right)
    }
}

/// Movement table keyed by (kind, direction). `None` means the kind may not move that way.
pub fn offset(kind: PieceKind, direction: Direction) -> Option<Offset> {
    use Direction::*;
    use PieceKind::*;
    let offset = match (kind, direction) {
        (P1 | P2 | P3, L) => Offset::new(0, -1),
        (P1 | P2 | P3, R) => Offset::new(0, 1),
        (P1 | P2 | P3, F) => Offset::new(1, 0),
        (P1 | P2 | P3, B) => Offset::new(-1, 0),
        (H1, L) => Offset::new(0, -2),
        (H1, R) => Offset::new(0, 2),
        (H1, F) => Offset::new(2, 0),
        (H1, B) => Offset::new(-2, 0),
        (H2, FL) => Offset::new(2, -2),
        (H2, FR) => Offset::new(2, 2),
        (H2, BL) => Offset::new(-2, -2),
        (H2, BR) => Offset::new(-2, 2),
        _ => return None,
    };
    Some(offset)
}
