use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PieceParseError {
    #[error("Unknown team token {0:?}")]
    UnknownTeam(String),
    #[error("Unknown piece kind token {0:?}")]
    UnknownKind(String),
    #[error("Piece {0:?} is not of the form <team>-<kind>")]
    Malformed(String),
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Team {
    A,
    B,
}

impl Team {
    pub fn other(self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }

    // Teams face each other: A advances down the rows, B advances up
    pub fn forward(self) -> i8 {
        match self {
            Team::A => 1,
            Team::B => -1,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Team::A => "A",
            Team::B => "B",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Team {
    type Err = PieceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Team::A),
            "B" => Ok(Team::B),
            _ => Err(PieceParseError::UnknownTeam(s.to_string())),
        }
    }
}

// Each kind appears exactly once per team, so the kind doubles as the piece's identity
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    P1,
    P2,
    P3,
    H1,
    H2,
}

impl PieceKind {
    // Starting column order, left to right
    pub const ALL: [PieceKind; 5] = [
        PieceKind::P1,
        PieceKind::H1,
        PieceKind::P2,
        PieceKind::H2,
        PieceKind::P3,
    ];

    pub fn is_pawn(self) -> bool {
        matches!(self, PieceKind::P1 | PieceKind::P2 | PieceKind::P3)
    }

    pub fn is_hero(self) -> bool {
        !self.is_pawn()
    }

    pub fn token(self) -> &'static str {
        match self {
            PieceKind::P1 => "P1",
            PieceKind::P2 => "P2",
            PieceKind::P3 => "P3",
            PieceKind::H1 => "H1",
            PieceKind::H2 => "H2",
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for PieceKind {
    type Err = PieceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PieceKind::ALL
            .into_iter()
            .find(|kind| kind.token() == s)
            .ok_or_else(|| PieceParseError::UnknownKind(s.to_string()))
    }
}

/// A team's piece. Rendered as `"<team>-<kind>"` (e.g. `"A-H2"`) on the wire only.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(into = "String", try_from = "String")]
pub struct Piece {
    pub team: Team,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(team: Team, kind: PieceKind) -> Self {
        Piece { team, kind }
    }

    pub fn is_owned_by(&self, team: Team) -> bool {
        self.team == team
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.team, self.kind)
    }
}

impl FromStr for Piece {
    type Err = PieceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (team, kind) = s
            .split_once('-')
            .ok_or_else(|| PieceParseError::Malformed(s.to_string()))?;
        Ok(Piece {
            team: team.parse()?,
            kind: kind.parse()?,
        })
    }
}

impl From<Piece> for String {
    fn from(piece: Piece) -> Self {
        piece.to_string()
    }
}

impl TryFrom<String> for Piece {
    type Error = PieceParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
