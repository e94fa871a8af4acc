use crate::turning_point::board::Board;
use crate::turning_point::direction::Direction;
use crate::turning_point::input::{MoveError, RawMove, ValidMove};
use crate::turning_point::piece::{Piece, PieceKind, Team};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Kinds a team still has in play, kept in starting column order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Roster(Vec<PieceKind>);

impl Default for Roster {
    fn default() -> Self {
        Roster(PieceKind::ALL.to_vec())
    }
}

impl Roster {
    pub fn contains(&self, kind: PieceKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn kinds(&self) -> &[PieceKind] {
        &self.0
    }

    fn remove(&mut self, kind: PieceKind) {
        self.0.retain(|k| *k != kind);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rosters([Roster; 2]);

impl Index<Team> for Rosters {
    type Output = Roster;
    fn index(&self, index: Team) -> &Self::Output {
        match index {
            Team::A => &self.0[0],
            Team::B => &self.0[1],
        }
    }
}

impl IndexMut<Team> for Rosters {
    fn index_mut(&mut self, index: Team) -> &mut Self::Output {
        match index {
            Team::A => &mut self.0[0],
            Team::B => &mut self.0[1],
        }
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    pub team: Team,
    pub piece_kind: PieceKind,
    pub direction: Direction,
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            Piece::new(self.team, self.piece_kind),
            self.direction
        )
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRecord {
    pub capturing_team: Team,
    pub captured: Piece,
}

impl fmt::Display for CaptureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} captured {}", self.capturing_team, self.captured)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    InProgress(Team),
    Finished(Team),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub record: MoveRecord,
    pub capture: Option<CaptureRecord>,
    pub winner: Option<Team>,
}

/// Full view of the game as sent to viewers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub board: Board,
    pub roster_a: Roster,
    pub roster_b: Roster,
    pub current_turn: Team,
    pub winner: Option<Team>,
    pub move_log: Vec<MoveRecord>,
    pub capture_log: Vec<CaptureRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    rosters: Rosters,
    current_turn: Team,
    winner: Option<Team>,
    move_log: Vec<MoveRecord>,
    capture_log: Vec<CaptureRecord>,
}

impl Default for GameState {
    fn default() -> Self {
        GameState::from_board(Board::initial(), Team::A)
    }
}

impl GameState {
    // Rosters are derived from whatever is on the board, so a position set up
    // here always satisfies the roster/board correspondence
    pub fn from_board(board: Board, current_turn: Team) -> Self {
        let mut rosters = Rosters::default();
        for team in [Team::A, Team::B] {
            for kind in PieceKind::ALL {
                if board.find(Piece::new(team, kind)).is_none() {
                    rosters[team].remove(kind);
                }
            }
        }
        GameState {
            board,
            rosters,
            current_turn,
            winner: None,
            move_log: Vec::new(),
            capture_log: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn roster(&self, team: Team) -> &Roster {
        &self.rosters[team]
    }

    pub fn current_turn(&self) -> Team {
        self.current_turn
    }

    pub fn winner(&self) -> Option<Team> {
        self.winner
    }

    pub fn move_log(&self) -> &[MoveRecord] {
        &self.move_log
    }

    pub fn capture_log(&self) -> &[CaptureRecord] {
        &self.capture_log
    }

    pub fn status(&self) -> Status {
        match self.winner {
            Some(winner) => Status::Finished(winner),
            None => Status::InProgress(self.current_turn),
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status(), Status::Finished(_))
    }

    /// Every (kind, direction) the side to move may play right now.
    pub fn legal_moves(&self) -> Vec<ValidMove> {
        let team = self.current_turn;
        self.rosters[team]
            .kinds()
            .iter()
            .flat_map(|kind| Direction::allowed_for(*kind).map(move |d| (*kind, d)))
            .filter_map(|(kind, direction)| ValidMove::check(self, team, kind, direction).ok())
            .collect()
    }

    pub fn make_move(
        &mut self,
        team: Team,
        kind: PieceKind,
        direction: Direction,
    ) -> Result<MoveOutcome, MoveError> {
        let valid = ValidMove::check(self, team, kind, direction)?;
        Ok(self.apply(valid))
    }

    /// Validates an inbound intent against the current state and applies it.
    pub fn submit(&mut self, raw: RawMove) -> Result<MoveOutcome, MoveError> {
        let valid = ValidMove::new(raw, self)?;
        Ok(self.apply(valid))
    }

    // Only reached through `make_move` and `submit`, so `valid` was checked against this
    // exact state and its source cell holds the mover
    fn apply(&mut self, valid: ValidMove) -> MoveOutcome {
        let team = valid.team();
        let target = valid.target();
        let mover = self.board.take(target.from);
        debug_assert_eq!(mover, Some(Piece::new(team, valid.kind())));

        let mut capture = None;
        let mut winner = None;
        if let Some(captured) = self.board.take(target.to) {
            debug_assert_eq!(Some(captured), target.captures);
            let opponent = captured.team;
            self.rosters[opponent].remove(captured.kind);
            let record = CaptureRecord {
                capturing_team: team,
                captured,
            };
            self.capture_log.push(record);
            capture = Some(record);
            if self.rosters[opponent].is_empty() {
                winner = Some(team);
            }
        }
        self.board.place(target.to, Piece::new(team, valid.kind()));

        let record = MoveRecord {
            team,
            piece_kind: valid.kind(),
            direction: valid.direction(),
        };
        self.move_log.push(record);

        match winner {
            Some(team) => self.winner = Some(team),
            None => self.current_turn = team.other(),
        }

        MoveOutcome {
            record,
            capture,
            winner,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            roster_a: self.rosters[Team::A].clone(),
            roster_b: self.rosters[Team::B].clone(),
            current_turn: self.current_turn,
            winner: self.winner,
            move_log: self.move_log.clone(),
            capture_log: self.capture_log.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turning_point::board::BoardPosition;
    use std::collections::HashSet;

    fn pos(row: usize, col: usize) -> BoardPosition {
        BoardPosition::new(row, col).unwrap()
    }

    fn piece(team: Team, kind: PieceKind) -> Piece {
        Piece::new(team, kind)
    }

    fn state_with(pieces: &[(usize, usize, Team, PieceKind)], turn: Team) -> GameState {
        let mut board = Board::empty();
        for (row, col, team, kind) in pieces {
            board.place(pos(*row, *col), piece(*team, *kind));
        }
        GameState::from_board(board, turn)
    }

    // Every rostered piece sits on exactly one cell and nothing else is on the board
    fn assert_consistent(state: &GameState) {
        let mut seen = HashSet::new();
        for (_, p) in state.board().pieces() {
            assert!(seen.insert(p), "{} appears twice", p);
            assert!(state.roster(p.team).contains(p.kind), "{} not rostered", p);
        }
        let rostered = state.roster(Team::A).len() + state.roster(Team::B).len();
        assert_eq!(seen.len(), rostered);
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::default();
        assert_eq!(state.status(), Status::InProgress(Team::A));
        assert_eq!(state.roster(Team::A).kinds(), &PieceKind::ALL);
        assert_eq!(state.roster(Team::B).kinds(), &PieceKind::ALL);
        assert!(state.move_log().is_empty());
        assert!(state.capture_log().is_empty());
        assert_consistent(&state);
    }

    #[test]
    fn test_pawn_forward_relocates() {
        let mut state = GameState::default();
        let outcome = state
            .make_move(Team::A, PieceKind::P1, Direction::F)
            .unwrap();
        assert_eq!(outcome.capture, None);
        assert_eq!(outcome.winner, None);
        assert_eq!(state.board().get(pos(0, 0)), None);
        assert_eq!(
            state.board().get(pos(1, 0)),
            Some(piece(Team::A, PieceKind::P1))
        );
        assert_eq!(state.current_turn(), Team::B);
        assert_eq!(state.move_log().len(), 1);
        assert_eq!(state.move_log()[0].to_string(), "A-P1:F");
        assert_consistent(&state);
    }

    #[test]
    fn test_turns_alternate() {
        let mut state = GameState::default();
        let moves = [
            (Team::A, PieceKind::P2, Direction::F),
            (Team::B, PieceKind::P2, Direction::F),
            (Team::A, PieceKind::H1, Direction::F),
            (Team::B, PieceKind::H2, Direction::FL),
        ];
        for (team, kind, direction) in moves {
            let before = state.current_turn();
            state.make_move(team, kind, direction).unwrap();
            assert_eq!(state.current_turn(), before.other());
            assert_consistent(&state);
        }
        assert_eq!(state.move_log().len(), 4);
    }

    #[test]
    fn test_rejected_move_changes_nothing() {
        let mut state = GameState::default();
        let before = state.clone();
        assert_eq!(
            state.make_move(Team::A, PieceKind::H2, Direction::FR),
            Err(MoveError::OutOfBounds)
        );
        assert_eq!(
            state.make_move(Team::B, PieceKind::P1, Direction::F),
            Err(MoveError::NotYourTurn)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_pawn_blocked_by_opponent() {
        let mut state = state_with(
            &[
                (3, 1, Team::A, PieceKind::P1),
                (4, 1, Team::B, PieceKind::H1),
                (0, 4, Team::B, PieceKind::P3),
            ],
            Team::A,
        );
        let before = state.clone();
        assert_eq!(
            state.make_move(Team::A, PieceKind::P1, Direction::F),
            Err(MoveError::PawnCannotCapture)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_hero1_capture() {
        let mut state = state_with(
            &[
                (0, 1, Team::A, PieceKind::H1),
                (2, 1, Team::B, PieceKind::P2),
                (4, 4, Team::B, PieceKind::H2),
            ],
            Team::A,
        );
        let outcome = state
            .make_move(Team::A, PieceKind::H1, Direction::F)
            .unwrap();
        let capture = outcome.capture.unwrap();
        assert_eq!(capture.captured, piece(Team::B, PieceKind::P2));
        assert_eq!(capture.to_string(), "A captured B-P2");
        assert_eq!(state.roster(Team::B).len(), 1);
        assert!(!state.roster(Team::B).contains(PieceKind::P2));
        assert_eq!(state.capture_log(), &[capture]);
        assert_eq!(
            state.board().get(pos(2, 1)),
            Some(piece(Team::A, PieceKind::H1))
        );
        assert_eq!(state.status(), Status::InProgress(Team::B));
        assert_consistent(&state);
    }

    #[test]
    fn test_sequential_captures_end_game() {
        let mut state = state_with(
            &[
                (0, 1, Team::A, PieceKind::H1),
                (0, 2, Team::A, PieceKind::H2),
                (2, 1, Team::B, PieceKind::P1),
                (2, 4, Team::B, PieceKind::P3),
            ],
            Team::A,
        );
        let outcome = state
            .make_move(Team::A, PieceKind::H1, Direction::F)
            .unwrap();
        assert_eq!(outcome.winner, None);
        assert_eq!(state.roster(Team::B).kinds(), &[PieceKind::P3]);

        state
            .make_move(Team::B, PieceKind::P3, Direction::L)
            .unwrap();
        assert_eq!(
            state.board().get(pos(2, 3)),
            Some(piece(Team::B, PieceKind::P3))
        );

        let outcome = state
            .make_move(Team::A, PieceKind::H1, Direction::R)
            .unwrap();
        assert_eq!(outcome.winner, Some(Team::A));
        assert_eq!(state.status(), Status::Finished(Team::A));
        assert_eq!(state.current_turn(), Team::A);
        assert!(state.roster(Team::B).is_empty());
        assert_eq!(state.capture_log().len(), 2);
        assert_eq!(state.move_log().len(), 3);
        assert_consistent(&state);

        let frozen = state.clone();
        for (team, kind, direction) in [
            (Team::B, PieceKind::P1, Direction::F),
            (Team::A, PieceKind::H1, Direction::B),
            (Team::A, PieceKind::P1, Direction::FL),
        ] {
            assert_eq!(
                state.make_move(team, kind, direction),
                Err(MoveError::GameAlreadyFinished)
            );
        }
        assert_eq!(state, frozen);
        assert!(state.legal_moves().is_empty());
    }

    #[test]
    fn test_stale_legal_move_is_revalidated() {
        let mut state = GameState::default();
        let opening = state
            .legal_moves()
            .into_iter()
            .find(|m| m.kind() == PieceKind::P1)
            .unwrap();
        state
            .make_move(opening.team(), opening.kind(), opening.direction())
            .unwrap();
        let after = state.clone();
        assert_eq!(
            state.make_move(opening.team(), opening.kind(), opening.direction()),
            Err(MoveError::NotYourTurn)
        );
        assert_eq!(state, after);
        assert_consistent(&state);
    }

    #[test]
    fn test_submit_raw_intent() {
        let mut state = GameState::default();
        let raw: RawMove =
            serde_json::from_str(r#"{"team":"A","pieceKind":"H1","direction":"F"}"#).unwrap();
        let outcome = state.submit(raw.clone()).unwrap();
        assert_eq!(outcome.record.to_string(), "A-H1:F");
        assert_eq!(
            state.board().get(pos(2, 1)),
            Some(piece(Team::A, PieceKind::H1))
        );
        let after = state.clone();
        assert_eq!(state.submit(raw), Err(MoveError::NotYourTurn));
        assert_eq!(state, after);
        assert_consistent(&state);
    }

    #[test]
    fn test_roster_only_shrinks_on_capture() {
        let mut state = state_with(
            &[
                (0, 1, Team::A, PieceKind::H1),
                (0, 0, Team::A, PieceKind::P1),
                (2, 1, Team::B, PieceKind::P2),
                (4, 4, Team::B, PieceKind::P1),
            ],
            Team::A,
        );
        let mut sizes = (state.roster(Team::A).len(), state.roster(Team::B).len());
        let script = [
            (Team::A, PieceKind::P1, Direction::F),
            (Team::B, PieceKind::P1, Direction::F),
            (Team::A, PieceKind::H1, Direction::F),
            (Team::B, PieceKind::P1, Direction::L),
        ];
        for (team, kind, direction) in script {
            let captures_before = state.capture_log().len();
            state.make_move(team, kind, direction).unwrap();
            let now = (state.roster(Team::A).len(), state.roster(Team::B).len());
            let captured = state.capture_log().len() - captures_before;
            assert_eq!(sizes.0 + sizes.1 - (now.0 + now.1), captured);
            sizes = now;
        }
        assert_eq!(sizes, (2, 1));
    }

    #[test]
    fn test_legal_moves_from_start() {
        let state = GameState::default();
        let moves: Vec<String> = state
            .legal_moves()
            .iter()
            .map(|m| format!("{}:{}", m.kind(), m.direction()))
            .collect();
        assert_eq!(
            moves,
            vec!["P1:F", "H1:F", "P2:F", "H2:FL", "P3:F"]
        );
    }

    #[test]
    fn test_snapshot_shape() {
        let mut state = GameState::default();
        state
            .make_move(Team::A, PieceKind::P3, Direction::F)
            .unwrap();
        let json = serde_json::to_value(state.snapshot()).unwrap();
        assert_eq!(json["currentTurn"], "B");
        assert!(json["winner"].is_null());
        assert_eq!(json["board"][1][4], "A-P3");
        assert!(json["board"][0][4].is_null());
        assert_eq!(json["rosterA"], serde_json::json!(["P1", "H1", "P2", "H2", "P3"]));
        assert_eq!(
            json["moveLog"],
            serde_json::json!([{ "team": "A", "pieceKind": "P3", "direction": "F" }])
        );
        assert_eq!(json["captureLog"], serde_json::json!([]));
    }
}
