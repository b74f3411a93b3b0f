use crate::bitboard::{BitBoard, EMPTY};
use crate::board::{Board, BoardStatus, MoveRecord};
use crate::castling::{castle_moves, CastleMove};
use crate::chess_move::ChessMove;
use crate::color::Color;
use crate::error::Error;
use crate::legality::legal_moves;
use crate::piece::Piece;
use crate::square::Square;
use arrayvec::ArrayVec;
use std::convert::TryFrom;
use tracing::{debug, info};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// The callbacks a renderer implements to follow the game.
///
/// Every method has an empty default, so a view only overrides what it draws.  The controller
/// never calls into the view while it is simulating moves.
pub trait BoardView {
    /// Mark these squares as destinations of the selected piece.
    fn highlight(&mut self, _squares: &[Square]) {}

    /// Remove the marks from these squares.
    fn unhighlight(&mut self, _squares: &[Square]) {}

    /// A piece went from one square to another.
    fn on_piece_moved(&mut self, _piece: Piece, _color: Color, _from: Square, _to: Square) {}

    /// A piece was captured.
    fn on_piece_removed(&mut self, _piece: Piece, _color: Color, _at: Square) {}

    /// A piece appeared on the board.  Nothing in the rules creates pieces yet, but a view that
    /// rebuilds itself from a position uses this.
    fn on_piece_added(&mut self, _piece: Piece, _color: Color, _at: Square) {}

    /// Called once after every move with the status of the side now to move.
    fn status_changed(&mut self, _status: BoardStatus) {}
}

/// A game with nobody watching.
impl BoardView for () {}

/// Knobs for the rules the controller applies.
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct GameConfig {
    /// Refuse to castle out of check or across an attacked square.  Turning this off only checks
    /// the square the king lands on.
    pub castle_path_safety: bool,
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            castle_path_safety: true,
        }
    }
}

/// What was the result of this game?
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, PartialEq, PartialOrd, Eq, Ord, Debug, Hash)]
pub enum GameResult {
    WhiteCheckmates,
    BlackCheckmates,
    Stalemate,
}

#[derive(Clone, Debug)]
enum Selection {
    Idle,
    Selected {
        square: Square,
        candidates: BitBoard,
        castles: ArrayVec<CastleMove, 2>,
    },
}

/// The click-driven turn controller.
///
/// It owns the one `Board` of the game and tells a `BoardView` what to draw.  A click on a piece
/// of the side to move selects it and highlights its legal destinations; a click on one of those
/// destinations plays the move; any other click drops the selection.
///
/// ```
/// use chess_rules::{Game, Square};
///
/// let mut game = Game::new(());
/// game.on_tile_clicked(4, 6);
/// assert_eq!(game.selected(), Some(Square::make_square(4, 6)));
/// assert_eq!(game.candidates().popcnt(), 2);
///
/// game.on_tile_clicked(4, 4);
/// assert_eq!(game.selected(), None);
/// assert_eq!(game.moves().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Game<V: BoardView = ()> {
    board: Board,
    view: V,
    config: GameConfig,
    selection: Selection,
    moves: Vec<ChessMove>,
    status: BoardStatus,
    result: Option<GameResult>,
}

impl<V: BoardView> Game<V> {
    /// Start a game from the initial position with the default rules.
    pub fn new(view: V) -> Game<V> {
        Game::with_board(Board::default(), view, GameConfig::default())
    }

    /// Start a game from any position.
    ///
    /// ```
    /// use chess_rules::{Board, BoardBuilder, BoardStatus, Game, GameConfig, GameResult};
    /// use std::convert::TryFrom;
    /// use std::str::FromStr;
    ///
    /// let builder = BoardBuilder::from_str("k7/8/1Q6/8/8/8/8/7K b").unwrap();
    /// let game = Game::with_board(Board::try_from(builder).unwrap(), (), GameConfig::default());
    /// assert_eq!(game.status(), BoardStatus::Stalemate);
    /// assert_eq!(game.result(), Some(GameResult::Stalemate));
    /// ```
    pub fn with_board(board: Board, view: V, config: GameConfig) -> Game<V> {
        let status = board.status_with(config.castle_path_safety);
        let result = Game::<V>::result_of(status, board.side_to_move());
        Game {
            board,
            view,
            config,
            selection: Selection::Idle,
            moves: vec![],
            status,
            result,
        }
    }

    /// The single entry point for a renderer.
    ///
    /// Nothing here is an error from the player's point of view: clicks on an empty square or on
    /// the wrong color are ignored while nothing is selected, and any click that is not a
    /// destination of the selected piece (off the board included) just drops the selection.
    pub fn on_tile_clicked(&mut self, x: i32, y: i32) {
        if self.result.is_some() {
            debug!(x, y, "click ignored, the game is over");
            return;
        }

        let square = match Square::try_from((x, y)) {
            Ok(square) => square,
            Err(e) => {
                debug!(%e, "click off the board");
                self.clear_selection();
                return;
            }
        };

        let own_piece = self.board.color_on(square) == Some(self.board.side_to_move());
        let outcome = if self.selected().is_some() && !own_piece {
            self.confirm(square).map(|_| ())
        } else {
            self.select(square).map(|_| ())
        };

        if let Err(e) = outcome {
            debug!(%e, "click rejected");
        }
    }

    /// Select the piece on `square` and highlight where it may go.
    ///
    /// Only pieces of the side to move can be selected.  A failed selection leaves the current
    /// one in place.
    pub fn select(&mut self, square: Square) -> Result<BitBoard, Error> {
        if self.result.is_some() {
            return Err(Error::GameOver);
        }
        match self.board.piece_at(square) {
            Some(p) if p.color() == self.board.side_to_move() => {}
            _ => return Err(Error::IllegalSelection { square }),
        }

        let (candidates, castles) = self.destinations(square);
        self.clear_selection();

        debug!(%square, destinations = candidates.popcnt(), "selected");
        self.view.highlight(&candidates.to_squares());
        self.selection = Selection::Selected {
            square,
            candidates,
            castles,
        };
        Ok(candidates)
    }

    /// Move the selected piece to `square`.
    ///
    /// If `square` is not one of the highlighted destinations the selection is dropped and
    /// `InvalidDestination` comes back.
    pub fn confirm(&mut self, square: Square) -> Result<MoveRecord, Error> {
        if self.result.is_some() {
            return Err(Error::GameOver);
        }
        let (source, candidates, castle) = match &self.selection {
            Selection::Idle => return Err(Error::InvalidDestination { square }),
            Selection::Selected {
                square: source,
                candidates,
                castles,
            } => (
                *source,
                *candidates,
                castles.iter().find(|c| c.king.get_dest() == square).copied(),
            ),
        };

        self.clear_selection();
        if !candidates.contains(square) {
            return Err(Error::InvalidDestination { square });
        }
        self.apply(ChessMove::new(source, square), castle)
    }

    /// Play a move without going through clicks.  Any selection is dropped first.
    ///
    /// ```
    /// use chess_rules::{ChessMove, Error, Game, Square};
    ///
    /// let mut game = Game::new(());
    /// let push = ChessMove::new(Square::make_square(4, 6), Square::make_square(4, 4));
    /// assert!(game.make_move(push).is_ok());
    ///
    /// // the same pawn again, but now it is black's turn
    /// let again = ChessMove::new(Square::make_square(4, 4), Square::make_square(4, 3));
    /// assert!(game.make_move(again).is_err());
    /// ```
    pub fn make_move(&mut self, chess_move: ChessMove) -> Result<MoveRecord, Error> {
        if self.result.is_some() {
            return Err(Error::GameOver);
        }
        self.clear_selection();

        let source = chess_move.get_source();
        let dest = chess_move.get_dest();
        if self.board.color_on(source) != Some(self.board.side_to_move()) {
            return Err(Error::IllegalSelection { square: source });
        }

        let (candidates, castles) = self.destinations(source);
        if !candidates.contains(dest) {
            return Err(Error::InvalidDestination { square: dest });
        }
        let castle = castles.iter().find(|c| c.king == chess_move).copied();
        self.apply(chess_move, castle)
    }

    fn destinations(&mut self, square: Square) -> (BitBoard, ArrayVec<CastleMove, 2>) {
        let mut candidates = legal_moves(&mut self.board, square);
        let castles = if self.board.piece_on(square) == Some(Piece::King) {
            castle_moves(&mut self.board, square, self.config.castle_path_safety)
        } else {
            ArrayVec::new()
        };
        for castle in castles.iter() {
            candidates |= BitBoard::from_square(castle.king.get_dest());
        }
        (candidates, castles)
    }

    fn clear_selection(&mut self) {
        if let Selection::Selected { candidates, .. } = self.selection {
            self.view.unhighlight(&candidates.to_squares());
        }
        self.selection = Selection::Idle;
    }

    fn apply(
        &mut self,
        chess_move: ChessMove,
        castle: Option<CastleMove>,
    ) -> Result<MoveRecord, Error> {
        let record = self.board.make_move(chess_move, castle)?;

        if let Some(castle) = record.castle {
            info!(color = ?record.color, side = ?castle.side, "castled");
            self.view.on_piece_moved(
                Piece::Rook,
                record.color,
                castle.rook.get_source(),
                castle.rook.get_dest(),
            );
        }
        if let Some(captured) = record.captured {
            self.view
                .on_piece_removed(captured.piece(), captured.color(), captured.square());
        }
        self.view.on_piece_moved(
            record.piece,
            record.color,
            chess_move.get_source(),
            chess_move.get_dest(),
        );
        info!(color = ?record.color, piece = %record.piece, mv = %chess_move, "moved");

        self.moves.push(chess_move);
        self.status = self.board.status_with(self.config.castle_path_safety);
        self.result = Game::<V>::result_of(self.status, self.board.side_to_move());
        match self.status {
            BoardStatus::Ongoing => {}
            status => info!(?status, to_move = ?self.board.side_to_move(), "status"),
        }
        self.view.status_changed(self.status);

        Ok(record)
    }

    fn result_of(status: BoardStatus, side_to_move: Color) -> Option<GameResult> {
        match (status, side_to_move) {
            (BoardStatus::Checkmate, Color::Black) => Some(GameResult::WhiteCheckmates),
            (BoardStatus::Checkmate, Color::White) => Some(GameResult::BlackCheckmates),
            (BoardStatus::Stalemate, _) => Some(GameResult::Stalemate),
            _ => None,
        }
    }

    /// The current position.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// The square of the selected piece, if any.
    pub fn selected(&self) -> Option<Square> {
        match self.selection {
            Selection::Idle => None,
            Selection::Selected { square, .. } => Some(square),
        }
    }

    /// The highlighted destinations of the selected piece.  Empty when nothing is selected.
    pub fn candidates(&self) -> BitBoard {
        match self.selection {
            Selection::Idle => EMPTY,
            Selection::Selected { candidates, .. } => candidates,
        }
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// The status of the side to move.
    pub fn status(&self) -> BoardStatus {
        self.status
    }

    /// `None` while the game goes on.
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    /// Every move played so far, oldest first.
    pub fn moves(&self) -> &[ChessMove] {
        &self.moves
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board_builder::BoardBuilder;
    use std::str::FromStr;

    fn sq(x: u8, y: u8) -> Square {
        Square::make_square(x, y)
    }

    #[derive(Default, Debug)]
    struct Recorder {
        highlighted: BitBoard,
        events: Vec<String>,
        statuses: Vec<BoardStatus>,
    }

    impl BoardView for Recorder {
        fn highlight(&mut self, squares: &[Square]) {
            for s in squares {
                self.highlighted |= BitBoard::from_square(*s);
            }
        }

        fn unhighlight(&mut self, squares: &[Square]) {
            for s in squares {
                self.highlighted &= !BitBoard::from_square(*s);
            }
        }

        fn on_piece_moved(&mut self, piece: Piece, _color: Color, from: Square, to: Square) {
            self.events.push(format!("{} {}->{}", piece, from, to));
        }

        fn on_piece_removed(&mut self, piece: Piece, _color: Color, at: Square) {
            self.events.push(format!("x{} {}", piece, at));
        }

        fn status_changed(&mut self, status: BoardStatus) {
            self.statuses.push(status);
        }
    }

    fn game(layout: &str) -> Game<Recorder> {
        let board = Board::try_from(BoardBuilder::from_str(layout).unwrap()).unwrap();
        Game::with_board(board, Recorder::default(), GameConfig::default())
    }

    #[test]
    fn selecting_highlights_the_destinations() {
        let mut game = Game::new(Recorder::default());
        game.on_tile_clicked(1, 7);
        let expected = BitBoard::from_square(sq(0, 5)) | BitBoard::from_square(sq(2, 5));
        assert_eq!(game.candidates(), expected);
        assert_eq!(game.view().highlighted, expected);

        // picking another piece replaces the highlights
        game.on_tile_clicked(4, 6);
        assert_eq!(game.selected(), Some(sq(4, 6)));
        assert_eq!(
            game.view().highlighted,
            BitBoard::from_square(sq(4, 5)) | BitBoard::from_square(sq(4, 4))
        );
    }

    #[test]
    fn idle_clicks_on_empty_or_enemy_squares_do_nothing() {
        let mut game = Game::new(Recorder::default());
        let before = *game.board();
        game.on_tile_clicked(4, 4);
        game.on_tile_clicked(4, 1);
        game.on_tile_clicked(-1, 3);
        game.on_tile_clicked(8, 0);
        assert_eq!(game.selected(), None);
        assert_eq!(*game.board(), before);
        assert!(game.view().events.is_empty());
        assert_eq!(game.select(sq(4, 1)), Err(Error::IllegalSelection { square: sq(4, 1) }));
    }

    #[test]
    fn a_click_elsewhere_drops_the_selection() {
        let mut game = Game::new(Recorder::default());
        game.on_tile_clicked(4, 6);
        game.on_tile_clicked(4, 2);
        assert_eq!(game.selected(), None);
        assert_eq!(game.view().highlighted, EMPTY);
        assert_eq!(game.side_to_move(), Color::White);
        assert!(game.moves().is_empty());

        game.on_tile_clicked(4, 6);
        assert_eq!(
            game.confirm(sq(0, 0)).map(|_| ()),
            Err(Error::InvalidDestination { square: sq(0, 0) })
        );
        assert_eq!(game.selected(), None);
    }

    #[test]
    fn captures_are_reported_before_the_move() {
        let mut game = game("4k3/8/8/3p4/4P3/8/8/4K3 w");
        game.on_tile_clicked(4, 4);
        game.on_tile_clicked(3, 3);
        assert_eq!(game.view().events, vec!["xp (3,3)", "p (4,4)->(3,3)"]);
        assert_eq!(game.board().piece_on(sq(3, 3)), Some(Piece::Pawn));
        assert_eq!(game.board().color_on(sq(3, 3)), Some(Color::White));
        assert_eq!(game.view().statuses, vec![BoardStatus::Ongoing]);
    }

    #[test]
    fn castling_by_clicks_moves_the_rook_first() {
        let mut game = game("4k3/8/8/8/8/8/8/R3K2R w");
        game.on_tile_clicked(4, 7);
        assert!(game.candidates().contains(sq(2, 7)));
        assert!(game.candidates().contains(sq(6, 7)));

        game.on_tile_clicked(6, 7);
        assert_eq!(game.view().events, vec!["r (7,7)->(5,7)", "k (4,7)->(6,7)"]);
        assert_eq!(game.board().piece_on(sq(5, 7)), Some(Piece::Rook));
        assert_eq!(game.board().king_square(Color::White), sq(6, 7));
        assert!(game.board().piece_at(sq(5, 7)).unwrap().has_moved());
        assert_eq!(game.side_to_move(), Color::Black);
    }

    #[test]
    fn castling_through_check_depends_on_the_config() {
        let layout = "3rk3/8/8/8/8/8/8/R3K3 w";
        let mut strict = game(layout);
        strict.on_tile_clicked(4, 7);
        assert!(!strict.candidates().contains(sq(2, 7)));

        let board = Board::try_from(BoardBuilder::from_str(layout).unwrap()).unwrap();
        let mut legacy = Game::with_board(
            board,
            (),
            GameConfig {
                castle_path_safety: false,
            },
        );
        legacy.on_tile_clicked(4, 7);
        assert!(legacy.candidates().contains(sq(2, 7)));
    }

    #[test]
    fn fools_mate_ends_the_game() {
        let mut game = Game::new(Recorder::default());
        for (x0, y0, x1, y1) in [(5, 6, 5, 5), (4, 1, 4, 3), (6, 6, 6, 4), (3, 0, 7, 4)].iter() {
            game.on_tile_clicked(*x0, *y0);
            game.on_tile_clicked(*x1, *y1);
        }
        assert_eq!(game.moves().len(), 4);
        assert_eq!(game.status(), BoardStatus::Checkmate);
        assert_eq!(game.result(), Some(GameResult::BlackCheckmates));
        assert_eq!(game.view().statuses.last(), Some(&BoardStatus::Checkmate));

        // nothing moves any more
        game.on_tile_clicked(4, 6);
        assert_eq!(game.selected(), None);
        let mv = ChessMove::new(sq(0, 6), sq(0, 5));
        assert_eq!(game.make_move(mv).map(|_| ()), Err(Error::GameOver));
    }

    #[test]
    fn make_move_refuses_illegal_moves() {
        let mut game = game("4k3/8/8/8/8/5R2/8/4K2r w");
        // the king is in check from (7,7), so the rook has to block on (5,7)
        let wander = ChessMove::new(sq(5, 5), sq(0, 5));
        assert_eq!(
            game.make_move(wander).map(|_| ()),
            Err(Error::InvalidDestination { square: sq(0, 5) })
        );
        let block = ChessMove::new(sq(5, 5), sq(5, 7));
        assert!(game.make_move(block).is_ok());
        assert_eq!(game.moves(), &[block]);
        assert_eq!(game.side_to_move(), Color::Black);
    }

    #[test]
    fn the_castling_rule_also_decides_mate() {
        // in check from (4,0); the only way out is castling, which the legacy rule allows
        let layout = "4r3/3r1r2/6k1/8/8/8/8/4K2R w";
        let strict = game(layout);
        assert_eq!(strict.status(), BoardStatus::Checkmate);
        assert_eq!(strict.result(), Some(GameResult::BlackCheckmates));

        let board = Board::try_from(BoardBuilder::from_str(layout).unwrap()).unwrap();
        let legacy = GameConfig {
            castle_path_safety: false,
        };
        let mut game = Game::with_board(board, Recorder::default(), legacy);
        assert_eq!(game.status(), BoardStatus::Check);
        assert_eq!(game.result(), None);

        game.on_tile_clicked(4, 7);
        assert_eq!(game.selected(), Some(sq(4, 7)));
        assert_eq!(game.candidates().to_squares(), vec![sq(6, 7)]);
        game.on_tile_clicked(6, 7);
        assert_eq!(game.board().king_square(Color::White), sq(6, 7));
        assert_eq!(game.view().statuses, vec![BoardStatus::Ongoing]);
    }

    #[test]
    fn a_click_off_the_board_drops_the_selection() {
        let mut game = Game::new(Recorder::default());
        game.on_tile_clicked(6, 7);
        assert_eq!(game.view().highlighted.popcnt(), 2);

        game.on_tile_clicked(8, 7);
        assert_eq!(game.selected(), None);
        assert_eq!(game.view().highlighted, EMPTY);
        assert_eq!(game.side_to_move(), Color::White);
    }

    #[test]
    fn the_view_can_be_reset_between_moves() {
        let mut game = Game::new(Recorder::default());
        game.on_tile_clicked(4, 6);
        game.on_tile_clicked(4, 4);
        assert_eq!(game.view().events.len(), 1);

        game.view_mut().events.clear();
        game.on_tile_clicked(4, 1);
        game.on_tile_clicked(4, 3);
        assert_eq!(game.view().events, vec!["p (4,1)->(4,3)"]);
    }
}
