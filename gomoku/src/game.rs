
use thiserror::Error;

use super::board::Board;
use super::player::Player;
use super::point::Point;

use utils::*;

///
/// The reasons a move can be refused.
///
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError 
{
    #[error("move {0} is outside of the {1}x{1} board")]
    OutOfBounds(usize, usize),

    #[error("move {0} is on an occupied intersection")]
    Occupied(usize),

    #[error("the game is already over")]
    GameOver
}

///
/// The state of a game with respect to termination.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status 
{
    InProgress,
    Won(Player),
    Draw
}

///
/// A game of n-in-a-row on an n x n board.
///
/// Players alternate placing one stone on any empty intersection; the 
/// first player to complete an unbroken horizontal, vertical or diagonal 
/// line of at least n_in_row stones wins. A full board without such a 
/// line is a draw. Only lines through the most recent stone are checked, 
/// since no other line can have changed.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game 
{
    board: Board,
    n_in_row: usize,
    to_move: Player,
    last_move: Option<usize>,
    moves_played: usize,
    status: Status
}

impl Game 
{
    ///
    /// Returns the number of possible moves, n squared.
    ///
    pub fn action_size (& self) -> usize 
    {
        self.board.action_size()
    }

    ///
    /// Returns the board.
    ///
    pub fn board (& self) -> & Board 
    {
        & self.board
    }

    ///
    /// Returns the player to move.
    ///
    pub fn current_player (& self) -> Player 
    {
        self.to_move
    }

    ///
    /// Places a stone for the player to move and updates the status.
    ///
    pub fn execute_move (& mut self, action: usize) -> std::result::Result<(), MoveError>
    {
        if self.status != Status::InProgress 
        {
            return Err(MoveError::GameOver);
        }
        if action >= self.action_size()
        {
            return Err(MoveError::OutOfBounds(action, self.board.n()));
        }
        if self.board.at(action) != 0 
        {
            return Err(MoveError::Occupied(action));
        }

        let player = self.to_move;
        self.board.place(action, player);
        self.last_move = Some(action);
        self.moves_played += 1;

        if self.completes_line(action, player)
        {
            self.status = Status::Won(player);
        }
        else if self.moves_played == self.action_size()
        {
            self.status = Status::Draw;
        }

        self.to_move = player.next();
        Ok(())
    }

    ///
    /// Returns whether the game is over and the winning stone sign, 0 meaning 
    /// a draw or a game still in progress.
    ///
    pub fn game_status (& self) -> (bool, i8)
    {
        match self.status 
        {
            Status::InProgress  => (false, 0),
            Status::Won(player) => (true, player.value()),
            Status::Draw        => (true, 0)
        }
    }

    ///
    /// Determines whether the game has ended.
    ///
    pub fn is_over (& self) -> bool 
    {
        self.status != Status::InProgress
    }

    ///
    /// Returns the most recent move, or None on an empty board.
    ///
    pub fn last_move (& self) -> Option<usize>
    {
        self.last_move
    }

    ///
    /// Returns the legality mask over all moves. Once the game is over 
    /// there are no legal moves.
    ///
    pub fn legal_moves (& self) -> Vec<bool>
    {
        match self.is_over()
        {
            true  => vec![false; self.action_size()],
            false => self.board.stones().iter().map(|& stone| stone == 0).collect()
        }
    }

    ///
    /// Returns the winning line length.
    ///
    pub fn n_in_row (& self) -> usize 
    {
        self.n_in_row
    }

    ///
    /// Returns an empty game where the given player moves first.
    ///
    pub fn new (n: usize, n_in_row: usize, first: Player) -> Game 
    {
        Game 
        {
            board: Board::blank(n),
            n_in_row,
            to_move: first,
            last_move: None,
            moves_played: 0,
            status: Status::InProgress
        }
    }

    ///
    /// Returns the termination status.
    ///
    pub fn status (& self) -> Status 
    {
        self.status
    }

    ///
    /// Determines whether the stone just placed at the given index belongs 
    /// to a line of at least n_in_row stones.
    ///
    fn completes_line (& self, action: usize, player: Player) -> bool 
    {
        let origin = Point::from_index(action, self.board.n());

        for (d_row, d_col) in [(0, 1), (1, 0), (1, 1), (1, -1)]
        {
            let mut count = 1;

            for sign in [1, -1]
            {
                let mut point = origin.offset(sign * d_row, sign * d_col);
                while self.board.player_at(& point) == player 
                {
                    count += 1;
                    point = point.offset(sign * d_row, sign * d_col);
                }
            }

            if count >= self.n_in_row 
            {
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests 
{
    use super::*;

    fn play (game: & mut Game, moves: & [usize])
    {
        for & action in moves 
        {
            game.execute_move(action).unwrap();
        }
    }

    #[test]
    fn new_game_has_every_move_legal ()
    {
        let game = Game::new(5, 4, Player::White);

        assert_eq!(game.legal_moves(), vec![true; 25]);
        assert_eq!(game.current_player(), Player::White);
        assert_eq!(game.last_move(), None);
        assert_eq!(game.game_status(), (false, 0));
    }

    #[test]
    fn occupied_and_out_of_bounds_moves_are_refused ()
    {
        let mut game = Game::new(3, 3, Player::Black);
        play(& mut game, & [4]);

        assert_eq!(game.execute_move(4), Err(MoveError::Occupied(4)));
        assert_eq!(game.execute_move(9), Err(MoveError::OutOfBounds(9, 3)));
        assert_eq!(game.current_player(), Player::White);
    }

    #[test]
    fn detects_each_line_direction ()
    {
        // Black builds the line, White plays far away on the last row.
        let lines : [& [usize]; 4] = [& [0, 1, 2, 3], & [0, 6, 12, 18], & [0, 7, 14, 21], & [4, 9, 14, 19]];

        for line in lines 
        {
            let mut game = Game::new(6, 4, Player::Black);
            let mut filler = (30 .. 36).filter(|idx| ! line.contains(idx));

            for (i, & action) in line.iter().enumerate()
            {
                game.execute_move(action).unwrap();
                if i + 1 < line.len()
                {
                    game.execute_move(filler.next().unwrap()).unwrap();
                }
            }

            assert_eq!(game.status(), Status::Won(Player::Black), "line {:?}", line);
        }
    }

    #[test]
    fn full_board_without_line_is_a_draw ()
    {
        let mut game = Game::new(3, 3, Player::Black);

        // B W B / B W W / W B B
        play(& mut game, & [0, 1, 2, 4, 3, 5, 7, 6, 8]);

        assert_eq!(game.game_status(), (true, 0));
        assert!(game.legal_moves().iter().all(|& legal| ! legal));
        assert_eq!(game.execute_move(0), Err(MoveError::GameOver));
    }
}
