
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use gomoku::{Board, Player, Point};

use utils::error::*;
use utils::log;
use utils::notate::Notate;

///
/// Something the board view should show.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayEvent 
{
    Reset,
    Move { player: Player, action: usize },
    Prompt
}

///
/// A handle to the board view running on its own thread.
///
/// Sending never blocks and never fails the game: a view that has gone 
/// away is simply ignored. Handles are cheap to clone and may be shared 
/// across self-play workers. The view only prompts while the handle is 
/// awaiting a human move, so a prompt that arrives after the move was 
/// read is dropped.
///
#[derive(Clone)]
pub struct Display 
{
    events: Sender<DisplayEvent>,
    awaiting_human: Arc<AtomicBool>
}

impl Display 
{
    ///
    /// Mirrors a move onto the view.
    ///
    pub fn execute_move (& self, player: Player, action: usize)
    {
        self.send(DisplayEvent::Move { player, action });
    }

    ///
    /// Clears the view for a new game.
    ///
    pub fn reset (& self)
    {
        self.send(DisplayEvent::Reset);
    }

    ///
    /// Marks whether the view is waiting on a human move, and asks for one.
    ///
    pub fn set_awaiting_human (& self, awaiting: bool)
    {
        self.awaiting_human.store(awaiting, Ordering::SeqCst);
        if awaiting 
        {
            self.send(DisplayEvent::Prompt);
        }
    }

    ///
    /// Starts a view of an n x n board on standard output. The thread exits 
    /// once every handle has been dropped.
    ///
    pub fn spawn (n: usize) -> Result<(Display, JoinHandle<()>)>
    {
        let (display, receiver) = Display::detached();
        let awaiting_human = display.awaiting_human.clone();

        let handle = thread::Builder::new()
            .name("display".to_owned())
            .spawn(move || 
            {
                let stdout = std::io::stdout();
                if let Err(e) = render(n, receiver, & awaiting_human, & mut stdout.lock())
                {
                    log::warn!("The board view stopped: {}", e);
                }
            })
            .context("Failed to spawn the display thread.")?;

        Ok((display, handle))
    }

    ///
    /// Returns a handle and the receiving end of its events, with no view 
    /// attached.
    ///
    pub fn detached () -> (Display, Receiver<DisplayEvent>)
    {
        let (events, receiver) = mpsc::channel();
        (Display { events, awaiting_human: Arc::new(AtomicBool::new(false)) }, receiver)
    }

    fn send (& self, event: DisplayEvent)
    {
        let _ = self.events.send(event);
    }
}

///
/// Draws the board after every event until the channel closes.
///
fn render<W: Write> (n: usize, events: Receiver<DisplayEvent>, awaiting_human: & AtomicBool, out: & mut W) -> std::io::Result<()>
{
    let mut board = Board::blank(n);

    for event in events 
    {
        match event 
        {
            DisplayEvent::Reset => 
            {
                board = Board::blank(n);
                writeln!(out, "\n{}", board)?;
            },
            DisplayEvent::Move { player, action } if action < board.action_size() => 
            {
                board.place(action, player);
                writeln!(out, "{}\n{}", utils::notate!("{} plays {}", player, Point::from_index(action, n)), board)?;
            },
            DisplayEvent::Move { action, .. } => 
            {
                log::warn!("Ignored an off-board move {} on the view.", action);
            },
            DisplayEvent::Prompt if awaiting_human.load(Ordering::SeqCst) => 
            {
                write!(out, "Your move: ")?;
            },
            DisplayEvent::Prompt => {}
        }
        out.flush()?;
    }

    Ok(())
}
