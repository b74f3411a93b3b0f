use chess_rules::{BoardStatus, BoardView, Color, Game, Piece, Square};
use std::io::{self, BufRead, Write};

/// Prints what a graphical board would draw.
struct TerminalView;

impl BoardView for TerminalView {
    fn highlight(&mut self, squares: &[Square]) {
        let list: Vec<String> = squares.iter().map(|s| s.to_string()).collect();
        println!("can move to: {}", list.join(" "));
    }

    fn on_piece_moved(&mut self, piece: Piece, color: Color, from: Square, to: Square) {
        println!("{} {} -> {}", piece.to_string(color), from, to);
    }

    fn on_piece_removed(&mut self, piece: Piece, color: Color, at: Square) {
        println!("{} taken on {}", piece.to_string(color), at);
    }

    fn status_changed(&mut self, status: BoardStatus) {
        match status {
            BoardStatus::Ongoing => {}
            BoardStatus::Check => println!("check"),
            BoardStatus::Checkmate => println!("checkmate"),
            BoardStatus::Stalemate => println!("stalemate"),
        }
    }
}

fn parse_click(line: &str) -> Option<(i32, i32)> {
    let mut parts = line.split_whitespace().map(|p| p.parse::<i32>());
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(x)), Some(Ok(y)), None) => Some((x, y)),
        _ => None,
    }
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let mut game = Game::new(TerminalView);
    println!("{}", game.board());
    println!("click a square with \"x y\", \"q\" quits");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line == "q" {
            break;
        }

        let (x, y) = match parse_click(line) {
            Some(click) => click,
            None => {
                println!("expected two numbers, like \"4 6\"");
                continue;
            }
        };

        let played = game.moves().len();
        game.on_tile_clicked(x, y);
        if game.moves().len() != played {
            println!("{}", game.board());
        }

        if let Some(result) = game.result() {
            tracing::info!(?result, moves = game.moves().len(), "game over");
            break;
        }
        io::stdout().flush()?;
    }

    Ok(())
}
