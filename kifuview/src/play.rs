//! Interactive stdin loop standing in for a clickable board.

use chess::{board_display, share, GameState, Selection, Square};
use engine::{Session, Suggestion};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  <square>   select a piece, then its destination (e.g. e2 then e4)
  hint       ask the engine for a move
  link       print a share link for this game
  reset      start over from the initial position
  quit       leave";

/// One line of user input.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Square(Square),
    Hint,
    Link,
    Reset,
    Help,
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "hint" => Input::Hint,
        "link" => Input::Link,
        "reset" => Input::Reset,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => match other.parse::<Square>() {
            Ok(sq) => Input::Square(sq),
            Err(_) => Input::Unknown(line.to_string()),
        },
    }
}

pub fn print_game(game: &GameState) {
    println!();
    print!("{}", board_display::render(game.position(), game.selection()));
    println!("{}", board_display::turn_label(game.side_to_move()));
    if let Some(last) = game.history().last() {
        println!("Last move: {}", last);
    }
    if game.history().is_empty() {
        println!("No moves yet.");
    } else {
        for line in game.history().numbered_lines() {
            println!("  {}", line);
        }
    }
}

pub fn print_suggestion(suggestion: Option<Suggestion>) {
    match suggestion {
        Some(Suggestion { mv, depth: Some(depth) }) => {
            println!("Engine suggests: {} (depth {})", mv, depth)
        }
        Some(Suggestion { mv, depth: None }) => println!("Engine suggests: {}", mv),
        None => println!("Engine could not suggest a move."),
    }
}

fn describe(selection: &Selection) -> String {
    match selection {
        Selection::Selected(sq) => format!("Selected {}", sq),
        Selection::Ignored => "Nothing to select there".to_string(),
        Selection::Cancelled => "Selection cleared".to_string(),
        Selection::Moved(record) => format!("Played {}", record.token),
        Selection::Rejected => "No piece on the selected square".to_string(),
    }
}

pub async fn run(mut session: Session) -> anyhow::Result<()> {
    println!("{}", HELP);
    print_game(session.game());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            Input::Square(sq) => {
                let selection = session.click(sq).await;
                println!("{}", describe(&selection));
                if let Some(err) = session.last_sync_error() {
                    println!("(engine sync failed: {})", err);
                }
                print_game(session.game());
            }
            Input::Hint => print_suggestion(session.suggest().await),
            Input::Link => {
                match share::address_with_kifu(
                    &crate::config::get_base_address(),
                    session.game().history(),
                ) {
                    Ok(link) => println!("{}", link),
                    Err(e) => println!("Cannot build link: {}", e),
                }
            }
            Input::Reset => {
                session.reset();
                print_game(session.game());
            }
            Input::Help => println!("{}", HELP),
            Input::Quit => break,
            Input::Unknown(text) if text.is_empty() => {}
            Input::Unknown(text) => println!("Unknown command `{}`; type `help`", text),
        }
    }

    tracing::info!("Leaving with kifu: {}", session.game().kifu());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input(" E2 "), Input::Square("e2".parse().unwrap()));
        assert_eq!(parse_input("hint"), Input::Hint);
        assert_eq!(parse_input("QUIT"), Input::Quit);
        assert_eq!(parse_input("z9"), Input::Unknown("z9".to_string()));
        assert_eq!(parse_input(""), Input::Unknown(String::new()));
    }

    #[test]
    fn test_describe_move() {
        let mut game = GameState::new();
        game.select("g1".parse().unwrap());
        let selection = game.select("f3".parse().unwrap());
        assert_eq!(describe(&selection), "Played Ng1f3");
    }
}
