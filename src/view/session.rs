//! Interactive terminal session around a [`Feed`].
//!
//! Reads one command per line and races input against fetch completions, so
//! the screen flips from the loader to the grid as soon as news lands without
//! waiting for a keypress.

use crate::error::Result;
use crate::models::Category;
use crate::view::feed::Feed;
use crate::view::render::render;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

const CLEAR: &str = "\x1b[2J\x1b[H";

pub const HELP: &str = "\
commands:
  all | rockets | astronomy | tech | future   switch category
  c <n|name>                                  switch category by nav number or name
  <n> | o <n>                                 open card n
  x | close                                   close the article
  h | help                                    show this help
  q | quit                                    leave
";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Category(Category),
    /// 1-based card number.
    Open(usize),
    Close,
    Help,
    Quit,
    Unknown(String),
}

fn nav_category(arg: &str) -> Option<Category> {
    match arg.parse::<usize>() {
        Ok(n) => n.checked_sub(1).and_then(|i| Category::VALUES.get(i).copied()),
        Err(_) => arg.parse().ok(),
    }
}

fn card_number(arg: &str) -> Option<usize> {
    arg.parse::<usize>().ok().filter(|n| *n > 0)
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let head = words.next()?.to_ascii_lowercase();
    let arg = words.next();
    let unknown = || Command::Unknown(line.trim().to_string());

    let command = match (head.as_str(), arg) {
        ("q" | "quit" | "exit", None) => Command::Quit,
        ("x" | "close", None) => Command::Close,
        ("h" | "help" | "?", None) => Command::Help,
        ("o" | "open", Some(n)) => card_number(n).map(Command::Open).unwrap_or_else(unknown),
        ("c" | "category", Some(c)) => nav_category(c).map(Command::Category).unwrap_or_else(unknown),
        (word, None) => card_number(word)
            .map(Command::Open)
            .or_else(|| word.parse().ok().map(Command::Category))
            .unwrap_or_else(unknown),
        _ => unknown(),
    };
    Some(command)
}

async fn draw<W>(output: &mut W, feed: &Feed) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(CLEAR.as_bytes()).await?;
    output.write_all(render(feed.state()).as_bytes()).await?;
    output.write_all(b"> ").await?;
    output.flush().await?;
    Ok(())
}

async fn say<W>(output: &mut W, text: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n> ").await?;
    output.flush().await?;
    Ok(())
}

/// Run the session until `quit` or end of input.
pub async fn run<R, W>(mut feed: Feed, input: R, output: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    draw(output, &feed).await?;

    loop {
        tokio::select! {
            _ = feed.next_update() => draw(output, &feed).await?,
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed");
                    break;
                };
                let Some(command) = parse_command(&line) else {
                    continue;
                };
                debug!(?command, "Command");
                match command {
                    Command::Quit => break,
                    Command::Help => say(output, HELP).await?,
                    Command::Category(category) => {
                        feed.change_category(category);
                        draw(output, &feed).await?;
                    }
                    Command::Open(n) => {
                        if feed.open(n - 1) {
                            draw(output, &feed).await?;
                        } else if feed.state().is_loading() {
                            say(output, "still loading").await?;
                        } else {
                            say(output, &format!("no card {} on screen", n)).await?;
                        }
                    }
                    Command::Close => {
                        if feed.close() {
                            draw(output, &feed).await?;
                        }
                    }
                    Command::Unknown(text) => {
                        say(output, &format!("unknown command: {} (try 'help')", text)).await?;
                    }
                }
            }
        }
    }

    info!("Session ended");
    Ok(())
}

/// Run the session on the process's stdin and stdout.
pub async fn browse(feed: Feed) -> Result<()> {
    let input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();
    run(feed, input, &mut output).await
}
