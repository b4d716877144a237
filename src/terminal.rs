//! Line-oriented terminal front end
//!
//! Draws the conversation on stdout and redraws the streaming reply in place
//! on every update.

use crate::client::AssistantClient;
use crate::conversation::{Role, Turn};
use crate::session::{ChatSession, Renderer, ReplyHandle};
use crate::stream::DisplayState;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};
use std::io::{self, IsTerminal, Stdout, Write};
use tokio::io::{AsyncBufReadExt, BufReader};
use unicode_width::UnicodeWidthStr;

const ASSISTANT_LABEL: &str = "assistant: ";
const USER_LABEL: &str = "you: ";
const THINKING: &str = "thinking...";
const PROMPT: &str = "> ";
const DEFAULT_WIDTH: u16 = 80;

/// A line of user input
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Query(&'a str),
    History,
    Quit,
    Empty,
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        match line.trim() {
            "" => Command::Empty,
            "/quit" | "/exit" => Command::Quit,
            "/history" => Command::History,
            _ => Command::Query(line),
        }
    }
}

/// [`Renderer`] that writes to a terminal
pub struct TerminalRenderer<W: Write> {
    out: W,
    width: u16,
    /// Print user turns (stdin is not a terminal, so nothing echoed them)
    echo_user: bool,
    next_reply: u64,
    current_reply: Option<u64>,
    /// Rows the live reply occupies, cleared before each redraw
    live_rows: u16,
}

impl TerminalRenderer<Stdout> {
    pub fn stdout() -> Self {
        let width = crossterm::terminal::size().map_or(DEFAULT_WIDTH, |(cols, _)| cols);
        Self::new(io::stdout(), width, !io::stdin().is_terminal())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, width: u16, echo_user: bool) -> Self {
        Self {
            out,
            width: width.max(1),
            echo_user,
            next_reply: 0,
            current_reply: None,
            live_rows: 0,
        }
    }

    #[allow(dead_code)] // Used in tests
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print the full conversation log
    pub fn print_history(&mut self, turns: &[Turn]) {
        let result = turns
            .iter()
            .try_for_each(|turn| self.write_turn(turn))
            .and_then(|()| self.write_prompt());
        report(result);
    }

    /// Show the input prompt again after a line that started no cycle
    pub fn prompt(&mut self) {
        let result = self.write_prompt();
        report(result);
    }

    fn write_turn(&mut self, turn: &Turn) -> io::Result<()> {
        let label = match turn.role {
            Role::Human => USER_LABEL,
            Role::Assistant => ASSISTANT_LABEL,
        };
        queue!(self.out, Print(label), Print(&turn.content), Print("\n"))
    }

    fn write_prompt(&mut self) -> io::Result<()> {
        queue!(self.out, Print(PROMPT))?;
        self.out.flush()
    }

    /// Replace the live reply region with `text`
    fn draw_live(&mut self, text: &str, style: LiveStyle) -> io::Result<()> {
        if self.live_rows > 0 {
            queue!(
                self.out,
                cursor::MoveToPreviousLine(self.live_rows),
                Clear(ClearType::FromCursorDown)
            )?;
        }

        let line = format!("{ASSISTANT_LABEL}{text}");
        match style {
            LiveStyle::Thinking => queue!(
                self.out,
                SetAttribute(Attribute::Dim),
                Print(&line),
                SetAttribute(Attribute::Reset)
            )?,
            LiveStyle::Content => queue!(self.out, Print(&line))?,
            LiveStyle::Error => queue!(
                self.out,
                SetForegroundColor(Color::Red),
                Print(&line),
                ResetColor
            )?,
        }
        queue!(self.out, Print("\n"))?;

        self.live_rows = rows_for(&line, self.width);
        self.out.flush()
    }

    fn is_current(&self, reply: &ReplyHandle) -> bool {
        self.current_reply == Some(reply.id())
    }
}

fn report(result: io::Result<()>) {
    if let Err(e) = result {
        tracing::warn!(error = %e, "Terminal write failed");
    }
}

#[derive(Debug, Clone, Copy)]
enum LiveStyle {
    Thinking,
    Content,
    Error,
}

impl From<&DisplayState> for LiveStyle {
    fn from(state: &DisplayState) -> Self {
        if state.is_error() {
            LiveStyle::Error
        } else {
            LiveStyle::Content
        }
    }
}

/// Terminal rows `text` wraps to at the given width, counting wide
/// characters as two columns
fn rows_for(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = text
        .split('\n')
        .map(|line| line.width().div_ceil(width).max(1))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn show_turn(&mut self, turn: &Turn) {
        if turn.role == Role::Human && !self.echo_user {
            return;
        }
        let result = self.write_turn(turn).and_then(|()| self.out.flush());
        report(result);
    }

    fn begin_reply(&mut self) -> ReplyHandle {
        self.next_reply += 1;
        self.current_reply = Some(self.next_reply);
        self.live_rows = 0;
        let result = self.draw_live(THINKING, LiveStyle::Thinking);
        report(result);
        ReplyHandle::new(self.next_reply)
    }

    fn update_reply(&mut self, reply: &ReplyHandle, state: &DisplayState) {
        if !self.is_current(reply) {
            tracing::debug!(reply = reply.id(), "Ignoring update for a settled reply");
            return;
        }
        let result = self.draw_live(state.text(), state.into());
        report(result);
    }

    fn finish_reply(&mut self, reply: ReplyHandle, state: &DisplayState) {
        if !self.is_current(&reply) {
            tracing::debug!(reply = reply.id(), "Ignoring finish for a settled reply");
            return;
        }
        let result = self.draw_live(state.text(), state.into());
        report(result);
        // Leave the final text in the scrollback
        self.current_reply = None;
        self.live_rows = 0;
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        if enabled {
            self.prompt();
        }
    }
}

/// Read queries from stdin until EOF or `/quit`
pub async fn run<C: AssistantClient>(
    mut session: ChatSession<C, TerminalRenderer<Stdout>>,
) -> io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Quit => break,
            Command::Empty => session.renderer_mut().prompt(),
            Command::History => {
                let history = session.history().to_vec();
                session.renderer_mut().print_history(&history);
            }
            Command::Query(query) => {
                if let Err(e) = session.submit(query).await {
                    tracing::warn!(error = %e, "Query rejected");
                    session.renderer_mut().prompt();
                }
            }
        }
    }

    tracing::info!("Input closed, ending chat session");
    Ok(())
}
