//! Line-oriented front end
//!
//! Drives the same [`AppContext`] as the GUI from stdin. Bare input behaves
//! like submitting the omnibox; everything else is a `:`-prefixed command.

use std::io::{BufRead, Write};

use crate::app::{AppContext, Submission};
use crate::ledger::DebouncedField;
use crate::session::{ActiveView, TabDisplay};
use crate::utils::Result;

const HELP: &str = "\
commands:
  <text>             search, or navigate when it looks like a URL
  :go <url>          navigate the active tab
  :tabs              list tabs
  :new               open a tab
  :close [n]         close tab n (default: active)
  :switch <n>        activate tab n
  :move <from> <to>  reorder tabs
  :clear             reset the active tab
  :undo / :redo      step through omnibox history
  :submit            submit the current omnibox value
  :view <name>       tabs, bookmarks, history, downloads, extensions
  :star              toggle a bookmark on the current page
  :bookmarks [q]     list or search bookmarks
  :history [q]       list or search history
  :downloads         list downloads
  :help              this text
  :quit              exit";

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit(String),
    Go(String),
    Tabs,
    New,
    Close(Option<usize>),
    Switch(usize),
    Move(usize, usize),
    Clear,
    Undo,
    Redo,
    /// Submit whatever the omnibox holds, e.g. after an undo
    Resubmit,
    View(ActiveView),
    Star,
    Bookmarks(String),
    History(String),
    Downloads,
    Help,
    Quit,
}

/// Parse one line. Blank lines and unknown commands yield `None`.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix(':') else {
        return Some(Command::Submit(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    // Tab positions are 1-based on the command line.
    let index = |s: &str| s.parse::<usize>().ok().filter(|n| *n > 0).map(|n| n - 1);

    match name {
        "go" if !arg.is_empty() => Some(Command::Go(arg.to_string())),
        "tabs" => Some(Command::Tabs),
        "new" => Some(Command::New),
        "close" if arg.is_empty() => Some(Command::Close(None)),
        "close" => index(arg).map(|n| Command::Close(Some(n))),
        "switch" => index(arg).map(Command::Switch),
        "move" => {
            let mut parts = arg.split_whitespace();
            let from = index(parts.next()?)?;
            let to = index(parts.next()?)?;
            Some(Command::Move(from, to))
        }
        "clear" => Some(Command::Clear),
        "undo" => Some(Command::Undo),
        "redo" => Some(Command::Redo),
        "submit" => Some(Command::Resubmit),
        "view" => parse_view(arg).map(Command::View),
        "star" => Some(Command::Star),
        "bookmarks" => Some(Command::Bookmarks(arg.to_string())),
        "history" => Some(Command::History(arg.to_string())),
        "downloads" => Some(Command::Downloads),
        "help" => Some(Command::Help),
        "quit" | "q" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

fn parse_view(name: &str) -> Option<ActiveView> {
    std::iter::once(ActiveView::Tabs)
        .chain(ActiveView::PANELS)
        .find(|view| view.label().eq_ignore_ascii_case(name))
}

/// Interactive session over an [`AppContext`]
pub struct Repl<W: Write> {
    ctx: AppContext,
    omnibox: DebouncedField,
    out: W,
}

impl<W: Write> Repl<W> {
    pub fn new(ctx: AppContext, out: W) -> Self {
        Self {
            ctx,
            omnibox: DebouncedField::new(""),
            out,
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn omnibox(&self) -> &DebouncedField {
        &self.omnibox
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Read commands until EOF or `:quit`
    pub async fn run(&mut self, input: impl BufRead) -> Result<()> {
        writeln!(self.out, "Type :help for commands")?;
        for line in input.lines() {
            let line = line?;
            match parse_command(&line) {
                Some(Command::Quit) => break,
                Some(command) => self.execute(command).await?,
                None if line.trim().is_empty() => {}
                None => writeln!(self.out, "Unknown command: {}", line.trim())?,
            }
        }
        self.ctx.shutdown();
        Ok(())
    }

    pub async fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Submit(input) => self.submit(input).await?,
            Command::Resubmit => {
                let input = self.omnibox.value().to_string();
                if input.trim().is_empty() {
                    writeln!(self.out, "Nothing to submit")?;
                } else {
                    self.submit(input).await?;
                }
            }
            Command::Go(url) => {
                self.omnibox.commit_value(url.clone());
                if self.ctx.navigate(&url) {
                    self.print_active()?;
                } else {
                    writeln!(self.out, "Invalid URL: {}", url)?;
                }
            }
            Command::Tabs => self.print_tabs()?,
            Command::New => {
                self.ctx.add_tab();
                self.sync_omnibox();
                self.print_tabs()?;
            }
            Command::Close(position) => {
                let id = match position {
                    Some(n) => self.ctx.session().tabs().get(n).map(|tab| tab.id()),
                    None => Some(self.ctx.session().active_tab_id()),
                };
                if let Some(id) = id {
                    self.ctx.remove_tab(id);
                    self.sync_omnibox();
                }
                self.print_tabs()?;
            }
            Command::Switch(n) => {
                if let Some(id) = self.ctx.session().tabs().get(n).map(|tab| tab.id()) {
                    self.ctx.session_mut().set_active_tab(id);
                    self.sync_omnibox();
                }
                self.print_tabs()?;
            }
            Command::Move(from, to) => {
                self.ctx.session_mut().move_tab(from, to);
                self.print_tabs()?;
            }
            Command::Clear => {
                self.ctx.session_mut().clear_active_tab();
                self.sync_omnibox();
            }
            Command::Undo => {
                self.omnibox.undo();
                writeln!(self.out, "omnibox: {}", self.omnibox.value())?;
            }
            Command::Redo => {
                self.omnibox.redo();
                writeln!(self.out, "omnibox: {}", self.omnibox.value())?;
            }
            Command::View(view) => {
                self.ctx.set_active_view(view);
                writeln!(self.out, "view: {}", self.ctx.session().active_view())?;
            }
            Command::Star => match self.ctx.toggle_bookmark() {
                Some(true) => writeln!(self.out, "Bookmarked")?,
                Some(false) => writeln!(self.out, "Bookmark removed")?,
                None => writeln!(self.out, "Only pages can be bookmarked")?,
            },
            Command::Bookmarks(query) => {
                for bookmark in self.ctx.bookmarks().search(&query) {
                    writeln!(self.out, "  {}  {}", bookmark.title, bookmark.url)?;
                }
            }
            Command::History(query) => {
                for item in self.ctx.history().search(&query) {
                    writeln!(self.out, "  {}  {}", item.title, item.url)?;
                }
            }
            Command::Downloads => {
                for item in self.ctx.downloads().sorted() {
                    writeln!(
                        self.out,
                        "  {} ({}) {:.0}% {}",
                        item.file_name, item.size, item.progress, item.status
                    )?;
                }
            }
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Quit => {}
        }
        Ok(())
    }

    async fn submit(&mut self, input: String) -> Result<()> {
        self.omnibox.commit_value(input.clone());
        match self.ctx.submit(&input) {
            Some(Submission::Search(ticket)) => {
                let service = self.ctx.answer_service();
                let result = service.answer(&ticket.query).await;
                self.ctx.resolve(&ticket, result);
                self.print_active()?;
            }
            Some(Submission::Navigated) => self.print_active()?,
            Some(Submission::Dropped) => writeln!(self.out, "Invalid URL: {}", input)?,
            None => {}
        }
        Ok(())
    }

    /// Point the omnibox at the newly active tab's input
    fn sync_omnibox(&mut self) {
        let value = self
            .ctx
            .session()
            .active_tab()
            .map(|tab| tab.input_value().to_string())
            .unwrap_or_default();
        self.omnibox.rebind(value);
    }

    fn print_tabs(&mut self) -> Result<()> {
        let active = self.ctx.session().active_tab_id();
        for (i, tab) in self.ctx.session().tabs().iter().enumerate() {
            let marker = if tab.id() == active { '*' } else { ' ' };
            writeln!(self.out, "{} {}. {}", marker, i + 1, tab.title())?;
        }
        Ok(())
    }

    fn print_active(&mut self) -> Result<()> {
        let Some(tab) = self.ctx.session().active_tab() else {
            return Ok(());
        };
        writeln!(self.out, "== {} ==", tab.title())?;
        match tab.display() {
            TabDisplay::Blank => {}
            TabDisplay::Navigating { url } => writeln!(self.out, "Navigated to {}", url)?,
            TabDisplay::Searching { .. } => writeln!(self.out, "Searching...")?,
            TabDisplay::Failed { error, .. } => writeln!(self.out, "{}", error)?,
            TabDisplay::Answered { answer, .. } => {
                writeln!(self.out, "{}", answer.text)?;
                if !answer.sources.is_empty() {
                    writeln!(self.out, "\nSources:")?;
                    for (i, source) in answer.sources.iter().enumerate() {
                        writeln!(self.out, "  [{}] {} <{}>", i + 1, source.title, source.uri)?;
                    }
                }
                if !answer.related_searches.is_empty() {
                    writeln!(self.out, "\nRelated:")?;
                    for related in &answer.related_searches {
                        writeln!(self.out, "  - {}", related)?;
                    }
                }
            }
        }
        Ok(())
    }
}
