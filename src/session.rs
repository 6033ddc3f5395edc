//! Interactive ledger session: operator commands in, rendered view out.
//!
//! Every command line is an explicit submit, so filters are only sent to the
//! API once per command. Fetches run on worker threads and come back through
//! a channel; the controller drops any response that a later command has
//! superseded.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::client::ReportingApi;
use crate::config::Config;
use crate::controller::{FetchRequest, FetchResponse, QueryController};
use crate::error::{LedgerError, Result};
use crate::export::export_successful_records;
use crate::ledger::{FilterChange, FilterState, SavingsType, SavingsTypeFilter, StatusFilter};
use crate::view::{LedgerView, Theme};

pub const HELP: &str = "\
Perintah:
  search <teks>             cari nama anggota (kosong = hapus pencarian)
  status <all|sukses|pending|failed>
  jenis <id|all>            filter jenis simpanan
  filter key=value ...      ubah beberapa filter sekaligus (search, status, jenis)
                            contoh: filter search=\"Budi Santoso\" status=sukses
  export [path]             ekspor transaksi sukses ke .xlsx (status sukses saja)
  types                     daftar jenis simpanan
  show                      tampilkan ulang
  help                      bantuan ini
  quit                      keluar";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Filter(FilterChange),
    Export(Option<PathBuf>),
    Types,
    Show,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "search" | "cari" => Command::Filter(FilterChange::search(rest)),
        "status" => Command::Filter(FilterChange::status(rest.parse()?)),
        "jenis" => Command::Filter(FilterChange::savings_type(SavingsTypeFilter::parse(rest))),
        "filter" => Command::Filter(parse_filter_pairs(rest)?),
        "export" => Command::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "types" => Command::Types,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => return Err(LedgerError::UnknownCommand(word.to_string())),
    };

    Ok(Some(command))
}

const FILTER_KEYS: [&str; 4] = ["search", "status", "jenis", "jenis_simpanan_id"];

/// Split `token` into a lowercased filter key and its value, if it starts
/// with a known `key=`.
fn filter_key(token: &str) -> Option<(String, &str)> {
    let (key, value) = token.split_once('=')?;
    let key = key.to_lowercase();
    FILTER_KEYS.contains(&key.as_str()).then_some((key, value))
}

/// Parse `key=value` pairs. A search value runs until the next known key, so
/// `search=Budi Santoso status=sukses` searches for "Budi Santoso"; it may
/// also be wrapped in double quotes.
fn parse_filter_pairs(input: &str) -> Result<FilterChange> {
    let mut pairs: Vec<(String, String)> = Vec::new();

    for token in input.split_whitespace() {
        if let Some((key, value)) = filter_key(token) {
            pairs.push((key, value.to_string()));
            continue;
        }
        match pairs.last_mut() {
            Some((key, value)) if key.as_str() == "search" => {
                value.push(' ');
                value.push_str(token);
            }
            _ => return Err(LedgerError::InvalidFilter(token.to_string())),
        }
    }

    let mut change = FilterChange::default();
    for (key, value) in &pairs {
        let value = unquote(value);
        match key.as_str() {
            "search" => change.search_term = Some(value.to_string()),
            "status" => change.status = Some(value.parse::<StatusFilter>()?),
            _ => change.savings_type = Some(SavingsTypeFilter::parse(value)),
        }
    }

    if change.is_empty() {
        return Err(LedgerError::InvalidFilter(input.to_string()));
    }
    Ok(change)
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Fetch the savings-type reference list. Failures are logged and degrade to
/// an empty list.
pub fn load_savings_types(api: &dyn ReportingApi) -> Vec<SavingsType> {
    match api.list_savings_types() {
        Ok(types) => types,
        Err(e) => {
            warn!("Failed to fetch savings types: {e}");
            Vec::new()
        }
    }
}

/// Mount a controller on `filter` and resolve its first fetch synchronously
pub fn load_once(api: &dyn ReportingApi, filter: FilterState) -> QueryController {
    let mut controller = QueryController::with_filter(filter);
    let request = controller.mount();
    let outcome = api.payment_history(&request.filter);
    controller.resolve(request.complete(outcome));
    controller
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    api: Arc<dyn ReportingApi>,
    config: Config,
    theme: Theme,
    controller: QueryController,
    savings_types: Vec<SavingsType>,
    sender: Sender<FetchResponse>,
    receiver: Receiver<FetchResponse>,
}

impl Session {
    pub fn new(api: Arc<dyn ReportingApi>, config: Config, theme: Theme) -> Self {
        let (sender, receiver) = channel();
        Self {
            api,
            config,
            theme,
            controller: QueryController::new(),
            savings_types: Vec::new(),
            sender,
            receiver,
        }
    }

    pub fn controller(&self) -> &QueryController {
        &self.controller
    }

    pub fn savings_types(&self) -> &[SavingsType] {
        &self.savings_types
    }

    /// Load reference data once and issue the initial fetch
    pub fn start(&mut self) {
        self.savings_types = load_savings_types(self.api.as_ref());
        let request = self.controller.mount();
        self.dispatch(request);
    }

    fn dispatch(&self, request: FetchRequest) {
        let api = Arc::clone(&self.api);
        let sender = self.sender.clone();
        thread::spawn(move || {
            let outcome = api.payment_history(&request.filter);
            // Receiver gone means the session ended; nothing left to update
            let _ = sender.send(request.complete(outcome));
        });
    }

    /// Feed responses to the controller until the current fetch settles or
    /// `timeout` passes. Returns whether the view is settled.
    pub fn wait_for_settle(&mut self, timeout: Duration) -> bool {
        // A deadline past what `Instant` can represent means wait without one
        let deadline = Instant::now().checked_add(timeout);
        while self.controller.is_loading() {
            let received = match deadline {
                Some(deadline) => self
                    .receiver
                    .recv_timeout(deadline.saturating_duration_since(Instant::now())),
                None => self.receiver.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(response) => {
                    self.controller.resolve(response);
                }
                Err(RecvTimeoutError::Timeout) => {
                    debug!("history fetch still pending after {timeout:?}");
                    return false;
                }
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }

    /// Apply any responses that arrived since the last wait, without blocking
    fn drain_responses(&mut self) {
        while let Ok(response) = self.receiver.try_recv() {
            self.controller.resolve(response);
        }
    }

    fn settle_timeout(&self) -> Duration {
        self.config.api.timeout().saturating_add(Duration::from_secs(1))
    }

    pub fn render(&self) -> String {
        LedgerView::new(&self.config.display, self.theme)
            .render(&self.controller, &self.savings_types)
    }

    /// Execute one command, writing any output to `out`
    pub fn handle<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow> {
        self.drain_responses();
        match command {
            Command::Filter(change) => {
                if let Some(request) = self.controller.apply(change) {
                    self.dispatch(request);
                    self.wait_for_settle(self.settle_timeout());
                }
                writeln!(out, "{}", self.render())?;
            }
            Command::Export(path) => {
                if !self.controller.can_export() {
                    return Err(LedgerError::ExportRequiresSuccessFilter);
                }
                let path = path.unwrap_or_else(|| self.config.export.default_path());
                let count = export_successful_records(
                    self.controller.records(),
                    &path,
                    &self.config.display.date_format,
                )?;
                writeln!(out, "Exported {} transaction(s) to {}", count, path.display())?;
            }
            Command::Types => {
                if self.savings_types.is_empty() {
                    writeln!(out, "No savings types available.")?;
                } else {
                    let view = LedgerView::new(&self.config.display, self.theme);
                    writeln!(out, "{}", view.savings_types_table(&self.savings_types))?;
                }
            }
            Command::Show => writeln!(out, "{}", self.render())?,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Read commands from `input` until quit or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        self.start();
        self.wait_for_settle(self.settle_timeout());
        writeln!(out, "{}", self.render())?;
        writeln!(out, "Type 'help' for commands.")?;

        for line in input.lines() {
            let line = line?;
            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    writeln!(out, "{e}")?;
                    continue;
                }
            };

            match self.handle(command, out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(LedgerError::Io(e)) => return Err(LedgerError::Io(e)),
                Err(e) => writeln!(out, "{e}")?,
            }
            out.flush()?;
        }

        Ok(())
    }
}
