//! Line commands for the `fsel` driver.
//!
//! Each stdin line is one command:
//!
//! | Input                 | Command                          |
//! |-----------------------|----------------------------------|
//! | `search <term>`, `/<term>` | type a search term (empty term lists baseline) |
//! | `select <href>...`    | replace the selection            |
//! | `clear`               | clear the selection              |
//! | `show`                | print the current view           |
//! | `help`                | list commands                    |
//! | `q`, `quit`           | exit                             |

use crate::display;
use fsel_core::{
    FilterModel, FilterSelector, FilterValue, SelectOption, SelectionInput, ValueKind,
};
use std::io::Write;

/// A parsed, validated command ready to be executed against a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Select(Vec<String>),
    Clear,
    Show,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line.
    ///
    /// Returns `Ok(cmd)` on success, `Err(message)` on failure. A blank line
    /// returns `Err("")` as a sentinel meaning "nothing to do".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        if let Some(term) = input.strip_prefix('/') {
            return Ok(Command::Search(term.trim().to_string()));
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        match word {
            "q" | "quit" => Ok(Command::Quit),
            "help" | "?" => Ok(Command::Help),
            "show" => Ok(Command::Show),
            "clear" => Ok(Command::Clear),
            "search" => Ok(Command::Search(rest.to_string())),
            "select" => {
                let hrefs: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
                if hrefs.is_empty() {
                    Err("usage: select <href>...".to_string())
                } else {
                    Ok(Command::Select(hrefs))
                }
            }
            other => Err(format!("unknown command: {other}")),
        }
    }
}

pub const HELP: &[(&str, &str)] = &[
    ("search <term>  /  /<term>", "Search options (empty term lists all)"),
    ("select <href>...", "Replace the selection"),
    ("clear", "Clear the selection"),
    ("show", "Print options and selection"),
    ("help", "Show this list"),
    ("q  /  quit", "Exit"),
];

/// Turn typed identities into selector input for a filter of `kind`.
///
/// Resource identities are looked up among the currently available options
/// so the stored value carries its label; unknown hrefs are kept with the
/// href as label.
pub fn selection_input(
    identities: &[String],
    kind: ValueKind,
    available: &[SelectOption],
) -> SelectionInput {
    let mut values: Vec<FilterValue> = identities
        .iter()
        .map(|identity| match kind {
            ValueKind::Resource => available
                .iter()
                .find(|o| &o.href == identity)
                .cloned()
                .unwrap_or_else(|| SelectOption::new(identity.as_str(), identity.as_str()))
                .into(),
            ValueKind::Scalar => FilterValue::Scalar(identity.clone()),
        })
        .collect();

    match values.len() {
        0 => SelectionInput::Empty,
        1 => SelectionInput::Single(values.remove(0)),
        _ => SelectionInput::Many(values),
    }
}

/// Execute a parsed [`Command`]. `Quit` is handled by the caller.
pub fn execute_command(
    selector: &mut FilterSelector,
    filter: &mut FilterModel,
    cmd: Command,
    out: &mut impl Write,
) -> std::io::Result<()> {
    match cmd {
        Command::Search(term) => {
            tracing::debug!(term = %term, "command: search");
            selector.on_search_term_typed(term);
        }
        Command::Select(identities) => {
            let input = selection_input(&identities, filter.value_kind, selector.available_options());
            selector.on_selection_changed(filter, input);
            display::write_view(out, &selector.view(filter))?;
        }
        Command::Clear => {
            selector.on_selection_changed(filter, SelectionInput::Empty);
            display::write_view(out, &selector.view(filter))?;
        }
        Command::Show => display::write_view(out, &selector.view(filter))?,
        Command::Help => {
            for (keys, what) in HELP {
                writeln!(out, "  {keys:<28} {what}")?;
            }
        }
        Command::Quit => {}
    }
    Ok(())
}
