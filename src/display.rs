//! Plain-text rendering of a [`SelectionView`] for the line-mode driver.

use fsel_core::{FilterValue, SelectionView};
use std::io::Write;

pub fn write_view(out: &mut impl Write, view: &SelectionView<'_>) -> std::io::Result<()> {
    writeln!(out, "options ({}):", view.available_options.len())?;
    for option in view.available_options {
        let mark = if view.selection.iter().any(|v| v.identity() == option.href) {
            'x'
        } else {
            ' '
        };
        writeln!(out, "  [{mark}] {}  <{}>", option.label, option.href)?;
    }

    if view.is_empty {
        writeln!(out, "selection: (none)")
    } else {
        let labels: Vec<&str> = view.selection.iter().map(value_label).collect();
        writeln!(out, "selection: {}", labels.join(", "))
    }
}

fn value_label(value: &FilterValue) -> &str {
    match value {
        FilterValue::Resource(option) => &option.label,
        FilterValue::Scalar(raw) => raw,
    }
}
