//! Non-fatal problems found during a build: parse warnings, duplicate
//! import paths and, with `--isolate-failures`, skipped files.

mod report;

pub use report::{Diagnostic, Diagnostics, Severity};

use crate::output::{plural, Printer};

/// Print diagnostics to stderr, followed by a summary line.
pub fn print_diagnostics(printer: &Printer, diagnostics: &Diagnostics) {
    if diagnostics.is_empty() {
        return;
    }

    for d in diagnostics.iter() {
        let label = printer.severity(&d.severity.to_string(), d.severity == Severity::Error);
        eprintln!("{}[{}]: {}", label, d.code, d.message);
        if let Some(location) = d.location() {
            eprintln!("  {} {}", printer.dim("-->"), printer.cyan(&location));
        }
        if let Some(help) = &d.help {
            eprintln!("  {} {}", printer.dim("help:"), help);
        }
    }

    let summary = format!(
        "{}, {}",
        plural(diagnostics.error_count(), "error", "errors"),
        plural(diagnostics.warning_count(), "warning", "warnings")
    );
    if diagnostics.has_errors() {
        printer.error("Diagnostics", &summary);
    } else {
        printer.warning("Diagnostics", &summary);
    }
}
