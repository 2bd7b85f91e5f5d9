//! Diagnostic rendering

use ariadne::{Color, Label, Report, ReportKind, Source};
use ferry_symbols::{Diagnostic, Severity};
use std::fs;

/// Print a diagnostic against its source file, or as a plain line when the file can't be read
pub fn render(diagnostic: &Diagnostic) -> std::io::Result<()> {
    let member = diagnostic.error.member();
    let Some(location) = &member.location else {
        eprintln!("{}", diagnostic);
        return Ok(());
    };
    let Ok(text) = fs::read_to_string(&location.file) else {
        eprintln!("{}\n  --> {}", diagnostic, location);
        return Ok(());
    };

    let (kind, color) = match diagnostic.severity {
        Severity::Error => (ReportKind::Error, Color::Red),
        Severity::Warning => (ReportKind::Warning, Color::Yellow),
    };
    let file = location.file.as_str();
    let mut report = Report::build(kind, file, location.span.start)
        .with_code(diagnostic.error.code())
        .with_message(diagnostic.error.to_string())
        .with_label(
            Label::new((file, location.span.start..location.span.end))
                .with_message(format!("in {}", member))
                .with_color(color),
        );

    for (note_location, note) in diagnostic.error.notes() {
        report = match note_location {
            Some(at) if at.file == location.file => report.with_label(
                Label::new((file, at.span.start..at.span.end))
                    .with_message(note)
                    .with_color(Color::Blue),
            ),
            Some(at) => report.with_note(format!("{} ({})", note, at)),
            None => report.with_note(note),
        };
    }

    report.finish().eprint((file, Source::from(text)))
}
