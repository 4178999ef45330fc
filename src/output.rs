//! Terminal output for benchmark reports, search matches and index stats

use crate::bench::QueryReport;
use crate::index::{InexactMatch, Match, TextIndex, TextIndexStats};
use crate::query::TextHits;
use std::io::{self, Write};
use std::time::Duration;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

fn stdout(color: bool) -> StandardStream {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

/// Print a construction phase and how long it took
pub fn print_phase(label: &str, elapsed: Duration, color: bool) -> io::Result<()> {
    let mut stdout = stdout(color);

    write!(stdout, "{label} done, took ")?;
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    writeln!(stdout, "{}ms", elapsed.as_millis())?;
    stdout.reset()?;

    Ok(())
}

/// Print one query's timings, followed by its samples if any were taken
pub fn print_report(report: &QueryReport, color: bool) -> io::Result<()> {
    let mut stdout = stdout(color);

    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
    writeln!(stdout, "Query {}", report.query)?;
    stdout.reset()?;

    writeln!(
        stdout,
        "  text search      {:>10.3}ms per query, {}ms total, {} occurrences in {} matches",
        report.text_ms_per_query(),
        report.text_total.as_millis(),
        report.occurrences,
        report.matches,
    )?;
    writeln!(
        stdout,
        "  metadata search  {:>10.3}ms per match, {}ms total, {} entries",
        report.metadata_ms_per_match(),
        report.metadata_total.as_millis(),
        report.metadata_hits,
    )?;

    for sample in &report.samples {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(stdout, "  {}", sample.position)?;
        stdout.reset()?;
        write!(stdout, ":")?;

        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(stdout, "{:?}", sample.text)?;
        stdout.reset()?;

        if !sample.metadata.is_empty() {
            write!(stdout, " [{}]", sample.metadata.join(", "))?;
        }
        writeln!(stdout)?;
    }

    stdout.flush()
}

/// Print the occurrences of a single search, at most `limit` lines.
///
/// `metadata` renders the entries attached to one occurrence.
pub fn print_hits<F>(
    index: &TextIndex,
    hits: &TextHits,
    limit: usize,
    color: bool,
    mut metadata: F,
) -> io::Result<()>
where
    F: FnMut(&Match, usize) -> Vec<String>,
{
    let mut stdout = stdout(color);
    let mut printed = 0;

    let edits: Vec<Option<&InexactMatch>> = match hits {
        TextHits::Exact(_) => vec![None; hits.len()],
        TextHits::Approximate(ms) => ms.iter().map(Some).collect(),
    };

    'outer: for (m, inexact) in hits.iter().zip(edits) {
        let mut positions = index.positions(m).to_vec();
        positions.sort_unstable();

        for position in positions {
            if printed == limit {
                break 'outer;
            }
            printed += 1;

            stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            write!(stdout, "{position}")?;
            stdout.reset()?;
            write!(stdout, ":")?;

            let text = index.matched_text(position, m.length);
            stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write!(stdout, "{text}")?;
            stdout.reset()?;

            if let Some(inexact) = inexact {
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
                write!(stdout, " {}", inexact.spec_string())?;
                stdout.reset()?;
            }

            let values = metadata(m, position);
            if !values.is_empty() {
                write!(stdout, " [{}]", values.join(", "))?;
            }
            writeln!(stdout)?;
        }
    }

    let total = hits.occurrences();
    if total > printed {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        writeln!(stdout, "-- {} more occurrences not shown", total - printed)?;
        stdout.reset()?;
    }

    stdout.flush()
}

/// Print index statistics
pub fn print_stats(stats: &TextIndexStats, color: bool) -> io::Result<()> {
    let mut stdout = stdout(color);

    let rows = [
        ("Text length", stats.text_len),
        ("Alphabet size", stats.alphabet_len),
        ("Rank blocks", stats.block_count),
        ("Block size", stats.block_size),
    ];

    let folding = if stats.case_insensitive {
        "ascii lowercase"
    } else {
        "none"
    };
    let rows = rows
        .into_iter()
        .map(|(label, value)| (label, value.to_string()))
        .chain([("Case folding", folding.to_string())]);

    for (label, value) in rows {
        write!(stdout, "{label:<14}")?;
        stdout.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(stdout, "{value}")?;
        stdout.reset()?;
    }

    Ok(())
}
