//! Printable HTML report.
//!
//! Entries are grouped by student, then by date, and each (student, date)
//! group becomes one table. The document is self-contained so the client can
//! open it in a new window and print or save it as PDF.

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::export::{describe, ExportError};
use crate::models::entry::JournalEntry;

const PRINTABLE_TEMPLATE: &str = include_str!("../../templates/printable.html");

const WEEKDAYS: [&str; 7] = ["Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu"];
const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// The host refused to open a display surface (e.g. a blocked popup).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("display surface blocked")]
pub struct SurfaceBlocked;

/// Somewhere a printable document can be shown to the user.
pub trait PrintSurface {
    fn present(&mut self, title: &str, document: String) -> Result<(), SurfaceBlocked>;
}

/// Render the report and hand it to `surface`.
///
/// A blocked surface is reported as [`ExportError::Blocked`]; the caller can
/// ask the user to allow it and retry.
pub fn export_printable<S: PrintSurface + ?Sized>(
    entries: &[JournalEntry],
    stem: &str,
    printed_at: DateTime<Utc>,
    surface: &mut S,
) -> Result<(), ExportError> {
    let document = render_printable(entries, stem, printed_at);
    surface.present(stem, document).map_err(|blocked| {
        tracing::warn!(stem, "printable export surface blocked");
        ExportError::from(blocked)
    })
}

pub fn render_printable(entries: &[JournalEntry], stem: &str, printed_at: DateTime<Utc>) -> String {
    let mut grouped: BTreeMap<&str, BTreeMap<NaiveDate, Vec<&JournalEntry>>> = BTreeMap::new();
    for entry in entries {
        grouped
            .entry(entry.student_id())
            .or_default()
            .entry(entry.date())
            .or_default()
            .push(entry);
    }

    let mut groups = String::new();
    if grouped.is_empty() {
        let _ = writeln!(groups, "  <p class=\"empty\">Tidak ada data jurnal.</p>");
    }
    for (student_id, dates) in &grouped {
        let _ = writeln!(groups, "  <h2>Siswa: {}</h2>", escape_html(student_id));
        for (date, day_entries) in dates {
            write_day_table(&mut groups, *date, day_entries);
        }
    }

    let title = escape_html(stem);
    let printed_at = printed_at.format("%d/%m/%Y %H:%M UTC").to_string();
    fill_template(
        PRINTABLE_TEMPLATE,
        &[
            ("title", &title),
            ("printed_at", &printed_at),
            ("groups", &groups),
        ],
    )
}

/// Substitute `{{key}}` placeholders in one pass. Substituted values are not
/// scanned again; unknown placeholders are left as they are.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let hit = values.iter().find_map(|(key, value)| {
            tail.strip_prefix("{{")?
                .strip_prefix(key)?
                .strip_prefix("}}")
                .map(|after| (*value, after))
        });
        match hit {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push_str("{{");
                rest = &tail[2..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn write_day_table(html: &mut String, date: NaiveDate, entries: &[&JournalEntry]) {
    let _ = writeln!(html, "  <h3>Tanggal: {}</h3>", long_date(date));
    let _ = writeln!(html, "  <table>");
    let _ = writeln!(
        html,
        "    <thead><tr><th>Kebiasaan</th><th>Agama</th><th>Detail</th><th>Catatan</th><th>Validasi</th></tr></thead>"
    );
    let _ = writeln!(html, "    <tbody>");
    for entry in entries {
        let religion = entry.content.religion.map_or("-", |r| r.display_name());
        let notes = entry.content.notes.as_deref().unwrap_or("-");
        let _ = writeln!(html, "      <tr>");
        let _ = writeln!(html, "        <td>{}</td>", entry.habit().display_name());
        let _ = writeln!(html, "        <td>{religion}</td>");
        let _ = writeln!(
            html,
            "        <td>{}</td>",
            escape_html(&describe(&entry.content.detail))
        );
        let _ = writeln!(html, "        <td>{}</td>", escape_html(notes));
        let _ = writeln!(
            html,
            "        <td>{}{}</td>",
            validation_badge("Guru", entry.validated_by_teacher),
            validation_badge("Orang Tua", entry.validated_by_parent)
        );
        let _ = writeln!(html, "      </tr>");
    }
    let _ = writeln!(html, "    </tbody>");
    let _ = writeln!(html, "  </table>");
}

fn validation_badge(label: &str, validated: bool) -> String {
    let (class, glyph) = if validated {
        ("validated", '✓')
    } else {
        ("not-validated", '✗')
    };
    format!("<div class=\"validation {class}\">{label}: {glyph}</div>")
}

/// `Senin, 19 Mei 2025`
fn long_date(date: NaiveDate) -> String {
    format!(
        "{}, {} {} {}",
        WEEKDAYS[date.weekday().num_days_from_monday() as usize],
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
