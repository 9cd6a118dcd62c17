use crate::export::{describe, yes_no, ExportError};
use crate::models::entry::JournalEntry;

/// Column labels, in order: student id, date, habit, religion, detail, notes,
/// teacher validation, parent validation.
pub const HEADERS: [&str; 8] = [
    "ID Siswa",
    "Tanggal",
    "Kebiasaan",
    "Agama",
    "Detail",
    "Catatan",
    "Validasi Guru",
    "Validasi Orang Tua",
];

/// A CSV file ready to be handed to the client as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument {
    pub filename: String,
    pub content: String,
}

/// Render `entries` as CSV, one row per entry in input order.
///
/// Rows are separated by `\n` with no newline after the last row, so an
/// empty input yields just the header line. Free text containing line breaks
/// is quoted, so N entries always parse back as N records after the header
/// even when the text has more than N + 1 lines.
pub fn export_csv(entries: &[JournalEntry], stem: &str) -> Result<CsvDocument, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(HEADERS)?;
    for entry in entries {
        let date = entry.date().format("%Y-%m-%d").to_string();
        let detail = describe(&entry.content.detail);
        writer.write_record([
            entry.student_id(),
            date.as_str(),
            entry.habit().display_name(),
            entry.content.religion.map_or("", |r| r.display_name()),
            detail.as_str(),
            entry.content.notes.as_deref().unwrap_or(""),
            yes_no(entry.validated_by_teacher),
            yes_no(entry.validated_by_parent),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let mut content = String::from_utf8(bytes)?;
    if content.ends_with('\n') {
        content.pop();
    }

    tracing::debug!(rows = entries.len(), stem, "rendered CSV export");

    Ok(CsvDocument {
        filename: format!("{stem}.csv"),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::{EntryContent, HabitDetail, Religion, WorshipPractice};
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn entry(student: &str, detail: HabitDetail) -> JournalEntry {
        let content = EntryContent {
            student_id: student.into(),
            date: NaiveDate::from_ymd_opt(2025, 5, 19).unwrap(),
            religion: None,
            detail,
            notes: None,
        };
        JournalEntry::new(Uuid::new_v4(), content, Utc::now())
    }

    fn meal(menu: &str) -> HabitDetail {
        HabitDetail::HealthyEating {
            menu_description: menu.into(),
        }
    }

    #[test]
    fn empty_input_is_a_single_header_line() {
        let doc = export_csv(&[], "jurnal_kosong").unwrap();
        assert_eq!(doc.filename, "jurnal_kosong.csv");
        assert_eq!(
            doc.content,
            "ID Siswa,Tanggal,Kebiasaan,Agama,Detail,Catatan,Validasi Guru,Validasi Orang Tua"
        );
        assert_eq!(doc.content.lines().count(), 1);
    }

    #[test]
    fn one_line_per_entry_plus_header() {
        let entries: Vec<_> = (0..3).map(|i| entry(&format!("S{i}"), meal("Nasi"))).collect();
        let doc = export_csv(&entries, "jurnal").unwrap();
        assert_eq!(doc.content.lines().count(), 4);
    }

    #[test]
    fn row_uses_display_names_and_localized_flags() {
        let mut e = entry(
            "S12345",
            HabitDetail::Worship {
                time: "08:00".parse().unwrap(),
                practice: WorshipPractice::WorshipActivity("Misa".into()),
            },
        );
        e.content.religion = Some(Religion::Catholic);
        e.validated_by_parent = true;

        let doc = export_csv(&[e], "jurnal").unwrap();
        let row = doc.content.lines().nth(1).unwrap();
        assert_eq!(row, "S12345,2025-05-19,Beribadah,Katolik,Misa pada 08:00,,Tidak,Ya");
    }

    #[test]
    fn commas_and_quotes_survive_a_csv_parser() {
        let menu = r#"Nasi, sayur "bening", tempe"#;
        let mut e = entry("S1", meal(menu));
        e.content.notes = Some("habis, \"semua\"".into());

        let doc = export_csv(&[e], "jurnal").unwrap();
        assert!(doc.content.contains(r#""Nasi, sayur ""bening"", tempe""#));

        let mut reader = csv::Reader::from_reader(doc.content.as_bytes());
        let header = reader.headers().unwrap().clone();
        assert_eq!(header.len(), HEADERS.len());
        let records: Vec<_> = reader.records().map(Result::unwrap).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(&records[0][4], menu);
        assert_eq!(&records[0][5], "habis, \"semua\"");
    }

    #[test]
    fn multiline_text_stays_one_record_per_entry() {
        let mut first = entry("S1", meal("Nasi\nsayur"));
        first.content.notes = Some("pagi\r\nsiang".into());
        let entries = vec![first, entry("S2", meal("Bubur"))];

        let doc = export_csv(&entries, "jurnal").unwrap();
        assert!(doc.content.lines().count() > entries.len() + 1);

        let mut reader = csv::Reader::from_reader(doc.content.as_bytes());
        let records: Vec<_> = reader.records().map(Result::unwrap).collect();
        assert_eq!(records.len(), entries.len());
        assert_eq!(&records[0][4], "Nasi\nsayur");
        assert_eq!(&records[0][5], "pagi\r\nsiang");
        assert_eq!(&records[1][0], "S2");
    }
}
