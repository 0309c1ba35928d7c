//! Anki CSV export.
//!
//! Anki's CSV import wants raw rows with no header. Each key point becomes
//! one row: `key_point, podcast_title, author, date`. The key-point cell
//! carries the point text plus its quotes on following lines; the csv
//! writer quotes embedded newlines and commas.

use super::{CardResults, KeyPoint};
use crate::catalog::Catalog;
use crate::error::Result;
use std::path::Path;
use tracing::debug;

/// One row of the Anki CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct FlashcardRow {
    pub key_point: String,
    pub podcast_title: String,
    pub author: String,
    pub date: String,
}

/// Build the full row set from catalog metadata and stored results.
///
/// Catalog order drives row order, so the CSV stays stable across runs.
pub fn collect_rows(catalog: &Catalog, results: &CardResults) -> Vec<FlashcardRow> {
    let mut rows = Vec::new();

    for episode in catalog.episodes() {
        let Some(points) = results.get(&episode.id) else {
            continue;
        };

        for point in points {
            rows.push(FlashcardRow {
                key_point: format_key_point(point),
                podcast_title: episode.podcast_title.clone(),
                author: episode.author.clone(),
                date: episode.listened_at.clone(),
            });
        }
    }

    rows
}

/// Key point text with its quotes on subsequent lines.
fn format_key_point(point: &KeyPoint) -> String {
    if point.quotes.is_empty() {
        return point.text.clone();
    }

    let mut cell = point.text.clone();
    for quote in &point.quotes {
        cell.push('\n');
        cell.push_str("\u{201c}");
        cell.push_str(quote);
        cell.push_str("\u{201d}");
    }
    cell
}

/// Write the rows as a headerless 4-column CSV.
pub fn write_csv(path: &Path, rows: &[FlashcardRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    for row in rows {
        writer.write_record([
            row.key_point.as_str(),
            row.podcast_title.as_str(),
            row.author.as_str(),
            row.date.as_str(),
        ])?;
    }

    writer.flush()?;
    debug!("Wrote {} flashcard rows to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Episode;

    fn sample_rows() -> Vec<FlashcardRow> {
        vec![
            FlashcardRow {
                key_point: "Spaced repetition works.\n\u{201c}Retention collapses, without review.\u{201d}"
                    .to_string(),
                podcast_title: "Example Show".to_string(),
                author: "Jane Host".to_string(),
                date: "01.03.2024 08:30".to_string(),
            },
            FlashcardRow {
                key_point: "Sleep consolidates memory.".to_string(),
                podcast_title: "Example Show".to_string(),
                author: "Jane Host".to_string(),
                date: "01.03.2024 08:30".to_string(),
            },
        ]
    }

    #[test]
    fn test_csv_has_four_columns_and_no_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anki-flashcards.csv");

        write_csv(&path, &sample_rows()).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .unwrap();

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record.len(), 4);
        }
        // Commas and newlines inside the key-point cell survive quoting
        assert!(records[0].get(0).unwrap().contains("collapses, without"));
        assert!(records[0].get(0).unwrap().contains('\n'));
    }

    #[test]
    fn test_collect_rows_one_per_key_point() {
        let dir = tempfile::tempdir().unwrap();

        let mut catalog = Catalog::load(&dir.path().join("episodes.json")).unwrap();
        catalog.upsert(Episode {
            id: "ep-1".to_string(),
            episode_title: "First Episode".to_string(),
            podcast_title: "Example Show".to_string(),
            author: "Jane Host".to_string(),
            audio_url: "https://example.org/ep1.mp3".to_string(),
            listened_at: "01.03.2024 08:30".to_string(),
            audio_file: None,
            transcript_file: None,
        });

        let mut results = CardResults::load(&dir.path().join("card_results.json")).unwrap();
        results.insert(
            "ep-1",
            vec![
                KeyPoint {
                    text: "Point one.".to_string(),
                    quotes: vec!["A quote.".to_string()],
                },
                KeyPoint {
                    text: "Point two.".to_string(),
                    quotes: Vec::new(),
                },
            ],
        );

        let rows = collect_rows(&catalog, &results);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].key_point, "Point two.");
        assert_eq!(rows[0].date, "01.03.2024 08:30");
    }

    #[test]
    fn test_episodes_without_results_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = Catalog::load(&dir.path().join("episodes.json")).unwrap();
        catalog.upsert(Episode {
            id: "ep-unsummarized".to_string(),
            episode_title: "Pending".to_string(),
            podcast_title: "Example Show".to_string(),
            author: "Jane Host".to_string(),
            audio_url: "https://example.org/ep.mp3".to_string(),
            listened_at: "01.03.2024 08:30".to_string(),
            audio_file: None,
            transcript_file: None,
        });
        let results = CardResults::load(&dir.path().join("card_results.json")).unwrap();

        assert!(collect_rows(&catalog, &results).is_empty());
    }
}
