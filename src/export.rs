//! CSV projections for the export page.
//!
//! Read-only: rows come straight from the store, no scheduler logic.

use std::io;

use crate::db::ProgressRow;
use crate::domain::SrsCard;

pub fn cards_csv(cards: &[SrsCard]) -> io::Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr
        .write_record([
            "front",
            "back",
            "interval",
            "easiness",
            "repetitions",
            "next_review",
            "last_review",
        ])
        .map_err(to_io)?;

    for card in cards {
        let interval = card.interval.to_string();
        let easiness = card.easiness.to_string();
        let repetitions = card.repetitions.to_string();
        let next_review = card.next_review.map(|d| d.to_string()).unwrap_or_default();
        let last_review = card.last_review.map(|t| t.to_rfc3339()).unwrap_or_default();

        wtr
            .write_record([
                card.front.as_str(),
                card.back.as_str(),
                interval.as_str(),
                easiness.as_str(),
                repetitions.as_str(),
                next_review.as_str(),
                last_review.as_str(),
            ])
            .map_err(to_io)?;
    }

    finish(wtr)
}

pub fn progress_csv(rows: &[ProgressRow]) -> io::Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr
        .write_record(["book", "lesson_id", "completed_at", "score"])
        .map_err(to_io)?;

    for row in rows {
        let lesson_id = row.lesson_id.to_string();
        let score = row.score.to_string();

        wtr
            .write_record([
                row.book_key.as_str(),
                lesson_id.as_str(),
                row.completed_at.as_str(),
                score.as_str(),
            ])
            .map_err(to_io)?;
    }

    finish(wtr)
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> io::Result<String> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| io::Error::other(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| io::Error::other(e.to_string()))
}

fn to_io(e: csv::Error) -> io::Error {
    io::Error::other(e.to_string())
}
