//! Export formatters: pure functions from fetched rows to CSV or ICS
//! text. Nothing here touches a store.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::events::domain::Event;
use crate::jobs::domain::Job;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";
const ICS_FORMAT: &str = "%Y%m%dT%H%M%SZ";

pub fn events_csv(events: &[Event]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "Title",
        "Description",
        "Start Time",
        "End Time",
        "Category",
        "Link",
        "Created At",
    ])?;

    for event in events {
        writer.write_record(&[
            event.title.clone(),
            event.description.clone().unwrap_or_default(),
            event.start_time.format(DISPLAY_FORMAT).to_string(),
            event.end_time.format(DISPLAY_FORMAT).to_string(),
            event.category.label().to_string(),
            event.link.clone().unwrap_or_default(),
            event.created_at.format(DISPLAY_FORMAT).to_string(),
        ])?;
    }

    finish(writer)
}

pub fn jobs_csv(jobs: &[Job]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "Company",
        "Title",
        "Type",
        "Category",
        "Status",
        "CTC",
        "Stipend",
        "Location",
        "Apply By",
        "Min CGPA",
        "POC Name",
        "POC Email",
    ])?;

    for job in jobs {
        writer.write_record(&[
            job.company.clone(),
            job.title.clone(),
            job.job_type.label().to_string(),
            job.category.label().to_string(),
            job.status.label().to_string(),
            job.ctc.clone().unwrap_or_default(),
            job.stipend.clone().unwrap_or_default(),
            job.location.clone().unwrap_or_default(),
            job.apply_by
                .map(|when| when.format(DISPLAY_FORMAT).to_string())
                .unwrap_or_default(),
            job.min_cgpa.map(|cgpa| cgpa.to_string()).unwrap_or_default(),
            job.poc_name.clone().unwrap_or_default(),
            job.poc_email.clone().unwrap_or_default(),
        ])?;
    }

    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, csv::Error> {
    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Render the calendar as an RFC 5545 feed. Calendar clients are strict
/// about the property grammar, so text values go through [`ics_escape`].
pub fn events_ics(events: &[Event]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "BEGIN:VCALENDAR");
    let _ = writeln!(output, "VERSION:2.0");
    let _ = writeln!(output, "PRODID:-//placement-cell//calendar//EN");
    let _ = writeln!(output, "CALSCALE:GREGORIAN");

    for event in events {
        let _ = writeln!(output, "BEGIN:VEVENT");
        let _ = writeln!(output, "UID:{}", event.id.0);
        let _ = writeln!(output, "DTSTAMP:{}", ics_timestamp(event.created_at));
        let _ = writeln!(output, "DTSTART:{}", ics_timestamp(event.start_time));
        let _ = writeln!(output, "DTEND:{}", ics_timestamp(event.end_time));
        let _ = writeln!(output, "SUMMARY:{}", ics_escape(&event.title));
        if let Some(description) = &event.description {
            let _ = writeln!(output, "DESCRIPTION:{}", ics_escape(description));
        }
        if let Some(link) = &event.link {
            let _ = writeln!(output, "LOCATION:{}", ics_escape(link));
        }
        let _ = writeln!(output, "CATEGORIES:{}", ics_escape(event.category.label()));
        let _ = writeln!(output, "END:VEVENT");
    }

    let _ = writeln!(output, "END:VCALENDAR");
    output
}

fn ics_timestamp(when: DateTime<Utc>) -> String {
    when.format(ICS_FORMAT).to_string()
}

fn ics_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::domain::{EventCategory, EventId};
    use chrono::{Duration, TimeZone};

    fn event(title: &str, description: Option<&str>) -> Event {
        let start = Utc.with_ymd_and_hms(2026, 2, 3, 9, 30, 0).unwrap();
        Event {
            id: EventId("evt-000001".to_string()),
            title: title.to_string(),
            description: description.map(str::to_string),
            start_time: start,
            end_time: start + Duration::hours(2),
            category: EventCategory::Oa,
            link: Some("https://meet.example.edu/oa".to_string()),
            created_at: start - Duration::days(3),
        }
    }

    #[test]
    fn events_csv_includes_header_and_formatted_times() {
        let csv = events_csv(&[event("Acme OA", None)]).expect("csv renders");
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Title,Description,Start Time,End Time,Category,Link,Created At")
        );
        let row = lines.next().expect("one data row");
        assert!(row.starts_with("Acme OA,,2026-02-03 09:30,2026-02-03 11:30,Online Assessment"));
    }

    #[test]
    fn ics_feed_wraps_events_in_a_calendar() {
        let feed = events_ics(&[event("Acme OA", Some("Bring college ID"))]);
        assert!(feed.starts_with("BEGIN:VCALENDAR"));
        assert!(feed.trim_end().ends_with("END:VCALENDAR"));
        assert!(feed.contains("DTSTART:20260203T093000Z"));
        assert!(feed.contains("SUMMARY:Acme OA"));
        assert!(feed.contains("DESCRIPTION:Bring college ID"));
    }

    #[test]
    fn ics_escapes_reserved_characters() {
        let feed = events_ics(&[event("Drive; phase 1, onsite", None)]);
        assert!(feed.contains("SUMMARY:Drive\\; phase 1\\, onsite"));
    }
}
