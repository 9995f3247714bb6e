use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const DATE: &str = "%Y-%m-%d";
const DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S";

/// Formats as date-only when the time of day is midnight, date-time otherwise.
pub(crate) fn format(value: &NaiveDateTime) -> String {
    if is_midnight(value) {
        value.format(DATE).to_string()
    } else {
        value.format(DATE_TIME).to_string()
    }
}

/// Serializes with [`format`], so bound parameters carry the same text as
/// inline literals.
pub(crate) fn serialize<S: serde::Serializer>(
    value: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(value))
}

fn is_midnight(value: &NaiveDateTime) -> bool {
    value.hour() == 0 && value.minute() == 0 && value.second() == 0
}

/// Parses the text forms a store hands back for date-time columns.
pub(crate) fn parse(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim().trim_end_matches('Z');

    for pattern in [DATE_TIME, "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(value) = NaiveDateTime::parse_from_str(text, pattern) {
            return Some(value);
        }
    }

    NaiveDate::parse_from_str(text, DATE)
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}
