//! German-locale parsing helpers shared by the statement parsers.

use chrono::NaiveDate;

/// Parse a German-formatted decimal: `"1.234,56"` -> `1234.56`,
/// `"-12,00"` -> `-12.0`. Currency suffixes are the caller's concern.
pub fn parse_german_decimal(s: &str) -> Option<f64> {
    let cleaned = s.trim().replace('.', "").replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Parse a German date like `"17.02.2021"`.
pub fn parse_german_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d.%m.%Y").ok()
}

fn month_number(token: &str) -> Option<u32> {
    let t = token.trim_end_matches('.');
    Some(match t {
        "Jan" | "Januar" | "January" => 1,
        "Feb" | "Februar" | "February" => 2,
        "Mär" | "Mrz" | "März" | "Mar" | "March" => 3,
        "Apr" | "April" => 4,
        "Mai" | "May" => 5,
        "Jun" | "Juni" | "June" => 6,
        "Jul" | "Juli" | "July" => 7,
        "Aug" | "August" => 8,
        "Sep" | "Sept" | "September" => 9,
        "Okt" | "Oktober" | "Oct" | "October" => 10,
        "Nov" | "November" => 11,
        "Dez" | "Dezember" | "Dec" | "December" => 12,
        _ => return t.parse::<u32>().ok().filter(|m| (1..=12).contains(m)),
    })
}

/// Parse a free-text date from three whitespace tokens, day before month:
/// `"02" "Jan." "2024"`. Month may be a German or English abbreviation or a
/// number; an ambiguous all-numeric pair is read day-first.
pub fn parse_free_date(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    let d: u32 = day.trim_end_matches('.').parse().ok()?;
    let y: i32 = year.parse().ok()?;
    let m = month_number(month)?;
    NaiveDate::from_ymd_opt(y, m, d).or_else(|| NaiveDate::from_ymd_opt(y, d, m))
}

// UTF-8 umlauts that went through a Windows-1252 decode upstream.
const MOJIBAKE: &[(&str, &str)] = &[
    ("Ã¤", "ä"),
    ("Ã¶", "ö"),
    ("Ã¼", "ü"),
    ("Ã„", "Ä"),
    ("Ã–", "Ö"),
    ("Ãœ", "Ü"),
    ("ÃŸ", "ß"),
];

/// Repair mis-decoded umlauts via literal substring replacement.
///
/// Some exports embed UTF-8 byte pairs inside an otherwise Windows-1252
/// file; decoding leaves `"Ãœbertrag"` where `"Übertrag"` is meant.
pub fn repair_mojibake(s: &str) -> String {
    let mut out = s.to_string();
    for (broken, fixed) in MOJIBAKE {
        if out.contains(broken) {
            out = out.replace(broken, fixed);
        }
    }
    out
}
