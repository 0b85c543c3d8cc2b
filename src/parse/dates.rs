use chrono::{
    DateTime, Datelike, Duration, Local, Months, NaiveDate, NaiveTime, TimeZone, Weekday,
};
use lazy_static::lazy_static;
use regex::Regex;

/// A date phrase recognized inside a log entry: the matched span and the
/// moment it resolves to. Ambiguous phrases resolve to the past, matching how
/// people log interactions after the fact ("Monday" on a Wednesday is two
/// days ago, not next week).
#[derive(Clone, Debug, PartialEq)]
pub struct DateMatch {
    pub text: String,
    pub start: usize,
    pub resolved: DateTime<Local>,
}

lazy_static! {
    static ref RELATIVE: Regex = Regex::new(
        r"(?i)\b(day before yesterday|last night|last week|last month|this morning|this afternoon|this evening|yesterday|tonight|today|now)\b"
    )
    .unwrap();
    static ref WEEKDAY: Regex = Regex::new(
        r"(?i)\b(?:(last|this|on)\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b"
    )
    .unwrap();
    static ref MONTH_DAY: Regex = Regex::new(
        r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)\.?\s+(\d{1,2})(?:st|nd|rd|th)?(?:,?\s+(\d{4}))?\b"
    )
    .unwrap();
    static ref ISO_DATE: Regex = Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap();
    static ref NUMERIC_DATE: Regex = Regex::new(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{2,4}))?\b").unwrap();
    static ref CLOCK_AMPM: Regex = Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b").unwrap();
    static ref CLOCK_24H: Regex = Regex::new(r"\b(\d{1,2}):(\d{2})\b").unwrap();
}

const NOON: u32 = 12;

struct Candidate {
    start: usize,
    end: usize,
    resolved: DateTime<Local>,
}

/// Scans text for the supported date/time phrases and returns the earliest
/// match by position (ties go to the longer span). Returns `None` when
/// nothing matches; never errors.
pub fn parse_date_phrase(text: &str, reference: DateTime<Local>) -> Option<DateMatch> {
    let mut candidates = Vec::new();

    collect_relative(text, reference, &mut candidates);
    collect_weekdays(text, reference, &mut candidates);
    collect_month_days(text, reference, &mut candidates);
    collect_iso_dates(text, reference, &mut candidates);
    collect_numeric_dates(text, reference, &mut candidates);
    collect_clock_times(text, reference, &mut candidates);

    candidates
        .into_iter()
        .min_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)))
        .map(|candidate| DateMatch {
            text: text[candidate.start..candidate.end].to_owned(),
            start: candidate.start,
            resolved: candidate.resolved,
        })
}

fn local_at(date: NaiveDate, hour: u32, minute: u32, fallback: DateTime<Local>) -> DateTime<Local> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default();
    Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .unwrap_or(fallback)
}

fn collect_relative(text: &str, reference: DateTime<Local>, out: &mut Vec<Candidate>) {
    for found in RELATIVE.find_iter(text) {
        let today = reference.date_naive();
        let resolved = match found.as_str().to_lowercase().as_str() {
            "now" => reference,
            "today" => local_at(today, NOON, 0, reference),
            "tonight" => local_at(today, 20, 0, reference),
            "this morning" => local_at(today, 9, 0, reference),
            "this afternoon" => local_at(today, 15, 0, reference),
            "this evening" => local_at(today, 19, 0, reference),
            "yesterday" => local_at(today - Duration::days(1), NOON, 0, reference),
            "last night" => local_at(today - Duration::days(1), 22, 0, reference),
            "day before yesterday" => local_at(today - Duration::days(2), NOON, 0, reference),
            "last week" => local_at(today - Duration::days(7), NOON, 0, reference),
            "last month" => {
                let date = today.checked_sub_months(Months::new(1)).unwrap_or(today);
                local_at(date, NOON, 0, reference)
            }
            _ => continue,
        };
        out.push(Candidate {
            start: found.start(),
            end: found.end(),
            resolved,
        });
    }
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    match name.to_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

fn collect_weekdays(text: &str, reference: DateTime<Local>, out: &mut Vec<Candidate>) {
    for captures in WEEKDAY.captures_iter(text) {
        let Some(full) = captures.get(0) else {
            continue;
        };
        let Some(day) = captures.get(2).and_then(|name| weekday_from_name(name.as_str())) else {
            continue;
        };

        let prefix = captures
            .get(1)
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_default();

        let today = reference.date_naive();
        let mut days_back = i64::from(
            (today.weekday().num_days_from_monday() + 7 - day.num_days_from_monday()) % 7,
        );
        // "last Monday" said on a Monday means a week ago, not today.
        if prefix == "last" && days_back == 0 {
            days_back = 7;
        }

        out.push(Candidate {
            start: full.start(),
            end: full.end(),
            resolved: local_at(today - Duration::days(days_back), NOON, 0, reference),
        });
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn collect_month_days(text: &str, reference: DateTime<Local>, out: &mut Vec<Candidate>) {
    for captures in MONTH_DAY.captures_iter(text) {
        let Some(full) = captures.get(0) else {
            continue;
        };
        let Some(month) = captures.get(1).and_then(|name| month_from_name(name.as_str())) else {
            continue;
        };
        let Some(day) = captures.get(2).and_then(|m| m.as_str().parse::<u32>().ok()) else {
            continue;
        };
        let year = captures.get(3).and_then(|m| m.as_str().parse::<i32>().ok());

        let today = reference.date_naive();
        let resolved_date = match year {
            Some(year) => NaiveDate::from_ymd_opt(year, month, day),
            None => {
                // Year-less dates ahead of the reference roll back a year.
                match NaiveDate::from_ymd_opt(today.year(), month, day) {
                    Some(date) if date > today => {
                        NaiveDate::from_ymd_opt(today.year() - 1, month, day)
                    }
                    other => other,
                }
            }
        };

        let Some(date) = resolved_date else {
            continue;
        };
        out.push(Candidate {
            start: full.start(),
            end: full.end(),
            resolved: local_at(date, NOON, 0, reference),
        });
    }
}

fn collect_iso_dates(text: &str, reference: DateTime<Local>, out: &mut Vec<Candidate>) {
    for captures in ISO_DATE.captures_iter(text) {
        let Some(full) = captures.get(0) else {
            continue;
        };
        let parts = (
            captures.get(1).and_then(|m| m.as_str().parse::<i32>().ok()),
            captures.get(2).and_then(|m| m.as_str().parse::<u32>().ok()),
            captures.get(3).and_then(|m| m.as_str().parse::<u32>().ok()),
        );
        let (Some(year), Some(month), Some(day)) = parts else {
            continue;
        };
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };
        out.push(Candidate {
            start: full.start(),
            end: full.end(),
            resolved: local_at(date, NOON, 0, reference),
        });
    }
}

fn collect_numeric_dates(text: &str, reference: DateTime<Local>, out: &mut Vec<Candidate>) {
    for captures in NUMERIC_DATE.captures_iter(text) {
        let Some(full) = captures.get(0) else {
            continue;
        };
        let parts = (
            captures.get(1).and_then(|m| m.as_str().parse::<u32>().ok()),
            captures.get(2).and_then(|m| m.as_str().parse::<u32>().ok()),
        );
        let (Some(month), Some(day)) = parts else {
            continue;
        };

        let today = reference.date_naive();
        let year = captures
            .get(3)
            .and_then(|m| m.as_str().parse::<i32>().ok())
            .map(|year| if year < 100 { year + 2000 } else { year });

        let resolved_date = match year {
            Some(year) => NaiveDate::from_ymd_opt(year, month, day),
            None => match NaiveDate::from_ymd_opt(today.year(), month, day) {
                Some(date) if date > today => NaiveDate::from_ymd_opt(today.year() - 1, month, day),
                other => other,
            },
        };

        let Some(date) = resolved_date else {
            continue;
        };
        out.push(Candidate {
            start: full.start(),
            end: full.end(),
            resolved: local_at(date, NOON, 0, reference),
        });
    }
}

fn clock_candidate(
    reference: DateTime<Local>,
    start: usize,
    end: usize,
    hour: u32,
    minute: u32,
) -> Option<Candidate> {
    if hour >= 24 || minute >= 60 {
        return None;
    }

    let today = reference.date_naive();
    let mut resolved = local_at(today, hour, minute, reference);
    // A standalone time later than the reference is read as yesterday.
    if resolved > reference {
        resolved = local_at(today - Duration::days(1), hour, minute, reference);
    }

    Some(Candidate {
        start,
        end,
        resolved,
    })
}

fn collect_clock_times(text: &str, reference: DateTime<Local>, out: &mut Vec<Candidate>) {
    for captures in CLOCK_AMPM.captures_iter(text) {
        let Some(full) = captures.get(0) else {
            continue;
        };
        let Some(raw_hour) = captures.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) else {
            continue;
        };
        if raw_hour == 0 || raw_hour > 12 {
            continue;
        }
        let minute = captures
            .get(2)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0);
        let meridiem = captures
            .get(3)
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_default();

        let hour = match (raw_hour, meridiem.as_str()) {
            (12, "am") => 0,
            (12, "pm") => 12,
            (hour, "pm") => hour + 12,
            (hour, _) => hour,
        };

        if let Some(candidate) = clock_candidate(reference, full.start(), full.end(), hour, minute)
        {
            out.push(candidate);
        }
    }

    for captures in CLOCK_24H.captures_iter(text) {
        let Some(full) = captures.get(0) else {
            continue;
        };
        let parts = (
            captures.get(1).and_then(|m| m.as_str().parse::<u32>().ok()),
            captures.get(2).and_then(|m| m.as_str().parse::<u32>().ok()),
        );
        let (Some(hour), Some(minute)) = parts else {
            continue;
        };
        if let Some(candidate) = clock_candidate(reference, full.start(), full.end(), hour, minute)
        {
            out.push(candidate);
        }
    }
}
