use std::sync::OnceLock;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use regex::Regex;

use super::ContactWindow;

const BUSINESS_START_HOUR: u32 = 9;
const ALIGNMENT_MINUTES: u32 = 30;

const DAY_PATTERN: &str =
    "monday|tuesday|wednesday|thursday|friday|saturday|sunday|mon|tues|tue|wed|thurs|thur|thu|fri|sat|sun";

/// One entry in the resolver's priority-ordered rule list.
///
/// Rules are plain matcher functions so the list stays open for extension:
/// callers can prepend or append their own without touching the built-ins.
#[derive(Clone, Copy)]
pub struct ScheduleRule {
    pub name: &'static str,
    pub apply: fn(NaiveDateTime, &str) -> Option<ContactWindow>,
}

/// The built-in rules, highest priority first.
pub fn standard_rules() -> Vec<ScheduleRule> {
    vec![
        ScheduleRule {
            name: "explicit availability",
            apply: explicit_availability,
        },
        ScheduleRule {
            name: "negative window",
            apply: negative_window,
        },
        ScheduleRule {
            name: "vague activity",
            apply: vague_activity,
        },
        ScheduleRule {
            name: "weekend receipt",
            apply: weekend_receipt,
        },
    ]
}

/// Lowercase, fold typographic apostrophes, collapse whitespace.
pub(crate) fn normalize_notes(raw: &str) -> String {
    raw.replace(['\u{2018}', '\u{2019}'], "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// "unavailable until tuesday 1:00 pm", "out until 3pm friday".
fn explicit_availability(now: NaiveDateTime, text: &str) -> Option<ContactWindow> {
    static DAY_FIRST: OnceLock<Regex> = OnceLock::new();
    static TIME_FIRST: OnceLock<Regex> = OnceLock::new();

    let day_first = DAY_FIRST.get_or_init(|| {
        Regex::new(&format!(
            r"\b(?:unavailable|not available|out|tied up|busy)\s+until\s+(?P<day>{DAY_PATTERN})\b(?:\s+(?P<hour>\d{{1,2}})(?::(?P<minute>\d{{2}}))?\s*(?P<ampm>am|pm)?)?"
        ))
        .expect("day-first availability pattern is valid")
    });
    let time_first = TIME_FIRST.get_or_init(|| {
        Regex::new(&format!(
            r"\buntil\s+(?P<hour>\d{{1,2}})(?::(?P<minute>\d{{2}}))?\s*(?P<ampm>am|pm)?\s+(?:on\s+)?(?P<day>{DAY_PATTERN})\b"
        ))
        .expect("time-first availability pattern is valid")
    });

    let captures = day_first.captures(text).or_else(|| time_first.captures(text))?;
    let cue = captures.get(0).map(|m| m.as_str().to_string())?;

    let day = weekday_from_name(captures.name("day")?.as_str())?;
    let hour_raw = captures
        .name("hour")
        .and_then(|m| m.as_str().parse::<u32>().ok());
    let minute = captures
        .name("minute")
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(0);
    let ampm = captures.name("ampm").map(|m| m.as_str());

    let hour = match hour_raw {
        Some(hour) => to_24_hour(hour, ampm)?,
        None => BUSINESS_START_HOUR,
    };
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;

    let date = next_occurrence_of(now.date(), day);
    let instant = align_forward(NaiveDateTime::new(date, time));

    Some(ContactWindow {
        earliest_contact: instant,
        reason: format!("explicit availability: \"{cue}\""),
    })
}

/// "don't call tomorrow morning", "no contact tomorrow", "next week".
fn negative_window(now: NaiveDateTime, text: &str) -> Option<ContactWindow> {
    static TOMORROW: OnceLock<Regex> = OnceLock::new();

    let tomorrow_re = TOMORROW.get_or_init(|| {
        Regex::new(
            r"\b(?:don't|do not|no)\s+(?:call|calls|contact|email)(?:\s+(?:me|us|him|her|them))?\s+tomorrow\b(?:\s+(?P<tod>morning|afternoon|evening))?",
        )
        .expect("tomorrow restriction pattern is valid")
    });

    if let Some(captures) = tomorrow_re.captures(text) {
        let cue = captures.get(0).map(|m| m.as_str().to_string())?;
        let tomorrow = now.date() + Duration::days(1);

        let earliest = match captures.name("tod").map(|m| m.as_str()) {
            // Mornings end at 1:00 PM; afternoons and evenings push to the
            // following business morning.
            Some("morning") => {
                if is_business_day(tomorrow) {
                    NaiveDateTime::new(tomorrow, NaiveTime::from_hms_opt(13, 0, 0)?)
                } else {
                    business_morning_on_or_after(tomorrow + Duration::days(1))
                }
            }
            _ => business_morning_on_or_after(tomorrow + Duration::days(1)),
        };

        return Some(ContactWindow {
            earliest_contact: earliest,
            reason: format!("negative window: \"{cue}\""),
        });
    }

    if text.contains("next week") {
        let earliest = NaiveDateTime::new(
            next_occurrence_of(now.date(), Weekday::Mon),
            business_morning(),
        );
        return Some(ContactWindow {
            earliest_contact: earliest,
            reason: "negative window: \"next week\"".to_string(),
        });
    }

    None
}

/// An event mention with no stated end time blocks the rest of the day.
fn vague_activity(now: NaiveDateTime, text: &str) -> Option<ContactWindow> {
    static ACTIVITY: OnceLock<Regex> = OnceLock::new();
    static REST_OF_DAY: OnceLock<Regex> = OnceLock::new();

    let activity_re = ACTIVITY.get_or_init(|| {
        Regex::new(
            r"\b(?:at|attending|heading to|going to)\s+[a-z' ]{0,40}?\b(?:game|recital|concert|show|wedding|funeral|graduation|event|dinner|appointment)\b",
        )
        .expect("activity pattern is valid")
    });
    let rest_of_day_re = REST_OF_DAY.get_or_init(|| {
        Regex::new(r"\b(?:this evening|tonight|rest of the day)\b")
            .expect("rest-of-day pattern is valid")
    });

    let cue = activity_re
        .find(text)
        .or_else(|| rest_of_day_re.find(text))
        .map(|m| m.as_str().to_string())?;

    Some(ContactWindow {
        earliest_contact: business_morning_on_or_after(now.date() + Duration::days(1)),
        reason: format!("vague activity through end of day: \"{cue}\""),
    })
}

/// Submissions landing on a weekend wait for Monday morning.
fn weekend_receipt(now: NaiveDateTime, _text: &str) -> Option<ContactWindow> {
    if is_business_day(now.date()) {
        return None;
    }

    Some(ContactWindow {
        earliest_contact: business_morning_on_or_after(now.date() + Duration::days(1)),
        reason: format!("weekend receipt: deferring from {} to Monday morning", now.date()),
    })
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    let day = match name {
        "monday" | "mon" => Weekday::Mon,
        "tuesday" | "tues" | "tue" => Weekday::Tue,
        "wednesday" | "wed" => Weekday::Wed,
        "thursday" | "thurs" | "thur" | "thu" => Weekday::Thu,
        "friday" | "fri" => Weekday::Fri,
        "saturday" | "sat" => Weekday::Sat,
        "sunday" | "sun" => Weekday::Sun,
        _ => return None,
    };
    Some(day)
}

fn to_24_hour(hour: u32, ampm: Option<&str>) -> Option<u32> {
    match ampm {
        Some("pm") if hour < 12 => Some(hour + 12),
        Some("am") if hour == 12 => Some(0),
        _ if hour < 24 => Some(hour),
        _ => None,
    }
}

/// Next occurrence of the named weekday strictly after `from`; a mention of
/// today's own day name means next week.
fn next_occurrence_of(from: NaiveDate, day: Weekday) -> NaiveDate {
    let current = i64::from(from.weekday().num_days_from_monday());
    let target = i64::from(day.num_days_from_monday());
    let mut ahead = target - current;
    if ahead <= 0 {
        ahead += 7;
    }
    from + Duration::days(ahead)
}

fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn business_morning() -> NaiveTime {
    NaiveTime::from_hms_opt(BUSINESS_START_HOUR, 0, 0).expect("9:00 is a valid time")
}

fn business_morning_on_or_after(date: NaiveDate) -> NaiveDateTime {
    let mut date = date;
    while !is_business_day(date) {
        date += Duration::days(1);
    }
    NaiveDateTime::new(date, business_morning())
}

/// Round forward to the next 30-minute boundary, leaving aligned instants as
/// they are.
fn align_forward(instant: NaiveDateTime) -> NaiveDateTime {
    let minute = instant.minute();
    let second = instant.second();
    if minute % ALIGNMENT_MINUTES == 0 && second == 0 {
        return instant;
    }

    let past_boundary = i64::from(minute % ALIGNMENT_MINUTES) * 60 + i64::from(second);
    instant + Duration::seconds(i64::from(ALIGNMENT_MINUTES) * 60 - past_boundary)
}
