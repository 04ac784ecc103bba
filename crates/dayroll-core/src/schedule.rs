//! Calendar math for the daily job.
//!
//! "Today" and the daily trigger are both computed in the configured
//! reference time zone, never the host zone.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Current calendar date in the reference zone.
pub fn today(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// First instant strictly after `after` at which the wall clock in `tz`
/// reads `hour:00`.
///
/// DST policy: a wall-clock time erased by a spring-forward gap fires at
/// the first valid minute after the gap; an ambiguous time during a
/// fall-back fires at its earlier occurrence. The job never fires twice
/// for one calendar day.
pub fn next_occurrence(after: DateTime<Utc>, hour: u32, tz: Tz) -> DateTime<Utc> {
    let mut date = after.with_timezone(&tz).date_naive();
    loop {
        if let Some(fire) = resolve_local(date, hour, tz) {
            if fire > after {
                return fire;
            }
        }
        date = date.succ_opt().expect("calendar overflow");
    }
}

fn resolve_local(date: NaiveDate, hour: u32, tz: Tz) -> Option<DateTime<Utc>> {
    let mut naive = date.and_hms_opt(hour, 0, 0)?;
    // Scan forward past a DST gap one minute at a time; two hours covers
    // every real-world offset change.
    for _ in 0..=120 {
        match tz.from_local_datetime(&naive) {
            LocalResult::Single(t) => return Some(t.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => return Some(earliest.with_timezone(&Utc)),
            LocalResult::None => naive += Duration::minutes(1),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use chrono_tz::Europe::Sofia;

    fn sofia_utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Sofia.with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn fires_today_when_hour_still_ahead() {
        let after = sofia_utc(2026, 6, 10, 8, 30);
        let fire = next_occurrence(after, 10, Sofia).with_timezone(&Sofia);
        assert_eq!(fire.date_naive(), NaiveDate::from_ymd_opt(2026, 6, 10).unwrap());
        assert_eq!((fire.hour(), fire.minute()), (10, 0));
    }

    #[test]
    fn fires_tomorrow_when_hour_already_passed() {
        let after = sofia_utc(2026, 6, 10, 10, 0);
        let fire = next_occurrence(after, 10, Sofia).with_timezone(&Sofia);
        assert_eq!(fire.date_naive(), NaiveDate::from_ymd_opt(2026, 6, 11).unwrap());
        assert_eq!(fire.hour(), 10);
    }

    #[test]
    fn spring_forward_gap_fires_after_the_gap() {
        // Sofia skips 03:00-03:59 on 2026-03-29.
        let after = sofia_utc(2026, 3, 29, 1, 0);
        let fire = next_occurrence(after, 3, Sofia).with_timezone(&Sofia);
        assert_eq!(fire.date_naive(), NaiveDate::from_ymd_opt(2026, 3, 29).unwrap());
        assert_eq!(fire.hour(), 4);
    }

    #[test]
    fn fall_back_ambiguity_fires_once_at_earlier_occurrence() {
        // 03:00 happens twice in Sofia on 2026-10-25; the earlier one is
        // still on summer time, i.e. 00:00 UTC.
        let after = sofia_utc(2026, 10, 25, 1, 0);
        let fire = next_occurrence(after, 3, Sofia);
        assert_eq!(
            fire,
            Utc.with_ymd_and_hms(2026, 10, 25, 0, 0, 0).unwrap()
        );
        // The follow-up occurrence is on the next day, not the second
        // 03:00 of the same day.
        let next = next_occurrence(fire, 3, Sofia).with_timezone(&Sofia);
        assert_eq!(next.date_naive(), NaiveDate::from_ymd_opt(2026, 10, 26).unwrap());
    }
}
