//! Recurring transaction schedules
//!
//! Month-based frequencies are pinned to the rule's anchor day. When a month
//! is too short the date is clamped to its last day, and the next step goes
//! back to the anchor, so a rule created on the 31st runs Jan 31, Feb 28,
//! Mar 31 rather than drifting to the 28th forever.

use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::error::{Error, Result};
use crate::models::{Frequency, RecurringTransaction};

/// Default cap on occurrences materialized in one catch-up run
pub const DEFAULT_MAX_CATCH_UP: usize = 366;

/// Date of the occurrence after `date`
pub fn next_occurrence(date: NaiveDate, frequency: Frequency, anchor_day: u32) -> Result<NaiveDate> {
    let next = match frequency {
        Frequency::Daily => date.checked_add_signed(Duration::days(1)),
        Frequency::Weekly => date.checked_add_signed(Duration::weeks(1)),
        Frequency::Biweekly => date.checked_add_signed(Duration::weeks(2)),
        Frequency::Monthly => add_anchored_months(date, 1, anchor_day),
        Frequency::Quarterly => add_anchored_months(date, 3, anchor_day),
        Frequency::Yearly => add_anchored_months(date, 12, anchor_day),
    };
    next.ok_or_else(|| Error::InvalidData(format!("Date overflow after {}", date)))
}

fn add_anchored_months(date: NaiveDate, months: u32, anchor_day: u32) -> Option<NaiveDate> {
    let first = date.with_day(1)?.checked_add_months(Months::new(months))?;
    let day = anchor_day.clamp(1, 31).min(days_in_month(first.year(), first.month())?);
    first.with_day(day)
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// Occurrences of `rule` that are due on or before `today`, plus the date the
/// rule should advance to. At most `max` occurrences are returned; anything
/// beyond that stays due for the next run.
pub fn due_dates(
    rule: &RecurringTransaction,
    today: NaiveDate,
    max: usize,
) -> Result<(Vec<NaiveDate>, NaiveDate)> {
    let mut dates = Vec::new();
    let mut next = rule.next_date;

    if !rule.active {
        return Ok((dates, next));
    }

    while next <= today && dates.len() < max {
        dates.push(next);
        next = next_occurrence(next, rule.frequency, rule.anchor_day)?;
    }

    Ok((dates, next))
}
