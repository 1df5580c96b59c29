//! Recurring runs driven by a cron expression

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use std::str::FromStr;
use std::time::Duration;

/// Convert a standard 5-field Unix cron expression to the 7-field format
/// expected by the `cron` crate.
///
/// 5-field format: minute hour day-of-month month day-of-week
/// 7-field format: second minute hour day-of-month month day-of-week year
fn to_extended_format(expression: &str) -> String {
    if expression.split_whitespace().count() == 5 {
        format!("0 {expression} *")
    } else {
        expression.to_string()
    }
}

/// A parsed recurring schedule
#[derive(Debug, Clone)]
pub struct RunSchedule {
    expression: String,
    schedule: cron::Schedule,
}

impl RunSchedule {
    /// Parse a 5-field (or extended 6/7-field) cron expression
    pub fn parse(expression: &str) -> Result<Self> {
        let schedule = cron::Schedule::from_str(&to_extended_format(expression)).map_err(|e| {
            Error::Schedule {
                expression: expression.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Self {
            expression: expression.to_string(),
            schedule,
        })
    }

    /// The expression as given
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Next occurrence strictly after `after`
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&after).next()
    }

    /// Time to wait from `now` until the next occurrence
    pub fn wait_from(&self, now: DateTime<Utc>) -> Option<Duration> {
        let next = self.next_after(now)?;
        Some((next - now).to_std().unwrap_or_default())
    }
}
