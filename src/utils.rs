// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rust_decimal::Decimal;

/// Required string argument, trimmed.
pub fn arg_str(sub: &clap::ArgMatches, name: &str) -> Result<String> {
    sub.get_one::<String>(name)
        .map(|s| s.trim().to_string())
        .ok_or_else(|| anyhow!("Missing required argument '--{}'", name))
}

/// Optional string argument, trimmed; blank values count as absent.
pub fn opt_str(sub: &clap::ArgMatches, name: &str) -> Option<String> {
    sub.get_one::<String>(name)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Money amounts entered by the user are never negative.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d.is_sign_negative() && !d.is_zero() {
        return Err(anyhow!("Amount must not be negative, got '{}'", s.trim()));
    }
    Ok(d)
}

pub fn parse_id(s: &str) -> Result<i64> {
    s.trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid id '{}'", s))
}

/// Reads an instant from RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC) or a bare
/// `YYYY-MM-DD` (midnight UTC).
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    parse_instant(s).ok_or_else(|| {
        anyhow!(
            "Invalid timestamp '{}', expected RFC 3339 or YYYY-MM-DD",
            s.trim()
        )
    })
}

/// Storage form of timestamps.
pub fn fmt_timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_instant_accepts_offsets_and_dates() {
        let a = parse_instant("2024-01-03T05:30:00+05:30").unwrap();
        assert_eq!(a, Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap());

        let b = parse_instant(" 2024-01-02 ").unwrap();
        assert_eq!(b, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());

        let c = parse_instant("2024-01-02 13:45:10").unwrap();
        assert_eq!(c, Utc.with_ymd_and_hms(2024, 1, 2, 13, 45, 10).unwrap());

        assert!(parse_instant("yesterday").is_none());
    }

    #[test]
    fn parse_amount_rejects_negative() {
        assert!(parse_amount("-1.00").is_err());
        assert!(parse_amount("abc").is_err());
        assert_eq!(parse_amount(" 12.50 ").unwrap().to_string(), "12.50");
    }

    #[test]
    fn timestamps_round_trip_through_storage_form() {
        let t = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(fmt_timestamp(&t), "2024-05-06T07:08:09Z");
        assert_eq!(parse_instant(&fmt_timestamp(&t)), Some(t));
    }
}
