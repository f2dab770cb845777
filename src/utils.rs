// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::InputError;
use crate::models::Currency;

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Parse a user-supplied amount. Non-numeric and zero amounts are rejected.
pub fn parse_amount(s: &str) -> Result<Decimal, InputError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(InputError::MissingAmount);
    }
    let d = s
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|_| InputError::InvalidAmount(s.to_string()))?;
    if d.is_zero() {
        return Err(InputError::ZeroAmount);
    }
    Ok(d)
}

/// Positive amounts are spending entered without a sign.
pub fn as_spending(amount: Decimal) -> Decimal {
    if amount > Decimal::ZERO { -amount } else { amount }
}

/// Round half away from zero to `dp` places.
pub fn round_half_up(d: Decimal, dp: u32) -> Decimal {
    d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Two-decimal rendering used in messages and tables.
pub fn fmt2(d: Decimal) -> String {
    format!("{:.2}", round_half_up(d, 2))
}

/// Signed amount with the currency symbol; unknown codes use the dollar sign.
pub fn format_currency(amount: Decimal, code: &str) -> String {
    let sign = if amount < Decimal::ZERO { "-" } else { "+" };
    let symbol = code.parse::<Currency>().unwrap_or_default().symbol();
    format!("{}{}{}", sign, symbol, fmt2(amount.abs()))
}

pub fn now_iso() -> String {
    iso(Utc::now())
}

pub fn iso(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Fresh unique id of the form `<prefix>_<epoch-millis>_<hex>`.
pub fn new_id(prefix: &str) -> String {
    format!(
        "{}_{}_{:x}",
        prefix,
        Utc::now().timestamp_millis(),
        rand::random::<u64>()
    )
}

/// Interpret a stored timestamp in `tz`. Date-only values are UTC midnight,
/// offset-less date-times are local to `tz`.
pub fn timestamp_in<Tz: TimeZone>(s: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(tz));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return tz.from_local_datetime(&naive).earliest();
        }
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight).with_timezone(tz))
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
        // If v is an array, stream each element; else stream single line
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
