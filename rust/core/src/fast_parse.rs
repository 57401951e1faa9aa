// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Numeric token parsing and formatting
//!
//! SinusX numbers are whitespace-delimited tokens, written with an explicit
//! sign. Parsing goes straight from the token bytes through fast-float and
//! lexical-core, skipping the std `FromStr` machinery.

/// Fractional digits written for every coordinate
pub const COORDINATE_PRECISION: usize = 12;

/// Drop one explicit `+`, refusing doubled signs like `+-1`
#[inline]
fn strip_plus(token: &str) -> Option<&[u8]> {
    let bytes = token.as_bytes();
    match bytes.first()? {
        b'+' => match bytes.get(1) {
            Some(b'+') | Some(b'-') | None => None,
            Some(_) => Some(&bytes[1..]),
        },
        _ => Some(bytes),
    }
}

/// Parse a float token (`+12.5`, `-1.0E+03`, `7`); the whole token must be consumed
#[inline]
pub fn parse_f64(token: &str) -> Option<f64> {
    let bytes = strip_plus(token)?;
    match fast_float::parse::<f64, _>(bytes) {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}

/// Parse an integer token (`0`, `+1`, `-3`)
#[inline]
pub fn parse_int(token: &str) -> Option<i64> {
    let bytes = strip_plus(token)?;
    lexical_core::parse::<i64>(bytes).ok()
}

/// Parse exactly three coordinates
#[inline]
pub fn parse_xyz(x: &str, y: &str, z: &str) -> Option<[f64; 3]> {
    Some([parse_f64(x)?, parse_f64(y)?, parse_f64(z)?])
}

/// Format a coordinate in fixed notation with an explicit sign
///
/// `-0.0` is normalised so it is written as `+0.000000000000`.
#[inline]
pub fn format_coordinate(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:+.*}", COORDINATE_PRECISION, value)
}
