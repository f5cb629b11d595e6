use super::ValueError;
use crate::core::descriptor::short_type_name;

use std::num::{IntErrorKind, ParseFloatError, ParseIntError};
use std::str::FromStr;

fn type_name<T>() -> String {
    short_type_name(std::any::type_name::<T>())
}

/// Parses a trimmed integer, telling malformed input from overflow.
pub fn parse_integer<T>(input: &str) -> Result<T, ValueError>
where
    T: FromStr<Err = ParseIntError>,
{
    let trimmed = input.trim();
    trimmed.parse::<T>().map_err(|error| match error.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ValueError::OutOfRange {
            input: trimmed.to_string(),
            type_name: type_name::<T>(),
        },
        _ => ValueError::InvalidNumber {
            input: trimmed.to_string(),
            type_name: type_name::<T>(),
        },
    })
}

pub fn parse_float<T>(input: &str) -> Result<T, ValueError>
where
    T: FromStr<Err = ParseFloatError>,
{
    let trimmed = input.trim();
    trimmed.parse::<T>().map_err(|_| ValueError::InvalidNumber {
        input: trimmed.to_string(),
        type_name: type_name::<T>(),
    })
}

/// Any JSON number: integers keep their exact value, everything else is `f64`.
pub fn parse_number(input: &str) -> Result<serde_json::Number, ValueError> {
    let trimmed = input.trim();
    serde_json::Number::from_str(trimmed).map_err(|_| ValueError::InvalidNumber {
        input: trimmed.to_string(),
        type_name: "Number".to_string(),
    })
}
