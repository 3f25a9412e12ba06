//! Parsers for comma separated number lists such as `10,20` or `255,128,0`.

use anyhow::{bail, Result};

use crate::renderer::color::Color;

/// All digits, optionally led by a single minus sign. A lone `-` counts
/// and reads as zero.
fn is_num(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    (token == "-" || !digits.is_empty()) && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Split `input` on commas into exactly `count` integers.
pub fn parse_num_array(input: &str, count: usize) -> Result<Vec<i64>> {
    let values = input
        .split(',')
        .filter(|token| !token.is_empty())
        .map(|token| -> Result<i64> {
            if !is_num(token) {
                bail!("'{}' is not a number", token);
            }
            if token == "-" {
                return Ok(0);
            }
            Ok(token.parse::<i64>()?)
        })
        .collect::<Result<Vec<_>>>()?;

    if values.len() != count {
        bail!("expected {} comma separated numbers, got {}", count, values.len());
    }
    Ok(values)
}

/// `x,y` with both components non-negative.
pub fn parse_point(input: &str) -> Result<(u16, u16)> {
    let nums = parse_num_array(input, 2)?;
    match (u16::try_from(nums[0]), u16::try_from(nums[1])) {
        (Ok(x), Ok(y)) => Ok((x, y)),
        _ => bail!("'{}' is out of range", input),
    }
}

/// `r,g,b` with every channel in 0..=255.
pub fn parse_color(input: &str) -> Result<Color> {
    let nums = parse_num_array(input, 3)?;
    match (u8::try_from(nums[0]), u8::try_from(nums[1]), u8::try_from(nums[2])) {
        (Ok(r), Ok(g), Ok(b)) => Ok(Color::rgb(r, g, b)),
        _ => bail!("'{}' is not a color, channels must be 0-255", input),
    }
}

/// clap value parser for `x,y` style arguments.
pub fn point_arg(input: &str) -> Result<(u16, u16), String> {
    parse_point(input).map_err(|e| e.to_string())
}

/// clap value parser for `r,g,b` arguments.
pub fn color_arg(input: &str) -> Result<Color, String> {
    parse_color(input).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_num() {
        assert!(is_num("42"));
        assert!(is_num("-3"));
        assert!(!is_num(""));
        assert!(is_num("-"));
        assert!(!is_num("--"));
        assert!(!is_num("4-2"));
        assert!(!is_num("+4"));
        assert!(!is_num(" 4"));
    }

    #[test]
    fn test_parse_num_array_counts() {
        assert_eq!(parse_num_array("1,2", 2).unwrap(), vec![1, 2]);
        assert_eq!(parse_num_array("-1,20,300", 3).unwrap(), vec![-1, 20, 300]);
        assert!(parse_num_array("1,2,3", 2).is_err());
        assert!(parse_num_array("1", 2).is_err());
        assert!(parse_num_array("1,a", 2).is_err());
        // empty tokens are skipped like strtok does
        assert_eq!(parse_num_array("1,,2", 2).unwrap(), vec![1, 2]);
        assert_eq!(parse_num_array("-,5", 2).unwrap(), vec![0, 5]);
    }

    #[test]
    fn test_parse_point_range() {
        assert_eq!(parse_point("3,4").unwrap(), (3, 4));
        assert!(parse_point("-1,4").is_err());
        assert!(parse_point("70000,4").is_err());
        assert_eq!(parse_point("-,4").unwrap(), (0, 4));
    }

    #[test]
    fn test_parse_color_range() {
        assert_eq!(parse_color("255,128,0").unwrap(), Color::rgb(255, 128, 0));
        assert!(parse_color("256,0,0").is_err());
        assert!(parse_color("0,0").is_err());
        assert!(color_arg("1,2,x").is_err());
    }
}
