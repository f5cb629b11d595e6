use super::ValueError;

use std::convert::Infallible;
use std::path::PathBuf;

/// `true` or `false`, ignoring case and surrounding whitespace.
pub fn parse_bool(input: &str) -> Result<bool, ValueError> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ValueError::InvalidBoolean {
            input: trimmed.to_string(),
        })
    }
}

pub fn parse_char(input: &str) -> Result<char, ValueError> {
    let trimmed = input.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ValueError::InvalidCharacter {
            input: trimmed.to_string(),
        }),
    }
}

/// Text is taken verbatim, whitespace included.
pub fn parse_string(input: &str) -> Result<String, Infallible> {
    Ok(input.to_string())
}

pub fn parse_path(input: &str) -> Result<PathBuf, Infallible> {
    Ok(PathBuf::from(input.trim()))
}

pub fn parse_url(input: &str) -> Result<url::Url, url::ParseError> {
    url::Url::parse(input.trim())
}

pub fn parse_uuid(input: &str) -> Result<uuid::Uuid, uuid::Error> {
    uuid::Uuid::parse_str(input.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("true", true)]
    #[case("TRUE ", true)]
    #[case(" False", false)]
    fn test_parse_bool(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(parse_bool(input), Ok(expected));
    }

    #[rstest]
    #[case("maybe")]
    #[case("1")]
    #[case("yes")]
    fn test_bool_rejects(#[case] input: &str) {
        assert_eq!(
            parse_bool(input).unwrap_err().to_string(),
            format!("\"{input}\" is not parsable to a Boolean.")
        );
    }

    #[test]
    fn test_parse_char() {
        assert_eq!(parse_char(" x "), Ok('x'));
        assert_eq!(parse_char("é"), Ok('é'));
        assert_eq!(
            parse_char("xy").unwrap_err().to_string(),
            "\"xy\" must only contain a single character."
        );
        assert!(parse_char("  ").is_err());
    }

    #[test]
    fn test_string_is_verbatim() {
        assert_eq!(parse_string("  padded "), Ok("  padded ".to_string()));
    }

    #[test]
    fn test_url_and_uuid() {
        let url = parse_url(" https://example.com/a?b=c ").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
        assert!(parse_url("not a url").is_err());

        let id = parse_uuid("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(id.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert!(parse_uuid("67e55044").is_err());
    }

    #[test]
    fn test_path_is_trimmed() {
        assert_eq!(parse_path(" /tmp/x ").unwrap(), PathBuf::from("/tmp/x"));
    }
}
