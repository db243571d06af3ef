//! Byte-slice combinators for the RLE reader. Each takes the input and returns what it consumed
//! along with the rest.

use std::str::FromStr;

use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Input ended where '{exp}' was expected")]
    UnexpectedEof { exp: char },

    #[error("Found '{got}' where '{exp}' was expected")]
    UnexpectedToken { exp: char, got: char },

    #[error("Found \"{got}\" where \"{exp}\" was expected")]
    UnexpectedSlice { exp: String, got: String },

    #[error("\"{str}\" is not a valid number")]
    Convert { str: String },
}

/// Drops leading ascii whitespace, line breaks included.
pub fn take_ws(bytes: &[u8]) -> &[u8] {
    let i = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());

    &bytes[i..]
}

/// Like `take_ws`, but never crosses a line break.
pub fn take_blank(bytes: &[u8]) -> &[u8] {
    let i = bytes
        .iter()
        .position(|&b| b != b' ' && b != b'\t')
        .unwrap_or(bytes.len());

    &bytes[i..]
}

/// Splits off the first byte, if any.
pub const fn take_1(bytes: &[u8]) -> (Option<u8>, &[u8]) {
    let [b, bytes @ ..] = bytes else {
        return (None, bytes);
    };

    (Some(*b), bytes)
}

/// First byte, without consuming it
pub fn peek_1(bytes: &[u8]) -> Option<u8> {
    bytes.first().copied()
}

/// Consumes exactly `b`, or fails.
pub fn expect(b: u8, bytes: &[u8]) -> ParseResult<&[u8]> {
    let (Some(a), rest) = take_1(bytes) else {
        return Err(ParseError::UnexpectedEof { exp: b as char });
    };

    if a != b {
        return Err(ParseError::UnexpectedToken {
            exp: b as char,
            got: a as char,
        });
    }

    Ok(rest)
}

/// Expects `bytes` to start with `bs`, ignoring ascii case.
pub fn expect_slice<'a>(bs: &[u8], bytes: &'a [u8]) -> ParseResult<&'a [u8]> {
    match bytes.get(..bs.len()) {
        Some(head) if head.eq_ignore_ascii_case(bs) => Ok(&bytes[bs.len()..]),
        _ => {
            let n = bs.len().min(bytes.len());

            Err(ParseError::UnexpectedSlice {
                exp: String::from_utf8_lossy(bs).to_string(),
                got: String::from_utf8_lossy(&bytes[..n]).to_string(),
            })
        }
    }
}

/// Advance the slice until `P` is satisfied (or the input ends), without consuming the byte that
/// satisfied it. Returns `None` if nothing was taken.
pub fn take_until_fn<P>(p: P, bytes: &[u8]) -> (Option<&[u8]>, &[u8])
where
    P: Fn(u8) -> bool,
{
    let i = bytes.iter().position(|&a| p(a)).unwrap_or(bytes.len());

    if i == 0 {
        (None, bytes)
    } else {
        let (res, rest) = bytes.split_at(i);

        (Some(res), rest)
    }
}

/// Take the rest of the current line, consuming the line break but not returning it. A trailing
/// `\r` is dropped as well.
pub fn take_line(bytes: &[u8]) -> (&[u8], &[u8]) {
    let (line, rest) = match bytes.iter().position(|&b| b == b'\n') {
        Some(i) => (&bytes[..i], &bytes[i + 1..]),
        None => (bytes, &bytes[bytes.len()..]),
    };

    let line = line.strip_suffix(b"\r").unwrap_or(line);

    (line, rest)
}

/// Parses the trimmed bytes as `T`.
pub fn convert<T: FromStr>(bytes: &[u8]) -> ParseResult<T> {
    let str = String::from_utf8_lossy(bytes);

    str.trim().parse::<T>().map_err(|_| ParseError::Convert {
        str: str.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::ParseError;

    #[test]
    fn take_ws_full_ws() {
        assert_eq!(super::take_ws(b"  \n\t"), b"");
    }

    #[test]
    fn take_blank_stops_at_newline() {
        assert_eq!(super::take_blank(b"  \nx"), b"\nx");
    }

    #[test]
    fn expect_reports_token() {
        assert_eq!(
            super::expect(b'x', b"y"),
            Err(ParseError::UnexpectedToken { exp: 'x', got: 'y' })
        );
        assert_eq!(
            super::expect(b'x', b""),
            Err(ParseError::UnexpectedEof { exp: 'x' })
        );
    }

    #[test]
    fn expect_slice_ignores_case() {
        assert_eq!(super::expect_slice(b"rule", b"RULE = b3"), Ok(b" = b3".as_slice()));
        assert!(super::expect_slice(b"rule", b"ru").is_err());
    }

    #[test]
    fn take_line_strips_crlf() {
        let (line, rest) = super::take_line(b"#N Glider\r\nbo$");

        assert_eq!(line, b"#N Glider");
        assert_eq!(rest, b"bo$");
    }

    #[test]
    fn take_until_digits() {
        let (n, rest) = super::take_until_fn(|b| !b.is_ascii_digit(), b"12o");

        assert_eq!(n, Some(b"12".as_slice()));
        assert_eq!(rest, b"o");
        assert_eq!(super::convert::<u32>(n.unwrap()), Ok(12));
    }
}
