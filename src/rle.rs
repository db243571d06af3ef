use std::borrow::Cow;

use thiserror::Error;
use tracing::warn;

use crate::CellOffset;
use crate::parse_util;
use crate::parse_util::ParseError;
use crate::pattern::Pattern;
use crate::pattern::Seed;
use crate::rule_set::RuleError;
use crate::rule_set::RuleSet;

/// Widest and tallest pattern accepted from a file without a size line.
pub const MAX_EXTENT: i32 = 4096;

/// Everything in an RLE file besides the cells themselves.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RleHeader {
    pub name: Option<String>,
    pub author: Option<String>,
    pub comments: Vec<String>,

    /// Bounding box from the `x = .., y = ..` line
    pub size: Option<(usize, usize)>,

    pub rule: Option<RuleSet>,
}

#[derive(Debug, Error, PartialEq)]
pub enum RleError {
    #[error("Bad comment line: {0}")]
    CommentLine(#[from] RleCommentLineError),

    #[error("Bad size line: {0}")]
    HeaderLine(#[from] RleHeaderLineError),

    #[error("Bad cell data: {0}")]
    Encoding(#[from] RleEncodingError),

    #[error("Pattern has no live cells")]
    NoCells,

    #[error("Pattern has no usable name")]
    NoName,
}

#[derive(Debug, Error, PartialEq)]
pub enum RleCommentLineError {
    #[error("'#' is not followed by a comment type")]
    NoType,

    #[error("#N line without a name")]
    EmptyName,

    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),

    #[error("Unknown comment type '#{got}'")]
    InvalidType { got: char },
}

#[derive(Debug, Error, PartialEq)]
pub enum RleHeaderLineError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),
}

#[derive(Debug, Error, PartialEq)]
pub enum RleEncodingError {
    #[error("Unexpected end of input, expected '!'")]
    UnexpectedEof,

    #[error("Invalid run length: {0}")]
    RunLength(#[from] ParseError),

    #[error("Unrecognized character '{got}'")]
    UnrecognizedChar { got: char },

    #[error("Run count overflows the pattern coordinates")]
    Overflow,

    #[error("Live cell ({x}, {y}) lies outside of the {width}x{height} pattern")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
}

/// Parse the RLE file format, calling `f(x, y)` for every live cell. `x` grows to the right and
/// `y` downwards, starting from the top left corner of the pattern.
///
/// See: https://conwaylife.com/wiki/Run_Length_Encoded
pub fn read_rle<F>(mut bytes: &[u8], f: F) -> Result<RleHeader, RleError>
where
    F: FnMut(i32, i32),
{
    let mut header = RleHeader::default();

    // Comment lines come first, any number of them
    loop {
        bytes = parse_util::take_ws(bytes);

        let Some(rest) = read_line_comment(bytes, &mut header)? else {
            break;
        };

        bytes = rest;
    }

    if let Some((size, rule, rest)) = read_line_header(bytes)? {
        header.size = Some(size);

        if let Some(rule) = rule {
            if header.rule.is_some_and(|r| r != rule) {
                warn!("size line rule overrides the #r line");
            }

            header.rule = Some(rule);
        }

        bytes = rest;
    }

    read_encoding(bytes, header.size, f)?;

    Ok(header)
}

/// Parse an RLE file into a pattern centred on its bounding box.
///
/// The key is derived from the `#N` line if it has any letters or digits, otherwise from
/// `fallback`.
pub fn read_pattern(bytes: &[u8], fallback: &str) -> Result<(Pattern, RleHeader), RleError> {
    let mut cells: Vec<CellOffset> = Vec::new();
    let header = read_rle(bytes, |x, y| cells.push((x, y)))?;

    if cells.is_empty() {
        return Err(RleError::NoCells);
    }

    let (w, h) = match header.size {
        Some((w, h)) => (
            i32::try_from(w).unwrap_or(i32::MAX),
            i32::try_from(h).unwrap_or(i32::MAX),
        ),
        None => {
            let w = cells.iter().map(|c| c.0).max().unwrap_or(0) + 1;
            let h = cells.iter().map(|c| c.1).max().unwrap_or(0) + 1;
            (w, h)
        }
    };

    let (cx, cy) = (w / 2, h / 2);
    for c in &mut cells {
        *c = (c.0 - cx, c.1 - cy);
    }

    let (title, key) = match header.name.as_deref().map(|name| (name, slug(name))) {
        Some((name, key)) if !key.is_empty() => (name, key),
        _ => (fallback, slug(fallback)),
    };

    if key.is_empty() {
        return Err(RleError::NoName);
    }

    let pattern = Pattern {
        name: Cow::Owned(key),
        label: Cow::Owned(title.to_uppercase()),
        seed: Seed::Cells(Cow::Owned(cells)),
    };

    Ok((pattern, header))
}

/// `Gosper glider gun` -> `gosper_glider_gun`
fn slug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());

    for c in s.trim().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }

    out.trim_matches('_').to_string()
}

/// Attempt to parse a comment line into `header`, otherwise leaves `bytes` as-is.
fn read_line_comment<'a>(
    bytes: &'a [u8],
    header: &mut RleHeader,
) -> Result<Option<&'a [u8]>, RleCommentLineError> {
    let Ok(bytes) = parse_util::expect(b'#', bytes) else {
        return Ok(None);
    };

    let (Some(b), bytes) = parse_util::take_1(bytes) else {
        return Err(RleCommentLineError::NoType);
    };

    let (line, rest) = parse_util::take_line(bytes);
    let text = String::from_utf8_lossy(parse_util::take_ws(line))
        .trim_end()
        .to_string();

    match b {
        b'C' | b'c' => header.comments.push(text),

        // Name
        b'N' => {
            if text.is_empty() {
                return Err(RleCommentLineError::EmptyName);
            }

            if header.name.is_some() {
                warn!("more than one #N line, keeping the last");
            }

            header.name = Some(text);
        }

        // Author
        b'O' => header.author = Some(text),

        // Placement hints. Patterns are always centred, so these are dropped.
        b'P' | b'R' => {}

        // Pattern rules, e.g. `#r 23/3`
        b'r' => header.rule = Some(text.parse()?),

        b => return Err(RleCommentLineError::InvalidType { got: b as char }),
    }

    Ok(Some(rest))
}

type HeaderLine<'a> = ((usize, usize), Option<RuleSet>, &'a [u8]);

/// Attempt to parse a `x = m, y = n[, rule = ...]` line, otherwise leaves `bytes` as-is.
fn read_line_header(bytes: &[u8]) -> Result<Option<HeaderLine<'_>>, RleHeaderLineError> {
    if parse_util::peek_1(bytes) != Some(b'x') {
        return Ok(None);
    }

    let (line, rest) = parse_util::take_line(bytes);

    let line = read_assign(b"x", line)?;
    let (Some(x), line) = parse_util::take_until_fn(|b| b == b',', line) else {
        return Err(ParseError::Convert { str: String::new() }.into());
    };
    let x: usize = parse_util::convert(x)?;

    let line = parse_util::expect(b',', line)?;
    let line = read_assign(b"y", parse_util::take_blank(line))?;
    let (y, line) = parse_util::take_until_fn(|b| b == b',', line);
    let y: usize = parse_util::convert(y.unwrap_or_default())?;

    let rule = match parse_util::take_1(line) {
        (Some(b','), line) => {
            let line = read_assign(b"rule", parse_util::take_blank(line))?;
            let rule = String::from_utf8_lossy(line);

            Some(rule.trim().parse()?)
        }
        _ => None,
    };

    Ok(Some(((x, y), rule, rest)))
}

/// Parses `key =` and the blanks around it.
fn read_assign<'a>(key: &[u8], bytes: &'a [u8]) -> Result<&'a [u8], ParseError> {
    let bytes = parse_util::expect_slice(key, bytes)?;
    let bytes = parse_util::take_blank(bytes);
    let bytes = parse_util::expect(b'=', bytes)?;

    Ok(parse_util::take_blank(bytes))
}

/// Live cells must fall inside the size line's bounding box, or inside a `MAX_EXTENT` square when
/// there is no size line.
fn read_encoding<F>(
    mut bytes: &[u8],
    size: Option<(usize, usize)>,
    mut f: F,
) -> Result<(), RleEncodingError>
where
    F: FnMut(i32, i32),
{
    let (width, height) = match size {
        Some((w, h)) => (
            i32::try_from(w).unwrap_or(i32::MAX),
            i32::try_from(h).unwrap_or(i32::MAX),
        ),
        None => (MAX_EXTENT, MAX_EXTENT),
    };

    let advance = |c: i32, run: i32| c.checked_add(run).ok_or(RleEncodingError::Overflow);

    let (mut x, mut y) = (0, 0);

    loop {
        // Every tag may be preceded by a run count, and line breaks can appear anywhere
        let (count, rest) =
            parse_util::take_until_fn(|b| !b.is_ascii_digit(), parse_util::take_ws(bytes));
        let run: i32 = match count {
            Some(count) => parse_util::convert(count)?,
            None => 1,
        };

        let (tag, rest) = parse_util::take_1(parse_util::take_ws(rest));
        bytes = rest;

        match tag {
            None => return Err(RleEncodingError::UnexpectedEof),
            Some(b'!') => return Ok(()),

            // Dead cells
            Some(b'b' | b'.') => x = advance(x, run)?,

            // Live cells
            Some(b'o' | b'A') => {
                let end = advance(x, run)?;

                if end > width || y >= height {
                    return Err(RleEncodingError::OutOfBounds {
                        x: end - 1,
                        y,
                        width,
                        height,
                    });
                }

                for cx in x..end {
                    f(cx, y);
                }

                x = end;
            }

            // End of row, or several when counted
            Some(b'$') => {
                y = advance(y, run)?;
                x = 0;
            }

            Some(b) => return Err(RleEncodingError::UnrecognizedChar { got: b as char }),
        }
    }
}
