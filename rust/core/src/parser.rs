// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SinusX line grammar using nom
//!
//! Every line is classified by its leading marker. Tokens borrow from the
//! input line; nothing is copied until the reader keeps a value.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, space1},
    combinator::{eof, peek, value},
    sequence::terminated,
    IResult,
};
use smallvec::SmallVec;

/// Whitespace-separated fields of one line
pub type Tokens<'a> = SmallVec<[&'a str; 4]>;

/// One classified input line
#[derive(Debug, Clone, PartialEq)]
pub enum Line<'a> {
    /// Empty or whitespace only
    Blank,
    /// `C <text>`
    Comment(&'a str),
    /// `B <type> ...`: fields after the marker word
    BlockHeader(Tokens<'a>),
    /// `CN <name>`: raw remainder, spaces preserved
    Name(&'a str),
    /// `CP ...`: fields after the marker word
    Descriptor(Tokens<'a>),
    /// Anything else, usually `<x> <y> <z> <key>`
    Record(Tokens<'a>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Name,
    Descriptor,
    Comment,
    Block,
}

/// Recognise the line marker. `CN`/`CP` win over the comment marker, which
/// must be a lone `C` or `C` followed by whitespace.
fn marker(input: &str) -> IResult<&str, Marker> {
    alt((
        value(Marker::Name, tag("CN")),
        value(Marker::Descriptor, tag("CP")),
        value(
            Marker::Comment,
            terminated(char('C'), peek(alt((space1, eof)))),
        ),
        value(Marker::Block, char('B')),
    ))(input)
}

/// Split a line on ASCII whitespace
#[inline]
pub fn tokenize(line: &str) -> Tokens<'_> {
    line.split_ascii_whitespace().collect()
}

/// Fields of `line` after its first word
#[inline]
fn tail_tokens(line: &str) -> Tokens<'_> {
    line.split_ascii_whitespace().skip(1).collect()
}

/// Classify a single line (without its line terminator)
pub fn classify_line(line: &str) -> Line<'_> {
    let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
    if line.trim().is_empty() {
        return Line::Blank;
    }

    match marker(line) {
        Ok((rest, Marker::Comment)) => Line::Comment(rest.trim_start()),
        Ok((_, Marker::Block)) => Line::BlockHeader(tail_tokens(line)),
        Ok((rest, Marker::Name)) => Line::Name(strip_separator(rest)),
        Ok((_, Marker::Descriptor)) => Line::Descriptor(tail_tokens(line)),
        Err(_) => Line::Record(tokenize(line)),
    }
}

/// Drop the single separator character following a `CN` marker
#[inline]
fn strip_separator(rest: &str) -> &str {
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() => chars.as_str(),
        _ => rest,
    }
}
