//! GenBank feature location grammar.
//!
//! Handles `a..b`, single bases, `a^b` sites, fuzzy `<`/`>` ends, and any
//! nesting of `complement(...)`, `join(...)` and `order(...)`. Remote
//! references such as `J00194.1:100..202` are rejected.

use flank_core::feature::{Location, Strand};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, one_of},
    combinator::{all_consuming, map, map_res, opt},
    multi::separated_list1,
    sequence::{delimited, preceded, separated_pair, terminated},
    IResult,
};

use crate::ParseError;

/// Parts in the order the product is read, with a shared strand.
#[derive(Debug, Clone)]
struct Parts {
    ranges: Vec<(usize, usize)>,
    strand: Strand,
}

impl Parts {
    fn forward(start: usize, end: usize) -> Self {
        Self {
            ranges: vec![(start, end)],
            strand: Strand::Forward,
        }
    }

    fn complement(mut self) -> Self {
        self.ranges.reverse();
        self.strand = self.strand.flip();
        self
    }

    fn join(children: Vec<Parts>) -> Self {
        let strand = match children.first().map(|c| c.strand) {
            Some(first) if children.iter().all(|c| c.strand == first) => first,
            Some(_) => Strand::None,
            None => Strand::Forward,
        };
        Self {
            ranges: children.into_iter().flat_map(|c| c.ranges).collect(),
            strand,
        }
    }
}

fn position(input: &str) -> IResult<&str, usize> {
    preceded(opt(one_of("<>")), map_res(digit1, |d: &str| d.parse::<usize>()))(input)
}

fn span(input: &str) -> IResult<&str, Parts> {
    alt((
        // 1-based inclusive to 0-based half-open
        map(separated_pair(position, tag(".."), position), |(s, e)| {
            Parts::forward(s.saturating_sub(1), e)
        }),
        // site between two bases: zero-length
        map(separated_pair(position, char('^'), position), |(s, _)| {
            Parts::forward(s, s)
        }),
        map(position, |p| Parts::forward(p.saturating_sub(1), p)),
    ))(input)
}

fn complement(input: &str) -> IResult<&str, Parts> {
    map(
        delimited(tag("complement("), location, char(')')),
        Parts::complement,
    )(input)
}

fn join(input: &str) -> IResult<&str, Parts> {
    map(
        preceded(
            alt((tag("join("), tag("order("))),
            terminated(separated_list1(char(','), location), char(')')),
        ),
        Parts::join,
    )(input)
}

fn location(input: &str) -> IResult<&str, Parts> {
    alt((complement, join, span))(input)
}

/// Parse a location string into 0-based half-open ranges and a strand.
///
/// Reverse-strand ranges are returned in ascending genomic order, so
/// `complement(join(a,b))` and `join(complement(b),complement(a))` give the
/// same result.
pub fn parse_location(loc_str: &str) -> Result<(Location, Strand), ParseError> {
    let compact: String = loc_str.chars().filter(|c| !c.is_whitespace()).collect();

    let (_, mut parts) = all_consuming(location)(compact.as_str())
        .map_err(|_| ParseError::InvalidLocation(loc_str.trim().to_string()))?;

    if parts.strand == Strand::Reverse {
        parts.ranges.reverse();
    }

    let loc = match parts.ranges.as_slice() {
        [(start, end)] => Location::simple(*start, *end),
        _ => Location::Join {
            ranges: parts.ranges,
        },
    };
    Ok((loc, parts.strand))
}
