//! Bidirectional parsers.
//!
//! A [`Parser`] bundles three pure functions over a token stream `I`:
//! - `parse`: stream -> (remaining stream, value)
//! - `print`: value -> canonical stream, `None` when the value is rejected
//! - `template`: value -> stream with values replaced by type placeholders
//!
//! Parsers hold no state, so one value can be reused for any number of
//! attempts and alternation can backtrack freely.

use std::rc::Rc;

use crate::error::{ParseError, ParseResult};
use crate::iso::PartialIso;

/// Associative concatenation with an identity.
pub trait Monoid: Sized {
    fn empty() -> Self;
    fn combine(self, other: Self) -> Self;
}

type ParseFn<I, O> = dyn Fn(&I) -> ParseResult<(I, O)>;
type PrintFn<I, O> = dyn Fn(&O) -> Option<I>;

pub struct Parser<I, O> {
    parse: Rc<ParseFn<I, O>>,
    print: Rc<PrintFn<I, O>>,
    template: Rc<PrintFn<I, O>>,
}

impl<I, O> Clone for Parser<I, O> {
    fn clone(&self) -> Self {
        Self {
            parse: Rc::clone(&self.parse),
            print: Rc::clone(&self.print),
            template: Rc::clone(&self.template),
        }
    }
}

impl<I: 'static, O: 'static> Parser<I, O> {
    pub fn new(
        parse: impl Fn(&I) -> ParseResult<(I, O)> + 'static,
        print: impl Fn(&O) -> Option<I> + 'static,
        template: impl Fn(&O) -> Option<I> + 'static,
    ) -> Self {
        Self {
            parse: Rc::new(parse),
            print: Rc::new(print),
            template: Rc::new(template),
        }
    }

    /// Accepts nothing and prints nothing. Identity for [`Parser::or`].
    pub fn empty() -> Self {
        Self::new(|_| Err(ParseError::NoMatch), |_| None, |_| None)
    }

    pub fn parse(&self, input: &I) -> ParseResult<(I, O)> {
        (self.parse)(input)
    }

    pub fn print(&self, value: &O) -> Option<I> {
        (self.print)(value)
    }

    pub fn template(&self, value: &O) -> Option<I> {
        (self.template)(value)
    }

    /// Ordered choice: the first side that parses wins.
    ///
    /// Printing mirrors parsing: the left printer is asked first and the
    /// right one only sees values the left rejects.
    pub fn or(self, other: Self) -> Self {
        let (lhs, rhs) = (self.clone(), other.clone());
        let (lhs_t, rhs_t) = (self.clone(), other.clone());
        Self::new(
            move |input| match self.parse(input) {
                Ok(found) => Ok(found),
                Err(err) => {
                    tracing::trace!(error = %err, "left alternative failed, trying right");
                    other.parse(input)
                }
            },
            move |value| lhs.print(value).or_else(|| rhs.print(value)),
            move |value| lhs_t.template(value).or_else(|| rhs_t.template(value)),
        )
    }

    /// Projects parsed values through `iso`; printing goes through `unapply`.
    pub fn map<B: 'static>(self, iso: PartialIso<O, B>) -> Parser<I, B> {
        let (p, t) = (self.clone(), self.clone());
        let (apply, print_iso) = (iso.clone(), iso.clone());
        Parser::new(
            move |input| {
                let (rest, value) = self.parse(input)?;
                let mapped = apply.apply(value).map_err(|source| ParseError::Invalid {
                    name: "value".to_string(),
                    source,
                })?;
                Ok((rest, mapped))
            },
            move |value| p.print(&print_iso.unapply(value).ok()?),
            move |value| t.template(&iso.unapply(value).ok()?),
        )
    }
}

impl<I: Monoid + 'static, O: 'static> Parser<I, O> {
    /// Runs `self`, then `other` on what `self` left over.
    pub fn and<B: 'static>(self, other: Parser<I, B>) -> Parser<I, (O, B)> {
        let (lp, rp) = (self.clone(), other.clone());
        let (lt, rt) = (self.clone(), other.clone());
        Parser::new(
            move |input| {
                let (rest, a) = self.parse(input)?;
                let (rest, b) = other.parse(&rest)?;
                Ok((rest, (a, b)))
            },
            move |(a, b)| Some(lp.print(a)?.combine(rp.print(b)?)),
            move |(a, b)| Some(lt.template(a)?.combine(rt.template(b)?)),
        )
    }
}

impl<I: Monoid + 'static> Parser<I, ()> {
    /// Like [`Parser::and`] but keeps only the right value.
    pub fn then<B: 'static>(self, other: Parser<I, B>) -> Parser<I, B> {
        let (lp, rp) = (self.clone(), other.clone());
        let (lt, rt) = (self.clone(), other.clone());
        Parser::new(
            move |input| {
                let (rest, ()) = self.parse(input)?;
                other.parse(&rest)
            },
            move |b| Some(lp.print(&())?.combine(rp.print(b)?)),
            move |b| Some(lt.template(&())?.combine(rt.template(b)?)),
        )
    }
}
