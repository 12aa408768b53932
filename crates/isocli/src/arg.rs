//! Value-taking arguments: named (`--name value`), positional and variadic.
//!
//! An [`Arg`] is a builder. It becomes a [`Cli`] through one of four
//! finishers, which decide the shape of the parsed value:
//!
//! | finisher       | value       | tokens                           |
//! |----------------|-------------|----------------------------------|
//! | `single()`     | `A`         | `--name v` or one positional     |
//! | `optional()`   | `Option<A>` | `--name v`, or nothing           |
//! | `repeated()`   | `Vec<A>`    | `--name v1 --name v2 ..`         |
//! | `variadic()`   | `Vec<A>`    | every remaining token            |
//!
//! A named argument whose name is present but whose value is missing or does
//! not convert fails the parse, whatever the finisher. Only absence falls back
//! to the declared default.

use std::rc::Rc;

use crate::arguments::CommandLineArguments;
use crate::cli::Cli;
use crate::error::{ParseError, ParseResult};
use crate::iso::PartialIso;
use crate::parser::{Monoid, Parser};
use crate::template::{CliTemplate, active_template};
use crate::value::ArgValue;

pub struct Arg<A> {
    long: Option<String>,
    short: Option<String>,
    iso: PartialIso<String, A>,
    type_name: String,
    description: String,
    default: Option<A>,
    list_default: Option<Vec<A>>,
    examples: Vec<A>,
}

/// A named argument, `--long value`.
pub fn arg<A: ArgValue>(long: impl Into<String>) -> Arg<A> {
    Arg::with_iso(Some(long.into()), PartialIso::lossless(), A::TYPE_NAME)
}

/// An unnamed argument matched by position: always the first token left.
pub fn positional<A: ArgValue>() -> Arg<A> {
    Arg::with_iso(None, PartialIso::lossless(), A::TYPE_NAME)
}

/// Every remaining token, converted as one list.
pub fn var_arg<A: ArgValue>(description: impl Into<String>, example: Vec<A>) -> Cli<Vec<A>> {
    positional::<A>()
        .description(description)
        .examples(example)
        .variadic()
}

impl<A: Clone + 'static> Arg<A> {
    /// An argument converted by a custom iso. `type_name` appears in help.
    pub fn with_iso(
        long: Option<String>,
        iso: PartialIso<String, A>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            long,
            short: None,
            iso,
            type_name: type_name.into(),
            description: String::new(),
            default: None,
            list_default: None,
            examples: Vec::new(),
        }
    }

    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short = Some(short.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Overrides the type name shown in help and templates.
    pub fn value_name(mut self, name: impl Into<String>) -> Self {
        self.type_name = name.into();
        self
    }

    /// Value used when the argument is absent.
    pub fn default_value(mut self, value: A) -> Self {
        self.default = Some(value);
        self
    }

    /// Whole-list default for `repeated()` and `variadic()`. An empty list
    /// makes a repeated argument zero-or-more.
    pub fn default_values(mut self, values: impl IntoIterator<Item = A>) -> Self {
        self.list_default = Some(values.into_iter().collect());
        self
    }

    pub fn example(mut self, value: A) -> Self {
        self.examples.push(value);
        self
    }

    pub fn examples(mut self, values: impl IntoIterator<Item = A>) -> Self {
        self.examples.extend(values);
        self
    }

    fn list_default(&self) -> Option<Vec<A>> {
        self.list_default
            .clone()
            .or_else(|| self.default.clone().map(|d| vec![d]))
    }

    fn is_named(&self) -> bool {
        self.long.is_some() || self.short.is_some()
    }

    fn names(&self, template: &dyn CliTemplate) -> Names {
        let long = self.long.as_deref().map(|l| template.long_arg(l));
        let short = self.short.as_deref().map(|s| template.short_arg(s));
        Names {
            display: long
                .clone()
                .or_else(|| short.clone())
                .unwrap_or_else(|| format!("<{}>", self.type_name)),
            printed: long.clone().or_else(|| short.clone()),
            matchers: long.into_iter().chain(short).collect(),
        }
    }

    fn usage_line(&self, template: &dyn CliTemplate, type_name: &str, description: &str) -> String {
        template.arg_usage(
            self.long.as_deref(),
            self.short.as_deref(),
            type_name,
            description,
        )
    }

    /// Exactly one value: `--name v`, or the head token when unnamed.
    pub fn single(self) -> Cli<A> {
        let template = active_template();
        let names = Rc::new(self.names(template.as_ref()));
        let line = self.usage_line(template.as_ref(), &self.type_name, &self.description);
        let (iso, unapply_check) = (self.iso.clone(), self.iso.clone());
        let named = self.is_named();

        let parser = Parser::new(
            {
                let (names, iso, default) = (Rc::clone(&names), iso.clone(), self.default.clone());
                move |input: &CommandLineArguments| {
                    let found = if named {
                        take_named(input, &names, &iso)?
                    } else {
                        take_head(input, &names, &iso)?
                    };
                    match (found, &default) {
                        (Some(found), _) => Ok(found),
                        (None, Some(default)) => Ok((input.clone(), default.clone())),
                        (None, None) if named => Err(ParseError::Missing(names.display.clone())),
                        (None, None) => Err(ParseError::EndOfInput),
                    }
                }
            },
            {
                let (names, iso) = (Rc::clone(&names), iso.clone());
                move |value: &A| Some(names.tokens(iso.unapply(value).ok()?))
            },
            {
                let (names, type_name) = (Rc::clone(&names), self.type_name.clone());
                move |value: &A| {
                    iso.unapply(value).ok()?;
                    Some(names.tokens(type_name.clone()))
                }
            },
        );

        Cli::new(
            parser,
            move |value: &A| match unapply_check.unapply(value) {
                Ok(_) => line.clone(),
                Err(_) => String::new(),
            },
            self.examples,
        )
    }

    /// Zero or one value. Absence yields the default, or `None`.
    ///
    /// Unnamed, a head token that does not convert counts as absent and is
    /// left in the stream.
    pub fn optional(self) -> Cli<Option<A>> {
        let template = active_template();
        let names = Rc::new(self.names(template.as_ref()));
        let line = self.usage_line(
            template.as_ref(),
            &self.type_name,
            &format!("{} (optional)", self.description),
        );
        let (iso, unapply_check) = (self.iso.clone(), self.iso.clone());
        let named = self.is_named();

        let parser = Parser::new(
            {
                let (names, iso, default) = (Rc::clone(&names), iso.clone(), self.default.clone());
                move |input: &CommandLineArguments| {
                    let found = if named {
                        take_named(input, &names, &iso)?
                    } else {
                        take_head(input, &names, &iso).ok().flatten()
                    };
                    Ok(match found {
                        Some((rest, value)) => (rest, Some(value)),
                        None => (input.clone(), default.clone()),
                    })
                }
            },
            {
                let (names, iso) = (Rc::clone(&names), iso.clone());
                move |value: &Option<A>| match value {
                    Some(value) => Some(names.tokens(iso.unapply(value).ok()?)),
                    None => Some(CommandLineArguments::empty()),
                }
            },
            {
                let (names, type_name) = (Rc::clone(&names), self.type_name.clone());
                move |value: &Option<A>| match value {
                    Some(value) => {
                        iso.unapply(value).ok()?;
                        Some(names.tokens(type_name.clone()))
                    }
                    None => Some(CommandLineArguments::empty()),
                }
            },
        );

        Cli::new(
            parser,
            move |value: &Option<A>| match value {
                Some(value) if unapply_check.unapply(value).is_ok() => line.clone(),
                _ => String::new(),
            },
            self.examples.into_iter().map(Some).collect(),
        )
    }

    /// Every occurrence of a named argument, in order.
    ///
    /// Collection stops at the first occurrence without a convertible value;
    /// that occurrence stays in the stream. No occurrence at all falls back to
    /// the default, or fails. An empty list only prints when it is the default.
    pub fn repeated(self) -> Cli<Vec<A>> {
        debug_assert!(self.is_named(), "a repeated argument needs a name");
        let template = active_template();
        let names = Rc::new(self.names(template.as_ref()));
        let list_type = format!("[{}]", self.type_name);
        let line = self.usage_line(template.as_ref(), &list_type, &self.description);
        let (iso, unapply_check) = (self.iso.clone(), self.iso.clone());
        let default = self.list_default();
        let prints_empty = matches!(&default, Some(d) if d.is_empty());

        let parser = Parser::new(
            {
                let (names, iso) = (Rc::clone(&names), iso.clone());
                move |input: &CommandLineArguments| {
                    let mut rest = input.clone();
                    let mut values = Vec::new();
                    while let Ok(Some((next, value))) = take_named(&rest, &names, &iso) {
                        values.push(value);
                        rest = next;
                    }
                    match (values.is_empty(), &default) {
                        (false, _) => Ok((rest, values)),
                        (true, Some(default)) => Ok((rest, default.clone())),
                        (true, None) => Err(ParseError::Missing(names.display.clone())),
                    }
                }
            },
            {
                let (names, iso) = (Rc::clone(&names), iso.clone());
                move |values: &Vec<A>| {
                    if values.is_empty() {
                        return prints_empty.then(CommandLineArguments::empty);
                    }
                    values.iter().try_fold(CommandLineArguments::empty(), |acc, value| {
                        Some(acc.combine(names.tokens(iso.unapply(value).ok()?)))
                    })
                }
            },
            {
                let (names, type_name) = (Rc::clone(&names), self.type_name.clone());
                move |_: &Vec<A>| Some(names.tokens(format!("{type_name}...")))
            },
        );

        let examples = if self.examples.is_empty() {
            Vec::new()
        } else {
            vec![self.examples]
        };
        Cli::new(
            parser,
            move |values: &Vec<A>| {
                if values.iter().all(|v| unapply_check.unapply(v).is_ok()) {
                    line.clone()
                } else {
                    String::new()
                }
            },
            examples,
        )
    }

    /// All remaining tokens as one list. Must be the last argument of a
    /// product; nothing after it ever sees a token.
    pub fn variadic(self) -> Cli<Vec<A>> {
        debug_assert!(
            !self.is_named(),
            "a variadic argument is positional and takes no name"
        );
        let template = active_template();
        let list_type = format!("[{}]", self.type_name);
        let line = self.usage_line(template.as_ref(), &list_type, &self.description);
        let array = PartialIso::array(self.iso.clone());
        let (print_iso, unapply_check) = (array.clone(), array.clone());
        let default = self.list_default();
        let prints_empty = default.as_ref().is_none_or(|d| d.is_empty());
        let display = format!("<{}...>", self.type_name);

        let parser = Parser::new(
            move |input: &CommandLineArguments| {
                if input.is_empty() {
                    return Ok((input.clone(), default.clone().unwrap_or_default()));
                }
                match array.apply(input.parts().to_vec()) {
                    Ok(values) => Ok((CommandLineArguments::empty(), values)),
                    Err(source) => match &default {
                        Some(default) => Ok((CommandLineArguments::empty(), default.clone())),
                        None => Err(ParseError::Invalid {
                            name: display.clone(),
                            source,
                        }),
                    },
                }
            },
            move |values: &Vec<A>| {
                if values.is_empty() && !prints_empty {
                    return None;
                }
                print_iso.unapply(values).ok().map(CommandLineArguments::new)
            },
            {
                let placeholder = format!("{}...", self.type_name);
                move |_: &Vec<A>| Some(CommandLineArguments::new(vec![placeholder.clone()]))
            },
        );

        Cli::new(
            parser,
            move |values: &Vec<A>| match unapply_check.unapply(values) {
                Ok(_) => line.clone(),
                Err(_) => String::new(),
            },
            vec![self.examples],
        )
        .consuming_rest()
    }
}

impl<A: Clone + 'static> From<Arg<A>> for Cli<A> {
    fn from(arg: Arg<A>) -> Self {
        arg.single()
    }
}

/// Spellings of one argument under the template it was built with.
struct Names {
    /// Tokens that select the argument when parsing.
    matchers: Vec<String>,
    /// Token written before the value when printing; `None` when positional.
    printed: Option<String>,
    /// Name used in error messages.
    display: String,
}

impl Names {
    fn tokens(&self, value: String) -> CommandLineArguments {
        self.printed.iter().cloned().chain([value]).collect()
    }
}

/// Finds the first occurrence of a named argument and takes it with its value.
///
/// `Ok(None)` means the name does not occur at all.
fn take_named<A>(
    input: &CommandLineArguments,
    names: &Names,
    iso: &PartialIso<String, A>,
) -> ParseResult<Option<(CommandLineArguments, A)>>
where
    A: 'static,
{
    let Some(at) = input.position_of(&names.matchers) else {
        return Ok(None);
    };
    let raw = input
        .get(at + 1)
        .ok_or_else(|| ParseError::MissingValue(names.display.clone()))?;
    let value = iso
        .apply(raw.to_string())
        .map_err(|source| ParseError::Invalid {
            name: names.display.clone(),
            source,
        })?;
    Ok(Some((input.without(at, 2), value)))
}

/// Takes the head token as a positional value. `Ok(None)` on an empty stream.
fn take_head<A>(
    input: &CommandLineArguments,
    names: &Names,
    iso: &PartialIso<String, A>,
) -> ParseResult<Option<(CommandLineArguments, A)>>
where
    A: 'static,
{
    let Some((head, rest)) = input.head() else {
        return Ok(None);
    };
    let value = iso
        .apply(head.to_string())
        .map_err(|source| ParseError::Invalid {
            name: names.display.clone(),
            source,
        })?;
    Ok(Some((rest, value)))
}
