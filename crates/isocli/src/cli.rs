//! The declarative layer: a [`Parser`] plus usage text and examples.
//!
//! Every combinator here builds a new [`Cli`] and keeps its three views in
//! step: parsing, printing and help are all derived from the same tree.

use std::fmt;
use std::ops::BitOr;
use std::rc::Rc;

use crate::arguments::CommandLineArguments;
use crate::error::{ParseError, ParseResult};
use crate::iso::PartialIso;
use crate::parser::Parser;
use crate::template::{CliTemplate, active_template};

type UsageFn<A> = dyn Fn(&A) -> String;

pub struct Cli<A> {
    parser: Parser<CommandLineArguments, A>,
    usage: Rc<UsageFn<A>>,
    examples: Vec<A>,
    template: Rc<dyn CliTemplate>,
    greedy: bool,
}

impl<A: Clone> Clone for Cli<A> {
    fn clone(&self) -> Self {
        Self {
            parser: self.parser.clone(),
            usage: Rc::clone(&self.usage),
            examples: self.examples.clone(),
            template: Rc::clone(&self.template),
            greedy: self.greedy,
        }
    }
}

impl<A> fmt::Debug for Cli<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("examples", &self.examples.len())
            .field("greedy", &self.greedy)
            .finish_non_exhaustive()
    }
}

/// What [`Cli::dispatch`] decided to do with an argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch<A> {
    /// The last token was the help flag; carries the rendered help.
    Help(String),
    Matched(A),
    NoMatch,
}

impl<A: 'static> Cli<A> {
    /// A CLI over `parser`, rendered with the active template.
    pub fn new(
        parser: Parser<CommandLineArguments, A>,
        usage: impl Fn(&A) -> String + 'static,
        examples: Vec<A>,
    ) -> Self {
        Self {
            parser,
            usage: Rc::new(usage),
            examples,
            template: active_template(),
            greedy: false,
        }
    }

    /// A CLI whose usage is the value's debug rendering and which has no examples.
    pub fn from_parser(parser: Parser<CommandLineArguments, A>) -> Self
    where
        A: fmt::Debug,
    {
        Self::new(parser, |value| format!("{value:?}"), Vec::new())
    }

    /// Matches nothing. Identity for [`Cli::or`].
    pub fn empty() -> Self {
        Self::new(Parser::empty(), |_| String::new(), Vec::new())
    }

    /// Marks this CLI as consuming every remaining token.
    pub(crate) fn consuming_rest(mut self) -> Self {
        self.greedy = true;
        self
    }

    pub fn parser(&self) -> &Parser<CommandLineArguments, A> {
        &self.parser
    }

    pub fn examples(&self) -> &[A] {
        &self.examples
    }

    pub fn template(&self) -> &dyn CliTemplate {
        self.template.as_ref()
    }

    /// Whether this CLI swallows every remaining token.
    pub fn is_greedy(&self) -> bool {
        self.greedy
    }

    pub(crate) fn usage_fn(&self) -> Rc<UsageFn<A>> {
        Rc::clone(&self.usage)
    }

    /// Replaces the usage text, keeping parsing, printing and examples.
    pub fn with_usage(self, usage: impl Fn(&A) -> String + 'static) -> Self {
        Self {
            usage: Rc::new(usage),
            ..self
        }
    }

    /// Human-readable description of a concrete value.
    pub fn usage(&self, value: &A) -> String {
        (self.usage)(value)
    }

    /// Canonical tokens for `value`, or `None` if no branch owns it.
    pub fn print(&self, value: &A) -> Option<CommandLineArguments> {
        self.parser.print(value)
    }

    /// Tokens for `value` with argument values replaced by their type names.
    pub fn template_for(&self, value: &A) -> Option<CommandLineArguments> {
        self.parser.template(value)
    }

    /// Parses `args`, reporting why nothing matched.
    ///
    /// Trailing tokens are ignored unless the CLI is [`anchored`](Cli::anchored).
    pub fn try_match(&self, args: impl Into<CommandLineArguments>) -> ParseResult<A> {
        self.parser.parse(&args.into()).map(|(_, value)| value)
    }

    /// Parses `args`; any failure is "no match".
    pub fn match_args(&self, args: impl Into<CommandLineArguments>) -> Option<A> {
        match self.try_match(args) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!(error = %err, "arguments did not match");
                None
            }
        }
    }

    /// Help for every example whose printed form contains all of `filter`.
    ///
    /// An empty filter keeps every example. Returns an empty string when no
    /// example survives.
    pub fn help_for<S: AsRef<str>>(&self, filter: &[S]) -> String {
        let usages: Vec<String> = self
            .examples
            .iter()
            .filter_map(|example| {
                let printed = self.parser.print(example)?;
                if !filter.iter().all(|token| printed.contains(token.as_ref())) {
                    return None;
                }
                Some(
                    self.template
                        .command_usage_example(&self.usage(example), &printed.render()),
                )
            })
            .collect();

        if usages.is_empty() {
            return String::new();
        }
        self.template.cli_usage(&usages.join("\n\n"))
    }

    pub fn help(&self) -> String {
        self.help_for::<&str>(&[])
    }

    /// Decides between help and matching without side effects.
    pub fn dispatch(&self, args: impl Into<CommandLineArguments>) -> Dispatch<A> {
        let args = args.into();
        if let Some((last, scope)) = args.parts().split_last()
            && *last == self.template.help_flag()
        {
            tracing::debug!(scope = ?scope, "help requested");
            return Dispatch::Help(self.help_for(scope));
        }
        match self.match_args(args) {
            Some(value) => Dispatch::Matched(value),
            None => Dispatch::NoMatch,
        }
    }

    /// Prints help when asked, otherwise hands a match to `perform`.
    ///
    /// Unmatched input does nothing and returns `None`.
    pub fn run<R>(
        &self,
        args: impl Into<CommandLineArguments>,
        perform: impl FnOnce(A) -> R,
    ) -> Option<R> {
        match self.dispatch(args) {
            Dispatch::Help(text) => {
                println!("{text}");
                None
            }
            Dispatch::Matched(value) => Some(perform(value)),
            Dispatch::NoMatch => None,
        }
    }

    /// Fails the parse when tokens remain after the whole tree has run.
    pub fn anchored(self) -> Self {
        let inner = self.parser.clone();
        let (print, template) = (self.parser.clone(), self.parser.clone());
        let parser = Parser::new(
            move |input: &CommandLineArguments| {
                let (rest, value) = inner.parse(input)?;
                if !rest.is_empty() {
                    return Err(ParseError::Unconsumed(rest.render()));
                }
                Ok((rest, value))
            },
            move |value| print.print(value),
            move |value| template.template(value),
        );
        Self { parser, ..self }
    }

    /// Ordered alternative: `self` is tried first.
    ///
    /// When both sides accept the same tokens the earlier one always wins, so
    /// declare specific alternatives before general ones.
    pub fn or(self, other: Self) -> Self {
        let usage_for = |cli: &Self| {
            let (parser, usage) = (cli.parser.clone(), Rc::clone(&cli.usage));
            move |value: &A| parser.print(value).map(|_| usage(value))
        };
        let (lhs_usage, rhs_usage) = (usage_for(&self), usage_for(&other));

        let mut examples = self.examples;
        examples.extend(other.examples);
        Self {
            parser: self.parser.or(other.parser),
            usage: Rc::new(move |value: &A| {
                lhs_usage(value)
                    .or_else(|| rhs_usage(value))
                    .unwrap_or_default()
            }),
            examples,
            template: self.template,
            greedy: self.greedy || other.greedy,
        }
    }

    /// Folds `clis` with [`Cli::or`], in order.
    pub fn one_of(clis: impl IntoIterator<Item = Self>) -> Self {
        clis.into_iter().reduce(Self::or).unwrap_or_else(Self::empty)
    }

    /// Projects values through `iso`, e.g. into one case of a command enum.
    ///
    /// Examples `iso` cannot apply are dropped; values `iso` cannot unapply
    /// have an empty usage and do not print.
    pub fn map<B: 'static>(self, iso: PartialIso<A, B>) -> Cli<B> {
        let usage = Rc::clone(&self.usage);
        let unapply = iso.clone();
        let examples = self
            .examples
            .into_iter()
            .filter_map(|example| iso.apply(example).ok())
            .collect();
        Cli {
            parser: self.parser.map(iso),
            usage: Rc::new(move |value: &B| {
                unapply
                    .unapply(value)
                    .map(|raw| usage(&raw))
                    .unwrap_or_default()
            }),
            examples,
            template: self.template,
            greedy: self.greedy,
        }
    }
}

impl<A: Clone + 'static> Cli<A> {
    /// Product: both must match, `other` on what `self` left over.
    ///
    /// Examples are the cartesian product of both sides.
    pub fn and<B: Clone + 'static>(self, other: impl Into<Cli<B>>) -> Cli<(A, B)> {
        let other = other.into();
        debug_assert!(
            !self.greedy,
            "an argument consuming all remaining tokens must come last"
        );
        let (lhs_usage, rhs_usage) = (Rc::clone(&self.usage), Rc::clone(&other.usage));
        let examples = self
            .examples
            .iter()
            .flat_map(|a| other.examples.iter().map(move |b| (a.clone(), b.clone())))
            .collect();
        Cli {
            parser: self.parser.and(other.parser),
            usage: Rc::new(move |(a, b): &(A, B)| format!("{}\n{}", lhs_usage(a), rhs_usage(b))),
            examples,
            template: self.template,
            greedy: other.greedy,
        }
    }
}

impl Cli<()> {
    /// Product that keeps only the right value, for literal command tokens.
    pub fn then<B: 'static>(self, other: impl Into<Cli<B>>) -> Cli<B> {
        let other = other.into();
        debug_assert!(
            !self.greedy,
            "an argument consuming all remaining tokens must come last"
        );
        let (lhs_usage, rhs_usage) = (Rc::clone(&self.usage), Rc::clone(&other.usage));
        Cli {
            parser: self.parser.then(other.parser),
            usage: Rc::new(move |b: &B| format!("{}\n{}", lhs_usage(&()), rhs_usage(b))),
            examples: other.examples,
            template: self.template,
            greedy: other.greedy,
        }
    }
}

impl<A: 'static> BitOr for Cli<A> {
    type Output = Cli<A>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl<A: 'static> FromIterator<Cli<A>> for Cli<A> {
    fn from_iter<T: IntoIterator<Item = Cli<A>>>(iter: T) -> Self {
        Self::one_of(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TemplateConfig, arg, command, option, with_template};

    #[test]
    fn empty_matches_nothing_and_has_no_help() {
        let cli = Cli::<u8>::empty();
        assert!(cli.match_args(["anything"]).is_none());
        assert_eq!(cli.help(), "");
    }

    #[test]
    fn and_combines_usage_and_examples() {
        let cli = arg::<String>("name")
            .description("a name")
            .example("Ada".to_string())
            .example("Grace".to_string())
            .single()
            .and(option("verbose").description("be verbose"));
        assert_eq!(cli.examples().len(), 2);
        assert_eq!(
            cli.usage(&("Ada".to_string(), true)),
            "  --name String: a name\n  --verbose: be verbose"
        );
    }

    #[test]
    fn or_usage_follows_the_printing_branch() {
        let hello = command("hello", "greeting").then(option("loud").description("shout"));
        let print = command("print", "printing").then(option("verbose").description("talk"));
        let cli = hello | print;
        assert_eq!(cli.usage(&true), "hello: greeting\n  --loud: shout");
        assert_eq!(cli.examples().len(), 2);
    }

    #[test]
    fn anchored_rejects_leftovers() {
        let cli = command("hello", "").then(option("verbose"));
        assert_eq!(cli.match_args(["hello", "extra"]), Some(false));

        let strict = cli.anchored();
        assert_eq!(
            strict.try_match(["hello", "extra"]),
            Err(ParseError::Unconsumed("extra".to_string()))
        );
        assert_eq!(strict.match_args(["hello", "--verbose"]), Some(true));
    }

    #[test]
    fn help_flag_must_be_last() {
        let cli = command("hello", "greeting").then(option("verbose"));
        assert!(matches!(cli.dispatch(["hello", "--help"]), Dispatch::Help(_)));
        assert_eq!(cli.dispatch(["--help", "hello"]), Dispatch::NoMatch);
    }

    #[test]
    fn run_returns_handler_result_only_on_match() {
        let cli = command("hello", "").then(option("verbose"));
        assert_eq!(cli.run(["hello", "--verbose"], |verbose| verbose), Some(true));
        assert_eq!(cli.run(["bye"], |verbose| verbose), None);
    }

    #[test]
    fn one_of_without_alternatives_is_empty() {
        let cli: Cli<bool> = Vec::<Cli<bool>>::new().into_iter().collect();
        assert!(cli.match_args(["--verbose"]).is_none());
    }

    #[test]
    fn combinators_keep_the_template_of_their_leaves() {
        let config = TemplateConfig {
            help_name: "?".to_string(),
            ..Default::default()
        };
        let (hello, print) = with_template(config, || {
            (
                command("hello", "").then(option("verbose")),
                command("print", "").then(option("verbose")),
            )
        });
        let cli = hello | print;
        assert_eq!(cli.template().help_flag(), "--?");
        assert!(matches!(cli.dispatch(["hello", "--?"]), Dispatch::Help(_)));
        assert_eq!(cli.dispatch(["hello", "--help"]), Dispatch::Matched(false));

        let mapped = cli.map(PartialIso::<bool, bool>::identity());
        assert_eq!(mapped.template().help_flag(), "--?");
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "must come last")]
    fn product_after_variadic_is_a_usage_error() {
        let _ = crate::var_arg::<String>("files", vec!["a".to_string()]).and(option("verbose"));
    }
}
