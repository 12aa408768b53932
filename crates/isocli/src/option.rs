//! Boolean options: present means `true`.

use std::rc::Rc;

use crate::arguments::CommandLineArguments;
use crate::cli::Cli;
use crate::parser::{Monoid, Parser};
use crate::template::active_template;

/// Builder for a presence flag such as `--verbose` / `-v`.
#[derive(Debug, Clone)]
pub struct Flag {
    long: String,
    short: Option<String>,
    description: String,
    default: bool,
}

pub fn option(long: impl Into<String>) -> Flag {
    Flag {
        long: long.into(),
        short: None,
        description: String::new(),
        default: false,
    }
}

impl Flag {
    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short = Some(short.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Value when the flag is absent. A flag defaulting to `true` can never
    /// be turned off from the command line, and `false` does not print.
    pub fn default_value(mut self, default: bool) -> Self {
        self.default = default;
        self
    }

    pub fn build(self) -> Cli<bool> {
        let template = active_template();
        let long = template.long_option(&self.long);
        let matchers: Rc<[String]> = std::iter::once(long.clone())
            .chain(self.short.as_deref().map(|s| template.short_option(s)))
            .collect();
        let line = template.option_usage(&self.long, self.short.as_deref(), &self.description);
        let default = self.default;

        let printed = {
            let long = long.clone();
            move |value: &bool| match (*value, default) {
                (v, d) if v == d => Some(CommandLineArguments::empty()),
                (true, _) => Some(CommandLineArguments::new(vec![long.clone()])),
                (false, _) => None,
            }
        };
        let parser = Parser::new(
            move |input: &CommandLineArguments| match input.position_of(&matchers) {
                Some(at) => Ok((input.without(at, 1), true)),
                None => Ok((input.clone(), default)),
            },
            printed.clone(),
            printed,
        );

        Cli::new(
            parser,
            move |value: &bool| if *value { line.clone() } else { String::new() },
            vec![true],
        )
    }
}

impl From<Flag> for Cli<bool> {
    fn from(flag: Flag) -> Self {
        flag.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_is_found_anywhere_and_removed() {
        let cli = option("verbose").short("v").build();
        let input = CommandLineArguments::from(["a", "-v", "b"]);
        let (rest, value) = cli.parser().parse(&input).unwrap();
        assert!(value);
        assert_eq!(rest.parts(), ["a", "b"]);
        assert_eq!(cli.match_args(["a"]), Some(false));
    }

    #[test]
    fn only_the_first_occurrence_is_consumed() {
        let cli = option("verbose").build();
        let input = CommandLineArguments::from(["--verbose", "--verbose"]);
        let (rest, _) = cli.parser().parse(&input).unwrap();
        assert_eq!(rest.parts(), ["--verbose"]);
    }

    #[test]
    fn printing_omits_the_default() {
        let cli = option("verbose").build();
        assert_eq!(cli.print(&false), Some(CommandLineArguments::empty()));
        assert_eq!(cli.print(&true).unwrap().render(), "--verbose");

        let on = option("color").default_value(true).build();
        assert_eq!(on.match_args(Vec::<String>::new()), Some(true));
        assert_eq!(on.print(&true), Some(CommandLineArguments::empty()));
        assert!(on.print(&false).is_none());
    }

    #[test]
    fn usage_only_describes_a_set_flag() {
        let cli = option("verbose").short("v").description("talk more").build();
        assert_eq!(cli.usage(&true), "  --verbose (-v): talk more");
        assert_eq!(cli.usage(&false), "");
        assert_eq!(cli.examples(), [true]);
    }
}
