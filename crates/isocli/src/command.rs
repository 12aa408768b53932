use crate::arguments::CommandLineArguments;
use crate::cli::Cli;
use crate::error::ParseError;
use crate::parser::Parser;
use crate::template::active_template;

fn literal(name: String) -> Parser<CommandLineArguments, ()> {
    let printed = CommandLineArguments::new(vec![name.clone()]);
    let templated = printed.clone();
    Parser::new(
        move |input: &CommandLineArguments| match input.head() {
            Some((head, rest)) if head == name => Ok((rest, ())),
            found => Err(ParseError::UnexpectedToken {
                expected: name.clone(),
                found: found.map(|(head, _)| head.to_string()),
            }),
        },
        move |()| Some(printed.clone()),
        move |()| Some(templated.clone()),
    )
}

/// A literal command token that must come first in the stream.
pub fn command(name: impl Into<String>, description: impl Into<String>) -> Cli<()> {
    let name = name.into();
    let usage = active_template().command_usage(&name, &description.into());
    Cli::new(literal(name), move |()| usage.clone(), vec![()])
}

/// A command token followed by a whole sub-CLI, e.g. `remote add ..`.
pub fn command_group<A: 'static>(name: impl Into<String>, sub: Cli<A>) -> Cli<A> {
    let name = name.into();
    let template = active_template();
    let sub_usage = sub.usage_fn();
    let prefix = name.clone();
    command(name, "").then(sub).with_usage(move |value: &A| {
        template.command_usage(&format!("{prefix} {}", sub_usage(value)), "")
    })
}
