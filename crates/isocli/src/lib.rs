//! Declarative command-line parsing with invertible parsers.
//!
//! A command line is described once, as a tree of [`Cli`] values. The same
//! tree parses argument lists into typed values, prints values back into
//! canonical argument lists, and renders help from its own examples:
//!
//! ```
//! use isocli::{Cli, arg, command, option, variant};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! enum Commands {
//!     Hello { name: String, verbose: bool },
//!     Print { verbose: bool },
//! }
//!
//! let hello = command("hello", "Greets someone")
//!     .then(arg::<String>("name").description("who to greet").example("Ada".into()))
//!     .and(option("verbose").description("say more"))
//!     .map(variant!(Commands::Hello { name, verbose }));
//! let print = command("print", "Prints a line")
//!     .then(option("verbose"))
//!     .map(variant!(Commands::Print { verbose }));
//! let cli: Cli<Commands> = hello | print;
//!
//! let parsed = cli.match_args(["hello", "--name", "Ada"]);
//! assert_eq!(parsed, Some(Commands::Hello { name: "Ada".into(), verbose: false }));
//! assert_eq!(
//!     cli.print(&Commands::Print { verbose: true }).map(|args| args.render()),
//!     Some("print --verbose".to_string())
//! );
//! ```
//!
//! Alternatives are tried in declaration order and the first match wins.
//! Names are spelled by the [`CliTemplate`] active while the tree is built;
//! see [`with_template`].

mod arg;
mod arguments;
mod cli;
mod command;
mod error;
mod iso;
mod option;
mod parser;
mod template;
mod value;

pub use arg::{Arg, arg, positional, var_arg};
pub use arguments::CommandLineArguments;
pub use cli::{Cli, Dispatch};
pub use command::{command, command_group};
pub use error::{ConfigError, IsoError, IsoResult, ParseError, ParseResult};
pub use iso::{Nested, PartialIso, parenthesize};
pub use option::{Flag, option};
pub use parser::{Monoid, Parser};
pub use template::{
    CliTemplate, DefaultTemplate, HELP_NAME, TemplateConfig, active_template, with_template,
};
pub use value::ArgValue;
