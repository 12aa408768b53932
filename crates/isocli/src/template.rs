//! Rendering of names, usage lines and help text.
//!
//! Matching logic never hard-codes `--name`: every builder asks the active
//! [`CliTemplate`] how a name is spelled when the CLI tree is constructed.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Name of the option that triggers help when it is the last token.
pub const HELP_NAME: &str = "help";

/// Pluggable text rendering. Every method has the default dash-based style.
pub trait CliTemplate {
    fn long_arg(&self, name: &str) -> String {
        format!("--{name}")
    }

    fn short_arg(&self, name: &str) -> String {
        format!("-{name}")
    }

    fn long_option(&self, name: &str) -> String {
        self.long_arg(name)
    }

    fn short_option(&self, name: &str) -> String {
        self.short_arg(name)
    }

    /// One help line for a value-taking argument.
    fn arg_usage(
        &self,
        long: Option<&str>,
        short: Option<&str>,
        type_name: &str,
        description: &str,
    ) -> String {
        match (long, short) {
            (Some(long), short) => format!(
                "  {}{} {type_name}: {description}",
                self.long_arg(long),
                short
                    .map(|s| format!(" ({})", self.short_arg(s)))
                    .unwrap_or_default()
            ),
            (None, Some(short)) => {
                format!("  {} {type_name}: {description}", self.short_arg(short))
            }
            (None, None) => format!("  - {type_name}: {description}"),
        }
    }

    /// One help line for a boolean option.
    fn option_usage(&self, long: &str, short: Option<&str>, description: &str) -> String {
        format!(
            "  {}{}: {description}",
            self.long_option(long),
            short
                .map(|s| format!(" ({})", self.short_option(s)))
                .unwrap_or_default()
        )
    }

    fn command_usage(&self, name: &str, description: &str) -> String {
        if description.is_empty() {
            name.to_string()
        } else {
            format!("{name}: {description}")
        }
    }

    /// A usage block followed by one canonical invocation.
    fn command_usage_example(&self, usage: &str, example: &str) -> String {
        format!("{usage}\n\nExample:\n  {example}")
    }

    /// Wraps the joined usage blocks of a whole CLI.
    fn cli_usage(&self, usage: &str) -> String {
        usage.to_string()
    }

    /// Token that asks for help when it ends the argument list.
    fn help_flag(&self) -> String {
        self.long_option(HELP_NAME)
    }
}

/// The dash-based style: `--name`, `-n`, `--help`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTemplate;

impl CliTemplate for DefaultTemplate {}

thread_local! {
    static ACTIVE: RefCell<Rc<dyn CliTemplate>> = RefCell::new(Rc::new(DefaultTemplate) as Rc<dyn CliTemplate>);
}

/// The template builders on this thread currently capture.
pub fn active_template() -> Rc<dyn CliTemplate> {
    ACTIVE.with(|active| Rc::clone(&active.borrow()))
}

struct Restore(Option<Rc<dyn CliTemplate>>);

impl Drop for Restore {
    fn drop(&mut self) {
        if let Some(previous) = self.0.take() {
            ACTIVE.with(|active| *active.borrow_mut() = previous);
        }
    }
}

/// Builds a CLI tree with `template` active, restoring the previous template
/// afterwards, also when `build` panics.
///
/// The active template is per thread: a tree must be built on the thread that
/// called `with_template`. Parsing does not consult the active template, so a
/// finished tree can be used anywhere it can be moved.
pub fn with_template<T, R>(template: T, build: impl FnOnce() -> R) -> R
where
    T: CliTemplate + 'static,
{
    let template: Rc<dyn CliTemplate> = Rc::new(template);
    let previous = ACTIVE.with(|active| active.replace(template));
    let _restore = Restore(Some(previous));
    tracing::debug!("building CLI with a custom template");
    build()
}

/// Data-driven template, loadable from JSON.
///
/// ```json
/// { "long-prefix": "", "long-suffix": ":", "short-prefix": "", "short-suffix": ":", "bare-options": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TemplateConfig {
    pub long_prefix: String,
    pub long_suffix: String,
    pub short_prefix: String,
    pub short_suffix: String,
    /// Options render as their bare name instead of argument style.
    pub bare_options: bool,
    pub help_name: String,
    pub example_heading: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_heading: Option<String>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            long_prefix: "--".to_string(),
            long_suffix: String::new(),
            short_prefix: "-".to_string(),
            short_suffix: String::new(),
            bare_options: false,
            help_name: HELP_NAME.to_string(),
            example_heading: "Example:".to_string(),
            usage_heading: None,
        }
    }
}

impl TemplateConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

impl CliTemplate for TemplateConfig {
    fn long_arg(&self, name: &str) -> String {
        format!("{}{name}{}", self.long_prefix, self.long_suffix)
    }

    fn short_arg(&self, name: &str) -> String {
        format!("{}{name}{}", self.short_prefix, self.short_suffix)
    }

    fn long_option(&self, name: &str) -> String {
        if self.bare_options {
            name.to_string()
        } else {
            self.long_arg(name)
        }
    }

    fn short_option(&self, name: &str) -> String {
        if self.bare_options {
            name.to_string()
        } else {
            self.short_arg(name)
        }
    }

    fn command_usage_example(&self, usage: &str, example: &str) -> String {
        format!("{usage}\n\n{}\n  {example}", self.example_heading)
    }

    fn cli_usage(&self, usage: &str) -> String {
        match &self.usage_heading {
            Some(heading) => format!("{heading}\n\n{usage}"),
            None => usage.to_string(),
        }
    }

    fn help_flag(&self) -> String {
        self.long_option(&self.help_name)
    }
}
