use std::fmt;

use crate::parser::Monoid;

/// Unconsumed command-line tokens.
///
/// Parsers never mutate a stream in place; each successful parse returns the
/// stream that remains after it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CommandLineArguments {
    parts: Vec<String>,
}

impl CommandLineArguments {
    pub fn new(parts: Vec<String>) -> Self {
        Self { parts }
    }

    /// The arguments of the current process, without the program name.
    pub fn from_env() -> Self {
        std::env::args().skip(1).collect()
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<String> {
        self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.parts.get(index).map(String::as_str)
    }

    /// First token and the stream after it.
    pub fn head(&self) -> Option<(&str, CommandLineArguments)> {
        self.parts
            .split_first()
            .map(|(head, rest)| (head.as_str(), Self::new(rest.to_vec())))
    }

    /// Index of the first token equal to any of `names`.
    pub fn position_of(&self, names: &[String]) -> Option<usize> {
        self.parts.iter().position(|part| names.contains(part))
    }

    pub fn contains(&self, token: &str) -> bool {
        self.parts.iter().any(|part| part == token)
    }

    /// The stream with `count` tokens starting at `index` removed.
    pub fn without(&self, index: usize, count: usize) -> Self {
        let end = (index + count).min(self.parts.len());
        let mut parts = self.parts.clone();
        parts.drain(index.min(end)..end);
        Self::new(parts)
    }

    /// Space-joined rendering, as the tokens would be typed.
    pub fn render(&self) -> String {
        self.parts.join(" ")
    }
}

impl Monoid for CommandLineArguments {
    fn empty() -> Self {
        Self::default()
    }

    fn combine(mut self, other: Self) -> Self {
        self.parts.extend(other.parts);
        self
    }
}

impl fmt::Display for CommandLineArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<Vec<String>> for CommandLineArguments {
    fn from(parts: Vec<String>) -> Self {
        Self::new(parts)
    }
}

impl From<Vec<&str>> for CommandLineArguments {
    fn from(parts: Vec<&str>) -> Self {
        parts.into_iter().collect()
    }
}

impl From<&[String]> for CommandLineArguments {
    fn from(parts: &[String]) -> Self {
        Self::new(parts.to_vec())
    }
}

impl From<&[&str]> for CommandLineArguments {
    fn from(parts: &[&str]) -> Self {
        parts.iter().copied().collect()
    }
}

impl<const N: usize> From<[&str; N]> for CommandLineArguments {
    fn from(parts: [&str; N]) -> Self {
        parts.into_iter().collect()
    }
}

impl FromIterator<String> for CommandLineArguments {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for CommandLineArguments {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}
