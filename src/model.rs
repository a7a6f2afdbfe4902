use crate::opts::Opts;
use crate::parser::{self, Help};

/// The name under which an option is matched on the command line.
///
/// A long name matches `--name` (and `--name=value`); a short name matches a
/// single character inside a `-abc` cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Name {
    Long(String),
    Short(char),
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Name::Long(name) => write!(f, "--{name}"),
            Name::Short(short) => write!(f, "-{short}"),
        }
    }
}

/// A named program (or sub-command) together with the options it accepts.
#[derive(Debug)]
pub struct Command<A> {
    name: String,
    header: String,
    opts: Opts<A>,
}

impl<A> Clone for Command<A> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            header: self.header.clone(),
            opts: self.opts.clone(),
        }
    }
}

impl<A> Command<A> {
    pub fn new(name: impl Into<String>, header: impl Into<String>, opts: Opts<A>) -> Self {
        Self {
            name: name.into(),
            header: header.into(),
            opts,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn opts(&self) -> &Opts<A> {
        &self.opts
    }
}

impl<A: Clone + Send + Sync + 'static> Command<A> {
    /// Parse an argument vector against this command's options.
    ///
    /// The vector excludes the program name (pass `std::env::args().skip(1)`).
    /// On failure the returned [`Help`] carries the user-visible error
    /// messages along with the usage documentation.
    pub fn parse<I, S>(&self, arguments: I) -> Result<A, Help>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        parser::consume_all(self, arguments.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Name::Long("verbose".to_string()), "--verbose")]
    #[case(Name::Long("dry-run".to_string()), "--dry-run")]
    #[case(Name::Short('v'), "-v")]
    fn name_display(#[case] name: Name, #[case] expected: &str) {
        assert_eq!(name.to_string(), expected);
    }

    #[test]
    fn command_accessors() {
        let command = Command::new("copy", "Copy a file.", Opts::argument("SOURCE"));

        assert_eq!(command.name(), "copy");
        assert_eq!(command.header(), "Copy a file.");
    }
}
