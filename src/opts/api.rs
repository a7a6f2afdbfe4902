use std::str::FromStr;
use std::sync::Arc;

use crate::model::{Command, Name};
use crate::opts::core::{
    AppNode, OrElseNode, PureNode, RepeatedArgumentNode, RepeatedFlagNode, RepeatedRegularNode,
    SingleArgumentNode, SingleFlagNode, SingleRegularNode, SubcommandNode, ValidateNode,
};
use crate::opts::Opts;
use crate::outcome::Outcome;

fn names(long: impl Into<String>, short: impl Into<Option<char>>) -> Vec<Name> {
    let mut names = vec![Name::Long(long.into())];

    if let Some(short) = short.into() {
        names.push(Name::Short(short));
    }

    names
}

impl Opts<String> {
    /// A value option: `--name VALUE`, `--name=VALUE`, `-n VALUE` or
    /// `-nVALUE`. May be given several times; the *last* occurrence wins.
    pub fn option(
        long: impl Into<String>,
        short: impl Into<Option<char>>,
        metavar: impl Into<String>,
        help: impl Into<String>,
    ) -> Opts<String> {
        Opts::wrap(SingleRegularNode {
            names: names(long, short),
            metavar: metavar.into(),
            help: Some(help.into()),
        })
    }

    /// A positional argument; consumes exactly one bare token (the *first*
    /// one supplied — later tokens fall through to the next positional).
    pub fn argument(metavar: impl Into<String>) -> Opts<String> {
        Opts::wrap(SingleArgumentNode {
            metavar: metavar.into(),
        })
    }

    /// Refine the raw string through [`FromStr`].
    pub fn parse<T>(self) -> Opts<T>
    where
        T: FromStr + Clone + Send + Sync + 'static,
    {
        self.validate(|value: String| match value.parse::<T>() {
            Ok(parsed) => Outcome::Success(parsed),
            Err(_) => Outcome::failure(format!(
                "'{value}' cannot convert to {}.",
                std::any::type_name::<T>()
            )),
        })
    }
}

impl Opts<Vec<String>> {
    /// A repeatable value option; at least one occurrence is required and
    /// occurrences are returned in input order.
    pub fn options(
        long: impl Into<String>,
        short: impl Into<Option<char>>,
        metavar: impl Into<String>,
        help: impl Into<String>,
    ) -> Opts<Vec<String>> {
        Opts::wrap(RepeatedRegularNode {
            names: names(long, short),
            metavar: metavar.into(),
            help: Some(help.into()),
        })
    }

    /// One or more positional arguments, in input order.
    pub fn arguments(metavar: impl Into<String>) -> Opts<Vec<String>> {
        Opts::wrap(RepeatedArgumentNode {
            metavar: metavar.into(),
        })
    }
}

impl Opts<()> {
    /// A flag: consumes no value, and any number of occurrences beyond the
    /// first make no difference.
    pub fn flag(
        long: impl Into<String>,
        short: impl Into<Option<char>>,
        help: impl Into<String>,
    ) -> Opts<()> {
        Opts::wrap(SingleFlagNode {
            names: names(long, short),
            help: Some(help.into()),
        })
    }
}

impl Opts<usize> {
    /// A repeatable flag; yields the occurrence count (at least one).
    pub fn flags(
        long: impl Into<String>,
        short: impl Into<Option<char>>,
        help: impl Into<String>,
    ) -> Opts<usize> {
        Opts::wrap(RepeatedFlagNode {
            names: names(long, short),
            help: Some(help.into()),
        })
    }
}

impl<A: Clone + Send + Sync + 'static> Opts<A> {
    /// Always succeeds with `value`; matches nothing.
    pub fn pure(value: A) -> Opts<A> {
        Opts::wrap(PureNode { value })
    }

    /// Defer to a named sub-command; once its name is seen on the command
    /// line, the sub-command owns every remaining token.
    pub fn subcommand(command: Command<A>) -> Opts<A> {
        Opts::wrap(SubcommandNode { command })
    }

    pub fn map<B>(self, map: impl Fn(A) -> B + Send + Sync + 'static) -> Opts<B>
    where
        B: Clone + Send + Sync + 'static,
    {
        self.validate(move |value| Outcome::Success(map(value)))
    }

    /// Refine the parsed value after all tokens are consumed; return
    /// [`Outcome::failure`] to reject it.
    pub fn validate<B>(self, validate: impl Fn(A) -> Outcome<B> + Send + Sync + 'static) -> Opts<B>
    where
        B: Clone + Send + Sync + 'static,
    {
        Opts::wrap(ValidateNode {
            inner: self,
            validate: Arc::new(validate),
        })
    }

    /// The product of two independent descriptions; both must parse.
    pub fn and<B>(self, other: Opts<B>) -> Opts<(A, B)>
    where
        B: Clone + Send + Sync + 'static,
    {
        self.map2(other, |left, right| (left, right))
    }

    pub fn map2<B, C>(
        self,
        other: Opts<B>,
        combine: impl Fn(A, B) -> C + Send + Sync + 'static,
    ) -> Opts<C>
    where
        B: Clone + Send + Sync + 'static,
        C: Clone + Send + Sync + 'static,
    {
        Opts::wrap(AppNode {
            combine: Arc::new(combine),
            left: self,
            right: other,
        })
    }

    /// Alternative choice: the first branch that matches anything wins.
    pub fn or(self, other: Opts<A>) -> Opts<A> {
        Opts::wrap(OrElseNode {
            left: self,
            right: other,
        })
    }

    /// Make the description optional, yielding `None` when it never matched.
    pub fn optional(self) -> Opts<Option<A>> {
        self.map(Some).or(Opts::pure(None))
    }

    /// Fall back to `value` when the description never matched.
    pub fn with_default(self, value: A) -> Opts<A> {
        self.or(Opts::pure(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command<A: Clone + Send + Sync + 'static>(opts: Opts<A>) -> Command<A> {
        Command::new("test", "A test program.", opts)
    }

    #[test]
    fn pure_parses_empty() {
        let result = command(Opts::pure(7)).parse(Vec::<String>::default());
        assert_eq!(result.unwrap(), 7);
    }

    #[test]
    fn map2_with_pure_is_identity() {
        let plain = command(Opts::argument("ITEM"));
        let applied = command(Opts::pure(()).map2(Opts::argument("ITEM"), |_, item| item));

        assert_eq!(
            plain.parse(["value"]).unwrap(),
            applied.parse(["value"]).unwrap()
        );
        assert_eq!(
            plain.parse(Vec::<String>::default()).unwrap_err().errors(),
            applied
                .parse(Vec::<String>::default())
                .unwrap_err()
                .errors()
        );
    }

    #[test]
    fn or_is_left_biased() {
        let opts = Opts::argument("LEFT").map(|v| format!("left:{v}"))
            .or(Opts::argument("RIGHT").map(|v| format!("right:{v}")));

        assert_eq!(command(opts).parse(["x"]).unwrap(), "left:x");
    }

    #[test]
    fn optional_absent_is_none() {
        let opts = Opts::option("file", 'f', "FILE", "The input file.").optional();
        let command = command(opts);

        assert_eq!(command.parse(Vec::<String>::default()).unwrap(), None);
        assert_eq!(
            command.parse(["-f", "data.txt"]).unwrap(),
            Some("data.txt".to_string())
        );
    }

    #[test]
    fn with_default_fills_in() {
        let opts = Opts::option("level", None, "LEVEL", "The level.").with_default("5".to_string());

        assert_eq!(command(opts).parse(Vec::<String>::default()).unwrap(), "5");
    }

    #[test]
    fn parse_converts_through_from_str() {
        let opts = Opts::option("count", 'c', "N", "How many.").parse::<u32>();
        let command = command(opts);

        assert_eq!(command.parse(["-c", "12"]).unwrap(), 12);

        let help = command.parse(["-c", "blah"]).unwrap_err();
        assert_eq!(help.errors(), ["'blah' cannot convert to u32."]);
    }

    #[test]
    fn validate_rejects_at_finalization() {
        let opts = Opts::argument("N").parse::<u32>().validate(|n| {
            if n % 2 == 0 {
                Outcome::Success(n)
            } else {
                Outcome::failure(format!("{n} is not even."))
            }
        });
        let command = command(opts);

        assert_eq!(command.parse(["4"]).unwrap(), 4);
        assert_eq!(
            command.parse(["3"]).unwrap_err().errors(),
            ["3 is not even."]
        );
    }
}
