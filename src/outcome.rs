use crate::model::Name;

/// An unmet expectation: the flags, sub-commands, or positional argument a
/// user could still supply to satisfy one branch of the parse.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Requirement {
    flags: Vec<Name>,
    commands: Vec<String>,
    argument: bool,
}

impl Requirement {
    pub(crate) fn flag(name: Name) -> Self {
        Self {
            flags: vec![name],
            ..Self::default()
        }
    }

    pub(crate) fn command(name: impl Into<String>) -> Self {
        Self {
            commands: vec![name.into()],
            ..Self::default()
        }
    }

    pub(crate) fn argument() -> Self {
        Self {
            argument: true,
            ..Self::default()
        }
    }

    /// Combine componentwise: flags and commands concatenate (order
    /// preserved), the argument marker ORs.
    pub(crate) fn merge(mut self, other: Requirement) -> Requirement {
        self.flags.extend(other.flags);
        self.commands.extend(other.commands);
        self.argument = self.argument || other.argument;
        self
    }

    /// The user-visible rendering, ex: `Missing expected flag (--x or -y)`.
    pub fn message(&self) -> String {
        let mut expected = Vec::default();

        match self.flags.as_slice() {
            [] => {}
            [flag] => expected.push(format!("flag {flag}")),
            flags => expected.push(format!(
                "flag ({})",
                flags
                    .iter()
                    .map(Name::to_string)
                    .collect::<Vec<String>>()
                    .join(" or ")
            )),
        }

        match self.commands.as_slice() {
            [] => {}
            [command] => expected.push(format!("command {command}")),
            commands => expected.push(format!("command ({})", commands.join(" or "))),
        }

        if self.argument {
            expected.push("argument".to_string());
        }

        format!("Missing expected {}", expected.join(", or "))
    }
}

/// The three-valued outcome of a parse (or of a validation step).
///
/// `Missing` collects requirements that would satisfy the parse; `Failure`
/// collects hard error messages in the order they arose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<A> {
    Success(A),
    Missing(Vec<Requirement>),
    Failure(Vec<String>),
}

impl<A> Outcome<A> {
    pub fn success(value: A) -> Self {
        Outcome::Success(value)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Outcome::Failure(vec![message.into()])
    }

    pub(crate) fn missing() -> Self {
        Outcome::Missing(Vec::default())
    }

    pub(crate) fn missing_flag(name: Name) -> Self {
        Outcome::Missing(vec![Requirement::flag(name)])
    }

    pub(crate) fn missing_command(name: impl Into<String>) -> Self {
        Outcome::Missing(vec![Requirement::command(name)])
    }

    pub(crate) fn missing_argument() -> Self {
        Outcome::Missing(vec![Requirement::argument()])
    }

    pub fn map<B>(self, map: impl FnOnce(A) -> B) -> Outcome<B> {
        match self {
            Outcome::Success(value) => Outcome::Success(map(value)),
            Outcome::Missing(requirements) => Outcome::Missing(requirements),
            Outcome::Failure(messages) => Outcome::Failure(messages),
        }
    }

    /// Continue with `bind` on success; `Missing`/`Failure` pass through.
    pub fn and_then<B>(self, bind: impl FnOnce(A) -> Outcome<B>) -> Outcome<B> {
        match self {
            Outcome::Success(value) => bind(value),
            Outcome::Missing(requirements) => Outcome::Missing(requirements),
            Outcome::Failure(messages) => Outcome::Failure(messages),
        }
    }

    /// Combine two independent outcomes.
    ///
    /// Two `Missing` sides merge their requirement lists so the user sees
    /// everything they could supply; a hard `Failure` on either side
    /// dominates, downgrading the other side's requirements into messages.
    pub(crate) fn zip_with<B, C>(
        self,
        other: Outcome<B>,
        combine: impl FnOnce(A, B) -> C,
    ) -> Outcome<C> {
        match (self, other) {
            (Outcome::Success(left), Outcome::Success(right)) => {
                Outcome::Success(combine(left, right))
            }
            (Outcome::Success(_), Outcome::Missing(right)) => Outcome::Missing(right),
            (Outcome::Success(_), Outcome::Failure(right)) => Outcome::Failure(right),
            (Outcome::Missing(left), Outcome::Success(_)) => Outcome::Missing(left),
            (Outcome::Missing(mut left), Outcome::Missing(right)) => {
                left.extend(right);
                Outcome::Missing(left)
            }
            (Outcome::Missing(left), Outcome::Failure(right)) => {
                let mut messages = downgrade(&left);
                messages.extend(right);
                Outcome::Failure(messages)
            }
            (Outcome::Failure(left), Outcome::Success(_)) => Outcome::Failure(left),
            (Outcome::Failure(mut left), Outcome::Missing(right)) => {
                left.extend(downgrade(&right));
                Outcome::Failure(left)
            }
            (Outcome::Failure(mut left), Outcome::Failure(right)) => {
                left.extend(right);
                Outcome::Failure(left)
            }
        }
    }

    /// Pick between two alternative outcomes.
    ///
    /// A branch that matched anything (`Success` or `Failure`) wins over one
    /// that didn't; two `Missing` sides merge the first requirement of each
    /// so the alternatives report without exploding combinatorially.
    pub(crate) fn or(self, other: Outcome<A>) -> Outcome<A> {
        match (self, other) {
            (Outcome::Missing(left), Outcome::Missing(right)) => {
                Outcome::Missing(merge_first(left, right))
            }
            (Outcome::Missing(_), other) => other,
            (taken, _) => taken,
        }
    }
}

fn downgrade(requirements: &[Requirement]) -> Vec<String> {
    requirements.iter().map(Requirement::message).collect()
}

fn merge_first(left: Vec<Requirement>, right: Vec<Requirement>) -> Vec<Requirement> {
    match (left.into_iter().next(), right.into_iter().next()) {
        (Some(left), Some(right)) => vec![left.merge(right)],
        (Some(left), None) => vec![left],
        (None, Some(right)) => vec![right],
        (None, None) => Vec::default(),
    }
}
