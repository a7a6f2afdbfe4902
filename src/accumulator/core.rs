use std::sync::Arc;

use crate::model::Name;
use crate::outcome::Outcome;

pub(crate) type AccRef<A> = Arc<dyn Accumulator<A>>;
pub(crate) type ValueFn<A> = Box<dyn FnOnce(String) -> AccRef<A>>;
pub(crate) type CombineFn<X, Y, A> = Arc<dyn Fn(X, Y) -> A + Send + Sync>;
pub(crate) type ValidateFn<X, A> = Arc<dyn Fn(X) -> Outcome<A> + Send + Sync>;

/// How an accumulator answered a `parse_option` probe.
pub(crate) enum OptionMatch<A> {
    /// No node recognized the name; the tree is unchanged.
    Unmatched,
    /// A flag consumed the name; continue with the new tree.
    Flag(AccRef<A>),
    /// A value option recognized the name; apply the value to continue.
    Value(ValueFn<A>),
    /// Two independent slots both claimed the name.
    Ambiguous,
}

/// Immutable parser state mirroring the shape of the option description.
///
/// Each parse operation leaves `self` untouched and returns a new tree
/// reflecting the consumption of one token; untouched subtrees are shared,
/// so only the spine from the root to the matched leaf is rebuilt.
pub(crate) trait Accumulator<A> {
    fn parse_option(&self, name: &Name) -> OptionMatch<A>;
    fn parse_arg(&self, arg: &str) -> Option<AccRef<A>>;
    fn parse_sub(&self, name: &str) -> Option<AccRef<A>>;
    fn result(&self) -> Outcome<A>;
}

/// A fixed outcome; matches nothing. Also holds slots frozen by a
/// sub-command handoff.
pub(crate) struct PureAcc<A> {
    value: Outcome<A>,
}

impl<A> PureAcc<A> {
    pub(crate) fn new(value: Outcome<A>) -> Self {
        Self { value }
    }
}

impl<A: Clone + 'static> Accumulator<A> for PureAcc<A> {
    fn parse_option(&self, _name: &Name) -> OptionMatch<A> {
        OptionMatch::Unmatched
    }

    fn parse_arg(&self, _arg: &str) -> Option<AccRef<A>> {
        None
    }

    fn parse_sub(&self, _name: &str) -> Option<AccRef<A>> {
        None
    }

    fn result(&self) -> Outcome<A> {
        self.value.clone()
    }
}

/// Independent product of two accumulators; both sides must parse.
pub(crate) struct AppAcc<X, Y, A> {
    combine: CombineFn<X, Y, A>,
    left: AccRef<X>,
    right: AccRef<Y>,
}

impl<X, Y, A> AppAcc<X, Y, A>
where
    X: Clone + 'static,
    Y: Clone + 'static,
    A: Clone + 'static,
{
    pub(crate) fn new(combine: CombineFn<X, Y, A>, left: AccRef<X>, right: AccRef<Y>) -> Self {
        Self {
            combine,
            left,
            right,
        }
    }

    fn rewrap_left(&self, matched: OptionMatch<X>) -> OptionMatch<A> {
        match matched {
            OptionMatch::Unmatched => OptionMatch::Unmatched,
            OptionMatch::Ambiguous => OptionMatch::Ambiguous,
            OptionMatch::Flag(left) => OptionMatch::Flag(Arc::new(AppAcc {
                combine: self.combine.clone(),
                left,
                right: self.right.clone(),
            })),
            OptionMatch::Value(next) => {
                let combine = self.combine.clone();
                let right = self.right.clone();
                OptionMatch::Value(Box::new(move |value| {
                    let left = next(value);
                    let rebuilt: AccRef<A> = Arc::new(AppAcc {
                        combine,
                        left,
                        right,
                    });
                    rebuilt
                }))
            }
        }
    }

    fn rewrap_right(&self, matched: OptionMatch<Y>) -> OptionMatch<A> {
        match matched {
            OptionMatch::Unmatched => OptionMatch::Unmatched,
            OptionMatch::Ambiguous => OptionMatch::Ambiguous,
            OptionMatch::Flag(right) => OptionMatch::Flag(Arc::new(AppAcc {
                combine: self.combine.clone(),
                left: self.left.clone(),
                right,
            })),
            OptionMatch::Value(next) => {
                let combine = self.combine.clone();
                let left = self.left.clone();
                OptionMatch::Value(Box::new(move |value| {
                    let right = next(value);
                    let rebuilt: AccRef<A> = Arc::new(AppAcc {
                        combine,
                        left,
                        right,
                    });
                    rebuilt
                }))
            }
        }
    }
}

impl<X, Y, A> Accumulator<A> for AppAcc<X, Y, A>
where
    X: Clone + 'static,
    Y: Clone + 'static,
    A: Clone + 'static,
{
    fn parse_option(&self, name: &Name) -> OptionMatch<A> {
        match (
            self.left.parse_option(name),
            self.right.parse_option(name),
        ) {
            (OptionMatch::Unmatched, OptionMatch::Unmatched) => OptionMatch::Unmatched,
            (matched, OptionMatch::Unmatched) => self.rewrap_left(matched),
            (OptionMatch::Unmatched, matched) => self.rewrap_right(matched),
            // One name resolving into two independent slots is a
            // specification conflict.
            (_, _) => OptionMatch::Ambiguous,
        }
    }

    fn parse_arg(&self, arg: &str) -> Option<AccRef<A>> {
        // Positional arguments fill left-to-right across the product.
        if let Some(left) = self.left.parse_arg(arg) {
            let rebuilt: AccRef<A> = Arc::new(AppAcc {
                combine: self.combine.clone(),
                left,
                right: self.right.clone(),
            });
            return Some(rebuilt);
        }

        self.right.parse_arg(arg).map(|right| {
            let rebuilt: AccRef<A> = Arc::new(AppAcc {
                combine: self.combine.clone(),
                left: self.left.clone(),
                right,
            });
            rebuilt
        })
    }

    fn parse_sub(&self, name: &str) -> Option<AccRef<A>> {
        // All remaining tokens belong to the sub-command, so the sibling
        // slot is frozen to its current partial result at the handoff.
        if let Some(left) = self.left.parse_sub(name) {
            let right: AccRef<Y> = Arc::new(PureAcc::new(self.right.result()));
            let rebuilt: AccRef<A> = Arc::new(AppAcc {
                combine: self.combine.clone(),
                left,
                right,
            });
            return Some(rebuilt);
        }

        self.right.parse_sub(name).map(|right| {
            let left: AccRef<X> = Arc::new(PureAcc::new(self.left.result()));
            let rebuilt: AccRef<A> = Arc::new(AppAcc {
                combine: self.combine.clone(),
                left,
                right,
            });
            rebuilt
        })
    }

    fn result(&self) -> Outcome<A> {
        let combine = self.combine.clone();
        self.left
            .result()
            .zip_with(self.right.result(), move |x, y| combine(x, y))
    }
}

/// Alternative choice; matching an option commits to the branch that
/// recognized it.
pub(crate) struct OrElseAcc<A> {
    left: AccRef<A>,
    right: AccRef<A>,
}

impl<A> OrElseAcc<A> {
    pub(crate) fn new(left: AccRef<A>, right: AccRef<A>) -> Self {
        Self { left, right }
    }
}

impl<A: Clone + 'static> Accumulator<A> for OrElseAcc<A> {
    fn parse_option(&self, name: &Name) -> OptionMatch<A> {
        match (
            self.left.parse_option(name),
            self.right.parse_option(name),
        ) {
            (OptionMatch::Unmatched, OptionMatch::Unmatched) => OptionMatch::Unmatched,
            (matched, OptionMatch::Unmatched) => matched,
            (OptionMatch::Unmatched, matched) => matched,
            (_, _) => OptionMatch::Ambiguous,
        }
    }

    fn parse_arg(&self, arg: &str) -> Option<AccRef<A>> {
        match (self.left.parse_arg(arg), self.right.parse_arg(arg)) {
            // Both branches accept the token; they remain live.
            (Some(left), Some(right)) => {
                let rebuilt: AccRef<A> = Arc::new(OrElseAcc { left, right });
                Some(rebuilt)
            }
            (Some(left), None) => Some(left),
            (None, Some(right)) => Some(right),
            (None, None) => None,
        }
    }

    fn parse_sub(&self, name: &str) -> Option<AccRef<A>> {
        self.left
            .parse_sub(name)
            .or_else(|| self.right.parse_sub(name))
    }

    fn result(&self) -> Outcome<A> {
        self.left.result().or(self.right.result())
    }
}

/// Post-parse refinement; runs at finalization only.
pub(crate) struct ValidateAcc<X, A> {
    inner: AccRef<X>,
    validate: ValidateFn<X, A>,
}

impl<X, A> ValidateAcc<X, A> {
    pub(crate) fn new(inner: AccRef<X>, validate: ValidateFn<X, A>) -> Self {
        Self { inner, validate }
    }
}

impl<X: Clone + 'static, A: Clone + 'static> Accumulator<A> for ValidateAcc<X, A> {
    fn parse_option(&self, name: &Name) -> OptionMatch<A> {
        match self.inner.parse_option(name) {
            OptionMatch::Unmatched => OptionMatch::Unmatched,
            OptionMatch::Ambiguous => OptionMatch::Ambiguous,
            OptionMatch::Flag(inner) => OptionMatch::Flag(Arc::new(ValidateAcc {
                inner,
                validate: self.validate.clone(),
            })),
            OptionMatch::Value(next) => {
                let validate = self.validate.clone();
                OptionMatch::Value(Box::new(move |value| {
                    let rebuilt: AccRef<A> = Arc::new(ValidateAcc {
                        inner: next(value),
                        validate,
                    });
                    rebuilt
                }))
            }
        }
    }

    fn parse_arg(&self, arg: &str) -> Option<AccRef<A>> {
        self.inner.parse_arg(arg).map(|inner| {
            let rebuilt: AccRef<A> = Arc::new(ValidateAcc {
                inner,
                validate: self.validate.clone(),
            });
            rebuilt
        })
    }

    fn parse_sub(&self, name: &str) -> Option<AccRef<A>> {
        self.inner.parse_sub(name).map(|inner| {
            let rebuilt: AccRef<A> = Arc::new(ValidateAcc {
                inner,
                validate: self.validate.clone(),
            });
            rebuilt
        })
    }

    fn result(&self) -> Outcome<A> {
        let validate = self.validate.clone();
        self.inner.result().and_then(move |value| validate(value))
    }
}

/// Matches its name once; the inner accumulator then owns all remaining
/// tokens.
pub(crate) struct SubcommandAcc<A> {
    name: String,
    action: AccRef<A>,
}

impl<A> SubcommandAcc<A> {
    pub(crate) fn new(name: String, action: AccRef<A>) -> Self {
        Self { name, action }
    }
}

impl<A: 'static> Accumulator<A> for SubcommandAcc<A> {
    fn parse_option(&self, _name: &Name) -> OptionMatch<A> {
        OptionMatch::Unmatched
    }

    fn parse_arg(&self, _arg: &str) -> Option<AccRef<A>> {
        None
    }

    fn parse_sub(&self, name: &str) -> Option<AccRef<A>> {
        if self.name == name {
            Some(self.action.clone())
        } else {
            None
        }
    }

    fn result(&self) -> Outcome<A> {
        Outcome::missing_command(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::{ArgumentAcc, FlagAcc, RegularAcc};
    use crate::outcome::Requirement;

    fn regular(long: &str) -> AccRef<Vec<String>> {
        Arc::new(RegularAcc::fresh(vec![Name::Long(long.to_string())]))
    }

    fn pair<X, Y>(left: AccRef<X>, right: AccRef<Y>) -> AppAcc<X, Y, (X, Y)>
    where
        X: Clone + Send + Sync + 'static,
        Y: Clone + Send + Sync + 'static,
    {
        AppAcc::new(Arc::new(|x, y| (x, y)), left, right)
    }

    fn apply_value<A>(matched: OptionMatch<A>, value: &str) -> AccRef<A> {
        match matched {
            OptionMatch::Value(next) => next(value.to_string()),
            _ => panic!("expected a value match"),
        }
    }

    #[test]
    fn pure_matches_nothing() {
        let acc = PureAcc::new(Outcome::Success(1));

        assert!(matches!(
            acc.parse_option(&Name::Short('x')),
            OptionMatch::Unmatched
        ));
        assert!(acc.parse_arg("x").is_none());
        assert!(acc.parse_sub("x").is_none());
        assert_eq!(acc.result(), Outcome::Success(1));
    }

    #[test]
    fn app_routes_option_to_matching_side() {
        // Setup
        let acc = pair(regular("file"), regular("output"));

        // Execute
        let next = apply_value(acc.parse_option(&Name::Long("output".to_string())), "o.txt");

        // Verify
        assert_eq!(
            next.result(),
            Outcome::Missing(vec![Requirement::flag(Name::Long("file".to_string()))])
        );

        let next = apply_value(next.parse_option(&Name::Long("file".to_string())), "f.txt");

        assert_eq!(
            next.result(),
            Outcome::Success((vec!["f.txt".to_string()], vec!["o.txt".to_string()]))
        );
    }

    #[test]
    fn app_double_claim_is_ambiguous() {
        let acc = pair(regular("file"), regular("file"));

        assert!(matches!(
            acc.parse_option(&Name::Long("file".to_string())),
            OptionMatch::Ambiguous
        ));
    }

    #[test]
    fn app_fills_positionals_left_to_right() {
        let left: AccRef<Vec<String>> = Arc::new(ArgumentAcc::fresh(1));
        let right: AccRef<Vec<String>> = Arc::new(ArgumentAcc::fresh(1));
        let acc = pair(left, right);

        let acc = acc.parse_arg("first").unwrap();
        let acc = acc.parse_arg("second").unwrap();

        assert!(acc.parse_arg("third").is_none());
        assert_eq!(
            acc.result(),
            Outcome::Success((vec!["first".to_string()], vec!["second".to_string()]))
        );
    }

    #[test]
    fn app_freezes_sibling_on_subcommand() {
        // Setup
        let flag: AccRef<usize> = Arc::new(FlagAcc::fresh(vec![Name::Short('v')]));
        let sub: AccRef<Vec<String>> = Arc::new(SubcommandAcc::new(
            "run".to_string(),
            Arc::new(ArgumentAcc::fresh(1)),
        ));
        let acc = pair(flag, sub);

        // Execute
        // Count one flag occurrence, then hand off to the sub-command.
        let acc = match acc.parse_option(&Name::Short('v')) {
            OptionMatch::Flag(next) => next,
            _ => panic!("expected a flag match"),
        };
        let acc = acc.parse_sub("run").unwrap();

        // Verify
        // The flag slot was frozen; later occurrences no longer match.
        assert!(matches!(
            acc.parse_option(&Name::Short('v')),
            OptionMatch::Unmatched
        ));

        let acc = acc.parse_arg("target").unwrap();
        assert_eq!(
            acc.result(),
            Outcome::Success((1, vec!["target".to_string()]))
        );
    }

    #[test]
    fn app_frozen_sibling_keeps_missing_state() {
        let sub: AccRef<Vec<String>> = Arc::new(SubcommandAcc::new(
            "run".to_string(),
            Arc::new(ArgumentAcc::fresh(1)),
        ));
        let acc = pair(regular("file"), sub);

        let acc = acc.parse_sub("run").unwrap();
        let acc = acc.parse_arg("target").unwrap();

        assert_eq!(
            acc.result(),
            Outcome::Missing(vec![Requirement::flag(Name::Long("file".to_string()))])
        );
    }

    #[test]
    fn or_else_commits_to_matching_branch() {
        let acc = OrElseAcc::new(regular("left"), regular("right"));

        let next = apply_value(acc.parse_option(&Name::Long("left".to_string())), "x");

        // The unmatched branch is discarded along with its requirement.
        assert_eq!(next.result(), Outcome::Success(vec!["x".to_string()]));
    }

    #[test]
    fn or_else_double_claim_is_ambiguous() {
        let acc = OrElseAcc::new(regular("file"), regular("file"));

        assert!(matches!(
            acc.parse_option(&Name::Long("file".to_string())),
            OptionMatch::Ambiguous
        ));
    }

    #[test]
    fn or_else_keeps_both_branches_for_positionals() {
        let left: AccRef<Vec<String>> = Arc::new(ArgumentAcc::fresh(1));
        let right: AccRef<Vec<String>> = Arc::new(ArgumentAcc::fresh(2));
        let acc = OrElseAcc::new(left, right);

        // Both branches still accept a first token.
        let acc = acc.parse_arg("first").unwrap();
        assert_eq!(
            acc.result(),
            Outcome::Success(vec!["first".to_string()])
        );

        // Only the wider branch accepts a second; the choice resolves.
        let acc = acc.parse_arg("second").unwrap();
        assert_eq!(
            acc.result(),
            Outcome::Success(vec!["first".to_string(), "second".to_string()])
        );
        assert!(acc.parse_arg("third").is_none());
    }

    #[test]
    fn or_else_left_subcommand_wins() {
        let left: AccRef<Vec<String>> = Arc::new(SubcommandAcc::new(
            "run".to_string(),
            Arc::new(ArgumentAcc::fresh(1)),
        ));
        let right: AccRef<Vec<String>> = Arc::new(SubcommandAcc::new(
            "run".to_string(),
            Arc::new(ArgumentAcc::fresh(2)),
        ));
        let acc = OrElseAcc::new(left, right);

        let acc = acc.parse_sub("run").unwrap();
        let acc = acc.parse_arg("once").unwrap();

        assert!(acc.parse_arg("twice").is_none());
    }

    #[test]
    fn unmatched_probes_leave_state_unchanged() {
        let acc = pair(regular("file"), regular("output"));
        let before = acc.result();

        assert!(matches!(
            acc.parse_option(&Name::Long("moot".to_string())),
            OptionMatch::Unmatched
        ));
        assert!(acc.parse_arg("moot").is_none());
        assert!(acc.parse_sub("moot").is_none());
        assert_eq!(acc.result(), before);
    }

    #[test]
    fn validate_runs_at_finalization() {
        // Setup
        let inner = regular("count");
        let acc = ValidateAcc::new(
            inner,
            Arc::new(|values: Vec<String>| match values.last() {
                Some(value) if value == "ok" => Outcome::Success(true),
                Some(value) => Outcome::failure(format!("bad value: {value}")),
                None => Outcome::missing(),
            }),
        );

        // Execute & verify
        let next = apply_value(acc.parse_option(&Name::Long("count".to_string())), "nope");
        assert_eq!(
            next.result(),
            Outcome::Failure(vec!["bad value: nope".to_string()])
        );

        let next = apply_value(next.parse_option(&Name::Long("count".to_string())), "ok");
        assert_eq!(next.result(), Outcome::Success(true));
    }

    #[test]
    fn subcommand_matches_name_once() {
        let acc = SubcommandAcc::new("run".to_string(), regular("file"));

        assert!(acc.parse_sub("walk").is_none());
        assert_eq!(
            acc.result(),
            Outcome::Missing(vec![Requirement::command("run")])
        );

        let inner = acc.parse_sub("run").unwrap();
        assert!(matches!(
            inner.parse_option(&Name::Long("file".to_string())),
            OptionMatch::Value(_)
        ));
    }
}
