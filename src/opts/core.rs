use std::sync::Arc;

use crate::accumulator::{
    AccRef, AppAcc, ArgumentAcc, CombineFn, FlagAcc, OrElseAcc, PureAcc, RegularAcc,
    SubcommandAcc, ValidateAcc, ValidateFn,
};
use crate::model::{Command, Name};
use crate::outcome::Outcome;
use crate::parser::Usage;

/// A declarative description of the options a command accepts.
///
/// An `Opts<A>` is an immutable tree built with the constructors and
/// combinators in this module; parsing it against an argument vector yields
/// an `A`. Cloning is cheap (the tree is shared), and one description may
/// back any number of concurrent parses.
pub struct Opts<A> {
    node: Arc<dyn OptsNode<A>>,
}

impl<A> Clone for Opts<A> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }
}

impl<A> std::fmt::Debug for Opts<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Opts{..}").finish()
    }
}

impl<A> Opts<A> {
    pub(crate) fn wrap(node: impl OptsNode<A> + 'static) -> Self {
        Self {
            node: Arc::new(node),
        }
    }

    /// Produce a fresh accumulator for one parse.
    pub(crate) fn build(&self) -> AccRef<A> {
        self.node.build()
    }

    /// Collect the usage documentation rows for help rendering.
    pub(crate) fn document(&self, usage: &mut Usage) {
        self.node.document(usage);
    }
}

pub(crate) trait OptsNode<A>: Send + Sync {
    fn build(&self) -> AccRef<A>;
    fn document(&self, usage: &mut Usage);
}

pub(super) struct PureNode<A> {
    pub(super) value: A,
}

impl<A: Clone + Send + Sync + 'static> OptsNode<A> for PureNode<A> {
    fn build(&self) -> AccRef<A> {
        Arc::new(PureAcc::new(Outcome::Success(self.value.clone())))
    }

    fn document(&self, _usage: &mut Usage) {}
}

pub(super) struct AppNode<X, Y, A> {
    pub(super) combine: CombineFn<X, Y, A>,
    pub(super) left: Opts<X>,
    pub(super) right: Opts<Y>,
}

impl<X, Y, A> OptsNode<A> for AppNode<X, Y, A>
where
    X: Clone + Send + Sync + 'static,
    Y: Clone + Send + Sync + 'static,
    A: Clone + Send + Sync + 'static,
{
    fn build(&self) -> AccRef<A> {
        Arc::new(AppAcc::new(
            self.combine.clone(),
            self.left.build(),
            self.right.build(),
        ))
    }

    fn document(&self, usage: &mut Usage) {
        self.left.document(usage);
        self.right.document(usage);
    }
}

pub(super) struct OrElseNode<A> {
    pub(super) left: Opts<A>,
    pub(super) right: Opts<A>,
}

impl<A: Clone + Send + Sync + 'static> OptsNode<A> for OrElseNode<A> {
    fn build(&self) -> AccRef<A> {
        Arc::new(OrElseAcc::new(self.left.build(), self.right.build()))
    }

    fn document(&self, usage: &mut Usage) {
        self.left.document(usage);
        self.right.document(usage);
    }
}

pub(super) struct ValidateNode<X, A> {
    pub(super) inner: Opts<X>,
    pub(super) validate: ValidateFn<X, A>,
}

impl<X, A> OptsNode<A> for ValidateNode<X, A>
where
    X: Clone + Send + Sync + 'static,
    A: Clone + Send + Sync + 'static,
{
    fn build(&self) -> AccRef<A> {
        Arc::new(ValidateAcc::new(self.inner.build(), self.validate.clone()))
    }

    fn document(&self, usage: &mut Usage) {
        self.inner.document(usage);
    }
}

pub(super) struct SubcommandNode<A> {
    pub(super) command: Command<A>,
}

impl<A: Clone + Send + Sync + 'static> OptsNode<A> for SubcommandNode<A> {
    fn build(&self) -> AccRef<A> {
        Arc::new(SubcommandAcc::new(
            self.command.name().to_string(),
            self.command.opts().build(),
        ))
    }

    fn document(&self, usage: &mut Usage) {
        usage.command(
            self.command.name().to_string(),
            self.command.header().to_string(),
        );
    }
}

pub(super) struct SingleRegularNode {
    pub(super) names: Vec<Name>,
    pub(super) metavar: String,
    pub(super) help: Option<String>,
}

impl OptsNode<String> for SingleRegularNode {
    fn build(&self) -> AccRef<String> {
        let inner: AccRef<Vec<String>> = Arc::new(RegularAcc::fresh(self.names.clone()));
        Arc::new(ValidateAcc::new(
            inner,
            Arc::new(|mut values: Vec<String>| match values.pop() {
                Some(last) => Outcome::Success(last),
                // A regular leaf never succeeds with an empty list, so
                // `and_then` cannot reach this arm.
                None => Outcome::missing(),
            }),
        ))
    }

    fn document(&self, usage: &mut Usage) {
        usage.option(
            self.names.clone(),
            Some(self.metavar.clone()),
            self.help.clone(),
            false,
        );
    }
}

pub(super) struct RepeatedRegularNode {
    pub(super) names: Vec<Name>,
    pub(super) metavar: String,
    pub(super) help: Option<String>,
}

impl OptsNode<Vec<String>> for RepeatedRegularNode {
    fn build(&self) -> AccRef<Vec<String>> {
        Arc::new(RegularAcc::fresh(self.names.clone()))
    }

    fn document(&self, usage: &mut Usage) {
        usage.option(
            self.names.clone(),
            Some(self.metavar.clone()),
            self.help.clone(),
            true,
        );
    }
}

pub(super) struct SingleFlagNode {
    pub(super) names: Vec<Name>,
    pub(super) help: Option<String>,
}

impl OptsNode<()> for SingleFlagNode {
    fn build(&self) -> AccRef<()> {
        let inner: AccRef<usize> = Arc::new(FlagAcc::fresh(self.names.clone()));
        Arc::new(ValidateAcc::new(
            inner,
            Arc::new(|_count| Outcome::Success(())),
        ))
    }

    fn document(&self, usage: &mut Usage) {
        usage.option(self.names.clone(), None, self.help.clone(), false);
    }
}

pub(super) struct RepeatedFlagNode {
    pub(super) names: Vec<Name>,
    pub(super) help: Option<String>,
}

impl OptsNode<usize> for RepeatedFlagNode {
    fn build(&self) -> AccRef<usize> {
        Arc::new(FlagAcc::fresh(self.names.clone()))
    }

    fn document(&self, usage: &mut Usage) {
        usage.option(self.names.clone(), None, self.help.clone(), true);
    }
}

pub(super) struct SingleArgumentNode {
    pub(super) metavar: String,
}

impl OptsNode<String> for SingleArgumentNode {
    fn build(&self) -> AccRef<String> {
        let inner: AccRef<Vec<String>> = Arc::new(ArgumentAcc::fresh(1));
        Arc::new(ValidateAcc::new(
            inner,
            Arc::new(|values: Vec<String>| match values.into_iter().next() {
                Some(first) => Outcome::Success(first),
                // An argument leaf never succeeds with an empty list, so
                // `and_then` cannot reach this arm.
                None => Outcome::missing(),
            }),
        ))
    }

    fn document(&self, usage: &mut Usage) {
        usage.argument(self.metavar.clone(), false);
    }
}

pub(super) struct RepeatedArgumentNode {
    pub(super) metavar: String,
}

impl OptsNode<Vec<String>> for RepeatedArgumentNode {
    fn build(&self) -> AccRef<Vec<String>> {
        Arc::new(ArgumentAcc::fresh(usize::MAX))
    }

    fn document(&self, usage: &mut Usage) {
        usage.argument(self.metavar.clone(), true);
    }
}
