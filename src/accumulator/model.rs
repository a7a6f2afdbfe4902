use std::sync::Arc;

use crate::accumulator::{AccRef, Accumulator, OptionMatch};
use crate::model::Name;
use crate::outcome::Outcome;

/// Collected occurrences of a value option; occurrences stay in input order.
#[derive(Debug)]
pub(crate) struct RegularAcc {
    names: Vec<Name>,
    values: Vec<String>,
}

impl RegularAcc {
    pub(crate) fn fresh(names: Vec<Name>) -> Self {
        Self {
            names,
            values: Vec::default(),
        }
    }
}

impl Accumulator<Vec<String>> for RegularAcc {
    fn parse_option(&self, name: &Name) -> OptionMatch<Vec<String>> {
        if !self.names.contains(name) {
            return OptionMatch::Unmatched;
        }

        let names = self.names.clone();
        let values = self.values.clone();
        OptionMatch::Value(Box::new(move |value| {
            let mut values = values;
            values.push(value);
            let next: AccRef<Vec<String>> = Arc::new(RegularAcc { names, values });
            next
        }))
    }

    fn parse_arg(&self, _arg: &str) -> Option<AccRef<Vec<String>>> {
        None
    }

    fn parse_sub(&self, _name: &str) -> Option<AccRef<Vec<String>>> {
        None
    }

    fn result(&self) -> Outcome<Vec<String>> {
        if self.values.is_empty() {
            match self.names.first() {
                Some(name) => Outcome::missing_flag(name.clone()),
                None => Outcome::missing(),
            }
        } else {
            Outcome::Success(self.values.clone())
        }
    }
}

/// Occurrence count of a flag.
#[derive(Debug)]
pub(crate) struct FlagAcc {
    names: Vec<Name>,
    count: usize,
}

impl FlagAcc {
    pub(crate) fn fresh(names: Vec<Name>) -> Self {
        Self { names, count: 0 }
    }
}

impl Accumulator<usize> for FlagAcc {
    fn parse_option(&self, name: &Name) -> OptionMatch<usize> {
        if self.names.contains(name) {
            OptionMatch::Flag(Arc::new(FlagAcc {
                names: self.names.clone(),
                count: self.count + 1,
            }))
        } else {
            OptionMatch::Unmatched
        }
    }

    fn parse_arg(&self, _arg: &str) -> Option<AccRef<usize>> {
        None
    }

    fn parse_sub(&self, _name: &str) -> Option<AccRef<usize>> {
        None
    }

    fn result(&self) -> Outcome<usize> {
        if self.count == 0 {
            match self.names.first() {
                Some(name) => Outcome::missing_flag(name.clone()),
                None => Outcome::missing(),
            }
        } else {
            Outcome::Success(self.count)
        }
    }
}

/// Positional tokens collected up to `limit`, in input order.
#[derive(Debug)]
pub(crate) struct ArgumentAcc {
    limit: usize,
    values: Vec<String>,
}

impl ArgumentAcc {
    pub(crate) fn fresh(limit: usize) -> Self {
        Self {
            limit,
            values: Vec::default(),
        }
    }
}

impl Accumulator<Vec<String>> for ArgumentAcc {
    fn parse_option(&self, _name: &Name) -> OptionMatch<Vec<String>> {
        OptionMatch::Unmatched
    }

    fn parse_arg(&self, arg: &str) -> Option<AccRef<Vec<String>>> {
        if self.values.len() < self.limit {
            let mut values = self.values.clone();
            values.push(arg.to_string());
            let next: AccRef<Vec<String>> = Arc::new(ArgumentAcc {
                limit: self.limit,
                values,
            });
            Some(next)
        } else {
            None
        }
    }

    fn parse_sub(&self, _name: &str) -> Option<AccRef<Vec<String>>> {
        None
    }

    fn result(&self) -> Outcome<Vec<String>> {
        if self.values.is_empty() {
            Outcome::missing_argument()
        } else {
            Outcome::Success(self.values.clone())
        }
    }
}
