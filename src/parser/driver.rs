use std::collections::VecDeque;

use thiserror::Error;

#[cfg(feature = "debug")]
use tracing::debug;

use crate::accumulator::{AccRef, OptionMatch};
use crate::model::{Command, Name};
use crate::outcome::{Outcome, Requirement};
use crate::parser::Help;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum TokenError {
    #[error("Unexpected option: --{0}")]
    UnexpectedLong(String),

    #[error("Unexpected option: -{0}")]
    UnexpectedShort(char),

    #[error("Ambiguous option: --{0}")]
    AmbiguousLong(String),

    #[error("Ambiguous option: -{0}")]
    AmbiguousShort(char),

    #[error("Got unexpected value for flag: --{0}")]
    UnexpectedFlagValue(String),

    #[error("Missing value for option: --{0}")]
    MissingLongValue(String),

    #[error("Missing value for option: -{0}")]
    MissingShortValue(char),

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),
}

/// Walk the argument vector left-to-right, dispatching each token into the
/// accumulator, then force the final result.
///
/// 1. `--name=value` and `--name` match long options.
/// 2. `--` alone switches to positional-only matching.
/// 3. `-abc` matches a cluster of short options, character by character.
/// 4. Anything else is a sub-command if one is live, else a positional.
pub(crate) fn consume_all<A: Clone + Send + Sync + 'static>(
    command: &Command<A>,
    arguments: Vec<String>,
) -> Result<A, Help> {
    let mut accumulator = command.opts().build();
    let mut remaining: VecDeque<String> = arguments.into();
    let mut positional_only = false;

    while let Some(token) = remaining.pop_front() {
        if positional_only {
            accumulator = consume_bare(command, accumulator, token, positional_only)?;
            continue;
        }

        if token == "--" {
            #[cfg(feature = "debug")]
            {
                debug!("Separator '--': switching to positional-only matching.");
            }

            positional_only = true;
            continue;
        }

        if let Some(body) = token.strip_prefix("--") {
            accumulator = match body.split_once('=') {
                Some((name, value)) => consume_long_value(command, accumulator, name, value)?,
                None => consume_long(command, accumulator, body, &mut remaining)?,
            };
            continue;
        }

        // A lone '-' is an ordinary positional token.
        if token.len() > 1 {
            if let Some(cluster) = token.strip_prefix('-') {
                accumulator =
                    consume_short_cluster(command, accumulator, cluster, &mut remaining)?;
                continue;
            }
        }

        accumulator = consume_bare(command, accumulator, token, positional_only)?;
    }

    finalize(command, accumulator)
}

fn consume_long_value<A>(
    command: &Command<A>,
    accumulator: AccRef<A>,
    name: &str,
    value: &str,
) -> Result<AccRef<A>, Help> {
    match accumulator.parse_option(&Name::Long(name.to_string())) {
        OptionMatch::Value(next) => Ok(next(value.to_string())),
        OptionMatch::Flag(_) => Err(fail(
            command,
            TokenError::UnexpectedFlagValue(name.to_string()),
        )),
        OptionMatch::Unmatched => Err(fail(command, TokenError::UnexpectedLong(name.to_string()))),
        OptionMatch::Ambiguous => Err(fail(command, TokenError::AmbiguousLong(name.to_string()))),
    }
}

fn consume_long<A>(
    command: &Command<A>,
    accumulator: AccRef<A>,
    name: &str,
    remaining: &mut VecDeque<String>,
) -> Result<AccRef<A>, Help> {
    match accumulator.parse_option(&Name::Long(name.to_string())) {
        OptionMatch::Flag(next) => Ok(next),
        OptionMatch::Value(next) => match remaining.pop_front() {
            Some(value) => Ok(next(value)),
            None => Err(fail(command, TokenError::MissingLongValue(name.to_string()))),
        },
        OptionMatch::Unmatched => Err(fail(command, TokenError::UnexpectedLong(name.to_string()))),
        OptionMatch::Ambiguous => Err(fail(command, TokenError::AmbiguousLong(name.to_string()))),
    }
}

fn consume_short_cluster<A>(
    command: &Command<A>,
    mut accumulator: AccRef<A>,
    cluster: &str,
    remaining: &mut VecDeque<String>,
) -> Result<AccRef<A>, Help> {
    let characters: Vec<char> = cluster.chars().collect();
    let mut index = 0;

    while index < characters.len() {
        let short = characters[index];

        match accumulator.parse_option(&Name::Short(short)) {
            OptionMatch::Unmatched => {
                return Err(fail(command, TokenError::UnexpectedShort(short)));
            }
            OptionMatch::Ambiguous => {
                return Err(fail(command, TokenError::AmbiguousShort(short)));
            }
            OptionMatch::Flag(next) => {
                accumulator = next;
                index += 1;
            }
            OptionMatch::Value(next) => {
                // Only the final character of a cluster may take a value; a
                // non-empty remainder of the cluster is that value.
                let tail: String = characters[index + 1..].iter().collect();

                return if tail.is_empty() {
                    match remaining.pop_front() {
                        Some(value) => Ok(next(value)),
                        None => Err(fail(command, TokenError::MissingShortValue(short))),
                    }
                } else {
                    Ok(next(tail))
                };
            }
        }
    }

    Ok(accumulator)
}

fn consume_bare<A>(
    command: &Command<A>,
    accumulator: AccRef<A>,
    token: String,
    positional_only: bool,
) -> Result<AccRef<A>, Help> {
    if !positional_only {
        if let Some(next) = accumulator.parse_sub(&token) {
            #[cfg(feature = "debug")]
            {
                debug!("Token '{token}': sub-command handoff.");
            }

            return Ok(next);
        }
    }

    match accumulator.parse_arg(&token) {
        Some(next) => Ok(next),
        None => Err(fail(command, TokenError::UnexpectedArgument(token))),
    }
}

fn finalize<A: Clone + Send + Sync + 'static>(
    command: &Command<A>,
    accumulator: AccRef<A>,
) -> Result<A, Help> {
    match accumulator.result() {
        Outcome::Success(value) => Ok(value),
        Outcome::Missing(requirements) => Err(Help::from_command(command)
            .with_errors(requirements.iter().map(Requirement::message).collect())),
        Outcome::Failure(messages) => Err(Help::from_command(command).with_errors(messages)),
    }
}

fn fail<A>(command: &Command<A>, error: TokenError) -> Help {
    Help::from_command(command).with_errors(vec![error.to_string()])
}
