//! `argot` is a declarative command line parser for Rust.
//!
//! Instead of registering parameters against a mutable parser object, an
//! `argot` program *describes* the options it accepts as a plain value — an
//! [`Opts`] — and composes small descriptions into bigger ones with ordinary
//! combinators. Parsing the description against an argument vector yields
//! the typed result directly; there is no intermediate map of matches to
//! interrogate. Specifically, `argot` prioritizes the following design
//! concerns:
//! * *Descriptions are values*:
//! An [`Opts`] can be stored, cloned cheaply, shared between commands, and
//! parsed any number of times, concurrently if desired.
//! * *Typed results*:
//! The result type of the parse is carried by the description, so the value
//! handed back is already the shape the program wants — a struct, an enum
//! variant per sub-command, a `Vec` of positionals.
//! * *Composition over configuration*:
//! Products ([`Opts::and`], [`Opts::map2`]) combine independent parameters;
//! alternatives ([`Opts::or`]) choose between branches; refinements
//! ([`Opts::validate`], [`Opts::parse`]) reject domain-invalid input before
//! the program sees it.
//! * *Detailed yet basic UX*:
//! Errors and missing-parameter reports accumulate rather than stopping at
//! the first problem, and render alongside the usage documentation. We do
//! not aim to support rich display configurations, such as colour output or
//! shell completions.
//!
//! # Usage
//!
//! Describe the options, name the command, parse:
//!
//! ```
//! use argot::{Command, Opts};
//!
//! let opts = Opts::option("file", 'f', "FILE", "The input file.")
//!     .and(
//!         Opts::flag("verbose", 'v', "Print more detail.")
//!             .map(|_| true)
//!             .with_default(false),
//!     );
//! let command = Command::new("demo", "A demonstration.", opts);
//!
//! let (file, verbose) = command.parse(["--file=data.txt", "-v"]).unwrap();
//! assert_eq!(file, "data.txt");
//! assert!(verbose);
//! ```
//!
//! # Cli Semantics
//!
//! * A value option matches `--name VALUE`, `--name=VALUE`, `-n VALUE` and
//! `-nVALUE`.
//! * Short options combine into clusters: `-abc` is `--apple --banana
//! --carrot`, and if the final short option takes a value, the rest of the
//! cluster (or the next token) is that value.
//! * `--` alone ends option matching; every later token is positional.
//! * Positional arguments fill left-to-right across a product.
//! * An option name claimed by two independent sides of a product is
//! reported as ambiguous rather than silently assigned.
//!
//! # Sub-commands
//!
//! A sub-command is itself a [`Command`], lifted into a description with
//! [`Opts::subcommand`] and usually mapped onto a variant per branch. Once
//! its name is seen on the command line, the sub-command owns every
//! remaining token:
//!
//! ```
//! use argot::{Command, Opts};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Invocation {
//!     Status { all: bool },
//!     Fetch { remote: String },
//! }
//!
//! let status = Command::new(
//!     "status",
//!     "Show the status.",
//!     Opts::flag("all", 'a', "Include everything.")
//!         .map(|_| true)
//!         .with_default(false)
//!         .map(|all| Invocation::Status { all }),
//! );
//! let fetch = Command::new(
//!     "fetch",
//!     "Fetch a remote.",
//!     Opts::argument("REMOTE").map(|remote| Invocation::Fetch { remote }),
//! );
//! let tool = Command::new(
//!     "tool",
//!     "A tiny program.",
//!     Opts::subcommand(status).or(Opts::subcommand(fetch)),
//! );
//!
//! assert_eq!(
//!     tool.parse(["status", "-a"]).unwrap(),
//!     Invocation::Status { all: true }
//! );
//! ```
//!
//! # Errors and help
//!
//! [`Command::parse`] returns `Err(Help)` when the vector does not satisfy
//! the description. The [`Help`] carries the error messages — unexpected
//! tokens, failed validations, and the combined report of everything still
//! missing — plus the usage documentation, and prints via `Display`:
//!
//! ```
//! use argot::{Command, Opts};
//!
//! let command = Command::new(
//!     "demo",
//!     "A demonstration.",
//!     Opts::option("file", 'f', "FILE", "The input file."),
//! );
//!
//! let help = command.parse(Vec::<String>::new()).unwrap_err();
//! assert_eq!(help.errors(), ["Missing expected flag --file"]);
//! ```
//!
//! # Features
//! * `debug`: internal `tracing` output from the token scanner.

mod accumulator;
mod model;
mod opts;
mod outcome;
mod parser;

pub use model::{Command, Name};
pub use opts::Opts;
pub use outcome::{Outcome, Requirement};
pub use parser::Help;
