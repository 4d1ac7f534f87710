//! Table-driven command-line argument parsing.
//!
//! This crate recognizes argument vectors against a static table of option
//! definitions, in the style of compiler drivers:
//!
//! - [`OptionDef`] — one option: its id, prefixes, name, and matching rule
//!   ([`OptionVariant`]: flag, joined, separate, joined-or-separate,
//!   multi-arg, comma-joined, remaining-args, plus the Input, Unknown, and
//!   Group roles).
//! - [`OptTableBuilder`] — collects options and seals them into an
//!   [`OptTable`], adding an Unknown fallback when none was given.
//! - [`OptTable`] — validated, immutable table. [`OptTable::parse_args`]
//!   turns tokens into an [`ArgumentList`]; [`OptTable::help`] renders a help
//!   listing; [`OptTable::render_args`] turns args back into tokens.
//! - [`ArgumentList`] / [`Arg`] — parse results with claim tracking, so a
//!   driver can report every argument nobody asked for.
//!
//! Parsing never fails outright. Tokens nothing recognizes bind to the
//! Unknown option, and an option that runs out of trailing values stops the
//! parse with a [`MissingArgs`] diagnostic next to the partial result.
//!
//! # Example
//!
//! ```
//! use opt_table_core::*;
//!
//! const INPUT: i32 = 1;
//! const VERBOSE: i32 = 2;
//! const OUTPUT: i32 = 3;
//! const INCLUDE: i32 = 4;
//!
//! let table = OptTableBuilder::new()
//!     .input(INPUT)
//!     .flag(VERBOSE, ["-", "--"], "verbose")
//!     .separate(OUTPUT, "-", "o")
//!     .joined_or_separate(INCLUDE, "-", "I")
//!     .build()
//!     .unwrap();
//!
//! let mut args = table
//!     .parse_args(&["main.c", "-Iinclude", "--verbose", "-o", "main.o", "-x"])
//!     .into_result()
//!     .unwrap();
//!
//! assert!(args.has_arg(VERBOSE));
//! assert_eq!(args.get_last_arg_value(OUTPUT), Some("main.o"));
//! assert_eq!(args.get_all_arg_values(INCLUDE), vec!["include"]);
//! assert_eq!(args.get_all_arg_values(INPUT), vec!["main.c"]);
//!
//! let leftover: Vec<&str> = args.unclaimed().map(Arg::spelling).collect();
//! assert_eq!(leftover, vec!["-x"]);
//! ```

mod arg;
mod builder;
mod error;
mod help;
mod option;
mod ordering;
mod specifier;
mod table;

pub use arg::{Arg, ArgumentList};
pub use builder::OptTableBuilder;
pub use error::{HelpError, TableError, ValueError};
pub use help::HelpSettings;
pub use option::{
    INPUT_NAME, IntoPrefixes, OptionDef, OptionFlags, OptionKind, OptionVariant, RenderStyle,
    UNKNOWN_NAME,
};
pub use ordering::compare_name_ignore_case;
pub use specifier::{OptIds, OptSpecifier};
pub use table::{MissingArgs, OptTable, ParsedArgs};
