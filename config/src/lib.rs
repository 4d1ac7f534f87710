//! File-backed option-table definitions for `opt-table-core`.
//!
//! A [`TableDefinition`] is the serializable form of an option table: a list
//! of [`OptionDefinition`] entries plus a [`HelpConfig`] layout. Definitions
//! are read from and written to JSON or YAML (picked by file extension) and
//! converted into a validated [`OptTable`](opt_table_core::OptTable) with
//! [`TableDefinition::build_table`].
//!
//! # Quick start
//!
//! ```no_run
//! use opt_table_config::TableDefinition;
//! use opt_table_core::HelpSettings;
//!
//! let definition = TableDefinition::load("cc-options.yaml").unwrap();
//! let table = definition.build_table().unwrap();
//!
//! let settings = HelpSettings::from(&definition.help);
//! print!("{}", table.help(&settings).unwrap());
//! ```

mod definition;
mod error;
mod help;
mod loader;

pub use definition::{
    DEFINITION_VERSION, FlagName, KindDefinition, OptionDefinition, TableDefinition,
};
pub use error::{ConfigError, Result};
pub use help::HelpConfig;
pub use loader::Format;
