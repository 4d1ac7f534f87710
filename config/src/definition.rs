//! Serializable option-table definitions.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! name: cc
//! options:
//!   - { id: 1, kind: input }
//!   - { id: 2, kind: group, name: general, help: "General options" }
//!   - { id: 3, kind: flag, prefixes: ["-", "--"], name: verbose, help: "Be chatty", group: 2 }
//!   - { id: 4, kind: joined-or-separate, prefixes: ["-"], name: I, meta_var: "<dir>" }
//!   - { id: 5, kind: multi-arg, prefixes: ["-"], name: pair, arg_count: 2 }
//!   - { id: 6, kind: flag, prefixes: ["/"], name: v, alias: 3 }
//! ```

use opt_table_core::{OptTable, OptTableBuilder, OptionDef, OptionFlags, OptionVariant};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::help::HelpConfig;

/// Format version written by [`TableDefinition::new`].
pub const DEFINITION_VERSION: &str = "1.0";

fn default_version() -> String {
    DEFINITION_VERSION.to_string()
}

/// Matching rule of an option entry, spelled in kebab-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KindDefinition {
    Unknown,
    Input,
    Group,
    Flag,
    Joined,
    Separate,
    JoinedOrSeparate,
    MultiArg,
    CommaJoined,
    RemainingArgs,
}

impl KindDefinition {
    fn is_special(self) -> bool {
        matches!(self, Self::Unknown | Self::Input | Self::Group)
    }
}

impl From<OptionVariant> for KindDefinition {
    fn from(variant: OptionVariant) -> Self {
        match variant {
            OptionVariant::Unknown => Self::Unknown,
            OptionVariant::Input => Self::Input,
            OptionVariant::Group => Self::Group,
            OptionVariant::Flag => Self::Flag,
            OptionVariant::Joined => Self::Joined,
            OptionVariant::Separate => Self::Separate,
            OptionVariant::JoinedOrSeparate => Self::JoinedOrSeparate,
            OptionVariant::MultiArg { .. } => Self::MultiArg,
            OptionVariant::CommaJoined => Self::CommaJoined,
            OptionVariant::RemainingArgs => Self::RemainingArgs,
        }
    }
}

/// Named option flag, spelled in kebab-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlagName {
    RenderJoined,
    RenderSeparate,
    Hidden,
}

impl From<FlagName> for OptionFlags {
    fn from(name: FlagName) -> Self {
        match name {
            FlagName::RenderJoined => OptionFlags::RENDER_JOINED,
            FlagName::RenderSeparate => OptionFlags::RENDER_SEPARATE,
            FlagName::Hidden => OptionFlags::HIDDEN,
        }
    }
}

/// Folds a list of flag names into one flag set.
pub(crate) fn flag_set(names: &[FlagName]) -> OptionFlags {
    names
        .iter()
        .fold(OptionFlags::empty(), |acc, &name| acc | OptionFlags::from(name))
}

fn flag_names(flags: OptionFlags) -> Vec<FlagName> {
    [FlagName::RenderJoined, FlagName::RenderSeparate, FlagName::Hidden]
        .into_iter()
        .filter(|&name| flags.contains(name.into()))
        .collect()
}

/// One option entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDefinition {
    pub id: i32,
    pub kind: KindDefinition,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefixes: Vec<String>,
    /// Required for every kind except `input` and `unknown`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_var: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<i32>,
    /// Required for `multi-arg`, rejected elsewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagName>,
}

impl OptionDefinition {
    /// Creates a bare entry with no name, prefixes, or attributes.
    pub fn new(id: i32, kind: KindDefinition) -> Self {
        Self {
            id,
            kind,
            prefixes: Vec::new(),
            name: None,
            help: None,
            meta_var: None,
            alias: None,
            group: None,
            arg_count: None,
            flags: Vec::new(),
        }
    }

    /// Converts the entry into a core [`OptionDef`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDefinition`] when a named kind has no
    /// `name`, a multi-arg entry has no `arg_count`, or an entry sets a field
    /// its kind cannot use.
    pub fn to_option(&self) -> Result<OptionDef> {
        let invalid = |what: &str| {
            ConfigError::InvalidDefinition(format!("option {} ({:?}): {what}", self.id, self.kind))
        };

        if self.kind.is_special() && !self.prefixes.is_empty() {
            return Err(invalid("prefixes are not allowed"));
        }
        if self.arg_count.is_some() && self.kind != KindDefinition::MultiArg {
            return Err(invalid("arg_count is only allowed for multi-arg"));
        }

        let name = match (self.kind, self.name.as_deref()) {
            (KindDefinition::Unknown | KindDefinition::Input, Some(_)) => {
                return Err(invalid("name is not allowed"));
            }
            (KindDefinition::Unknown | KindDefinition::Input, None) => "",
            (_, Some(name)) => name,
            (_, None) => return Err(invalid("missing name")),
        };
        let prefixes = self.prefixes.clone();

        let option = match self.kind {
            KindDefinition::Unknown => OptionDef::unknown(self.id),
            KindDefinition::Input => OptionDef::input(self.id),
            KindDefinition::Group => OptionDef::group(self.id, name),
            KindDefinition::Flag => OptionDef::flag(self.id, prefixes, name),
            KindDefinition::Joined => OptionDef::joined(self.id, prefixes, name),
            KindDefinition::Separate => OptionDef::separate(self.id, prefixes, name),
            KindDefinition::JoinedOrSeparate => {
                OptionDef::joined_or_separate(self.id, prefixes, name)
            }
            KindDefinition::MultiArg => {
                let count = self.arg_count.ok_or_else(|| invalid("missing arg_count"))?;
                OptionDef::multi_arg(self.id, prefixes, name, count)
            }
            KindDefinition::CommaJoined => OptionDef::comma_joined(self.id, prefixes, name),
            KindDefinition::RemainingArgs => OptionDef::remaining_args(self.id, prefixes, name),
        };

        let mut option = option.with_flags(flag_set(&self.flags));
        if let Some(help) = &self.help {
            option = option.with_help(help.clone());
        }
        if let Some(meta_var) = &self.meta_var {
            option = option.with_meta_var(meta_var.clone());
        }
        if let Some(alias) = self.alias {
            option = option.alias_of(alias);
        }
        if let Some(group) = self.group {
            option = option.in_group(group);
        }
        Ok(option)
    }
}

impl From<&OptionDef> for OptionDefinition {
    fn from(option: &OptionDef) -> Self {
        let kind = KindDefinition::from(option.variant());
        let name = match kind {
            KindDefinition::Unknown | KindDefinition::Input => None,
            _ => Some(option.name().to_string()),
        };
        let arg_count = match option.variant() {
            OptionVariant::MultiArg { count } => Some(count),
            _ => None,
        };

        Self {
            id: option.id().id(),
            kind,
            prefixes: option.prefixes().to_vec(),
            name,
            help: option.help_text().map(String::from),
            meta_var: option.meta_var().map(String::from),
            alias: option.alias().map(|id| id.id()),
            group: option.group_id().map(|id| id.id()),
            arg_count,
            flags: flag_names(option.flags()),
        }
    }
}

/// A complete option table with its help layout.
///
/// # Examples
///
/// ```
/// use opt_table_config::TableDefinition;
///
/// let yaml = r#"
/// name: demo
/// options:
///   - { id: 1, kind: flag, prefixes: ["-"], name: v, help: "Verbose" }
///   - { id: 2, kind: separate, prefixes: ["-"], name: o, meta_var: "<file>", help: "Output" }
/// "#;
///
/// let definition = TableDefinition::from_yaml_str(yaml).unwrap();
/// let table = definition.build_table().unwrap();
///
/// let mut args = table.parse_args(&["-o", "a.out"]).into_result().unwrap();
/// assert_eq!(args.get_last_arg_value(2), Some("a.out"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Definition format version (e.g. `"1.0"`).
    #[serde(default = "default_version")]
    pub version: String,
    /// Optional display name of the tool the table belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Help layout; every field falls back to the built-in default.
    #[serde(default)]
    pub help: HelpConfig,
    /// Option entries in registration order.
    pub options: Vec<OptionDefinition>,
}

impl Default for TableDefinition {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDefinition {
    pub fn new() -> Self {
        Self {
            version: default_version(),
            name: None,
            help: HelpConfig::default(),
            options: Vec::new(),
        }
    }

    /// Captures the options of a built table, in registration order.
    ///
    /// The table's synthesized Unknown option is included.
    pub fn from_table(table: &OptTable) -> Self {
        Self {
            options: table.defined_options().map(OptionDefinition::from).collect(),
            ..Self::new()
        }
    }

    /// Converts every entry and builds the table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDefinition`] for a malformed entry, or
    /// [`ConfigError::Table`] if the entries violate a table invariant.
    pub fn build_table(&self) -> Result<OptTable> {
        let mut builder = OptTableBuilder::new();
        for entry in &self.options {
            builder = builder.add(entry.to_option()?);
        }
        let table = builder.build()?;
        debug!(
            name = self.name.as_deref().unwrap_or_default(),
            options = table.len(),
            "built table from definition"
        );
        Ok(table)
    }
}
