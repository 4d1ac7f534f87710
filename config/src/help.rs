//! Serializable help layout.

use opt_table_core::HelpSettings;
use serde::{Deserialize, Serialize};

use crate::definition::{FlagName, flag_set};

/// Help layout as written in a definition file.
///
/// Unset fields keep the [`HelpSettings`] default. `exclude_flags` defaults
/// to `[hidden]`; set it to `[]` to list hidden options too.
///
/// # Examples
///
/// ```
/// use opt_table_config::HelpConfig;
/// use opt_table_core::{HelpSettings, OptionFlags};
///
/// let config: HelpConfig = serde_yaml::from_str("max_line_length: 100\nexclude_flags: []").unwrap();
/// let settings = HelpSettings::from(&config);
/// assert_eq!(settings.max_line_length, 100);
/// assert_eq!(settings.name_column_width, 30);
/// assert_eq!(settings.flags_to_exclude, OptionFlags::empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelpConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_column_width: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_line_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_meta_var: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_help_group: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_flags: Vec<FlagName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_flags: Option<Vec<FlagName>>,
}

impl From<&HelpConfig> for HelpSettings {
    fn from(config: &HelpConfig) -> Self {
        let mut settings = HelpSettings::default().including(flag_set(&config.include_flags));
        if let Some(indent) = &config.indent {
            settings.indent = indent.clone();
        }
        if let Some(width) = config.name_column_width {
            settings.name_column_width = width;
        }
        if let Some(length) = config.max_line_length {
            settings.max_line_length = length;
        }
        if let Some(meta_var) = &config.default_meta_var {
            settings.default_meta_var = meta_var.clone();
        }
        if let Some(title) = &config.default_help_group {
            settings.default_help_group = title.clone();
        }
        if let Some(exclude) = &config.exclude_flags {
            settings.flags_to_exclude = flag_set(exclude);
        }
        settings
    }
}
