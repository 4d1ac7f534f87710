//! Help listing for an [`OptTable`].
//!
//! Options are listed in registration order, bucketed under the title of
//! their help group. An option without help text is folded into the entry of
//! its alias target (`-v, --verbose`), or left out if the target has no help
//! either.

use std::fmt::Write;

use indexmap::IndexMap;
use tracing::debug;

use crate::{HelpError, OptSpecifier, OptTable, OptionDef, OptionFlags, OptionKind};

/// Layout and filtering options for [`OptTable::write_help`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpSettings {
    /// Written before every option name.
    pub indent: String,
    /// Names longer than this break onto their own line.
    pub name_column_width: usize,
    /// Help text is wrapped to stay within this many columns.
    pub max_line_length: usize,
    /// Meta variable for options that don't set their own.
    pub default_meta_var: String,
    /// Title for options with no titled group.
    pub default_help_group: String,
    /// When non-empty, only options carrying one of these flags are listed.
    pub flags_to_include: OptionFlags,
    /// Options carrying any of these flags are left out.
    pub flags_to_exclude: OptionFlags,
}

impl Default for HelpSettings {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            name_column_width: 30,
            max_line_length: 80,
            default_meta_var: "<value>".to_string(),
            default_help_group: "Options".to_string(),
            flags_to_include: OptionFlags::empty(),
            flags_to_exclude: OptionFlags::HIDDEN,
        }
    }
}

impl HelpSettings {
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_name_column_width(mut self, width: usize) -> Self {
        self.name_column_width = width;
        self
    }

    pub fn with_max_line_length(mut self, length: usize) -> Self {
        self.max_line_length = length;
        self
    }

    pub fn with_default_meta_var(mut self, meta_var: impl Into<String>) -> Self {
        self.default_meta_var = meta_var.into();
        self
    }

    pub fn with_default_help_group(mut self, title: impl Into<String>) -> Self {
        self.default_help_group = title.into();
        self
    }

    pub fn including(mut self, flags: OptionFlags) -> Self {
        self.flags_to_include = flags;
        self
    }

    pub fn excluding(mut self, flags: OptionFlags) -> Self {
        self.flags_to_exclude = flags;
        self
    }

    fn is_listed(&self, option: &OptionDef) -> bool {
        let flags = option.flags();
        (self.flags_to_include.is_empty() || flags.intersects(self.flags_to_include))
            && !flags.intersects(self.flags_to_exclude)
    }
}

struct Entry {
    title: String,
    name: String,
    help: String,
}

impl OptTable {
    /// Renders the help listing into a `String`.
    ///
    /// # Examples
    ///
    /// ```
    /// use opt_table_core::{HelpSettings, OptTableBuilder, OptionDef};
    ///
    /// let table = OptTableBuilder::new()
    ///     .add(OptionDef::flag(1, "-", "v").with_help("Verbose output"))
    ///     .add(OptionDef::flag(2, "--", "verbose").alias_of(1))
    ///     .add(OptionDef::separate(3, "-", "o").with_meta_var("<file>").with_help("Output file"))
    ///     .build()
    ///     .unwrap();
    ///
    /// let help = table.help(&HelpSettings::default()).unwrap();
    /// assert_eq!(
    ///     help,
    ///     "Options:\n  -v, --verbose Verbose output\n  -o <file>     Output file\n"
    /// );
    /// ```
    pub fn help(&self, settings: &HelpSettings) -> Result<String, HelpError> {
        let mut out = String::new();
        self.write_help(&mut out, settings)?;
        Ok(out)
    }

    /// Writes the help listing to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`HelpError::Format`] if the writer fails.
    pub fn write_help<W: Write>(&self, out: &mut W, settings: &HelpSettings) -> Result<(), HelpError> {
        let entries = self.help_entries(settings);

        let column = 1 + entries
            .values()
            .map(|entry| entry.name.chars().count())
            .filter(|&len| len <= settings.name_column_width)
            .max()
            .unwrap_or(0);

        let mut groups: IndexMap<&str, Vec<&Entry>> = IndexMap::new();
        for entry in entries.values() {
            groups.entry(entry.title.as_str()).or_default().push(entry);
        }

        let help_column = settings.indent.chars().count() + column;
        let width = settings.max_line_length.saturating_sub(help_column).max(1);

        for (n, (title, entries)) in groups.iter().enumerate() {
            if n > 0 {
                writeln!(out)?;
            }
            writeln!(out, "{title}:")?;
            for entry in entries {
                let lines = wrap(&entry.help, width);
                let mut lines = lines.iter();
                write!(out, "{}{}", settings.indent, entry.name)?;
                if entry.name.chars().count() < column {
                    let pad = column - entry.name.chars().count();
                    match lines.next() {
                        Some(first) => writeln!(out, "{:pad$}{first}", "")?,
                        None => writeln!(out)?,
                    }
                } else {
                    writeln!(out)?;
                }
                for line in lines {
                    writeln!(out, "{:help_column$}{line}", "")?;
                }
            }
        }

        Ok(())
    }

    fn help_entries(&self, settings: &HelpSettings) -> IndexMap<OptSpecifier, Entry> {
        let mut entries: IndexMap<OptSpecifier, Entry> = IndexMap::new();

        for option in self.defined_options() {
            if option.kind() == OptionKind::Group || !settings.is_listed(option) {
                continue;
            }
            // Undocumented options are listed only as a variant of a documented target.
            let main = if option.help_text().is_some() {
                option
            } else {
                match option.alias().and_then(|id| self.get_option(id)) {
                    Some(target) if target.help_text().is_some() => target,
                    _ => continue,
                }
            };
            let name = match option.help_name(&settings.default_meta_var) {
                Ok(name) => name,
                Err(err) => {
                    debug!(option = %option.id(), %err, "skipping option in help");
                    continue;
                }
            };
            match entries.get_mut(&main.id()) {
                Some(entry) => {
                    entry.name.push_str(", ");
                    entry.name.push_str(&name);
                }
                None => {
                    let entry = Entry {
                        title: self.group_title(main, settings),
                        name,
                        help: main.help_text().unwrap_or_default().to_string(),
                    };
                    entries.insert(main.id(), entry);
                }
            }
        }

        entries
    }

    /// First help text found walking up the group chain of `option`.
    fn group_title(&self, option: &OptionDef, settings: &HelpSettings) -> String {
        let mut group = option.group_id().and_then(|id| self.get_option(id));
        for _ in 0..self.len() {
            let Some(current) = group else { break };
            if let Some(title) = current.help_text() {
                return title.to_string();
            }
            group = current.group_id().and_then(|id| self.get_option(id));
        }
        settings.default_help_group.clone()
    }
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OptTableBuilder;

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three four five", 15), vec!["one two three", "four five"]);
        assert_eq!(wrap("a verylongword b", 4), vec!["a", "verylongword", "b"]);
        assert!(wrap("   ", 10).is_empty());
    }

    #[test]
    fn test_hidden_options_are_excluded_by_default() {
        let table = OptTableBuilder::new()
            .add(OptionDef::flag(1, "-", "v").with_help("Verbose"))
            .add(
                OptionDef::flag(2, "-", "secret")
                    .with_help("Internal")
                    .with_flags(OptionFlags::HIDDEN),
            )
            .build()
            .unwrap();

        assert_eq!(table.help(&HelpSettings::default()).unwrap(), "Options:\n  -v Verbose\n");

        let all = HelpSettings::default().excluding(OptionFlags::empty());
        assert_eq!(
            table.help(&all).unwrap(),
            "Options:\n  -v      Verbose\n  -secret Internal\n"
        );

        let only_hidden = all.including(OptionFlags::HIDDEN);
        assert_eq!(table.help(&only_hidden).unwrap(), "Options:\n  -secret Internal\n");
    }

    #[test]
    fn test_long_names_break_onto_their_own_line() {
        let table = OptTableBuilder::new()
            .add(OptionDef::flag(1, "-", "v").with_help("Verbose"))
            .add(OptionDef::joined(2, "--", "output-file=").with_help("Output"))
            .build()
            .unwrap();

        let settings = HelpSettings::default().with_name_column_width(10);
        assert_eq!(
            table.help(&settings).unwrap(),
            "Options:\n  -v Verbose\n  --output-file=<value>\n     Output\n"
        );
    }

    #[test]
    fn test_help_text_is_wrapped_under_help_column() {
        let table = OptTableBuilder::new()
            .add(OptionDef::flag(1, "-", "v").with_help("one two three four five"))
            .build()
            .unwrap();

        let settings = HelpSettings::default().with_max_line_length(20);
        assert_eq!(
            table.help(&settings).unwrap(),
            "Options:\n  -v one two three\n     four five\n"
        );
    }

    #[test]
    fn test_groups_use_first_titled_ancestor() {
        let table = OptTableBuilder::new()
            .add(OptionDef::group(10, "general").with_help("General"))
            .add(OptionDef::group(11, "sub").in_group(10))
            .add(OptionDef::flag(1, "-", "a").with_help("A").in_group(11))
            .add(OptionDef::flag(2, "-", "b").with_help("B"))
            .build()
            .unwrap();

        assert_eq!(
            table.help(&HelpSettings::default()).unwrap(),
            "General:\n  -a A\n\nOptions:\n  -b B\n"
        );
    }

    #[test]
    fn test_unrenderable_and_undocumented_options_are_skipped() {
        let table = OptTableBuilder::new()
            .input(1)
            .add(OptionDef::multi_arg(2, "-", "pair", 2).with_help("Pair"))
            .add(OptionDef::flag(3, "-", "quiet"))
            .add(OptionDef::flag(4, "/", "q").alias_of(3))
            .add(OptionDef::separate(5, "-", "o").with_help("Output"))
            .build()
            .unwrap();

        let settings = HelpSettings::default()
            .with_indent(" ")
            .with_default_meta_var("ARG")
            .with_default_help_group("Flags");
        assert_eq!(table.help(&settings).unwrap(), "Flags:\n -o ARG Output\n");
    }

    #[test]
    fn test_alias_before_target_keeps_its_position() {
        let table = OptTableBuilder::new()
            .add(OptionDef::flag(1, "-", "a").with_help("A"))
            .add(OptionDef::flag(2, "--", "verbose").alias_of(3))
            .add(OptionDef::flag(3, "-", "v").with_help("Verbose"))
            .build()
            .unwrap();

        assert_eq!(
            table.help(&HelpSettings::default()).unwrap(),
            "Options:\n  -a            A\n  --verbose, -v Verbose\n"
        );
    }

    #[test]
    fn test_alias_of_hidden_target_is_listed_with_target_help() {
        let table = OptTableBuilder::new()
            .add(
                OptionDef::flag(1, "-", "internal")
                    .with_help("Dump state")
                    .with_flags(OptionFlags::HIDDEN),
            )
            .add(OptionDef::flag(2, "--", "dump").alias_of(1))
            .build()
            .unwrap();

        assert_eq!(
            table.help(&HelpSettings::default()).unwrap(),
            "Options:\n  --dump Dump state\n"
        );
    }
}
