//! Option definitions and the per-kind token matching rules.
//!
//! An [`OptionDef`] describes one recognizable command-line shape. Its
//! [`OptionVariant`] decides how many tokens a match consumes and how the
//! values are extracted:
//!
//! | Variant | Matches | Consumes | Values |
//! |---|---|---|---|
//! | `Flag` | `prefix+name` exactly | 1 | none |
//! | `Joined` | `prefix+name` as a prefix | 1 | rest of the token |
//! | `Separate` | `prefix+name` exactly | 2 | next token |
//! | `JoinedOrSeparate` | `prefix+name` as a prefix | 1 or 2 | rest, or next token |
//! | `MultiArg` | `prefix+name` exactly | 1 + N | next N tokens |
//! | `CommaJoined` | `prefix+name` as a prefix | 1 | rest split on `,` |
//! | `RemainingArgs` | `prefix+name` exactly | all | every later token |
//! | `Input` / `Unknown` | anything | 1 | the token |
//! | `Group` | never | - | - |

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::{Arg, HelpError, OptSpecifier};

/// Name given to the Input-kind option.
pub const INPUT_NAME: &str = "<input>";
/// Name given to the Unknown-kind option.
pub const UNKNOWN_NAME: &str = "<unknown>";

bitflags! {
    /// Per-option flags.
    ///
    /// The render bits override the variant's default [`RenderStyle`];
    /// [`HIDDEN`](Self::HIDDEN) is excluded from help by default. Bits above
    /// the named ones are free for callers and can be used with the help
    /// include/exclude filters.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct OptionFlags: u32 {
        const RENDER_JOINED = 1 << 0;
        const RENDER_SEPARATE = 1 << 1;
        const HIDDEN = 1 << 2;
        const _ = !0;
    }
}

/// Coarse role of an option within a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionKind {
    /// Catch-all for tokens no other option accepts.
    Unknown,
    /// Tokens that start with no registered prefix.
    Input,
    /// Help-layout marker, never matched.
    Group,
    /// Every matchable, prefixed option.
    Normal,
}

/// How an [`Arg`] is turned back into argv tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderStyle {
    /// Only the values, no spelling.
    Values,
    /// Spelling and first value in one token, remaining values separate.
    Joined,
    /// Spelling, then each value as its own token.
    Separate,
    /// Spelling and all values joined by `,` in one token.
    CommaJoined,
}

/// The matching rule of an option. Each variant carries only what it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionVariant {
    Unknown,
    Input,
    Group,
    Flag,
    Joined,
    Separate,
    JoinedOrSeparate,
    MultiArg { count: usize },
    CommaJoined,
    RemainingArgs,
}

impl OptionVariant {
    /// Returns the coarse kind of this variant.
    pub fn kind(self) -> OptionKind {
        match self {
            Self::Unknown => OptionKind::Unknown,
            Self::Input => OptionKind::Input,
            Self::Group => OptionKind::Group,
            _ => OptionKind::Normal,
        }
    }

    fn default_render_style(self) -> RenderStyle {
        match self {
            Self::Unknown | Self::Input | Self::Group => RenderStyle::Values,
            Self::Joined | Self::JoinedOrSeparate => RenderStyle::Joined,
            Self::CommaJoined => RenderStyle::CommaJoined,
            Self::Flag | Self::Separate | Self::MultiArg { .. } | Self::RemainingArgs => {
                RenderStyle::Separate
            }
        }
    }
}

/// One or more option prefixes.
///
/// Implemented for a single prefix (`"-"`) and for arrays, slices, and
/// vectors of prefixes (`["-", "--", "/"]`).
pub trait IntoPrefixes {
    fn into_prefixes(self) -> Vec<String>;
}

impl IntoPrefixes for &str {
    fn into_prefixes(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoPrefixes for String {
    fn into_prefixes(self) -> Vec<String> {
        vec![self]
    }
}

impl<const N: usize> IntoPrefixes for [&str; N] {
    fn into_prefixes(self) -> Vec<String> {
        self.iter().map(|p| p.to_string()).collect()
    }
}

impl IntoPrefixes for &[&str] {
    fn into_prefixes(self) -> Vec<String> {
        self.iter().map(|p| p.to_string()).collect()
    }
}

impl IntoPrefixes for Vec<String> {
    fn into_prefixes(self) -> Vec<String> {
        self
    }
}

impl IntoPrefixes for Vec<&str> {
    fn into_prefixes(self) -> Vec<String> {
        self.into_iter().map(String::from).collect()
    }
}

/// Alias target as resolved by the owning table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Canonical {
    pub(crate) id: OptSpecifier,
    pub(crate) spelling: String,
}

/// Definition of one option.
///
/// Create options with the per-variant constructors and chain the `with_*`
/// methods for optional attributes. Alias and group links are plain ids; they
/// are resolved when the option is added to a table.
///
/// # Examples
///
/// ```
/// use opt_table_core::{OptionDef, OptionKind};
///
/// let out = OptionDef::joined_or_separate(2, ["-", "--"], "o")
///     .with_help("Write output to <file>")
///     .with_meta_var("<file>");
/// assert_eq!(out.kind(), OptionKind::Normal);
/// assert_eq!(out.prefixed_name(), "-o");
/// assert_eq!(out.help_name("<value>").unwrap(), "-o <file>");
///
/// let mut idx = 0;
/// let arg = out.accept(&["-oa.out"], &mut idx).unwrap();
/// assert_eq!(idx, 1);
/// assert_eq!(arg.value(), Some("a.out"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDef {
    id: OptSpecifier,
    name: String,
    prefixes: Vec<String>,
    variant: OptionVariant,
    help_text: Option<String>,
    meta_var: Option<String>,
    alias: Option<OptSpecifier>,
    group: Option<OptSpecifier>,
    flags: OptionFlags,
    canonical: Option<Canonical>,
}

impl OptionDef {
    fn with_variant(
        id: impl Into<OptSpecifier>,
        prefixes: Vec<String>,
        name: impl Into<String>,
        variant: OptionVariant,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            prefixes,
            variant,
            help_text: None,
            meta_var: None,
            alias: None,
            group: None,
            flags: OptionFlags::empty(),
            canonical: None,
        }
    }

    /// Catch-all option bound to tokens nothing else accepts.
    pub fn unknown(id: impl Into<OptSpecifier>) -> Self {
        Self::with_variant(id, Vec::new(), UNKNOWN_NAME, OptionVariant::Unknown)
    }

    /// Option bound to tokens that start with no registered prefix.
    pub fn input(id: impl Into<OptSpecifier>) -> Self {
        Self::with_variant(id, Vec::new(), INPUT_NAME, OptionVariant::Input)
    }

    /// Help-layout group. Its help text is used as the group title.
    pub fn group(id: impl Into<OptSpecifier>, name: impl Into<String>) -> Self {
        Self::with_variant(id, Vec::new(), name, OptionVariant::Group)
    }

    /// Valueless switch such as `-v`, `--verbose`, or `/help`.
    pub fn flag(id: impl Into<OptSpecifier>, prefixes: impl IntoPrefixes, name: impl Into<String>) -> Self {
        Self::with_variant(id, prefixes.into_prefixes(), name, OptionVariant::Flag)
    }

    /// Value glued to the name, such as `-Dname=value` or `--out=file`.
    pub fn joined(id: impl Into<OptSpecifier>, prefixes: impl IntoPrefixes, name: impl Into<String>) -> Self {
        Self::with_variant(id, prefixes.into_prefixes(), name, OptionVariant::Joined)
    }

    /// Value in the next token, such as `-o file`.
    pub fn separate(id: impl Into<OptSpecifier>, prefixes: impl IntoPrefixes, name: impl Into<String>) -> Self {
        Self::with_variant(id, prefixes.into_prefixes(), name, OptionVariant::Separate)
    }

    /// Either form, such as `-Ipath` or `-I path`.
    pub fn joined_or_separate(
        id: impl Into<OptSpecifier>,
        prefixes: impl IntoPrefixes,
        name: impl Into<String>,
    ) -> Self {
        Self::with_variant(
            id,
            prefixes.into_prefixes(),
            name,
            OptionVariant::JoinedOrSeparate,
        )
    }

    /// Fixed number of separate values, such as `-pair a b`.
    pub fn multi_arg(
        id: impl Into<OptSpecifier>,
        prefixes: impl IntoPrefixes,
        name: impl Into<String>,
        count: usize,
    ) -> Self {
        Self::with_variant(
            id,
            prefixes.into_prefixes(),
            name,
            OptionVariant::MultiArg { count },
        )
    }

    /// Joined value split on commas, such as `-Wl,a,b`.
    pub fn comma_joined(id: impl Into<OptSpecifier>, prefixes: impl IntoPrefixes, name: impl Into<String>) -> Self {
        Self::with_variant(id, prefixes.into_prefixes(), name, OptionVariant::CommaJoined)
    }

    /// Swallows every later token, such as `--` or `-Xrun`.
    pub fn remaining_args(
        id: impl Into<OptSpecifier>,
        prefixes: impl IntoPrefixes,
        name: impl Into<String>,
    ) -> Self {
        Self::with_variant(id, prefixes.into_prefixes(), name, OptionVariant::RemainingArgs)
    }

    /// Sets the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help_text = Some(help.into());
        self
    }

    /// Sets the meta variable shown in help (e.g. `<file>`).
    pub fn with_meta_var(mut self, meta_var: impl Into<String>) -> Self {
        self.meta_var = Some(meta_var.into());
        self
    }

    /// Makes this option an alias of `target`.
    pub fn alias_of(mut self, target: impl Into<OptSpecifier>) -> Self {
        self.alias = Some(target.into());
        self
    }

    /// Places this option in the help group `group`.
    pub fn in_group(mut self, group: impl Into<OptSpecifier>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Adds `flags` to this option's flags.
    pub fn with_flags(mut self, flags: OptionFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn id(&self) -> OptSpecifier {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Preferred (first) prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefixes.first().map(String::as_str)
    }

    /// Preferred prefix followed by the name (`-o`, `--verbose`).
    pub fn prefixed_name(&self) -> String {
        format!("{}{}", self.prefix().unwrap_or_default(), self.name)
    }

    pub fn variant(&self) -> OptionVariant {
        self.variant
    }

    pub fn kind(&self) -> OptionKind {
        self.variant.kind()
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help_text.as_deref()
    }

    pub fn meta_var(&self) -> Option<&str> {
        self.meta_var.as_deref()
    }

    /// Declared alias target id.
    pub fn alias(&self) -> Option<OptSpecifier> {
        self.alias
    }

    /// Declared group id.
    pub fn group_id(&self) -> Option<OptSpecifier> {
        self.group
    }

    pub fn flags(&self) -> OptionFlags {
        self.flags
    }

    /// Id of the canonical option at the end of the alias chain.
    ///
    /// Defaults to this option's own id until the option is placed in a
    /// table that resolves the chain.
    pub fn unaliased_id(&self) -> OptSpecifier {
        self.canonical.as_ref().map_or(self.id, |c| c.id)
    }

    pub(crate) fn set_canonical(&mut self, canonical: Option<Canonical>) {
        self.canonical = canonical;
    }

    /// Render style from the flags, falling back to the variant's default.
    pub fn render_style(&self) -> RenderStyle {
        if self.flags.contains(OptionFlags::RENDER_JOINED) {
            RenderStyle::Joined
        } else if self.flags.contains(OptionFlags::RENDER_SEPARATE) {
            RenderStyle::Separate
        } else {
            self.variant.default_render_style()
        }
    }

    /// Name shown in the help listing.
    ///
    /// # Errors
    ///
    /// Returns [`HelpError::NotRenderable`] for Group, Input, Unknown, and
    /// MultiArg options.
    pub fn help_name(&self, default_meta_var: &str) -> Result<String, HelpError> {
        let meta_var = self.meta_var.as_deref().unwrap_or(default_meta_var);
        match self.variant {
            OptionVariant::Flag => Ok(self.prefixed_name()),
            OptionVariant::Joined | OptionVariant::CommaJoined => {
                Ok(format!("{}{meta_var}", self.prefixed_name()))
            }
            OptionVariant::Separate
            | OptionVariant::JoinedOrSeparate
            | OptionVariant::RemainingArgs => Ok(format!("{} {meta_var}", self.prefixed_name())),
            OptionVariant::Group
            | OptionVariant::Input
            | OptionVariant::Unknown
            | OptionVariant::MultiArg { .. } => Err(HelpError::NotRenderable { id: self.id }),
        }
    }

    /// Length of the longest `prefix+name` that starts `token`.
    fn matched_len(&self, token: &str) -> Option<usize> {
        self.prefixes
            .iter()
            .filter(|prefix| {
                token
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with(self.name.as_str()))
            })
            .map(|prefix| prefix.len() + self.name.len())
            .max()
    }

    fn spelling(&self, literal: &str) -> String {
        match &self.canonical {
            Some(canonical) if canonical.id != self.id => canonical.spelling.clone(),
            _ => literal.to_string(),
        }
    }

    /// Tries to match this option at `args[*index]`.
    ///
    /// On success the produced [`Arg`] is returned and `index` points past the
    /// consumed tokens. When the token is unrelated to this option, `None` is
    /// returned and `index` is untouched. When the token names this option but
    /// too few trailing tokens remain, `None` is returned and `index` is
    /// advanced past the end of `args` by the number of missing tokens.
    pub fn accept<S: AsRef<str>>(&self, args: &[S], index: &mut usize) -> Option<Arg> {
        let start = *index;
        let token = args.get(start)?.as_ref();

        match self.variant {
            OptionVariant::Unknown | OptionVariant::Input => {
                *index += 1;
                return Some(Arg::new(self.id, token, start, vec![token.to_string()]));
            }
            OptionVariant::Group => return None,
            _ => {}
        }

        let len = self.matched_len(token)?;
        let exact = len == token.len();
        let spelling = self.spelling(&token[..len]);
        let option = self.unaliased_id();

        match self.variant {
            OptionVariant::Flag => {
                if !exact {
                    return None;
                }
                *index += 1;
                Some(Arg::new(option, spelling, start, Vec::new()))
            }
            OptionVariant::Joined => {
                *index += 1;
                Some(Arg::new(option, spelling, start, vec![token[len..].to_string()]))
            }
            OptionVariant::CommaJoined => {
                let values = token[len..].split(',').map(String::from).collect();
                *index += 1;
                Some(Arg::new(option, spelling, start, values))
            }
            OptionVariant::JoinedOrSeparate if !exact => {
                *index += 1;
                Some(Arg::new(option, spelling, start, vec![token[len..].to_string()]))
            }
            OptionVariant::Separate | OptionVariant::JoinedOrSeparate => {
                if !exact {
                    return None;
                }
                *index += 2;
                let value = args.get(start + 1)?.as_ref();
                Some(Arg::new(option, spelling, start, vec![value.to_string()]))
            }
            OptionVariant::MultiArg { count } => {
                if !exact {
                    return None;
                }
                let available = args.len() - start - 1;
                if available < count {
                    *index = args.len().saturating_add(count - available);
                    return None;
                }
                *index = start + 1 + count;
                let values = args[start + 1..*index]
                    .iter()
                    .map(|v| v.as_ref().to_string())
                    .collect();
                Some(Arg::new(option, spelling, start, values))
            }
            OptionVariant::RemainingArgs => {
                if !exact {
                    return None;
                }
                let values = args[start + 1..]
                    .iter()
                    .map(|v| v.as_ref().to_string())
                    .collect();
                *index = args.len();
                Some(Arg::new(option, spelling, start, values))
            }
            OptionVariant::Unknown | OptionVariant::Input | OptionVariant::Group => None,
        }
    }
}
