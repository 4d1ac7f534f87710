//! The option table and its matching loop.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::option::Canonical;
use crate::ordering::{compare_name_ignore_case, weak_predecessor};
use crate::{
    Arg, ArgumentList, OptSpecifier, OptionDef, OptionKind, OptionVariant, RenderStyle, TableError,
};

/// Diagnostic for a parse that stopped because an option ran out of
/// trailing tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("option '{spelling}' (id {option}) is missing {arg_count} argument(s) after argument {arg_index}")]
pub struct MissingArgs {
    /// Index of the token that named the option.
    pub arg_index: usize,
    /// Number of tokens that were still needed.
    pub arg_count: usize,
    /// The option that matched (as registered, not alias-resolved).
    pub option: OptSpecifier,
    /// Preferred spelling of that option, for messages.
    pub spelling: String,
}

/// Result of [`OptTable::parse_args`].
///
/// `args` always holds every arg recognized before parsing stopped; `missing`
/// is set only when an option ran out of trailing tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    pub args: ArgumentList,
    pub missing: Option<MissingArgs>,
}

impl ParsedArgs {
    /// Returns `true` when every token was consumed.
    pub fn is_complete(&self) -> bool {
        self.missing.is_none()
    }

    /// Converts into a `Result`, dropping the partial list on a missing
    /// argument.
    ///
    /// # Errors
    ///
    /// Returns the [`MissingArgs`] diagnostic if parsing stopped early.
    pub fn into_result(self) -> Result<ArgumentList, MissingArgs> {
        match self.missing {
            Some(missing) => Err(missing),
            None => Ok(self.args),
        }
    }
}

/// A validated, immutable set of options ready to parse argument vectors.
///
/// Built with [`OptTableBuilder`](crate::OptTableBuilder). The table is
/// read-only after construction and can be shared across threads.
///
/// # Examples
///
/// ```
/// use opt_table_core::{OptTableBuilder, OptionDef};
///
/// let table = OptTableBuilder::new()
///     .add(OptionDef::flag(1, "-", "verbose"))
///     .add(OptionDef::joined(2, "-", "out="))
///     .build()
///     .unwrap();
///
/// let parsed = table.parse_args(&["-verbose", "-out=result.txt", "-bogus"]);
/// assert!(parsed.is_complete());
///
/// let args = parsed.args;
/// assert_eq!(args.len(), 3);
/// assert_eq!(args[0].spelling(), "-verbose");
/// assert_eq!(args[1].value(), Some("result.txt"));
/// assert_eq!(args[2].option(), table.unknown_id());
/// assert_eq!(args[2].value(), Some("-bogus"));
/// ```
#[derive(Debug, Clone)]
pub struct OptTable {
    /// Sorted: Unknown, then Input, then everything else by name.
    options: Vec<OptionDef>,
    /// Registration order, id to position in `options`.
    defined: IndexMap<OptSpecifier, usize>,
    prefixes: Vec<String>,
    prefix_chars: Vec<char>,
    unknown_id: OptSpecifier,
    input_id: Option<OptSpecifier>,
    first_normal_index: usize,
}

impl OptTable {
    /// Validates `options` and freezes them into a table.
    ///
    /// When no Unknown-kind option is present, one is appended with an id one
    /// greater than the current maximum.
    pub(crate) fn new(mut options: Vec<OptionDef>) -> Result<Self, TableError> {
        let declared_unknown = options
            .iter()
            .find(|o| o.kind() == OptionKind::Unknown)
            .map(OptionDef::id);
        let unknown_id = match declared_unknown {
            Some(id) => id,
            None => {
                let max = options.iter().map(|o| o.id().id()).max().unwrap_or(0);
                let id = max.checked_add(1).ok_or(TableError::IdOverflow)?;
                debug!(id, "synthesized fallback unknown option");
                options.push(OptionDef::unknown(id));
                OptSpecifier::new(id)
            }
        };
        verify_options(&options)?;
        resolve_aliases(&mut options);

        let mut prefixes: Vec<String> = Vec::new();
        let mut input_id = None;
        for option in &options {
            for prefix in option.prefixes() {
                if !prefixes.contains(prefix) {
                    prefixes.push(prefix.clone());
                }
            }
            if option.kind() == OptionKind::Input {
                input_id = Some(option.id());
            }
        }
        let registration: Vec<OptSpecifier> = options.iter().map(OptionDef::id).collect();

        // `sort_by` is stable.
        options.sort_by(|a, b| {
            special_rank(a)
                .cmp(&special_rank(b))
                .then_with(|| compare_name_ignore_case(a.name(), b.name()))
        });

        let positions: IndexMap<OptSpecifier, usize> = options
            .iter()
            .enumerate()
            .map(|(pos, option)| (option.id(), pos))
            .collect();
        let defined = registration
            .into_iter()
            .map(|id| (id, positions[&id]))
            .collect();

        let mut prefix_chars: Vec<char> = Vec::new();
        for c in prefixes.iter().flat_map(|p| p.chars()) {
            if !prefix_chars.contains(&c) {
                prefix_chars.push(c);
            }
        }

        let first_normal_index = 1 + usize::from(input_id.is_some());

        debug!(
            options = options.len(),
            prefixes = prefixes.len(),
            unknown = %unknown_id,
            "built option table"
        );

        Ok(Self {
            options,
            defined,
            prefixes,
            prefix_chars,
            unknown_id,
            input_id,
            first_normal_index,
        })
    }

    /// Number of options, including the Unknown fallback.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Looks up an option by id.
    pub fn get_option(&self, id: impl Into<OptSpecifier>) -> Option<&OptionDef> {
        let id = id.into();
        if !id.is_valid() {
            return None;
        }
        self.defined.get(&id).map(|&pos| &self.options[pos])
    }

    /// Options in registration order.
    pub fn defined_options(&self) -> impl Iterator<Item = &OptionDef> {
        self.defined.values().map(|&pos| &self.options[pos])
    }

    /// Options in matching order (Unknown, Input, then by name).
    pub fn sorted_options(&self) -> &[OptionDef] {
        &self.options
    }

    /// The resolved alias target of `id`, if it names an alias.
    pub fn alias_of(&self, id: impl Into<OptSpecifier>) -> Option<&OptionDef> {
        self.get_option(id)
            .and_then(OptionDef::alias)
            .and_then(|alias| self.get_option(alias))
    }

    /// The resolved group of `id`, if it has one.
    pub fn group_of(&self, id: impl Into<OptSpecifier>) -> Option<&OptionDef> {
        self.get_option(id)
            .and_then(OptionDef::group_id)
            .and_then(|group| self.get_option(group))
    }

    /// The canonical option at the end of `id`'s alias chain.
    pub fn unaliased_option(&self, id: impl Into<OptSpecifier>) -> Option<&OptionDef> {
        self.get_option(id)
            .and_then(|option| self.get_option(option.unaliased_id()))
    }

    pub fn unknown_id(&self) -> OptSpecifier {
        self.unknown_id
    }

    pub fn input_id(&self) -> Option<OptSpecifier> {
        self.input_id
    }

    /// Every distinct prefix used by the table, in registration order.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    fn is_input(&self, token: &str) -> bool {
        !self.prefixes.iter().any(|p| token.starts_with(p.as_str()))
    }

    /// Parses `args` (without the program name) into an [`ArgumentList`].
    ///
    /// Tokens that start with no registered prefix bind to the Input option
    /// (or Unknown if there is none). Prefixed tokens are offered to the
    /// candidate options in name order; the first that accepts wins, and a
    /// token no option accepts binds to Unknown. If a candidate recognizes
    /// the token but runs out of trailing tokens, parsing stops and the
    /// partial list is returned with a [`MissingArgs`] diagnostic.
    pub fn parse_args<S: AsRef<str>>(&self, args: &[S]) -> ParsedArgs {
        let mut parsed = ParsedArgs::default();
        let mut index = 0;

        while index < args.len() {
            let start = index;
            match self.parse_arg(args, &mut index) {
                Ok(arg) => {
                    trace!(index = start, option = %arg.option(), spelling = arg.spelling(), "matched");
                    parsed.args.push(arg);
                }
                Err(option) => {
                    let missing = MissingArgs {
                        arg_index: start,
                        arg_count: index - args.len(),
                        option: option.id(),
                        spelling: option.prefixed_name(),
                    };
                    debug!(
                        index = start,
                        option = %missing.option,
                        missing = missing.arg_count,
                        "option is missing arguments"
                    );
                    parsed.missing = Some(missing);
                    break;
                }
            }
        }

        debug!(tokens = args.len(), args = parsed.args.len(), "parsed arguments");
        parsed
    }

    /// Matches one arg at `args[*index]`. On a missing-argument abort the
    /// offending option is returned as the error.
    fn parse_arg<S: AsRef<str>>(&self, args: &[S], index: &mut usize) -> Result<Arg, &OptionDef> {
        let start = *index;
        let token = args[start].as_ref();

        if self.is_input(token) {
            let id = self.input_id.unwrap_or(self.unknown_id);
            *index += 1;
            return Ok(Arg::new(id, token, start, vec![token.to_string()]));
        }

        let name = token.trim_start_matches(self.prefix_chars.as_slice());
        let first = weak_predecessor(&self.options, self.first_normal_index, name, |o| o.name());

        for option in &self.options[first..] {
            if let Some(arg) = option.accept(args, index) {
                return Ok(arg);
            }
            if *index != start {
                return Err(option);
            }
        }

        *index += 1;
        Ok(Arg::new(self.unknown_id, token, start, vec![token.to_string()]))
    }

    /// Turns `arg` back into argv tokens using its option's render style.
    pub fn render_arg(&self, arg: &Arg) -> Vec<String> {
        let style = self
            .get_option(arg.option())
            .map_or(RenderStyle::Separate, OptionDef::render_style);
        let values = arg.values();

        match style {
            RenderStyle::Values => values.to_vec(),
            RenderStyle::Joined => {
                let mut out = vec![format!(
                    "{}{}",
                    arg.spelling(),
                    values.first().map(String::as_str).unwrap_or_default()
                )];
                out.extend(values.iter().skip(1).cloned());
                out
            }
            RenderStyle::CommaJoined => vec![format!("{}{}", arg.spelling(), values.join(","))],
            RenderStyle::Separate => std::iter::once(arg.spelling().to_string())
                .chain(values.iter().cloned())
                .collect(),
        }
    }

    /// Renders every arg in `args`, in order.
    pub fn render_args(&self, args: &ArgumentList) -> Vec<String> {
        args.iter().flat_map(|arg| self.render_arg(arg)).collect()
    }
}

fn special_rank(option: &OptionDef) -> u8 {
    match option.kind() {
        OptionKind::Unknown => 0,
        OptionKind::Input => 1,
        OptionKind::Group | OptionKind::Normal => 2,
    }
}

/// Checks the table-wide invariants, failing on the first violation.
pub(crate) fn verify_options(options: &[OptionDef]) -> Result<(), TableError> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    let mut unknown = false;
    let mut input = false;

    for option in options {
        let id = option.id();
        if !id.is_valid() {
            return Err(TableError::InvalidId(id));
        }

        match option.kind() {
            OptionKind::Unknown => {
                if std::mem::replace(&mut unknown, true) {
                    return Err(TableError::DuplicateUnknown(id));
                }
            }
            OptionKind::Input => {
                if std::mem::replace(&mut input, true) {
                    return Err(TableError::DuplicateInput(id));
                }
            }
            OptionKind::Group | OptionKind::Normal => verify_shape(option)?,
        }

        if !ids.insert(id) {
            return Err(TableError::DuplicateId(id));
        }
        if !names.insert(option.name()) {
            return Err(TableError::DuplicateName(option.name().to_string()));
        }
    }

    Ok(())
}

fn verify_shape(option: &OptionDef) -> Result<(), TableError> {
    let id = option.id();
    let name = option.name();
    let blank_name = name.chars().any(char::is_whitespace)
        || (name.is_empty() && option.kind() == OptionKind::Group);
    if blank_name {
        return Err(TableError::BlankName {
            id,
            name: name.to_string(),
        });
    }
    if option.kind() == OptionKind::Group {
        return Ok(());
    }

    if option.prefixes().is_empty() {
        return Err(TableError::MissingPrefix {
            id,
            name: name.to_string(),
        });
    }
    if option
        .prefixes()
        .iter()
        .any(|p| p.is_empty() || p.chars().any(char::is_whitespace))
    {
        return Err(TableError::BlankPrefix {
            id,
            name: name.to_string(),
        });
    }
    if option.variant() == (OptionVariant::MultiArg { count: 0 }) {
        return Err(TableError::InvalidArgCount {
            id,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Resolves every alias chain to its canonical option.
///
/// Unknown targets and cycles are reported and leave the option as its own
/// canonical form.
fn resolve_aliases(options: &mut [OptionDef]) {
    let by_id: IndexMap<OptSpecifier, usize> = options
        .iter()
        .enumerate()
        .map(|(pos, option)| (option.id(), pos))
        .collect();

    let mut resolved = Vec::with_capacity(options.len());
    for option in options.iter() {
        for (what, target) in [("alias", option.alias()), ("group", option.group_id())] {
            if let Some(target) = target.filter(|t| !by_id.contains_key(t)) {
                warn!(option = %option.id(), target = %target, "unresolved {what} reference");
            }
        }

        let mut current = option;
        let mut hops = 0;
        while let Some(&next) = current.alias().and_then(|alias| by_id.get(&alias)) {
            hops += 1;
            if hops > options.len() {
                warn!(option = %option.id(), "alias cycle detected");
                current = option;
                break;
            }
            current = &options[next];
        }

        resolved.push(Canonical {
            id: current.id(),
            spelling: current.prefixed_name(),
        });
    }

    for (option, canonical) in options.iter_mut().zip(resolved) {
        option.set_canonical(Some(canonical));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OptTableBuilder;

    fn table(options: Vec<OptionDef>) -> OptTable {
        options
            .into_iter()
            .fold(OptTableBuilder::new(), OptTableBuilder::add)
            .build()
            .unwrap()
    }

    #[test]
    fn test_sorted_order_and_first_normal_index() {
        let table = table(vec![
            OptionDef::flag(1, "-", "zeta"),
            OptionDef::input(2),
            OptionDef::flag(3, "-", "Alpha"),
            OptionDef::group(4, "middle"),
            OptionDef::unknown(5),
        ]);

        let names: Vec<&str> = table.sorted_options().iter().map(OptionDef::name).collect();
        assert_eq!(names, vec!["<unknown>", "<input>", "Alpha", "middle", "zeta"]);
        assert_eq!(table.first_normal_index, 2);

        let defined: Vec<i32> = table.defined_options().map(|o| o.id().id()).collect();
        assert_eq!(defined, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_lookup() {
        let table = table(vec![
            OptionDef::group(1, "general").with_help("General"),
            OptionDef::flag(2, "-", "v").in_group(1),
            OptionDef::flag(3, "--", "verbose").alias_of(2),
        ]);

        assert_eq!(table.get_option(2).unwrap().name(), "v");
        assert!(table.get_option(0).is_none());
        assert!(table.get_option(42).is_none());
        assert_eq!(table.group_of(2).unwrap().name(), "general");
        assert_eq!(table.alias_of(3).unwrap().name(), "v");
        assert_eq!(table.unaliased_option(3).unwrap().id(), OptSpecifier::new(2));
        assert_eq!(table.unaliased_option(2).unwrap().id(), OptSpecifier::new(2));
        assert_eq!(table.prefixes(), ["-", "--"]);
        assert_eq!(table.prefix_chars, vec!['-']);
    }

    #[test]
    fn test_alias_chain_resolves_to_terminal() {
        let table = table(vec![
            OptionDef::flag(1, "-", "a"),
            OptionDef::flag(2, "-", "b").alias_of(1),
            OptionDef::flag(3, "-", "c").alias_of(2),
        ]);
        assert_eq!(table.get_option(3).unwrap().unaliased_id(), OptSpecifier::new(1));

        let parsed = table.parse_args(&["-c"]);
        assert_eq!(parsed.args[0].option(), OptSpecifier::new(1));
        assert_eq!(parsed.args[0].spelling(), "-a");
    }

    #[test]
    fn test_alias_cycle_falls_back_to_self() {
        let table = table(vec![
            OptionDef::flag(1, "-", "a").alias_of(2),
            OptionDef::flag(2, "-", "b").alias_of(1),
        ]);
        let parsed = table.parse_args(&["-a", "-b"]);
        assert_eq!(parsed.args[0].option(), OptSpecifier::new(1));
        assert_eq!(parsed.args[1].option(), OptSpecifier::new(2));
    }

    #[test]
    fn test_verify_rejects_invalid_tables() {
        let cases: Vec<(Vec<OptionDef>, TableError)> = vec![
            (
                vec![OptionDef::flag(0, "-", "a")],
                TableError::InvalidId(OptSpecifier::new(0)),
            ),
            (
                vec![OptionDef::flag(1, "-", "a"), OptionDef::flag(1, "-", "b")],
                TableError::DuplicateId(OptSpecifier::new(1)),
            ),
            (
                vec![OptionDef::flag(1, "-", "a"), OptionDef::joined(2, "--", "a")],
                TableError::DuplicateName("a".into()),
            ),
            (
                vec![OptionDef::unknown(1), OptionDef::unknown(2)],
                TableError::DuplicateUnknown(OptSpecifier::new(2)),
            ),
            (
                vec![OptionDef::input(1), OptionDef::input(2)],
                TableError::DuplicateInput(OptSpecifier::new(2)),
            ),
            (
                vec![OptionDef::flag(1, Vec::<String>::new(), "a")],
                TableError::MissingPrefix {
                    id: OptSpecifier::new(1),
                    name: "a".into(),
                },
            ),
            (
                vec![OptionDef::flag(1, ["-", " "], "a")],
                TableError::BlankPrefix {
                    id: OptSpecifier::new(1),
                    name: "a".into(),
                },
            ),
            (
                vec![OptionDef::flag(1, "-", "a b")],
                TableError::BlankName {
                    id: OptSpecifier::new(1),
                    name: "a b".into(),
                },
            ),
            (
                vec![OptionDef::multi_arg(1, "-", "m", 0)],
                TableError::InvalidArgCount {
                    id: OptSpecifier::new(1),
                    name: "m".into(),
                },
            ),
        ];

        for (options, expected) in cases {
            assert_eq!(verify_options(&options), Err(expected));
        }
    }

    #[test]
    fn test_verify_is_order_independent() {
        let mut options = vec![
            OptionDef::flag(1, "-", "a"),
            OptionDef::flag(2, "-", "b"),
            OptionDef::flag(3, "-", "a"),
        ];
        assert!(verify_options(&options).is_err());
        options.reverse();
        assert!(verify_options(&options).is_err());
    }

    #[test]
    fn test_input_fallback_depends_on_table() {
        let without = table(vec![OptionDef::flag(1, "-", "v")]);
        let parsed = without.parse_args(&["file.c"]);
        assert_eq!(parsed.args[0].option(), without.unknown_id());

        let with = table(vec![OptionDef::flag(1, "-", "v"), OptionDef::input(2)]);
        let parsed = with.parse_args(&["file.c"]);
        assert_eq!(parsed.args[0].option(), OptSpecifier::new(2));
        assert_eq!(parsed.args[0].value(), Some("file.c"));
    }

    #[test]
    fn test_prefix_sharing_candidates() {
        let table = table(vec![
            OptionDef::joined_or_separate(1, "-", "I"),
            OptionDef::joined(2, "-", "Iquote"),
            OptionDef::flag(3, "-", "Ipath"),
        ]);

        let parsed = table.parse_args(&["-Iquotedir", "-Ipath", "-Iinc", "-I", "dir"]);
        assert!(parsed.is_complete());
        let got: Vec<(i32, Option<&str>)> = parsed
            .args
            .iter()
            .map(|a| (a.option().id(), a.value()))
            .collect();
        assert_eq!(
            got,
            vec![
                (2, Some("dir")),
                (3, None),
                (1, Some("inc")),
                (1, Some("dir")),
            ]
        );
    }

    #[test]
    fn test_joined_beats_partial_separate() {
        let table = table(vec![
            OptionDef::joined(1, "-", "foo:"),
            OptionDef::separate(2, "-", "foobar"),
        ]);
        let parsed = table.parse_args(&["-foo:x"]);
        assert!(parsed.is_complete());
        assert_eq!(parsed.args.len(), 1);
        assert_eq!(parsed.args[0].option(), OptSpecifier::new(1));
        assert_eq!(parsed.args[0].value(), Some("x"));
    }

    #[test]
    fn test_case_differences_fall_to_unknown() {
        let table = table(vec![OptionDef::flag(1, "-", "verbose")]);
        let parsed = table.parse_args(&["-VERBOSE"]);
        assert_eq!(parsed.args[0].option(), table.unknown_id());
    }

    #[test]
    fn test_missing_args_keeps_partial_list() {
        let table = table(vec![
            OptionDef::flag(1, "-", "v"),
            OptionDef::multi_arg(2, "-", "foo", 3),
        ]);

        let parsed = table.parse_args(&["-v", "-foo", "1"]);
        assert_eq!(parsed.args.len(), 1);
        let missing = parsed.missing.clone().unwrap();
        assert_eq!(missing.arg_index, 1);
        assert_eq!(missing.arg_count, 2);
        assert_eq!(missing.option, OptSpecifier::new(2));
        assert_eq!(missing.spelling, "-foo");
        assert_eq!(
            missing.to_string(),
            "option '-foo' (id 2) is missing 2 argument(s) after argument 1"
        );
        assert_eq!(parsed.into_result(), Err(missing));
    }

    #[test]
    fn test_missing_args_with_huge_multi_arg_count() {
        let table = table(vec![OptionDef::multi_arg(1, "-", "pair", usize::MAX)]);

        let parsed = table.parse_args(&["-pair", "a"]);
        assert!(parsed.args.is_empty());
        let missing = parsed.missing.unwrap();
        assert_eq!(missing.arg_index, 0);
        assert_eq!(missing.option, OptSpecifier::new(1));
        assert_eq!(missing.arg_count, usize::MAX - 2);
    }

    #[test]
    fn test_empty_input() {
        let table = table(vec![OptionDef::flag(1, "-", "v")]);
        let parsed = table.parse_args::<&str>(&[]);
        assert!(parsed.is_complete());
        assert!(parsed.args.is_empty());
    }

    #[test]
    fn test_render_args() {
        let table = table(vec![
            OptionDef::input(1),
            OptionDef::flag(2, "-", "v"),
            OptionDef::joined_or_separate(3, "-", "o"),
            OptionDef::comma_joined(4, "-", "Wl,"),
            OptionDef::multi_arg(5, "-", "pair", 2),
            OptionDef::separate(6, "-", "x").with_flags(crate::OptionFlags::RENDER_JOINED),
        ]);

        let parsed = table.parse_args(&[
            "a.c", "-v", "-o", "out", "-Wl,a,b", "-pair", "1", "2", "-x", "y",
        ]);
        assert!(parsed.is_complete());
        assert_eq!(
            table.render_args(&parsed.args),
            vec!["a.c", "-v", "-oout", "-Wl,a,b", "-pair", "1", "2", "-xy"]
        );
    }

    #[test]
    fn test_group_options_are_not_matched() {
        let table = table(vec![OptionDef::group(1, "grp"), OptionDef::flag(2, "-", "g")]);
        let parsed = table.parse_args(&["-grp"]);
        assert_eq!(parsed.args[0].option(), table.unknown_id());
        assert_eq!(
            table.get_option(1).unwrap().variant(),
            OptionVariant::Group
        );
    }
}
