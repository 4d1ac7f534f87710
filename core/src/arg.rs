//! Parsed arguments and the claim-tracking argument list.
//!
//! Every query that "consumes" an argument marks it claimed. After all
//! consumers have run, [`ArgumentList::unclaimed`] yields whatever nobody
//! took responsibility for.

use std::ops::Index;
use std::str::FromStr;

use serde::Serialize;

use crate::{OptIds, OptSpecifier, ValueError};

/// One recognized occurrence of an option in the token stream.
///
/// `option` is the canonical (alias-resolved) option id; `index` is the
/// position of the first token consumed. Everything but the claimed mark is
/// fixed once the arg is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Arg {
    option: OptSpecifier,
    spelling: String,
    index: usize,
    values: Vec<String>,
    claimed: bool,
}

impl Arg {
    pub fn new(
        option: OptSpecifier,
        spelling: impl Into<String>,
        index: usize,
        values: Vec<String>,
    ) -> Self {
        Self {
            option,
            spelling: spelling.into(),
            index,
            values,
            claimed: false,
        }
    }

    pub fn option(&self) -> OptSpecifier {
        self.option
    }

    /// The matched `prefix+name`, or the canonical spelling for aliases.
    pub fn spelling(&self) -> &str {
        &self.spelling
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// First value, if the option carries any.
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    /// Marks this arg as consumed. Claiming twice is harmless.
    pub fn claim(&mut self) {
        self.claimed = true;
    }
}

/// Ordered, claim-aware collection of parsed [`Arg`]s.
///
/// Args are kept in token order. Queries hand out references into the list
/// itself, so a claim made through one query is visible to every later one.
///
/// # Examples
///
/// ```
/// use opt_table_core::{Arg, ArgumentList, OptSpecifier};
///
/// const OUT: OptSpecifier = OptSpecifier::new(2);
///
/// let mut args = ArgumentList::new();
/// args.push(Arg::new(OUT, "-o", 0, vec!["a.out".into()]));
/// args.push(Arg::new(OUT, "-o", 2, vec!["b.out".into()]));
///
/// assert_eq!(args.get_last_arg_no_claim(OUT).unwrap().value(), Some("b.out"));
/// assert_eq!(args.unclaimed().count(), 2);
///
/// assert_eq!(args.get_last_arg_value(OUT), Some("b.out"));
/// assert_eq!(args.unclaimed().count(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArgumentList {
    args: Vec<Arg>,
}

impl ArgumentList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Appends an arg at the end of the list.
    pub fn push(&mut self, arg: Arg) {
        self.args.push(arg);
    }

    pub fn get(&self, index: usize) -> Option<&Arg> {
        self.args.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arg> {
        self.args.iter()
    }

    /// Args whose option is `id`, in token order. Claims nothing.
    pub fn matching(&self, id: impl Into<OptSpecifier>) -> impl Iterator<Item = &Arg> {
        let id = id.into();
        self.args.iter().filter(move |arg| arg.option == id)
    }

    /// Args no query has claimed yet, in token order.
    pub fn unclaimed(&self) -> impl Iterator<Item = &Arg> {
        self.args.iter().filter(|arg| !arg.claimed)
    }

    /// Returns `true` if any of `ids` occurred, claiming every occurrence.
    pub fn has_arg(&mut self, ids: impl OptIds) -> bool {
        self.get_last_arg(ids).is_some()
    }

    /// Returns `true` if any of `ids` occurred. Claims nothing.
    pub fn has_arg_no_claim(&self, ids: impl OptIds) -> bool {
        self.get_last_arg_no_claim(ids).is_some()
    }

    /// Returns the last arg for any of `ids`, claiming every match on the way.
    pub fn get_last_arg(&mut self, ids: impl OptIds) -> Option<&Arg> {
        let mut last = None;
        for (pos, arg) in self.args.iter_mut().enumerate() {
            if ids.contains_id(arg.option) {
                arg.claim();
                last = Some(pos);
            }
        }
        last.map(|pos| &self.args[pos])
    }

    /// Returns the last arg for any of `ids`. Claims nothing.
    pub fn get_last_arg_no_claim(&self, ids: impl OptIds) -> Option<&Arg> {
        self.args
            .iter()
            .rev()
            .find(|arg| ids.contains_id(arg.option))
    }

    /// First value of the last arg for `ids`, claiming every match.
    pub fn get_last_arg_value(&mut self, ids: impl OptIds) -> Option<&str> {
        self.get_last_arg(ids).and_then(Arg::value)
    }

    /// Parses the first value of the last arg for `ids` as `T`, claiming
    /// every match.
    ///
    /// Returns `Ok(None)` when the option did not occur or carries no value.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Invalid`] when the value does not parse.
    pub fn parse_last_arg_value<T>(&mut self, ids: impl OptIds) -> Result<Option<T>, ValueError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(arg) = self.get_last_arg(ids) else {
            return Ok(None);
        };
        let Some(value) = arg.value() else {
            return Ok(None);
        };
        value
            .parse::<T>()
            .map(Some)
            .map_err(|err| ValueError::Invalid {
                spelling: arg.spelling().to_string(),
                value: value.to_string(),
                reason: err.to_string(),
            })
    }

    /// Returns `true` if the last occurrence of `id` exists; `default`
    /// otherwise. Claims every match.
    pub fn get_flag(&mut self, id: impl Into<OptSpecifier>, default: bool) -> bool {
        let id = id.into();
        self.get_last_arg(id).map_or(default, |arg| arg.option == id)
    }

    /// Like [`get_flag`](Self::get_flag) but claims nothing.
    pub fn get_flag_no_claim(&self, id: impl Into<OptSpecifier>, default: bool) -> bool {
        let id = id.into();
        self.get_last_arg_no_claim(id).map_or(default, |arg| arg.option == id)
    }

    /// Resolves a positive/negative flag pair: whichever of the two occurred
    /// last wins, `default` if neither did. Claims every match of both.
    pub fn get_flag_pair(
        &mut self,
        positive: impl Into<OptSpecifier>,
        negative: impl Into<OptSpecifier>,
        default: bool,
    ) -> bool {
        let positive = positive.into();
        let negative = negative.into();
        self.get_last_arg([positive, negative])
            .map_or(default, |arg| arg.option == positive)
    }

    /// Like [`get_flag_pair`](Self::get_flag_pair) but claims nothing.
    pub fn get_flag_pair_no_claim(
        &self,
        positive: impl Into<OptSpecifier>,
        negative: impl Into<OptSpecifier>,
        default: bool,
    ) -> bool {
        let positive = positive.into();
        let negative = negative.into();
        self.get_last_arg_no_claim([positive, negative])
            .map_or(default, |arg| arg.option == positive)
    }

    /// All values of every arg for `ids`, in token order. Claims every match.
    pub fn get_all_arg_values(&mut self, ids: impl OptIds) -> Vec<String> {
        let mut values = Vec::new();
        for arg in self.args.iter_mut().filter(|arg| ids.contains_id(arg.option)) {
            arg.claim();
            values.extend(arg.values.iter().cloned());
        }
        values
    }

    /// Claims every arg in the list.
    pub fn claim_all_args(&mut self) {
        self.args.iter_mut().for_each(Arg::claim);
    }

    /// Claims every arg for `ids`.
    pub fn claim_args(&mut self, ids: impl OptIds) {
        self.args
            .iter_mut()
            .filter(|arg| ids.contains_id(arg.option))
            .for_each(Arg::claim);
    }

    /// Removes every arg for `ids`.
    pub fn remove_all_args(&mut self, ids: impl OptIds) {
        self.args.retain(|arg| !ids.contains_id(arg.option));
    }
}

impl Index<usize> for ArgumentList {
    type Output = Arg;

    fn index(&self, index: usize) -> &Arg {
        &self.args[index]
    }
}

impl<'a> IntoIterator for &'a ArgumentList {
    type Item = &'a Arg;
    type IntoIter = std::slice::Iter<'a, Arg>;

    fn into_iter(self) -> Self::IntoIter {
        self.args.iter()
    }
}

impl IntoIterator for ArgumentList {
    type Item = Arg;
    type IntoIter = std::vec::IntoIter<Arg>;

    fn into_iter(self) -> Self::IntoIter {
        self.args.into_iter()
    }
}

impl FromIterator<Arg> for ArgumentList {
    fn from_iter<I: IntoIterator<Item = Arg>>(iter: I) -> Self {
        Self {
            args: iter.into_iter().collect(),
        }
    }
}

impl Extend<Arg> for ArgumentList {
    fn extend<I: IntoIterator<Item = Arg>>(&mut self, iter: I) {
        self.args.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POS: OptSpecifier = OptSpecifier::new(1);
    const NEG: OptSpecifier = OptSpecifier::new(2);
    const OUT: OptSpecifier = OptSpecifier::new(3);
    const DEF: OptSpecifier = OptSpecifier::new(4);

    fn arg(option: OptSpecifier, spelling: &str, index: usize, values: &[&str]) -> Arg {
        Arg::new(
            option,
            spelling,
            index,
            values.iter().map(|v| v.to_string()).collect(),
        )
    }

    fn sample() -> ArgumentList {
        [
            arg(POS, "-fpos", 0, &[]),
            arg(OUT, "-o", 1, &["first"]),
            arg(DEF, "-D", 3, &["A", "B"]),
            arg(NEG, "-fno-pos", 4, &[]),
            arg(OUT, "-o", 5, &["second"]),
            arg(DEF, "-D", 7, &["C"]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_arg_properties_and_claim() {
        let mut a = arg(OUT, "-o", 0, &["value1"]);
        assert!(!a.is_claimed());
        assert_eq!(a.index(), 0);
        assert_eq!(a.spelling(), "-o");
        assert_eq!(a.value(), Some("value1"));
        assert_eq!(a.values(), ["value1"]);

        a.claim();
        a.claim();
        assert!(a.is_claimed());
        assert_eq!(a.value(), Some("value1"));
    }

    #[test]
    fn test_matching_does_not_claim() {
        let args = sample();
        let found: Vec<usize> = args.matching(OUT).map(Arg::index).collect();
        assert_eq!(found, vec![1, 5]);
        assert_eq!(args.unclaimed().count(), args.len());
    }

    #[test]
    fn test_get_last_arg_claims_every_match() {
        let mut args = sample();
        let last = args.get_last_arg(OUT).unwrap();
        assert_eq!(last.value(), Some("second"));
        assert!(last.is_claimed());
        assert!(args.matching(OUT).all(Arg::is_claimed));
        assert_eq!(args.unclaimed().count(), 4);
    }

    #[test]
    fn test_get_last_arg_across_several_ids() {
        let mut args = sample();
        let last = args.get_last_arg([POS, NEG]).unwrap();
        assert_eq!(last.spelling(), "-fno-pos");
        assert!(args[0].is_claimed());
        assert!(args[3].is_claimed());
    }

    #[test]
    fn test_no_claim_queries_leave_list_untouched() {
        let args = sample();
        let before = args.clone();
        assert_eq!(args.get_last_arg_no_claim(OUT).unwrap().index(), 5);
        assert!(args.has_arg_no_claim(DEF));
        assert!(!args.has_arg_no_claim(99));
        assert!(!args.get_flag_pair_no_claim(POS, NEG, true));
        assert_eq!(args, before);
    }

    #[test]
    fn test_flags() {
        let mut args = sample();
        assert!(args.get_flag_no_claim(OUT, false));
        assert!(args.unclaimed().any(|arg| arg.option() == OUT));
        assert!(!args.get_flag_pair(POS, NEG, true));
        assert!(args.get_flag(OUT, false));
        assert!(args.get_flag(99, true));
        assert!(!args.get_flag(99, false));

        let mut empty = ArgumentList::new();
        assert!(empty.get_flag_pair(POS, NEG, true));
        assert!(!empty.get_flag_pair(POS, NEG, false));
    }

    #[test]
    fn test_get_all_arg_values_flattens_in_order() {
        let mut args = sample();
        assert_eq!(args.get_all_arg_values(DEF), vec!["A", "B", "C"]);
        assert!(args.matching(DEF).all(Arg::is_claimed));
        assert!(args.get_all_arg_values(99).is_empty());
    }

    #[test]
    fn test_claim_all_and_claim_filtered() {
        let mut args = sample();
        args.claim_args(DEF);
        assert_eq!(args.unclaimed().count(), 4);
        args.claim_all_args();
        assert!(args.iter().all(Arg::is_claimed));
    }

    #[test]
    fn test_remove_all_args() {
        let mut args = sample();
        args.remove_all_args(OUT);
        assert_eq!(args.len(), 4);
        assert!(!args.has_arg_no_claim(OUT));
        args.remove_all_args([POS, NEG]);
        let left: Vec<&str> = args.iter().map(Arg::spelling).collect();
        assert_eq!(left, vec!["-D", "-D"]);
    }

    #[test]
    fn test_parse_last_arg_value() {
        let mut args: ArgumentList = [
            arg(OUT, "-j", 0, &["4"]),
            arg(DEF, "-O", 1, &["fast"]),
        ]
        .into_iter()
        .collect();

        assert_eq!(args.parse_last_arg_value::<u32>(OUT), Ok(Some(4)));
        assert_eq!(args.parse_last_arg_value::<u32>(POS), Ok(None));

        let err = args.parse_last_arg_value::<u8>(DEF).unwrap_err();
        let ValueError::Invalid {
            spelling, value, ..
        } = err;
        assert_eq!(spelling, "-O");
        assert_eq!(value, "fast");
        assert!(args.iter().all(Arg::is_claimed));
    }

    #[test]
    fn test_serializes_as_sequence() {
        let args: ArgumentList = [arg(OUT, "-o", 0, &["x"])].into_iter().collect();
        let json = serde_json::to_value(&args).unwrap();
        assert_eq!(json[0]["option"], 3);
        assert_eq!(json[0]["spelling"], "-o");
        assert_eq!(json[0]["values"][0], "x");
        assert_eq!(json[0]["claimed"], false);
    }
}
