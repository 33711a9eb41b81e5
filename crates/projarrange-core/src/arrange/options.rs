//! Arrangement option flags.
//!
//! `ArrangeOptions` is a small set of independent toggles. It parses from and
//! prints as a comma-separated list of flag names, the same syntax used in
//! `<!-- Options: ... -->` marker comments, on the command line, and in JSON
//! settings files.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ArrangeError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ArrangeOptions(u8);

/// Single flags, in declaration order.
const FLAGS: [(&str, ArrangeOptions); 5] = [
    ("CombineRootElements", ArrangeOptions::COMBINE_ROOT_ELEMENTS),
    ("KeepCommentWithNext", ArrangeOptions::KEEP_COMMENT_WITH_NEXT),
    ("KeepImportWithNext", ArrangeOptions::KEEP_IMPORT_WITH_NEXT),
    ("SortRootElements", ArrangeOptions::SORT_ROOT_ELEMENTS),
    ("SplitItemGroups", ArrangeOptions::SPLIT_ITEM_GROUPS),
];

/// Names that stand for several flags at once.
const AGGREGATES: [(&str, ArrangeOptions); 3] = [
    ("None", ArrangeOptions::NONE),
    ("All", ArrangeOptions::ALL),
    ("NoRoot", ArrangeOptions::NO_ROOT),
];

impl ArrangeOptions {
    /// Merge root-level siblings that share name and attributes.
    pub const COMBINE_ROOT_ELEMENTS: Self = Self(1 << 0);
    /// Move comments together with the element that follows them.
    pub const KEEP_COMMENT_WITH_NEXT: Self = Self(1 << 1);
    /// Order an `Import` element by the name of the element after it.
    pub const KEEP_IMPORT_WITH_NEXT: Self = Self(1 << 2);
    /// Sort the root element's children.
    pub const SORT_ROOT_ELEMENTS: Self = Self(1 << 3);
    /// Split `ItemGroup` elements holding several item types.
    pub const SPLIT_ITEM_GROUPS: Self = Self(1 << 4);

    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b1_1111);
    pub const NO_ROOT: Self = Self(Self::ALL.0 & !Self::COMBINE_ROOT_ELEMENTS.0 & !Self::SORT_ROOT_ELEMENTS.0);

    pub const fn empty() -> Self {
        Self::NONE
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Looks up one flag or aggregate name. Matching is exact and
    /// case-sensitive.
    pub fn from_flag_name(name: &str) -> Option<Self> {
        FLAGS
            .iter()
            .chain(AGGREGATES.iter())
            .find(|(flag_name, _)| *flag_name == name)
            .map(|&(_, flag)| flag)
    }

    /// Parses a comma-separated flag list. Whitespace around each name is
    /// ignored; an empty list or an unknown name yields `None`.
    pub fn parse_list(list: &str) -> Option<Self> {
        let mut options = Self::empty();
        for name in list.split(',') {
            options.insert(Self::from_flag_name(name.trim())?);
        }
        Some(options)
    }

    /// Names of the single flags set in `self`.
    pub fn flag_names(self) -> impl Iterator<Item = &'static str> {
        let flags: &'static [(&str, Self)] = &FLAGS;
        flags
            .iter()
            .filter(move |&&(_, flag)| self.contains(flag))
            .map(|&(name, _)| name)
    }
}

impl BitOr for ArrangeOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for ArrangeOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl FromStr for ArrangeOptions {
    type Err = ArrangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_list(s).ok_or_else(|| ArrangeError::Config {
            message: format!("unknown arrange options '{}'", s),
        })
    }
}

impl fmt::Display for ArrangeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        let names: Vec<&str> = self.flag_names().collect();
        f.write_str(&names.join(", "))
    }
}

impl Serialize for ArrangeOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ArrangeOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(ArrangeOptions::default().is_empty());
        assert_eq!(ArrangeOptions::default().to_string(), "None");
    }

    #[test]
    fn union_and_contains() {
        let options = ArrangeOptions::SORT_ROOT_ELEMENTS | ArrangeOptions::SPLIT_ITEM_GROUPS;
        assert!(options.contains(ArrangeOptions::SORT_ROOT_ELEMENTS));
        assert!(options.contains(ArrangeOptions::SPLIT_ITEM_GROUPS));
        assert!(!options.contains(ArrangeOptions::COMBINE_ROOT_ELEMENTS));
        assert!(ArrangeOptions::ALL.contains(options));
    }

    #[test]
    fn no_root_excludes_root_flags() {
        let no_root = ArrangeOptions::NO_ROOT;
        assert!(!no_root.contains(ArrangeOptions::COMBINE_ROOT_ELEMENTS));
        assert!(!no_root.contains(ArrangeOptions::SORT_ROOT_ELEMENTS));
        assert!(no_root.contains(ArrangeOptions::KEEP_COMMENT_WITH_NEXT));
        assert_eq!(
            no_root | ArrangeOptions::COMBINE_ROOT_ELEMENTS | ArrangeOptions::SORT_ROOT_ELEMENTS,
            ArrangeOptions::ALL
        );
    }

    #[test]
    fn parses_comma_separated_list() {
        let options: ArrangeOptions = "CombineRootElements, SortRootElements".parse().unwrap();
        assert_eq!(
            options,
            ArrangeOptions::COMBINE_ROOT_ELEMENTS | ArrangeOptions::SORT_ROOT_ELEMENTS
        );
        assert_eq!(options.to_string(), "CombineRootElements, SortRootElements");
    }

    #[test]
    fn parses_aggregate_names() {
        assert_eq!("All".parse::<ArrangeOptions>().unwrap(), ArrangeOptions::ALL);
        assert_eq!("None".parse::<ArrangeOptions>().unwrap(), ArrangeOptions::NONE);
        assert_eq!(
            "NoRoot,SortRootElements".parse::<ArrangeOptions>().unwrap(),
            ArrangeOptions::NO_ROOT | ArrangeOptions::SORT_ROOT_ELEMENTS
        );
    }

    #[test]
    fn rejects_unknown_or_empty_names() {
        assert!(ArrangeOptions::parse_list("sortrootelements").is_none());
        assert!(ArrangeOptions::parse_list("SortRootElements,").is_none());
        assert!(ArrangeOptions::parse_list("").is_none());
        assert!(matches!(
            "Bogus".parse::<ArrangeOptions>(),
            Err(ArrangeError::Config { .. })
        ));
    }

    #[test]
    fn insert_and_bit_or_accumulate() {
        let mut options = ArrangeOptions::empty();
        options.insert(ArrangeOptions::KEEP_COMMENT_WITH_NEXT);
        options |= ArrangeOptions::SPLIT_ITEM_GROUPS;
        assert_eq!(
            options,
            ArrangeOptions::KEEP_COMMENT_WITH_NEXT | ArrangeOptions::SPLIT_ITEM_GROUPS
        );
    }

    #[test]
    fn serde_uses_flag_list_string() {
        let json = serde_json::to_string(&ArrangeOptions::ALL).unwrap();
        assert_eq!(
            json,
            "\"CombineRootElements, KeepCommentWithNext, KeepImportWithNext, SortRootElements, SplitItemGroups\""
        );
        let back: ArrangeOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ArrangeOptions::ALL);
        assert!(serde_json::from_str::<ArrangeOptions>("\"Nope\"").is_err());
    }
}
