//! Sequential asset identifiers.
//!
//! Tags look like `CompDes001`: the first four characters of the category
//! group, the first three of the subgroup, then a three digit counter. Names
//! look like `PLAN-ICT-DES01`: four characters each of location and
//! department, the uppercased category suffix, then a two digit counter.
//!
//! Counters widen past their nominal width (`999` is followed by `1000`).
//! Identifiers are therefore ordered by length first, then lexically, which
//! matches numeric order for the digit-only remainder.

use std::cmp::Ordering;

use super::Error;

/// Characters of the category group kept in the tag prefix.
pub const GROUP_PREFIX_LEN: usize = 4;
/// Characters of the category subgroup kept in tag and name prefixes.
pub const SUBGROUP_PREFIX_LEN: usize = 3;
/// Characters of location and department names kept in name prefixes.
pub const SITE_PREFIX_LEN: usize = 4;
/// Minimum digits in a tag counter.
pub const TAG_SUFFIX_WIDTH: usize = 3;
/// Minimum digits in a name counter.
pub const NAME_SUFFIX_WIDTH: usize = 2;

/// Reasons an identifier cannot be derived.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    /// The category name has no `:` separator.
    #[error("category `{name}` must be named `<Group>:<Subgroup>`")]
    MissingSubgroup {
        /// Offending category name.
        name: String,
    },
    /// One side of the `:` is blank.
    #[error("category `{name}` has an empty {segment} segment")]
    EmptySegment {
        /// Offending category name.
        name: String,
        /// `group` or `subgroup`.
        segment: &'static str,
    },
    /// The stored greatest identifier does not belong to the prefix.
    #[error("identifier `{value}` does not continue the `{prefix}` sequence")]
    ForeignIdentifier {
        /// Prefix being continued.
        prefix: String,
        /// Stored identifier.
        value: String,
    },
    /// The counter cannot be incremented.
    #[error("the `{prefix}` sequence is exhausted")]
    Exhausted {
        /// Prefix being continued.
        prefix: String,
    },
}

impl From<SequenceError> for Error {
    fn from(value: SequenceError) -> Self {
        Error::invalid_state(value.to_string())
    }
}

/// The two halves of a `"<Group>:<Subgroup>"` category name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySegments<'a> {
    group: &'a str,
    subgroup: &'a str,
}

impl<'a> CategorySegments<'a> {
    /// Group segment, trimmed.
    pub const fn group(&self) -> &'a str {
        self.group
    }

    /// Subgroup segment, trimmed.
    pub const fn subgroup(&self) -> &'a str {
        self.subgroup
    }
}

/// Split a category name into its first two `:`-delimited segments.
///
/// Segments after the second are ignored.
///
/// # Examples
/// ```
/// use stockroom::domain::sequence::split_category_name;
///
/// let segments = split_category_name("Computers: Desktop").expect("valid category");
/// assert_eq!(segments.group(), "Computers");
/// assert_eq!(segments.subgroup(), "Desktop");
/// assert_eq!(split_category_name("A:B:C").expect("valid category").subgroup(), "B");
/// assert!(split_category_name("Computers").is_err());
/// ```
pub fn split_category_name(name: &str) -> Result<CategorySegments<'_>, SequenceError> {
    let mut segments = name.split(':').map(str::trim);
    let (Some(group), Some(subgroup)) = (segments.next(), segments.next()) else {
        return Err(SequenceError::MissingSubgroup {
            name: name.to_owned(),
        });
    };
    if group.is_empty() {
        return Err(SequenceError::EmptySegment {
            name: name.to_owned(),
            segment: "group",
        });
    }
    if subgroup.is_empty() {
        return Err(SequenceError::EmptySegment {
            name: name.to_owned(),
            segment: "subgroup",
        });
    }
    Ok(CategorySegments { group, subgroup })
}

/// Which asset column a sequence numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    /// `assets.tag`
    Tag,
    /// `assets.name`
    Name,
}

impl IdentifierKind {
    /// Minimum counter width.
    pub const fn suffix_width(self) -> usize {
        match self {
            Self::Tag => TAG_SUFFIX_WIDTH,
            Self::Name => NAME_SUFFIX_WIDTH,
        }
    }

    /// Short label for logs and lock keys.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Name => "name",
        }
    }
}

/// The fixed part of an identifier sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentifierPrefix {
    kind: IdentifierKind,
    value: String,
}

impl IdentifierPrefix {
    /// Sequence column.
    pub const fn kind(&self) -> IdentifierKind {
        self.kind
    }

    /// Prefix text.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The counter of `candidate`, if it belongs to this sequence.
    pub fn counter_of<'a>(&self, candidate: &'a str) -> Option<&'a str> {
        let counter = candidate.strip_prefix(self.value.as_str())?;
        (!counter.is_empty() && counter.bytes().all(|byte| byte.is_ascii_digit()))
            .then_some(counter)
    }

    /// The identifier numbered `counter`.
    pub fn render(&self, counter: u64) -> String {
        format!(
            "{}{:0width$}",
            self.value,
            counter,
            width = self.kind.suffix_width()
        )
    }
}

/// Sequence order: shorter identifiers first, then lexical.
pub fn compare_identifiers(left: &str, right: &str) -> Ordering {
    left.len()
        .cmp(&right.len())
        .then_with(|| left.cmp(right))
}

fn leading(value: &str, count: usize) -> String {
    value.chars().take(count).collect()
}

fn site_segment(value: &str) -> String {
    value
        .trim()
        .chars()
        .take(SITE_PREFIX_LEN)
        .flat_map(char::to_uppercase)
        .collect()
}

/// Tag prefix for a category: `Computers:Desktop` gives `CompDes`.
pub fn tag_prefix(category_name: &str) -> Result<IdentifierPrefix, SequenceError> {
    let segments = split_category_name(category_name)?;
    let value = format!(
        "{}{}",
        leading(segments.group(), GROUP_PREFIX_LEN),
        leading(segments.subgroup(), SUBGROUP_PREFIX_LEN)
    );
    Ok(IdentifierPrefix {
        kind: IdentifierKind::Tag,
        value,
    })
}

/// Name prefix for a placement: `Plant`, `ICT`, `Computers:Desktop` gives
/// `PLAN-ICT-DES`.
pub fn name_prefix(
    location_name: &str,
    department_name: &str,
    category_name: &str,
) -> Result<IdentifierPrefix, SequenceError> {
    let segments = split_category_name(category_name)?;
    let location = site_segment(location_name);
    let department = site_segment(department_name);
    let category = leading(segments.subgroup(), SUBGROUP_PREFIX_LEN).to_uppercase();
    Ok(IdentifierPrefix {
        kind: IdentifierKind::Name,
        value: format!("{location}-{department}-{category}"),
    })
}

/// Next identifier after `greatest`, the current maximum of the sequence.
///
/// # Examples
/// ```
/// use stockroom::domain::sequence::{next_identifier, tag_prefix};
///
/// let prefix = tag_prefix("Computers:Desktop").expect("valid category");
/// assert_eq!(next_identifier(&prefix, None).expect("first"), "CompDes001");
/// assert_eq!(next_identifier(&prefix, Some("CompDes041")).expect("next"), "CompDes042");
/// assert_eq!(next_identifier(&prefix, Some("CompDes999")).expect("widen"), "CompDes1000");
/// ```
pub fn next_identifier(
    prefix: &IdentifierPrefix,
    greatest: Option<&str>,
) -> Result<String, SequenceError> {
    let Some(greatest) = greatest else {
        return Ok(prefix.render(1));
    };
    let foreign = || SequenceError::ForeignIdentifier {
        prefix: prefix.as_str().to_owned(),
        value: greatest.to_owned(),
    };
    let counter = prefix.counter_of(greatest).ok_or_else(foreign)?;
    let next = counter
        .parse::<u64>()
        .ok()
        .and_then(|current| current.checked_add(1))
        .ok_or_else(|| SequenceError::Exhausted {
            prefix: prefix.as_str().to_owned(),
        })?;
    Ok(prefix.render(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Computers:Desktop", "CompDes")]
    #[case(" Computers : Desktop ", "CompDes")]
    #[case("IT:PC", "ITPC")]
    #[case("Vehicles:Pickup:4x4", "VehiPic")]
    #[case("A:B:C", "AB")]
    #[case("Équipement:Écran", "ÉquiÉcr")]
    fn tag_prefix_truncates_segments(#[case] category: &str, #[case] expected: &str) {
        let prefix = tag_prefix(category).expect("valid category");
        assert_eq!(prefix.as_str(), expected);
        assert_eq!(prefix.kind(), IdentifierKind::Tag);
    }

    #[rstest]
    #[case("Plant", "ICT", "Computers:Desktop", "PLAN-ICT-DES")]
    #[case("Head Office", "Finance", "Furniture:chair", "HEAD-FINA-CHA")]
    #[case("R&D Lab", "I.C.T", "Computers:Desktop", "R&D -I.C.-DES")]
    #[case("Lab", "ICT", "Lab:Scope:Digital", "LAB-ICT-SCO")]
    fn name_prefix_truncates_and_uppercases(
        #[case] location: &str,
        #[case] department: &str,
        #[case] category: &str,
        #[case] expected: &str,
    ) {
        let prefix = name_prefix(location, department, category).expect("valid placement");
        assert_eq!(prefix.as_str(), expected);
    }

    #[rstest]
    #[case("Computers")]
    #[case("Computers:")]
    #[case(":Desktop")]
    #[case("  :  ")]
    fn malformed_categories_are_rejected(#[case] category: &str) {
        assert!(tag_prefix(category).is_err());
        let err: Error = tag_prefix(category).expect_err("malformed").into();
        assert_eq!(err.code(), crate::domain::ErrorCode::InvalidState);
    }

    #[rstest]
    #[case(None, "CompDes001")]
    #[case(Some("CompDes001"), "CompDes002")]
    #[case(Some("CompDes099"), "CompDes100")]
    #[case(Some("CompDes999"), "CompDes1000")]
    #[case(Some("CompDes1000"), "CompDes1001")]
    fn next_tag_increments_counter(#[case] greatest: Option<&str>, #[case] expected: &str) {
        let prefix = tag_prefix("Computers:Desktop").expect("valid category");
        assert_eq!(
            next_identifier(&prefix, greatest).expect("next tag"),
            expected
        );
    }

    #[rstest]
    #[case(None, "PLAN-ICT-DES01")]
    #[case(Some("PLAN-ICT-DES01"), "PLAN-ICT-DES02")]
    #[case(Some("PLAN-ICT-DES99"), "PLAN-ICT-DES100")]
    fn next_name_uses_two_digits(#[case] greatest: Option<&str>, #[case] expected: &str) {
        let prefix = name_prefix("Plant", "ICT", "Computers:Desktop").expect("valid placement");
        assert_eq!(
            next_identifier(&prefix, greatest).expect("next name"),
            expected
        );
    }

    #[rstest]
    #[case("CompDesk001")]
    #[case("CompDes")]
    #[case("CompDe001")]
    fn next_identifier_rejects_foreign_values(#[case] stored: &str) {
        let prefix = tag_prefix("Computers:Desktop").expect("valid category");
        assert!(matches!(
            next_identifier(&prefix, Some(stored)),
            Err(SequenceError::ForeignIdentifier { .. })
        ));
    }

    #[rstest]
    fn counter_of_ignores_longer_prefixes() {
        let prefix = tag_prefix("IT:PC").expect("valid category");
        assert_eq!(prefix.counter_of("ITPC007"), Some("007"));
        assert_eq!(prefix.counter_of("ITPCX007"), None);
    }

    #[rstest]
    fn ordering_is_numeric_for_widened_counters() {
        let mut tags = vec!["CompDes1000", "CompDes999", "CompDes010"];
        tags.sort_by(|left, right| compare_identifiers(left, right));
        assert_eq!(tags, vec!["CompDes010", "CompDes999", "CompDes1000"]);
    }
}
