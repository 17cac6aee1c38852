//! `baseType[size]` array definitions.

use std::sync::LazyLock;

use regex::Regex;

// Constant pattern: it always compiles, so `None` is unreachable.
static ARRAY_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(\w+)\[(\d+)\]$").ok());

/// A parsed array definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayDefinition {
    pub base: String,
    pub size: u64,
}

impl ArrayDefinition {
    /// Parse `identifier[non-negative integer]`, surrounding whitespace
    /// ignored. Sizes that do not fit in `u64` are rejected.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = ARRAY_PATTERN.as_ref()?.captures(text.trim())?;
        let size = caps[2].parse().ok()?;
        Some(Self {
            base: caps[1].to_string(),
            size,
        })
    }
}

impl std::fmt::Display for ArrayDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.base, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_accepts_sized_identifier() {
        assert_eq!(
            ArrayDefinition::parse("uint8[10]"),
            Some(ArrayDefinition {
                base: "uint8".to_string(),
                size: 10
            })
        );
        assert_eq!(ArrayDefinition::parse(" Speed[0] ").map(|a| a.size), Some(0));
    }

    #[rstest]
    #[case("uint8")]
    #[case("uint8[]")]
    #[case("uint8[x]")]
    #[case("uint8[-1]")]
    #[case("[4]")]
    #[case("uint8 [4]")]
    #[case("uint8[99999999999999999999999]")]
    fn test_parse_rejects(#[case] text: &str) {
        assert_eq!(ArrayDefinition::parse(text), None);
    }

    #[test]
    fn test_display_round_trips() {
        let def = ArrayDefinition::parse("Speed[3]").unwrap();
        assert_eq!(def.to_string(), "Speed[3]");
    }
}
