//! Ordered move history and its kifu string form.
//!
//! The kifu is the tokens joined by single spaces. It is both the shareable
//! session identifier and the stdin payload handed to the engine.

/// One notation token per half-move, in play order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    tokens: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    /// Serialize to the kifu string.
    pub fn serialize(&self) -> String {
        self.tokens.join(" ")
    }

    /// Split a kifu on whitespace. Blank input gives an empty history.
    pub fn deserialize(kifu: &str) -> Self {
        Self {
            tokens: kifu.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    /// Turn-numbered display lines, two plies per line:
    /// `["1. e2e4 e7e5", "2. Ng1f3"]`.
    pub fn numbered_lines(&self) -> Vec<String> {
        self.tokens
            .chunks(2)
            .enumerate()
            .map(|(i, pair)| format!("{}. {}", i + 1, pair.join(" ")))
            .collect()
    }
}

impl FromIterator<String> for History {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Display for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.serialize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_serialize_in_play_order() {
        let mut history = History::new();
        history.append("e2e4");
        history.append("e7e5");
        assert_eq!(history.serialize(), "e2e4 e7e5");
    }

    #[test]
    fn test_deserialize_blank() {
        assert!(History::deserialize("").is_empty());
        assert!(History::deserialize("   \t\n ").is_empty());
    }

    #[test]
    fn test_deserialize_collapses_whitespace() {
        let history = History::deserialize("  e2e4\t e7e5\nNg1f3 ");
        assert_eq!(history.tokens(), ["e2e4", "e7e5", "Ng1f3"]);
    }

    #[test]
    fn test_last_and_clear() {
        let mut history = History::deserialize("e2e4 e7e5");
        assert_eq!(history.last(), Some("e7e5"));

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.last(), None);
        assert_eq!(history.serialize(), "");
    }

    #[test]
    fn test_numbered_lines() {
        let history = History::deserialize("e2e4 e7e5 Ng1f3");
        assert_eq!(history.numbered_lines(), vec!["1. e2e4 e7e5", "2. Ng1f3"]);
        assert!(History::new().numbered_lines().is_empty());
    }

    proptest! {
        #[test]
        fn prop_kifu_round_trip(tokens in prop::collection::vec("[!-~]{1,8}", 0..40)) {
            let history: History = tokens.into_iter().collect();
            prop_assert_eq!(History::deserialize(&history.serialize()), history);
        }
    }
}
