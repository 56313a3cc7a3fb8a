use std::collections::HashMap;

use super::TokenKind;

/// Map from terminal spellings to token kinds. The scanner probes it
/// one character at a time, so `can_match` answers whether a longer
/// terminal could still be read.
#[derive(Debug, Clone, Default)]
pub struct LexMap {
    map: HashMap<&'static str, TokenKind>,
}

impl LexMap {
    pub fn insert(&mut self, key: &'static str, value: TokenKind) {
        self.map.insert(key, value);
    }

    pub fn can_match(&self, key: &str) -> bool {
        for map_key in self.map.keys() {
            if map_key.starts_with(key) {
                return true;
            }
        }
        false
    }

    pub fn get(&self, key: &str) -> Option<TokenKind> {
        self.map.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_probe() {
        let mut map = LexMap::default();
        map.insert(">", TokenKind::GreaterThan);
        map.insert(">=", TokenKind::GreaterOrEqual);

        assert!(map.can_match(">"));
        assert!(map.can_match(">="));
        assert!(!map.can_match(">>"));
        assert_eq!(map.get(">"), Some(TokenKind::GreaterThan));
        assert_eq!(map.get(">="), Some(TokenKind::GreaterOrEqual));
    }

    #[test]
    fn test_bang_requires_continuation() {
        let mut map = LexMap::default();
        map.insert("!=", TokenKind::NotEqual);

        assert!(map.can_match("!"));
        assert_eq!(map.get("!"), None);
    }
}
