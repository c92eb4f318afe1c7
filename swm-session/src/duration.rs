//! Duration field editing and parsing
//!
//! The field is deliberately permissive: whatever the user types is kept,
//! and anything that is not an integer counts as zero minutes.

/// Longest text the field accepts
const MAX_FIELD_LEN: usize = 6;

/// Parse the duration field into minutes. Non-numeric text yields 0.
pub fn parse_minutes(text: &str) -> i64 {
    text.trim().parse::<i64>().unwrap_or(0)
}

/// Convert minutes to countdown seconds, saturating at zero for
/// non-positive input.
pub fn minutes_to_secs(minutes: i64) -> u64 {
    u64::try_from(minutes).unwrap_or(0).saturating_mul(60)
}

/// Editable text buffer behind the duration field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DurationInput {
    text: String,
}

impl DurationInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current value in minutes
    pub fn minutes(&self) -> i64 {
        parse_minutes(&self.text)
    }

    /// Replace the whole field
    pub fn set(&mut self, text: &str) {
        self.text = text.chars().take(MAX_FIELD_LEN).collect();
    }

    /// Append a typed character. Returns false if the field is full.
    pub fn push(&mut self, c: char) -> bool {
        if self.text.chars().count() >= MAX_FIELD_LEN || c.is_control() {
            return false;
        }
        self.text.push(c);
        true
    }

    /// Remove the last character
    pub fn pop(&mut self) -> Option<char> {
        self.text.pop()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_minutes("25"), 25);
        assert_eq!(parse_minutes(" 45 "), 45);
        assert_eq!(parse_minutes("-3"), -3);
        assert_eq!(parse_minutes(""), 0);
        assert_eq!(parse_minutes("abc"), 0);
        assert_eq!(parse_minutes("1.5"), 0);
    }

    #[test]
    fn test_minutes_to_secs_saturates() {
        assert_eq!(minutes_to_secs(1), 60);
        assert_eq!(minutes_to_secs(90), 5400);
        assert_eq!(minutes_to_secs(0), 0);
        assert_eq!(minutes_to_secs(-10), 0);
    }

    #[test]
    fn test_field_editing() {
        let mut input = DurationInput::new("3");
        assert!(input.push('0'));
        assert_eq!(input.minutes(), 30);

        assert_eq!(input.pop(), Some('0'));
        assert_eq!(input.text(), "3");

        input.clear();
        assert_eq!(input.minutes(), 0);
        assert_eq!(input.pop(), None);
    }

    #[test]
    fn test_field_length_limit() {
        let mut input = DurationInput::default();
        for _ in 0..MAX_FIELD_LEN {
            assert!(input.push('9'));
        }
        assert!(!input.push('9'));
        assert_eq!(input.text().len(), MAX_FIELD_LEN);

        input.set("1234567890");
        assert_eq!(input.text(), "123456");
    }
}
