/// Label the bound model emits for positive text.
pub const POSITIVE_LABEL: &str = "POSITIVE";
/// Label the bound model emits for negative text.
pub const NEGATIVE_LABEL: &str = "NEGATIVE";

/// Integer-coded sentiment returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Negative,
    /// Never produced by a two-class model; kept for three-class models.
    Neutral,
    Positive,
}

impl Sentiment {
    /// Maps a classifier label onto a sentiment. Unknown labels are neutral.
    pub fn from_label(label: &str) -> Self {
        match label {
            POSITIVE_LABEL => Self::Positive,
            NEGATIVE_LABEL => Self::Negative,
            _ => Self::Neutral,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Negative => 0,
            Self::Neutral => 1,
            Self::Positive => 2,
        }
    }
}

/// Raw output of a text classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub sentiment: Sentiment,
    pub confidence: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("POSITIVE", Sentiment::Positive, 2)]
    #[case("NEGATIVE", Sentiment::Negative, 0)]
    #[case("NEUTRAL", Sentiment::Neutral, 1)]
    #[case("LABEL_2", Sentiment::Neutral, 1)]
    #[case("positive", Sentiment::Neutral, 1)]
    #[case("", Sentiment::Neutral, 1)]
    fn test_label_mapping(#[case] label: &str, #[case] expected: Sentiment, #[case] code: u8) {
        let sentiment = Sentiment::from_label(label);
        assert_eq!(sentiment, expected);
        assert_eq!(sentiment.code(), code);
    }
}
