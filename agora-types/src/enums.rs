use serde::{Deserialize, Serialize};

/// Which article field a listing search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Title,
    Content,
    UserId,
    Nickname,
    Hashtag,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Title => "title",
            SearchType::Content => "content",
            SearchType::UserId => "user_id",
            SearchType::Nickname => "nickname",
            SearchType::Hashtag => "hashtag",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "title" => Some(SearchType::Title),
            "content" => Some(SearchType::Content),
            "user_id" => Some(SearchType::UserId),
            "nickname" => Some(SearchType::Nickname),
            "hashtag" => Some(SearchType::Hashtag),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_every_variant() {
        for search_type in [
            SearchType::Title,
            SearchType::Content,
            SearchType::UserId,
            SearchType::Nickname,
            SearchType::Hashtag,
        ] {
            assert_eq!(SearchType::parse(search_type.as_str()), Some(search_type));
        }
        assert_eq!(SearchType::parse("karma"), None);
    }
}
