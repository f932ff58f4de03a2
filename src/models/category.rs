/// The fixed set of expense classifications. Every expense and budget row
/// carries exactly one of these; there is no user-defined category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Food,
    Transportation,
    Housing,
    Entertainment,
    Utilities,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transportation => "Transportation",
            Self::Housing => "Housing",
            Self::Entertainment => "Entertainment",
            Self::Utilities => "Utilities",
            Self::Other => "Other",
        }
    }

    /// Strict, case-insensitive membership check. Returns `None` for any
    /// name outside the fixed set; "Other" must be named explicitly.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "food" => Some(Self::Food),
            "transportation" => Some(Self::Transportation),
            "housing" => Some(Self::Housing),
            "entertainment" => Some(Self::Entertainment),
            "utilities" => Some(Self::Utilities),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Self::Food,
            Self::Transportation,
            Self::Housing,
            Self::Entertainment,
            Self::Utilities,
            Self::Other,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
