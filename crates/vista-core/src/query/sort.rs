/// One ordering key. A leading `-` in the raw form means descending.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }

    /// Parse `name` or `-name`. Blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw.strip_prefix('-') {
            Some(field) if !field.is_empty() => Some(Self::desc(field)),
            Some(_) => None,
            None if raw.is_empty() => None,
            None => Some(Self::asc(raw)),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.descending {
            write!(f, "-{}", self.field)
        } else {
            write!(f, "{}", self.field)
        }
    }
}

/// Parse a comma-separated `sort_by` value, skipping blank segments.
pub fn parse_sort_by(raw: &str) -> Vec<SortKey> {
    raw.split(',').filter_map(SortKey::parse).collect()
}
