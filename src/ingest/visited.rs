use std::collections::HashSet;

/// URLs already classified or excluded during this process's lifetime.
///
/// Grows monotonically; there is no way to forget a URL.
#[derive(Debug, Default, Clone)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the URL was not already present.
    pub fn insert(&mut self, url: impl Into<String>) -> bool {
        self.urls.insert(url.into())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for VisitedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            urls: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_novelty() {
        let mut visited = VisitedSet::new();
        assert!(visited.insert("https://x/1"));
        assert!(!visited.insert("https://x/1"));
        assert_eq!(visited.len(), 1);
        assert!(visited.contains("https://x/1"));
        assert!(!visited.contains("https://x/2"));
    }

    #[test]
    fn collects_from_ref_urls() {
        let visited: VisitedSet = ["https://x/1", "https://x/2", "https://x/1"]
            .into_iter()
            .collect();
        assert_eq!(visited.len(), 2);
    }
}
