//! Folder bounds restricting which elements a rule considers

use std::fmt;

/// One folder from a rule's bounds list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundsPath {
    /// Folder path without leading or trailing `/`; empty for the root
    pub path: String,
    /// `folder/*`: the folder and everything below it
    pub recursive: bool,
}

impl BoundsPath {
    pub fn new(path: impl Into<String>, recursive: bool) -> Self {
        Self {
            path: path.into(),
            recursive,
        }
    }

    /// Whether the element at `element_path` lies inside this folder
    pub fn contains(&self, element_path: &str) -> bool {
        let element = element_path.trim_matches('/');
        let parent = element.rsplit_once('/').map_or("", |(parent, _)| parent);

        if parent == self.path {
            return true;
        }
        self.recursive
            && (self.path.is_empty()
                || parent
                    .strip_prefix(self.path.as_str())
                    .is_some_and(|rest| rest.starts_with('/')))
    }
}

impl fmt::Display for BoundsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.path.is_empty(), self.recursive) {
            (true, true) => f.write_str("*"),
            (false, true) => write!(f, "{}/*", self.path),
            (_, false) => f.write_str(&self.path),
        }
    }
}

/// Split a comma-separated bounds attribute into folder paths
pub fn parse_bounds(bounds: &str) -> Vec<BoundsPath> {
    bounds
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            if entry == "*" {
                BoundsPath::new("", true)
            } else if let Some(folder) = entry.strip_suffix("/*") {
                BoundsPath::new(folder.trim_matches('/'), true)
            } else {
                BoundsPath::new(entry.trim_matches('/'), false)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bounds() {
        let paths = parse_bounds(" specs/*, /notes/ ,, archive/old/*, *");
        assert_eq!(
            paths,
            vec![
                BoundsPath::new("specs", true),
                BoundsPath::new("notes", false),
                BoundsPath::new("archive/old", true),
                BoundsPath::new("", true),
            ]
        );
        assert!(parse_bounds("").is_empty());
    }

    #[test]
    fn test_folder_only() {
        let bounds = BoundsPath::new("specs", false);
        assert!(bounds.contains("specs/a.req"));
        assert!(bounds.contains("/specs/a.req"));
        assert!(!bounds.contains("specs/sub/a.req"));
        assert!(!bounds.contains("specsx/a.req"));
        assert!(!bounds.contains("a.req"));
    }

    #[test]
    fn test_recursive() {
        let bounds = BoundsPath::new("specs", true);
        assert!(bounds.contains("specs/a.req"));
        assert!(bounds.contains("specs/sub/deeper/a.req"));
        assert!(!bounds.contains("specsx/a.req"));
        assert!(!bounds.contains("other/specs/a.req"));
    }

    #[test]
    fn test_root() {
        assert!(BoundsPath::new("", false).contains("a.req"));
        assert!(!BoundsPath::new("", false).contains("specs/a.req"));
        assert!(BoundsPath::new("", true).contains("specs/a.req"));
    }

    #[test]
    fn test_display() {
        for entry in ["specs/*", "notes", "*", "a/b/*"] {
            assert_eq!(parse_bounds(entry)[0].to_string(), entry);
        }
    }
}
