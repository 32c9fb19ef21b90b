use crate::domain::Commit;
use std::collections::{HashMap, HashSet};

/// A tag and the commit it points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub target: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            target: target.into(),
        }
    }
}

/// Materialized history reachable from the current branch head.
///
/// `commits` is ordered newest first, in topological order: a commit always
/// comes before its parents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    pub commits: Vec<Commit>,
    pub tags: Vec<Tag>,
}

impl History {
    pub fn new(commits: Vec<Commit>, tags: Vec<Tag>) -> Self {
        History { commits, tags }
    }

    /// Build a linear history from messages given oldest first.
    ///
    /// Commit ids are `c0`, `c1`, ... in the order given.
    pub fn linear<S: AsRef<str>>(messages: &[S]) -> Self {
        let commits = messages
            .iter()
            .enumerate()
            .rev()
            .map(|(i, message)| Commit::new(format!("c{}", i), message.as_ref()))
            .collect();
        History {
            commits,
            tags: Vec::new(),
        }
    }

    /// Add a tag pointing at `target`
    pub fn with_tag(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.tags.push(Tag::new(name, target));
        self
    }

    pub fn head(&self) -> Option<&Commit> {
        self.commits.first()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Tag names grouped by target commit, in the order they were given
    pub fn tags_by_commit(&self) -> HashMap<&str, Vec<&str>> {
        let mut grouped: HashMap<&str, Vec<&str>> = HashMap::new();
        for tag in &self.tags {
            grouped
                .entry(tag.target.as_str())
                .or_default()
                .push(tag.name.as_str());
        }
        grouped
    }

    /// Whether any commit carries parent links
    pub fn has_topology(&self) -> bool {
        self.commits.iter().any(|c| !c.parents.is_empty())
    }

    /// Ids of `id` and every ancestor of it present in this history.
    ///
    /// Without parent links every commit after `id` in sequence counts as an
    /// ancestor.
    pub fn ancestors_of(&self, id: &str) -> HashSet<&str> {
        if !self.has_topology() {
            return self
                .commits
                .iter()
                .skip_while(|c| c.id != id)
                .map(|c| c.id.as_str())
                .collect();
        }

        let by_id: HashMap<&str, &Commit> =
            self.commits.iter().map(|c| (c.id.as_str(), c)).collect();

        let mut seen = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(&commit) = by_id.get(current) else {
                continue;
            };
            if seen.insert(commit.id.as_str()) {
                stack.extend(commit.parents.iter().map(String::as_str));
            }
        }
        seen
    }

    /// Commits reachable from the head but not from the commit at `index`
    pub fn commits_since(&self, index: usize) -> Vec<&Commit> {
        let Some(baseline) = self.commits.get(index) else {
            return self.commits.iter().collect();
        };

        let released = self.ancestors_of(&baseline.id);
        self.commits
            .iter()
            .filter(|c| !released.contains(c.id.as_str()))
            .collect()
    }
}
