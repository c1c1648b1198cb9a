use std::fmt;
use std::str::FromStr;

/// The pull request a task operates on. Built once per task and passed by
/// value; nothing reads repository coordinates from ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestContext {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PullRequestContext {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }

    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for PullRequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// Where the secret-detection task posts its findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentTarget {
    /// Review comment anchored to the offending file and line
    #[default]
    LineReview,
    /// One conversation comment on the pull request as a whole
    IssueComment,
}

impl FromStr for CommentTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "line" | "review" => Ok(Self::LineReview),
            "issue" | "pr" => Ok(Self::IssueComment),
            _ => Err(format!(
                "Invalid comment target: {}. Valid options: line, issue",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_display() {
        let context = PullRequestContext::new("octo", "demo", 42);
        assert_eq!(context.to_string(), "octo/demo#42");
        assert_eq!(context.full_name(), "octo/demo");
    }

    #[test]
    fn test_comment_target_parsing() {
        assert_eq!("line".parse::<CommentTarget>(), Ok(CommentTarget::LineReview));
        assert_eq!("ISSUE".parse::<CommentTarget>(), Ok(CommentTarget::IssueComment));
        assert!("endpoint".parse::<CommentTarget>().is_err());
        assert_eq!(CommentTarget::default(), CommentTarget::LineReview);
    }
}
