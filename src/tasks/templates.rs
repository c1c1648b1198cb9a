//! Natural-language task texts handed to the agent

use super::context::{CommentTarget, PullRequestContext};

const SECRET_PATTERNS: &[&str] = &[
    "API keys (patterns like 'api_key', 'apiKey', 'API_KEY')",
    "Passwords (patterns like 'password', 'passwd', 'pwd')",
    "Secret keys (patterns like 'secret', 'SECRET_KEY', 'private_key')",
    "Tokens (patterns like 'token', 'access_token', 'auth_token')",
    "Database credentials",
    "OAuth secrets",
    "Private keys or certificates",
    "Any hardcoded sensitive values (long alphanumeric strings that look like credentials)",
];

pub fn secret_detection(context: &PullRequestContext, target: CommentTarget) -> String {
    let patterns = SECRET_PATTERNS
        .iter()
        .map(|p| format!("   - {}", p))
        .collect::<Vec<_>>()
        .join("\n");

    let reporting = match target {
        CommentTarget::LineReview => {
            "   - Identify the exact file name and line number where the secret was found\n\
             \x20  - Use the appropriate tool to add a review comment on that specific line"
        }
        CommentTarget::IssueComment => {
            "   - Note the file name and line number of every secret found\n\
             \x20  - Use the appropriate tool to add a single comment to the pull request \
             conversation listing all findings"
        }
    };

    format!(
        "Analyze pull request #{number} in repository {repo} \
and detect if any secrets, credentials, or sensitive information have been committed.

Follow these steps:
1. First, use the appropriate tool to get all files and their changes in the PR
2. Carefully examine each file's content and changes (patches/diffs) for:
{patterns}

3. If you find ANY secrets or suspicious credentials:
{reporting}
   - The comment should be professional, clear, and include:
     * What type of secret was detected
     * Why this is a security risk
     * Recommendation to remove it and use environment variables instead
     * Suggestion to rotate/invalidate the exposed credential if already committed

4. If you add comments, summarize what secrets were found and where
5. If no secrets are found, confirm that the PR looks secure

Be thorough and check all added or modified lines carefully. Security is critical.",
        number = context.number,
        repo = context.full_name(),
    )
}

pub fn list_files(context: &PullRequestContext) -> String {
    format!(
        "Use the appropriate tool to list all modified files in pull request #{number} \
from repository {repo}.

Look for a tool named something like \"list_pull_request_files\" or \"get_pull_request_files\" \
and use it with the correct parameters.

Provide a complete list of all files found with their modification status.",
        number = context.number,
        repo = context.full_name(),
    )
}

pub fn full_analysis(context: &PullRequestContext) -> String {
    format!(
        "Analyze pull request #{number} from repository {repo}.

Perform the following analysis:
1. List all modified files
2. Check for obvious security issues
3. Suggest improvements if applicable
4. Provide a summary of the changes

Be thorough and provide actionable insights.",
        number = context.number,
        repo = context.full_name(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> PullRequestContext {
        PullRequestContext::new("octo", "demo", 42)
    }

    #[test]
    fn test_templates_name_the_pull_request() {
        for text in [
            secret_detection(&context(), CommentTarget::LineReview),
            list_files(&context()),
            full_analysis(&context()),
        ] {
            assert!(text.contains("#42"), "{}", text);
            assert!(text.contains("octo/demo"), "{}", text);
        }
    }

    #[test]
    fn test_secret_detection_lists_every_pattern() {
        let text = secret_detection(&context(), CommentTarget::LineReview);
        for pattern in SECRET_PATTERNS {
            assert!(text.contains(pattern));
        }
    }

    #[test]
    fn test_comment_target_changes_instructions() {
        let line = secret_detection(&context(), CommentTarget::LineReview);
        let issue = secret_detection(&context(), CommentTarget::IssueComment);

        assert!(line.contains("review comment on that specific line"));
        assert!(!line.contains("pull request conversation"));
        assert!(issue.contains("single comment to the pull request conversation"));
        assert!(!issue.contains("review comment on that specific line"));

        for text in [line, issue] {
            assert!(!text.contains("/repos/"));
            assert!(!text.contains("POST "));
        }
    }
}
