//! Prompt templates for the demo binaries.
//!
//! Each template is a `const` string with `{key}` placeholders filled in by
//! [`render`].

/// System instruction for code-review calls.
pub const CODE_REVIEW_SYSTEM: &str =
    "You are an expert code reviewer. Provide constructive, actionable feedback.";

/// Review a pasted snippet.
pub const SNIPPET_ANALYSIS_USER: &str = r"Please analyze this {language} code and provide:
1. A brief summary of what it does
2. Any potential issues or bugs
3. Suggestions for improvement
4. Performance considerations

Code:
```{language}
{code}
```
";

/// Review a whole file, including a 1-10 quality assessment the assistant
/// parses back out of the answer.
pub const FILE_ANALYSIS_USER: &str = r"Analyze this code file and provide:
1. Summary of functionality
2. Code quality assessment (1-10)
3. Potential issues or bugs
4. Improvement suggestions
5. Security considerations

File: {file_path}
Content:
```
{content}
```
";

/// Wrap a query with context recovered from the interaction log.
pub const HISTORY_CONTEXT_USER: &str = r"Context from previous interactions:
{context}

Current query: {query}";

/// Turn the day's aggregates into a readable summary.
pub const DAILY_SUMMARY_USER: &str = r"Based on this activity data, create a brief but insightful summary that includes:
1. Key accomplishments
2. Patterns in the queries
3. Suggestions for tomorrow
4. Estimated productivity impact

Data:
{activity_data}";

/// Replace each `{key}` with the corresponding value.
///
/// Unknown placeholders are left in place.
#[must_use]
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_replaces_placeholders() {
        let rendered = render("Hello {name}, review {file}.", &[("name", "Sid"), ("file", "lib.rs")]);
        assert_eq!(rendered, "Hello Sid, review lib.rs.");
    }

    #[test]
    fn render_leaves_unknown_placeholders() {
        let rendered = render("Hello {name}, {unknown}.", &[("name", "Sid")]);
        assert_eq!(rendered, "Hello Sid, {unknown}.");
    }

    #[test]
    fn file_analysis_template_renders_cleanly() {
        let rendered = render(
            FILE_ANALYSIS_USER,
            &[("file_path", "src/main.rs"), ("content", "fn main() {}")],
        );
        assert!(rendered.contains("src/main.rs"));
        assert!(rendered.contains("fn main() {}"));
        assert!(!rendered.contains("{file_path}"));
        assert!(!rendered.contains("{content}"));
    }
}
