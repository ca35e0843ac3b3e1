//! Markdown helpers for text placed into GitLab notes.

use once_cell::sync::Lazy;
use regex::Regex;

/// GitLab special references and the inline-code escaped replacement for each.
///
/// See <https://docs.gitlab.com/ee/user/markdown.html#special-gitlab-references>.
static GITLAB_REFERENCES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        // user mention
        (r"@(\w+)", "`@`$1"),
        // issue
        (r"#(\d+)", "`#`$1"),
        // merge request
        (r"!(\d+)", "`!`$1"),
        // snippet
        (r"\$(\d+)", "`$$`$1"),
        // label
        (r#"~((?:\w|"|')+)"#, "`~`$1"),
        // milestone
        (r#"%((?:\w|"|')+)"#, "`%`$1"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("GitLab reference pattern is valid"),
            replacement,
        )
    })
    .collect()
});

/// Renders `text` as a markdown block quote.
///
/// Every line gets a `> ` prefix. Returns an empty string when `text` is
/// empty or whitespace only.
pub fn markdown_quote(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    text.split('\n')
        .map(|line| format!("> {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escapes GitLab special references by wrapping their sigil in inline code,
/// e.g. `@user` becomes `` `@`user `` and `!123` becomes `` `!`123 ``.
///
/// Best effort only: it keeps relayed text from pinging users or linking
/// issues, it is not a sanitizer.
pub fn escape_gitlab_references(text: &str) -> String {
    GITLAB_REFERENCES
        .iter()
        .fold(text.to_string(), |acc, (pattern, replacement)| {
            pattern.replace_all(&acc, *replacement).into_owned()
        })
}
