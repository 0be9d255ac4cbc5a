//! Markdown fence stripping

use once_cell::sync::Lazy;
use regex::Regex;

/// Fence patterns, compiled once
struct Fences {
    /// Opening (with optional language tag) or closing fence line
    line: Regex,
    /// Opening fence sharing a line with code
    leading: Regex,
    /// Closing fence at the end of the last code line
    trailing: Regex,
}

static FENCES: Lazy<Option<Fences>> = Lazy::new(|| {
    Some(Fences {
        line: Regex::new(r"(?m)^[ \t]*```[A-Za-z0-9_+.-]*[ \t]*(?:\r?\n|$)").ok()?,
        leading: Regex::new(r"\A```(?:(?:typescript|javascript|tsx|jsx|ts|js)(?:[ \t]+|\z))?").ok()?,
        trailing: Regex::new(r"[ \t]*```[ \t]*\z").ok()?,
    })
});

/// Trim the text and remove markdown code fences
///
/// Whole fence lines go first, then a fence left at either end of the text.
#[must_use]
pub fn strip_fences(text: &str) -> String {
    let text = text.trim();
    let Some(fences) = FENCES.as_ref() else {
        return text.to_string();
    };
    let text = fences.line.replace_all(text, "");
    let text = fences.leading.replace(text.trim(), "");
    let text = fences.trailing.replace(text.trim(), "");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fenced_with_language() {
        assert_eq!(strip_fences("```ts\nreturn a + b;\n```"), "return a + b;");
    }

    #[test]
    fn fenced_without_language() {
        assert_eq!(strip_fences("```\nreturn 1;\n```\n"), "return 1;");
    }

    #[test]
    fn unfenced_is_trimmed_only() {
        assert_eq!(strip_fences("\n  return 1;\n"), "return 1;");
    }

    #[test]
    fn inner_lines_untouched() {
        let text = "```typescript\nconst s = `x`;\nreturn s;\n```";
        assert_eq!(strip_fences(text), "const s = `x`;\nreturn s;");
    }

    #[test]
    fn crlf_fences() {
        assert_eq!(strip_fences("```js\r\nreturn 2;\r\n```"), "return 2;");
    }

    #[test]
    fn closing_fence_on_code_line() {
        assert_eq!(strip_fences("```ts\nreturn a + b;```"), "return a + b;");
    }

    #[test]
    fn single_line_fenced_reply() {
        assert_eq!(strip_fences("```ts return a + b; ```"), "return a + b;");
        assert_eq!(strip_fences("```return 1;```"), "return 1;");
    }

    #[test]
    fn template_literal_at_end_kept() {
        assert_eq!(strip_fences("return `x`;"), "return `x`;");
    }
}
