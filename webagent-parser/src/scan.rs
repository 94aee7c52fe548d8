//! Line scanning and text helpers shared by both grammars.

use crate::error::{ParseError, ParseResult};

const FENCE: &str = "```";

/// One source line with its position and fence state.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Line<'a> {
    /// 1-based line number.
    pub number: usize,
    pub text: &'a str,
    /// `true` when the line sits outside fenced blocks and is not a fence.
    pub structural: bool,
}

impl Line<'_> {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn indent(&self) -> usize {
        indentation(self.text)
    }
}

/// Number of leading spaces and tabs.
pub(crate) fn indentation(text: &str) -> usize {
    text.len() - text.trim_start_matches([' ', '\t']).len()
}

pub(crate) fn is_fence(text: &str) -> bool {
    text.trim_start().starts_with(FENCE)
}

/// Splits `text` into lines and reports the line of a fence left open.
pub(crate) fn lines(text: &str) -> (Vec<Line<'_>>, Option<usize>) {
    let mut open = None;
    let mut out = Vec::new();
    for (idx, text) in text.lines().enumerate() {
        let number = idx + 1;
        let fence = is_fence(text);
        out.push(Line {
            number,
            text,
            structural: open.is_none() && !fence,
        });
        if fence {
            open = match open {
                Some(_) => None,
                None => Some(number),
            };
        }
    }
    (out, open)
}

/// Like [`lines`], failing on an unterminated fence.
pub(crate) fn scan(text: &str) -> ParseResult<Vec<Line<'_>>> {
    match lines(text) {
        (_, Some(line)) => Err(ParseError::UnterminatedFence { line }),
        (lines, None) => Ok(lines),
    }
}

/// Returns the heading title when `text` is a heading of exactly `level`.
pub(crate) fn heading(text: &str, level: usize) -> Option<&str> {
    let hashes = text.bytes().take_while(|b| *b == b'#').count();
    if hashes != level {
        return None;
    }
    let rest = &text[level..];
    if rest.trim().is_empty() {
        return Some("");
    }
    rest.strip_prefix([' ', '\t']).map(str::trim)
}

/// Joins lines, dropping leading blank lines and trailing whitespace.
pub(crate) fn trim_block<'a, I>(lines: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let lines: Vec<&str> = lines
        .into_iter()
        .skip_while(|line| line.trim().is_empty())
        .collect();
    lines.join("\n").trim_end().to_owned()
}

/// Removes the common leading indentation of the non-blank lines.
pub(crate) fn dedent<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    let common = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| indentation(line))
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                &line[common..]
            }
        })
        .collect()
}

fn strip_indent(text: &str, max: usize) -> &str {
    let strip = indentation(text).min(max);
    &text[strip..]
}

/// Extracts the body of the fenced block in `lines`.
///
/// Without a fence the trimmed text itself is returned. Prose around a
/// single fenced block is ignored; a second fenced block is an error.
/// Empty results map to `None`. `first_line` is the source line number of
/// `lines[0]`.
pub(crate) fn extract_code(lines: &[&str], first_line: usize) -> ParseResult<Option<String>> {
    let Some(open) = lines.iter().position(|line| is_fence(line)) else {
        let raw = lines.join("\n");
        return Ok(non_empty(&raw).map(str::to_owned));
    };

    let indent = indentation(lines[open]);
    let close = lines[open + 1..]
        .iter()
        .position(|line| is_fence(line))
        .ok_or(ParseError::UnterminatedFence {
            line: first_line + open,
        })?;
    let after = open + close + 2;
    if let Some(extra) = lines[after..].iter().position(|line| is_fence(line)) {
        return Err(ParseError::UnexpectedText {
            line: first_line + after + extra,
            text: lines[after + extra].trim().to_owned(),
        });
    }
    let code = trim_block(
        lines[open + 1..open + 1 + close]
            .iter()
            .map(|line| strip_indent(line, indent)),
    );
    Ok((!code.is_empty()).then_some(code))
}

/// Tracks bracket depth and quoting while walking a type or literal.
#[derive(Default)]
struct Nesting {
    depth: usize,
    quote: Option<char>,
    prev: char,
}

impl Nesting {
    /// Feeds one character; returns `true` when it sits at top level and
    /// outside quotes (after accounting for the character itself).
    fn feed(&mut self, c: char) -> bool {
        let top = if let Some(q) = self.quote {
            if c == q && self.prev != '\\' {
                self.quote = None;
            }
            false
        } else {
            match c {
                '"' | '\'' | '`' => {
                    self.quote = Some(c);
                    false
                }
                '(' | '[' | '{' | '<' => {
                    self.depth += 1;
                    false
                }
                ')' | ']' | '}' => {
                    self.depth = self.depth.saturating_sub(1);
                    false
                }
                '>' if self.prev != '=' => {
                    self.depth = self.depth.saturating_sub(1);
                    false
                }
                _ => self.depth == 0,
            }
        };
        self.prev = c;
        top
    }
}

/// Splits `text` on `sep` occurrences outside brackets and quotes.
///
/// `()`, `[]`, `{}` and `<>` nest; the `>` of `=>` does not close anything.
/// Quotes are `"`, `'` and `` ` ``, with `\` escaping the quote character.
///
/// ```
/// use webagent_parser::split_top_level;
///
/// let parts = split_top_level("Record<string, number> | \"a|b\"", '|');
/// assert_eq!(parts, ["Record<string, number> ", " \"a|b\""]);
/// ```
#[must_use]
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut nesting = Nesting::default();
    let mut start = 0;
    for (idx, c) in text.char_indices() {
        if nesting.feed(c) && c == sep {
            parts.push(&text[start..idx]);
            start = idx + c.len_utf8();
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Returns `true` when every bracket and quote in `text` is closed and no
/// closing bracket appears without its opener.
pub(crate) fn is_balanced(text: &str) -> bool {
    let mut nesting = Nesting::default();
    for c in text.chars() {
        let closes = match c {
            ')' | ']' | '}' => true,
            '>' => nesting.prev != '=',
            _ => false,
        };
        if nesting.quote.is_none() && nesting.depth == 0 && closes {
            return false;
        }
        nesting.feed(c);
    }
    nesting.depth == 0 && nesting.quote.is_none()
}

/// Finds the bracket closing the one at byte offset `open`.
pub(crate) fn find_closing(text: &str, open: usize) -> Option<usize> {
    let mut nesting = Nesting::default();
    for (idx, c) in text[open..].char_indices() {
        let before = nesting.depth;
        nesting.feed(c);
        if idx > 0 && before == 1 && nesting.depth == 0 && nesting.quote.is_none() {
            return Some(open + idx);
        }
    }
    None
}

/// Finds `pattern` outside quotes.
pub(crate) fn find_unquoted(text: &str, pattern: &str) -> Option<usize> {
    let mut nesting = Nesting::default();
    for (idx, c) in text.char_indices() {
        if nesting.quote.is_none() && text[idx..].starts_with(pattern) {
            return Some(idx);
        }
        nesting.feed(c);
    }
    None
}

/// Trims surrounding whitespace and returns `None` for empty strings.
pub(crate) fn non_empty(text: &str) -> Option<&str> {
    let text = text.trim();
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fences_hide_headings() {
        let (lines, open) = lines("# A\n```md\n## not a heading\n```\n## B");
        assert!(open.is_none());
        let structural: Vec<_> = lines.iter().filter(|l| l.structural).map(|l| l.text).collect();
        assert_eq!(structural, ["# A", "## B"]);
    }

    #[test]
    fn unterminated_fence_reports_opening_line() {
        let err = scan("# A\n\n```js\nlet x = 1;").unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedFence { line: 3 }));
    }

    #[test]
    fn heading_levels_are_exact() {
        assert_eq!(heading("# Store", 1), Some("Store"));
        assert_eq!(heading("## search ", 2), Some("search"));
        assert_eq!(heading("### Params", 2), None);
        assert_eq!(heading("#hashtag", 1), None);
        assert_eq!(heading("##", 2), Some(""));
    }

    #[test]
    fn balance_checks() {
        assert!(is_balanced("Array<{ id: string }>"));
        assert!(is_balanced("(x: number) => void"));
        assert!(is_balanced("\"a)\" | \"b\""));
        assert!(!is_balanced("Array<string"));
        assert!(!is_balanced("a) | b"));
        assert!(!is_balanced("\"open"));
    }

    #[test]
    fn splits_outside_nesting() {
        let parts = split_top_level("{ a: string, b: number }, required, default=\"x, y\"", ',');
        assert_eq!(parts, ["{ a: string, b: number }", " required", " default=\"x, y\""]);

        let parts = split_top_level("(x: number) => Promise<void>, optional", ',');
        assert_eq!(parts, ["(x: number) => Promise<void>", " optional"]);
    }

    #[test]
    fn closing_bracket_skips_nested() {
        let text = "search(query, opts={ a: (1) })";
        assert_eq!(find_closing(text, 6), Some(text.len() - 1));
        assert_eq!(find_closing("broken(a, b", 6), None);
    }

    #[test]
    fn extracts_fenced_code() {
        let lines = ["Returns:", "```ts", "{ total: number }", "```"];
        assert_eq!(
            extract_code(&lines, 1).unwrap().as_deref(),
            Some("{ total: number }")
        );
        assert_eq!(extract_code(&["", "  plain  "], 1).unwrap().as_deref(), Some("plain"));
        assert_eq!(extract_code(&["```", "```"], 1).unwrap(), None);
    }

    #[test]
    fn second_fenced_block_fails() {
        let lines = ["```ts", "A", "```", "or", "```ts", "B", "```"];
        let err = extract_code(&lines, 10).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedText { line: 14, ref text } if text == "```ts"));
    }

    #[test]
    fn dedent_and_trim() {
        let lines = dedent(&["    a", "", "      b"]);
        assert_eq!(lines, ["a", "", "  b"]);
        assert_eq!(trim_block(["", "  x", "y  ", ""]), "  x\ny");
    }

    #[test]
    fn unquoted_search() {
        assert_eq!(find_unquoted("\"http://x\" // link", "//"), Some(11));
        assert_eq!(find_unquoted("number", "//"), None);
    }
}
