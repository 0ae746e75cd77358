//! Cell tokenization.
//!
//! A cell's first line decides how the whole cell is handled, so the
//! tokenizer is line-oriented: whitespace splits tokens, quoted substrings
//! ('...' or "...") become single tokens with the quotes stripped, and the
//! two-character separator `<>` is always its own token even when glued to
//! its neighbors. Tokenizing never fails; blank input yields no tokens.

/// Split a line (or a whole cell) into tokens.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => flush(&mut tokens, &mut current),
            quote @ ('\'' | '"') => {
                flush(&mut tokens, &mut current);
                let mut quoted = String::new();
                // an unterminated quote swallows the rest of the input
                for c in chars.by_ref() {
                    if c == quote {
                        break;
                    }
                    quoted.push(c);
                }
                tokens.push(quoted);
            }
            '<' if chars.peek() == Some(&'>') => {
                chars.next();
                flush(&mut tokens, &mut current);
                tokens.push("<>".to_string());
            }
            c => current.push(c),
        }
    }
    flush(&mut tokens, &mut current);
    tokens
}

fn flush(tokens: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}

/// True when the first token begins with `%`.
pub fn is_magic(tokens: &[String]) -> bool {
    tokens.first().is_some_and(|t| t.starts_with('%'))
}

/// Case-insensitive comparison of the first token against a keyword.
pub fn starts_with_keyword(tokens: &[String], keyword: &str) -> bool {
    tokens.first().is_some_and(|t| t.eq_ignore_ascii_case(keyword))
}

/// Split a cell at its first non-blank line.
///
/// Returns the trimmed first line and the remainder of the cell after it.
/// Magics with multi-line bodies (`%VEGA_LITE SET`, `%VEGA_LITE <name>`)
/// consume the remainder as their spec or SQL body.
pub fn first_line_and_rest(code: &str) -> (String, &str) {
    let mut offset = 0;
    for line in code.split_inclusive('\n') {
        offset += line.len();
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            return (trimmed.to_string(), &code[offset..]);
        }
    }
    (String::new(), "")
}
