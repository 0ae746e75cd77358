//! Keyword completion.
//!
//! The host's completion request carries the cell text and a cursor
//! position; squill completes the identifier under the cursor against a
//! sorted SQL keyword list by binary search. Matching is case-insensitive
//! and candidates are returned uppercase.

/// SQL keywords offered for completion. Sorted; see the test below.
pub static SQL_KEYWORDS: &[&str] = &[
    "ALTER",
    "AND",
    "AS",
    "ASC",
    "BEGIN",
    "BETWEEN",
    "BY",
    "CASE",
    "COMMIT",
    "CREATE",
    "CROSS",
    "DELETE",
    "DESC",
    "DESCRIBE",
    "DISTINCT",
    "DROP",
    "ELSE",
    "END",
    "EXCEPT",
    "EXISTS",
    "EXPLAIN",
    "FROM",
    "FULL",
    "GRANT",
    "GROUP",
    "HAVING",
    "IN",
    "INDEX",
    "INNER",
    "INSERT",
    "INTERSECT",
    "INTO",
    "IS",
    "JOIN",
    "KEY",
    "LEFT",
    "LIKE",
    "LIMIT",
    "NOT",
    "NULL",
    "OFFSET",
    "ON",
    "OR",
    "ORDER",
    "OUTER",
    "PRIMARY",
    "REVOKE",
    "RIGHT",
    "ROLLBACK",
    "SELECT",
    "SET",
    "SHOW",
    "TABLE",
    "THEN",
    "TRANSACTION",
    "TRUNCATE",
    "UNION",
    "UNIQUE",
    "UPDATE",
    "USING",
    "VALUES",
    "VIEW",
    "WHEN",
    "WHERE",
    "WITH",
];

/// Completion candidates plus the span of text they would replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub matches: Vec<&'static str>,
    pub start: usize,
    pub end: usize,
}

/// Complete the identifier ending at `cursor` (a byte offset into `code`).
pub fn complete(code: &str, cursor: usize) -> Completion {
    let mut cursor = cursor.min(code.len());
    while !code.is_char_boundary(cursor) {
        cursor -= 1;
    }

    let bytes = code.as_bytes();
    let mut start = cursor;
    while start > 0 && (bytes[start - 1].is_ascii_alphanumeric() || bytes[start - 1] == b'_') {
        start -= 1;
    }
    let prefix = code[start..cursor].to_ascii_uppercase();
    if prefix.is_empty() {
        return Completion { matches: Vec::new(), start: cursor, end: cursor };
    }

    let from = SQL_KEYWORDS.partition_point(|kw| *kw < prefix.as_str());
    let matches = SQL_KEYWORDS[from..]
        .iter()
        .take_while(|kw| kw.starts_with(&prefix))
        .copied()
        .collect();
    Completion { matches, start, end: cursor }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_list_is_sorted_and_unique() {
        for pair in SQL_KEYWORDS.windows(2) {
            assert!(pair[0] < pair[1], "{} >= {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn completes_a_prefix_case_insensitively() {
        let completion = complete("sel", 3);
        assert_eq!(completion.matches, ["SELECT"]);
        assert_eq!((completion.start, completion.end), (0, 3));
    }

    #[test]
    fn completes_mid_statement() {
        let code = "SELECT * fr";
        let completion = complete(code, code.len());
        assert_eq!(completion.matches, ["FROM"]);
        assert_eq!((completion.start, completion.end), (9, 11));
    }

    #[test]
    fn multiple_candidates_share_a_prefix() {
        let completion = complete("DE", 2);
        assert_eq!(completion.matches, ["DELETE", "DESC", "DESCRIBE"]);
    }

    #[test]
    fn no_identifier_under_cursor_means_no_matches() {
        assert!(complete("SELECT ", 7).matches.is_empty());
        assert!(complete("", 0).matches.is_empty());
    }

    #[test]
    fn cursor_past_the_end_is_clamped() {
        let completion = complete("wh", 99);
        assert_eq!(completion.matches, ["WHEN", "WHERE"]);
    }

    #[test]
    fn unknown_prefix_matches_nothing() {
        assert!(complete("zz", 2).matches.is_empty());
    }
}
