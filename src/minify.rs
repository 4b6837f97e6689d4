//! Textual minification: three fixed passes over plain text, independent
//! of the parser. Comment removal, then operator compaction, then line
//! collapsing. The scans are purely lexical and do not special-case
//! comment markers or operators inside string and character literals;
//! that limitation is inherited behavior and deliberately kept.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

/// The compaction token list. Order is observable behavior (`+` runs
/// before `++`, so `a + +b` glues to `a++b`) and must stay fixed.
const OP_TOKENS: &[&str] = &[
    "+", "-", "*", "/", "%", "++", "--", "+=", "-=", "*=", "/=", "%=", "=", "==", "!=", "&&",
    "||", "!", "&", "|", "^", "<<", ">>", "<", ">", "<=", ">=", "<<=", ">>=", "&=", "|=", "^=",
    ",", "(", ")", "{", "}", ";", "else", ":", "::", "?",
];

lazy_static! {
    static ref OP_PATTERNS: Vec<(&'static str, Regex)> = OP_TOKENS
        .iter()
        .map(|tok| {
            let pattern = format!(" *{} *", regex::escape(tok));
            (*tok, Regex::new(&pattern).unwrap())
        })
        .collect();
}

/// Remove `/* ... */` spans, then `//` line comments. A `/*` with no
/// closing marker, or a `//` with no following newline, is fatal.
pub fn strip_comments(input: &str) -> Result<String> {
    let mut out = input.to_string();

    let mut from = 0;
    while let Some(open) = out[from..].find("/*").map(|i| i + from) {
        let close = out[open + 1..]
            .find("*/")
            .map(|i| i + open + 1)
            .ok_or(Error::UnterminatedComment)?;
        out.replace_range(open..close + 2, "");
        from = open;
    }

    let mut from = 0;
    while let Some(open) = out[from..].find("//").map(|i| i + from) {
        let newline = out[open..]
            .find('\n')
            .map(|i| i + open)
            .ok_or(Error::UnterminatedComment)?;
        // Keep the newline itself; the line pass decides its fate.
        out.replace_range(open..newline, "");
        from = open;
    }

    Ok(out)
}

/// Strip whitespace around each token in [`OP_TOKENS`], one token per
/// pass. Gluing `else` against a following `if` produces `elseif`, which
/// is repaired after every pass.
pub fn compact_operators(input: &str) -> String {
    let mut out = input.to_string();
    for (token, pattern) in OP_PATTERNS.iter() {
        out = pattern.replace_all(&out, *token).into_owned();
        out = out.replace("elseif", "else if");
    }
    out
}

/// Join physical lines into one logical stream. Preprocessor lines keep
/// their newline; a trailing backslash is stripped and the next line
/// concatenated directly (macro continuation), with the newline restored
/// only once a continuation line no longer ends in a backslash. Blank
/// lines are dropped.
pub fn collapse_lines(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_macro = false;
    for line in input.lines() {
        // Comment removal may leave residue at the line edges.
        let line = line.trim_matches([' ', '\t']);
        if line.is_empty() {
            continue;
        }
        if let Some(stripped) = line.strip_suffix('\\') {
            out.push_str(stripped);
            if !in_macro {
                in_macro = line.starts_with('#');
            }
            continue;
        }
        if line.starts_with('#') {
            out.push_str(line);
            out.push('\n');
            continue;
        }
        if in_macro {
            // End of a continued macro: this line closes it.
            out.push_str(line);
            out.push('\n');
            in_macro = false;
            continue;
        }
        out.push_str(line);
    }
    out
}

/// The full textual post-pass, in fixed order.
pub fn minify_text(input: &str) -> Result<String> {
    let stripped = strip_comments(input)?;
    let compacted = compact_operators(&stripped);
    Ok(collapse_lines(&compacted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_block_comments() {
        assert_eq!(strip_comments("a /* b */ c").unwrap(), "a  c");
    }

    #[test]
    fn removes_adjacent_block_comments() {
        assert_eq!(strip_comments("/*a*/ /*b*/x").unwrap(), " x");
    }

    #[test]
    fn removes_line_comments_but_keeps_the_newline() {
        assert_eq!(strip_comments("a; // note\nb;\n").unwrap(), "a; \nb;\n");
    }

    #[test]
    fn unterminated_block_comment_is_fatal() {
        assert!(matches!(
            strip_comments("a /* b"),
            Err(Error::UnterminatedComment)
        ));
    }

    #[test]
    fn line_comment_without_newline_is_fatal() {
        assert!(matches!(
            strip_comments("a // b"),
            Err(Error::UnterminatedComment)
        ));
    }

    #[test]
    fn comment_removal_is_idempotent() {
        let once = strip_comments("x /* c1 */ y // c2\nz\n").unwrap();
        let twice = strip_comments(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn comment_markers_inside_literals_are_not_special() {
        // Known, inherited limitation: the scan is purely lexical and
        // hollows out the literal, leaving the quotes behind.
        assert_eq!(
            strip_comments("s = \"/* not a comment */\";").unwrap(),
            "s = \"\";"
        );
    }

    #[test]
    fn compacts_operator_spacing() {
        assert_eq!(compact_operators("a + b"), "a+b");
        assert_eq!(compact_operators("x = y ; z"), "x=y;z");
        assert_eq!(compact_operators("f ( a , b )"), "f(a,b)");
    }

    #[test]
    fn repairs_else_if() {
        assert_eq!(compact_operators("} else if (x) {"), "}else if(x){");
    }

    #[test]
    fn collapses_regular_lines() {
        assert_eq!(collapse_lines("a;\nb;\nc;\n"), "a;b;c;");
    }

    #[test]
    fn drops_blank_lines() {
        assert_eq!(collapse_lines("a;\n\n\nb;\n"), "a;b;");
    }

    #[test]
    fn preprocessor_lines_keep_their_newline() {
        assert_eq!(
            collapse_lines("#include <stdio.h>\nint x;\n"),
            "#include <stdio.h>\nint x;"
        );
    }

    #[test]
    fn macro_continuation_joins_until_the_last_line() {
        let input = "#define SUM(a,b) \\\n((a)+(b))\nint x;\n";
        assert_eq!(collapse_lines(input), "#define SUM(a,b) ((a)+(b))\nint x;");
    }

    #[test]
    fn multi_line_macro_terminates_once() {
        let input = "#define F(a) \\\n(a) \\\n+1\nint y;\n";
        assert_eq!(collapse_lines(input), "#define F(a) (a) +1\nint y;");
    }
}
