//! Default reformatter collaborator.
//!
//! Normalizes the renamed source before the textual minifier runs: zero
//! indentation, no trailing whitespace, interior horizontal-whitespace
//! runs collapsed to a single space, lines never wrapped. Purely lexical;
//! whitespace runs inside string literals are collapsed too, the same
//! limitation class as the minifier's comment scan.

pub fn reformat(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for line in source.lines() {
        let trimmed = line.trim_matches([' ', '\t']);
        let mut in_run = false;
        for ch in trimmed.chars() {
            if ch == ' ' || ch == '\t' {
                if !in_run {
                    out.push(' ');
                    in_run = true;
                }
            } else {
                out.push(ch);
                in_run = false;
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_indentation_and_trailing_space() {
        assert_eq!(reformat("    int x;  \n"), "int x;\n");
        assert_eq!(reformat("\tint y;\n"), "int y;\n");
    }

    #[test]
    fn collapses_interior_runs() {
        assert_eq!(reformat("int   x  =  1;\n"), "int x = 1;\n");
        assert_eq!(reformat("a\t\tb\n"), "a b\n");
    }

    #[test]
    fn keeps_macro_continuations_intact() {
        // The trailing backslash is not whitespace and must survive for
        // the line-collapsing pass to see.
        assert_eq!(reformat("#define F(x) \\\n  (x)\n"), "#define F(x) \\\n(x)\n");
    }

    #[test]
    fn blank_lines_survive_for_the_minifier_to_drop() {
        assert_eq!(reformat("a\n\nb\n"), "a\n\nb\n");
    }
}
