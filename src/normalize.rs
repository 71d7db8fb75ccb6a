//! Query text cleanup ahead of tokenizing.

/// Strips `-- line` and `/* block */` comments, collapses whitespace runs to
/// a single space, trims the result and drops trailing `;` terminators.
///
/// Quoted literals are copied through untouched, so comment markers and
/// repeated spaces inside `'...'` or `"..."` survive.
///
/// # Examples
///
/// ```
/// use rowql::normalize::normalize;
///
/// let text = "SELECT name -- who\nFROM   t /* all */ ;";
/// assert_eq!(normalize(text), "SELECT name FROM t");
/// ```
pub fn normalize(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    let mut chars = query.chars().peekable();
    let mut pending_space = false;

    while let Some(ch) = chars.next() {
        match ch {
            '\'' | '"' => {
                flush_space(&mut out, &mut pending_space);
                out.push(ch);
                for c in chars.by_ref() {
                    out.push(c);
                    if c == ch {
                        break;
                    }
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
                pending_space = true;
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
                pending_space = true;
            }
            c if c.is_whitespace() => pending_space = true,
            c => {
                flush_space(&mut out, &mut pending_space);
                out.push(c);
            }
        }
    }

    let mut trimmed = out.trim();
    while let Some(rest) = trimmed.strip_suffix(';') {
        trimmed = rest.trim_end();
    }
    trimmed.to_string()
}

fn flush_space(out: &mut String, pending: &mut bool) {
    if *pending && !out.is_empty() {
        out.push(' ');
    }
    *pending = false;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(
            normalize("  SELECT\n\tname ,  age\r\nFROM t  "),
            "SELECT name , age FROM t"
        );
    }

    #[test]
    fn test_strips_comments() {
        assert_eq!(
            normalize("SELECT /* cols */ a FROM t -- trailing"),
            "SELECT a FROM t"
        );
        assert_eq!(normalize("SELECT a/**/FROM t"), "SELECT a FROM t");
    }

    #[test]
    fn test_unterminated_block_comment_runs_to_end() {
        assert_eq!(normalize("SELECT a FROM t /* never closed"), "SELECT a FROM t");
    }

    #[test]
    fn test_trailing_terminators() {
        assert_eq!(normalize("SELECT a FROM t;"), "SELECT a FROM t");
        assert_eq!(normalize("SELECT a FROM t ; ;"), "SELECT a FROM t");
    }

    #[test]
    fn test_quoted_text_untouched() {
        assert_eq!(
            normalize("SELECT a FROM t WHERE note = 'x  -- y /* z */'"),
            "SELECT a FROM t WHERE note = 'x  -- y /* z */'"
        );
        assert_eq!(
            normalize(r#"SELECT a FROM t WHERE q = "it""s  ok""#),
            r#"SELECT a FROM t WHERE q = "it""s  ok""#
        );
        assert_eq!(normalize(r"p = 'C:\'  -- dir"), r"p = 'C:\'");
    }
}
