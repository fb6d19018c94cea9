//! Textual pre-processing of fragments before they reach the compiler.
//!
//! All rewrites act on code only; string literals pass through untouched.

enum Segment<'a> {
    Code(&'a str),
    Literal(&'a str),
}

/// Cut text into code and double-quoted literal spans. An unterminated
/// literal runs to the end of the text.
fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] != b'"' {
            i += 1;
            continue;
        }
        if start < i {
            out.push(Segment::Code(&text[start..i]));
        }
        let lit_start = i;
        i += 1;
        while i < bytes.len() && bytes[i] != b'"' {
            if bytes[i] == b'\\' {
                i += 1;
            }
            i += 1;
        }
        i = (i + 1).min(bytes.len());
        out.push(Segment::Literal(&text[lit_start..i]));
        start = i;
    }
    if start < bytes.len() {
        out.push(Segment::Code(&text[start..]));
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split a code span into maximal word runs and single other characters.
fn tokens(code: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = code.char_indices().peekable();
    while let Some((start, c)) = iter.next() {
        let mut end = start + c.len_utf8();
        if is_word_char(c) {
            while let Some(&(i, next)) = iter.peek() {
                if !is_word_char(next) {
                    break;
                }
                end = i + next.len_utf8();
                iter.next();
            }
        }
        out.push(&code[start..end]);
    }
    out
}

fn is_identifier(token: &str) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
}

/// Identifiers appearing in code positions, in order, with repeats.
pub fn identifiers(text: &str) -> Vec<&str> {
    segments(text)
        .into_iter()
        .filter_map(|seg| match seg {
            Segment::Code(code) => Some(code),
            Segment::Literal(_) => None,
        })
        .flat_map(tokens)
        .filter(|t| is_identifier(t))
        .collect()
}

/// The member reference inside `text` when the fragment is nothing but a
/// bare member (`Active`, `x.Active`) wrapped in stray parentheses, as left
/// behind when a boolean member is an operand of `AndAlso`.
pub fn bare_member(text: &str) -> Option<&str> {
    let core = text.trim_matches(|c: char| c == '(' || c == ')' || c.is_whitespace());
    let is_member = match tokens(core).as_slice() {
        [name] => is_identifier(name),
        [param, ".", name] => is_identifier(param) && is_identifier(name),
        _ => false,
    };
    let is_literal = matches!(core, "true" | "false" | "True" | "False" | "null");
    (is_member && !is_literal).then_some(core)
}

/// Rewrite locale decimal commas (`10,5`) to periods (`10.5`).
pub fn decimal_separators(text: &str) -> String {
    map_code(text, |code| {
        let chars: Vec<char> = code.chars().collect();
        chars
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let digit_before = i > 0 && chars[i - 1].is_ascii_digit();
                let digit_after = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
                if c == ',' && digit_before && digit_after {
                    '.'
                } else {
                    c
                }
            })
            .collect()
    })
}

/// Rewrite printed-form keywords into the compiler's native syntax and drop
/// bound-parameter qualifiers:
///
/// - `AndAlso` → `&&`, `OrElse` → `||`, `Not` → `!`
/// - `IsNullOrWhiteSpace` → `string.IsNullOrWhiteSpace`
/// - `x.Age` → `Age` for each parameter `x`
pub fn native_syntax(text: &str, parameters: &[String]) -> String {
    map_code(text, |code| {
        let toks = tokens(code);
        let mut out = String::with_capacity(code.len());
        let mut i = 0;
        while i < toks.len() {
            let tok = toks[i];
            let followed_by_dot = toks.get(i + 1) == Some(&".");
            match tok {
                "AndAlso" => out.push_str("&&"),
                "OrElse" => out.push_str("||"),
                "Not" => out.push('!'),
                "IsNullOrWhiteSpace" => {
                    if !(out.ends_with("string.") || out.ends_with("String.")) {
                        out.push_str("string.");
                    }
                    out.push_str(tok);
                }
                _ if followed_by_dot && parameters.iter().any(|p| p == tok) => {
                    // skip the qualifier and its dot
                    i += 2;
                    continue;
                }
                _ => out.push_str(tok),
            }
            i += 1;
        }
        out
    })
}

fn map_code(text: &str, mut f: impl FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    for seg in segments(text) {
        match seg {
            Segment::Code(code) => out.push_str(&f(code)),
            Segment::Literal(lit) => out.push_str(lit),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn comma_between_digits_becomes_period() {
        assert_eq!(decimal_separators("Price > 10,5"), "Price > 10.5");
        assert_eq!(decimal_separators("(x.Price <= 1,25))"), "(x.Price <= 1.25))");
    }

    #[test]
    fn commas_inside_literals_are_kept() {
        assert_eq!(
            decimal_separators(r#"Label == "1,5" AndAlso Price > 2,5"#),
            r#"Label == "1,5" AndAlso Price > 2.5"#
        );
    }

    #[test]
    fn keywords_become_native_operators() {
        assert_eq!(
            native_syntax(
                "(Not(IsNullOrWhiteSpace(x.Name)) AndAlso (x.Age > 1)) OrElse x.Vip",
                &params(&["x"])
            ),
            "(!(string.IsNullOrWhiteSpace(Name)) && (Age > 1)) || Vip"
        );
    }

    #[test]
    fn already_qualified_helper_is_not_doubled() {
        assert_eq!(
            native_syntax("string.IsNullOrWhiteSpace(Name)", &[]),
            "string.IsNullOrWhiteSpace(Name)"
        );
    }

    #[test]
    fn keywords_inside_identifiers_and_literals_are_left_alone() {
        assert_eq!(
            native_syntax(r#"(x.Notes == "Not AndAlso") AndAlso x.NotifyMe"#, &params(&["x"])),
            r#"(Notes == "Not AndAlso") && NotifyMe"#
        );
    }

    #[test]
    fn parameter_prefix_requires_dot() {
        assert_eq!(native_syntax("x == xx.x", &params(&["x"])), "x == xx.x");
        assert_eq!(native_syntax("x.x == 1", &params(&["x"])), "x == 1");
    }

    #[test]
    fn identifiers_skip_literals_and_numbers() {
        assert_eq!(
            identifiers(r#"(x.Age >= 18) AndAlso Name == "Income" AndAlso 3abc"#),
            vec!["x", "Age", "AndAlso", "Name", "AndAlso"]
        );
    }

    #[test]
    fn bare_member_is_found_inside_stray_parens() {
        assert_eq!(bare_member("Active)"), Some("Active"));
        assert_eq!(bare_member("((x.Active"), Some("x.Active"));
        assert_eq!(bare_member("Active)))"), Some("Active"));
        assert_eq!(bare_member("(Age > 3)"), None);
        assert_eq!(bare_member("Not(Active))"), None);
        assert_eq!(bare_member("True)"), None);
        assert_eq!(bare_member(r#""Active")"#), None);
    }

    #[test]
    fn unterminated_literal_swallows_rest() {
        assert_eq!(identifiers(r#"Name == "abc AndAlso Age"#), vec!["Name"]);
    }
}
