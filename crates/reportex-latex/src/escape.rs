//! LaTeX special-character escaping

/// Escape text for literal inclusion in LaTeX source
///
/// Each of `\ { } $ & # % _ ~ ^` is replaced with its LaTeX equivalent;
/// every other character passes through unchanged.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str(r"\textbackslash{}"),
            '{' => out.push_str(r"\{"),
            '}' => out.push_str(r"\}"),
            '$' => out.push_str(r"\$"),
            '&' => out.push_str(r"\&"),
            '#' => out.push_str(r"\#"),
            '%' => out.push_str(r"\%"),
            '_' => out.push_str(r"\_"),
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECIALS: &str = "\\{}$&#%_~^";

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape("Revenue grew 4 percent"), "Revenue grew 4 percent");
        assert_eq!(escape(""), "");
        assert_eq!(escape("Zürich – 2025"), "Zürich – 2025");
    }

    #[test]
    fn test_each_special_character() {
        assert_eq!(escape("\\"), r"\textbackslash{}");
        assert_eq!(escape("{x}"), r"\{x\}");
        assert_eq!(escape("$5"), r"\$5");
        assert_eq!(escape("A & B"), r"A \& B");
        assert_eq!(escape("#1"), r"\#1");
        assert_eq!(escape("50%"), r"50\%");
        assert_eq!(escape("free_cash_flow"), r"free\_cash\_flow");
        assert_eq!(escape("~"), r"\textasciitilde{}");
        assert_eq!(escape("x^2"), r"x\textasciicircum{}2");
    }

    #[test]
    fn test_backslash_not_double_escaped() {
        // The braces produced for a backslash must not be escaped again
        assert_eq!(escape("\\{"), r"\textbackslash{}\{");
    }

    const REPLACEMENTS: [(&str, char); 10] = [
        (r"\textbackslash{}", '\\'),
        (r"\textasciitilde{}", '~'),
        (r"\textasciicircum{}", '^'),
        (r"\{", '{'),
        (r"\}", '}'),
        (r"\$", '$'),
        (r"\&", '&'),
        (r"\#", '#'),
        (r"\%", '%'),
        (r"\_", '_'),
    ];

    /// Decode escaped output, failing on any special character that is not
    /// part of a known replacement
    fn decode(escaped: &str) -> Result<String, String> {
        let mut out = String::new();
        let mut rest = escaped;
        'outer: while let Some(ch) = rest.chars().next() {
            for (token, original) in REPLACEMENTS {
                if let Some(tail) = rest.strip_prefix(token) {
                    out.push(original);
                    rest = tail;
                    continue 'outer;
                }
            }
            if SPECIALS.contains(ch) {
                return Err(format!("unescaped {:?} in {:?}", ch, escaped));
            }
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
        Ok(out)
    }

    fn assert_safe(input: &str) {
        assert_eq!(decode(&escape(input)).as_deref(), Ok(input));
    }

    #[test]
    fn test_decode_rejects_bare_specials() {
        for ch in SPECIALS.chars() {
            assert!(decode(&ch.to_string()).is_err(), "{:?}", ch);
        }
        assert!(decode(r"\textbackslash").is_err());
    }

    #[test]
    fn test_no_unescaped_specials() {
        assert_safe(&format!("a{}b{}c", SPECIALS, SPECIALS.repeat(3)));
    }

    #[test]
    fn test_no_unescaped_specials_generated() {
        let specials: Vec<char> = SPECIALS.chars().collect();
        let fillers = ["", "a", "é", "€", "日本", "🙂", " ", "\n", "textbackslash"];

        for &a in &specials {
            for filler in fillers {
                assert_safe(&format!("{}{}", a, filler));
                assert_safe(&format!("{}{}", filler, a));
                assert_safe(&format!("{}{}{}", filler, a, filler));
            }
            for &b in &specials {
                assert_safe(&format!("{}{}", a, b));
                for filler in fillers {
                    assert_safe(&format!("{}{}{}", a, filler, b));
                }
                for &c in &specials {
                    assert_safe(&format!("{}{}{}", a, b, c));
                }
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let input = "Q3: EBIT ~ $1.2bn (+5%) & FCF_{adj}";
        assert_eq!(escape(input), escape(input));
    }
}
