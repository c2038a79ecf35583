// rayleighrs-diagnostics/src/formula.rs

//! Formula annotations attached to quantity declarations.
//!
//! A declaration comment may carry a LaTeX formula after the `:tex:` marker:
//!
//! ```text
//! Integer, Parameter :: v_r = vel_off + 1 ! :tex: $v_r$
//! ```

/// Marker that introduces a formula inside a declaration comment.
pub const TEX_MARKER: &str = ":tex:";

/// Pull the formula out of a declaration comment, sanitized.
///
/// Only the text between the first marker and the next one (or the end of
/// the comment) is used.
pub fn extract_formula(comment: &str) -> Option<String> {
    let raw = comment.split(TEX_MARKER).nth(1)?;
    let formula = sanitize(raw);
    if formula.is_empty() {
        None
    } else {
        Some(formula)
    }
}

/// Make a formula annotation safe to typeset.
///
/// An unbalanced `$` is closed at the end. Text outside the math region is
/// escaped; the math region itself is left alone.
pub fn sanitize(entry: &str) -> String {
    let mut entry = entry.trim().to_string();

    if entry.matches('$').count() % 2 == 1 {
        log::debug!("closing unbalanced math region in `{}`", entry);
        entry.push('$');
    }

    if entry.starts_with('$') && entry.ends_with('$') {
        return entry;
    }

    match (entry.find('$'), entry.rfind('$')) {
        (Some(left), Some(right)) => {
            let prefix = &entry[..left];
            let math = &entry[left..=right];
            let suffix = &entry[right + 1..];
            let escaped = format!("{}{}{}", detexify(prefix), math, detexify(suffix));
            if escaped != entry {
                log::debug!("escaped text around formula: `{}` -> `{}`", entry, escaped);
            }
            escaped
        }
        _ => {
            let escaped = detexify(&entry);
            if escaped != entry {
                log::debug!("escaped formula text: `{}` -> `{}`", entry, escaped);
            }
            escaped
        }
    }
}

/// Escape characters that are special to LaTeX outside math mode.
pub fn detexify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '^' => out.push_str("\\^{}"),
            '_' => out.push_str("\\_"),
            '<' => out.push_str("$<$"),
            '>' => out.push_str("$>$"),
            '%' => out.push_str("\\%"),
            '&' => out.push_str("\\&"),
            '#' => out.push_str("\\#"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_formula() {
        assert_eq!(
            extract_formula(":tex: $v_r$").as_deref(),
            Some("$v_r$")
        );
        assert_eq!(
            extract_formula("radial velocity :tex: $v_r$ :tex: ignored").as_deref(),
            Some("$v_r$")
        );
        assert_eq!(extract_formula("radial velocity"), None);
        assert_eq!(extract_formula(":tex:   "), None);
    }

    #[test]
    fn test_fully_wrapped_untouched() {
        let formula = r"$\frac{\partial v_r}{\partial r}$";
        assert_eq!(sanitize(formula), formula);
    }

    #[test]
    fn test_unbalanced_dollar_closed() {
        let out = sanitize("some text $x^2");
        assert!(out.ends_with('$'));
        assert_eq!(out, "some text $x^2$");
        assert_eq!(out.matches('$').count() % 2, 0);
    }

    #[test]
    fn test_text_around_math_is_escaped() {
        assert_eq!(sanitize("a_b $x$ c^d"), r"a\_b $x$ c\^{}d");
        assert_eq!(
            sanitize(r"<v_r> in {r} $\langle v_r \rangle$"),
            r"$<$v\_r$>$ in \{r\} $\langle v_r \rangle$"
        );
    }

    #[test]
    fn test_no_math_region() {
        assert_eq!(sanitize("kinetic_energy 50% & more"), r"kinetic\_energy 50\% \& more");
    }

    #[test]
    fn test_detexify() {
        assert_eq!(detexify("x^2_{i}"), r"x\^{}2\_\{i\}");
        assert_eq!(detexify("#1"), r"\#1");
        assert_eq!(detexify("plain"), "plain");
    }
}
