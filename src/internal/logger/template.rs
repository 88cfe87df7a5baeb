// src/internal/logger/template.rs

use std::borrow::Cow;
use std::fmt::Display;

/// Doubles every `%` so the text reads literally inside a template.
pub fn escape_percent(text: &str) -> Cow<'_, str> {
    if text.contains('%') {
        Cow::Owned(text.replace('%', "%%"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Renders a printf-style template.
///
/// `%s`, `%v` and `%d` take the next argument, `%%` is a literal percent
/// sign and any other `%` is copied as-is. Argument text is inserted
/// verbatim and never scanned for directives. A directive with no argument
/// left is kept in the output; leftover arguments are appended, space
/// separated.
pub fn render(template: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some(verb @ ('s' | 'v' | 'd')) => {
                chars.next();
                match args.next() {
                    Some(arg) => out.push_str(&arg.to_string()),
                    None => {
                        out.push('%');
                        out.push(verb);
                    }
                }
            }
            _ => out.push('%'),
        }
    }

    for arg in args {
        out.push(' ');
        out.push_str(&arg.to_string());
    }

    out
}
