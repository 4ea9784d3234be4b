//! Text helpers shared by the renderers.

/// Single-quoted PHP string literal; only `\` and `'` need escaping.
pub fn php_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        if ch == '\\' || ch == '\'' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

/// Decimal rendering of a probability; whole numbers keep a trailing `.0`
/// so PHP reads them as floats.
pub fn decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// `array(a, b, c)` with the items already rendered.
pub fn php_array<I>(items: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let items: Vec<String> = items.into_iter().collect();
    format!("array({})", items.join(", "))
}
