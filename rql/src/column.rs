/// Default column naming: snake_case, keeping acronyms together.
///
/// An underscore goes before an upper-case letter that is neither first nor last when the previous
/// letter is lower-case (`userName`), or when the next one is lower-case and the previous one is a
/// letter (`HTTPCode`). Existing separators are left alone.
pub fn column(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 && i + 1 < chars.len() {
            let prev = chars[i - 1];
            let next = chars[i + 1];
            if prev.is_lowercase() || (next.is_lowercase() && prev.is_alphabetic()) {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}
