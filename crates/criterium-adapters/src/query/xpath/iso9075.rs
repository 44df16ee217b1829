//! ISO 9075 encoding of path segments.
//!
//! Location steps must be XML names. Characters that are not allowed at
//! their position are written as `_xHHHH_`, where `HHHH` is the code point
//! in upper-case hex. An underscore that would itself read as the start of
//! such an escape is encoded too.

/// Encodes every segment of an absolute path, keeping the separators.
#[must_use]
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(encode_name)
        .collect::<Vec<_>>()
        .join("/")
}

/// Encodes one name.
#[must_use]
pub fn encode_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len());
    for (i, &c) in chars.iter().enumerate() {
        let legal = if i == 0 { is_name_start(c) } else { is_name_char(c) };
        if legal && !(c == '_' && looks_escaped(&chars[i..])) {
            out.push(c);
        } else {
            out.push_str(&format!("_x{:04X}_", u32::from(c)));
        }
    }
    out
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == ':'
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_numeric() || c == '.' || c == '-'
}

/// True for `_xHHHH_` at the start of `rest`.
fn looks_escaped(rest: &[char]) -> bool {
    rest.len() >= 7
        && rest[1] == 'x'
        && rest[2..6].iter().all(char::is_ascii_hexdigit)
        && rest[6] == '_'
}
