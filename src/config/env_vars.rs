use std::env;

/// Expand Unix-style environment variables (`$VAR` and `${VAR}`).
///
/// An unset `${VAR}` expands to nothing; an unset `$VAR` is left as written
/// so that a literal dollar sign in a URL survives.
pub fn parse_unix_env_vars(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(pos) = rest.find('$') {
        result.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => {
                    let name = &braced[..end];
                    result.push_str(&env::var(name).unwrap_or_default());
                    rest = &braced[end + 1..];
                }
                None => {
                    // No closing brace
                    result.push_str(&rest[pos..]);
                    rest = "";
                }
            }
            continue;
        }

        let name_len = after
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
            .count();
        let name = &after[..name_len];

        match env::var(name) {
            Ok(value) if name_len > 0 => result.push_str(&value),
            _ => {
                result.push('$');
                result.push_str(name);
            }
        }
        rest = &after[name_len..];
    }

    result.push_str(rest);
    result
}

/// Read an override variable, ignoring it when unset or blank
pub fn env_override(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
