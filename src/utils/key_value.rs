/// Parse a `key=value` command-line pair. The value may contain `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (k, v) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    let k = k.trim();
    if k.is_empty() {
        return Err(format!("missing key in '{}'", raw));
    }
    Ok((k.to_string(), v.trim().to_string()))
}
