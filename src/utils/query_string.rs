use urlencoding::encode;

/// Build a query string from key-value pairs
pub fn build_query_string(pairs: &[(String, String)]) -> String {
    let mut first = true;
    let mut out = String::new();
    for (k, v) in pairs {
        if !first {
            out.push('&');
        } else {
            first = false;
        }
        out.push_str(&encode(k));
        out.push('=');
        out.push_str(&encode(v));
    }
    out
}

/// `path?query`, or just `path` when there are no pairs
pub fn link_with_query(path: &str, pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, build_query_string(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_keys_and_values() {
        let pairs = vec![("q".to_string(), "rye & spelt".to_string()), ("page".to_string(), "2".to_string())];
        assert_eq!(build_query_string(&pairs), "q=rye%20%26%20spelt&page=2");
        assert_eq!(link_with_query("/r/items", &pairs), "/r/items?q=rye%20%26%20spelt&page=2");
        assert_eq!(link_with_query("/r/items", &[]), "/r/items");
    }
}
