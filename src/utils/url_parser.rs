/// Host (and port) part of a URL, for display in the panel header
pub fn hostname_from_url(u: &str) -> String {
    let s = u.trim();
    let s = s.split_once("://").map(|(_, rest)| rest).unwrap_or(s);
    let authority = s.split(['/', '?', '#']).next().unwrap_or("");
    // Drop credentials if present
    authority.rsplit('@').next().unwrap_or("").to_string()
}
