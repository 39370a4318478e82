//! Single-key query string access
//!
//! Reads and writes are scoped to one key: every other segment of the query,
//! the path and the fragment are left exactly as they were.

use url::form_urlencoded;
use url::Url;

/// First value stored under `key`, decoded. Empty values count as absent.
pub fn param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Store `value` under `key`.
///
/// Mirrors `URLSearchParams::set`: the first matching segment is replaced,
/// later duplicates of the key are removed, and the pair is appended when
/// the key is missing.
pub fn set_param(url: &mut Url, key: &str, value: &str) {
    let encoded = form_urlencoded::Serializer::new(String::new())
        .append_pair(key, value)
        .finish();

    let mut segments: Vec<String> = Vec::new();
    let mut replaced = false;
    for segment in url.query().unwrap_or_default().split('&') {
        if segment.is_empty() {
            continue;
        }
        if segment_key(segment).as_deref() == Some(key) {
            if !replaced {
                segments.push(encoded.clone());
                replaced = true;
            }
        } else {
            segments.push(segment.to_string());
        }
    }
    if !replaced {
        segments.push(encoded);
    }

    url.set_query(Some(&segments.join("&")));
}

fn segment_key(segment: &str) -> Option<String> {
    form_urlencoded::parse(segment.as_bytes())
        .next()
        .map(|(name, _)| name.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn reads_first_decoded_value() {
        let u = url("http://localhost/flow?step=two%20words&step=other");
        assert_eq!(param(&u, "step").as_deref(), Some("two words"));
        assert_eq!(param(&u, "missing"), None);
    }

    #[test]
    fn empty_value_is_absent() {
        assert_eq!(param(&url("http://localhost/?step="), "step"), None);
        assert_eq!(param(&url("http://localhost/?step"), "step"), None);
    }

    #[test]
    fn appends_when_missing() {
        let mut u = url("http://localhost/signup");
        set_param(&mut u, "step", "profile");
        assert_eq!(u.as_str(), "http://localhost/signup?step=profile");
    }

    #[test]
    fn replaces_in_place_and_keeps_neighbours_verbatim() {
        let mut u = url("http://localhost/signup?utm=a%20b&step=start&ref=x+y#top");
        set_param(&mut u, "step", "done");
        assert_eq!(u.query(), Some("utm=a%20b&step=done&ref=x+y"));
        assert_eq!(u.path(), "/signup");
        assert_eq!(u.fragment(), Some("top"));
    }

    #[test]
    fn collapses_duplicate_keys() {
        let mut u = url("http://localhost/?step=a&x=1&step=b");
        set_param(&mut u, "step", "c");
        assert_eq!(u.query(), Some("step=c&x=1"));
    }

    #[test]
    fn encodes_value() {
        let mut u = url("http://localhost/");
        set_param(&mut u, "step", "a&b=c");
        assert_eq!(u.query(), Some("step=a%26b%3Dc"));
        assert_eq!(param(&u, "step").as_deref(), Some("a&b=c"));
    }
}
