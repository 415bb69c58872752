// src/utils.rs
use url::Url;

/// Decode HTML entities, handling the double-encoding captions often carry.
pub fn clean_html_entities(text: &str) -> String {
    let mut cleaned = text.to_string();
    for _ in 0..2 {
        let decoded = html_escape::decode_html_entities(&cleaned).into_owned();
        if decoded == cleaned {
            break;
        }
        cleaned = decoded;
    }
    cleaned
}

/// Collapse every run of whitespace (including newlines) to one space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep at most `max_chars` characters, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn is_youtube_host(host: &str) -> bool {
    let h = host.to_ascii_lowercase();
    h == "youtube.com" || h == "youtu.be" || h.ends_with(".youtube.com")
}

fn looks_like_id(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 64
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Extract a video id from a bare id or a YouTube URL
/// (`watch?v=`, `youtu.be/`, `shorts/`, `embed/`).
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if !input.contains("://") && !input.contains('/') {
        return looks_like_id(input).then(|| input.to_string());
    }

    let with_scheme = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };
    let url = Url::parse(&with_scheme).ok()?;
    let host = url.host_str()?;
    if !is_youtube_host(host) {
        return None;
    }

    if host.eq_ignore_ascii_case("youtu.be") {
        let seg = url.path_segments()?.next()?.trim().to_string();
        return looks_like_id(&seg).then_some(seg);
    }

    if url.path().starts_with("/watch") {
        let v = url
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.trim().to_string())?;
        return looks_like_id(&v).then_some(v);
    }

    let mut segs = url.path_segments()?;
    let kind = segs.next().unwrap_or("");
    let id = segs.next().unwrap_or("").trim().to_string();
    if matches!(kind, "shorts" | "embed" | "live") && looks_like_id(&id) {
        return Some(id);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_double_encoded_entities() {
        assert_eq!(clean_html_entities("it&amp;#39;s"), "it's");
        assert_eq!(clean_html_entities("a &lt;b&gt;"), "a <b>");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(collapse_whitespace("  one\n two\t\tthree "), "one two three");
    }

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
    }

    #[test]
    fn extracts_ids_from_urls() {
        let cases = [
            ("dQw4w9WgXcQ", "dQw4w9WgXcQ"),
            ("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10s", "dQw4w9WgXcQ"),
            ("https://m.youtube.com/watch?feature=share&v=abc_DEF-123", "abc_DEF-123"),
            ("https://youtu.be/dQw4w9WgXcQ", "dQw4w9WgXcQ"),
            ("youtube.com/shorts/xyz987", "xyz987"),
            ("https://www.youtube.com/embed/embedId1", "embedId1"),
        ];
        for (input, expected) in cases {
            assert_eq!(extract_video_id(input).as_deref(), Some(expected), "{}", input);
        }
    }

    #[test]
    fn rejects_non_youtube_input() {
        assert!(extract_video_id("").is_none());
        assert!(extract_video_id("https://vimeo.com/12345").is_none());
        assert!(extract_video_id("https://www.youtube.com/watch").is_none());
        assert!(extract_video_id("not an id").is_none());
    }
}
