//! Parse HTTP response header lines collected by curl.

/// `Content-Length` of the final response in `lines`.
///
/// With redirects curl reports every response's headers in order; only the
/// block after the last status line describes the body we received.
pub fn content_length(lines: &[String]) -> Option<u64> {
    let mut content_length = None;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            content_length = None;
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse::<u64>().ok();
            }
        }
    }

    content_length
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn content_length_single_response() {
        let l = lines(&["HTTP/1.1 200 OK", "Content-Length: 12345", "Content-Type: text/plain"]);
        assert_eq!(content_length(&l), Some(12345));
    }

    #[test]
    fn content_length_after_redirect() {
        let l = lines(&[
            "HTTP/1.1 302 Found",
            "Content-Length: 0",
            "Location: /file.TXT",
            "",
            "HTTP/1.1 200 OK",
            "content-length: 42",
        ]);
        assert_eq!(content_length(&l), Some(42));
    }

    #[test]
    fn content_length_missing_in_final_response() {
        let l = lines(&[
            "HTTP/1.1 301 Moved",
            "Content-Length: 10",
            "HTTP/1.1 200 OK",
            "Transfer-Encoding: chunked",
        ]);
        assert_eq!(content_length(&l), None);
    }
}
