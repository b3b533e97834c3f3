use serde::Serialize;

/// Pre-composed share targets for one QR code, one per supported channel.
#[derive(Debug, Serialize)]
pub struct ShareLinks {
    pub facebook: String,
    pub twitter: String,
    pub whatsapp: String,
    pub linkedin: String,
    pub email: String,
}

pub fn compose(url: &str, title: &str) -> ShareLinks {
    let url = percent_encode(url);
    let title = percent_encode(title);
    ShareLinks {
        facebook: format!("https://www.facebook.com/sharer/sharer.php?u={}", url),
        twitter: format!(
            "https://twitter.com/intent/tweet?url={}&text={}",
            url, title
        ),
        whatsapp: format!("https://api.whatsapp.com/send?text={}%20{}", title, url),
        linkedin: format!(
            "https://www.linkedin.com/sharing/share-offsite/?url={}",
            url
        ),
        email: format!("mailto:?subject={}&body={}", title, url),
    }
}

/// Percent-encodes everything outside the RFC 3986 unreserved set, so the
/// value is safe inside a query component.
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_encode_reserved_characters() {
        assert_eq!(percent_encode("a b"), "a%20b");
        assert_eq!(
            percent_encode("https://example.com/?q=1&r=2"),
            "https%3A%2F%2Fexample.com%2F%3Fq%3D1%26r%3D2"
        );
        assert_eq!(percent_encode("plain-text_1.0~"), "plain-text_1.0~");
    }

    #[test]
    fn test_compose_embeds_encoded_url_and_title() {
        let links = compose("https://example.com/x", "My QR");

        assert_eq!(
            links.facebook,
            "https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fexample.com%2Fx"
        );
        assert!(links.twitter.contains("text=My%20QR"));
        assert!(links.whatsapp.contains("My%20QR%20https%3A%2F%2F"));
        assert!(links.linkedin.ends_with("url=https%3A%2F%2Fexample.com%2Fx"));
        assert!(links.email.starts_with("mailto:?subject=My%20QR"));
    }

    #[test]
    fn test_percent_encode_multibyte_input() {
        assert_eq!(percent_encode("café"), "caf%C3%A9");
    }
}
