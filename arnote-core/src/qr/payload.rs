//! What a QR code encodes, and what its export is called.

/// URL encoded by a reminder's QR code: `{origin}/ar/{code}`.
///
/// Depends only on the origin and the reminder's opaque code, never on the
/// visual configuration.
#[must_use]
pub fn qr_payload(origin: &str, code: &str) -> String {
    format!("{}/ar/{code}", origin.trim_end_matches('/'))
}

/// Download filename for an exported QR image.
///
/// Every whitespace run in the title becomes a single `-` and the result is
/// lowercased.
#[must_use]
pub fn download_filename(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_space = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.extend(c.to_lowercase());
            in_space = false;
        }
    }
    format!("qr-{slug}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        assert_eq!(
            qr_payload("https://arnote.app", "k3j9x2"),
            "https://arnote.app/ar/k3j9x2"
        );
        assert_eq!(
            qr_payload("https://arnote.app/", "abc"),
            "https://arnote.app/ar/abc"
        );
    }

    #[test]
    fn test_download_filename() {
        assert_eq!(download_filename("Water the Plants"), "qr-water-the-plants.png");
        assert_eq!(download_filename("Buy  milk\t now"), "qr-buy-milk-now.png");
        assert_eq!(download_filename(" Gym"), "qr--gym.png");
        assert_eq!(download_filename("Café"), "qr-café.png");
    }
}
