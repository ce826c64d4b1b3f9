/// Album data model
use serde::{Deserialize, Serialize};

/// Path segment the image host puts before transformations
const UPLOAD_SEGMENT: &str = "/upload/";

/// One photo in the album. Identity is the URL string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Photo {
    pub url: String,
}

impl Photo {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn thumbnail_url(&self, width: u32) -> String {
        thumbnail_url(&self.url, width)
    }
}

/// Ask the image host for a scaled-down copy by inserting a width
/// transformation after the first `/upload/` segment. URLs from other hosts
/// are returned untouched.
pub fn thumbnail_url(url: &str, width: u32) -> String {
    url.replacen(
        UPLOAD_SEGMENT,
        &format!("{}w_{},c_scale/", UPLOAD_SEGMENT, width),
        1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thumbnail_url_inserts_transformation() {
        let photo = Photo::new("https://res.cloudinary.com/demo/image/upload/v17/boda.jpg");
        assert_eq!(
            photo.thumbnail_url(400),
            "https://res.cloudinary.com/demo/image/upload/w_400,c_scale/v17/boda.jpg"
        );
    }

    #[test]
    fn test_thumbnail_url_only_touches_first_segment() {
        assert_eq!(
            thumbnail_url("https://h/upload/a/upload/b.jpg", 200),
            "https://h/upload/w_200,c_scale/a/upload/b.jpg"
        );
        assert_eq!(thumbnail_url("https://other/b.jpg", 200), "https://other/b.jpg");
    }
}
