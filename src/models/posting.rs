//! Giveaway posting data structure.

use serde::{Deserialize, Serialize};

/// A giveaway posting scraped from the listing page.
///
/// The title is the identity key: two postings with the same title are
/// treated as the same giveaway even if the other fields differ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Posting {
    /// Giveaway title
    pub title: String,

    /// Summary paragraph
    pub description: String,

    /// Absolute URL of the giveaway page
    pub link: String,

    /// URL of the giveaway image
    pub image: String,
}

impl Posting {
    /// Identity key used when comparing snapshots.
    pub fn key(&self) -> &str {
        &self.title
    }

    /// Render the webhook message: bold title, description, link.
    pub fn message(&self) -> String {
        format!("**{}**\n{}\n{}", self.title, self.description, self.link)
    }

    /// File name used for the downloaded image.
    ///
    /// Spaces become underscores, as do characters that are not safe in a
    /// file name. The extension follows the image URL when it names a known
    /// image type and falls back to `png`.
    pub fn image_file_name(&self) -> String {
        let stem: String = self
            .title
            .chars()
            .map(|c| match c {
                ' ' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();

        format!("{}.{}", stem, self.image_extension())
    }

    fn image_extension(&self) -> &'static str {
        let path = url::Url::parse(&self.image)
            .map(|u| u.path().to_lowercase())
            .unwrap_or_default();

        match path.rsplit_once('.').map(|(_, ext)| ext) {
            Some("jpg") | Some("jpeg") => "jpg",
            Some("gif") => "gif",
            Some("webp") => "webp",
            _ => "png",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_posting() -> Posting {
        Posting {
            title: "Double Pass to The Drones".to_string(),
            description: "Win a double pass to see The Drones live.".to_string(),
            link: "https://www.rrr.org.au/subscriber-giveaways/the-drones".to_string(),
            image: "https://cdn.example.com/images/drones.jpg?w=600".to_string(),
        }
    }

    #[test]
    fn test_message_format() {
        let posting = sample_posting();
        assert_eq!(
            posting.message(),
            "**Double Pass to The Drones**\nWin a double pass to see The Drones live.\nhttps://www.rrr.org.au/subscriber-giveaways/the-drones"
        );
    }

    #[test]
    fn test_image_file_name_uses_url_extension() {
        let posting = sample_posting();
        assert_eq!(posting.image_file_name(), "Double_Pass_to_The_Drones.jpg");
    }

    #[test]
    fn test_image_file_name_strips_path_separators() {
        let posting = Posting {
            title: "AC/DC: Live".to_string(),
            image: "not a url".to_string(),
            ..sample_posting()
        };
        assert_eq!(posting.image_file_name(), "AC_DC__Live.png");
    }

    #[test]
    fn test_serialized_field_order() {
        let json = serde_json::to_string(&sample_posting()).unwrap();
        let title = json.find("\"title\"").unwrap();
        let description = json.find("\"description\"").unwrap();
        let link = json.find("\"link\"").unwrap();
        let image = json.find("\"image\"").unwrap();
        assert!(title < description && description < link && link < image);
    }
}
