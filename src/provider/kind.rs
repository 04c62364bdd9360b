//! URL classification by content type

use serde::{Deserialize, Serialize};
use url::Url;

/// Kind of content a locator points at
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// A question page with its answers
    Question,
    /// A single answer
    Answer,
    /// A column article
    Article,
    /// A column (list of articles)
    Column,
    /// A favorites collection
    Collection,
    /// A short post ("pin")
    Pin,
}

impl ContentKind {
    /// Classify a URL, returning the kind and the item identifier
    ///
    /// Returns `None` for hosts and paths that do not match a known content
    /// type.
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use zhihu_dl::provider::ContentKind;
    ///
    /// let url = Url::parse("https://www.zhihu.com/question/19550225/answer/12345").unwrap();
    /// assert_eq!(
    ///     ContentKind::classify(&url),
    ///     Some((ContentKind::Answer, "12345".to_string()))
    /// );
    /// ```
    #[must_use]
    pub fn classify(url: &Url) -> Option<(ContentKind, String)> {
        let host = url.host_str()?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        match host {
            "www.zhihu.com" | "zhihu.com" => match segments.as_slice() {
                ["question", _, "answer", answer] => Some((ContentKind::Answer, answer.to_string())),
                ["answer", answer] => Some((ContentKind::Answer, answer.to_string())),
                ["question", question] => Some((ContentKind::Question, question.to_string())),
                ["collection", id] => Some((ContentKind::Collection, id.to_string())),
                ["pin", id] => Some((ContentKind::Pin, id.to_string())),
                _ => None,
            },
            "zhuanlan.zhihu.com" => match segments.as_slice() {
                ["p", id] => Some((ContentKind::Article, id.to_string())),
                [slug] => Some((ContentKind::Column, decode_segment(slug))),
                _ => None,
            },
            _ => None,
        }
    }

    /// Lowercase label, used as the saved file's prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Question => "question",
            ContentKind::Answer => "answer",
            ContentKind::Article => "article",
            ContentKind::Column => "column",
            ContentKind::Collection => "collection",
            ContentKind::Pin => "pin",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}
