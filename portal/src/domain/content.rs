//! Admin-managed site content: events, news and committee members.
//!
//! The backend owns each collection's schema, so entries keep their
//! attributes as a JSON object. The client only insists on the one field
//! every view renders as a headline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of admin-managed content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Association events.
    Event,
    /// News posts.
    News,
    /// Executive committee members.
    CommitteeMember,
}

impl ContentKind {
    /// Every kind, in dashboard order.
    pub const ALL: [Self; 3] = [Self::Event, Self::News, Self::CommitteeMember];

    /// Backend collection path segment.
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Event => "events",
            Self::News => "news",
            Self::CommitteeMember => "committee-members",
        }
    }

    /// Attribute that must be present and non-blank on every draft.
    pub const fn headline_field(self) -> &'static str {
        match self {
            Self::Event | Self::News => "title",
            Self::CommitteeMember => "name",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

/// Error returned when a content kind string is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseContentKindError;

impl fmt::Display for ParseContentKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("content kind must be one of: events, news, committee-members")
    }
}

impl std::error::Error for ParseContentKindError {}

impl FromStr for ContentKind {
    type Err = ParseContentKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "event" | "events" => Ok(Self::Event),
            "news" => Ok(Self::News),
            "committee" | "committee-member" | "committee-members" | "committee_member" => {
                Ok(Self::CommitteeMember)
            }
            _ => Err(ParseContentKindError),
        }
    }
}

/// Validation errors for content drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentValidationError {
    /// The kind's headline attribute is missing or blank.
    MissingHeadline {
        /// Name of the required attribute.
        field: &'static str,
    },
    /// The draft tried to set the backend-owned id.
    IdNotAllowed,
}

impl fmt::Display for ContentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeadline { field } => write!(f, "{field} must not be empty"),
            Self::IdNotAllowed => write!(f, "drafts must not carry an id"),
        }
    }
}

impl std::error::Error for ContentValidationError {}

/// New or replacement content attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDraft {
    kind: ContentKind,
    attributes: Map<String, Value>,
}

impl ContentDraft {
    /// Validate attributes for `kind`.
    ///
    /// # Examples
    /// ```
    /// use portal::domain::{ContentDraft, ContentKind};
    /// use serde_json::json;
    ///
    /// let attrs = json!({ "title": "Reunion 2026", "location": "Main hall" });
    /// let draft = ContentDraft::new(ContentKind::Event, attrs.as_object().unwrap().clone());
    /// assert!(draft.is_ok());
    /// ```
    pub fn new(
        kind: ContentKind,
        attributes: Map<String, Value>,
    ) -> Result<Self, ContentValidationError> {
        if attributes.contains_key("_id") || attributes.contains_key("id") {
            return Err(ContentValidationError::IdNotAllowed);
        }
        let field = kind.headline_field();
        let headline_present = attributes
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|text| !text.trim().is_empty());
        if !headline_present {
            return Err(ContentValidationError::MissingHeadline { field });
        }
        Ok(Self { kind, attributes })
    }

    /// Target kind.
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Attributes to send.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
}

/// Stored content as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    /// Backend document id.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// All other attributes.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl ContentEntry {
    /// Headline text for `kind`, if present.
    pub fn headline(&self, kind: ContentKind) -> Option<&str> {
        self.attributes
            .get(kind.headline_field())
            .and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    //! Draft validation and entry decoding.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object literal")
    }

    #[rstest]
    #[case::event(ContentKind::Event, json!({ "title": "Iftar" }))]
    #[case::news(ContentKind::News, json!({ "title": "New chair", "content": "..." }))]
    #[case::committee(ContentKind::CommitteeMember, json!({ "name": "Ada", "position": "President" }))]
    fn accepts_drafts_with_headline(#[case] kind: ContentKind, #[case] attrs: Value) {
        assert!(ContentDraft::new(kind, object(attrs)).is_ok());
    }

    #[rstest]
    #[case::missing(ContentKind::Event, json!({ "location": "Hall" }), "title")]
    #[case::blank(ContentKind::News, json!({ "title": "  " }), "title")]
    #[case::wrong_field(ContentKind::CommitteeMember, json!({ "title": "Ada" }), "name")]
    #[case::non_string(ContentKind::CommitteeMember, json!({ "name": 7 }), "name")]
    fn rejects_drafts_without_headline(
        #[case] kind: ContentKind,
        #[case] attrs: Value,
        #[case] field: &'static str,
    ) {
        assert_eq!(
            ContentDraft::new(kind, object(attrs)),
            Err(ContentValidationError::MissingHeadline { field })
        );
    }

    #[test]
    fn rejects_client_supplied_ids() {
        let attrs = object(json!({ "_id": "x", "title": "Iftar" }));
        assert_eq!(
            ContentDraft::new(ContentKind::Event, attrs),
            Err(ContentValidationError::IdNotAllowed)
        );
    }

    #[test]
    fn entry_keeps_unknown_attributes() {
        let entry: ContentEntry = serde_json::from_value(json!({
            "_id": "e1",
            "title": "Reunion",
            "date": "2026-12-01",
            "imageUrl": "https://img.example.edu/r.jpg"
        }))
        .expect("decode entry");
        assert_eq!(entry.id, "e1");
        assert_eq!(entry.headline(ContentKind::Event), Some("Reunion"));
        assert_eq!(entry.attributes["imageUrl"], "https://img.example.edu/r.jpg");
    }

    #[rstest]
    #[case("events", ContentKind::Event)]
    #[case("news", ContentKind::News)]
    #[case("committee", ContentKind::CommitteeMember)]
    fn parses_cli_spellings(#[case] raw: &str, #[case] expected: ContentKind) {
        assert_eq!(raw.parse::<ContentKind>(), Ok(expected));
    }
}
