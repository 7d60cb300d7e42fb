// ABOUTME: Serde data models for Trello API responses
// ABOUTME: Tolerant parsing that carries unknown fields through untouched

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    /// Short, URL-safe name, unique across Trello.
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,
}

/// Entry of a board listing (`members/me/boards`, `organizations/{id}/boards`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSummary {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub closed: bool,
}


/// Typed view over a full board payload. The raw payload is what gets
/// persisted; this view only drives the traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub lists: Vec<TrelloList>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Board {
    pub fn from_payload(payload: &Value) -> serde_json::Result<Self> {
        Board::deserialize(payload)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrelloList {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pos: Option<Number>,
    #[serde(default)]
    pub closed: bool,
}

impl TrelloList {
    pub fn position(&self) -> f64 {
        position_of(self.pos.as_ref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "idList")]
    pub id_list: String,
    // Absent fields stay absent when card.json is written back out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, rename = "shortLink", skip_serializing_if = "Option::is_none")]
    pub short_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Card {
    pub fn position(&self) -> f64 {
        position_of(self.pos.as_ref())
    }

    pub fn description(&self) -> &str {
        self.desc.as_deref().unwrap_or_default()
    }

    pub fn attachments(&self) -> &[Attachment] {
        self.attachments.as_deref().unwrap_or_default()
    }

    /// Rename-proof token, falling back to the id for payloads without one.
    pub fn stable_token(&self) -> &str {
        self.short_link.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bytes: Option<u64>,
    #[serde(default)]
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn position_of(pos: Option<&Number>) -> f64 {
    pos.and_then(Number::as_f64).unwrap_or(0.0)
}

#[cfg(test)]
mod board_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_board_from_payload_ignores_nested_resources() {
        let payload = json!({
            "id": "b1",
            "name": "Proj",
            "closed": false,
            "actions": [{"id": "x"}],
            "labels": [],
            "lists": [{"id": "l1", "name": "Todo", "pos": 1}],
            "cards": [{"id": "c1", "idList": "l1", "pos": 16384.5, "name": "Fix bug"}]
        });
        let board = Board::from_payload(&payload).unwrap();
        assert_eq!(board.lists.len(), 1);
        assert_eq!(board.cards.len(), 1);
        assert_eq!(board.cards[0].position(), 16384.5);
        assert_eq!(board.cards[0].description(), "");
        assert!(board.cards[0].attachments().is_empty());
    }

    #[test]
    fn test_card_keeps_unknown_fields() {
        let json = r#"{
            "id": "c1",
            "idList": "l1",
            "pos": 65535,
            "name": "Fix bug",
            "desc": "details",
            "shortLink": "AbCd1234",
            "labels": [{"name": "bug"}],
            "attachments": [{"id": "a1", "name": "log.txt", "bytes": null, "url": "https://x/log.txt", "mimeType": "text/plain"}]
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.stable_token(), "AbCd1234");
        assert!(card.extra.contains_key("labels"));
        assert!(card.attachments()[0].bytes.is_none());
        assert!(card.attachments()[0].extra.contains_key("mimeType"));

        let back = serde_json::to_value(&card).unwrap();
        assert_eq!(back["pos"], serde_json::json!(65535));
        assert_eq!(back["labels"][0]["name"], "bug");
    }

    #[test]
    fn test_card_stable_token_falls_back_to_id() {
        let card: Card = serde_json::from_str(r#"{"id": "c9", "idList": "l1"}"#).unwrap();
        assert_eq!(card.stable_token(), "c9");
        assert_eq!(card.position(), 0.0);
    }

    #[test]
    fn test_card_absent_fields_not_serialized() {
        let card: Card = serde_json::from_str(r#"{"id": "c9", "idList": "l1"}"#).unwrap();
        let back = serde_json::to_value(&card).unwrap();
        assert_eq!(back, serde_json::json!({"id": "c9", "name": "", "idList": "l1"}));
    }

    #[test]
    fn test_card_present_empty_fields_kept() {
        let json = r#"{"id": "c9", "name": "x", "idList": "l1", "pos": 1, "desc": "", "attachments": []}"#;
        let card: Card = serde_json::from_str(json).unwrap();
        let back = serde_json::to_value(&card).unwrap();
        assert_eq!(back["desc"], "");
        assert_eq!(back["attachments"], serde_json::json!([]));
    }
}
