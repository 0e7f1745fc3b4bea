// src/services/message.rs

//! Rendering incidents into sink messages.
//!
//! This is the presentation layer: icon mapping, field labels and footer
//! branding live here, away from the parsing and diffing core.

use crate::config::SinkConfig;
use crate::models::{FEED_TIMESTAMP_FORMAT, Incident};

/// Embed color for alerts.
pub const ALERT_COLOR: u32 = 0xFF0000;

/// Placeholder shown for absent optional fields.
const NO_VALUE: &str = "N/A";

/// One labeled field of a sink message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageField {
    pub label: String,
    pub value: String,
    pub inline: bool,
}

/// Sink-agnostic structured message for one incident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentMessage {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<MessageField>,
    pub footer_text: String,
    pub footer_icon_url: String,
}

/// Map an incident category to its display icon.
pub fn category_icon(category: &str) -> &'static str {
    match category.to_lowercase().as_str() {
        "požár" => "🔥",
        "technická pomoc" => "🔧",
        "dopravní nehoda" => "🚗",
        "únik nebezpečných látek" => "⚠️",
        _ => "🚨",
    }
}

/// Render an incident into the sink message shape.
pub fn render(incident: &Incident, sink: &SinkConfig) -> IncidentMessage {
    let field = |label: &str, value: String, inline: bool| MessageField {
        label: label.to_string(),
        value,
        inline,
    };
    let or_no_value = |value: &Option<String>| {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(NO_VALUE)
            .to_string()
    };

    IncidentMessage {
        title: format!(
            "{} {} {}",
            category_icon(&incident.category),
            incident.category,
            incident.timestamp.format(FEED_TIMESTAMP_FORMAT)
        ),
        description: incident.subcategory.clone(),
        color: ALERT_COLOR,
        fields: vec![
            field("Stav", incident.status.clone(), false),
            field("Okres", incident.region.clone(), true),
            field("Obec", incident.locality.clone(), true),
            field("Ulice", or_no_value(&incident.street), true),
            field("Poznámka pro média", or_no_value(&incident.note), true),
        ],
        footer_text: sink.footer_text.clone(),
        footer_icon_url: sink.footer_icon_url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn incident() -> Incident {
        Incident {
            timestamp: NaiveDateTime::parse_from_str(
                "05.03.2026 14:22:00",
                FEED_TIMESTAMP_FORMAT,
            )
            .unwrap(),
            status: "Likvidace".to_string(),
            category: "Požár".to_string(),
            subcategory: "Požár nízké budovy".to_string(),
            region: "Jihlava".to_string(),
            locality: "Jihlava".to_string(),
            street: None,
            note: Some("Zásah dvou jednotek".to_string()),
            extra: Vec::new(),
        }
    }

    #[test]
    fn known_categories_get_their_icon() {
        assert_eq!(category_icon("Požár"), "🔥");
        assert_eq!(category_icon("technická pomoc"), "🔧");
        assert_eq!(category_icon("Dopravní nehoda"), "🚗");
        assert_eq!(category_icon("Únik nebezpečných látek"), "⚠️");
    }

    #[test]
    fn unknown_category_falls_back_to_siren() {
        assert_eq!(category_icon("Planý poplach"), "🚨");
    }

    #[test]
    fn render_builds_title_and_fields() {
        let message = render(&incident(), &SinkConfig::default());

        assert_eq!(message.title, "🔥 Požár 05.03.2026 14:22:00");
        assert_eq!(message.description, "Požár nízké budovy");
        assert_eq!(message.color, ALERT_COLOR);
        assert_eq!(message.fields.len(), 5);
        assert_eq!(message.fields[0].label, "Stav");
        assert!(!message.fields[0].inline);
        assert_eq!(message.footer_text, "HZS Vysočina Výjezdy");
    }

    #[test]
    fn absent_optionals_render_as_placeholder() {
        let message = render(&incident(), &SinkConfig::default());

        let street = message.fields.iter().find(|f| f.label == "Ulice").unwrap();
        assert_eq!(street.value, "N/A");

        let note = message
            .fields
            .iter()
            .find(|f| f.label == "Poznámka pro média")
            .unwrap();
        assert_eq!(note.value, "Zásah dvou jednotek");
    }
}
