//! Parser for the model's analysis response.
//!
//! The model is instructed to return bare JSON, but in practice responses
//! come back in several dialects: camelCase or snake_case field names,
//! items as objects or plain strings, and the whole payload sometimes
//! wrapped in a markdown code fence. This module accepts all of them and
//! normalizes to the `MeetingAnalysis` shape.

use serde::Deserialize;
use uuid::Uuid;

use super::{AnalysisError, MeetingAnalysis};
use crate::meeting::model::{ActionItem, Decision, FollowUp};

/// Sentinel for a missing assignee/responsible party.
pub const UNKNOWN_PERSON: &str = "Onbekend";
/// Sentinel for a missing deadline.
pub const UNKNOWN_DEADLINE: &str = "Nader te bepalen";
/// Sentinel for a missing summary.
pub const NO_SUMMARY: &str = "Geen samenvatting beschikbaar.";

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    summary: Option<String>,
    #[serde(default)]
    decisions: Vec<RawDecision>,
    #[serde(default, rename = "actionItems", alias = "action_items")]
    action_items: Vec<RawActionItem>,
    #[serde(default, rename = "followUps", alias = "follow_ups")]
    follow_ups: Vec<RawFollowUp>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDecision {
    Text(String),
    Item {
        text: String,
        #[serde(default)]
        context: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawActionItem {
    Text(String),
    Item {
        text: String,
        #[serde(default)]
        assignee: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFollowUp {
    Text(String),
    Item {
        text: String,
        #[serde(default)]
        deadline: Option<String>,
        #[serde(default)]
        responsible: Option<String>,
    },
}

/// Strip a markdown code fence (with or without a language tag) wrapping
/// the payload. Anything that is not fence-wrapped passes through untouched.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the language tag line ("json", "JSON", or empty).
    let body = match rest.split_once('\n') {
        Some((_tag, body)) => body,
        None => return trimmed,
    };

    match body.rsplit_once("```") {
        Some((inner, _)) => inner.trim(),
        None => body.trim(),
    }
}

/// Parse the model's response into a `MeetingAnalysis`.
///
/// Every extracted item gets a freshly generated unique id; done flags
/// start false. Missing optional fields fall back to the sentinel strings.
pub fn parse_analysis(raw: &str) -> Result<MeetingAnalysis, AnalysisError> {
    let payload = strip_code_fences(raw);

    let parsed: RawAnalysis = serde_json::from_str(payload)
        .map_err(|e| AnalysisError::Parse(format!("{} (antwoord: {})", e, payload)))?;

    let decisions = parsed
        .decisions
        .into_iter()
        .map(|d| {
            let (text, context) = match d {
                RawDecision::Text(text) => (text, None),
                RawDecision::Item { text, context } => (text, context),
            };
            Decision {
                id: format!("dec-{}", Uuid::new_v4()),
                text,
                context: context.unwrap_or_default(),
            }
        })
        .collect();

    let action_items = parsed
        .action_items
        .into_iter()
        .map(|a| {
            let (text, assignee) = match a {
                RawActionItem::Text(text) => (text, None),
                RawActionItem::Item { text, assignee } => (text, assignee),
            };
            ActionItem {
                id: format!("act-{}", Uuid::new_v4()),
                text,
                assignee: assignee.unwrap_or_else(|| UNKNOWN_PERSON.to_string()),
                done: false,
            }
        })
        .collect();

    let follow_ups = parsed
        .follow_ups
        .into_iter()
        .map(|f| {
            let (text, deadline, responsible) = match f {
                RawFollowUp::Text(text) => (text, None, None),
                RawFollowUp::Item {
                    text,
                    deadline,
                    responsible,
                } => (text, deadline, responsible),
            };
            FollowUp {
                id: format!("fup-{}", Uuid::new_v4()),
                text,
                deadline: deadline.unwrap_or_else(|| UNKNOWN_DEADLINE.to_string()),
                responsible: responsible.unwrap_or_else(|| UNKNOWN_PERSON.to_string()),
                done: false,
            }
        })
        .collect();

    Ok(MeetingAnalysis {
        summary: parsed.summary.unwrap_or_else(|| NO_SUMMARY.to_string()),
        decisions,
        action_items,
        follow_ups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_camel_case_response() {
        let raw = r#"{
            "summary": "Korte vergadering over de offerte.",
            "decisions": [{"text": "Offerte gaat vrijdag de deur uit", "context": "Klant wacht"}],
            "actionItems": [{"text": "Offerte opstellen", "assignee": "Jan"}],
            "followUps": [{"text": "Prijzen controleren", "deadline": "vrijdag", "responsible": "Piet"}]
        }"#;

        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.summary, "Korte vergadering over de offerte.");
        assert_eq!(analysis.decisions.len(), 1);
        assert_eq!(analysis.decisions[0].context, "Klant wacht");
        assert_eq!(analysis.action_items[0].assignee, "Jan");
        assert_eq!(analysis.follow_ups[0].deadline, "vrijdag");
        assert_eq!(analysis.follow_ups[0].responsible, "Piet");
    }

    #[test]
    fn test_parse_snake_case_response() {
        let raw = r#"{
            "summary": "Overleg.",
            "decisions": [],
            "action_items": [{"text": "Notulen rondsturen"}],
            "follow_ups": [{"text": "Budget bespreken"}]
        }"#;

        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.action_items.len(), 1);
        assert_eq!(analysis.follow_ups.len(), 1);
    }

    #[test]
    fn test_items_get_fresh_ids_and_defaults() {
        let raw = r#"{
            "summary": "x",
            "decisions": [{"text": "A"}, {"text": "B"}],
            "actionItems": [{"text": "C"}],
            "followUps": [{"text": "D"}]
        }"#;

        let analysis = parse_analysis(raw).unwrap();
        assert!(!analysis.decisions[0].id.is_empty());
        assert_ne!(analysis.decisions[0].id, analysis.decisions[1].id);
        assert_eq!(analysis.decisions[0].context, "");
        assert_eq!(analysis.action_items[0].assignee, UNKNOWN_PERSON);
        assert!(!analysis.action_items[0].done);
        assert_eq!(analysis.follow_ups[0].deadline, UNKNOWN_DEADLINE);
        assert_eq!(analysis.follow_ups[0].responsible, UNKNOWN_PERSON);
        assert!(!analysis.follow_ups[0].done);
    }

    #[test]
    fn test_plain_string_items() {
        let raw = r#"{
            "summary": "x",
            "decisions": ["We gaan door met plan B"],
            "actionItems": ["Contract nalezen"],
            "followUps": ["Vervolgafspraak plannen"]
        }"#;

        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.decisions[0].text, "We gaan door met plan B");
        assert_eq!(analysis.action_items[0].text, "Contract nalezen");
        assert_eq!(analysis.action_items[0].assignee, UNKNOWN_PERSON);
        assert_eq!(analysis.follow_ups[0].text, "Vervolgafspraak plannen");
    }

    #[test]
    fn test_missing_fields_default() {
        let analysis = parse_analysis("{}").unwrap();
        assert_eq!(analysis.summary, NO_SUMMARY);
        assert!(analysis.decisions.is_empty());
        assert!(analysis.action_items.is_empty());
        assert!(analysis.follow_ups.is_empty());
    }

    #[test]
    fn test_fenced_response_parses_identically() {
        let inner = r#"{"summary":"Overleg.","decisions":[],"actionItems":[{"text":"Y","assignee":"Jan"}],"followUps":[]}"#;
        let fenced = format!("```json\n{}\n```", inner);
        let fenced_no_tag = format!("```\n{}\n```", inner);

        let plain = parse_analysis(inner).unwrap();
        let from_fence = parse_analysis(&fenced).unwrap();
        let from_bare_fence = parse_analysis(&fenced_no_tag).unwrap();

        assert_eq!(plain.summary, from_fence.summary);
        assert_eq!(plain.action_items[0].text, from_fence.action_items[0].text);
        assert_eq!(
            plain.action_items[0].assignee,
            from_bare_fence.action_items[0].assignee
        );
    }

    #[test]
    fn test_strip_code_fences_passthrough() {
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = parse_analysis("Sorry, ik kan dit niet analyseren.").unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)));

        let err = parse_analysis("```json\nnot json at all\n```").unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)));
    }

    #[test]
    fn test_decision_and_action_extraction() {
        // Response for: "We besluiten X. Jan doet Y voor vrijdag."
        let raw = r#"{"summary":"...","decisions":[{"text":"X"}],"actionItems":[{"text":"Y","assignee":"Jan"}],"followUps":[]}"#;

        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.decisions.len(), 1);
        assert_eq!(analysis.decisions[0].text, "X");
        assert_eq!(analysis.decisions[0].context, "");
        assert_eq!(analysis.action_items.len(), 1);
        assert_eq!(analysis.action_items[0].text, "Y");
        assert_eq!(analysis.action_items[0].assignee, "Jan");
        assert!(!analysis.action_items[0].done);
        assert!(analysis.follow_ups.is_empty());
    }
}
