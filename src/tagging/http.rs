use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{NerTagger, TaggedEntity};
use crate::error::TaggingError;

/// Key HanLP uses for MSRA-style named entities.
pub const DEFAULT_NER_KEY: &str = "ner/msra";

#[derive(Serialize)]
struct TagRequest<'a> {
    text: &'a str,
}

/// Client for a remote tagging service.
///
/// Posts `{"text": chunk}` and expects a JSON object whose `ner_key` field holds
/// `[text, label, ...]` arrays, the shape HanLP's multi-task pipeline returns.
#[derive(Debug, Clone)]
pub struct HttpTagger {
    client: Client,
    endpoint: String,
    ner_key: String,
}

impl HttpTagger {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build tagging HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            ner_key: DEFAULT_NER_KEY.to_string(),
        })
    }

    pub fn with_ner_key(mut self, key: impl Into<String>) -> Self {
        self.ner_key = key.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl NerTagger for HttpTagger {
    fn tag(&self, chunk: &str) -> std::result::Result<Vec<TaggedEntity>, TaggingError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&TagRequest { text: chunk })
            .send()
            .map_err(|err| {
                TaggingError::new(format!("request to {} failed: {err}", self.endpoint))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TaggingError::new(format!(
                "tagging service returned {status}"
            )));
        }

        let body: Value = response
            .json()
            .map_err(|err| TaggingError::new(format!("unreadable tagging response: {err}")))?;
        let entities = parse_entities(&body, &self.ner_key)?;
        debug!(count = entities.len(), "tagging service responded");
        Ok(entities)
    }
}

/// Extracts `(text, label)` pairs from a HanLP-style response body.
///
/// A missing key means the service found nothing for this window.
pub fn parse_entities(
    body: &Value,
    ner_key: &str,
) -> std::result::Result<Vec<TaggedEntity>, TaggingError> {
    let object = body
        .as_object()
        .ok_or_else(|| TaggingError::new("tagging response is not a JSON object"))?;
    let Some(raw) = object.get(ner_key) else {
        return Ok(Vec::new());
    };
    let rows = raw
        .as_array()
        .ok_or_else(|| TaggingError::new(format!("\"{ner_key}\" is not an array")))?;

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let fields = row.as_array().filter(|fields| fields.len() >= 2);
            let pair = fields.and_then(|fields| Some((fields[0].as_str()?, fields[1].as_str()?)));
            pair.map(|(text, label)| TaggedEntity::new(text, label))
                .ok_or_else(|| {
                    TaggingError::new(format!("entity {idx} is not a [text, label, ...] array"))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_hanlp_rows() {
        let body = json!({
            "tok/fine": ["王小明", "和", "小華"],
            "ner/msra": [["王小明", "PERSON", 0, 1], ["台北", "LOCATION", 3, 4]]
        });
        let entities = parse_entities(&body, DEFAULT_NER_KEY).unwrap();
        assert_eq!(
            entities,
            vec![
                TaggedEntity::new("王小明", "PERSON"),
                TaggedEntity::new("台北", "LOCATION"),
            ]
        );
    }

    #[test]
    fn missing_key_means_no_entities() {
        let body = json!({ "tok/fine": [] });
        assert!(parse_entities(&body, DEFAULT_NER_KEY).unwrap().is_empty());
    }

    #[test]
    fn malformed_row_is_a_tagging_error() {
        let body = json!({ "ner/msra": [["王小明"]] });
        let err = parse_entities(&body, DEFAULT_NER_KEY).unwrap_err();
        assert!(err.message().contains("entity 0"));
    }

    #[test]
    fn custom_key_is_honoured() {
        let body = json!({ "ner/ontonotes": [["陳小華", "PERSON"]] });
        let entities = parse_entities(&body, "ner/ontonotes").unwrap();
        assert_eq!(entities.len(), 1);
    }

    #[test]
    fn unreachable_service_fails_the_call() {
        let tagger = HttpTagger::new("http://127.0.0.1:9/tag", Duration::from_millis(500)).unwrap();
        assert!(tagger.tag("王小明").is_err());
    }
}
