//! Advice quotes: one quote from each of two services, fetched together.
//!
//! Both requests run concurrently and both are awaited before either
//! outcome is inspected. Results are not cached.

use serde_json::Value;

use crate::config::{AdviceConfig, QuoteSourceConfig};
use crate::error::SearchError;
use crate::http::fetch_json;
use crate::types::{Advice, Quote};

/// Fetch a quote from each configured service.
///
/// # Errors
///
/// Returns [`SearchError::Upstream`] if either request fails or a payload
/// lacks its quote field. When both fail, both messages are reported.
pub async fn fetch_advice(
    client: &reqwest::Client,
    config: &AdviceConfig,
) -> Result<Advice, SearchError> {
    let (kanye, chuck_norris) = tokio::join!(
        fetch_quote(client, &config.kanye),
        fetch_quote(client, &config.chuck_norris),
    );

    match (kanye, chuck_norris) {
        (Ok(kanye), Ok(chuck_norris)) => Ok(Advice {
            kanye,
            chuck_norris,
        }),
        (Err(err), Ok(_)) | (Ok(_), Err(err)) => Err(err),
        (Err(first), Err(second)) => Err(SearchError::Upstream(format!(
            "{}; {}",
            first.detail(),
            second.detail()
        ))),
    }
}

async fn fetch_quote(
    client: &reqwest::Client,
    source: &QuoteSourceConfig,
) -> Result<Quote, SearchError> {
    let payload = fetch_json(client, &source.name, &source.url).await?;
    quote_from_payload(source, &payload)
}

/// Map a quote service payload onto [`Quote`].
///
/// The id comes from `id_field` when configured and present as a string or
/// number; otherwise it is the source name.
///
/// # Errors
///
/// Returns [`SearchError::Upstream`] if the quote field is missing or not a
/// string.
pub fn quote_from_payload(
    source: &QuoteSourceConfig,
    payload: &Value,
) -> Result<Quote, SearchError> {
    let quote = payload
        .get(&source.quote_field)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            SearchError::upstream(
                &source.name,
                format!("payload has no string `{}` field", source.quote_field),
            )
        })?;

    let id = source
        .id_field
        .as_deref()
        .and_then(|field| payload.get(field))
        .and_then(|value| match value {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| source.name.clone());

    Ok(Quote {
        id,
        quote: quote.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chuck_norris_payload_maps_value_to_quote() {
        let config = AdviceConfig::default();
        let payload = json!({
            "id": "x1y2",
            "value": "Chuck Norris can divide by zero.",
            "url": "https://api.chucknorris.io/jokes/x1y2",
            "icon_url": "https://assets.chucknorris.host/img/avatar/chuck-norris.png"
        });
        let quote = quote_from_payload(&config.chuck_norris, &payload).expect("quote");
        assert_eq!(quote.id, "x1y2");
        assert_eq!(quote.quote, "Chuck Norris can divide by zero.");
    }

    #[test]
    fn kanye_payload_without_id_uses_source_name() {
        let config = AdviceConfig::default();
        let payload = json!({"quote": "I feel like I'm too busy writing history to read it."});
        let quote = quote_from_payload(&config.kanye, &payload).expect("quote");
        assert_eq!(quote.id, "kanye");
        assert!(quote.quote.starts_with("I feel like"));
    }

    #[test]
    fn numeric_id_is_stringified() {
        let config = AdviceConfig::default();
        let payload = json!({"id": 17, "value": "Roundhouse."});
        let quote = quote_from_payload(&config.chuck_norris, &payload).expect("quote");
        assert_eq!(quote.id, "17");
    }

    #[test]
    fn missing_quote_field_is_upstream_error() {
        let config = AdviceConfig::default();
        let err = quote_from_payload(&config.chuck_norris, &json!({"id": "x"})).unwrap_err();
        assert!(matches!(err, SearchError::Upstream(_)));
        assert!(err.to_string().contains("chuck_norris"));
        assert!(err.to_string().contains("value"));
    }
}
