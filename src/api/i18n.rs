use axum::extract::Query;
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::i18n;

#[derive(Debug, Deserialize)]
pub struct BannerQuery {
    pub lang: Option<String>,
}

/// Cookie banner copy for the negotiated locale. An explicit `lang` query
/// parameter beats the Accept-Language header; German is the default.
pub async fn get_cookie_banner(
    Query(query): Query<BannerQuery>,
    headers: HeaderMap,
) -> Json<Value> {
    let accept_language = headers.get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok());
    let locale = i18n::negotiate(query.lang.as_deref(), accept_language);

    // The Italian table is the authoritative key set; per-key lookup
    // handles the fallback for entries a locale is missing.
    let mut messages = Map::new();
    for (key, _) in i18n::banner_table(i18n::Locale::ItIt) {
        let value = i18n::banner_message(locale, key);
        messages.insert((*key).to_string(), Value::String(value.to_string()));
    }

    Json(json!({
        "locale": locale.as_str(),
        "messages": messages,
    }))
}
