//! Portfolio gallery items.

use crate::domain::validation::{require_text, FieldError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Style assigned to new portfolio items when none is given.
pub const DEFAULT_STYLE: &str = "Blackwork";

/// A published portfolio piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub style: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for publishing a portfolio piece. Title and image URL are
/// required; the style falls back to [`DEFAULT_STYLE`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolioItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub image_url: String,
    pub style: Option<String>,
}

impl NewPortfolioItem {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        require_text(&mut errors, "title", &self.title);
        require_text(&mut errors, "imageUrl", &self.image_url);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// The style to store, defaulting when absent or blank.
    pub fn style_or_default(&self) -> &str {
        match self.style.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s,
            _ => DEFAULT_STYLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_and_image_required() {
        let item = NewPortfolioItem {
            title: String::new(),
            description: "ignored".to_string(),
            image_url: "  ".to_string(),
            style: None,
        };
        let errors = item.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "imageUrl"]);
    }

    #[test]
    fn test_style_defaults_to_blackwork() {
        let item = NewPortfolioItem {
            title: "Realistic rose".to_string(),
            description: String::new(),
            image_url: "/img/rose.jpg".to_string(),
            style: None,
        };
        assert_eq!(item.style_or_default(), DEFAULT_STYLE);

        let item = NewPortfolioItem {
            style: Some("  ".to_string()),
            ..item
        };
        assert_eq!(item.style_or_default(), DEFAULT_STYLE);

        let item = NewPortfolioItem {
            style: Some("Fine Line".to_string()),
            ..item
        };
        assert_eq!(item.style_or_default(), "Fine Line");
    }
}
