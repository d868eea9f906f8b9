//! Cookie banner localization.
//!
//! The site is served in German and Italian. German is the primary
//! language; Italian holds the authoritative copy, so missing German
//! entries fall back to the Italian table before falling back to the
//! key itself.

use serde::Serialize;

/// Supported UI locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Locale {
    #[serde(rename = "de-DE")]
    DeDe,
    #[serde(rename = "it-IT")]
    ItIt,
}

impl Default for Locale {
    fn default() -> Self {
        Locale::DeDe
    }
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::DeDe => "de-DE",
            Locale::ItIt => "it-IT",
        }
    }

    /// Map a language tag to a supported locale. Regional variants
    /// collapse onto the supported locale ("de-CH" resolves to "de-DE").
    pub fn from_tag(tag: &str) -> Option<Locale> {
        let tag = tag.trim();
        let primary = tag.split(['-', '_']).next().unwrap_or(tag);
        match primary.to_ascii_lowercase().as_str() {
            "de" => Some(Locale::DeDe),
            "it" => Some(Locale::ItIt),
            _ => None,
        }
    }
}

/// Pick the locale for a request. An explicit `lang` query parameter wins
/// over the `Accept-Language` header; with neither, German is served.
pub fn negotiate(lang_query: Option<&str>, accept_language: Option<&str>) -> Locale {
    if let Some(locale) = lang_query.and_then(Locale::from_tag) {
        return locale;
    }
    if let Some(header) = accept_language {
        for entry in header.split(',') {
            let tag = entry.split(';').next().unwrap_or("").trim();
            if let Some(locale) = Locale::from_tag(tag) {
                return locale;
            }
        }
    }
    Locale::default()
}

/// Look up one banner message. Falls back to the Italian table for keys
/// missing from the requested locale, then to the key itself.
pub fn banner_message<'a>(locale: Locale, key: &'a str) -> &'a str {
    lookup(banner_table(locale), key)
        .or_else(|| lookup(banner_table(Locale::ItIt), key))
        .unwrap_or(key)
}

/// The full banner table for a locale, for serving in one response.
pub fn banner_table(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::DeDe => BANNER_DE,
        Locale::ItIt => BANNER_IT,
    }
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

static BANNER_DE: &[(&str, &str)] = &[
    ("banner_title", "Diese Website verwendet Cookies"),
    (
        "banner_text",
        "Wir verwenden technisch notwendige Cookies für den Betrieb der Website und funktionale Cookies zur Verbesserung Ihres Nutzererlebnisses.",
    ),
    ("privacy_link", "Datenschutz"),
    ("cookie_policy_link", "Cookie-Richtlinie"),
    ("accept_all", "Alle Akzeptieren"),
    ("reject", "Ablehnen"),
    ("customize", "Anpassen"),
    ("panel_title", "Cookie-Einstellungen Verwalten"),
    (
        "panel_description",
        "Wählen Sie, welche Cookie-Kategorien Sie akzeptieren möchten. Technisch notwendige Cookies sind immer aktiv, um die Grundfunktionen der Website zu gewährleisten.",
    ),
    ("close_panel", "Schließen"),
    ("essential_title", "Technisch Notwendige Cookies"),
    ("essential_badge", "Immer Aktiv"),
    (
        "essential_description",
        "Diese Cookies sind für den ordnungsgemäßen Betrieb der Website unerlässlich. Sie umfassen Sitzungs-, Authentifizierungs- und Sicherheitscookies. Sie können nicht deaktiviert werden.",
    ),
    (
        "essential_examples",
        "Beispiele: Zustimmungs-, Sitzungscookies, Anti-Forgery-Tokens",
    ),
    ("functional_title", "Funktionale Cookies"),
    ("functional_badge", "Optional"),
    (
        "functional_description",
        "Diese Cookies ermöglichen erweiterte Funktionen wie die Lightbox-Anzeige von Portfolio-Bildern, Scroll-Animationen und andere Funktionen, die das Nutzererlebnis verbessern.",
    ),
    (
        "functional_examples",
        "Funktionen: Bildergalerie, Animationen, UI-Einstellungen",
    ),
    ("analytics_title", "Analyse-Cookies"),
    ("analytics_badge", "Nicht Verwendet"),
    (
        "analytics_description",
        "Derzeit verwenden wir keine Analyse- oder Tracking-Cookies. Diese Kategorie ist für eine mögliche zukünftige Verwendung von Analysewerkzeugen vorbereitet, um zu verstehen, wie Besucher die Website nutzen.",
    ),
    ("analytics_examples", "Status: Keine Analyse-Cookies aktiv"),
    ("save_preferences", "Einstellungen Speichern"),
    ("accept_all_custom", "Alle Akzeptieren"),
    (
        "more_info",
        "Für weitere Informationen lesen Sie bitte unsere",
    ),
    ("cookie_policy", "Cookie-Richtlinie"),
    ("and", "und"),
    ("privacy_policy", "Datenschutzerklärung"),
    ("aria_accept", "Alle Cookies akzeptieren"),
    ("aria_reject", "Optionale Cookies ablehnen"),
    ("aria_customize", "Cookie-Einstellungen anpassen"),
    ("aria_save", "Ihre Einstellungen speichern"),
    ("aria_close", "Panel schließen"),
    (
        "aria_essential",
        "Technisch notwendige Cookies immer aktiv",
    ),
    ("aria_functional", "Funktionale Cookies aktivieren"),
    ("aria_analytics", "Analyse-Cookies nicht verfügbar"),
];

static BANNER_IT: &[(&str, &str)] = &[
    ("banner_title", "Questo sito utilizza cookie"),
    (
        "banner_text",
        "Utilizziamo cookie tecnici necessari per il funzionamento del sito e cookie di funzionalità per migliorare la tua esperienza di navigazione.",
    ),
    ("privacy_link", "Privacy Policy"),
    ("cookie_policy_link", "Cookie Policy"),
    ("accept_all", "Accetta Tutto"),
    ("reject", "Rifiuta"),
    ("customize", "Personalizza"),
    ("panel_title", "Gestisci Preferenze Cookie"),
    (
        "panel_description",
        "Scegli quali categorie di cookie accettare. I cookie tecnici necessari sono sempre attivi per garantire il funzionamento base del sito.",
    ),
    ("close_panel", "Chiudi"),
    ("essential_title", "Cookie Tecnici Necessari"),
    ("essential_badge", "Sempre Attivi"),
    (
        "essential_description",
        "Questi cookie sono essenziali per il corretto funzionamento del sito web. Includono cookie di sessione, autenticazione e sicurezza. Non possono essere disattivati.",
    ),
    (
        "essential_examples",
        "Esempi: cookie di consenso, cookie di sessione, anti-forgery tokens",
    ),
    ("functional_title", "Cookie di Funzionalità"),
    ("functional_badge", "Opzionali"),
    (
        "functional_description",
        "Questi cookie permettono funzionalità avanzate come visualizzazione lightbox delle immagini del portfolio, animazioni durante lo scroll e altre funzionalità che migliorano l'esperienza utente.",
    ),
    (
        "functional_examples",
        "Funzionalità: galleria immagini, animazioni, preferenze UI",
    ),
    ("analytics_title", "Cookie Analitici"),
    ("analytics_badge", "Non Utilizzati"),
    (
        "analytics_description",
        "Al momento non utilizziamo cookie analitici o di tracciamento. Questa categoria è preparata per un futuro eventuale utilizzo di strumenti di analisi per comprendere come i visitatori utilizzano il sito.",
    ),
    ("analytics_examples", "Stato: Nessun cookie analitico attivo"),
    ("save_preferences", "Salva Preferenze"),
    ("accept_all_custom", "Accetta Tutto"),
    ("more_info", "Per maggiori informazioni consulta la nostra"),
    ("cookie_policy", "Cookie Policy"),
    ("and", "e"),
    ("privacy_policy", "Privacy Policy"),
    ("aria_accept", "Accetta tutti i cookie"),
    ("aria_reject", "Rifiuta cookie opzionali"),
    ("aria_customize", "Personalizza preferenze cookie"),
    ("aria_save", "Salva le tue preferenze"),
    ("aria_close", "Chiudi pannello"),
    ("aria_essential", "Cookie tecnici necessari sempre attivi"),
    ("aria_functional", "Abilita cookie di funzionalità"),
    ("aria_analytics", "Cookie analitici non disponibili"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_overrides_header() {
        let locale = negotiate(Some("it"), Some("de-DE,de;q=0.9"));
        assert_eq!(locale, Locale::ItIt);
    }

    #[test]
    fn test_regional_variant_collapses() {
        assert_eq!(Locale::from_tag("de-CH"), Some(Locale::DeDe));
        assert_eq!(Locale::from_tag("it-CH"), Some(Locale::ItIt));
    }

    #[test]
    fn test_header_first_supported_entry_wins() {
        let locale = negotiate(None, Some("fr-FR,it;q=0.8,de;q=0.5"));
        assert_eq!(locale, Locale::ItIt);
    }

    #[test]
    fn test_unknown_language_defaults_to_german() {
        assert_eq!(negotiate(Some("fr"), None), Locale::DeDe);
        assert_eq!(negotiate(None, Some("en-US,en;q=0.9")), Locale::DeDe);
        assert_eq!(negotiate(None, None), Locale::DeDe);
    }

    #[test]
    fn test_message_lookup() {
        assert_eq!(
            banner_message(Locale::DeDe, "accept_all"),
            "Alle Akzeptieren"
        );
        assert_eq!(banner_message(Locale::ItIt, "accept_all"), "Accetta Tutto");
    }

    #[test]
    fn test_missing_key_falls_back_to_key() {
        assert_eq!(banner_message(Locale::DeDe, "no_such_key"), "no_such_key");
    }

    #[test]
    fn test_tables_cover_the_same_keys() {
        let de: Vec<&str> = BANNER_DE.iter().map(|(k, _)| *k).collect();
        let it: Vec<&str> = BANNER_IT.iter().map(|(k, _)| *k).collect();
        assert_eq!(de, it);
    }
}
