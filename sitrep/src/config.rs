use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_adapter() -> String {
    "bird".to_string()
}

/// Stored tracker configuration: which adapter to run and what to ask it.
/// Every field falls back to the built-in defaults, so a partial config
/// file is fine.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerConfig {
    /// Feed adapter program name or path.
    pub adapter: String,
    /// Search queries, most important first.
    pub keywords: Vec<String>,
    /// Monitored accounts, most authoritative first.
    pub accounts: Vec<String>,
    /// Terms that mark a trending item as relevant to the tracked theatre.
    pub relevance_terms: Vec<String>,
    /// Records requested per query.
    pub search_limit: usize,
    /// Keyword queries per run (rate-limit guard).
    pub max_keywords: usize,
    /// Account queries per run.
    pub max_accounts: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            adapter: default_adapter(),
            keywords: [
                "israel iran war",
                "us iran strike",
                "tel aviv missile",
                "tehran strike",
                "airspace closed",
                "hormuz blockade",
                "red sea interception",
                "maritime alert",
            ]
            .map(String::from)
            .to_vec(),
            accounts: [
                "IDF",
                "TimesofIsrael",
                "TheStudyofWar",
                "Osinttechnical",
                "sentdefender",
                "UKMTO_Dubai",
                "NavalNews",
            ]
            .map(String::from)
            .to_vec(),
            relevance_terms: [
                "israel", "iran", "gaza", "tehran", "tel aviv", "hormuz", "red sea",
                "gulf", "yemen", "lebanon", "syria", "middle east",
            ]
            .map(String::from)
            .to_vec(),
            search_limit: 5,
            max_keywords: 5,
            max_accounts: 3,
        }
    }
}

impl TrackerConfig {
    fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".sitrep")
            .join("config.json")
    }

    /// Load from ~/.sitrep/config.json.
    pub fn load() -> Option<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Option<Self> {
        let data = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&data).ok()
    }

    /// Save to ~/.sitrep/config.json.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&path, &data)
    }

    /// Is this trending text about the tracked theatre?
    pub fn is_relevant(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.relevance_terms.iter().any(|term| lower.contains(term))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = TrackerConfig::default();
        assert_eq!(config.adapter, "bird");
        assert!(!config.keywords.is_empty());
        assert!(config.max_keywords <= config.keywords.len());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: TrackerConfig =
            serde_json::from_str(r#"{"adapter": "mock-feed", "maxKeywords": 2}"#).unwrap();
        assert_eq!(config.adapter, "mock-feed");
        assert_eq!(config.max_keywords, 2);
        assert_eq!(config.search_limit, TrackerConfig::default().search_limit);
        assert!(!config.accounts.is_empty());
    }

    #[test]
    fn relevance_is_case_insensitive() {
        let config = TrackerConfig::default();
        assert!(config.is_relevant("Strait of Hormuz traffic halted"));
        assert!(!config.is_relevant("local sports roundup"));
    }

    #[test]
    fn load_from_missing_path_is_none() {
        assert!(TrackerConfig::load_from(std::path::Path::new("/no/such/config.json")).is_none());
    }
}
