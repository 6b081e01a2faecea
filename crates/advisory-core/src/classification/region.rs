use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic focus inferred from a fund name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Chile,
    LatinAmerica,
    EmergingMarkets,
    AsiaPacific,
    Europe,
    UnitedStates,
    Global,
}

impl Region {
    pub fn label(self) -> &'static str {
        match self {
            Region::Chile => "Chile",
            Region::LatinAmerica => "Latin America",
            Region::EmergingMarkets => "Emerging Markets",
            Region::AsiaPacific => "Asia Pacific",
            Region::Europe => "Europe",
            Region::UnitedStates => "United States",
            Region::Global => "Global",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A region matches when the lower-cased name contains any `fragments`
/// entry, or when one of its whole words equals a `words` entry. Whole-word
/// matching keeps short codes like "em" or "us" from firing inside other
/// words.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionRule {
    pub region: Region,
    #[serde(default)]
    pub fragments: Vec<String>,
    #[serde(default)]
    pub words: Vec<String>,
}

fn rule(region: Region, fragments: &[&str], words: &[&str]) -> RegionRule {
    RegionRule {
        region,
        fragments: fragments.iter().map(|s| s.to_string()).collect(),
        words: words.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn default_region_rules() -> Vec<RegionRule> {
    vec![
        rule(Region::Chile, &["chile", "ipsa"], &["clp"]),
        rule(
            Region::LatinAmerica,
            &["latin americ", "latinoameric", "latam", "brazil", "brasil", "mexico", "andean"],
            &[],
        ),
        rule(Region::EmergingMarkets, &["emerg"], &["em"]),
        rule(
            Region::AsiaPacific,
            &["asia", "pacific", "china", "japan", "india"],
            &[],
        ),
        rule(Region::Europe, &["europ"], &["euro"]),
        rule(
            Region::Global,
            &["global", "world", "international", "mundial"],
            &["intl"],
        ),
        rule(
            Region::UnitedStates,
            &["america", "s&p", "nasdaq"],
            &["us", "u.s", "usa"],
        ),
    ]
}

/// Lower-cased words; `&` and `.` stay inside words, trailing dots are dropped.
pub(crate) fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '&' || c == '.'))
        .map(|w| w.trim_end_matches('.').to_string())
        .filter(|w| !w.is_empty())
        .collect()
}

impl RegionRule {
    pub(crate) fn matches(&self, lower: &str, tokens: &[String]) -> bool {
        self.fragments
            .iter()
            .any(|f| !f.is_empty() && lower.contains(&f.to_lowercase()))
            || self
                .words
                .iter()
                .any(|w| tokens.iter().any(|t| t.eq_ignore_ascii_case(w)))
    }
}

/// First matching rule wins; no match is [`Region::Global`].
pub fn match_region(rules: &[RegionRule], name: &str) -> Region {
    let lower = name.to_lowercase();
    let tokens = words(name);
    rules
        .iter()
        .find(|r| r.matches(&lower, &tokens))
        .map(|r| r.region)
        .unwrap_or(Region::Global)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(name: &str) -> Region {
        match_region(&default_region_rules(), name)
    }

    #[test]
    fn test_region_patterns() {
        assert_eq!(region("Fondo Acciones Chile A"), Region::Chile);
        assert_eq!(region("BlackRock Latin American Fund"), Region::LatinAmerica);
        assert_eq!(region("Templeton Emerging Markets Fund"), Region::EmergingMarkets);
        assert_eq!(region("JPMorgan Asia Growth Fund"), Region::AsiaPacific);
        assert_eq!(region("Comgest Growth Europe"), Region::Europe);
        assert_eq!(region("Capital Group Global Bond Fund"), Region::Global);
        assert_eq!(region("Vanguard U.S. 500 Stock Index Fund"), Region::UnitedStates);
        assert_eq!(region("JPMorgan US Growth Fund"), Region::UnitedStates);
    }

    #[test]
    fn test_short_codes_need_whole_words() {
        // "em" inside "Premium" and "us" inside "Plus" must not match
        assert_eq!(region("Premium Plus Income"), Region::Global);
        assert_eq!(region("Schroder EM Debt"), Region::EmergingMarkets);
    }

    #[test]
    fn test_default_is_global() {
        assert_eq!(region(""), Region::Global);
        assert_eq!(region("Multi Strategy Fund"), Region::Global);
    }

    #[test]
    fn test_words_keep_dots_and_ampersands() {
        assert_eq!(words("S&P 500, U.S."), vec!["s&p", "500", "u.s"]);
    }
}
