//! Source-trust weighting. Resolution is an ordered rule list — exact
//! classification table, then suffix reduction, then TLD heuristics, then
//! the unclassified default — so every domain resolves to some weight.

use std::collections::HashMap;

use truthscope_common::domain_of;

/// Weight for any `.gov`-style domain not in the table.
const GOV_DEFAULT_WEIGHT: f64 = 8.5;
/// Weight for any academic (`.edu`, `.ac.xx`) domain not in the table.
const ACADEMIC_DEFAULT_WEIGHT: f64 = 8.0;
/// Weight for intergovernmental `.int` domains not in the table.
const INTERGOVERNMENTAL_DEFAULT_WEIGHT: f64 = 8.5;
/// Weight for domains no rule recognizes.
const UNCLASSIFIED_DEFAULT_WEIGHT: f64 = 1.0;

/// Default classification table, keyed by registrable domain.
/// Bands: government/academic 8.0-10.0, fact-checkers 5.3-6.0, major
/// international news 3.2-5.0, national news 2.0-3.5, regional news
/// 1.6-1.8, low-reliability 0.5-0.9.
pub const DEFAULT_WEIGHTS: &[(&str, f64)] = &[
    // Government and intergovernmental
    ("who.int", 10.0),
    ("un.org", 9.5),
    ("europa.eu", 9.5),
    ("nih.gov", 9.5),
    ("nasa.gov", 9.5),
    ("cdc.gov", 9.0),
    ("noaa.gov", 9.0),
    ("fda.gov", 9.0),
    ("epa.gov", 9.0),
    ("state.gov", 9.0),
    ("congress.gov", 9.0),
    ("nist.gov", 9.0),
    ("usgs.gov", 9.0),
    ("india.gov.in", 9.0),
    ("pib.gov.in", 9.0),
    ("isro.gov.in", 9.0),
    ("rbi.org.in", 9.0),
    // Academic
    ("harvard.edu", 8.0),
    ("mit.edu", 8.0),
    ("stanford.edu", 8.0),
    ("berkeley.edu", 8.0),
    ("ox.ac.uk", 8.0),
    ("cam.ac.uk", 8.0),
    ("iisc.ac.in", 8.0),
    // Fact-checking organizations
    ("snopes.com", 6.0),
    ("factcheck.org", 5.8),
    ("politifact.com", 5.6),
    ("altnews.in", 5.6),
    ("boomlive.in", 5.6),
    ("factchecker.in", 5.5),
    ("climatefeedback.org", 5.4),
    ("vishvasnews.com", 5.4),
    ("newschecker.in", 5.4),
    ("factcrescendo.com", 5.3),
    // Major international news
    ("bbc.com", 5.0),
    ("reuters.com", 5.0),
    ("theguardian.com", 4.5),
    ("nytimes.com", 4.5),
    ("apnews.com", 4.2),
    ("wsj.com", 4.2),
    ("economist.com", 4.2),
    ("npr.org", 4.0),
    ("pbs.org", 4.0),
    ("cnn.com", 3.8),
    ("ft.com", 3.8),
    ("bloomberg.com", 3.8),
    ("euronews.com", 3.8),
    ("cbsnews.com", 3.5),
    ("nbcnews.com", 3.5),
    ("abcnews.go.com", 3.3),
    ("aljazeera.com", 3.2),
    ("france24.com", 3.2),
    ("dw.com", 3.2),
    ("smh.com.au", 3.2),
    ("globalnews.ca", 3.2),
    // Major national news
    ("thehindu.com", 3.5),
    ("indianexpress.com", 3.5),
    ("livemint.com", 3.3),
    ("scroll.in", 3.2),
    ("thewire.in", 3.2),
    ("theprint.in", 3.0),
    ("newslaundry.com", 3.0),
    ("business-standard.com", 2.8),
    ("telegraphindia.com", 2.8),
    ("tribuneindia.com", 2.8),
    ("outlookindia.com", 2.7),
    ("timesofindia.indiatimes.com", 2.5),
    ("hindustantimes.com", 2.5),
    ("economictimes.indiatimes.com", 2.5),
    ("thequint.com", 2.4),
    ("indiatoday.in", 2.4),
    ("ndtv.com", 2.2),
    ("aninews.in", 2.2),
    ("moneycontrol.com", 2.1),
    ("deccanherald.com", 2.1),
    ("firstpost.com", 2.1),
    ("dnaindia.com", 2.0),
    // Regional news
    ("mathrubhumi.com", 1.8),
    ("manoramaonline.com", 1.8),
    ("eenadu.net", 1.8),
    ("anandabazar.com", 1.8),
    ("dailythanthi.com", 1.8),
    ("jagran.com", 1.7),
    ("amarujala.com", 1.7),
    ("bhaskar.com", 1.7),
    ("lokmat.com", 1.7),
    ("sakshi.com", 1.7),
    ("punjabkesari.in", 1.6),
    ("prabhatkhabar.com", 1.6),
    ("kashmirobserver.net", 1.6),
    // Low-reliability and tabloid sources
    ("thestatesman.com", 0.9),
    ("sportskeeda.com", 0.9),
    ("mid-day.com", 0.9),
    ("news18.com", 0.9),
    ("timesnownews.com", 0.9),
    ("zeenews.india.com", 0.9),
    ("republicworld.com", 0.85),
    ("opindia.com", 0.85),
    ("swarajyamag.com", 0.85),
    ("nationalherald.com", 0.85),
    ("tfipost.com", 0.8),
    ("organiser.org", 0.8),
    ("pinkvilla.com", 0.8),
    ("filmfare.com", 0.8),
    ("postcard.news", 0.7),
    ("pgurus.com", 0.7),
    ("rightlog.in", 0.7),
    ("hindupost.in", 0.7),
    ("newsbharati.com", 0.7),
    ("greatgameindia.com", 0.6),
    ("mynation.net", 0.6),
    ("thedailyswitch.com", 0.6),
    ("fakingnews.com", 0.5), // satire
];

/// Maps a publishing domain to its trust weight.
pub struct SourceWeights {
    table: HashMap<String, f64>,
    default_weight: f64,
}

impl Default for SourceWeights {
    fn default() -> Self {
        Self::new(
            DEFAULT_WEIGHTS.iter().map(|(d, w)| (d.to_string(), *w)),
            UNCLASSIFIED_DEFAULT_WEIGHT,
        )
    }
}

impl SourceWeights {
    pub fn new(entries: impl IntoIterator<Item = (String, f64)>, default_weight: f64) -> Self {
        Self {
            table: entries.into_iter().collect(),
            default_weight,
        }
    }

    /// Resolve a domain (or full URL) to a trust weight. Never fails.
    pub fn weight_for(&self, domain: &str) -> f64 {
        let normalized = domain_of(domain);
        if normalized.is_empty() {
            return self.default_weight;
        }

        // 1. Exact match on the full host.
        if let Some(w) = self.table.get(&normalized) {
            return *w;
        }

        // 2. Suffix reduction: strip leading labels so subdomains hit
        //    their registrable domain (edition.cnn.com -> cnn.com).
        let labels: Vec<&str> = normalized.split('.').collect();
        for start in 1..labels.len().saturating_sub(1) {
            let suffix = labels[start..].join(".");
            if let Some(w) = self.table.get(&suffix) {
                return *w;
            }
        }

        // 3. TLD heuristics, in order.
        if normalized.ends_with(".gov") || normalized.contains(".gov.") {
            return GOV_DEFAULT_WEIGHT;
        }
        if normalized.ends_with(".mil") {
            return GOV_DEFAULT_WEIGHT;
        }
        if normalized.ends_with(".edu")
            || normalized.contains(".edu.")
            || normalized.contains(".ac.")
        {
            return ACADEMIC_DEFAULT_WEIGHT;
        }
        if normalized.ends_with(".int") {
            return INTERGOVERNMENTAL_DEFAULT_WEIGHT;
        }

        // 4. Unclassified default.
        self.default_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_wins() {
        let weights = SourceWeights::default();
        assert_eq!(weights.weight_for("cdc.gov"), 9.0);
        assert_eq!(weights.weight_for("bbc.com"), 5.0);
        assert_eq!(weights.weight_for("fakingnews.com"), 0.5);
    }

    #[test]
    fn full_urls_and_subdomains_resolve_to_registrable_domain() {
        let weights = SourceWeights::default();
        assert_eq!(weights.weight_for("https://www.bbc.com/news/article-123"), 5.0);
        assert_eq!(weights.weight_for("edition.cnn.com"), 3.8);
        assert_eq!(weights.weight_for("https://rss.nytimes.com/feed"), 4.5);
    }

    #[test]
    fn gov_and_academic_heuristics_apply_on_table_miss() {
        let weights = SourceWeights::default();
        assert_eq!(weights.weight_for("unknowncity.gov"), GOV_DEFAULT_WEIGHT);
        assert_eq!(weights.weight_for("health.gov.au"), GOV_DEFAULT_WEIGHT);
        assert_eq!(weights.weight_for("smallcollege.edu"), ACADEMIC_DEFAULT_WEIGHT);
        assert_eq!(weights.weight_for("sydney.edu.au"), ACADEMIC_DEFAULT_WEIGHT);
        assert_eq!(weights.weight_for("leeds.ac.uk"), ACADEMIC_DEFAULT_WEIGHT);
    }

    #[test]
    fn unknown_domains_get_finite_positive_default() {
        let weights = SourceWeights::default();
        for domain in ["example-news.com", "blog.random.io", "", "not a domain"] {
            let w = weights.weight_for(domain);
            assert!(w.is_finite() && w > 0.0, "{domain} resolved to {w}");
        }
        assert_eq!(weights.weight_for("example-news.com"), 1.0);
    }

    #[test]
    fn default_table_respects_band_ranges() {
        for (domain, w) in DEFAULT_WEIGHTS {
            assert!(
                (0.5..=10.0).contains(w),
                "{domain} weight {w} outside documented bands"
            );
        }
    }

    #[test]
    fn injected_table_overrides_defaults() {
        let weights = SourceWeights::new([("example.com".to_string(), 7.0)], 0.8);
        assert_eq!(weights.weight_for("example.com"), 7.0);
        assert_eq!(weights.weight_for("other.com"), 0.8);
    }
}
