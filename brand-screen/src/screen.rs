//! Impersonation detection
//!
//! The screen normalizes the local part of a VPA (NFKC, lowercase,
//! leetspeak folding) and compares it against every registered brand:
//! allowlisted VPAs are skipped, keyword containment is an immediate hit,
//! and near-misses are caught with a bounded Levenshtein distance.

use crate::registry::BrandRegistry;
use unicode_normalization::UnicodeNormalization;

/// Maximum edit distance still considered a lookalike
const LEVENSHTEIN_THRESHOLD: usize = 2;

/// Keywords this short or shorter never fuzzy-match; containment only
const MIN_FUZZY_KEYWORD_LEN: usize = 3;

/// A detected impersonation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandMatch {
    /// Brand being impersonated
    pub brand: String,

    /// Keyword that triggered the match
    pub keyword: String,

    /// Edit distance to the keyword (0 for containment)
    pub distance: usize,
}

/// Normalize the local part of a VPA for comparison.
///
/// NFKC folds fullwidth and compatibility forms, then the common
/// leetspeak/homoglyph substitutions are applied on the lowercased result.
pub fn normalize_candidate(local: &str) -> String {
    local
        .nfkc()
        .collect::<String>()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '0' => 'o',
            '1' => 'l',
            '@' => 'a',
            '$' => 's',
            '!' => 'i',
            '3' => 'e',
            other => other,
        })
        .collect()
}

/// Brand impersonation screen
#[derive(Debug, Clone, Default)]
pub struct BrandScreen {
    registry: BrandRegistry,
}

impl BrandScreen {
    /// Create a screen over a loaded registry
    pub fn new(registry: BrandRegistry) -> Self {
        Self { registry }
    }

    /// True if the registry has no brands (screen is a no-op)
    pub fn is_disabled(&self) -> bool {
        self.registry.is_empty()
    }

    /// Check whether `merchant_vpa` impersonates a registered brand.
    ///
    /// Returns the first match in stable brand order, or `None`.
    pub fn check(&self, merchant_vpa: &str) -> Option<BrandMatch> {
        let local = merchant_vpa.split('@').next().unwrap_or(merchant_vpa);
        let candidate = normalize_candidate(local);
        let candidate_len = candidate.chars().count();

        for (brand, entry) in self.registry.iter() {
            // Legitimate brand VPAs pass untouched
            if entry.allowed_vpas.contains(merchant_vpa) {
                continue;
            }

            for keyword in &entry.keywords {
                if candidate.contains(keyword.as_str()) {
                    tracing::debug!(vpa = merchant_vpa, brand, keyword = keyword.as_str(), "Brand keyword containment");
                    return Some(BrandMatch {
                        brand: brand.to_string(),
                        keyword: keyword.clone(),
                        distance: 0,
                    });
                }

                let keyword_len = keyword.chars().count();
                if candidate_len.abs_diff(keyword_len) <= LEVENSHTEIN_THRESHOLD {
                    let distance = levenshtein(&candidate, keyword);
                    if distance <= LEVENSHTEIN_THRESHOLD && keyword_len > MIN_FUZZY_KEYWORD_LEN {
                        tracing::debug!(vpa = merchant_vpa, brand, keyword = keyword.as_str(), distance, "Brand lookalike match");
                        return Some(BrandMatch {
                            brand: brand.to_string(),
                            keyword: keyword.clone(),
                            distance,
                        });
                    }
                }
            }
        }

        None
    }
}

// Levenshtein distance over chars
fn levenshtein(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    let mut matrix = vec![vec![0usize; b.len() + 1]; a.len() + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        matrix[0][j] = j;
    }

    for (i, &c1) in a.iter().enumerate() {
        for (j, &c2) in b.iter().enumerate() {
            let cost = usize::from(c1 != c2);
            matrix[i + 1][j + 1] = (matrix[i][j + 1] + 1)
                .min(matrix[i + 1][j] + 1)
                .min(matrix[i][j] + cost);
        }
    }

    matrix[a.len()][b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BrandEntry;

    fn test_screen() -> BrandScreen {
        BrandScreen::new(BrandRegistry::from_entries([
            (
                "amazon".to_string(),
                BrandEntry {
                    keywords: vec!["amazon".to_string(), "amzn".to_string()],
                    allowed_vpas: ["amazon@apl".to_string()].into(),
                },
            ),
            (
                "upi".to_string(),
                BrandEntry {
                    keywords: vec!["upi".to_string()],
                    allowed_vpas: Default::default(),
                },
            ),
        ]))
    }

    #[test]
    fn test_leetspeak_lookalike_detected() {
        let screen = test_screen();

        let hit = screen.check("amaz0n@upi").unwrap();
        assert_eq!(hit.brand, "amazon");
        assert_eq!(hit.distance, 0); // "amaz0n" normalizes to "amazon" exactly
    }

    #[test]
    fn test_keyword_containment_detected() {
        let screen = test_screen();

        let hit = screen.check("amazon-support@upi").unwrap();
        assert_eq!(hit.brand, "amazon");
        assert_eq!(hit.keyword, "amazon");
    }

    #[test]
    fn test_near_miss_within_edit_distance() {
        let screen = test_screen();

        // One deletion away from "amazon"
        let hit = screen.check("amazn@upi").unwrap();
        assert_eq!(hit.brand, "amazon");
        assert_eq!(hit.distance, 1);
    }

    #[test]
    fn test_allowlisted_vpa_passes() {
        let screen = test_screen();
        assert!(screen.check("amazon@apl").is_none());
    }

    #[test]
    fn test_short_keywords_never_fuzzy_match() {
        let screen = test_screen();

        // "upl" is distance 1 from keyword "upi", but the keyword is only
        // 3 chars so the fuzzy path is gated off.
        assert!(screen.check("upl@psp").is_none());
    }

    #[test]
    fn test_unrelated_vpa_passes() {
        let screen = test_screen();
        assert!(screen.check("chaiwala@psp").is_none());
    }

    #[test]
    fn test_fullwidth_homoglyphs_folded() {
        let screen = test_screen();

        // Fullwidth "ａｍａｚｏｎ" NFKC-folds to "amazon"
        let hit = screen.check("ａｍａｚｏｎ@psp").unwrap();
        assert_eq!(hit.brand, "amazon");
    }

    #[test]
    fn test_detection_is_normalization_stable() {
        let screen = test_screen();

        for vpa in ["amaz0n@upi", "AMAZON-pay@upi", "ａｍａｚｏｎ@psp"] {
            let local = vpa.split('@').next().unwrap();
            let renormalized = format!("{}@upi", normalize_candidate(local));
            assert_eq!(
                screen.check(vpa).map(|m| m.brand),
                screen.check(&renormalized).map(|m| m.brand),
                "normalization changed the verdict for {vpa}"
            );
        }
    }

    #[test]
    fn test_empty_registry_is_noop() {
        let screen = BrandScreen::default();
        assert!(screen.is_disabled());
        assert!(screen.check("amaz0n@upi").is_none());
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("amazon", "amazon"), 0);
        assert_eq!(levenshtein("amazn", "amazon"), 1);
    }
}
