//! Similarity scoring trait and the default scorer implementation.

/// Scores how far a query is from a candidate entity name.
///
/// Scores are normalized distances: 0.0 is an exact match and larger values
/// are weaker matches. The search engine keeps matches whose score stays at
/// or below the configured threshold, so implementations only need to agree
/// on these semantics to be interchangeable.
pub trait SimilarityScorer: Send + Sync {
    fn score(&self, query: &str, candidate: &str) -> f64;
}

/// Default scorer: case-folded normalized Levenshtein distance, taking the
/// best of the whole candidate and its individual tokens so a one-word query
/// still finds multi-word entity names.
#[derive(Clone, Copy, Debug, Default)]
pub struct NormalizedLevenshteinScorer;

impl SimilarityScorer for NormalizedLevenshteinScorer {
    fn score(&self, query: &str, candidate: &str) -> f64 {
        let query = query.trim().to_lowercase();
        let candidate = candidate.trim().to_lowercase();
        if query.is_empty() || candidate.is_empty() {
            return 1.0;
        }
        let whole = 1.0 - strsim::normalized_levenshtein(&query, &candidate);
        candidate
            .split_whitespace()
            .map(|token| 1.0 - strsim::normalized_levenshtein(&query, token))
            .fold(whole, f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f64 = 0.3;

    #[test]
    fn exact_match_scores_zero() {
        let scorer = NormalizedLevenshteinScorer;
        assert_eq!(scorer.score("Acme Corp", "Acme Corp"), 0.0);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let scorer = NormalizedLevenshteinScorer;
        assert_eq!(scorer.score("acme corp", "ACME CORP"), 0.0);
    }

    #[test]
    fn a_transposition_stays_under_the_threshold() {
        let scorer = NormalizedLevenshteinScorer;
        let score = scorer.score("Acem Corp", "Acme Corp");
        assert!(score > 0.0 && score <= THRESHOLD, "score was {score}");
    }

    #[test]
    fn a_single_token_query_finds_a_multi_word_name() {
        let scorer = NormalizedLevenshteinScorer;
        assert_eq!(scorer.score("Acme", "Acme Corp"), 0.0);
    }

    #[test]
    fn an_unrelated_name_scores_above_the_threshold() {
        let scorer = NormalizedLevenshteinScorer;
        assert!(scorer.score("Initech", "Acme Corp") > THRESHOLD);
    }

    #[test]
    fn blank_input_never_matches() {
        let scorer = NormalizedLevenshteinScorer;
        assert_eq!(scorer.score("", "Acme Corp"), 1.0);
        assert_eq!(scorer.score("Acme", "  "), 1.0);
    }
}
