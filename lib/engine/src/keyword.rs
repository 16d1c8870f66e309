//! Keyword route matching.

use chatflow_core::BlockId;
use chatflow_flow::{Block, MatchSpec};

/// Resolves a block's routes by case-insensitive substring matching.
///
/// Keyword routes are tried in declaration order; the first route with a
/// term contained in the utterance wins. If none matches, the first fallback
/// route is used. Intent routes and routes without a guard are never
/// considered here. A winning route without a target resolves to none.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordMatcher;

impl KeywordMatcher {
    /// Returns the block to continue at, if any route applies.
    ///
    /// An absent utterance is matched as the empty string, so only an empty
    /// term or a fallback route can match it.
    #[must_use]
    pub fn resolve_next(&self, block: &Block, text: Option<&str>) -> Option<BlockId> {
        let routes = block.routes();
        let text = text.unwrap_or_default().to_lowercase();

        let keyword_hit = routes.iter().find(|route| match &route.match_spec {
            Some(MatchSpec::Keyword { terms }) => {
                terms.iter().any(|term| text.contains(&term.to_lowercase()))
            }
            Some(MatchSpec::Intent { .. } | MatchSpec::Fallback) | None => false,
        });

        keyword_hit
            .or_else(|| routes.iter().find(|route| route.is_fallback()))
            .and_then(|route| route.next.clone())
    }
}
