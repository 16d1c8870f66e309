//! Intent resolution for intent-detection blocks.
//!
//! Two block layouts exist. When a block declares intent options, those are
//! used exclusively: classifier first, then each option's keywords, then the
//! block's fallback. Otherwise the block's routes are used: the classifier is
//! asked about the labels of its intent routes and the keyword matcher
//! covers whatever the classifier could not place.

use crate::keyword::KeywordMatcher;
use chatflow_ai::IntentClassifier;
use chatflow_core::BlockId;
use chatflow_flow::{Block, BlockKind, IntentOption, Route};
use std::sync::Arc;
use tracing::{debug, info};

/// Resolves the continuation of an intent-detection block.
#[derive(Clone)]
pub struct IntentResolver {
    classifier: Arc<dyn IntentClassifier>,
    keywords: KeywordMatcher,
}

impl IntentResolver {
    /// Creates a resolver backed by the given classifier.
    #[must_use]
    pub fn new(classifier: Arc<dyn IntentClassifier>) -> Self {
        Self {
            classifier,
            keywords: KeywordMatcher,
        }
    }

    /// Returns the block to continue at, if any.
    ///
    /// Blocks other than intent-detection blocks resolve to none.
    pub async fn resolve(&self, block: &Block, text: Option<&str>) -> Option<BlockId> {
        let BlockKind::DetectResponseIntent {
            intent_options,
            fallback,
            ..
        } = &block.kind
        else {
            return None;
        };

        if intent_options.is_empty() {
            self.resolve_routes(block, text).await
        } else {
            self.resolve_options(intent_options, fallback.as_ref(), text)
                .await
        }
    }

    async fn resolve_options(
        &self,
        options: &[IntentOption],
        fallback: Option<&BlockId>,
        text: Option<&str>,
    ) -> Option<BlockId> {
        let names: Vec<String> = options.iter().filter_map(|o| o.name.clone()).collect();

        if let Some(intent) = self.detect(text, &names).await {
            let intent = intent.to_lowercase();
            let named = options.iter().find(|o| {
                o.name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase() == intent)
            });
            if let Some(option) = named {
                return option.next.clone();
            }
        }

        let lowered = text.unwrap_or_default().to_lowercase();
        let keyword_hit = options.iter().find(|option| {
            option
                .keywords
                .iter()
                .filter(|kw| !kw.trim().is_empty())
                .any(|kw| lowered.contains(&kw.to_lowercase()))
        });
        if let Some(option) = keyword_hit {
            debug!(intent = ?option.name, "intent option matched by keyword");
            return option.next.clone();
        }

        fallback.filter(|f| !f.as_str().trim().is_empty()).cloned()
    }

    async fn resolve_routes(&self, block: &Block, text: Option<&str>) -> Option<BlockId> {
        let routes = block.routes();
        let labels: Vec<String> = routes
            .iter()
            .filter_map(Route::intent_labels)
            .flatten()
            .cloned()
            .collect();

        let intent = self.detect(text, &labels).await;

        let Some(intent) = intent else {
            info!(block_id = %block.id, "no intent detected, falling back to keywords");
            if let Some(next) = self.keywords.resolve_next(block, text) {
                return Some(next);
            }
            // TODO: remove this repeated pass; KeywordMatcher is pure, so it
            // always returns none here.
            return self.keywords.resolve_next(block, text);
        };

        if let Some(route) = claiming_route(routes, &intent) {
            return route.next.clone();
        }

        info!(block_id = %block.id, %intent, "no route claims detected intent, falling back to keywords");
        self.keywords.resolve_next(block, text)
    }

    /// Asks the classifier, treating an empty candidate set and a blank
    /// answer as no intent.
    async fn detect(&self, text: Option<&str>, candidates: &[String]) -> Option<String> {
        if candidates.is_empty() {
            return None;
        }
        let intent = self.classifier.detect(text, candidates).await;
        match intent {
            Some(intent) if !intent.trim().is_empty() => {
                debug!(%intent, "classifier detected intent");
                Some(intent)
            }
            _ => {
                debug!("classifier returned no intent");
                None
            }
        }
    }
}

/// Returns the first intent route whose labels contain the intent exactly.
fn claiming_route<'a>(routes: &'a [Route], intent: &str) -> Option<&'a Route> {
    routes.iter().find(|r| {
        r.intent_labels()
            .is_some_and(|labels| labels.iter().any(|l| l == intent))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Classifier returning a fixed answer and recording its candidates.
    struct ScriptedClassifier {
        answer: Option<String>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedClassifier {
        fn answering(answer: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                answer: answer.map(str::to_string),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl IntentClassifier for ScriptedClassifier {
        async fn detect(&self, _text: Option<&str>, candidates: &[String]) -> Option<String> {
            self.calls.lock().expect("lock").push(candidates.to_vec());
            self.answer.clone()
        }
    }

    fn options_block(fallback: Option<&str>) -> Block {
        Block::detect_response_intent(
            "detect",
            vec![Route::intent(["price"], "fromRoutes")],
            vec![
                IntentOption::new("price", ["price", "cost"], "priceBlock"),
                IntentOption::new("hours", ["open", " "], "hoursBlock"),
            ],
            fallback.map(BlockId::from),
        )
    }

    fn routes_block() -> Block {
        Block::detect_response_intent(
            "detect",
            vec![
                Route::keyword(["bill"], "keywordBlock"),
                Route::intent(["billing", "invoice"], "billingBlock"),
                Route::intent(["support"], "supportBlock"),
                Route::fallback("fallbackBlock"),
            ],
            Vec::new(),
            None,
        )
    }

    async fn resolve(
        classifier: Arc<ScriptedClassifier>,
        block: &Block,
        text: &str,
    ) -> Option<String> {
        IntentResolver::new(classifier)
            .resolve(block, Some(text))
            .await
            .map(BlockId::into_inner)
    }

    #[tokio::test]
    async fn options_take_precedence_over_routes() {
        let classifier = ScriptedClassifier::answering(Some("PRICE"));
        let next = resolve(classifier.clone(), &options_block(None), "How much?").await;

        assert_eq!(next.as_deref(), Some("priceBlock"));
        assert_eq!(
            classifier.calls(),
            vec![vec!["price".to_string(), "hours".to_string()]]
        );
    }

    #[tokio::test]
    async fn options_fall_back_to_keywords() {
        let classifier = ScriptedClassifier::answering(None);
        let next = resolve(classifier, &options_block(None), "When are you OPEN?").await;
        assert_eq!(next.as_deref(), Some("hoursBlock"));
    }

    #[tokio::test]
    async fn unknown_option_name_falls_back_to_keywords() {
        let classifier = ScriptedClassifier::answering(Some("refund"));
        let next = resolve(classifier, &options_block(None), "what does it cost").await;
        assert_eq!(next.as_deref(), Some("priceBlock"));
    }

    #[tokio::test]
    async fn blank_option_keywords_never_match() {
        let classifier = ScriptedClassifier::answering(None);
        let next = resolve(classifier, &options_block(None), "hello there").await;
        assert_eq!(next, None);
    }

    #[tokio::test]
    async fn options_use_block_fallback() {
        let classifier = ScriptedClassifier::answering(None);
        let next = resolve(classifier, &options_block(Some("fallbackBlock")), "hello").await;
        assert_eq!(next.as_deref(), Some("fallbackBlock"));
    }

    #[tokio::test]
    async fn blank_fallback_is_ignored() {
        let classifier = ScriptedClassifier::answering(None);
        let next = resolve(classifier, &options_block(Some("  ")), "hello").await;
        assert_eq!(next, None);
    }

    #[tokio::test]
    async fn routes_claim_detected_intent() {
        let classifier = ScriptedClassifier::answering(Some("invoice"));
        let next = resolve(classifier.clone(), &routes_block(), "bill me").await;

        assert_eq!(next.as_deref(), Some("billingBlock"));
        assert_eq!(
            classifier.calls(),
            vec![vec![
                "billing".to_string(),
                "invoice".to_string(),
                "support".to_string()
            ]]
        );
    }

    #[tokio::test]
    async fn route_labels_match_case_sensitively() {
        let classifier = ScriptedClassifier::answering(Some("Support"));
        let next = resolve(classifier, &routes_block(), "help").await;
        assert_eq!(next.as_deref(), Some("fallbackBlock"));
    }

    #[tokio::test]
    async fn unclaimed_intent_falls_back_to_keywords() {
        let classifier = ScriptedClassifier::answering(Some("refund"));
        let next = resolve(classifier, &routes_block(), "my bill").await;
        assert_eq!(next.as_deref(), Some("keywordBlock"));
    }

    #[tokio::test]
    async fn no_intent_uses_keyword_then_fallback_routes() {
        let classifier = ScriptedClassifier::answering(None);
        let block = routes_block();

        assert_eq!(
            resolve(classifier.clone(), &block, "my bill").await.as_deref(),
            Some("keywordBlock")
        );
        assert_eq!(
            resolve(classifier, &block, "hello").await.as_deref(),
            Some("fallbackBlock")
        );
    }

    #[tokio::test]
    async fn blank_intent_counts_as_none() {
        let classifier = ScriptedClassifier::answering(Some("   "));
        let next = resolve(classifier, &routes_block(), "my bill").await;
        assert_eq!(next.as_deref(), Some("keywordBlock"));
    }

    #[tokio::test]
    async fn routes_without_intent_labels_skip_classifier() {
        let classifier = ScriptedClassifier::answering(Some("billing"));
        let block = Block::detect_response_intent(
            "detect",
            vec![Route::keyword(["price"], "price")],
            Vec::new(),
            None,
        );

        let next = resolve(classifier.clone(), &block, "price?").await;

        assert_eq!(next.as_deref(), Some("price"));
        assert!(classifier.calls().is_empty());
    }

    #[tokio::test]
    async fn other_blocks_resolve_to_none() {
        let classifier = ScriptedClassifier::answering(Some("price"));
        let block = Block::wait_for_response("wait", vec![Route::fallback("x")]);

        assert_eq!(resolve(classifier.clone(), &block, "price").await, None);
        assert!(classifier.calls().is_empty());
    }

    #[tokio::test]
    async fn nameless_options_are_not_offered_but_keep_keywords() {
        let classifier = ScriptedClassifier::answering(None);
        let nameless = IntentOption {
            name: None,
            keywords: vec!["open".to_string()],
            next: Some(BlockId::from("hoursBlock")),
        };
        let block = Block::detect_response_intent(
            "detect",
            Vec::new(),
            vec![nameless, IntentOption::new("price", ["price"], "priceBlock")],
            None,
        );

        let next = resolve(classifier.clone(), &block, "are you open").await;

        assert_eq!(next.as_deref(), Some("hoursBlock"));
        assert_eq!(classifier.calls(), vec![vec!["price".to_string()]]);
    }

    #[tokio::test]
    async fn targetless_option_resolves_to_none() {
        let classifier = ScriptedClassifier::answering(Some("price"));
        let targetless = IntentOption {
            name: Some("price".to_string()),
            keywords: Vec::new(),
            next: None,
        };
        let block = Block::detect_response_intent(
            "detect",
            Vec::new(),
            vec![targetless],
            Some(BlockId::from("fallbackBlock")),
        );

        assert_eq!(resolve(classifier, &block, "how much").await, None);
    }
}
