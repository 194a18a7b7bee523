//! Classifier implementations

use async_trait::async_trait;
use std::sync::Arc;

use distill_core::{Classifier, LlmProvider, Result};

/// Keyword-rule classifier. Each label carries a list of trigger keywords;
/// a label applies when any of its keywords occurs in the text
/// (case-insensitive).
pub struct RuleClassifier {
    name: String,
    classes: Vec<String>,
    rules: Vec<(String, Vec<String>)>,
}

impl RuleClassifier {
    pub fn new<S: Into<String>>(name: S, rules: Vec<(&str, Vec<&str>)>) -> Self {
        let rules: Vec<(String, Vec<String>)> = rules
            .into_iter()
            .map(|(label, keywords)| {
                (
                    label.to_string(),
                    keywords.into_iter().map(|k| k.to_lowercase()).collect(),
                )
            })
            .collect();
        let classes = rules.iter().map(|(label, _)| label.clone()).collect();

        Self {
            name: name.into(),
            classes,
            rules,
        }
    }

    /// A starter rule set for product-interview transcripts.
    pub fn interview_defaults() -> Self {
        Self::new(
            "interview-topics",
            vec![
                ("pricing", vec!["price", "pricing", "cost", "expensive", "budget"]),
                ("usability", vec!["confusing", "intuitive", "easy to use", "hard to use", "ux"]),
                ("feature-request", vec!["wish", "would be nice", "missing", "feature request"]),
                ("reliability", vec!["crash", "bug", "broken", "fails", "down", "slow"]),
                ("praise", vec!["love", "great", "fantastic", "favorite", "works well"]),
            ],
        )
    }
}

#[async_trait]
impl Classifier for RuleClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    async fn classify(&self, text: &str) -> Result<Vec<String>> {
        let haystack = text.to_lowercase();
        let labels = self
            .rules
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|k| haystack.contains(k)))
            .map(|(label, _)| label.clone())
            .collect();
        Ok(labels)
    }
}

const CLASSIFY_TEMPLATE: &str = "\
Decide which of the following labels apply to the text below. Reply with a \
bulleted list of the applicable labels, one per line, and nothing else. If \
none apply, reply with an empty list.

Labels: {labels}

Text:
{text}

Applicable labels:
-";

/// Model-based classifier: asks the LLM to pick labels from the declared
/// set. Anything the model returns outside that set is discarded, so the
/// declared-label invariant holds regardless of what the model says.
pub struct LlmClassifier {
    name: String,
    classes: Vec<String>,
    provider: Arc<dyn LlmProvider>,
}

impl LlmClassifier {
    pub fn new<S: Into<String>>(
        name: S,
        classes: Vec<String>,
        provider: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            name: name.into(),
            classes,
            provider,
        }
    }

    fn build_prompt(&self, text: &str) -> String {
        CLASSIFY_TEMPLATE
            .replace("{labels}", &self.classes.join(", "))
            .replace("{text}", text.trim())
    }

    fn parse(&self, raw: &str) -> Vec<String> {
        raw.lines()
            .flat_map(|line| line.split(','))
            .map(|piece| piece.trim().trim_start_matches('-').trim().to_lowercase())
            .filter(|label| self.classes.iter().any(|c| c == label))
            .collect()
    }
}

#[async_trait]
impl Classifier for LlmClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    async fn classify(&self, text: &str) -> Result<Vec<String>> {
        let response = self.provider.generate(&self.build_prompt(text)).await?;
        Ok(self.parse(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::StaticProvider;

    #[tokio::test]
    async fn test_rule_classifier_matches_keywords() {
        let classifier = RuleClassifier::interview_defaults();
        let labels = classifier
            .classify("The export feature crashes constantly and it is too expensive.")
            .await
            .unwrap();

        assert!(labels.contains(&"reliability".to_string()));
        assert!(labels.contains(&"pricing".to_string()));
        assert!(!labels.contains(&"praise".to_string()));
    }

    #[tokio::test]
    async fn test_rule_classifier_no_match() {
        let classifier = RuleClassifier::interview_defaults();
        let labels = classifier.classify("We met on a Tuesday.").await.unwrap();
        assert!(labels.is_empty());
    }

    #[tokio::test]
    async fn test_rule_classifier_stays_in_declared_set() {
        let classifier = RuleClassifier::interview_defaults();
        let declared = classifier.classes().to_vec();

        for text in [
            "crash bug pricing love wish confusing",
            "",
            "unrelated text entirely",
        ] {
            for label in classifier.classify(text).await.unwrap() {
                assert!(declared.contains(&label), "undeclared label: {label}");
            }
        }
    }

    #[tokio::test]
    async fn test_llm_classifier_filters_to_declared_set() {
        let provider = Arc::new(StaticProvider::new("- pricing\n- invented-label\n- praise"));
        let classifier = LlmClassifier::new(
            "llm-topics",
            vec!["pricing".to_string(), "praise".to_string()],
            provider,
        );

        let labels = classifier.classify("anything").await.unwrap();
        assert_eq!(labels, vec!["pricing", "praise"]);
    }

    #[tokio::test]
    async fn test_llm_classifier_parses_comma_lists() {
        let provider = Arc::new(StaticProvider::new("pricing, praise"));
        let classifier = LlmClassifier::new(
            "llm-topics",
            vec!["pricing".to_string(), "praise".to_string()],
            provider,
        );

        let labels = classifier.classify("anything").await.unwrap();
        assert_eq!(labels, vec!["pricing", "praise"]);
    }
}
