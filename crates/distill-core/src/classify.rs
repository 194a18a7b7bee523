//! Classifier trait and registry

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::{Error, Result};

/// Trait for classifiers
///
/// A classifier maps a piece of text (a chunk or a fact) to zero or more
/// labels drawn from its declared label set. Implementations may be
/// rule-based or model-based.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Name of this classifier
    fn name(&self) -> &str;

    /// The full set of labels this classifier may emit
    fn classes(&self) -> &[String];

    /// Classify the given text into zero or more labels
    async fn classify(&self, text: &str) -> Result<Vec<String>>;
}

/// Explicit registry of classifiers, constructed at startup and passed by
/// reference to the pipeline and CLI layers.
#[derive(Default)]
pub struct ClassifierRegistry {
    classifiers: Vec<Arc<dyn Classifier>>,
}

impl ClassifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a classifier. Registration order is preserved.
    pub fn register(&mut self, classifier: Arc<dyn Classifier>) -> &mut Self {
        self.classifiers.push(classifier);
        self
    }

    pub fn classifiers(&self) -> &[Arc<dyn Classifier>] {
        &self.classifiers
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }

    /// Union of all labels declared across registered classifiers. Used to
    /// validate label filters supplied on the command line.
    pub fn all_classes(&self) -> BTreeSet<String> {
        self.classifiers
            .iter()
            .flat_map(|c| c.classes().iter().cloned())
            .collect()
    }

    /// Validate that every requested label is declared by some classifier.
    pub fn validate_classes(&self, requested: &[String]) -> Result<()> {
        let known = self.all_classes();
        for label in requested {
            if !known.contains(label) {
                return Err(Error::InvalidInput(format!(
                    "unknown class '{label}' (known: {})",
                    known.into_iter().collect::<Vec<_>>().join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Run every registered classifier over `text` and merge the results by
    /// union. Labels outside a classifier's declared set are discarded, so
    /// a misbehaving implementation cannot widen the label space.
    pub async fn classify_all(&self, text: &str) -> Result<Vec<String>> {
        let mut merged = BTreeSet::new();
        for classifier in &self.classifiers {
            let declared: BTreeSet<&String> = classifier.classes().iter().collect();
            for label in classifier.classify(text).await? {
                if declared.contains(&label) {
                    merged.insert(label);
                }
            }
        }
        Ok(merged.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClassifier {
        name: String,
        classes: Vec<String>,
        emits: Vec<String>,
    }

    #[async_trait]
    impl Classifier for FixedClassifier {
        fn name(&self) -> &str {
            &self.name
        }

        fn classes(&self) -> &[String] {
            &self.classes
        }

        async fn classify(&self, _text: &str) -> Result<Vec<String>> {
            Ok(self.emits.clone())
        }
    }

    fn classifier(name: &str, classes: &[&str], emits: &[&str]) -> Arc<dyn Classifier> {
        Arc::new(FixedClassifier {
            name: name.to_string(),
            classes: classes.iter().map(|s| s.to_string()).collect(),
            emits: emits.iter().map(|s| s.to_string()).collect(),
        })
    }

    #[tokio::test]
    async fn test_union_of_results() {
        let mut registry = ClassifierRegistry::new();
        registry.register(classifier("a", &["x", "y"], &["x"]));
        registry.register(classifier("b", &["y", "z"], &["y", "z"]));

        let labels = registry.classify_all("anything").await.unwrap();
        assert_eq!(labels, vec!["x", "y", "z"]);
    }

    #[tokio::test]
    async fn test_undeclared_labels_discarded() {
        let mut registry = ClassifierRegistry::new();
        registry.register(classifier("rogue", &["x"], &["x", "not-declared"]));

        let labels = registry.classify_all("anything").await.unwrap();
        assert_eq!(labels, vec!["x"]);
    }

    #[test]
    fn test_all_classes_union() {
        let mut registry = ClassifierRegistry::new();
        registry.register(classifier("a", &["x", "y"], &[]));
        registry.register(classifier("b", &["y", "z"], &[]));

        let all: Vec<_> = registry.all_classes().into_iter().collect();
        assert_eq!(all, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_validate_classes() {
        let mut registry = ClassifierRegistry::new();
        registry.register(classifier("a", &["x"], &[]));

        assert!(registry.validate_classes(&["x".to_string()]).is_ok());
        assert!(registry.validate_classes(&["bogus".to_string()]).is_err());
    }
}
