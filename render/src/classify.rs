use serde::Deserialize;

/// Kinds of non-markdown text a classifier can claim. Rendered preformatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    Financial,
}

impl DataKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            DataKind::Financial => "financial-data",
        }
    }
}

/// Decides whether a plain-text span is something other than markdown.
/// Returning `None` leaves the span to the next classifier.
pub trait ContentClassifier: Send + Sync {
    fn classify(&self, span: &str) -> Option<DataKind>;
}

/// Claims any span containing a fixed substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerClassifier {
    marker: String,
    kind: DataKind,
}

impl MarkerClassifier {
    pub const FINANCIAL_MARKER: &'static str = "current price";

    pub fn new(marker: impl Into<String>, kind: DataKind) -> Self {
        Self { marker: marker.into(), kind }
    }

    pub fn financial() -> Self {
        Self::new(Self::FINANCIAL_MARKER, DataKind::Financial)
    }
}

impl ContentClassifier for MarkerClassifier {
    fn classify(&self, span: &str) -> Option<DataKind> {
        (!self.marker.is_empty() && span.contains(&self.marker)).then_some(self.kind)
    }
}

/// Declarative form of a [`MarkerClassifier`], as found in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MarkerRule {
    pub marker: String,
    pub kind: DataKind,
}

impl From<&MarkerRule> for MarkerClassifier {
    fn from(rule: &MarkerRule) -> Self {
        MarkerClassifier::new(rule.marker.clone(), rule.kind)
    }
}
