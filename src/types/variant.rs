//! Variant, evidence, and history types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned identifier of a stored variant.
pub type VariantId = i64;

/// An HGVS descriptor exactly as the user typed it.
///
/// No local validation happens here; only the remote service decides whether
/// a descriptor is well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantDescriptor(String);

impl VariantDescriptor {
    pub fn new(hgvs: impl Into<String>) -> Self {
        Self(hgvs.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for VariantDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VariantDescriptor {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for VariantDescriptor {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// ACMG/AMP evidence strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strength {
    VeryStrong,
    Strong,
    Moderate,
    Supporting,
    StandAloneBenign,
    StrongBenign,
    SupportingBenign,
}

impl Strength {
    pub const ALL: [Strength; 7] = [
        Strength::VeryStrong,
        Strength::Strong,
        Strength::Moderate,
        Strength::Supporting,
        Strength::StandAloneBenign,
        Strength::StrongBenign,
        Strength::SupportingBenign,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Strength::VeryStrong => "VeryStrong",
            Strength::Strong => "Strong",
            Strength::Moderate => "Moderate",
            Strength::Supporting => "Supporting",
            Strength::StandAloneBenign => "StandAloneBenign",
            Strength::StrongBenign => "StrongBenign",
            Strength::SupportingBenign => "SupportingBenign",
        }
    }

    pub fn is_benign(self) -> bool {
        matches!(
            self,
            Strength::StandAloneBenign | Strength::StrongBenign | Strength::SupportingBenign
        )
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One evidence rule that contributed to a classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedRule {
    pub code: String,
    pub strength: Strength,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Stable list identity for a rule: its position paired with its code.
///
/// The same rule code may legitimately appear twice in one list, so the code
/// alone is not unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleKey {
    pub index: usize,
    pub code: String,
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.index, self.code)
    }
}

fn keyed(rules: &[AppliedRule]) -> impl Iterator<Item = (RuleKey, &AppliedRule)> {
    rules.iter().enumerate().map(|(index, rule)| {
        (
            RuleKey {
                index,
                code: rule.code.clone(),
            },
            rule,
        )
    })
}

/// Response of `POST /variants/classify`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub classification: String,
    #[serde(default)]
    pub applied_rules: Vec<AppliedRule>,
    #[serde(default)]
    pub rationale: String,
    /// Present when the server persisted the classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<VariantId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hgvs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genome_build: Option<String>,
}

impl ClassificationResult {
    pub fn keyed_rules(&self) -> impl Iterator<Item = (RuleKey, &AppliedRule)> {
        keyed(&self.applied_rules)
    }
}

/// A variant record as persisted by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredVariant {
    pub id: VariantId,
    pub hgvs: String,
    pub genome_build: String,
    pub classification: String,
    #[serde(default)]
    pub applied_rules: Option<Vec<AppliedRule>>,
    #[serde(default)]
    pub rationale: Option<String>,
}

impl StoredVariant {
    pub fn keyed_rules(&self) -> impl Iterator<Item = (RuleKey, &AppliedRule)> {
        keyed(self.applied_rules.as_deref().unwrap_or(&[]))
    }
}

/// One entry in a variant's append-only classification log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationEvent {
    pub id: i64,
    pub classification: String,
    #[serde(default)]
    pub evidence: Vec<AppliedRule>,
    /// Server timestamp, kept verbatim.
    pub created_at: String,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Filtered read of `GET /variants`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantQuery {
    pub hgvs: Option<String>,
    pub limit: Option<u32>,
}

impl VariantQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hgvs(mut self, hgvs: impl Into<String>) -> Self {
        self.hgvs = Some(hgvs.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(h) = &self.hgvs {
            pairs.push(("hgvs", h.clone()));
        }
        if let Some(l) = self.limit {
            pairs.push(("limit", l.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strength_parses_every_wire_value() {
        for s in Strength::ALL {
            let parsed: Strength = serde_json::from_value(json!(s.as_str())).unwrap();
            assert_eq!(parsed, s);
        }
        assert!(serde_json::from_value::<Strength>(json!("Weak")).is_err());
    }

    #[test]
    fn benign_strengths() {
        assert!(Strength::StrongBenign.is_benign());
        assert!(!Strength::VeryStrong.is_benign());
    }

    #[test]
    fn rule_keys_are_positional_and_deterministic() {
        let result: ClassificationResult = serde_json::from_value(json!({
            "classification": "Pathogenic",
            "applied_rules": [
                {"code": "PM2", "strength": "Moderate"},
                {"code": "PM2", "strength": "Supporting", "description": "downgraded"}
            ],
            "rationale": "r"
        }))
        .unwrap();
        let keys: Vec<String> = result.keyed_rules().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["0:PM2", "1:PM2"]);
        let again: Vec<String> = result.keyed_rules().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, again);
    }

    #[test]
    fn stored_variant_tolerates_missing_optionals() {
        let v: StoredVariant = serde_json::from_value(json!({
            "id": 3, "hgvs": "NM_000000.0:c.1A>G", "genome_build": "GRCh38",
            "classification": "Benign"
        }))
        .unwrap();
        assert!(v.applied_rules.is_none());
        assert_eq!(v.keyed_rules().count(), 0);
    }

    #[test]
    fn query_pairs_skip_unset_fields() {
        assert!(VariantQuery::new().to_pairs().is_empty());
        let pairs = VariantQuery::new().hgvs("c.1A>G").limit(5).to_pairs();
        assert_eq!(pairs, vec![("hgvs", "c.1A>G".to_string()), ("limit", "5".to_string())]);
    }
}
