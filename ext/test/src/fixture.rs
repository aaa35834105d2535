//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against vouch matchers built from
//! [`MatcherConfig`].
//!
//! ```yaml
//! name: greater_than
//! description: strict lower bound
//! matcher: { type: greater_than, value: 1 }
//! expect_description: "a value greater than <1>"
//! cases:
//!   - name: above
//!     value: 2
//!     matches: true
//!   - name: below
//!     value: 0
//!     matches: false
//!     mismatch: "<0> was less than <1>"
//! ```
//!
//! A fixture with `expect_error: true` asserts that the config is rejected
//! when built.

use serde::Deserialize;
use vouch::prelude::*;
use vouch::{to_value, MatcherConfig};

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Raw config, parsed at run time so malformed configs can be fixtures too.
    pub matcher: serde_json::Value,
    #[serde(default)]
    pub expect_description: Option<String>,
    #[serde(default)]
    pub expect_error: bool,
    #[serde(default)]
    pub cases: Vec<TestCase>,
}

/// Test case
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
    pub matches: bool,
    #[serde(default)]
    pub mismatch: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub failure: Option<String>,
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Parse and build the matcher.
    pub fn build(&self) -> Result<BoxedMatcher, MatcherError> {
        let config: MatcherConfig =
            serde_json::from_value(self.matcher.clone()).map_err(|e| MatcherError::InvalidConfig {
                reason: e.to_string(),
            })?;
        config.build()
    }

    /// Run all test cases and return results
    ///
    /// # Panics
    ///
    /// Panics if the config doesn't build, or if the expected description
    /// differs; case-level problems are reported in the results.
    pub fn run(&self) -> Vec<CaseResult> {
        let matcher = self
            .build()
            .unwrap_or_else(|e| panic!("Fixture '{}' failed to build: {e}", self.name));

        if let Some(expected) = &self.expect_description {
            let actual = Description::of(&matcher);
            assert_eq!(
                &actual, expected,
                "Fixture '{}' description mismatch",
                self.name
            );
        }

        self.cases.iter().map(|case| case.run(&matcher)).collect()
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        if self.expect_error {
            assert!(
                self.build().is_err(),
                "Fixture '{}' expected a build error, but the config was accepted",
                self.name
            );
            return;
        }
        for result in self.run() {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: {}",
                self.name,
                result.case_name,
                result.failure.unwrap_or_default()
            );
        }
    }
}

impl TestCase {
    fn run(&self, matcher: &BoxedMatcher) -> CaseResult {
        let failure = match to_value(&self.value) {
            Ok(item) => self.check(matcher, &item),
            Err(e) => Some(format!("case value is not representable: {e}")),
        };
        CaseResult {
            case_name: self.name.clone(),
            passed: failure.is_none(),
            failure,
        }
    }

    fn check(&self, matcher: &BoxedMatcher, item: &Value) -> Option<String> {
        let matched = matcher.matches(item);
        if matched != self.matches {
            return Some(format!("expected matches = {}, got {matched}", self.matches));
        }

        let mut explained = Description::new();
        if matcher.explain(item, &mut explained) != matched {
            return Some("explain disagrees with matches".into());
        }

        let mut mismatch = Description::new();
        matcher.describe_mismatch(item, &mut mismatch);
        if mismatch.is_empty() {
            return Some("describe_mismatch wrote nothing".into());
        }
        match &self.mismatch {
            Some(expected) if expected != mismatch.as_str() => Some(format!(
                "expected mismatch {expected:?}, got {:?}",
                mismatch.as_str()
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
name: in_range
matcher:
  type: all_of
  matchers:
    - { type: greater_than, value: 0 }
    - { type: less_than, value: 5 }
expect_description: "(a value greater than <0> and a value less than <5>)"
cases:
  - name: inside
    value: 2
    matches: true
  - name: above
    value: 7
    matches: false
    mismatch: "<7> was greater than <5>"
"#;

    #[test]
    fn test_parse_and_run() {
        let fixture = Fixture::from_yaml(FIXTURE).unwrap();
        assert_eq!(fixture.cases.len(), 2);
        fixture.run_and_assert();
    }

    #[test]
    fn test_wrong_expectation_is_reported() {
        let mut fixture = Fixture::from_yaml(FIXTURE).unwrap();
        fixture.cases[1].mismatch = Some("something else".into());
        let results = fixture.run();
        assert!(results[0].passed);
        assert!(!results[1].passed);
        assert!(results[1]
            .failure
            .as_deref()
            .is_some_and(|f| f.contains("<7> was greater than <5>")));
    }

    #[test]
    fn test_multi_document() {
        let yaml = format!("{FIXTURE}\n---\n{FIXTURE}");
        assert_eq!(Fixture::from_yaml_multi(&yaml).unwrap().len(), 2);
    }

    #[test]
    fn test_expect_error() {
        let fixture = Fixture::from_yaml(
            r#"
name: bad regex
matcher: { type: matches_regex, pattern: "(" }
expect_error: true
"#,
        )
        .unwrap();
        fixture.run_and_assert();
    }
}
