//! Classification and value generation behind one seeded engine.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use casegen_classify::{Classifier, ExpectedResult};
use casegen_explore::generator::rng::field_rng;
use casegen_explore::{GenerationError, GeneratorBuilder};
use casegen_ir::{Bound, Configuration, Group, OtherwiseRef, TestCase, Value, ValueDomain};

use crate::config::EngineConfig;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{test_case} is incompatible with the field configuration")]
    IncompatibleTestCase { test_case: TestCase },

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// One classified test case, ready to hand to an orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CasePlan {
    pub test_case: TestCase,
    pub result: ExpectedResult,
    /// Forwarded untouched; only present on Invalid results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otherwise: Option<OtherwiseRef>,
}

/// A field to generate in [`Engine::generate_fields`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRequest {
    pub field_id: String,
    pub configuration: Configuration,
    /// Cases to generate; `None` means every applicable case.
    #[serde(default)]
    pub test_cases: Option<Vec<TestCase>>,
}

#[derive(Debug)]
pub struct GeneratedCase {
    pub test_case: TestCase,
    pub result: ExpectedResult,
    pub value: Result<Option<Value>, EngineError>,
}

#[derive(Debug)]
pub struct FieldResult {
    pub field_id: String,
    pub cases: Vec<GeneratedCase>,
}

/// The test-data engine.
pub struct Engine {
    config: EngineConfig,
    classifier: Classifier,
    builder: GeneratorBuilder,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let builder = GeneratorBuilder::new(
            &config.seed,
            config.limits.clone(),
            config.random_tries_to_invalid_value,
            config.max_repetition,
        );
        Self {
            classifier: Classifier::new(config.limits.clone()),
            builder,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn classify(&self, test_case: TestCase, cfg: &Configuration) -> ExpectedResult {
        self.classifier.classify(test_case, cfg)
    }

    pub fn classify_all(&self, cfg: &Configuration) -> BTreeMap<TestCase, ExpectedResult> {
        self.classifier.classify_all(cfg)
    }

    /// Every test case in taxonomy order, with its expectation.
    pub fn plan(&self, cfg: &Configuration) -> Vec<CasePlan> {
        plan(&self.classifier, cfg)
    }

    /// Generate the value for one test case, drawing from the engine's source.
    ///
    /// `Ok(None)` is the deliberate absence of a value (`REQUIRED_NOT_FILLED`).
    ///
    /// Format cases render text from the pattern and parse it into the
    /// field's domain. Text that never parses, such as `FORMAT_INVALID` output
    /// or digits too long for an integer, comes back as `Value::String`.
    pub fn generate(
        &mut self,
        test_case: TestCase,
        cfg: &Configuration,
    ) -> Result<Option<Value>, EngineError> {
        generate(&self.classifier, &mut self.builder, test_case, cfg)
    }

    /// Generate several fields in parallel.
    ///
    /// Each field draws from its own source seeded by `(seed, field_id)`, so
    /// the output does not depend on scheduling or on the order of `fields`.
    pub fn generate_fields(&self, fields: &[FieldRequest]) -> Vec<FieldResult> {
        fields
            .par_iter()
            .map(|request| self.generate_field(request))
            .collect()
    }

    fn generate_field(&self, request: &FieldRequest) -> FieldResult {
        let mut builder = GeneratorBuilder::from_rng(
            field_rng(&self.config.seed, &request.field_id),
            self.config.limits.clone(),
            self.config.random_tries_to_invalid_value,
            self.config.max_repetition,
        );
        let cfg = &request.configuration;
        let test_cases: Vec<TestCase> = match &request.test_cases {
            Some(cases) => cases.clone(),
            None => plan(&self.classifier, cfg)
                .into_iter()
                .filter(|p| p.result.is_applicable())
                .map(|p| p.test_case)
                .collect(),
        };
        let cases = test_cases
            .into_iter()
            .map(|test_case| GeneratedCase {
                test_case,
                result: self.classifier.classify(test_case, cfg),
                value: generate(&self.classifier, &mut builder, test_case, cfg),
            })
            .collect();
        FieldResult {
            field_id: request.field_id.clone(),
            cases,
        }
    }
}

fn plan(classifier: &Classifier, cfg: &Configuration) -> Vec<CasePlan> {
    TestCase::ALL
        .iter()
        .map(|&test_case| {
            let result = classifier.classify(test_case, cfg);
            let otherwise = (result == ExpectedResult::Invalid)
                .then(|| classifier.otherwise_for(test_case, cfg).cloned())
                .flatten();
            CasePlan {
                test_case,
                result,
                otherwise,
            }
        })
        .collect()
}

fn generate(
    classifier: &Classifier,
    builder: &mut GeneratorBuilder,
    test_case: TestCase,
    cfg: &Configuration,
) -> Result<Option<Value>, EngineError> {
    if classifier.classify(test_case, cfg) == ExpectedResult::Incompatible {
        tracing::debug!(%test_case, domain = %cfg.domain, "rejected incompatible test case");
        return Err(EngineError::IncompatibleTestCase { test_case });
    }
    let value = match (test_case.group(), test_case.boundary()) {
        (Group::Value, Some(boundary)) => {
            let (min, max) = value_literals(cfg)?;
            builder
                .raw_generator(cfg.domain, min, max)?
                .at(boundary)?
        }
        (Group::Length, Some(boundary)) => {
            let (min, max) = length_literals(cfg)?;
            builder.length_generator(min, max).at(boundary)?
        }
        (Group::Format, _) => {
            let pattern = cfg
                .format_pattern()
                .ok_or(EngineError::IncompatibleTestCase { test_case })?;
            let mut generator = builder.regex_generator(cfg.domain, pattern)?;
            if test_case == TestCase::FormatValid {
                generator.valid_value()?
            } else {
                generator.invalid_value()?
            }
        }
        (Group::Set, _) => {
            let elements = set_elements(cfg)?;
            let mut generator =
                builder.list_generator(cfg.domain, &elements, cfg.is_value_negated())?;
            match test_case {
                TestCase::SetFirstElement => generator.first_element()?,
                TestCase::SetLastElement => generator.last_element()?,
                TestCase::SetNotInSet => generator.not_in_set()?,
                _ => generator.random_element()?,
            }
        }
        (Group::Required, _) if test_case == TestCase::RequiredNotFilled => return Ok(None),
        (Group::Required, _) => filled_value(builder, cfg)?,
        (Group::Value | Group::Length | Group::Computation, _) => {
            return Err(EngineError::IncompatibleTestCase { test_case })
        }
    };
    tracing::trace!(%test_case, %value, "generated value");
    Ok(Some(value))
}

/// Any value satisfying the field's constraints, for `REQUIRED_FILLED`.
fn filled_value(builder: &mut GeneratorBuilder, cfg: &Configuration) -> Result<Value, EngineError> {
    if cfg.has_value_constraint() {
        let elements = set_elements(cfg)?;
        let mut generator =
            builder.list_generator(cfg.domain, &elements, cfg.is_value_negated())?;
        return Ok(generator.valid_value()?);
    }
    if let Some(pattern) = cfg.format_pattern() {
        return Ok(builder.regex_generator(cfg.domain, pattern)?.valid_value()?);
    }
    if cfg.domain == ValueDomain::String {
        let (min, max) = length_literals(cfg)?;
        // A filled string has at least one character.
        let min = Some(min.unwrap_or(0).max(1));
        return Ok(builder.length_generator(min, max).random_in_range()?);
    }
    let (min, max) = value_literals(cfg)?;
    Ok(builder.raw_generator(cfg.domain, min, max)?.random_in_range()?)
}

fn literal<T>(bound: Option<&Bound<T>>) -> Result<Option<&T>, GenerationError> {
    match bound {
        None => Ok(None),
        Some(Bound::Literal(v)) => Ok(Some(v)),
        Some(Bound::Reference(r)) => Err(GenerationError::UnresolvedReference(r.clone())),
    }
}

fn value_literals(cfg: &Configuration) -> Result<(Option<&Value>, Option<&Value>), GenerationError> {
    Ok((
        literal(cfg.min_value.as_ref().map(|c| &c.value))?,
        literal(cfg.max_value.as_ref().map(|c| &c.value))?,
    ))
}

fn length_literals(cfg: &Configuration) -> Result<(Option<usize>, Option<usize>), GenerationError> {
    Ok((
        literal(cfg.min_length.as_ref().map(|c| &c.value))?.copied(),
        literal(cfg.max_length.as_ref().map(|c| &c.value))?.copied(),
    ))
}

fn set_elements(cfg: &Configuration) -> Result<Vec<Value>, GenerationError> {
    let source = cfg.value.as_ref().map(|c| &c.value).ok_or(GenerationError::EmptySet)?;
    source.elements().ok_or_else(|| match source {
        casegen_ir::ValueSource::Reference { reference, .. } => {
            GenerationError::UnresolvedReference(reference.clone())
        }
        _ => GenerationError::EmptySet,
    })
}
