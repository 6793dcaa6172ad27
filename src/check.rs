//! Model checking - materializes every recognized capability annotation and
//! collects the failures as findings instead of stopping at the first one.
//!
//! Conversion aborts on the first bad annotation; checking keeps going so a
//! model author sees all problems in one run.

use serde::Serialize;

use crate::capabilities::{
    terms, CountRestrictions, DeleteRestrictions, ExampleValue, InsertRestrictions,
    ReadRestrictions, UpdateRestrictions,
};
use crate::error::ResolveError;
use crate::model::{Annotated, EdmModel, NavigationSource};
use crate::resolver;

/// One problem found in a model.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// Element the problem was found on, e.g. `Products` or `Product.Name`.
    pub element: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    pub message: String,
}

/// Outcome of checking a whole model.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub elements_checked: usize,
    pub findings: Vec<Finding>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Check every recognized annotation in the model.
///
/// Unlike [`crate::convert`], this never fails: problems accumulate in the
/// report and the caller decides what to do with them.
pub fn check_model(model: &EdmModel) -> CheckReport {
    let mut checker = Checker {
        model,
        elements_checked: 0,
        findings: Vec::new(),
    };
    checker.run();
    CheckReport {
        elements_checked: checker.elements_checked,
        findings: checker.findings,
    }
}

struct Checker<'a> {
    model: &'a EdmModel,
    elements_checked: usize,
    findings: Vec<Finding>,
}

impl Checker<'_> {
    fn run(&mut self) {
        for container in &self.model.containers {
            for set in &container.entity_sets {
                self.check_source(NavigationSource::EntitySet(set));
            }
            for singleton in &container.singletons {
                self.check_source(NavigationSource::Singleton(singleton));
            }
            for import in &container.operation_imports {
                self.elements_checked += 1;
                if self.model.operation(&import.operation).is_none() {
                    self.findings.push(Finding {
                        element: import.name.clone(),
                        term: None,
                        message: format!("references unknown operation '{}'", import.operation),
                    });
                }
            }
        }

        for entity_type in &self.model.entity_types {
            self.check_capability_terms(&entity_type.name, entity_type);
            for property in &entity_type.properties {
                let element = format!("{}.{}", entity_type.name, property.name);
                self.elements_checked += 1;
                let example: Result<Option<ExampleValue>, _> = resolver::resolve_term(property);
                self.record(&element, example);
                self.record(&element, resolver::resolve_revisions(property));
            }
            for nav in &entity_type.navigation_properties {
                let element = format!("{}.{}", entity_type.name, nav.name);
                self.elements_checked += 1;
                if self.model.entity_type(&nav.target).is_none() {
                    self.findings.push(Finding {
                        element,
                        term: None,
                        message: format!("targets unknown entity type '{}'", nav.target),
                    });
                } else {
                    self.record(&element, resolver::resolve_revisions(nav));
                }
            }
        }

        for enum_type in &self.model.enum_types {
            self.elements_checked += 1;
            self.record(&enum_type.name, resolver::resolve_revisions(enum_type));
            for member in &enum_type.members {
                let element = format!("{}.{}", enum_type.name, member.name);
                self.elements_checked += 1;
                self.record(&element, resolver::resolve_description(member));
            }
        }

        for operation in &self.model.operations {
            self.elements_checked += 1;
            self.record(&operation.name, resolver::resolve_description(operation));
        }
    }

    fn check_source(&mut self, source: NavigationSource) {
        let name = source.name().to_string();
        self.elements_checked += 1;

        if self.model.entity_type(source.entity_type_name()).is_none() {
            self.findings.push(Finding {
                element: name,
                term: None,
                message: format!(
                    "references unknown entity type '{}'",
                    source.entity_type_name()
                ),
            });
            return;
        }

        self.record(&name, resolver::resolve_on_source::<InsertRestrictions>(self.model, &source));
        self.record(&name, resolver::resolve_on_source::<UpdateRestrictions>(self.model, &source));
        self.record(&name, resolver::resolve_on_source::<DeleteRestrictions>(self.model, &source));
        self.record(&name, resolver::resolve_on_source::<ReadRestrictions>(self.model, &source));
        self.record(&name, resolver::resolve_on_source::<CountRestrictions>(self.model, &source));
        for term in [terms::TOP_SUPPORTED, terms::SKIP_SUPPORTED] {
            self.record(&name, resolver::resolve_boolean_on_source(self.model, &source, term));
        }
        self.record(&name, resolver::resolve_revisions(&source));
    }

    /// Resolve every recognized capability term directly on an element.
    fn check_capability_terms(&mut self, element: &str, annotated: &impl Annotated) {
        self.elements_checked += 1;
        let insert: Result<Option<InsertRestrictions>, _> = resolver::resolve_term(annotated);
        self.record(element, insert);
        let update: Result<Option<UpdateRestrictions>, _> = resolver::resolve_term(annotated);
        self.record(element, update);
        let delete: Result<Option<DeleteRestrictions>, _> = resolver::resolve_term(annotated);
        self.record(element, delete);
        let read: Result<Option<ReadRestrictions>, _> = resolver::resolve_term(annotated);
        self.record(element, read);
        let count: Result<Option<CountRestrictions>, _> = resolver::resolve_term(annotated);
        self.record(element, count);
        for term in [terms::TOP_SUPPORTED, terms::SKIP_SUPPORTED] {
            self.record(element, resolver::resolve_boolean(annotated, term));
        }
        self.record(element, resolver::resolve_revisions(annotated));
        self.record(element, resolver::resolve_description(annotated));
    }

    fn record<T>(&mut self, element: &str, result: Result<T, ResolveError>) {
        if let Err(e) = result {
            let term = match &e {
                ResolveError::InvalidAnnotationShape { term, .. } => Some(term.clone()),
                _ => None,
            };
            self.findings.push(Finding {
                element: element.to_string(),
                term,
                message: e.to_string(),
            });
        }
    }
}
