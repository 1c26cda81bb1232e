//! Controller-style routing: route definitions, segment matching with typed
//! constraints, and the registration-ordered route collection.

pub mod constraint;
pub mod parser;
pub mod tokenizer;

pub use constraint::{ConstraintRegistry, RouteConstraint, RouteValue};
pub use parser::{RouteParseError, RouteParser};
pub use tokenizer::{LexError, RouteToken, RouteTokenType, RouteTokenizer};

use paracord_http::protocol::{HttpRequest, HttpResponse, MethodSet};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Constant,
    Variable,
}

/// One `/`-delimited element of a route definition.
///
/// Constants compare case-insensitively against the request path; variables
/// bind a parameter, optionally falling back to a default for an empty
/// request segment and optionally gated by a named constraint. The route
/// grammar itself has no constraint syntax; constraints are attached at
/// registration time through [`ControllerRouteSegment::with_constraint`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerRouteSegment {
    name: String,
    kind: SegmentKind,
    default: Option<String>,
    constraint: Option<String>,
}

impl ControllerRouteSegment {
    pub fn constant(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: SegmentKind::Constant, default: None, constraint: None }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: SegmentKind::Variable, default: None, constraint: None }
    }

    pub fn variable_with_default(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self { name: name.into(), kind: SegmentKind::Variable, default: Some(default.into()), constraint: None }
    }

    pub fn with_constraint(mut self, identifier: impl Into<String>) -> Self {
        self.constraint = Some(identifier.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn constraint(&self) -> Option<&str> {
        self.constraint.as_deref()
    }
}

impl fmt::Display for ControllerRouteSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SegmentKind::Constant => f.write_str(&self.name),
            SegmentKind::Variable => match &self.default {
                Some(default) => write!(f, "{{{}={}}}", self.name, default),
                None => write!(f, "{{{}}}", self.name),
            },
        }
    }
}

/// Parameters bound by a successful route match. Created fresh per match
/// attempt and discarded after dispatch.
#[derive(Debug, Default)]
pub struct ControllerRouteMatch {
    parameters: HashMap<String, RouteValue>,
}

impl ControllerRouteMatch {
    pub fn parameter(&self, name: &str) -> Option<&RouteValue> {
        self.parameters.get(name)
    }

    pub fn parameters(&self) -> &HashMap<String, RouteValue> {
        &self.parameters
    }
}

/// The handler a matched route dispatches to.
pub type RouteExecutor = Arc<dyn Fn(&HttpRequest, &ControllerRouteMatch, &mut HttpResponse) + Send + Sync>;

/// A full route: controller-level segments, method-level segments, an
/// accepted-method set and the executor. Built once at registration time
/// and immutable afterwards.
#[derive(Clone)]
pub struct ControllerRoute {
    controller_segments: Vec<ControllerRouteSegment>,
    method_segments: Vec<ControllerRouteSegment>,
    methods: MethodSet,
    executor: RouteExecutor,
}

impl fmt::Debug for ControllerRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerRoute")
            .field("route_path", &self.route_path())
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}

impl ControllerRoute {
    /// Builds a route from a pair of pattern strings.
    pub fn parse(
        controller_pattern: &str,
        method_pattern: &str,
        methods: impl Into<MethodSet>,
        executor: RouteExecutor,
    ) -> Result<Self, RouteParseError> {
        let parser = RouteParser::new();
        Ok(Self {
            controller_segments: parser.parse(controller_pattern)?,
            method_segments: parser.parse(method_pattern)?,
            methods: methods.into(),
            executor,
        })
    }

    /// Direct construction, for registrations that attach constraints or
    /// build segments programmatically.
    pub fn new(
        controller_segments: Vec<ControllerRouteSegment>,
        method_segments: Vec<ControllerRouteSegment>,
        methods: impl Into<MethodSet>,
        executor: RouteExecutor,
    ) -> Self {
        Self { controller_segments, method_segments, methods: methods.into(), executor }
    }

    /// Controller segments followed by method segments.
    pub fn segments(&self) -> impl Iterator<Item = &ControllerRouteSegment> {
        self.controller_segments.iter().chain(self.method_segments.iter())
    }

    pub fn route_path(&self) -> String {
        self.segments().map(ToString::to_string).collect::<Vec<_>>().join("/")
    }

    pub fn methods(&self) -> MethodSet {
        self.methods
    }

    /// Matches a request against this route.
    ///
    /// The request's verb must be contained in the accepted-method set and
    /// the segment counts must be equal: there is no prefix or catch-all
    /// matching. Evaluation short-circuits on the first failing segment.
    pub fn matches(&self, request: &HttpRequest, constraints: &ConstraintRegistry) -> Option<ControllerRouteMatch> {
        if !self.methods.contains(request.method()) {
            return None;
        }

        let path = request.path();
        let request_segments = split_path(&path);
        if request_segments.len() != self.segments().count() {
            return None;
        }

        let mut parameters = HashMap::new();
        for (segment, request_segment) in self.segments().zip(request_segments) {
            match segment.kind {
                SegmentKind::Constant => {
                    if !segment.name.eq_ignore_ascii_case(request_segment) {
                        return None;
                    }
                }
                SegmentKind::Variable => {
                    let effective = if request_segment.is_empty() { segment.default()? } else { request_segment };

                    let value = match segment.constraint() {
                        Some(identifier) => {
                            let Some(validator) = constraints.get(identifier) else {
                                debug!(constraint = identifier, "unknown route constraint, route can never match");
                                return None;
                            };
                            validator.matches(effective)?
                        }
                        None => RouteValue::Str(effective.to_string()),
                    };
                    parameters.insert(segment.name.clone(), value);
                }
            }
        }

        Some(ControllerRouteMatch { parameters })
    }

    pub fn execute(&self, request: &HttpRequest, route_match: &ControllerRouteMatch, response: &mut HttpResponse) {
        (self.executor)(request, route_match, response);
    }
}

/// Request path split on `/`, with one leading and one trailing slash
/// trimmed. Repeated slashes yield empty segments, which is how variable
/// defaults get exercised.
fn split_path(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() { Vec::new() } else { trimmed.split('/').collect() }
}

/// Registration-ordered set of routes sharing one constraint registry.
///
/// Lookup walks the routes in registration order and takes the first full
/// success; there is no specificity scoring.
#[derive(Debug, Default)]
pub struct RouteCollection {
    routes: Vec<ControllerRoute>,
    constraints: ConstraintRegistry,
}

impl RouteCollection {
    pub fn new() -> Self {
        Self { routes: Vec::new(), constraints: ConstraintRegistry::with_defaults() }
    }

    pub fn register(&mut self, route: ControllerRoute) {
        self.routes.push(route);
    }

    pub fn register_constraint(&mut self, constraint: Arc<dyn RouteConstraint>) {
        self.constraints.register(constraint);
    }

    pub fn find(&self, request: &HttpRequest) -> Option<(&ControllerRoute, ControllerRouteMatch)> {
        self.routes.iter().find_map(|route| route.matches(request, &self.constraints).map(|m| (route, m)))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
