//! Error types for the `contagion-core` crate.
//!
//! Two families cover every failure the core can report, and both are
//! detected before the first step runs:
//!
//! - [`ConfigurationError`] -- the inputs disagree with each other: unknown
//!   attributes or values, conflicting domain declarations, probabilities
//!   that do not sum to one, unrecognized mode strings.
//! - [`ValidationError`] -- a single rule specification is malformed.
//!
//! [`EngineError`] covers the one thing that can go wrong once stepping
//! starts: running the step counter past `u64::MAX`.
//!
//! Every variant names the offending field and, where one exists, the full
//! list of legal alternatives.

/// Join a list of legal alternatives for display.
fn list(values: &[String]) -> String {
    values.join(", ")
}

/// The inputs handed to the core are inconsistent.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// An attribute was declared twice with different values.
    #[error("attribute {attribute} already declared as [{}], cannot redeclare as [{}]", list(.declared), list(.requested))]
    ConflictingDomain {
        /// The attribute name.
        attribute: String,
        /// Values from the first declaration.
        declared: Vec<String>,
        /// Values from the rejected declaration.
        requested: Vec<String>,
    },

    /// An attribute was declared with no legal values.
    #[error("attribute {attribute} must declare at least one value")]
    EmptyDomain {
        /// The attribute name.
        attribute: String,
    },

    /// An attribute declaration lists the same value twice.
    #[error("attribute {attribute} lists value {value} more than once")]
    DuplicateValue {
        /// The attribute name.
        attribute: String,
        /// The repeated value.
        value: String,
    },

    /// An attribute is not part of the declared domain.
    #[error("unknown attribute {attribute}; declared attributes: {}", list(.available))]
    UnknownAttribute {
        /// The requested attribute.
        attribute: String,
        /// Every declared attribute.
        available: Vec<String>,
    },

    /// A value is not legal for its attribute.
    #[error("{value} not available in the {attribute} list: {}", list(.legal))]
    UnknownValue {
        /// The attribute name.
        attribute: String,
        /// The offending value.
        value: String,
        /// Legal values for the attribute.
        legal: Vec<String>,
    },

    /// A rule names a mode the engine does not implement.
    #[error("rule {rule}: mode {mode} should be one of: {}", list(.available))]
    UnknownRuleMode {
        /// The rule name.
        rule: String,
        /// The unrecognized mode string.
        mode: String,
        /// Recognized modes.
        available: Vec<String>,
    },

    /// A declared attribute has no initial-condition probabilities.
    #[error("attribute {attribute} not available in the initial conditions")]
    MissingInitialConditions {
        /// The attribute without initial conditions.
        attribute: String,
    },

    /// An initial-condition probability is negative or not finite.
    #[error("initial probability for {attribute}={value} must be a finite non-negative number, got {probability}")]
    InvalidInitialProbability {
        /// The attribute name.
        attribute: String,
        /// The value the probability belongs to.
        value: String,
        /// The offending probability.
        probability: f64,
    },

    /// Initial-condition probabilities for an attribute do not sum to one.
    #[error("initial conditions on {attribute} should sum to 1; their sum is {sum}")]
    ProbabilitySum {
        /// The attribute name.
        attribute: String,
        /// The computed sum.
        sum: f64,
    },

    /// The measurement mode string is not recognized.
    #[error("measurement mode {mode} not implemented; choose between: {}", list(.available))]
    UnknownMeasurementMode {
        /// The unrecognized mode string.
        mode: String,
        /// Recognized modes.
        available: Vec<String>,
    },

    /// A measurement asked for a different attribute than earlier samples.
    #[error("measurement already records attribute {recorded}, cannot also record {requested}")]
    MeasuredAttributeChanged {
        /// The attribute recorded so far.
        recorded: String,
        /// The attribute of the rejected sample.
        requested: String,
    },

    /// An edge references a node outside the graph.
    #[error("edge ({source_node}, {target_node}) out of range for {vertex_count} vertices")]
    EdgeOutOfRange {
        /// Source endpoint.
        source_node: usize,
        /// Target endpoint.
        target_node: usize,
        /// Number of vertices.
        vertex_count: usize,
    },

    /// Snapshot data does not match the declared domain or node count.
    #[error("snapshot attribute {attribute}: {reason}")]
    MalformedSnapshot {
        /// The attribute whose data is wrong.
        attribute: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The snapshot and the adjacency structure disagree on node count.
    #[error("snapshot has {snapshot_nodes} nodes but the topology has {topology_nodes}")]
    NodeCountMismatch {
        /// Nodes in the snapshot.
        snapshot_nodes: usize,
        /// Vertices in the adjacency structure.
        topology_nodes: usize,
    },

    /// The snapshot was built against a different attribute domain than
    /// the compartment's.
    #[error("snapshot attribute domain differs from the compartment's")]
    DomainMismatch,
}

/// A rule specification violates one of the transition-rule invariants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The rule has an empty name.
    #[error("rule name must not be empty")]
    EmptyName,

    /// The rule's attribute is not declared.
    #[error("rule {rule}: attribute should be equal to one of these: {}", list(.available))]
    UnknownAttribute {
        /// The rule name.
        rule: String,
        /// The undeclared attribute.
        attribute: String,
        /// Declared attributes.
        available: Vec<String>,
    },

    /// The initial state is not legal for the attribute.
    #[error("rule {rule}: initial state {state} should be equal to one of these: {}", list(.legal))]
    UnknownInitialState {
        /// The rule name.
        rule: String,
        /// The offending state.
        state: String,
        /// Legal values.
        legal: Vec<String>,
    },

    /// The final state is not legal for the attribute.
    #[error("rule {rule}: final state {state} should be equal to one of these: {}", list(.legal))]
    UnknownFinalState {
        /// The rule name.
        rule: String,
        /// The offending state.
        state: String,
        /// Legal values.
        legal: Vec<String>,
    },

    /// A neighbor-mode rule has no triggering state.
    #[error("rule {rule}: neighbor mode requires a triggering state")]
    MissingTriggeringState {
        /// The rule name.
        rule: String,
    },

    /// The triggering state is not legal for the attribute.
    #[error("rule {rule}: triggering state {state} should be equal to one of these: {}", list(.legal))]
    UnknownTriggeringState {
        /// The rule name.
        rule: String,
        /// The offending state.
        state: String,
        /// Legal values.
        legal: Vec<String>,
    },

    /// The probability is not strictly between 0 and 1.
    #[error("rule {rule}: illegal probability value p = {probability} while p in (0,1)")]
    ProbabilityOutOfRange {
        /// The rule name.
        rule: String,
        /// The offending probability.
        probability: f64,
    },
}

/// The step loop cannot continue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The step counter would overflow.
    #[error("step counter overflow: cannot advance beyond u64::MAX")]
    StepOverflow,
}

/// Any error the core reports while building or running a simulation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// Inconsistent inputs.
    #[error("configuration error: {source}")]
    Configuration {
        /// The underlying configuration error.
        #[from]
        source: ConfigurationError,
    },

    /// Malformed rule specification.
    #[error("validation error: {source}")]
    Validation {
        /// The underlying validation error.
        #[from]
        source: ValidationError,
    },

    /// The step loop failed.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: EngineError,
    },
}
