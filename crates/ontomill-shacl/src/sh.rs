//! SHACL vocabulary IRIs used by the compiler and the report writer.

pub const NS: &str = "http://www.w3.org/ns/shacl#";

pub const NODE_SHAPE: &str = "http://www.w3.org/ns/shacl#NodeShape";
pub const PROPERTY_SHAPE: &str = "http://www.w3.org/ns/shacl#PropertyShape";

// Targets
pub const TARGET_CLASS: &str = "http://www.w3.org/ns/shacl#targetClass";
pub const TARGET_NODE: &str = "http://www.w3.org/ns/shacl#targetNode";
pub const TARGET_SUBJECTS_OF: &str = "http://www.w3.org/ns/shacl#targetSubjectsOf";
pub const TARGET_OBJECTS_OF: &str = "http://www.w3.org/ns/shacl#targetObjectsOf";

// Shape structure
pub const PROPERTY: &str = "http://www.w3.org/ns/shacl#property";
pub const PATH: &str = "http://www.w3.org/ns/shacl#path";
pub const INVERSE_PATH: &str = "http://www.w3.org/ns/shacl#inversePath";
pub const CLOSED: &str = "http://www.w3.org/ns/shacl#closed";
pub const IGNORED_PROPERTIES: &str = "http://www.w3.org/ns/shacl#ignoredProperties";
pub const DEACTIVATED: &str = "http://www.w3.org/ns/shacl#deactivated";
pub const SEVERITY: &str = "http://www.w3.org/ns/shacl#severity";
pub const MESSAGE: &str = "http://www.w3.org/ns/shacl#message";
pub const NAME: &str = "http://www.w3.org/ns/shacl#name";
pub const DESCRIPTION: &str = "http://www.w3.org/ns/shacl#description";
pub const ORDER: &str = "http://www.w3.org/ns/shacl#order";
pub const GROUP: &str = "http://www.w3.org/ns/shacl#group";
pub const DEFAULT_VALUE: &str = "http://www.w3.org/ns/shacl#defaultValue";

// Constraint parameters
pub const MIN_COUNT: &str = "http://www.w3.org/ns/shacl#minCount";
pub const MAX_COUNT: &str = "http://www.w3.org/ns/shacl#maxCount";
pub const DATATYPE: &str = "http://www.w3.org/ns/shacl#datatype";
pub const CLASS: &str = "http://www.w3.org/ns/shacl#class";
pub const NODE_KIND: &str = "http://www.w3.org/ns/shacl#nodeKind";
pub const PATTERN: &str = "http://www.w3.org/ns/shacl#pattern";
pub const FLAGS: &str = "http://www.w3.org/ns/shacl#flags";
pub const MIN_LENGTH: &str = "http://www.w3.org/ns/shacl#minLength";
pub const MAX_LENGTH: &str = "http://www.w3.org/ns/shacl#maxLength";
pub const HAS_VALUE: &str = "http://www.w3.org/ns/shacl#hasValue";
pub const IN: &str = "http://www.w3.org/ns/shacl#in";
pub const MIN_INCLUSIVE: &str = "http://www.w3.org/ns/shacl#minInclusive";
pub const MAX_INCLUSIVE: &str = "http://www.w3.org/ns/shacl#maxInclusive";
pub const MIN_EXCLUSIVE: &str = "http://www.w3.org/ns/shacl#minExclusive";
pub const MAX_EXCLUSIVE: &str = "http://www.w3.org/ns/shacl#maxExclusive";
pub const LANGUAGE_IN: &str = "http://www.w3.org/ns/shacl#languageIn";
pub const UNIQUE_LANG: &str = "http://www.w3.org/ns/shacl#uniqueLang";

// Property pairs
pub const EQUALS: &str = "http://www.w3.org/ns/shacl#equals";
pub const DISJOINT: &str = "http://www.w3.org/ns/shacl#disjoint";
pub const LESS_THAN: &str = "http://www.w3.org/ns/shacl#lessThan";
pub const LESS_THAN_OR_EQUALS: &str = "http://www.w3.org/ns/shacl#lessThanOrEquals";

// Shape-based constraints
pub const NODE: &str = "http://www.w3.org/ns/shacl#node";
pub const NOT: &str = "http://www.w3.org/ns/shacl#not";
pub const AND: &str = "http://www.w3.org/ns/shacl#and";
pub const OR: &str = "http://www.w3.org/ns/shacl#or";
pub const XONE: &str = "http://www.w3.org/ns/shacl#xone";
pub const QUALIFIED_VALUE_SHAPE: &str = "http://www.w3.org/ns/shacl#qualifiedValueShape";
pub const QUALIFIED_MIN_COUNT: &str = "http://www.w3.org/ns/shacl#qualifiedMinCount";
pub const QUALIFIED_MAX_COUNT: &str = "http://www.w3.org/ns/shacl#qualifiedMaxCount";
pub const QUALIFIED_VALUE_SHAPES_DISJOINT: &str =
    "http://www.w3.org/ns/shacl#qualifiedValueShapesDisjoint";

// Node kinds
pub const IRI: &str = "http://www.w3.org/ns/shacl#IRI";
pub const BLANK_NODE: &str = "http://www.w3.org/ns/shacl#BlankNode";
pub const LITERAL: &str = "http://www.w3.org/ns/shacl#Literal";
pub const BLANK_NODE_OR_IRI: &str = "http://www.w3.org/ns/shacl#BlankNodeOrIRI";
pub const BLANK_NODE_OR_LITERAL: &str = "http://www.w3.org/ns/shacl#BlankNodeOrLiteral";
pub const IRI_OR_LITERAL: &str = "http://www.w3.org/ns/shacl#IRIOrLiteral";

// Severities
pub const VIOLATION: &str = "http://www.w3.org/ns/shacl#Violation";
pub const WARNING: &str = "http://www.w3.org/ns/shacl#Warning";
pub const INFO: &str = "http://www.w3.org/ns/shacl#Info";

// Report vocabulary
pub const VALIDATION_REPORT: &str = "http://www.w3.org/ns/shacl#ValidationReport";
pub const VALIDATION_RESULT: &str = "http://www.w3.org/ns/shacl#ValidationResult";
pub const CONFORMS: &str = "http://www.w3.org/ns/shacl#conforms";
pub const RESULT: &str = "http://www.w3.org/ns/shacl#result";
pub const FOCUS_NODE: &str = "http://www.w3.org/ns/shacl#focusNode";
pub const RESULT_PATH: &str = "http://www.w3.org/ns/shacl#resultPath";
pub const VALUE: &str = "http://www.w3.org/ns/shacl#value";
pub const SOURCE_SHAPE: &str = "http://www.w3.org/ns/shacl#sourceShape";
pub const SOURCE_CONSTRAINT_COMPONENT: &str =
    "http://www.w3.org/ns/shacl#sourceConstraintComponent";
pub const RESULT_SEVERITY: &str = "http://www.w3.org/ns/shacl#resultSeverity";
pub const RESULT_MESSAGE: &str = "http://www.w3.org/ns/shacl#resultMessage";
