pub const DEFAULT_CONFIG_FILE: &str = "apicheck.toml";

pub const MISSING_ENTITY: &str = "MISSING_ENTITY";
pub const MISSING_REQUIRED_FIELD: &str = "MISSING_REQUIRED_FIELD";
pub const FIELD_NAMING_MISMATCH: &str = "FIELD_NAMING_MISMATCH";
pub const REQUIREDNESS_MISMATCH: &str = "REQUIREDNESS_MISMATCH";
pub const TYPE_MISMATCH: &str = "TYPE_MISMATCH";
pub const MISSING_CONSTRAINT: &str = "MISSING_CONSTRAINT";
pub const ENUM_INCOMPLETE: &str = "ENUM_INCOMPLETE";
pub const ENUM_UNDECLARED_VALUE: &str = "ENUM_UNDECLARED_VALUE";
pub const UNDECLARED_EXTRA_FIELD: &str = "UNDECLARED_EXTRA_FIELD";

pub const MISSING_OPERATION: &str = "MISSING_OPERATION";
pub const OPERATION_METHOD_MISMATCH: &str = "OPERATION_METHOD_MISMATCH";

pub const IDEMPOTENCY_MISSING: &str = "IDEMPOTENCY_MISSING";
pub const PRECONDITION_TOKEN_MISSING: &str = "PRECONDITION_TOKEN_MISSING";
pub const SIGNATURE_VERIFICATION_MISSING: &str = "SIGNATURE_VERIFICATION_MISSING";
pub const FLOAT_ARITHMETIC_FOR_MONEY: &str = "FLOAT_ARITHMETIC_FOR_MONEY";
pub const NULL_SAFETY_VIOLATION: &str = "NULL_SAFETY_VIOLATION";
pub const PAGINATION_NOT_EXHAUSTIVE: &str = "PAGINATION_NOT_EXHAUSTIVE";
pub const CONFLICT_STATUS_MISSING: &str = "CONFLICT_STATUS_MISSING";
pub const AUTH_REQUIREMENT_MISSING: &str = "AUTH_REQUIREMENT_MISSING";
pub const ENUM_HANDLING_NOT_EXHAUSTIVE: &str = "ENUM_HANDLING_NOT_EXHAUSTIVE";
pub const SHARED_TEST_DOUBLE: &str = "SHARED_TEST_DOUBLE";
pub const SHALLOW_TEST_ASSERTIONS: &str = "SHALLOW_TEST_ASSERTIONS";

pub const RULE_INTERNAL_ERROR: &str = "RULE_INTERNAL_ERROR";

/// Process exit codes for `validate` and friends.
pub mod exit_codes {
    /// Candidate conforms (or the command succeeded).
    pub const PASS: u8 = 0;
    /// At least one error-severity diagnostic.
    pub const FAIL: u8 = 1;
    /// Unreadable or malformed input; no comparison was made.
    pub const MALFORMED: u8 = 2;
}
