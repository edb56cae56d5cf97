/// Error code registry for loader-setup
///
/// Error codes are organized by category:
/// - 1000-1999: Input document errors
/// - 2000-2999: Validation errors
/// - 3000-3999: Encryption errors
/// - 4000-4999: Storage errors
/// - 5000-5999: Provisioning errors
/// - 6000-6999: Region errors
/// - 9000-9999: Other errors
pub struct ErrorCode;

impl ErrorCode {
    // Input document errors (1000-1999)
    pub const INPUT_GENERIC: u16 = 1000;
    pub const INPUT_NOT_FOUND: u16 = 1001;
    pub const INPUT_INVALID_JSON: u16 = 1002;
    pub const INPUT_INVALID_YAML: u16 = 1003;
    pub const INPUT_NOT_AN_OBJECT: u16 = 1004;
    pub const INPUT_NOT_SCALAR: u16 = 1005;
    pub const INPUT_INVALID_LOADERS: u16 = 1006;

    // Validation errors (2000-2999)
    pub const VALIDATION_GENERIC: u16 = 2000;
    pub const VALIDATION_REQUIRED_FIELD: u16 = 2001;
    pub const VALIDATION_NOT_ALLOWED: u16 = 2002;
    pub const VALIDATION_INVALID_INTEGER: u16 = 2003;

    // Encryption errors (3000-3999)
    pub const ENCRYPTION_GENERIC: u16 = 3000;
    pub const ENCRYPTION_SERVICE_FAILED: u16 = 3001;
    pub const ENCRYPTION_KEY_SETUP_FAILED: u16 = 3002;
    pub const ENCRYPTION_EMPTY_CIPHERTEXT: u16 = 3003;

    // Storage errors (4000-4999)
    pub const STORAGE_GENERIC: u16 = 4000;
    pub const STORAGE_WRITE_FAILED: u16 = 4001;
    pub const STORAGE_SERIALIZATION_ERROR: u16 = 4002;

    // Provisioning errors (5000-5999)
    pub const PROVISION_GENERIC: u16 = 5000;
    pub const PROVISION_TABLE_FAILED: u16 = 5001;
    pub const PROVISION_TABLE_TIMEOUT: u16 = 5002;
    pub const PROVISION_EVENT_SOURCE_FAILED: u16 = 5003;

    // Region errors (6000-6999)
    pub const REGION_GENERIC: u16 = 6000;
    pub const REGION_NOT_SUPPORTED: u16 = 6001;

    // Other errors (9000-9999)
    pub const OTHER_GENERIC: u16 = 9000;
    pub const OTHER_INTERNAL_ERROR: u16 = 9001;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        // Input document errors
        1000 => "Generic input document error",
        1001 => "Setup document not found",
        1002 => "Setup document is not valid JSON",
        1003 => "Setup document is not valid YAML",
        1004 => "Setup document must be an object",
        1005 => "Setup field must be a scalar value",
        1006 => "Loaders must be a list of objects",

        // Validation errors
        2000 => "Generic validation error",
        2001 => "Required field is missing or blank",
        2002 => "Value is not one of the allowed values",
        2003 => "Value is not a valid integer",

        // Encryption errors
        3000 => "Generic encryption error",
        3001 => "Key management service call failed",
        3002 => "Master key could not be described or created",
        3003 => "Key management service returned no ciphertext",

        // Storage errors
        4000 => "Generic storage error",
        4001 => "Configuration record write failed",
        4002 => "Configuration record could not be serialized",

        // Provisioning errors
        5000 => "Generic provisioning error",
        5001 => "Supporting table could not be created",
        5002 => "Supporting table did not become active in time",
        5003 => "Object storage event source could not be configured",

        // Region errors
        6000 => "Generic region error",
        6001 => "Region is not in the supported list",

        // Other errors
        9000 => "Generic error",
        9001 => "Internal error",

        _ => "Unknown error code",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_a_description() {
        for code in [
            ErrorCode::INPUT_GENERIC,
            ErrorCode::VALIDATION_GENERIC,
            ErrorCode::ENCRYPTION_GENERIC,
            ErrorCode::STORAGE_GENERIC,
            ErrorCode::PROVISION_GENERIC,
            ErrorCode::REGION_GENERIC,
            ErrorCode::OTHER_GENERIC,
        ] {
            assert_ne!(describe_error_code(code), "Unknown error code");
        }
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(describe_error_code(1234), "Unknown error code");
    }
}
