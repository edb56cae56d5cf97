//! Source prefix normalisation

const S3_SCHEME: &str = "s3://";

/// Normalise an operator-supplied bucket/prefix into the stored key
///
/// Every `s3://` occurrence is removed. A single path segment is a bare
/// bucket and is kept as is; otherwise one trailing `/` is dropped.
pub fn normalize_s3_prefix(raw: &str) -> String {
    let stripped = raw.replace(S3_SCHEME, "");

    if stripped.split('/').count() == 1 {
        stripped
    } else {
        stripped
            .strip_suffix('/')
            .map(str::to_string)
            .unwrap_or(stripped)
    }
}
