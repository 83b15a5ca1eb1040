//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}', use [format_endpoint].

/// The root route which describes the API.
pub const ROOT: &str = "/";
/// The route for checking that the server is up.
pub const HEALTH: &str = "/api/health";
/// The route for checking that the database can be written to and read from.
pub const DB_TEST: &str = "/api/db-test";
/// The route to access transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/transactions/{transaction_id}',
/// '{transaction_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let param_start = endpoint_path.find('{');
    let param_end = endpoint_path.find('}');

    match (param_start, param_end) {
        (Some(start), Some(end)) if start < end => {
            let is_parameter = endpoint_path[start + 1..end]
                .bytes()
                .all(|byte| byte.is_ascii_lowercase() || byte == b'_');

            if is_parameter {
                format!("{}{id}{}", &endpoint_path[..start], &endpoint_path[end + 1..])
            } else {
                endpoint_path.to_owned()
            }
        }
        _ => endpoint_path.to_owned(),
    }
}
