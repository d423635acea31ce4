//! Shared response body types for API handlers.

use serde::Serialize;

/// Empty `{}` body returned by delete endpoints.
#[derive(Debug, Default, Serialize)]
pub struct Empty {}
