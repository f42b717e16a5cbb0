use serde::Serialize;

/// Standardized JSON wrapper for error and confirmation responses.
///
/// The fixed-contract endpoints (`/health`, `/api/predict`,
/// `/api/requests/{id}`) answer their raw contract bodies on success; this
/// envelope covers everything else:
/// ```json
/// {
///   "success": false,
///   "data": null,
///   "message": "Model not available. Please train the model first."
/// }
/// ```
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Constructs a success response with the given data and message.
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Constructs an error response with a message and default `data`.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }
}
