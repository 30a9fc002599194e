//! File upload DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Multipart form accepted by the image upload endpoint.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileForm {
    /// Image file (jpg, jpeg, png or gif)
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Public URL of a freshly uploaded image.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadFileResponse {
    #[serde(rename = "secureUrl")]
    #[schema(example = "http://localhost:3000/api/files/product/0b4c1e0e-2f0a-4ef5-9d0f-3b9bd1a4b5f2.jpg")]
    pub secure_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_url_is_camel_case() {
        let json = serde_json::to_value(UploadFileResponse {
            secure_url: "http://x/files/product/a.png".to_string(),
        })
        .unwrap();
        assert_eq!(json["secureUrl"], "http://x/files/product/a.png");
    }
}
