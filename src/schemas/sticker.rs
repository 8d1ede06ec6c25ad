use poem_openapi::{ApiResponse, Object, payload::{Attachment, Json}};
use serde::Deserialize;

use super::common::{InternalServerErrorResponse, UnprocessableEntityResponse};
use crate::core::engine::ContactRequest;

pub const NAME_MIN_LENGTH: usize = 2;
pub const PHONE_MIN_LENGTH: usize = 10;

#[derive(Object, Deserialize, Clone, Debug)]
pub struct StickerRequest {
    /// Name shown in the contact card payload (at least 2 characters)
    pub name: String,

    /// Phone number, local or with a leading `+` (at least 10 characters)
    pub phone: String,
}

impl StickerRequest {
    /// Trim both fields and check their minimum lengths.
    pub fn validate(self) -> Result<ContactRequest, UnprocessableEntityResponse> {
        let name = self.name.trim().to_string();
        let phone = self.phone.trim().to_string();

        let mut errors = UnprocessableEntityResponse::new();
        if name.chars().count() < NAME_MIN_LENGTH {
            errors.add_error(
                vec!["body".to_string(), "name".to_string()],
                format!("String should have at least {} characters", NAME_MIN_LENGTH),
            );
        }
        if phone.chars().count() < PHONE_MIN_LENGTH {
            errors.add_error(
                vec!["body".to_string(), "phone".to_string()],
                format!("String should have at least {} characters", PHONE_MIN_LENGTH),
            );
        }

        if errors.is_has_error() {
            return Err(errors);
        }
        Ok(ContactRequest { name, phone })
    }
}

#[derive(ApiResponse)]
pub enum StickerResponse {
    /// PNG image at 300 DPI
    #[oai(status = 200, content_type = "image/png")]
    Png(Attachment<Vec<u8>>),

    /// Single-page PDF sized 7.6cm x 10.1cm
    #[oai(status = 200, content_type = "application/pdf")]
    Pdf(Attachment<Vec<u8>>),

    #[oai(status = 422)]
    UnprocessableEntity(Json<UnprocessableEntityResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(Object, Debug)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, phone: &str) -> StickerRequest {
        StickerRequest {
            name: name.to_string(),
            phone: phone.to_string(),
        }
    }

    #[test]
    fn test_valid_request_is_trimmed() {
        let contact = request("  Ahmet Yılmaz ", " 05321234567\n").validate().unwrap();
        assert_eq!(contact.name, "Ahmet Yılmaz");
        assert_eq!(contact.phone, "05321234567");
    }

    #[test]
    fn test_short_fields_are_rejected() {
        let errors = request("A", "123").validate().unwrap_err();
        assert_eq!(errors.detail.len(), 2);
    }

    #[test]
    fn test_whitespace_does_not_count() {
        let errors = request("  A  ", "05321234567").validate().unwrap_err();
        assert_eq!(errors.detail.len(), 1);
    }
}
