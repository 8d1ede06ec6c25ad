use std::sync::Arc;

use poem::web::Data;
use poem_openapi::{
    OpenApi, Tags,
    payload::{Attachment, AttachmentType, Json},
};

use crate::{
    AppState,
    core::export::ExportFormat,
    error::StickerError,
    schemas::{
        common::InternalServerErrorResponse,
        sticker::{HealthResponse, StickerRequest, StickerResponse},
    },
};

#[derive(Tags)]
enum ApiStickerTags {
    Sticker,
    Health,
}

pub struct ApiSticker;

#[OpenApi()]
impl ApiSticker {
    /// Generate PNG sticker
    ///
    /// Render the sticker for a contact as a 300 DPI PNG.
    ///
    /// # Example Request
    /// ```json
    /// { "name": "Ahmet Yılmaz", "phone": "0532 123 45 67" }
    /// ```
    #[oai(
        path = "/api/generate_sticker/png",
        method = "post",
        tag = "ApiStickerTags::Sticker"
    )]
    async fn generate_png(
        &self,
        Json(json): Json<StickerRequest>,
        state: Data<&Arc<AppState>>,
    ) -> StickerResponse {
        generate(&state, json, ExportFormat::Png).await
    }

    /// Generate PDF sticker
    ///
    /// Render the sticker for a contact as a single PDF page sized to the
    /// printed card.
    #[oai(
        path = "/api/generate_sticker/pdf",
        method = "post",
        tag = "ApiStickerTags::Sticker"
    )]
    async fn generate_pdf(
        &self,
        Json(json): Json<StickerRequest>,
        state: Data<&Arc<AppState>>,
    ) -> StickerResponse {
        generate(&state, json, ExportFormat::Pdf).await
    }

    #[oai(path = "/health", method = "get", tag = "ApiStickerTags::Health")]
    async fn health(&self) -> Json<HealthResponse> {
        Json(HealthResponse {
            status: "ok".to_string(),
        })
    }
}

async fn generate(state: &AppState, request: StickerRequest, format: ExportFormat) -> StickerResponse {
    let contact = match request.validate() {
        Ok(contact) => contact,
        Err(errors) => {
            tracing::info!("rejected sticker request: {} invalid field(s)", errors.detail.len());
            return StickerResponse::UnprocessableEntity(Json(errors));
        }
    };

    tracing::info!("generating {:?} sticker", format);

    let bytes = match state.engine.render(contact, format).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let identifier = match &e {
                StickerError::EncodingCapacity { .. } => "QR payload too long",
                _ => "Rendering failed",
            };
            return StickerResponse::InternalServerError(Json(InternalServerErrorResponse::new(
                "route.sticker",
                "generate",
                identifier,
                &e.to_string(),
            )));
        }
    };

    let attachment = Attachment::new(bytes)
        .attachment_type(AttachmentType::Attachment)
        .filename(format.filename());
    match format {
        ExportFormat::Png => StickerResponse::Png(attachment),
        ExportFormat::Pdf => StickerResponse::Pdf(attachment),
    }
}
