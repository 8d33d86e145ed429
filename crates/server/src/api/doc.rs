//! OpenAPI documentation aggregator.
//!
//! Collects the `#[utoipa::path]`-annotated handlers into one OpenAPI spec,
//! served via Scalar UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "doc-studio API",
        version = "0.1.0",
        description = "Flashcards, infographics, and file conversion from uploaded documents, plus subscription billing.",
    ),
    tags(
        (name = "Health", description = "Server liveness"),
        (name = "Study", description = "LLM-generated flashcards and infographics"),
        (name = "Converter", description = "Document format conversion"),
        (name = "Payment", description = "Checkout, customer portal, and subscription status"),
    ),
    paths(
        crate::api::health::health,
        crate::api::flashcards::generate_flashcards,
        crate::api::infographic::generate_infographic,
        crate::api::converter::convert_file,
        crate::api::payment::create_checkout,
        crate::api::payment::customer_portal,
        crate::api::payment::check_subscription,
    ),
    components(schemas(
        crate::api::ErrorResponse,
        crate::api::StudyRequest,
        crate::api::health::HealthResponse,
        crate::api::flashcards::FlashcardsResponse,
        crate::api::infographic::InfographicResponse,
        crate::api::payment::CheckoutRequest,
        crate::api::payment::CustomerRequest,
        crate::api::payment::RedirectResponse,
    ))
)]
pub struct ApiDoc;
