use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Registers the `X-API-Token` header scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "api_token",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "X-API-Token",
                "Token returned by POST /api/users.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Tracker API",
        version = "0.1.0",
        description = "Users, their items, and deactivation with ownership transfer"
    ),
    servers(
        (url = "/api", description = "API base path")
    )
)]
struct BaseDoc;

/// Full document: base info plus every domain's paths.
///
/// Domain routers carry full paths (`/users/{id}/items`), so their documents
/// are merged rather than nested under a prefix.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = BaseDoc::openapi();
        doc.merge(domain_users::ApiDoc::openapi());
        doc.merge(domain_items::ApiDoc::openapi());
        doc
    }
}
