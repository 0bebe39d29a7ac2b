use crate::models::dto;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(info(
    title = "Sistema de Mantenimiento de Equipos API",
    description = "Equipment maintenance tracking API: accounts, maintenance records, dashboard and Excel export",
))]
struct Api;

/// Constructs the route on the API that renders the swagger UI and returns the OpenAPI schema.
/// Merges in OpenAPI definitions from other locations in the app, such as the [dto] package
/// and the per-resource route modules.
pub fn build_documentation() -> SwaggerUi {
    let mut api_docs = Api::openapi();
    api_docs.merge(dto::OpenApiSchemas::openapi());
    api_docs.merge(super::health::HealthApi::openapi());
    api_docs.merge(super::user::UsersApi::openapi());
    api_docs.merge(super::admin::AdminApi::openapi());
    api_docs.merge(super::equipment::EquipmentApi::openapi());
    api_docs.merge(super::dashboard::DashboardApi::openapi());
    api_docs.merge(super::export::ExportApi::openapi());

    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_docs)
}
