pub mod dashboard;
pub mod equipment;
pub mod message;
pub mod user;
pub use dashboard::*;
pub use equipment::*;
pub use message::Message;
pub use user::*;

use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
#[derive(OpenApi)]
#[openapi(
    components(
        schemas(
            Message,
            Profile,
            RegisterInfo,
            LoginInfo,
            TokenResponse,
            AdminCreateUser,
            UserUpdate,
            PasswordChange,
            PasswordReset,
            EquipmentCreate,
            EquipmentUpdate,
            EquipmentFilter,
            DashboardStats,
            RecentMaintenance,
            crate::models::Equipment,
        ),
    ),
    modifiers(&SecurityAddon)
)]
/// Captures OpenAPI schemas and canned responses defined in the DTO module
pub struct OpenApiSchemas;

pub struct SecurityAddon;
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components: &mut utoipa::openapi::Components = openapi.components.as_mut().unwrap(); // we can unwrap safely since there already is components registered.
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}
