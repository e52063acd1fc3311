use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

use crate::constants::INGEST_KEY_HEADER;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::ping::ping_handler,
        crate::handlers::default::default_route_handler,
        crate::handlers::auth::login::aadhaar_login_handler,
        crate::handlers::auth::verify::check_phone_handler,
        crate::handlers::auth::verify::send_otp_handler,
        crate::handlers::auth::verify::resend_otp_handler,
        crate::handlers::auth::verify::check_otp_handler,
        crate::handlers::auth::session::validate_token_handler,
        crate::handlers::auth::session::profile_handler,
        crate::handlers::auth::admin::admin_login_handler,
        crate::handlers::auth::admin::admin_logout_handler,
        crate::handlers::dashboard::dashboard_handler,
        crate::handlers::villager::create::create_villager_handler,
        crate::handlers::villager::get::list_villagers_handler,
        crate::handlers::villager::get::get_villager_handler,
        crate::handlers::villager::update::update_villager_handler,
        crate::handlers::villager::delete::delete_villager_handler,
        crate::handlers::sensor::create::create_sensor_handler,
        crate::handlers::sensor::get::list_sensors_handler,
        crate::handlers::sensor::get::get_sensor_handler,
        crate::handlers::sensor::get::my_sensors_handler,
        crate::handlers::sensor::update::update_sensor_handler,
        crate::handlers::sensor::delete::delete_sensor_handler,
        crate::handlers::sensor::readings::report_reading_handler,
    ),
    components(
        schemas(
            crate::models::AadhaarLoginReq,
            crate::models::PhoneReq,
            crate::models::CheckOtpReq,
            crate::models::AdminLoginReq,
            crate::models::CreateVillagerReq,
            crate::models::UpdateVillagerReq,
            crate::models::CreateSensorReq,
            crate::models::UpdateSensorReq,
            crate::models::ReadingReq,

            crate::models::GenericResponse,
            crate::models::ErrorResponse,
            crate::models::SessionResponse,
            crate::models::OtpSentResponse,
            crate::models::SessionInfo,
            crate::models::ValidateResponse,
            crate::models::ProfileResponse,
            crate::models::VillagerResponse,
            crate::models::VillagerListResponse,
            crate::models::SensorResponse,
            crate::models::SensorRecordResponse,
            crate::models::SensorListResponse,
            crate::models::ReadingAccepted,
            crate::models::DashboardData,
            crate::models::DashboardResponse,

            crate::models::Villager,
            crate::models::Sensor,
            crate::models::SensorView,
            crate::models::Reading,
            crate::liveness::Liveness,
            crate::auth::Role,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Debugging API", description = "API for debugging purposes"),
        (name = "Auth API", description = "Aadhaar and otp login, session validation"),
        (name = "Villager App API", description = "API for logged in villagers"),
        (name = "Admin API", description = "API for admin functionalities"),
        (name = "Villager API", description = "Villager registration, admin only"),
        (name = "Sensor API", description = "Sensor registration and telemetry")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "authorization",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("authorization"))),
            );
            components.add_security_scheme(
                INGEST_KEY_HEADER,
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(INGEST_KEY_HEADER))),
            );
        }
    }
}
