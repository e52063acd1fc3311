pub mod auth;
pub mod dashboard;
pub mod default;
pub mod global_404;
pub mod ping;
pub mod sensor;
pub mod villager;

pub use auth::admin::admin_login_handler;
pub use auth::admin::admin_logout_handler;
pub use auth::login::aadhaar_login_handler;
pub use auth::session::profile_handler;
pub use auth::session::validate_token_handler;
pub use auth::verify::check_otp_handler;
pub use auth::verify::check_phone_handler;
pub use auth::verify::resend_otp_handler;
pub use auth::verify::send_otp_handler;

pub use dashboard::dashboard_handler;

pub use default::default_route_handler;

pub use global_404::global_404_handler;

pub use ping::ping_handler;

pub use sensor::create::create_sensor_handler;
pub use sensor::delete::delete_sensor_handler;
pub use sensor::get::get_sensor_handler;
pub use sensor::get::list_sensors_handler;
pub use sensor::get::my_sensors_handler;
pub use sensor::readings::report_reading_handler;
pub use sensor::update::update_sensor_handler;

pub use villager::create::create_villager_handler;
pub use villager::delete::delete_villager_handler;
pub use villager::get::get_villager_handler;
pub use villager::get::list_villagers_handler;
pub use villager::update::update_villager_handler;
