pub mod helper;

pub use helper::build_get_request;
pub use helper::build_post_request;
pub use helper::read_json;
pub use helper::test_app;
pub use helper::ADMIN_AADHAAR;
pub use helper::ADMIN_PASS;
pub use helper::ADMIN_USER;
