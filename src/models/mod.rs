pub mod request_schema;
pub mod response_schema;
pub mod sensor;
pub mod telemetry;
pub mod villager;

pub use request_schema::*;
pub use response_schema::*;
pub use sensor::*;
pub use telemetry::*;
pub use villager::*;
