pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const MONGO_MIN_POOL_SIZE: u32 = 5;
pub const MONGO_MAX_POOL_SIZE: u32 = 10;
pub const MONGO_CONN_TIMEOUT: u64 = 10;
pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_QUERY_LIMIT: i64 = 1000;
pub const DASHBOARD_RECENT_LIMIT: i64 = 5;

pub const OTP_LENGTH: usize = 6;
pub const OTP_MIN_VALUE: u32 = 100_000;
pub const OTP_MAX_VALUE: u32 = 999_999;
pub const OTP_VALIDITY_SECS: u64 = 5 * 60;
pub const OTP_MAX_ATTEMPTS: u32 = 3;

pub const ADMIN_SESSION_TTL_SECS: u64 = 8 * 60 * 60;
pub const VILLAGER_SESSION_TTL_SECS: u64 = 24 * 60 * 60;
pub const OPAQUE_TOKEN_BYTES: usize = 32;
pub const TOKEN_ID_BYTES: usize = 16;
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const MIN_JWT_SECRET_LEN: usize = 32;

pub const SENSOR_LIVE_THRESHOLD_SECS: u64 = 20;
/// how far ahead of the server clock a reading may be dated
pub const READING_MAX_CLOCK_SKEW_SECS: u64 = 60;
pub const STORE_SWEEP_INTERVAL_SECS: u64 = 60;

pub const PHONE_LENGTH: usize = 10;
pub const AADHAAR_LENGTH: usize = 12;
pub const DEV_EUI_LENGTH: usize = 16;

pub const INGEST_KEY_HEADER: &str = "x-api-key";

pub const DB_NAME: &str = "smart_panchayat";
pub const TELEMETRY_DB_NAME: &str = "smart_panchayat_telemetry";

pub const COLL_SEQUENCES: &str = "sequences";
pub const COLL_VILLAGERS: &str = "villagers";
pub const COLL_SENSORS: &str = "sensors";
pub const COLL_READINGS: &str = "readings";

pub const VILLAGER_ID_SEQ: &str = "VILLAGER_ID_SEQ";
