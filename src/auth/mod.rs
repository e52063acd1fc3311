pub mod codec;
pub mod credentials;
pub mod extractor;
pub mod otp;
pub mod session;

pub use codec::{JwtCodec, OpaqueCodec, TokenCodec};
pub use credentials::{CredentialStore, Role};
pub use extractor::{bearer_token, AdminClaims, IngestKey, Session, VillagerClaims};
pub use otp::{OtpError, OtpRecord, OtpRegistry};
pub use session::{
    require_role, AuthError, IssuedSession, Principal, SessionClaims, SessionManager,
    VillagerIdentity,
};
