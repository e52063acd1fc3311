pub(crate) mod error_handler;
pub(crate) mod misc;
pub(crate) mod sequence_generator;
pub(crate) mod validation;

pub use error_handler::AppError;
pub use misc::*;
pub(crate) use sequence_generator::get_seq_nxt_val;
pub(crate) use validation::validate_aadhaar;
pub(crate) use validation::validate_phonenumber;
pub(crate) use validation::ValidatedBody;
pub(crate) use validation::ValidatedPath;
pub(crate) use validation::ValidatedQuery;
