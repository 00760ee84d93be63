pub mod errors;
pub mod fanout;

pub use errors::GatewayError;
pub use fanout::{envelope_for_bpp, matching_bpps};
