pub mod header_access;
pub mod header_name;
pub mod typed_header;

pub use header_access::HeaderAccess;
pub use header_name::HeaderName;
pub use typed_header::TypedHeader;
