//! matserve-common: shared error type and identifiers.
//!
//! - **Error handling**: [`Error`] covers every failure of the image pipeline
//!   and knows the HTTP status it maps to
//! - **Types**: [`MaterialCode`] and [`SourceFormat`]
//!
//! # Examples
//!
//! ```
//! use matserve_common::{Error, MaterialCode, Result};
//!
//! let code = MaterialCode::parse("MAT-001").unwrap();
//! assert_eq!(code.object_key(), "MAT-001.jpeg");
//!
//! fn example() -> Result<()> {
//!     Err(Error::unavailable(
//!         "https://store/images/MAT-001.jpeg",
//!         "status 404",
//!     ))
//! }
//! assert_eq!(example().unwrap_err().http_status(), 503);
//! ```

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
