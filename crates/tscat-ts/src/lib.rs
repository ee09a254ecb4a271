#![forbid(unsafe_code)]

//! Qt Linguist TS documents for [`tscat_catalog`].
//!
//! [`parse_str`] and [`to_string`] convert between TS markup and
//! [`Catalogue`](tscat_catalog::Catalogue); [`load`] builds a
//! [`Translator`](tscat_catalog::Translator) from a directory of
//! `<stem>_<locale>.ts` files.

pub mod error;
pub mod loader;
pub mod reader;
pub mod writer;

pub use error::{LoadError, TsError};
pub use loader::{LoaderConfig, load, locale_from_path};
pub use reader::{parse_str, read_file};
pub use writer::{to_string, write_file};
