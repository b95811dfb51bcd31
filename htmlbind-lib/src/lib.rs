mod decode;
mod error;
pub mod field;
mod scope;

#[cfg(feature = "fetch")]
pub mod fetch;

// Lets the derive's `::htmlbind_lib::...` paths resolve inside this crate.
extern crate self as htmlbind_lib;

pub use decode::{
    check_shapes, decode, from_fragment, from_html, Decode, FieldDescriptor, Shape, Unsupported,
};
pub use error::{Error, Result};
#[cfg(feature = "fetch")]
pub use fetch::FetchExt;
pub use htmlbind_macros::Decode;
pub use scope::{node_attr, node_text, Scope};

pub use scraper::{ElementRef, Html};
