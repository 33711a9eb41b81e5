pub mod arrange;
pub mod error;
pub mod util;
pub mod xml;

pub use arrange::{arrange_document, ArrangeOptions, ArrangeSettings, ArrangeStrategy, ResolvedSettings};
pub use error::{ArrangeError, Result};

/// Parses `xml`, arranges it and returns the indented result.
pub fn arrange_str(xml: &str, settings: &ArrangeSettings) -> Result<String> {
    let mut doc = xml::parse(xml)?;
    arrange_document(&mut doc, settings)?;
    xml::serialize_pretty(&doc)
}
