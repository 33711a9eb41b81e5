#![allow(non_snake_case)]

use super::xname::XName;

/// MSBuild project vocabulary.
pub mod MSB {
    use super::XName;
    pub const NS: &str = "http://schemas.microsoft.com/developer/msbuild/2003";

    pub const PROJECT: &str = "Project";
    pub const ITEM_GROUP: &str = "ItemGroup";
    pub const IMPORT: &str = "Import";

    pub fn Project() -> XName { XName::new(NS, PROJECT) }
    pub fn ItemGroup() -> XName { XName::new(NS, ITEM_GROUP) }
}

/// Namespace used by `xmlns:prefix` declarations.
pub mod XMLNS {
    pub const NS: &str = "http://www.w3.org/2000/xmlns/";
    pub const PREFIX: &str = "xmlns";
}

/// The reserved `xml:` namespace (`xml:space`, `xml:lang`).
pub mod XML {
    pub const NS: &str = "http://www.w3.org/XML/1998/namespace";
    pub const PREFIX: &str = "xml";
}
