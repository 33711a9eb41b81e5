//! Arrangement of MSBuild-style project documents.

pub mod attribute_key;
pub mod comments;
pub mod node_name;
pub mod options;
pub mod sections;
pub mod settings;
pub mod strategy;

pub use attribute_key::AttributeKeyComparer;
pub use comments::{fold_comments, unfold_comments, CommentGroup};
pub use node_name::NodeNameComparer;
pub use options::ArrangeOptions;
pub use sections::{fold_sections, order_sections, unfold_sections, Section};
pub use settings::{ArrangeSettings, ResolvedSettings, DEFAULT_MARKER};
pub use strategy::{arrange_document, ArrangeStrategy};
