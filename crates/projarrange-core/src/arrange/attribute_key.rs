use std::cmp::Ordering;

use crate::xml::XAttribute;

/// Orders attribute sets by the values of a fixed list of attribute names.
///
/// Used as the tie-break between sibling elements of the same name.
#[derive(Debug, Clone, Copy)]
pub struct AttributeKeyComparer<'a> {
    sort_attributes: &'a [String],
}

impl<'a> AttributeKeyComparer<'a> {
    pub fn new(sort_attributes: &'a [String]) -> Self {
        Self { sort_attributes }
    }

    /// An absent set (a non-element node) sorts after any present set.
    /// Values are compared ordinally; a missing attribute counts as "".
    pub fn compare(&self, x: Option<&[XAttribute]>, y: Option<&[XAttribute]>) -> Ordering {
        let (x, y) = match (x, y) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Greater,
            (Some(_), None) => return Ordering::Less,
            (Some(x), Some(y)) => (x, y),
        };

        self.sort_attributes
            .iter()
            .map(|attribute| {
                let x_value = XAttribute::find_value(x, attribute).unwrap_or("");
                let y_value = XAttribute::find_value(y, attribute).unwrap_or("");
                x_value.cmp(y_value)
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}
