use serde::{Deserialize, Serialize};

use crate::core::{Point, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelRole {
    XLabel,
    YLabel,
    /// Extra y label pinned at the data maximum.
    TopYLabel,
    XUnitOfMeasure,
    YUnitOfMeasure,
}

impl LabelRole {
    #[must_use]
    pub fn is_y_axis(self) -> bool {
        matches!(self, Self::YLabel | Self::TopYLabel)
    }
}

/// Axis text placed during one layout pass. `point` is the top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub size: Size,
    pub point: Point,
    pub role: LabelRole,
}

impl Label {
    #[must_use]
    pub fn new(text: impl Into<String>, size: Size, point: Point, role: LabelRole) -> Self {
        Self {
            text: text.into(),
            size,
            point,
            role,
        }
    }

    /// Vertical centre of the label box.
    #[must_use]
    pub fn mid_y(&self) -> f64 {
        self.point.y + self.size.height / 2.0
    }
}

/// Labels compare by text and position only.
impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.point == other.point
    }
}

/// Ordered label collection for one layout pass.
#[derive(Debug, Clone, Default)]
pub struct Labels {
    labels: Vec<Label>,
}

impl Labels {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `label` unless an equal label is already present.
    ///
    /// Returns whether the label was stored.
    pub fn add(&mut self, label: Label) -> bool {
        if self.labels.contains(&label) {
            return false;
        }
        self.labels.push(label);
        true
    }

    /// Appends every label without deduplication.
    pub fn add_all(&mut self, labels: impl IntoIterator<Item = Label>) {
        self.labels.extend(labels);
    }

    pub fn find(&self, role: LabelRole) -> impl Iterator<Item = &Label> + '_ {
        self.labels.iter().filter(move |label| label.role == role)
    }

    /// Applies `edit` to every label of the given roles, grouped by role in
    /// the order given, then by insertion order.
    pub fn edit_labels(&mut self, roles: &[LabelRole], mut edit: impl FnMut(&mut Label)) {
        for role in roles {
            for label in self.labels.iter_mut().filter(|label| label.role == *role) {
                edit(label);
            }
        }
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Label> {
        self.labels.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Label> {
        self.labels
    }
}

impl<'a> IntoIterator for &'a Labels {
    type Item = &'a Label;
    type IntoIter = std::slice::Iter<'a, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Label, LabelRole, Labels};
    use crate::core::{Point, Size};

    fn label(text: &str, role: LabelRole) -> Label {
        Label::new(text, Size::new(10.0, 5.0), Point::new(1.0, 2.0), role)
    }

    #[test]
    fn single_add_deduplicates_but_batch_add_does_not() {
        let mut labels = Labels::new();
        assert!(labels.add(label("10", LabelRole::YLabel)));
        assert!(!labels.add(label("10", LabelRole::TopYLabel)));
        assert_eq!(labels.len(), 1);

        labels.add_all([label("10", LabelRole::YLabel), label("10", LabelRole::YLabel)]);
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn edits_visit_roles_in_the_requested_order() {
        let mut labels = Labels::new();
        labels.add_all([
            label("a", LabelRole::YLabel),
            label("b", LabelRole::XLabel),
            label("c", LabelRole::TopYLabel),
        ]);
        let mut visited = Vec::new();
        labels.edit_labels(&[LabelRole::TopYLabel, LabelRole::YLabel], |label| {
            visited.push(label.text.clone());
            label.point.x = 0.0;
        });
        assert_eq!(visited, ["c", "a"]);
        assert_eq!(labels.find(LabelRole::XLabel).next().map(|l| l.point.x), Some(1.0));
    }
}
