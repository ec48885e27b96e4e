//! Emphasis for the currently selected category.

use justice_metrics_models::Emphasis;

/// Marks each label [`Emphasis::Emphasized`] if it equals `current`
/// ignoring case, [`Emphasis::Normal`] otherwise.
///
/// With no current category, or no matching label, every bar is normal.
#[must_use]
pub fn highlight<S: AsRef<str>>(labels: &[S], current: Option<&str>) -> Vec<Emphasis> {
    let current = current.map(str::to_lowercase);

    labels
        .iter()
        .map(|label| match &current {
            Some(current) if label.as_ref().to_lowercase() == *current => Emphasis::Emphasized,
            _ => Emphasis::Normal,
        })
        .collect()
}
