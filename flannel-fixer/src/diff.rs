use super::*;

/// A single difference between two annotation sets
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnnotationChange {
    Created { key: String, value: String },
    Updated { key: String, from: String, to: String },
    Deleted { key: String, value: String },
}

impl fmt::Display for AnnotationChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { key, value } => write!(f, "create {key}={value:?}"),
            Self::Updated { key, from, to } => write!(f, "update {key}: {from:?} -> {to:?}"),
            Self::Deleted { key, value } => write!(f, "delete {key}={value:?}"),
        }
    }
}

/// Computes the changes turning `old` into `new`, ordered by key.
///
/// A missing annotation map is the same as an empty one.
pub fn diff_annotations(
    old: Option<&Annotations>,
    new: Option<&Annotations>,
) -> Vec<AnnotationChange> {
    let empty = Annotations::new();
    let old = old.unwrap_or(&empty);
    let new = new.unwrap_or(&empty);

    old.keys()
        .chain(new.keys())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter_map(|key| match (old.get(key), new.get(key)) {
            (None, Some(value)) => Some(AnnotationChange::Created {
                key: key.clone(),
                value: value.clone(),
            }),
            (Some(value), None) => Some(AnnotationChange::Deleted {
                key: key.clone(),
                value: value.clone(),
            }),
            (Some(from), Some(to)) if from != to => Some(AnnotationChange::Updated {
                key: key.clone(),
                from: from.clone(),
                to: to.clone(),
            }),
            _ => None,
        })
        .collect()
}
