use uuid::Uuid;

/// Modal state of a management view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModalMode {
    #[default]
    Closed,
    Create,
    Edit(Uuid),
    View(Uuid),
}

impl ModalMode {
    pub fn is_open(&self) -> bool {
        !matches!(self, ModalMode::Closed)
    }

    /// Returns the entity the modal is showing, if any.
    pub fn selected(&self) -> Option<Uuid> {
        match self {
            ModalMode::Edit(id) | ModalMode::View(id) => Some(*id),
            ModalMode::Closed | ModalMode::Create => None,
        }
    }

    /// Switches a read-only modal to editing the same entity.
    ///
    /// Any other mode is returned unchanged.
    pub fn to_edit(self) -> Self {
        match self {
            ModalMode::View(id) => ModalMode::Edit(id),
            other => other,
        }
    }
}
