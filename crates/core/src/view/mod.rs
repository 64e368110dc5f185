mod capability;
mod modal;
mod notice;
mod wizard;

pub use capability::{Action, Affordances, AllowAll, CapabilityCheck, ResourceKind, StaticCapabilities};
pub use modal::ModalMode;
pub use notice::{LoadState, Notice, NoticeKind};
pub use wizard::{CreateWizard, EditForm, EventSubmission, WizardStep};
