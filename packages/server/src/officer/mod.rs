//! Officer identities: directory, login and profile maintenance.

pub mod directory;
pub mod profile;
pub mod session;

pub use directory::{NewOfficer, OfficerDirectory, ProfileChanges};
pub use profile::{PhotoUpload, ProfileUpdate, ProfileUpdater};
pub use session::{Session, SessionAuthenticator};
