//! Persistence seam for profiles.

use crate::error::Result;
use crate::model::Profile;

/// Reads and writes the profile the editor works on.
///
/// The editor itself never persists anything; hosts call `save` when the
/// user asks for it or on exit.
pub trait ProfileStore {
    /// Load the profile, or a default one if nothing has been saved yet
    fn load(&self) -> Result<Profile>;

    fn save(&self, profile: &Profile) -> Result<()>;
}
