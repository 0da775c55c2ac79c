//! Droplet naming for newly provisioned workers.
//!
//! Names are `{prefix}{uuid}` where the UUID is a random v4 identifier.
//! No registry is consulted: the random identifier is the only uniqueness
//! guarantee, so it must come from a cryptographically strong source.

use uuid::Uuid;

/// Prefix shared by every droplet Skiff creates.
pub const DROPLET_PREFIX: &str = "skiff-";

/// Maximum hostname length accepted by DigitalOcean for droplet names.
const MAX_DROPLET_NAME_LEN: usize = 255;

/// Generate a fresh, unique droplet name.
///
/// ```
/// use skiff_core::naming::{droplet_name, DROPLET_PREFIX};
///
/// let name = droplet_name();
/// assert!(name.starts_with(DROPLET_PREFIX));
/// ```
pub fn droplet_name() -> String {
    format!("{DROPLET_PREFIX}{}", Uuid::new_v4())
}

/// Whether `name` looks like a name produced by [`droplet_name`].
///
/// Used to recognise Skiff-owned droplets when a caller supplies its own
/// name instead of asking for a generated one.
pub fn is_generated_name(name: &str) -> bool {
    name.strip_prefix(DROPLET_PREFIX)
        .is_some_and(|rest| Uuid::parse_str(rest).is_ok())
}

/// Check that a caller-supplied droplet name is acceptable to the provider.
///
/// Rules:
/// - Must not be empty.
/// - Must not exceed `MAX_DROPLET_NAME_LEN` characters.
/// - Must contain only ASCII alphanumeric, hyphen, or dot characters.
pub fn is_valid_droplet_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_DROPLET_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
}
