use serde::{Deserialize, Serialize};

/// The signed-in user as reported by the external identity provider.
///
/// Read-only from the client's perspective: its email stamps ownership
/// fields on new records, and its presence gates every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(rename = "photoURL", default)]
    pub photo_url: Option<String>,
}

impl SessionUser {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: None,
            photo_url: None,
        }
    }

    /// Name shown next to authored records. Falls back to the email
    /// when the provider has no display name.
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}
