use crate::text::Text;

/// The outcome of a permission check or config operation: allow/deny plus an
/// optional message giving the player context. A plain allow never carries a
/// message; the only allow-with-message case is a save confirmation that
/// warns about a side effect of proceeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    allowed: bool,
    message: Option<Text>,
}

impl ActionResult {
    pub fn success() -> Self {
        Self {
            allowed: true,
            message: None,
        }
    }

    pub fn success_with(message: Text) -> Self {
        Self {
            allowed: true,
            message: Some(message),
        }
    }

    pub fn fail() -> Self {
        Self {
            allowed: false,
            message: None,
        }
    }

    pub fn fail_with(message: Text) -> Self {
        Self {
            allowed: false,
            message: Some(message),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    pub fn message(&self) -> Option<&Text> {
        self.message.as_ref()
    }
}
