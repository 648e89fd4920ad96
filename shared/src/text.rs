use std::fmt;

/// A piece of user-facing text. Disconnect reasons, chat broadcasts and
/// denial messages are all localized keys resolved by the host game, so
/// this carries the key and its arguments rather than rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Text {
    Literal(String),
    Translate { key: String, args: Vec<Text> },
}

impl Text {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    pub fn translatable(key: impl Into<String>) -> Self {
        Self::Translate {
            key: key.into(),
            args: Vec::new(),
        }
    }

    pub fn translatable_with(key: impl Into<String>, args: Vec<Text>) -> Self {
        Self::Translate {
            key: key.into(),
            args,
        }
    }

    /// The translation key, if this is a translatable component.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Literal(_) => None,
            Self::Translate { key, .. } => Some(key),
        }
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => write!(f, "{}", text),
            Self::Translate { key, args } => {
                write!(f, "{}", key)?;
                if !args.is_empty() {
                    write!(f, "(")?;
                    for (index, arg) in args.iter().enumerate() {
                        if index > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}
