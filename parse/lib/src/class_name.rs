use std::fmt;

/// Reserved class name for user objects.
pub const USER_CLASS: &str = "_User";

/// A validated remote class name.
/// Rules:
/// 1. Must start with an ASCII letter or `_` (system classes start with `_`).
/// 2. Remaining characters must be ASCII alphanumeric or `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassName(String);

#[derive(Debug, PartialEq, Eq)]
pub enum ClassNameError {
    Empty,
    InvalidStartCharacter,
    InvalidCharacter(char),
}

impl fmt::Display for ClassNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "class name cannot be empty"),
            Self::InvalidStartCharacter => write!(f, "class name must start with a letter or '_'"),
            Self::InvalidCharacter(c) => write!(f, "class name contains invalid character: '{}'", c),
        }
    }
}

impl std::error::Error for ClassNameError {}

impl ClassName {
    pub fn new<S: Into<String>>(name: S) -> Result<Self, ClassNameError> {
        let s = name.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    fn validate(s: &str) -> Result<(), ClassNameError> {
        let mut chars = s.chars();

        match chars.next() {
            Some(c) if !(c.is_ascii_alphabetic() || c == '_') => {
                return Err(ClassNameError::InvalidStartCharacter);
            }
            None => return Err(ClassNameError::Empty),
            _ => {}
        }

        for c in chars {
            if !c.is_ascii_alphanumeric() && c != '_' {
                return Err(ClassNameError::InvalidCharacter(c));
            }
        }

        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_user(&self) -> bool {
        self.0 == USER_CLASS
    }

    /// Path segments of the REST collection holding objects of this class.
    ///
    /// System classes have dedicated collections; everything else lives
    /// under `classes/{name}`.
    pub fn collection_segments(&self) -> Vec<&str> {
        match self.0.as_str() {
            USER_CLASS => vec!["users"],
            "_Role" => vec!["roles"],
            "_Installation" => vec!["installations"],
            "_Session" => vec!["sessions"],
            name => vec!["classes", name],
        }
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ClassName> for String {
    fn from(name: ClassName) -> Self {
        name.0
    }
}

impl TryFrom<String> for ClassName {
    type Error = ClassNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ClassName {
    type Error = ClassNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
