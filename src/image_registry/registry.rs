use crate::error_handling::types::ConfigError;
use log::debug;
use regex::Regex;
use std::fmt;
use std::path::Path;

/// Pattern matched against each line of the machine-definition file.
/// Captures the quoted identifier of a `.vm.define '<name>'` statement.
const DEFINE_PATTERN: &str = r".+\.vm\.define '(.+)'";

/// A named, pre-defined virtual machine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub name: String,
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Ordered, immutable collection of buildable images.
///
/// Order follows the machine-definition file; it determines the order of
/// the `IMAGES:` announcement and of the summary lines.
#[derive(Debug, Clone)]
pub struct ImageRegistry {
    images: Vec<Image>,
}

impl ImageRegistry {
    /// Parses the machine-definition file at `path`.
    ///
    /// Every line matching the define pattern contributes one image, in
    /// file order. Zero matches is legal (the build becomes a no-op).
    /// An unreadable file is a fatal configuration error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let pattern =
            Regex::new(DEFINE_PATTERN).map_err(|e| ConfigError::PatternError(e.to_string()))?;

        let mut images = Vec::new();
        for line in contents.lines() {
            if let Some(captures) = pattern.captures(line) {
                let name = captures[1].trim().to_string();
                debug!("Registered image: {}", name);
                images.push(Image { name });
            }
        }

        Ok(Self { images })
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Comma-space joined image names, as sent in the `IMAGES:` line.
    pub fn joined_names(&self) -> String {
        self.images
            .iter()
            .map(|i| i.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    #[cfg(test)]
    pub fn from_names(names: &[&str]) -> Self {
        Self {
            images: names
                .iter()
                .map(|n| Image {
                    name: n.to_string(),
                })
                .collect(),
        }
    }
}
