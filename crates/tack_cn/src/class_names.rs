//! Class name composition

use smallvec::SmallVec;

/// Space-separated class list that skips empty and duplicate entries
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassList {
    classes: SmallVec<[String; 4]>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class unconditionally
    pub fn add(self, class: impl AsRef<str>) -> Self {
        self.add_if(class, true)
    }

    /// Add a class when `condition` holds
    pub fn add_if(mut self, class: impl AsRef<str>, condition: bool) -> Self {
        if !condition {
            return self;
        }
        for part in class.as_ref().split_whitespace() {
            if !self.classes.iter().any(|c| c == part) {
                self.classes.push(part.to_string());
            }
        }
        self
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn build(&self) -> String {
        self.classes.join(" ")
    }
}

impl std::fmt::Display for ClassList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditional_classes() {
        let classes = ClassList::new()
            .add("custom extra")
            .add("fy-menu-light")
            .add_if("fy-menu-inline-collapsed", false)
            .add("")
            .add("custom");

        assert_eq!(classes.build(), "custom extra fy-menu-light");
        assert!(classes.contains("extra"));
        assert!(!classes.contains("fy-menu-inline-collapsed"));
    }
}
