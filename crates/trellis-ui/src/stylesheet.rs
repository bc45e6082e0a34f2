use rustc_hash::FxHashMap;

use crate::style::Style;

/// Class-name → style rules.
///
/// Lookup is an exact string match; there are no selectors, combinators or
/// specificity. Registering a class again replaces its rule.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    rules: FxHashMap<String, Style>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`add`](Self::add).
    pub fn rule(mut self, class: impl Into<String>, style: Style) -> Self {
        self.add(class, style);
        self
    }

    pub fn add(&mut self, class: impl Into<String>, style: Style) {
        let class = class.into();
        if self.rules.insert(class.clone(), style).is_some() {
            log::debug!("stylesheet rule `{class}` replaced");
        }
    }

    /// The rule for `class`, if registered.
    #[inline]
    pub fn get(&self, class: &str) -> Option<&Style> {
        self.rules.get(class)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
