//! Selector specificity

use crate::Specificity;
use crate::selectors::{ComplexSelector, SelectorList, SimpleSelector};

impl SimpleSelector {
    pub fn specificity(&self) -> Specificity {
        match self {
            SimpleSelector::Id(_) => Specificity(1, 0, 0),
            SimpleSelector::Class(_) | SimpleSelector::Attribute(_) | SimpleSelector::PseudoClass(_) => {
                Specificity(0, 1, 0)
            }
            SimpleSelector::Type(_) => Specificity(0, 0, 1),
            SimpleSelector::Universal | SimpleSelector::PseudoElement(_) => Specificity::default(),
        }
    }
}

impl ComplexSelector {
    pub fn specificity(&self) -> Specificity {
        self.compounds
            .iter()
            .flat_map(|c| c.parts.iter())
            .map(SimpleSelector::specificity)
            .fold(Specificity::default(), |acc, s| acc + s)
    }
}

impl SelectorList {
    /// The most specific member of the list
    pub fn specificity(&self) -> Specificity {
        self.0
            .iter()
            .map(ComplexSelector::specificity)
            .max()
            .unwrap_or_default()
    }
}

/// Specificity of selector text; unparseable selectors score zero
pub fn calculate(selector: &str) -> Specificity {
    SelectorList::parse(selector)
        .map(|list| list.specificity())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate() {
        assert_eq!(calculate("div"), Specificity(0, 0, 1));
        assert_eq!(calculate(".a.b"), Specificity(0, 2, 0));
        assert_eq!(calculate("#x"), Specificity(1, 0, 0));
        assert_eq!(calculate("div#x.a:hover"), Specificity(1, 2, 1));
        assert_eq!(calculate("ul > li + li"), Specificity(0, 0, 3));
        assert_eq!(calculate("a[href]::before"), Specificity(0, 1, 1));
        assert_eq!(calculate("*"), Specificity(0, 0, 0));
        assert_eq!(calculate(""), Specificity(0, 0, 0));
    }

    #[test]
    fn test_list_takes_maximum() {
        assert_eq!(calculate("div, #x, .a"), Specificity(1, 0, 0));
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        assert!(Specificity(1, 0, 0) > Specificity(0, 99, 99));
        assert!(Specificity(0, 1, 0) > Specificity(0, 0, 50));
    }
}
