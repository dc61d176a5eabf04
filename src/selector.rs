//! Selector matching against the UI context.
//!
//! Keybindings carry CSS-like selectors describing where they apply. The
//! menu manager asks the live UI layer first, then falls back to a
//! synthetic context representing an editor inside a workspace inside the
//! body, so keybinding-derived accelerators stay visible even when no
//! matching element is focused.

use tracing::debug;

/// Capability interface implemented by the real UI layer.
///
/// The menu manager never depends on a concrete UI toolkit; it only needs
/// to test selectors against the focused context and to read the body's
/// class list when seeding the synthetic fallback.
pub trait UiContext {
    /// Whether the selector matches the live focused UI context.
    fn matches(&self, selector: &str) -> bool;

    /// Class list of the root (body) element.
    fn body_classes(&self) -> Vec<String>;
}

/// An element in the synthetic context chain.
#[derive(Debug, Clone)]
struct Element {
    tag: &'static str,
    classes: Vec<String>,
}

/// Fallback context used when a selector does not match the live UI.
///
/// Models `body > workspace > editor`, with the body carrying the class
/// list captured at construction time. The class list is never refreshed
/// afterward; accelerator visibility can go stale if the real body's
/// classes change later.
#[derive(Debug, Clone)]
pub struct SyntheticContext {
    /// Root first, so ancestors of `elements[i]` are `elements[..i]`.
    elements: Vec<Element>,
}

impl SyntheticContext {
    /// Builds the synthetic chain with the given body classes.
    pub fn new(body_classes: Vec<String>) -> Self {
        Self {
            elements: vec![
                Element {
                    tag: "body",
                    classes: body_classes,
                },
                Element {
                    tag: "workspace",
                    classes: Vec::new(),
                },
                Element {
                    tag: "editor",
                    classes: Vec::new(),
                },
            ],
        }
    }

    /// Whether the selector matches any element in the chain, walking from
    /// the editor upward. Selectors outside the supported subset are
    /// non-matches, never errors.
    pub fn matches(&self, selector: &str) -> bool {
        let Some(groups) = parse_selector(selector) else {
            debug!(selector, "ignoring unparseable selector");
            return false;
        };
        (0..self.elements.len()).rev().any(|subject| {
            groups
                .iter()
                .any(|complex| self.matches_from(complex, complex.parts.len() - 1, subject))
        })
    }

    /// Matches `complex.parts[..=part]` with `parts[part]` anchored at
    /// element `pos`, trying every ancestor for descendant combinators.
    fn matches_from(&self, complex: &ComplexSelector, part: usize, pos: usize) -> bool {
        if !complex.parts[part].matches(&self.elements[pos]) {
            return false;
        }
        if part == 0 {
            return true;
        }
        match complex.combinators[part - 1] {
            Combinator::Child => pos > 0 && self.matches_from(complex, part - 1, pos - 1),
            Combinator::Descendant => (0..pos)
                .rev()
                .any(|ancestor| self.matches_from(complex, part - 1, ancestor)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    /// Whitespace: any ancestor.
    Descendant,
    /// `>`: immediate parent.
    Child,
}

/// One compound selector: optional tag (or `*`) plus class requirements.
#[derive(Debug, Clone)]
struct CompoundSelector {
    tag: Option<String>,
    classes: Vec<String>,
}

impl CompoundSelector {
    fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if tag != element.tag {
                return false;
            }
        }
        self.classes
            .iter()
            .all(|class| element.classes.iter().any(|c| c == class))
    }
}

/// One comma-separated alternative: compounds joined by combinators.
#[derive(Debug, Clone)]
struct ComplexSelector {
    parts: Vec<CompoundSelector>,
    /// `combinators[i]` sits between `parts[i]` and `parts[i + 1]`.
    combinators: Vec<Combinator>,
}

/// Parses the supported selector subset: comma-separated groups of
/// `tag`/`*`/`.class` compounds joined by descendant or `>` combinators.
/// Returns None for anything else (pseudo-classes, attributes, ids).
fn parse_selector(selector: &str) -> Option<Vec<ComplexSelector>> {
    selector.split(',').map(parse_complex).collect()
}

fn parse_complex(input: &str) -> Option<ComplexSelector> {
    let spaced = input.replace('>', " > ");
    let mut parts = Vec::new();
    let mut combinators = Vec::new();
    let mut pending_child = false;

    for token in spaced.split_whitespace() {
        if token == ">" {
            if parts.is_empty() || pending_child {
                return None;
            }
            pending_child = true;
        } else {
            let compound = parse_compound(token)?;
            if !parts.is_empty() {
                combinators.push(if pending_child {
                    Combinator::Child
                } else {
                    Combinator::Descendant
                });
                pending_child = false;
            }
            parts.push(compound);
        }
    }

    if parts.is_empty() || pending_child {
        return None;
    }
    Some(ComplexSelector { parts, combinators })
}

fn parse_compound(token: &str) -> Option<CompoundSelector> {
    let mut tag = None;
    let mut rest = token;

    if !rest.starts_with('.') {
        let end = rest.find('.').unwrap_or(rest.len());
        let name = &rest[..end];
        if name != "*" {
            if !is_identifier(name) {
                return None;
            }
            tag = Some(name.to_string());
        }
        rest = &rest[end..];
    }

    let mut classes = Vec::new();
    if let Some(class_list) = rest.strip_prefix('.') {
        for class in class_list.split('.') {
            if !is_identifier(class) {
                return None;
            }
            classes.push(class.to_string());
        }
    }

    Some(CompoundSelector { tag, classes })
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> SyntheticContext {
        SyntheticContext::new(vec!["platform-linux".to_string(), "dark".to_string()])
    }

    #[test]
    fn test_matches_plain_tags() {
        let ctx = context();
        assert!(ctx.matches("body"));
        assert!(ctx.matches("workspace"));
        assert!(ctx.matches("editor"));
        assert!(!ctx.matches("status-bar"));
    }

    #[test]
    fn test_matches_body_classes() {
        let ctx = context();
        assert!(ctx.matches(".platform-linux"));
        assert!(ctx.matches("body.platform-linux.dark"));
        assert!(!ctx.matches(".platform-darwin"));
        assert!(!ctx.matches("editor.platform-linux"));
    }

    #[test]
    fn test_matches_descendant_combinator() {
        let ctx = context();
        assert!(ctx.matches("body editor"));
        assert!(ctx.matches("body workspace editor"));
        assert!(ctx.matches(".platform-linux editor"));
        assert!(!ctx.matches("editor workspace"));
    }

    #[test]
    fn test_matches_child_combinator() {
        let ctx = context();
        assert!(ctx.matches("body > workspace"));
        assert!(ctx.matches("workspace>editor"));
        assert!(!ctx.matches("body > editor"));
    }

    #[test]
    fn test_matches_universal_selector() {
        let ctx = context();
        assert!(ctx.matches("*"));
        assert!(ctx.matches("body *"));
    }

    #[test]
    fn test_matches_comma_groups() {
        let ctx = context();
        assert!(ctx.matches("status-bar, editor"));
        assert!(!ctx.matches("status-bar, tree-view"));
    }

    #[test]
    fn test_unsupported_syntax_is_a_non_match() {
        let ctx = context();
        assert!(!ctx.matches("editor:not(.mini)"));
        assert!(!ctx.matches("editor[data-grammar='js']"));
        assert!(!ctx.matches("#main"));
        assert!(!ctx.matches(""));
        assert!(!ctx.matches("body >"));
        assert!(!ctx.matches("> editor"));
        assert!(!ctx.matches("body > > editor"));
    }

    #[test]
    fn test_classes_are_captured_at_construction() {
        let mut classes = vec!["dark".to_string()];
        let ctx = SyntheticContext::new(classes.clone());
        classes.push("light".to_string());

        assert!(ctx.matches(".dark"));
        assert!(!ctx.matches(".light"));
    }
}
