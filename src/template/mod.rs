//! Per-language template bundles and the slot renderer.
//!
//! Every target language ships a fixed table of small named templates:
//! scalar type names, array literal shapes, branch fragments, print
//! statements and whole-program skeletons. Slots are written `{{name}}`;
//! any other `{{` is literal text, so `{{{values}}}` renders as the value
//! enclosed in one pair of braces.
//!
//! The tables are static. Asking for a template that does not exist, or
//! rendering one with an unbound slot, is a programming error and panics.

mod c;
mod go;
mod java;
mod js;
mod php;
mod ruby;

use crate::support::Language;

/// A named piece of template text.
#[derive(Clone, Copy, Debug)]
pub struct Template<'a> {
    pub name: &'a str,
    pub text: &'a str,
}

impl Template<'_> {
    pub fn render(&self, bindings: &[(&str, &str)]) -> String {
        fill(self.name, self.text, bindings)
    }
}

/// The template table of one language together with the code-shape policy
/// the emitters need alongside it.
#[derive(Clone, Copy, Debug)]
pub struct TemplateSet {
    pub language: Language,
    /// Sigil prepended to generated variable names (`$` in PHP).
    pub prefix: &'static str,
    /// Nesting level of the generated branch code inside its method, or
    /// `None` when branches are emitted flat.
    pub indent: Option<usize>,
    entries: &'static [(&'static str, &'static str)],
}

impl TemplateSet {
    pub fn load(language: Language) -> Self {
        let (entries, prefix, indent) = match language {
            Language::C => (c::TEMPLATES, "", None),
            Language::Go => (go::TEMPLATES, "", None),
            Language::Java => (java::TEMPLATES, "", Some(2)),
            Language::JavaScript => (js::TEMPLATES, "", Some(2)),
            Language::Php => (php::TEMPLATES, "$", Some(2)),
            Language::Ruby => (ruby::TEMPLATES, "", Some(2)),
        };
        TemplateSet {
            language,
            prefix,
            indent,
            entries,
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| *n == name)
    }

    pub fn get(&self, name: &str) -> Template<'static> {
        match self.entries.iter().find(|(n, _)| *n == name) {
            Some((name, text)) => Template { name, text },
            None => panic!("no template `{}` for {}", name, self.language),
        }
    }

    /// Shorthand for `get(name).render(bindings)`.
    pub fn render(&self, name: &str, bindings: &[(&str, &str)]) -> String {
        self.get(name).render(bindings)
    }

    /// Raw text of a template that has no slots.
    pub fn text(&self, name: &str) -> &'static str {
        self.get(name).text
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }
}

fn is_slot(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Substitute every `{{slot}}` in `text`. Substituted values are not
/// rescanned.
pub fn fill(name: &str, text: &str, bindings: &[(&str, &str)]) -> String {
    match try_fill(text, bindings) {
        Ok(out) => out,
        Err(slot) => panic!("template `{}` has an unbound slot `{}`", name, slot),
    }
}

/// Like [`fill`], for text that does not come from the built-in tables.
/// Returns the name of the first unbound slot instead of panicking.
pub fn try_fill(text: &str, bindings: &[(&str, &str)]) -> Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) if is_slot(after[..end].trim()) => {
                let slot = after[..end].trim();
                match bindings.iter().find(|(k, _)| *k == slot) {
                    Some((_, value)) => out.push_str(value),
                    None => return Err(slot.to_string()),
                }
                rest = &after[end + 2..];
            }
            _ => {
                out.push('{');
                rest = &rest[start + 1..];
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_substitutes_slots() {
        let out = fill("t", "if ({{a}} <= {{ b }}) {", &[("a", "x[0]"), ("b", "0.5")]);
        assert_eq!(out, "if (x[0] <= 0.5) {");
    }

    #[test]
    fn test_fill_keeps_outer_braces() {
        assert_eq!(fill("t", "{{{values}}}", &[("values", "1, 2")]), "{1, 2}");
        assert_eq!(
            fill("t", "[]{{type}}{{values}}", &[("type", "int"), ("values", "{1}")]),
            "[]int{1}"
        );
    }

    #[test]
    fn test_fill_leaves_non_slot_braces_alone() {
        let text = "int c[2] = {0}; {{ not a slot }} {{";
        assert_eq!(fill("t", text, &[]), text);
    }

    #[test]
    fn test_fill_does_not_rescan_values() {
        assert_eq!(fill("t", "{{a}}", &[("a", "{{b}}")]), "{{b}}");
    }

    #[test]
    fn test_try_fill_reports_unbound_slot() {
        assert_eq!(try_fill("gcc {{src}} -o {{out}}", &[("src", "a.c")]), Err("out".to_string()));
    }

    #[test]
    #[should_panic(expected = "unbound slot `missing`")]
    fn test_fill_panics_on_unbound_slot() {
        fill("t", "{{missing}}", &[]);
    }

    #[test]
    #[should_panic(expected = "no template `nope` for Ruby")]
    fn test_missing_template_panics() {
        TemplateSet::load(Language::Ruby).get("nope");
    }

    #[test]
    fn test_every_language_has_the_tree_templates() {
        let required = [
            "int",
            "double",
            "indent",
            "arr[]",
            "arr[][]",
            "in_brackets",
            "if",
            "else",
            "endif",
            "assign",
            "join",
            "output.predict",
            "output.predict_proba",
            "tree.methods",
            "tree.attached",
            "tree.combined",
        ];
        for language in Language::ALL {
            let set = TemplateSet::load(language);
            for name in required {
                assert!(set.has(name), "{} lacks `{}`", language, name);
            }
        }
    }

    #[test]
    fn test_mlp_languages_have_the_mlp_templates() {
        for language in [Language::Java, Language::JavaScript] {
            let set = TemplateSet::load(language);
            for name in [
                "arr[][][]",
                "mlp.class",
                "mlp.attached",
                "mlp.exported",
                "mlp.classifier",
                "activation.hidden.identity",
                "activation.hidden.logistic",
                "activation.hidden.tanh",
                "activation.hidden.relu",
                "activation.output.identity",
                "activation.output.logistic",
                "activation.output.softmax",
            ] {
                assert!(set.has(name), "{} lacks `{}`", language, name);
            }
        }
        assert!(TemplateSet::load(Language::JavaScript).has("mlp.regressor"));
    }

    #[test]
    fn test_template_names_are_unique() {
        for language in Language::ALL {
            let set = TemplateSet::load(language);
            let mut names: Vec<&str> = set.names().collect();
            let total = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), total, "duplicate template in {}", language);
        }
    }
}
