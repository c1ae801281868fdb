//! A table-driven [`StyleEngine`].
//!
//! Utilities are plain `token → declarations` entries and shortcuts expand
//! recursively into utilities or other shortcuts. This is enough to drive the
//! transform end to end without a full rule engine, and it is what the tests
//! and benchmarks run against.

use rustc_hash::FxHashSet;

use super::{EngineError, GenerateOptions, ParsedUtil, Shortcut, StyleEngine};
use crate::FxIndexMap;
use crate::escape::escape_selector;

/// Engine backed by static utility and shortcut tables.
#[derive(Debug, Clone, Default)]
pub struct StaticEngine {
    utilities: FxIndexMap<String, String>,
    shortcuts: Vec<Shortcut>,
    preflights: Vec<String>,
    safelist: Vec<String>,
}

impl StaticEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a utility, e.g. `("mb-1", "margin-bottom:0.25rem")`.
    ///
    /// Several declarations may be separated with `;`.
    #[must_use]
    pub fn with_utility(mut self, token: impl Into<String>, declarations: impl Into<String>) -> Self {
        self.utilities.insert(token.into(), declarations.into());
        self
    }

    /// Add a static shortcut.
    #[must_use]
    pub fn with_shortcut<I, S>(mut self, name: impl Into<String>, expansion: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shortcuts.push(Shortcut::new(name, expansion));
        self
    }

    /// Add preflight CSS, emitted when [`GenerateOptions::preflights`] is set.
    #[must_use]
    pub fn with_preflight(mut self, css: impl Into<String>) -> Self {
        self.preflights.push(css.into());
        self
    }

    /// Add a token that is always generated when [`GenerateOptions::safelist`] is set.
    #[must_use]
    pub fn with_safelist(mut self, token: impl Into<String>) -> Self {
        self.safelist.push(token.into());
        self
    }

    fn utility(&self, token: &str) -> Option<ParsedUtil> {
        let (index, _, body) = self.utilities.get_full(token)?;
        Some(ParsedUtil {
            index,
            selector: format!(".{}", escape_selector(token)),
            body: body.clone(),
        })
    }

    fn shortcut(&self, name: &str) -> Option<&Shortcut> {
        self.shortcuts.iter().find(|shortcut| shortcut.name == name)
    }

    /// Expand a shortcut into the utilities it eventually refers to.
    ///
    /// Unknown tokens are skipped and cycles are cut at the first repeat.
    fn expand<'a>(&'a self, name: &'a str, seen: &mut FxHashSet<&'a str>, out: &mut Vec<ParsedUtil>) {
        if !seen.insert(name) {
            return;
        }
        let Some(shortcut) = self.shortcut(name) else {
            return;
        };
        for token in &shortcut.expansion {
            if self.shortcut(token).is_some() {
                self.expand(token, seen, out);
            } else if let Some(util) = self.utility(token) {
                out.push(util);
            }
        }
    }
}

impl StyleEngine for StaticEngine {
    fn resolve_token(&self, token: &str) -> Result<Option<Vec<ParsedUtil>>, EngineError> {
        if self.shortcut(token).is_some() {
            let mut utils = Vec::new();
            self.expand(token, &mut FxHashSet::default(), &mut utils);
            return Ok((!utils.is_empty()).then_some(utils));
        }
        Ok(self.utility(token).map(|util| vec![util]))
    }

    fn shortcuts(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    fn shortcuts_mut(&mut self) -> &mut Vec<Shortcut> {
        &mut self.shortcuts
    }

    fn generate(&self, selectors: &[String], options: &GenerateOptions) -> Result<String, EngineError> {
        let mut requested: Vec<&str> = Vec::with_capacity(selectors.len());
        let mut seen = FxHashSet::default();
        let safelist: &[String] = if options.safelist { &self.safelist } else { &[] };
        for token in selectors.iter().chain(safelist) {
            if seen.insert(token.as_str()) {
                requested.push(token);
            }
        }

        let mut shortcut_rules = Vec::new();
        let mut utility_rules = Vec::new();
        for token in requested {
            if self.shortcut(token).is_some() {
                let mut utils = Vec::new();
                self.expand(token, &mut FxHashSet::default(), &mut utils);
                if !utils.is_empty() {
                    let bodies: Vec<&str> = utils.iter().map(|util| util.body.as_str()).collect();
                    shortcut_rules.push(print_rule(token, &bodies));
                }
            } else if let Some(util) = self.utility(token) {
                let rule = print_rule(token, &[util.body.as_str()]);
                utility_rules.push((util.index, rule));
            }
        }
        utility_rules.sort_by_key(|(index, _)| *index);

        let mut css = String::new();
        if options.preflights {
            push_layer(&mut css, options.minify, "preflights", self.preflights.iter().map(String::as_str));
        }
        push_layer(&mut css, options.minify, "shortcuts", shortcut_rules.iter().map(String::as_str));
        push_layer(
            &mut css,
            options.minify,
            "default",
            utility_rules.iter().map(|(_, rule)| rule.as_str()),
        );

        Ok(css)
    }
}

fn push_layer<'r>(css: &mut String, minify: bool, name: &str, rules: impl IntoIterator<Item = &'r str>) {
    let mut rules = rules.into_iter().peekable();
    if rules.peek().is_none() {
        return;
    }
    if !minify {
        css.push_str("/* layer: ");
        css.push_str(name);
        css.push_str(" */\n");
    }
    for rule in rules {
        css.push_str(rule);
        if !minify {
            css.push('\n');
        }
    }
}

/// Print `.{token}{decl;decl;…}`, dropping repeated declarations.
fn print_rule(token: &str, bodies: &[&str]) -> String {
    let mut declarations: Vec<&str> = Vec::new();
    for declaration in bodies.iter().flat_map(|body| body.split(';')) {
        let declaration = declaration.trim();
        if !declaration.is_empty() && !declarations.contains(&declaration) {
            declarations.push(declaration);
        }
    }

    let mut rule = format!(".{}{{", escape_selector(token));
    for declaration in declarations {
        rule.push_str(declaration);
        rule.push(';');
    }
    rule.push('}');
    rule
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> StaticEngine {
        StaticEngine::new()
            .with_utility("mb-1", "margin-bottom:0.25rem")
            .with_utility("mr-1", "margin-right:0.25rem")
            .with_utility("px-1", "padding-left:0.25rem;padding-right:0.25rem")
            .with_utility("sm:p-2", "padding:0.5rem")
            .with_shortcut("btn", ["px-1", "mb-1"])
            .with_shortcut("btn-wide", ["btn", "mr-1", "unknown"])
            .with_preflight("*,::before{box-sizing:border-box;}")
            .with_safelist("mr-1")
    }

    #[test]
    fn test_resolve_utility() {
        let utils = engine().resolve_token("mb-1").unwrap().unwrap();
        assert_eq!(
            utils,
            vec![ParsedUtil {
                index: 0,
                selector: ".mb-1".to_string(),
                body: "margin-bottom:0.25rem".to_string(),
            }]
        );
        assert_eq!(engine().resolve_token("foo").unwrap(), None);
    }

    #[test]
    fn test_resolve_nested_shortcut() {
        let utils = engine().resolve_token("btn-wide").unwrap().unwrap();
        let bodies: Vec<_> = utils.iter().map(|u| u.body.as_str()).collect();
        assert_eq!(
            bodies,
            ["padding-left:0.25rem;padding-right:0.25rem", "margin-bottom:0.25rem", "margin-right:0.25rem"]
        );
    }

    #[test]
    fn test_shortcut_cycle_terminates() {
        let engine = StaticEngine::new()
            .with_utility("mb-1", "margin-bottom:0.25rem")
            .with_shortcut("a", ["b", "mb-1"])
            .with_shortcut("b", ["a"]);
        let utils = engine.resolve_token("a").unwrap().unwrap();
        assert_eq!(utils.len(), 1);
    }

    #[test]
    fn test_generate_minified_component_css() {
        let css = engine()
            .generate(
                &["mb-1".to_string(), "btn".to_string(), "sm:p-2".to_string(), "foo".to_string()],
                &GenerateOptions::component(),
            )
            .unwrap();
        assert_eq!(
            css,
            ".btn{padding-left:0.25rem;padding-right:0.25rem;margin-bottom:0.25rem;}\
             .mb-1{margin-bottom:0.25rem;}\
             .sm\\:p-2{padding:0.5rem;}"
        );
    }

    #[test]
    fn test_generate_pretty_with_preflights_and_safelist() {
        let css = engine().generate(&["mb-1".to_string()], &GenerateOptions::default()).unwrap();
        assert_eq!(
            css,
            "/* layer: preflights */\n\
             *,::before{box-sizing:border-box;}\n\
             /* layer: default */\n\
             .mb-1{margin-bottom:0.25rem;}\n\
             .mr-1{margin-right:0.25rem;}\n"
        );
    }

    #[test]
    fn test_generate_sorts_utilities_by_rule_order() {
        let css = engine()
            .generate(&["mr-1".to_string(), "mb-1".to_string()], &GenerateOptions::component())
            .unwrap();
        assert_eq!(css, ".mb-1{margin-bottom:0.25rem;}.mr-1{margin-right:0.25rem;}");
    }
}
