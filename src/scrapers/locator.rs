use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Element, Tab};
use tracing::debug;

use super::errors::StepError;

/// One way of addressing an element on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Css(String),
    XPath(String),
}

impl Rule {
    /// Address an element by DOM id. The portal uses bare numbers as ids
    /// for some options, which `#id` selectors cannot express, so the
    /// attribute form is used throughout.
    pub fn by_id(id: &str) -> Rule {
        Rule::Css(format!("[id='{id}']"))
    }

    /// Address an option inside a dropdown list by its visible text.
    pub fn option_with_text(list_id: &str, needle: &str) -> Rule {
        Rule::XPath(format!(
            "//ul[@id='{list_id}']//li[contains(text(), '{needle}')]"
        ))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Css(selector) => write!(f, "css {selector}"),
            Rule::XPath(xpath) => write!(f, "xpath {xpath}"),
        }
    }
}

fn describe(rules: &[Rule]) -> String {
    rules
        .iter()
        .map(Rule::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Resolves rule cascades against a live tab.
///
/// Rules are tried left to right, each with a bounded wait; the first one
/// that yields an element wins. Resolved elements are scrolled to the
/// middle of the viewport before they are handed out, so every caller
/// interacts with something actually on screen.
pub struct Resolver {
    tab: Arc<Tab>,
    timeout: Duration,
}

impl Resolver {
    pub fn new(tab: Arc<Tab>, timeout: Duration) -> Self {
        Self { tab, timeout }
    }

    /// First element matched by any rule in the cascade.
    pub fn resolve(&self, rules: &[Rule]) -> Result<Element<'_>, StepError> {
        for rule in rules {
            let found = match rule {
                Rule::Css(selector) => self
                    .tab
                    .wait_for_element_with_custom_timeout(selector, self.timeout),
                Rule::XPath(xpath) => self
                    .tab
                    .wait_for_xpath_with_custom_timeout(xpath, self.timeout),
            };
            match found {
                Ok(element) => {
                    debug!(%rule, "locator rule matched");
                    center(&element, rules)?;
                    return Ok(element);
                }
                Err(error) => debug!(%rule, %error, "locator rule missed"),
            }
        }
        Err(StepError::NotFound {
            target: describe(rules),
            timeout: self.timeout,
        })
    }

    /// Resolve and click. If the native click is intercepted (overlays,
    /// sticky headers), activate the element from script instead.
    pub fn click(&self, rules: &[Rule]) -> Result<(), StepError> {
        let element = self.resolve(rules)?;
        if let Err(error) = element.click() {
            debug!(%error, "native click failed, activating from script");
            element
                .call_js_fn("function() { this.click(); }", vec![], false)
                .map_err(|_| StepError::NotInteractable {
                    target: describe(rules),
                })?;
        }
        Ok(())
    }

    /// Resolve and replace the element's current text with `text`.
    pub fn type_into(&self, rules: &[Rule], text: &str) -> Result<(), StepError> {
        let element = self.resolve(rules)?;
        element
            .call_js_fn("function() { this.value = ''; }", vec![], false)
            .and_then(|_| element.type_into(text).map(|_| ()))
            .map_err(|_| StepError::NotInteractable {
                target: describe(rules),
            })
    }
}

/// Scrolling into a centered position is a precondition for interaction,
/// not an optimization: the portal keeps controls under sticky chrome
/// that swallows clicks on off-center elements.
fn center(element: &Element<'_>, rules: &[Rule]) -> Result<(), StepError> {
    element
        .call_js_fn(
            "function() { this.scrollIntoView({block: 'center', inline: 'nearest'}); }",
            vec![],
            false,
        )
        .map(|_| ())
        .map_err(|_| StepError::NotInteractable {
            target: describe(rules),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_id_uses_the_attribute_form() {
        assert_eq!(Rule::by_id("18"), Rule::Css("[id='18']".to_string()));
        assert_eq!(
            Rule::by_id("TipoVaga"),
            Rule::Css("[id='TipoVaga']".to_string())
        );
    }

    #[test]
    fn option_with_text_scopes_to_the_list() {
        assert_eq!(
            Rule::option_with_text("ComboCidade", "BRASÍLIA - DF"),
            Rule::XPath(
                "//ul[@id='ComboCidade']//li[contains(text(), 'BRASÍLIA - DF')]".to_string()
            )
        );
    }

    #[test]
    fn cascades_describe_every_rule() {
        let rules = [Rule::by_id("estagio"), Rule::option_with_text("ComboTipoVaga", "ESTÁGIO")];
        let description = describe(&rules);
        assert!(description.contains("[id='estagio']"));
        assert!(description.contains("ComboTipoVaga"));
    }
}
