//! # XPath Evaluation
//!
//! Compiled path expressions over document trees, covering the subset
//! message-inspection code needs: child and descendant steps, wildcards,
//! positional predicates, terminal `text()` and `@attribute` steps.
//!
//! Expressions compile once and evaluate any number of times against any
//! context element. Evaluation either yields a complete value in the
//! requested shape or fails; partial results are never returned.

use super::document::Element;
use super::errors::{XmlError, XmlResult};

/// Shape the caller expects an evaluation to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XPathReturnType {
    /// The matched elements themselves
    NodeSet,
    /// String value of the first match (empty string when nothing matches)
    String,
    /// Numeric value of the first match
    Number,
    /// Whether anything matched
    Boolean,
}

/// Result of an XPath evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum XPathValue<'a> {
    /// Matched elements in document order
    Nodes(Vec<&'a Element>),
    /// String value
    Text(String),
    /// Numeric value
    Number(f64),
    /// Boolean value
    Boolean(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeTest {
    Name {
        prefix: Option<String>,
        local: String,
    },
    Wildcard,
    Text,
    Attribute(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    test: NodeTest,
    /// 1-based index into the step's matches, applied in document order
    position: Option<usize>,
}

/// A compiled XPath expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPathExpression {
    source: String,
    absolute: bool,
    steps: Vec<Step>,
}

impl XPathExpression {
    /// Compile an expression
    ///
    /// An absolute expression (`/hello/capabilities`) matches its first
    /// step against the context element itself; a relative expression
    /// starts at the context element's children. A name test without a
    /// prefix matches by local name; a prefixed test also requires the
    /// element's prefix to match.
    pub fn compile(expression: &str) -> XmlResult<Self> {
        let source = expression.trim();
        if source.is_empty() {
            return Err(XmlError::xpath("empty expression"));
        }

        let absolute = source.starts_with('/');
        let mut steps = Vec::new();
        let mut descendant = false;
        let mut leading = true;
        for part in source.split('/') {
            if part.is_empty() {
                if leading {
                    leading = false;
                    continue;
                }
                if descendant {
                    return Err(XmlError::xpath(format!("invalid `///` in `{source}`")));
                }
                descendant = true;
                continue;
            }
            leading = false;
            let axis = if descendant {
                Axis::Descendant
            } else {
                Axis::Child
            };
            descendant = false;
            steps.push(parse_step(part, axis, source)?);
        }
        if descendant {
            return Err(XmlError::xpath(format!("`{source}` ends with `//`")));
        }
        if steps.is_empty() {
            return Err(XmlError::xpath(format!("`{source}` has no steps")));
        }
        for step in &steps[..steps.len() - 1] {
            if matches!(step.test, NodeTest::Text | NodeTest::Attribute(_)) {
                return Err(XmlError::xpath(format!(
                    "`text()` and `@attribute` must be the final step in `{source}`"
                )));
            }
        }

        Ok(Self {
            source: source.to_string(),
            absolute,
            steps,
        })
    }

    /// Source text the expression was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate against a context element, producing the requested shape
    pub fn evaluate<'a>(
        &self,
        context: &'a Element,
        shape: XPathReturnType,
    ) -> XmlResult<XPathValue<'a>> {
        let mut nodes: Vec<&'a Element> = vec![context];

        for (index, step) in self.steps.iter().enumerate() {
            match &step.test {
                NodeTest::Text => {
                    let pool = value_pool(&nodes, step.axis);
                    let mut values: Vec<String> = pool
                        .into_iter()
                        .map(|e| e.text())
                        .filter(|t| !t.is_empty())
                        .collect();
                    apply_position(&mut values, step.position);
                    return convert_values(values, shape, &self.source);
                }
                NodeTest::Attribute(name) => {
                    let pool = value_pool(&nodes, step.axis);
                    let mut values: Vec<String> = pool
                        .into_iter()
                        .filter_map(|e| e.attribute(name))
                        .map(str::to_string)
                        .collect();
                    apply_position(&mut values, step.position);
                    return convert_values(values, shape, &self.source);
                }
                test => {
                    let self_match =
                        index == 0 && self.absolute && matches!(step.axis, Axis::Child);
                    let pool = if self_match {
                        nodes.clone()
                    } else {
                        element_pool(&nodes, step.axis)
                    };
                    let mut matched: Vec<&Element> =
                        pool.into_iter().filter(|e| test_matches(test, e)).collect();
                    apply_position(&mut matched, step.position);
                    nodes = matched;
                }
            }
        }

        convert_nodes(nodes, shape, &self.source)
    }
}

fn parse_step(part: &str, axis: Axis, source: &str) -> XmlResult<Step> {
    let (body, position) = match part.find('[') {
        Some(open) => {
            let close = part
                .rfind(']')
                .filter(|&c| c == part.len() - 1)
                .ok_or_else(|| XmlError::xpath(format!("unterminated predicate in `{source}`")))?;
            let index: usize = part[open + 1..close].trim().parse().map_err(|_| {
                XmlError::xpath(format!("only positional predicates are supported in `{source}`"))
            })?;
            if index == 0 {
                return Err(XmlError::xpath(format!(
                    "positions are 1-based in `{source}`"
                )));
            }
            (&part[..open], Some(index))
        }
        None => (part, None),
    };

    let test = if body == "text()" {
        NodeTest::Text
    } else if let Some(attribute) = body.strip_prefix('@') {
        if attribute.is_empty() {
            return Err(XmlError::xpath(format!("empty attribute name in `{source}`")));
        }
        NodeTest::Attribute(attribute.to_string())
    } else if body == "*" {
        NodeTest::Wildcard
    } else if body.is_empty() {
        return Err(XmlError::xpath(format!("empty step in `{source}`")));
    } else {
        match body.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() => NodeTest::Name {
                prefix: Some(prefix.to_string()),
                local: local.to_string(),
            },
            Some(_) => {
                return Err(XmlError::xpath(format!("malformed name test in `{source}`")));
            }
            None => NodeTest::Name {
                prefix: None,
                local: body.to_string(),
            },
        }
    };

    Ok(Step {
        axis,
        test,
        position,
    })
}

fn test_matches(test: &NodeTest, element: &Element) -> bool {
    match test {
        NodeTest::Wildcard => true,
        NodeTest::Name { prefix, local } => {
            element.local_name() == local
                && match prefix {
                    Some(p) => element.prefix() == Some(p.as_str()),
                    None => true,
                }
        }
        NodeTest::Text | NodeTest::Attribute(_) => false,
    }
}

fn element_pool<'a>(nodes: &[&'a Element], axis: Axis) -> Vec<&'a Element> {
    let mut pool = Vec::new();
    for node in nodes {
        match axis {
            Axis::Child => pool.extend(node.child_elements()),
            Axis::Descendant => collect_descendants(node, &mut pool),
        }
    }
    pool
}

/// Nodes whose text/attributes a terminal value step reads: the current
/// nodes themselves for the child axis, every descendant for `//`
fn value_pool<'a>(nodes: &[&'a Element], axis: Axis) -> Vec<&'a Element> {
    match axis {
        Axis::Child => nodes.to_vec(),
        Axis::Descendant => element_pool(nodes, Axis::Descendant),
    }
}

fn collect_descendants<'a>(element: &'a Element, out: &mut Vec<&'a Element>) {
    for child in element.child_elements() {
        out.push(child);
        collect_descendants(child, out);
    }
}

fn apply_position<T>(matches: &mut Vec<T>, position: Option<usize>) {
    if let Some(position) = position {
        if position <= matches.len() {
            matches.swap(0, position - 1);
            matches.truncate(1);
        } else {
            matches.clear();
        }
    }
}

fn convert_nodes<'a>(
    nodes: Vec<&'a Element>,
    shape: XPathReturnType,
    source: &str,
) -> XmlResult<XPathValue<'a>> {
    match shape {
        XPathReturnType::NodeSet => Ok(XPathValue::Nodes(nodes)),
        XPathReturnType::String => Ok(XPathValue::Text(
            nodes.first().map(|e| e.text()).unwrap_or_default(),
        )),
        XPathReturnType::Number => parse_number(nodes.first().map(|e| e.text()), source),
        XPathReturnType::Boolean => Ok(XPathValue::Boolean(!nodes.is_empty())),
    }
}

fn convert_values<'a>(
    values: Vec<String>,
    shape: XPathReturnType,
    source: &str,
) -> XmlResult<XPathValue<'a>> {
    match shape {
        XPathReturnType::NodeSet => Err(XmlError::xpath(format!(
            "`{source}` selects values, not nodes"
        ))),
        XPathReturnType::String => Ok(XPathValue::Text(
            values.into_iter().next().unwrap_or_default(),
        )),
        XPathReturnType::Number => parse_number(values.into_iter().next(), source),
        XPathReturnType::Boolean => Ok(XPathValue::Boolean(!values.is_empty())),
    }
}

fn parse_number<'a>(value: Option<String>, source: &str) -> XmlResult<XPathValue<'a>> {
    let value =
        value.ok_or_else(|| XmlError::xpath(format!("`{source}` matched nothing to convert")))?;
    value
        .trim()
        .parse::<f64>()
        .map(XPathValue::Number)
        .map_err(|_| XmlError::xpath(format!("`{source}` value `{value}` is not a number")))
}
