//! Destructure/structure codec.
//!
//! A value is split into a **class tree** (type tags plus how many numeric
//! values each node owns) and a **numeric tree** with the same shape. The
//! class tree alone fixes the layout, so the numeric side can be flattened
//! into a plain `Vec<f64>` (e.g. for an optimizer) and rebuilt later.
//!
//! Leaves are laid out depth-first, pre-order: a node's own values come
//! before the values of its children.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Type-identity part of a destructured value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassNode {
    /// Registry tag of the node type (e.g. `"logistic"`, `"scale"`).
    pub tag: String,
    /// Number of numeric values owned directly by this node.
    pub n_values: usize,
    /// Class trees of owned collaborators, in order.
    pub children: Vec<ClassNode>,
}

impl ClassNode {
    /// Total number of numeric leaves described by this tree.
    ///
    /// Trees deserialized from untrusted input may declare absurd counts, so
    /// the sum is checked.
    pub fn n_leaves(&self) -> Result<usize> {
        self.children.iter().try_fold(self.n_values, |acc, child| {
            acc.checked_add(child.n_leaves()?).ok_or_else(|| {
                Error::Structure(format!("'{}' declares more leaves than fit in usize", self.tag))
            })
        })
    }
}

/// Numeric part of a destructured value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericNode {
    /// Values owned directly by this node.
    pub values: Vec<f64>,
    /// Numeric trees of owned collaborators, in order.
    pub children: Vec<NumericNode>,
}

/// A value split into `(class parts, numeric parts)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destructured {
    /// Type tree.
    pub classes: ClassNode,
    /// Numeric tree, same shape as `classes`.
    pub numeric: NumericNode,
}

impl Destructured {
    /// Build a node from its own tag and values plus already-destructured children.
    pub fn node(tag: impl Into<String>, values: Vec<f64>, children: Vec<Destructured>) -> Self {
        let (class_children, numeric_children) =
            children.into_iter().map(|c| (c.classes, c.numeric)).unzip();
        Self {
            classes: ClassNode { tag: tag.into(), n_values: values.len(), children: class_children },
            numeric: NumericNode { values, children: numeric_children },
        }
    }

    /// Tag of the root node.
    pub fn tag(&self) -> &str {
        &self.classes.tag
    }

    /// Values owned by the root node.
    pub fn values(&self) -> &[f64] {
        &self.numeric.values
    }

    /// Number of child nodes.
    pub fn n_children(&self) -> usize {
        self.classes.children.len()
    }

    /// Reassemble the `i`-th child as a standalone tree.
    pub fn child(&self, i: usize) -> Result<Destructured> {
        match (self.classes.children.get(i), self.numeric.children.get(i)) {
            (Some(c), Some(n)) => Ok(Destructured { classes: c.clone(), numeric: n.clone() }),
            _ => Err(Error::Structure(format!(
                "'{}' has no child {i} (class children: {}, numeric children: {})",
                self.tag(),
                self.classes.children.len(),
                self.numeric.children.len()
            ))),
        }
    }

    /// Fail unless the root tag equals `tag`.
    pub fn expect_tag(&self, tag: &str) -> Result<()> {
        if self.tag() != tag {
            return Err(Error::Structure(format!("expected tag '{tag}', got '{}'", self.tag())));
        }
        Ok(())
    }

    /// Fail unless the root owns exactly `n` values and `n_children` children.
    pub fn expect_arity(&self, n: usize, n_children: usize) -> Result<()> {
        if self.numeric.values.len() != n || self.classes.n_values != n {
            return Err(Error::Structure(format!(
                "'{}' expects {n} values, got {} (class tree declares {})",
                self.tag(),
                self.numeric.values.len(),
                self.classes.n_values
            )));
        }
        if self.n_children() != n_children || self.numeric.children.len() != n_children {
            return Err(Error::Structure(format!(
                "'{}' expects {n_children} children, got {}",
                self.tag(),
                self.n_children()
            )));
        }
        Ok(())
    }

    /// Split into the class tree and a flat vector of numeric leaves.
    pub fn flatten(&self) -> (ClassNode, Vec<f64>) {
        let mut leaves = Vec::with_capacity(self.numeric.values.len());
        collect_leaves(&self.numeric, &mut leaves);
        (self.classes.clone(), leaves)
    }

    /// Inverse of [`Self::flatten`].
    pub fn unflatten(classes: &ClassNode, leaves: &[f64]) -> Result<Destructured> {
        let expected = classes.n_leaves()?;
        if leaves.len() != expected {
            return Err(Error::Structure(format!(
                "'{}' expects {expected} numeric leaves, got {}",
                classes.tag,
                leaves.len()
            )));
        }
        let mut cursor = 0usize;
        let numeric = rebuild_numeric(classes, leaves, &mut cursor)?;
        Ok(Destructured { classes: classes.clone(), numeric })
    }
}

fn collect_leaves(node: &NumericNode, out: &mut Vec<f64>) {
    out.extend_from_slice(&node.values);
    for child in &node.children {
        collect_leaves(child, out);
    }
}

fn rebuild_numeric(classes: &ClassNode, leaves: &[f64], cursor: &mut usize) -> Result<NumericNode> {
    let values = cursor
        .checked_add(classes.n_values)
        .and_then(|end| leaves.get(*cursor..end))
        .ok_or_else(|| {
            Error::Structure(format!(
                "'{}' needs {} values at leaf offset {}, only {} leaves given",
                classes.tag,
                classes.n_values,
                cursor,
                leaves.len()
            ))
        })?
        .to_vec();
    *cursor += classes.n_values;
    let children = classes
        .children
        .iter()
        .map(|c| rebuild_numeric(c, leaves, cursor))
        .collect::<Result<Vec<_>>>()?;
    Ok(NumericNode { values, children })
}

/// Types that can be split into a [`Destructured`] tree and rebuilt from one.
pub trait Structured {
    /// Split `self` into class and numeric parts.
    fn destructure(&self) -> Destructured;

    /// Rebuild a value from its destructured form.
    fn structure(params: &Destructured) -> Result<Self>
    where
        Self: Sized;
}
