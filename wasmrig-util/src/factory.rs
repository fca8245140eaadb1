use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Result};

use crate::split_bracketed;

type BuildFn<C, T> = Box<dyn Sync + Send + for<'a> Fn(&'a C, Option<&'a str>) -> Result<Box<T>>>;

/// Name-keyed table of constructors for trait objects.
///
/// Entries are selected with `name` or `name[arg]`; the optional argument is
/// handed to the constructor.
pub struct Registry<C, T: ?Sized> {
    table: BTreeMap<&'static str, BuildFn<C, T>>,
    default: Option<&'static str>,
}

impl<C, T: ?Sized> Registry<C, T> {
    pub fn new() -> Self {
        Self {
            table: BTreeMap::new(),
            default: None,
        }
    }

    pub fn add<F>(mut self, name: &'static str, builder: F) -> Self
    where
        F: Sync + Send + for<'a> Fn(&'a C, Option<&'a str>) -> Result<Box<T>> + 'static,
    {
        self.table.insert(name, Box::new(builder));
        self
    }

    pub fn with_default(mut self, name: &'static str) -> Self {
        self.default = Some(name);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.table.keys().copied()
    }

    pub fn build(&self, context: &C, selector: Option<&str>) -> Result<Box<T>> {
        let Some(selector) = selector.or(self.default) else {
            bail!("no entry selected and no default available");
        };
        let Some((name, arg)) = split_bracketed(selector) else {
            bail!("invalid selector: {:?}", selector);
        };
        let Some(builder) = self.table.get(name) else {
            bail!(
                "unknown entry: {} (expected one of: {})",
                name,
                self.names().collect::<Vec<_>>().join(", ")
            );
        };
        builder(context, arg).map_err(|e| anyhow!("{}: {}", selector, e))
    }
}

impl<C, T: ?Sized> Default for Registry<C, T> {
    fn default() -> Self {
        Self::new()
    }
}
