use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::action::Action;

/// Separator between a flattened leaf and the folder chain it lives in.
pub const SUFFIX_SEP: &str = "    (";

/// Ordered key -> node mapping; file order is kept for every config format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Menu {
    entries: Vec<(String, MenuNode)>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MenuNode {
    /// `"Key": "command"`
    Command(String),
    /// `{ "label": .., "icon": .., "items": { .. } }`
    Folder(Folder),
    /// `{ "cmd": .., "label": .., "icon": .. }`
    Leaf(Leaf),
    /// A bare object without `cmd`: its own keys are the children.
    Group(Menu),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Folder {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    pub items: Menu,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Leaf {
    pub cmd: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl Menu {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; a replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, node: MenuNode) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = node;
        } else {
            self.entries.push((key, node));
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MenuNode> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MenuNode)> {
        self.entries.iter().map(|(k, n)| (k.as_str(), n))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for Menu {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MenuVisitor;

        impl<'de> Visitor<'de> for MenuVisitor {
            type Value = Menu;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of menu entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Menu, A::Error> {
                let mut menu = Menu::new();
                while let Some((key, node)) = map.next_entry::<String, MenuNode>()? {
                    menu.insert(key, node);
                }
                Ok(menu)
            }
        }

        deserializer.deserialize_map(MenuVisitor)
    }
}

impl MenuNode {
    /// The command of a leaf; `None` for folders.
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::Command(c) => Some(c),
            Self::Leaf(l) => Some(&l.cmd),
            Self::Folder(_) | Self::Group(_) => None,
        }
    }

    /// Children of a folder; `None` for leaves.
    #[must_use]
    pub fn children(&self) -> Option<&Menu> {
        match self {
            Self::Folder(f) => Some(&f.items),
            Self::Group(m) => Some(m),
            Self::Command(_) | Self::Leaf(_) => None,
        }
    }

    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.children().is_some()
    }

    /// Display label, falling back to the entry's key.
    #[must_use]
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        match self {
            Self::Folder(Folder { label: Some(l), .. }) | Self::Leaf(Leaf { label: Some(l), .. }) => {
                l
            }
            _ => key,
        }
    }

    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        match self {
            Self::Folder(f) => f.icon.as_deref(),
            Self::Leaf(l) => l.icon.as_deref(),
            Self::Command(_) | Self::Group(_) => None,
        }
    }
}

/// Flatten the tree into `(display, leaf)` pairs for global search.
///
/// Nested leaves read `"<label>    (<A> > <B>)"`. A later duplicate display
/// replaces the earlier leaf but keeps its position.
#[must_use]
pub fn flatten(menu: &Menu) -> Vec<(String, &MenuNode)> {
    fn walk<'a>(menu: &'a Menu, prefix: &str, out: &mut Vec<(String, &'a MenuNode)>) {
        for (key, node) in menu.iter() {
            let label = node.label(key);
            if let Some(children) = node.children() {
                let next = if prefix.is_empty() {
                    label.to_string()
                } else {
                    format!("{prefix} > {label}")
                };
                walk(children, &next, out);
            } else {
                let display = if prefix.is_empty() {
                    label.to_string()
                } else {
                    format!("{label}{SUFFIX_SEP}{prefix})")
                };
                if let Some(slot) = out.iter_mut().find(|(d, _)| *d == display) {
                    slot.1 = node;
                } else {
                    out.push((display, node));
                }
            }
        }
    }

    let mut out = Vec::new();
    walk(menu, "", &mut out);
    out
}

/// Walk `path` through folders. `None` when a key is missing or names a leaf.
#[must_use]
pub fn resolve<'a>(root: &'a Menu, path: &[String]) -> Option<&'a Menu> {
    let mut menu = root;
    for key in path {
        menu = menu.get(key)?.children()?;
    }
    Some(menu)
}

/// Validate menu structure and commands. Returns a list of human-readable issues.
#[must_use]
pub fn validate(root: &Menu) -> Vec<String> {
    fn walk(menu: &Menu, path: &mut Vec<String>, out: &mut Vec<String>) {
        for (key, node) in menu.iter() {
            path.push(key.to_string());
            let here = path.join(" > ");
            match node.children() {
                Some(children) => {
                    if children.is_empty() {
                        out.push(format!("Menu folder '{here}' has no items"));
                    }
                    walk(children, path, out);
                }
                None => {
                    let cmd = node.command().unwrap_or_default();
                    if let Some(issue) = command_issue(cmd) {
                        out.push(format!("Menu item '{here}' {issue}"));
                    }
                }
            }
            path.pop();
        }
    }

    let mut issues = Vec::new();
    walk(root, &mut Vec::new(), &mut issues);

    // flatten() merges duplicate displays, so a shortfall means shadowed leaves
    let shown = flatten(root).len();
    let leaves = count_leaves(root);
    if leaves > shown {
        issues.push(format!(
            "{} menu entries share a search label with another entry and are hidden from the hub",
            leaves - shown
        ));
    }
    issues
}

fn count_leaves(menu: &Menu) -> usize {
    menu.iter()
        .map(|(_, n)| n.children().map_or(1, count_leaves))
        .sum()
}

fn command_issue(cmd: &str) -> Option<String> {
    if cmd.trim().is_empty() {
        return Some("has an empty command".to_string());
    }
    match Action::parse(cmd) {
        Action::Internal(name) => Some(format!("uses unknown internal action '{name}'")),
        Action::Terminal(rest) | Action::Edit(rest) | Action::Web(rest)
            if rest.trim().is_empty() =>
        {
            let prefix = cmd.split_once(':').map_or(cmd, |(p, _)| p);
            Some(format!("has nothing after '{prefix}:'"))
        }
        _ => None,
    }
}
