use crate::graph::NodeId;
use crate::transform::Point;
use std::fmt;

/// An entry of a context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Opens the template picker at the same anchor.
    NewNode,
    NewTemplateNode,
    Delete,
    AddTerminal,
    RemoveTerminal,
    AddParameter,
    RemoveParameter,
    SetTemplate(String),
}

const SET_TEMPLATE_PREFIX: &str = "Set Template: ";

impl MenuAction {
    /// Text shown for the entry.
    pub fn label(&self) -> String {
        match self {
            MenuAction::NewNode => "New Node".to_string(),
            MenuAction::NewTemplateNode => "New Template Node".to_string(),
            MenuAction::Delete => "Delete".to_string(),
            MenuAction::AddTerminal => "Add Terminal".to_string(),
            MenuAction::RemoveTerminal => "Remove Terminal".to_string(),
            MenuAction::AddParameter => "Add Parameter".to_string(),
            MenuAction::RemoveParameter => "Remove Parameter".to_string(),
            MenuAction::SetTemplate(name) => format!("{}{}", SET_TEMPLATE_PREFIX, name),
        }
    }

    /// Parses an entry label back into its action.
    pub fn from_label(label: &str) -> Option<Self> {
        let action = match label {
            "New Node" => MenuAction::NewNode,
            "New Template Node" => MenuAction::NewTemplateNode,
            "Delete" => MenuAction::Delete,
            "Add Terminal" => MenuAction::AddTerminal,
            "Remove Terminal" => MenuAction::RemoveTerminal,
            "Add Parameter" => MenuAction::AddParameter,
            "Remove Parameter" => MenuAction::RemoveParameter,
            other => MenuAction::SetTemplate(other.strip_prefix(SET_TEMPLATE_PREFIX)?.to_string()),
        };
        Some(action)
    }

    /// Whether the action operates on the selected node.
    pub fn needs_node(&self) -> bool {
        matches!(
            self,
            MenuAction::Delete
                | MenuAction::AddTerminal
                | MenuAction::RemoveTerminal
                | MenuAction::AddParameter
                | MenuAction::RemoveParameter
        )
    }
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// An open context menu: what to show and where it was opened.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    /// Top-left corner in view space. Actions that place or edit something use it
    /// as their location.
    pub anchor: Point,
    /// Node the menu was opened on, if any.
    pub node: Option<NodeId>,
    pub items: Vec<MenuAction>,
}

impl ContextMenu {
    pub fn new(anchor: Point, node: Option<NodeId>, items: Vec<MenuAction>) -> Self {
        Self {
            anchor,
            node,
            items,
        }
    }

    pub fn labels(&self) -> Vec<String> {
        self.items.iter().map(MenuAction::label).collect()
    }

    pub fn contains(&self, action: &MenuAction) -> bool {
        self.items.contains(action)
    }
}
