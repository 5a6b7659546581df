//! Resource tree view

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use crate::app::{App, Focus};
use inventory_console::tree::VisibleRow;

pub struct ResourceTreeView;

impl ResourceTreeView {
    pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
        let items: Vec<ListItem> = app.tree.visible_rows().iter().map(tree_item).collect();

        let title = if app.tree.is_refreshing() {
            " Resources (loading...) ".to_string()
        } else {
            format!(" Resources ({} roots) ", app.tree.roots().len())
        };
        let border_style = if app.focus == Focus::Tree {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(title),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        frame.render_stateful_widget(list, area, &mut app.tree_state);
    }
}

/// Marker shown before a node: unfetched, expanded, collapsed or leaf
pub fn node_marker(row: &VisibleRow<'_>) -> &'static str {
    let node = row.node;
    if node.loading {
        "…"
    } else if node.lazy_load {
        "▸"
    } else if node.children.is_empty() {
        "·"
    } else if node.expanded {
        "▾"
    } else {
        "▸"
    }
}

fn tree_item(row: &VisibleRow<'_>) -> ListItem<'static> {
    let indent = "  ".repeat(row.depth);
    let type_id = row.node.resource.type_id().to_string();
    let name = row.node.resource.name.clone();

    ListItem::new(Line::from(vec![
        Span::raw(format!("{indent}{} ", node_marker(row))),
        Span::styled(format!("[{type_id}]"), Style::default().fg(Color::Yellow)),
        Span::raw(format!(" {name}")),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_console::model::Resource;
    use inventory_console::tree::{NodePath, TreeNode};

    fn row(node: &TreeNode) -> VisibleRow<'_> {
        VisibleRow {
            node,
            path: NodePath::root(0),
            depth: 0,
        }
    }

    #[test]
    fn test_node_markers() {
        let mut node = TreeNode::from_resource(Resource::new("s1", "alpha", "Server"));
        assert_eq!(node_marker(&row(&node)), "▸");

        node.lazy_load = false;
        assert_eq!(node_marker(&row(&node)), "·");

        node.children
            .push(TreeNode::from_resource(Resource::new("c", "child", "Datasource")));
        node.expanded = true;
        assert_eq!(node_marker(&row(&node)), "▾");

        node.loading = true;
        assert_eq!(node_marker(&row(&node)), "…");
    }
}
