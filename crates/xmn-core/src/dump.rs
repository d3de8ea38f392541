//! Text outline of a scene graph.

use std::io;

/// A node of the host's scene graph.
pub trait SceneNode {
    fn name(&self) -> &str;

    /// Type name of the node's transform.
    fn transform_kind(&self) -> &str;

    /// Type names of attached components; `None` for a missing component.
    fn components(&self) -> Vec<Option<String>>;

    fn children(&self) -> Vec<&Self>;
}

/// Render `node` and its subtree as an indented outline.
///
/// ```text
///   +Root (Transform)
///     Renderer
///     +Child (RectTransform)
///       (null)
/// ```
pub fn dump_scene<N: SceneNode>(node: &N) -> String {
    let mut out = String::new();
    dump_node(node, "  ", &mut |line| {
        out.push_str(line);
        out.push('\n');
    });
    out
}

/// Write the outline of `node` to `writer`.
pub fn dump_scene_to<N: SceneNode, W: io::Write>(node: &N, writer: &mut W) -> io::Result<()> {
    let mut result = Ok(());
    dump_node(node, "  ", &mut |line| {
        if result.is_ok() {
            result = writeln!(writer, "{}", line);
        }
    });
    result
}

fn dump_node<N: SceneNode>(node: &N, indent: &str, emit: &mut dyn FnMut(&str)) {
    emit(&format!("{}+{} ({})", indent, node.name(), node.transform_kind()));

    let inner = format!("{}  ", indent);
    for component in node.components() {
        emit(&format!(
            "{}{}",
            inner,
            component.as_deref().unwrap_or("(null)")
        ));
    }
    for child in node.children() {
        dump_node(child, &inner, emit);
    }
}
