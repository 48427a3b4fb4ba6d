//! Marshal operations back into a current-version document

use crate::error::{Error, ErrorKind, Result, Span};
use crate::model::{Operation, OperationList, ParamValue, Resource};
use crate::schema::{Attribute, Element, Version};

const INDENT: &str = "    ";

/// Element in the output tree
#[derive(Debug)]
struct Node {
    name: &'static str,
    attributes: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Node {
    fn new(element: Element) -> Self {
        Self {
            name: element.name(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    fn attr(&mut self, attribute: Attribute, value: Option<&ParamValue>) {
        if let Some(value) = value {
            self.attributes.push((attribute.name(), value.to_string()));
        }
    }

    fn child(mut self, node: Node) -> Self {
        self.children.push(node);
        self
    }

    fn is_bare(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty()
    }
}

/// Emit the subsystem configuration as a 2.1 document
///
/// Parameters with no 2.1 spelling are translated: `use-jdbc-store` and
/// `use-hornetq-store` select the object-store type, `enable-statistics`
/// becomes `statistics-enabled`.
pub fn write_current(operations: &OperationList) -> Result<String> {
    let Some(subsystem) = operations.find(Resource::Subsystem) else {
        return Err(Error::with_message(
            ErrorKind::MissingRequiredContent {
                element: Element::Subsystem.name().to_string(),
                expected: format!("an add operation for {}", Resource::Subsystem.address()),
            },
            Span::empty(),
            "operation list has no subsystem operation",
        ));
    };
    let log_store = operations.find(Resource::LogStore);

    let mut root = Node::new(Element::Subsystem);
    root.attributes
        .push(("xmlns", Version::CURRENT.namespace().to_string()));

    for node in [
        core_environment(subsystem),
        recovery_environment(subsystem)?,
        coordinator_environment(subsystem),
        object_store(subsystem, log_store),
        jts(subsystem),
        store_backend(subsystem)?,
    ]
    .into_iter()
    .flatten()
    {
        root.children.push(node);
    }

    let mut output = String::new();
    serialize_element(&root, 0, &mut output);
    output.push('\n');
    Ok(output)
}

fn core_environment(op: &Operation) -> Option<Node> {
    let mut node = Node::new(Element::CoreEnvironment);
    node.attr(Attribute::NodeIdentifier, op.get("node-identifier"));
    node.attr(Attribute::Path, op.get("path"));
    node.attr(Attribute::RelativeTo, op.get("relative-to"));

    let process = if op.contains("process-id-socket-binding") {
        let mut socket = Node::new(Element::Socket);
        socket.attr(Attribute::SocketBinding, op.get("process-id-socket-binding"));
        socket.attr(
            Attribute::SocketProcessIdMaxPorts,
            op.get("process-id-socket-max-ports"),
        );
        Some(socket)
    } else if op.contains("process-id-uuid") || !node.attributes.is_empty() {
        Some(Node::new(Element::Uuid))
    } else {
        None
    };

    process.map(|branch| node.child(Node::new(Element::ProcessId).child(branch)))
}

fn recovery_environment(op: &Operation) -> Result<Option<Node>> {
    let mut node = Node::new(Element::RecoveryEnvironment);
    node.attr(Attribute::SocketBinding, op.get("recovery-socket-binding"));
    node.attr(
        Attribute::StatusSocketBinding,
        op.get("recovery-status-socket-binding"),
    );
    node.attr(Attribute::RecoveryListener, op.get("recovery-listener"));
    if node.is_bare() {
        return Ok(None);
    }
    require(
        &node,
        Element::RecoveryEnvironment,
        &[Attribute::SocketBinding, Attribute::StatusSocketBinding],
    )?;
    Ok(Some(node))
}

fn coordinator_environment(op: &Operation) -> Option<Node> {
    let mut node = Node::new(Element::CoordinatorEnvironment);
    node.attr(
        Attribute::StatisticsEnabled,
        op.get("statistics-enabled").or_else(|| op.get("enable-statistics")),
    );
    node.attr(Attribute::EnableTsmStatus, op.get("enable-tsm-status"));
    node.attr(Attribute::DefaultTimeout, op.get("default-timeout"));
    (!node.is_bare()).then_some(node)
}

fn object_store(op: &Operation, log_store: Option<&Operation>) -> Option<Node> {
    let mut node = Node::new(Element::ObjectStore);
    node.attr(Attribute::Path, op.get("object-store-path"));
    node.attr(Attribute::RelativeTo, op.get("object-store-relative-to"));

    let declared = op
        .get("object-store-type")
        .or_else(|| log_store.and_then(|ls| ls.get("log-store-type")))
        .cloned();
    let store_type = declared.or_else(|| {
        if is_set(op, "use-jdbc-store") {
            Some(ParamValue::Token("jdbc".to_string()))
        } else if is_set(op, "use-hornetq-store") {
            Some(ParamValue::Token("hornetq".to_string()))
        } else {
            None
        }
    });
    node.attr(Attribute::Type, store_type.as_ref());
    (!node.is_bare()).then_some(node)
}

fn jts(op: &Operation) -> Option<Node> {
    is_set(op, "jts").then(|| Node::new(Element::Jts))
}

fn store_backend(op: &Operation) -> Result<Option<Node>> {
    let jdbc_params = op.params().any(|(name, _)| name.starts_with("jdbc-"));
    if jdbc_params {
        return jdbc_store(op).map(Some);
    }
    let async_io = op.get("hornetq-store-enable-async-io");
    if async_io.is_some() || is_set(op, "use-hornetq-store") {
        let mut node = Node::new(Element::HornetqStore);
        node.attr(Attribute::EnableAsyncIo, async_io);
        return Ok(Some(node));
    }
    Ok(None)
}

fn jdbc_store(op: &Operation) -> Result<Node> {
    let mut node = Node::new(Element::JdbcStore);
    node.attr(Attribute::DatasourceJndiName, op.get("jdbc-store-datasource"));
    require(&node, Element::JdbcStore, &[Attribute::DatasourceJndiName])?;

    for (element, kind) in [
        (Element::JdbcActionStore, "action"),
        (Element::JdbcStateStore, "state"),
        (Element::JdbcCommunicationStore, "communication"),
    ] {
        let mut child = Node::new(element);
        child.attr(
            Attribute::TablePrefix,
            op.get(&format!("jdbc-{kind}-store-table-prefix")),
        );
        child.attr(
            Attribute::DropTable,
            op.get(&format!("jdbc-{kind}-store-drop-table")),
        );
        if !child.is_bare() {
            node.children.push(child);
        }
    }
    Ok(node)
}

fn is_set(op: &Operation, param: &str) -> bool {
    op.get(param).and_then(ParamValue::as_bool) == Some(true)
}

fn require(node: &Node, element: Element, required: &[Attribute]) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|a| !node.attributes.iter().any(|(name, _)| *name == a.name()))
        .map(|a| a.name().to_string())
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(Error::new(
        ErrorKind::MissingRequiredAttribute {
            attributes: missing,
            element: element.name().to_string(),
        },
        Span::empty(),
    ))
}

fn serialize_element(node: &Node, depth: usize, output: &mut String) {
    let pad = INDENT.repeat(depth);
    output.push_str(&pad);
    output.push('<');
    output.push_str(node.name);

    for (key, value) in &node.attributes {
        output.push(' ');
        output.push_str(key);
        output.push_str("=\"");
        output.push_str(&escape_xml(value));
        output.push('"');
    }

    if node.children.is_empty() {
        output.push_str("/>");
        return;
    }

    output.push('>');
    for child in &node.children {
        output.push('\n');
        serialize_element(child, depth.saturating_add(1), output);
    }
    output.push('\n');
    output.push_str(&pad);
    output.push_str("</");
    output.push_str(node.name);
    output.push('>');
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
