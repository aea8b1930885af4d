//! HTML management view of registered tasks.

use crate::registry::services::NodeTasks;
use minijinja::{AutoEscape, Environment, context};

const TASK_LISTING_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Registered tasks</title>
</head>
<body>
<h1>Registered tasks</h1>
{% if nodes %}
{% for entry in nodes %}
<section class="node">
<h2>{{ entry.node.name }} <small>{{ entry.node.host }}:{{ entry.node.port }} ({{ entry.node.status }})</small></h2>
{% if entry.tasks %}
<table>
<thead><tr><th>Task</th><th>Type</th><th>Endpoint</th><th>State</th></tr></thead>
<tbody>
{% for task in entry.tasks %}
<tr><td>{{ task.name }}</td><td>{{ task.task_type }}</td><td>{{ task.endpoint }}</td><td>{{ task.state }}</td></tr>
{% endfor %}
</tbody>
</table>
{% else %}
<p>No tasks registered.</p>
{% endif %}
</section>
{% endfor %}
{% else %}
<p>No task nodes registered.</p>
{% endif %}
</body>
</html>
"#;

/// Renders the task listing as an HTML page.
///
/// # Errors
///
/// Returns the template engine error when rendering fails.
pub fn render_task_listing(nodes: &[NodeTasks]) -> Result<String, minijinja::Error> {
    let mut environment = Environment::new();
    environment.set_auto_escape_callback(|_| AutoEscape::Html);
    environment.render_str(TASK_LISTING_TEMPLATE, context! { nodes => nodes })
}
