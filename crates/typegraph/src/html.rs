use crate::graph::Graph;

/// vis-network 页面模板
const VIZJS_TEMPLATE: &str = r#"<html>
<head>
    <script type="text/javascript" src="https://unpkg.com/vis-network/standalone/umd/vis-network.min.js"></script>

    <style type="text/css">
        #mynetwork {
            width: 100%;
            height: 100%;
            border: 1px solid lightgray;
        }
    </style>
</head>
<body>
<div id="mynetwork"></div>

<script type="text/javascript">
    var nodes = new vis.DataSet([
__NODES__
    ]);

    var edges = new vis.DataSet([
__EDGES__
    ]);

    var container = document.getElementById('mynetwork');

    var data = {
        nodes: nodes,
        edges: edges
    };

    var options = {
        interaction: {
            dragNodes: true,
            dragView: true,
            zoomView: true,
        },
        physics: {
            solver: "repulsion",
            repulsion: {
                nodeDistance: __NODE_DISTANCE__,
            },
        },
        edges: {
            smooth: true,
            arrows: { from: true },
            length: __NODE_DISTANCE__,
        },
    };

    var network = new vis.Network(container, data, options);
</script>
</body>
</html>
"#;

/// HTML 图生成器
pub struct HtmlGenerator {
    node_distance: u32,
}

impl HtmlGenerator {
    pub fn new() -> Self {
        Self { node_distance: 400 }
    }

    pub fn with_node_distance(mut self, distance: u32) -> Self {
        self.node_distance = distance;
        self
    }

    /// D3 数据: 只输出 `the_data` 赋值, 页面由宿主提供
    pub fn generate_d3(&self, graph: &Graph) -> String {
        let mut lines = vec![
            "<script type=\"text/javascript\">".to_string(),
            "var the_data = {".to_string(),
            String::new(),
            "    nodes: [".to_string(),
        ];

        for node in graph.nodes() {
            lines.push(format!("        {{ id: '{}' }},", Self::escape_js(node)));
        }

        lines.push("    ],".to_string());
        lines.push(String::new());
        lines.push("    links: [".to_string());

        for (source, targets) in graph.edges() {
            for target in targets {
                lines.push(format!(
                    "        {{ source: '{}', target: '{}' }},",
                    Self::escape_js(source),
                    Self::escape_js(target)
                ));
            }
        }

        lines.push("    ],".to_string());
        lines.push(String::new());
        lines.push("};".to_string());
        lines.push("</script>".to_string());

        lines.join("\n") + "\n"
    }

    /// vis-network 独立页面
    pub fn generate_vizjs(&self, graph: &Graph) -> String {
        let nodes: String = graph
            .nodes()
            .iter()
            .map(|node| {
                format!(
                    "        {{ id: '{}', label: '{}' }},\n",
                    Self::escape_js(node),
                    Self::label(node)
                )
            })
            .collect();

        let edges: String = graph
            .edges()
            .iter()
            .flat_map(|(source, targets)| {
                targets.iter().map(move |target| {
                    format!(
                        "        {{ from: '{}', to: '{}' }},\n",
                        Self::escape_js(source),
                        Self::escape_js(target)
                    )
                })
            })
            .collect();

        VIZJS_TEMPLATE
            .replace("__NODES__", nodes.trim_end_matches('\n'))
            .replace("__EDGES__", edges.trim_end_matches('\n'))
            .replace("__NODE_DISTANCE__", &self.node_distance.to_string())
    }

    /// 图的 JSON 表示
    pub fn generate_json(&self, graph: &Graph) -> serde_json::Result<String> {
        serde_json::to_string_pretty(graph)
    }

    /// 多行节点标签, 片段之间用 `\n` 转义序列连接
    #[doc(hidden)]
    pub fn label(name: &str) -> String {
        split_label(name)
            .iter()
            .map(|s| Self::escape_js(s))
            .collect::<Vec<_>>()
            .join("\\n")
    }

    /// 转义为单引号 JS 字符串内容
    #[doc(hidden)]
    pub fn escape_js(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('\'', "\\'")
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace("</", "<\\/")
    }
}

impl Default for HtmlGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// 按驼峰拆分标签
///
/// 从尾部开始找最后一个分割点 (大写字母且前一个字符不是大写),
/// 之后的部分作为一段, 对剩余部分重复. 连续的大写字母不拆开.
pub fn split_label(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut segments = Vec::new();
    let mut end = chars.len();

    loop {
        let split = (1..end)
            .rev()
            .find(|&i| chars[i].is_uppercase() && !chars[i - 1].is_uppercase());

        match split {
            Some(i) => {
                segments.push(chars[i..end].iter().collect());
                end = i;
            }
            None => {
                segments.push(chars[..end].iter().collect());
                break;
            }
        }
    }

    segments.reverse();
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> Graph {
        let mut graph = Graph::new();
        graph.add_edge("Foo", "Bar<Baz, Qux>");
        graph.add_edge("Bar<Baz, Qux>", "Bar");
        graph.add_edges("Bar<Baz, Qux>", ["Baz", "Qux"]);
        graph
    }

    #[test]
    fn test_split_label_keeps_capital_runs() {
        assert_eq!(split_label("HTTPResponseHandler"), vec!["HTTPResponse", "Handler"]);
        assert_eq!(HtmlGenerator::label("HTTPResponseHandler"), "HTTPResponse\\nHandler");
    }

    #[test]
    fn test_split_label_camel_case() {
        assert_eq!(split_label("UITableViewController"), vec!["UITable", "View", "Controller"]);
        assert_eq!(split_label("viewModel"), vec!["view", "Model"]);
    }

    #[test]
    fn test_split_label_edge_cases() {
        assert_eq!(split_label(""), vec![""]);
        assert_eq!(split_label("lowercase"), vec!["lowercase"]);
        assert_eq!(split_label("URL"), vec!["URL"]);
        assert_eq!(split_label("Bar<Baz>"), vec!["Bar<", "Baz>"]);
    }

    #[test]
    fn test_escape_js() {
        assert_eq!(HtmlGenerator::escape_js("it's"), "it\\'s");
        assert_eq!(HtmlGenerator::escape_js("a\\b"), "a\\\\b");
        assert_eq!(HtmlGenerator::escape_js("</script>"), "<\\/script>");
    }

    #[test]
    fn test_generate_d3() {
        let html = HtmlGenerator::new().generate_d3(&sample_graph());

        assert!(html.starts_with("<script type=\"text/javascript\">\nvar the_data = {"));
        assert!(html.contains("        { id: 'Bar<Baz, Qux>' },"));
        assert!(html.contains("        { source: 'Foo', target: 'Bar<Baz, Qux>' },"));
        assert!(html.contains("        { source: 'Bar<Baz, Qux>', target: 'Qux' },"));
        assert_eq!(html.matches("{ id:").count(), 5);
        assert_eq!(html.matches("{ source:").count(), 4);
        assert!(!html.contains("<html>"));
    }

    #[test]
    fn test_generate_vizjs() {
        let mut graph = Graph::new();
        graph.add_edge("HTTPResponseHandler", "NSObject");
        let html = HtmlGenerator::new().generate_vizjs(&graph);

        assert!(html.starts_with("<html>"));
        assert!(html.contains("vis-network.min.js"));
        assert!(html.contains("        { id: 'HTTPResponseHandler', label: 'HTTPResponse\\nHandler' },"));
        assert!(html.contains("        { from: 'HTTPResponseHandler', to: 'NSObject' },"));
        assert!(html.contains("nodeDistance: 400,"));
        assert!(!html.contains("__NODES__"));
    }

    #[test]
    fn test_generate_vizjs_node_distance() {
        let html = HtmlGenerator::new()
            .with_node_distance(250)
            .generate_vizjs(&sample_graph());
        assert!(html.contains("nodeDistance: 250,"));
        assert!(html.contains("length: 250,"));
    }

    #[test]
    fn test_quotes_in_identifiers_escaped() {
        let mut graph = Graph::new();
        graph.add_edge("Foo", "Tagged<'a'>");
        let html = HtmlGenerator::new().generate_d3(&graph);
        assert!(html.contains("target: 'Tagged<\\'a\\'>'"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let generator = HtmlGenerator::new();
        let graph = sample_graph();
        assert_eq!(generator.generate_d3(&graph), generator.generate_d3(&graph));
        assert_eq!(generator.generate_vizjs(&graph), generator.generate_vizjs(&graph));
    }

    #[test]
    fn test_generate_json() {
        let json = HtmlGenerator::new().generate_json(&sample_graph()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["edges"]["Foo"][0], "Bar<Baz, Qux>");
        assert_eq!(value["nodes"].as_array().map(Vec::len), Some(5));
    }

    #[test]
    fn test_generator_default() {
        let gen = HtmlGenerator::default();
        assert_eq!(gen.node_distance, 400);
    }
}
